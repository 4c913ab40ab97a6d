use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure surfaced by the diff engine or by snapshot extraction maps
/// to one of these kinds. Each kind has a stable error code that tests and
/// the CLI can rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Comparison
    /// Two entries of one keyed section (or two descriptors of one artifact) share a key
    DuplicateKey,
    /// More than one Designate claims the identifier being compared
    AmbiguousCorrelation,
    /// A visitor received a `Leave` that does not match the innermost `Enter`
    UnbalancedSection,

    // Extraction
    /// The artifact has no `META-INF/MANIFEST.MF`
    MissingManifest,
    /// The artifact is neither a jar, a directory nor a JSON snapshot
    UnsupportedArtifact,
    /// A descriptor resource could not be parsed
    InvalidDescriptor,
    /// The jar archive could not be opened or read
    Archive,

    // Integration/IO
    Io,
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::DuplicateKey => "ERR_DUPLICATE_KEY",
            ExErrorKind::AmbiguousCorrelation => "ERR_AMBIGUOUS_CORRELATION",
            ExErrorKind::UnbalancedSection => "ERR_UNBALANCED_SECTION",
            ExErrorKind::MissingManifest => "ERR_MISSING_MANIFEST",
            ExErrorKind::UnsupportedArtifact => "ERR_UNSUPPORTED_ARTIFACT",
            ExErrorKind::InvalidDescriptor => "ERR_INVALID_DESCRIPTOR",
            ExErrorKind::Archive => "ERR_ARCHIVE",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus the context
/// (operation, identifier, artifact, candidates) needed to explain a failure.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    identifier: Option<String>,
    artifact: Option<String>,
    message: String,
    candidates: Option<Vec<String>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            identifier: None,
            artifact: None,
            message: String::new(),
            candidates: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the identifier being compared or extracted
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Add the artifact (path or archive entry) the error relates to
    pub fn with_artifact(mut self, artifact: impl Into<String>) -> Self {
        self.artifact = Some(artifact.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add candidate keys (used for AmbiguousCorrelation to carry the competing ocd refs)
    pub fn with_candidates(mut self, candidates: Vec<String>) -> Self {
        self.candidates = Some(candidates);
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the identifier context, if any
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// Get the artifact context, if any
    pub fn artifact(&self) -> Option<&str> {
        self.artifact.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get candidate keys, if any (populated on AmbiguousCorrelation)
    pub fn candidates(&self) -> Option<&[String]> {
        self.candidates.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(identifier) = &self.identifier {
            write!(f, " (identifier: {})", identifier)?;
        }
        if let Some(artifact) = &self.artifact {
            write!(f, " (artifact: {})", artifact)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain error taxonomy for bundle metadata diffing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BundleDiffError {
    /// Two entries of a keyed section share the same key
    #[error("Duplicate key '{key}' in section {section}")]
    DuplicateKey { section: String, key: String },

    /// More than one Designate maps to the same identifier on one side
    #[error("Ambiguous designates for identifier {identifier} (ocd refs: {ocd_refs:?})")]
    AmbiguousCorrelation {
        identifier: String,
        ocd_refs: Vec<String>,
    },

    /// Section nesting was violated by a visitor caller
    #[error("Cannot leave section '{found}' while '{expected}' is the innermost open section")]
    UnbalancedSection { expected: String, found: String },

    /// The bundle has no manifest
    #[error("Artifact {artifact} does not contain the mandatory manifest file")]
    MissingManifest { artifact: String },

    /// The path does not name an artifact shape we can read
    #[error("Unsupported artifact: {artifact}")]
    UnsupportedArtifact { artifact: String },

    /// I/O failure (carries the rendered io::Error)
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON (de)serialization failure
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<BundleDiffError> for ExError {
    fn from(err: BundleDiffError) -> Self {
        let message = err.to_string();
        match err {
            BundleDiffError::DuplicateKey { .. } => {
                ExError::new(ExErrorKind::DuplicateKey).with_message(message)
            }
            BundleDiffError::AmbiguousCorrelation {
                identifier,
                ocd_refs,
            } => ExError::new(ExErrorKind::AmbiguousCorrelation)
                .with_identifier(identifier)
                .with_candidates(ocd_refs)
                .with_message(message),
            BundleDiffError::UnbalancedSection { .. } => {
                ExError::new(ExErrorKind::UnbalancedSection).with_message(message)
            }
            BundleDiffError::MissingManifest { artifact } => {
                ExError::new(ExErrorKind::MissingManifest)
                    .with_artifact(artifact)
                    .with_message(message)
            }
            BundleDiffError::UnsupportedArtifact { artifact } => {
                ExError::new(ExErrorKind::UnsupportedArtifact)
                    .with_artifact(artifact)
                    .with_message(message)
            }
            BundleDiffError::Io(_) => ExError::new(ExErrorKind::Io).with_message(message),
            BundleDiffError::Serialization(_) => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

impl From<std::io::Error> for BundleDiffError {
    fn from(err: std::io::Error) -> Self {
        BundleDiffError::Io(err.to_string())
    }
}

impl From<std::io::Error> for ExError {
    fn from(err: std::io::Error) -> Self {
        BundleDiffError::from(err).into()
    }
}

impl From<serde_json::Error> for BundleDiffError {
    fn from(err: serde_json::Error) -> Self {
        BundleDiffError::Serialization(err.to_string())
    }
}
