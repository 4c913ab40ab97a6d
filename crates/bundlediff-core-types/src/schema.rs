//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names consistent across the core, store and
//! CLI crates.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Entity identifiers
pub const FIELD_IDENTIFIER: &str = "identifier";
pub const FIELD_ARTIFACT: &str = "artifact";

// Collection sizes
pub const FIELD_IDENTIFIER_COUNT: &str = "identifier_count";
pub const FIELD_COMPONENT_COUNT: &str = "component_count";
pub const FIELD_METATYPE_COUNT: &str = "metatype_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
