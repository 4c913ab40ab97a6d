//! bundlediff CLI
//!
//! Compares the Declarative Services and MetaType metadata of two bundles

use clap::{Parser, ValueEnum};

use bundlediff_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "bundlediff-cli")]
#[command(about = "Diff the OSGi component and configuration metadata of two bundles", long_about = None)]
struct Cli {
    /// Log output profile (logs go to stderr; RUST_LOG overrides the level)
    #[arg(long, value_enum, default_value_t = LogProfile::Quiet)]
    log_profile: LogProfile,

    #[command(flatten)]
    diff: commands::diff::DiffArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogProfile {
    /// Human-readable, debug level
    Development,
    /// JSON lines, info level
    Production,
    /// Human-readable, warnings only
    Quiet,
}

impl From<LogProfile> for Profile {
    fn from(profile: LogProfile) -> Self {
        match profile {
            LogProfile::Development => Profile::Development,
            LogProfile::Production => Profile::Production,
            LogProfile::Quiet => Profile::Quiet,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.log_profile.into());

    if let Err(e) = commands::diff::execute(cli.diff) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
