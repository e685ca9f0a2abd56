//! Error types for nftdns.

use thiserror::Error;

/// Fatal pipeline errors.
///
/// Every variant terminates the current run; the binary entry point decides
/// the exit code. Per-hostname resolution failures are not represented here
/// because they degrade the affected variable to its fallback value instead
/// of aborting.
#[derive(Error, Debug)]
pub enum NftdnsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Command execution failed: {0}")]
    Command(String),

    #[error("Staged config failed validation: {0}")]
    StagingValidation(String),

    #[error("Live config failed validation after promotion: {0}")]
    LiveValidation(String),

    #[error("Lock error: {0}")]
    Lock(String),

    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),
}
