//! Terminal error taxonomy for the resolution pipeline.

use thiserror::Error;

/// Errors that abort option resolution.
///
/// Every variant is terminal: nothing is retried, and no partial options
/// value escapes the pipeline. The boundary adapter in `cli::run` is the
/// only place these are printed and turned into an exit code.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// Bad, missing or conflicting command-line arguments.
    #[error("{0}")]
    Usage(String),

    /// Config file missing, unreadable or unparsable.
    #[error("{0}")]
    Configuration(String),

    /// Target path missing or not a directory.
    #[error("{0}")]
    Validation(String),

    /// A host token could not be resolved to a network address.
    #[error("Unknown host: {0}")]
    AddressResolution(String),
}
