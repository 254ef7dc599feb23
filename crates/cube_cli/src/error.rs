//! Error types for the CLI tools.

use thiserror::Error;

use cube_core::CubeError;

/// Errors a CLI run can end with.
#[derive(Debug, Error)]
pub enum CliError {
    /// The cube rejected an operation or a config.
    #[error("cube error: {0}")]
    Cube(#[from] CubeError),

    /// Stress config could not be read or parsed.
    #[error("invalid stress config: {0}")]
    Config(String),

    /// A serialized state does not fit the cube size.
    #[error("malformed cube state: {0}")]
    Malformed(String),

    /// A stress worker thread died.
    #[error("worker failed: {0}")]
    Worker(String),

    /// Bad command line.
    #[error("usage: {0}")]
    Usage(String),

    /// The logging subscriber could not be installed.
    #[error("logging setup failed: {0}")]
    Logging(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
