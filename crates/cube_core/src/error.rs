//! # Cube Error Types
//!
//! All errors that can occur while operating on a cube.

use thiserror::Error;

/// Errors that can occur in the cube.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CubeError {
    /// The calling thread gave up waiting. No lock is held and the cube
    /// state was not touched by this call.
    #[error("operation cancelled")]
    Cancelled,

    /// Cube size must be at least 1.
    #[error("invalid cube size: {0}")]
    InvalidSize(usize),

    /// Side index outside `0..6`.
    #[error("invalid side: {0}")]
    InvalidSide(usize),

    /// Layer index outside `0..size`.
    #[error("invalid layer {layer} for cube of size {size}")]
    InvalidLayer {
        /// The requested layer.
        layer: usize,
        /// The cube size.
        size: usize,
    },

    /// A serialized state does not describe a cube of the expected size.
    #[error("invalid cube state: {0}")]
    InvalidState(String),

    /// An instrumentation hook reported a failure.
    #[error("hook failed: {0}")]
    Hook(String),

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CubeError {
    /// Returns true if this is a cancellation outcome.
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Result type for cube operations.
pub type CubeResult<T> = Result<T, CubeError>;
