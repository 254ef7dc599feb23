//! # Cube CLI
//!
//! Library half of the `cube_validate` and `cube_stress` binaries.
//!
//! - [`render`]: unfolded-net view of a serialized cube
//! - [`validate`]: known rotation sequences and their expected states
//! - [`stress`]: random multi-threaded workload checked by replay
//! - [`logging`]: subscriber setup shared by both binaries

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod logging;
pub mod render;
pub mod stress;
pub mod validate;

pub use error::{CliError, CliResult};
