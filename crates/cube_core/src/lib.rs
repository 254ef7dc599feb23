//! # Concurrent Cube Core
//!
//! An N x N x N cube that any number of threads may `rotate` and `show`
//! at once, with:
//! - Maximum legal parallelism: same-axis rotations on different slices and
//!   concurrent snapshots all overlap
//! - A total order among conflicting operations, with no deadlock
//! - Tear-free snapshots
//! - Cancellable waits that release every partial acquisition
//!
//! ## Architecture
//!
//! ```text
//!   Cube::rotate / Cube::show        (protocols, cube.rs)
//!        │            │
//!        ▼            ▼
//!   LockTopology   CubeHooks          (topology.rs, hooks.rs)
//!        │
//!        ▼
//!   FairLock + CancelToken            (sync/)
//!
//!   FaceletState ◄── Indexer, Side, Axis  (state.rs, geometry/)
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use cube_core::{Cube, NoHooks};
//!
//! let cube = Cube::new(3, NoHooks)?;
//! cube.rotate(0, 0)?;
//! assert_eq!(cube.show()?.len(), 54);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod cube;
pub mod error;
pub mod geometry;
pub mod hooks;
pub mod replay;
pub mod state;
pub mod sync;
pub mod topology;

pub use config::CubeConfig;
pub use cube::{Cube, CubeStats};
pub use error::{CubeError, CubeResult};
pub use geometry::{Affine, Axis, FaceTurn, Indexer, Side};
pub use hooks::{CubeHooks, FnHooks, NoHooks};
pub use replay::ReplayHooks;
pub use state::FaceletState;
pub use sync::{CancelToken, FairLock, LockStatus};
pub use topology::LockTopology;
