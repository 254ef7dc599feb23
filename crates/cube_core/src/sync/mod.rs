//! # Synchronization Primitives for the Lock Topology
//!
//! ## The Problem
//!
//! ```text
//! Thread 1:  rotate(top, 0)     ─┐
//! Thread 2:  rotate(bottom, 0)  ─┼─> same axis, different slices: run together
//! Thread 3:  rotate(left, 1)    ─┘   different axis: wait for 1 and 2
//! Thread 4:  show()                  waits for every rotation in flight
//! ```
//!
//! `std` and `parking_lot` locks give no way to abandon a blocked
//! acquisition, and `std::sync::RwLock` makes no fairness promise.
//!
//! ## The Solution
//!
//! - [`FairLock`]: FIFO shared/exclusive lock with cancellable waits
//! - [`CancelToken`]: the flag those waits observe
//! - RAII guards: dropping a guard is the only way to release, so partial
//!   acquisitions unwind on every exit path

mod cancel;
mod fair_lock;

pub use cancel::CancelToken;
pub use fair_lock::{ExclusiveGuard, FairLock, LockStatus, SharedGuard};
