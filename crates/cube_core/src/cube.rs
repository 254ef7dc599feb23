//! # Concurrent Cube
//!
//! The rotation and snapshot protocols.
//!
//! ## Rotation
//!
//! ```text
//!   setup ──► axis (shared, kept) ──► slice (exclusive, kept)
//!         ──► touch other axes (exclusive) ──► touch fence (exclusive)
//!         ──► release setup
//!   before_rotation ──► mutate under facelet mutex ──► after_rotation
//!   release slice, axis
//! ```
//!
//! Holding the own axis in shared mode for the whole call lets rotations on
//! the same axis run together, while the exclusive touches make a rotation
//! on another axis, or a snapshot, wait for every one of them to finish.
//!
//! ## Snapshot
//!
//! ```text
//!   setup ──► fence (shared, kept) ──► touch every axis (exclusive)
//!         ──► release setup
//!   before_showing ──► copy under facelet mutex ──► after_showing
//!   release fence
//! ```
//!
//! ## Cancellation
//!
//! Every lock wait observes the caller's [`CancelToken`]. Guards are locals
//! of the setup phase, so an early return drops exactly the locks acquired
//! so far, newest first, and no hook has run.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::config::CubeConfig;
use crate::error::{CubeError, CubeResult};
use crate::geometry::{Axis, Side};
use crate::hooks::{CubeHooks, NoHooks};
use crate::state::FaceletState;
use crate::sync::{CancelToken, ExclusiveGuard, SharedGuard};
use crate::topology::LockTopology;

/// Counters of finished operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CubeStats {
    /// Rotations whose facelets moved.
    pub rotations: u64,
    /// Snapshots taken.
    pub shows: u64,
    /// Calls that returned [`CubeError::Cancelled`] before anything moved or
    /// was copied: cancelled lock waits and `before_*` hooks reporting
    /// cancellation. Each call lands in at most one of the three counters.
    pub cancelled: u64,
}

#[derive(Debug, Default)]
struct Counters {
    rotations: AtomicU64,
    shows: AtomicU64,
    cancelled: AtomicU64,
}

/// Locks a rotation keeps after its setup phase.
///
/// Fields drop in declaration order: slice first, then axis.
struct RotationPermit<'a> {
    _slice: ExclusiveGuard<'a>,
    _axis: SharedGuard<'a>,
}

/// Lock a snapshot keeps after its setup phase.
struct ShowPermit<'a> {
    _fence: SharedGuard<'a>,
}

/// An N x N x N cube safe to rotate and show from any number of threads.
///
/// ## Usage
///
/// ```rust,ignore
/// let cube = Arc::new(Cube::new(3, NoHooks)?);
///
/// let worker = {
///     let cube = Arc::clone(&cube);
///     thread::spawn(move || cube.rotate(0, 0))
/// };
/// worker.join().unwrap()?;
///
/// println!("{}", cube.show()?);
/// ```
pub struct Cube<H = NoHooks> {
    size: usize,
    state: Mutex<FaceletState>,
    locks: LockTopology,
    hooks: H,
    counters: Counters,
}

impl<H: CubeHooks> Cube<H> {
    /// Creates a solved cube with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::InvalidSize`] if `size` is zero.
    pub fn new(size: usize, hooks: H) -> CubeResult<Self> {
        if size == 0 {
            return Err(CubeError::InvalidSize(size));
        }
        Self::with_config(CubeConfig::with_size(size), hooks)
    }

    /// Creates a solved cube from a config.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::InvalidConfig`] if the config fails validation.
    pub fn with_config(config: CubeConfig, hooks: H) -> CubeResult<Self> {
        config.validate()?;
        Ok(Self {
            size: config.size,
            state: Mutex::new(FaceletState::new(config.size)?),
            locks: LockTopology::new(config.size, config.cancel_poll()),
            hooks,
            counters: Counters::default(),
        })
    }

    /// Edge length.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// The installed hook set.
    #[inline]
    #[must_use]
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Rotates one layer a quarter turn. Never cancelled by the cube itself;
    /// hooks may still fail the call.
    ///
    /// # Errors
    ///
    /// See [`Cube::rotate_with`].
    pub fn rotate(&self, side: usize, layer: usize) -> CubeResult<()> {
        self.rotate_with(side, layer, &CancelToken::new())
    }

    /// Rotates layer `layer` as seen from side `side` a quarter turn.
    ///
    /// # Errors
    ///
    /// - [`CubeError::InvalidSide`] / [`CubeError::InvalidLayer`] before any
    ///   lock is touched.
    /// - [`CubeError::Cancelled`] if `cancel` fires while waiting for a lock;
    ///   no hook ran and nothing moved.
    /// - Whatever a hook returns. A `before_rotation` error leaves the
    ///   facelets untouched; an `after_rotation` error is reported after
    ///   they moved.
    pub fn rotate_with(&self, side: usize, layer: usize, cancel: &CancelToken) -> CubeResult<()> {
        let side = Side::from_index(side)?;
        if layer >= self.size {
            return Err(CubeError::InvalidLayer {
                layer,
                size: self.size,
            });
        }
        let slice = side.normalized_layer(layer, self.size);

        let _permit = self
            .acquire_rotation(side.axis(), slice, cancel)
            .map_err(|e| self.failed("rotation setup", e))?;
        trace!(side = side.index(), layer, slice, "rotation setup complete");

        self.hooks
            .before_rotation(side, layer)
            .map_err(|e| self.failed("before_rotation", e))?;

        self.state.lock().rotate(side, layer);
        self.counters.rotations.fetch_add(1, Ordering::Relaxed);
        trace!(side = side.index(), layer, "rotation applied");

        self.hooks
            .after_rotation(side, layer)
            .map_err(|e| Self::failed_late("after_rotation", e))
    }

    /// Returns every facelet's color, see [`FaceletState::serialize`].
    ///
    /// # Errors
    ///
    /// See [`Cube::show_with`].
    pub fn show(&self) -> CubeResult<String> {
        self.show_with(&CancelToken::new())
    }

    /// Takes a tear-free snapshot while no rotation is in flight.
    ///
    /// # Errors
    ///
    /// - [`CubeError::Cancelled`] if `cancel` fires while waiting for a lock;
    ///   no hook ran.
    /// - Whatever a hook returns. A `before_showing` error skips the snapshot.
    pub fn show_with(&self, cancel: &CancelToken) -> CubeResult<String> {
        let _permit = self
            .acquire_snapshot(cancel)
            .map_err(|e| self.failed("snapshot setup", e))?;
        trace!("snapshot setup complete");

        self.hooks
            .before_showing()
            .map_err(|e| self.failed("before_showing", e))?;

        let snapshot = self.state.lock().serialize();
        self.counters.shows.fetch_add(1, Ordering::Relaxed);

        self.hooks
            .after_showing()
            .map_err(|e| Self::failed_late("after_showing", e))?;
        Ok(snapshot)
    }

    /// Operation counters since construction.
    #[must_use]
    pub fn stats(&self) -> CubeStats {
        CubeStats {
            rotations: self.counters.rotations.load(Ordering::Relaxed),
            shows: self.counters.shows.load(Ordering::Relaxed),
            cancelled: self.counters.cancelled.load(Ordering::Relaxed),
        }
    }

    /// True when no topology lock is held or waited for.
    #[must_use]
    pub fn is_quiescent(&self) -> bool {
        self.locks.is_quiescent()
    }

    fn acquire_rotation(
        &self,
        axis: Axis,
        slice: usize,
        cancel: &CancelToken,
    ) -> CubeResult<RotationPermit<'_>> {
        let setup = self.locks.setup().exclusive(cancel)?;
        let axis_guard = self.locks.axis(axis).shared(cancel)?;
        let slice_guard = self.locks.layer(axis, slice).exclusive(cancel)?;

        // Wait out rotations on the other axes; they hold their axis shared
        // until their after_rotation returns.
        for other in axis.others() {
            self.locks.axis(other).touch_exclusive(cancel)?;
        }
        self.locks.fence().touch_exclusive(cancel)?;
        drop(setup);

        Ok(RotationPermit {
            _slice: slice_guard,
            _axis: axis_guard,
        })
    }

    fn acquire_snapshot(&self, cancel: &CancelToken) -> CubeResult<ShowPermit<'_>> {
        let setup = self.locks.setup().exclusive(cancel)?;
        let fence = self.locks.fence().shared(cancel)?;
        for axis in Axis::ALL {
            self.locks.axis(axis).touch_exclusive(cancel)?;
        }
        drop(setup);

        Ok(ShowPermit { _fence: fence })
    }

    fn failed(&self, stage: &'static str, err: CubeError) -> CubeError {
        if err.is_cancelled() {
            self.counters.cancelled.fetch_add(1, Ordering::Relaxed);
        }
        debug!(stage, error = %err, "cube operation failed");
        err
    }

    /// Failure after the operation already took effect and was counted.
    fn failed_late(stage: &'static str, err: CubeError) -> CubeError {
        debug!(stage, error = %err, "cube operation failed after completing");
        err
    }
}

impl<H> std::fmt::Debug for Cube<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cube")
            .field("size", &self.size)
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}
