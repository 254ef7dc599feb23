//! # Replay Recorder
//!
//! Hooks that replay every operation against a sequential [`FaceletState`]
//! and let the caller check each `show()` result against it.
//!
//! ## Why the hook points work as a linearization
//!
//! `before_rotation` runs while the rotation holds its axis and slice, after
//! every conflicting operation has finished. Rotations whose hook windows
//! overlap share an axis but not a slice, so they commute and the reference
//! may apply them in hook order. `before_showing` runs while no rotation is
//! in flight, so the reference at that instant is exactly what the snapshot
//! must show.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, ThreadId};

use parking_lot::Mutex;

use crate::error::CubeResult;
use crate::geometry::Side;
use crate::hooks::{CubeHooks, NoHooks};
use crate::state::FaceletState;

/// [`CubeHooks`] that maintain a reference cube, optionally wrapping an inner
/// hook set. A `before_*` error from the inner set skips the bookkeeping, as
/// the cube skips the operation.
///
/// ## Usage
///
/// ```rust,ignore
/// let cube = Cube::new(3, ReplayHooks::new(3)?)?;
/// cube.rotate(0, 1)?;
/// let shown = cube.show()?;
/// assert!(cube.hooks().verify(&shown));
/// ```
#[derive(Debug)]
pub struct ReplayHooks<H = NoHooks> {
    reference: Mutex<FaceletState>,
    expected: Mutex<HashMap<ThreadId, String>>,
    verified: AtomicU64,
    mismatches: AtomicU64,
    inner: H,
}

impl ReplayHooks<NoHooks> {
    /// Recorder for a cube of the given size.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::InvalidSize`](crate::CubeError::InvalidSize) if
    /// `size` is zero.
    pub fn new(size: usize) -> CubeResult<Self> {
        Self::wrap(size, NoHooks)
    }
}

impl<H: CubeHooks> ReplayHooks<H> {
    /// Recorder that forwards every hook to `inner`.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::InvalidSize`](crate::CubeError::InvalidSize) if
    /// `size` is zero.
    pub fn wrap(size: usize, inner: H) -> CubeResult<Self> {
        Ok(Self {
            reference: Mutex::new(FaceletState::new(size)?),
            expected: Mutex::new(HashMap::new()),
            verified: AtomicU64::new(0),
            mismatches: AtomicU64::new(0),
            inner,
        })
    }

    /// Checks a `show()` result returned to the calling thread against the
    /// reference recorded for that same call.
    ///
    /// Returns false if it differs or if no snapshot was recorded.
    pub fn verify(&self, shown: &str) -> bool {
        let expected = self.expected.lock().remove(&thread::current().id());
        let ok = expected.as_deref() == Some(shown);
        if ok {
            self.verified.fetch_add(1, Ordering::Relaxed);
        } else {
            self.mismatches.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(?expected, shown, "snapshot differs from replay");
        }
        ok
    }

    /// Serialized reference state now.
    #[must_use]
    pub fn reference(&self) -> String {
        self.reference.lock().serialize()
    }

    /// Number of successful and failed [`ReplayHooks::verify`] calls.
    #[must_use]
    pub fn verdicts(&self) -> (u64, u64) {
        (
            self.verified.load(Ordering::Relaxed),
            self.mismatches.load(Ordering::Relaxed),
        )
    }

    /// The wrapped hook set.
    #[must_use]
    pub fn inner(&self) -> &H {
        &self.inner
    }
}

impl<H: CubeHooks> CubeHooks for ReplayHooks<H> {
    fn before_rotation(&self, side: Side, layer: usize) -> CubeResult<()> {
        self.inner.before_rotation(side, layer)?;
        self.reference.lock().rotate(side, layer);
        Ok(())
    }

    fn after_rotation(&self, side: Side, layer: usize) -> CubeResult<()> {
        self.inner.after_rotation(side, layer)
    }

    fn before_showing(&self) -> CubeResult<()> {
        self.inner.before_showing()?;
        let snapshot = self.reference.lock().serialize();
        self.expected.lock().insert(thread::current().id(), snapshot);
        Ok(())
    }

    fn after_showing(&self) -> CubeResult<()> {
        self.inner.after_showing()
    }
}
