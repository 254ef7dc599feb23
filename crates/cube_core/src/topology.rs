//! # Lock Topology
//!
//! Every lock the protocols use, created once at construction.
//!
//! ```text
//!   setup ─── global exclusive, orders every setup phase
//!   axis[3] ── shared: "a rotation on this axis is in flight"
//!              exclusive touch: "wait until none is"
//!   layer[3][size] ── exclusive per physical slice
//!   fence ─── shared: "a snapshot is in flight"
//!              exclusive touch: "wait until none is"
//! ```
//!
//! ## Acquisition Order
//!
//! Only the thread holding `setup` ever *waits* on another topology lock,
//! and it always acquires in the order setup → own axis → own layer →
//! touches. Nobody holding an axis, layer or fence lock ever waits for
//! `setup`, so no wait-for cycle can form.

use std::time::Duration;

use crate::geometry::Axis;
use crate::sync::FairLock;

/// The fixed set of locks guarding one cube.
#[derive(Debug)]
pub struct LockTopology {
    setup: FairLock,
    axes: [FairLock; 3],
    layers: [Vec<FairLock>; 3],
    fence: FairLock,
}

impl LockTopology {
    /// Creates the topology for a cube of `size` layers per axis.
    #[must_use]
    pub fn new(size: usize, poll: Duration) -> Self {
        Self {
            setup: FairLock::new(poll),
            axes: std::array::from_fn(|_| FairLock::new(poll)),
            layers: std::array::from_fn(|_| (0..size).map(|_| FairLock::new(poll)).collect()),
            fence: FairLock::new(poll),
        }
    }

    /// Serializes the lock-acquisition phase of every operation.
    #[inline]
    #[must_use]
    pub fn setup(&self) -> &FairLock {
        &self.setup
    }

    /// Lock of one axis.
    #[inline]
    #[must_use]
    pub fn axis(&self, axis: Axis) -> &FairLock {
        &self.axes[axis.index()]
    }

    /// Lock of one physical slice. `slice` is a normalized layer index.
    #[inline]
    #[must_use]
    pub fn layer(&self, axis: Axis, slice: usize) -> &FairLock {
        &self.layers[axis.index()][slice]
    }

    /// Snapshot fence.
    #[inline]
    #[must_use]
    pub fn fence(&self) -> &FairLock {
        &self.fence
    }

    /// True when no lock is held or waited for.
    #[must_use]
    pub fn is_quiescent(&self) -> bool {
        self.setup.status().is_idle()
            && self.fence.status().is_idle()
            && self.axes.iter().all(|l| l.status().is_idle())
            && self
                .layers
                .iter()
                .flatten()
                .all(|l| l.status().is_idle())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::CancelToken;

    #[test]
    fn test_new_topology_is_quiescent() {
        let topology = LockTopology::new(4, Duration::from_millis(1));
        assert!(topology.is_quiescent());
    }

    #[test]
    fn test_held_layer_is_reported() {
        let topology = LockTopology::new(2, Duration::from_millis(1));
        let token = CancelToken::new();
        let guard = topology.layer(Axis::FrontBack, 1).exclusive(&token).unwrap();
        assert!(!topology.is_quiescent());
        drop(guard);
        assert!(topology.is_quiescent());
    }
}
