//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use cube_core::{CubeResult, FnHooks, Side};

/// Generous upper bound for anything that should happen "promptly".
pub const PROMPT: Duration = Duration::from_secs(2);

/// Tracks how many operations are inside their hook window at once.
///
/// The window opens in a `before_*` hook and closes in the matching
/// `after_*` hook, so it covers the whole mutation or snapshot.
#[derive(Debug)]
pub struct WindowProbe {
    inside: AtomicUsize,
    peak: AtomicUsize,
    mode: ProbeMode,
}

/// What an operation does once inside the window.
#[derive(Clone, Copy, Debug)]
pub enum ProbeMode {
    /// Linger inside the window so a conflicting operation has time to
    /// (wrongly) enter too.
    Dwell(Duration),
    /// Wait inside the window until this many operations are inside, or
    /// give up after [`PROMPT`].
    Rendezvous(usize),
}

impl WindowProbe {
    /// Fresh probe with nobody inside.
    pub fn new(mode: ProbeMode) -> Arc<Self> {
        Arc::new(Self {
            inside: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            mode,
        })
    }

    /// Opens the window for one operation.
    pub fn enter(&self) {
        let now = self.inside.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        match self.mode {
            ProbeMode::Dwell(dwell) => thread::sleep(dwell),
            ProbeMode::Rendezvous(count) => {
                let start = Instant::now();
                while self.inside.load(Ordering::SeqCst) < count && start.elapsed() < PROMPT {
                    thread::sleep(Duration::from_millis(1));
                }
            }
        }
    }

    /// Closes the window for one operation.
    pub fn exit(&self) {
        self.inside.fetch_sub(1, Ordering::SeqCst);
    }

    /// Highest number of operations seen inside the window together.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Hook set wiring all four hooks to this probe.
    pub fn hooks(self: &Arc<Self>) -> FnHooks {
        let (a, b, c, d) = (
            Arc::clone(self),
            Arc::clone(self),
            Arc::clone(self),
            Arc::clone(self),
        );
        FnHooks::new()
            .on_before_rotation(move |_, _| {
                a.enter();
                Ok(())
            })
            .on_after_rotation(move |_, _| {
                b.exit();
                Ok(())
            })
            .on_before_showing(move || {
                c.enter();
                Ok(())
            })
            .on_after_showing(move || {
                d.exit();
                Ok(())
            })
    }
}

/// A single operation to run against a cube.
#[derive(Clone, Copy, Debug)]
pub enum Op {
    /// `rotate(side, layer)`.
    Rotate(usize, usize),
    /// `show()`, result discarded.
    Show,
}

impl Op {
    /// Runs the operation on `cube`.
    pub fn run<H: cube_core::CubeHooks>(self, cube: &cube_core::Cube<H>) -> CubeResult<()> {
        match self {
            Op::Rotate(side, layer) => cube.rotate(side, layer),
            Op::Show => cube.show().map(drop),
        }
    }
}

/// Every pair of requests that name the same physical slice, including a
/// request paired with itself.
pub fn same_slice_pairs(size: usize) -> Vec<(Op, Op)> {
    let mut pairs = Vec::new();
    for side in Side::ALL {
        for layer in 0..size {
            pairs.push((Op::Rotate(side.index(), layer), Op::Rotate(side.index(), layer)));
            pairs.push((
                Op::Rotate(side.index(), layer),
                Op::Rotate(side.opposite().index(), size - 1 - layer),
            ));
        }
    }
    pairs
}
