//! # Cancellation Tests
//!
//! A thread blocked at any lock acquisition point, when cancelled, returns
//! promptly, holds nothing afterwards, never reaches a hook, and later
//! operations still make progress.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use common::PROMPT;
use crossbeam_channel::{bounded, Receiver, Sender};
use cube_core::{CancelToken, Cube, CubeError, CubeResult, FaceletState, FnHooks, Side};

/// Cube whose `before_rotation` parks every rotation of one chosen request
/// until the test lets it go.
struct Stalled {
    cube: Arc<Cube<FnHooks>>,
    entered: Receiver<()>,
    release: Sender<()>,
    hook_calls: Arc<[AtomicUsize; 6]>,
    show_calls: Arc<AtomicUsize>,
}

impl Stalled {
    fn new(size: usize, stall_on: (Side, usize)) -> Self {
        let (entered_tx, entered) = bounded::<()>(16);
        let (release, release_rx) = bounded::<()>(16);
        let hook_calls: Arc<[AtomicUsize; 6]> = Arc::new(Default::default());
        let show_calls = Arc::new(AtomicUsize::new(0));

        let calls = Arc::clone(&hook_calls);
        let shows = Arc::clone(&show_calls);
        let hooks = FnHooks::new()
            .on_before_rotation(move |side, layer| {
                calls[side.index()].fetch_add(1, Ordering::SeqCst);
                if (side, layer) == stall_on {
                    entered_tx.send(()).unwrap();
                    release_rx.recv().unwrap();
                }
                Ok(())
            })
            .on_before_showing(move || {
                shows.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });

        Self {
            cube: Arc::new(Cube::new(size, hooks).unwrap()),
            entered,
            release,
            hook_calls,
            show_calls,
        }
    }

    /// Starts the stalled rotation and waits until it is parked in its hook.
    fn park(&self, side: usize, layer: usize) -> JoinHandle<CubeResult<()>> {
        let handle = self.spawn_rotate(side, layer, CancelToken::new());
        self.entered.recv_timeout(PROMPT).expect("rotation never reached its hook");
        handle
    }

    fn unpark(&self) {
        self.release.send(()).unwrap();
    }

    fn spawn_rotate(
        &self,
        side: usize,
        layer: usize,
        token: CancelToken,
    ) -> JoinHandle<CubeResult<()>> {
        let cube = Arc::clone(&self.cube);
        thread::spawn(move || cube.rotate_with(side, layer, &token))
    }

    fn spawn_show(&self, token: CancelToken) -> JoinHandle<CubeResult<String>> {
        let cube = Arc::clone(&self.cube);
        thread::spawn(move || cube.show_with(&token))
    }

    fn rotations_seen(&self, side: Side) -> usize {
        self.hook_calls[side.index()].load(Ordering::SeqCst)
    }
}

/// Joins a thread, failing if it takes longer than [`PROMPT`].
fn join_promptly<T: Send + 'static>(handle: JoinHandle<T>) -> T {
    let start = Instant::now();
    while !handle.is_finished() {
        assert!(start.elapsed() < PROMPT, "thread did not finish in time");
        thread::sleep(Duration::from_millis(1));
    }
    handle.join().unwrap()
}

/// Gives a spawned thread time to block on its lock.
fn settle() {
    thread::sleep(Duration::from_millis(50));
}

#[test]
fn test_cancel_rotation_waiting_on_other_axis() {
    let stalled = Stalled::new(3, (Side::Top, 0));
    let parked = stalled.park(0, 0);

    let token = CancelToken::new();
    let blocked = stalled.spawn_rotate(1, 1, token.clone());
    settle();
    assert!(!blocked.is_finished(), "cross-axis rotation did not wait");

    token.cancel();
    assert_eq!(join_promptly(blocked), Err(CubeError::Cancelled));
    assert_eq!(stalled.rotations_seen(Side::Left), 0);

    // Same axis, other slice: needs the setup lock and a touch of the left
    // axis, both of which the cancelled call must have let go.
    let sibling = stalled.spawn_rotate(5, 1, CancelToken::new());
    assert_eq!(join_promptly(sibling), Ok(()));

    stalled.unpark();
    assert_eq!(join_promptly(parked), Ok(()));
    assert!(stalled.cube.is_quiescent());

    let mut model = FaceletState::new(3).unwrap();
    model.apply(0, 0).unwrap();
    model.apply(5, 1).unwrap();
    assert_eq!(stalled.cube.show().unwrap(), model.serialize());
    assert_eq!(stalled.cube.stats().cancelled, 1);
}

#[test]
fn test_cancel_waiter_for_setup_lock() {
    let stalled = Stalled::new(3, (Side::Front, 1));
    let parked = stalled.park(2, 1);

    // Holds the setup lock while it waits for the front/back axis.
    let setup_token = CancelToken::new();
    let holder = stalled.spawn_rotate(0, 2, setup_token.clone());
    settle();

    // Queued behind the holder on the setup lock.
    let queued_token = CancelToken::new();
    let queued = stalled.spawn_show(queued_token.clone());
    settle();
    assert!(!holder.is_finished());
    assert!(!queued.is_finished());

    queued_token.cancel();
    assert_eq!(join_promptly(queued), Err(CubeError::Cancelled));
    assert!(!holder.is_finished(), "holder must still be waiting");

    setup_token.cancel();
    assert_eq!(join_promptly(holder), Err(CubeError::Cancelled));

    stalled.unpark();
    assert_eq!(join_promptly(parked), Ok(()));
    assert!(stalled.cube.is_quiescent());
    assert_eq!(stalled.rotations_seen(Side::Top), 0);
    assert_eq!(stalled.show_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_cancel_show_waiting_for_rotation() {
    let stalled = Stalled::new(4, (Side::Right, 3));
    let parked = stalled.park(3, 3);

    let token = CancelToken::new();
    let show = stalled.spawn_show(token.clone());
    settle();
    assert!(!show.is_finished(), "show did not wait for the rotation");

    token.cancel();
    assert_eq!(join_promptly(show), Err(CubeError::Cancelled));
    assert_eq!(stalled.show_calls.load(Ordering::SeqCst), 0);

    // Same axis, other slice: its fence touch would hang if the cancelled
    // show still held the fence.
    let sibling = stalled.spawn_rotate(1, 2, CancelToken::new());
    assert_eq!(join_promptly(sibling), Ok(()));

    stalled.unpark();
    assert_eq!(join_promptly(parked), Ok(()));
    assert!(stalled.cube.is_quiescent());
    assert!(stalled.cube.show().is_ok());
}

#[test]
fn test_cancel_same_slice_waiter() {
    let stalled = Stalled::new(3, (Side::Top, 0));
    let parked = stalled.park(0, 0);

    // Bottom layer 2 is the slice the parked rotation holds.
    let token = CancelToken::new();
    let waiter = stalled.spawn_rotate(5, 2, token.clone());
    settle();
    assert!(!waiter.is_finished());

    token.cancel();
    assert_eq!(join_promptly(waiter), Err(CubeError::Cancelled));
    assert_eq!(stalled.rotations_seen(Side::Bottom), 0);

    let sibling = stalled.spawn_rotate(5, 1, CancelToken::new());
    assert_eq!(join_promptly(sibling), Ok(()));

    stalled.unpark();
    assert_eq!(join_promptly(parked), Ok(()));

    // The slice is free again.
    stalled.cube.rotate(5, 2).unwrap();
    assert!(stalled.cube.is_quiescent());
}

#[test]
fn test_cancel_rotation_waiting_on_fence() {
    let (entered_tx, entered) = bounded::<()>(1);
    let (release, release_rx) = bounded::<()>(1);
    let rotations_seen = Arc::new(AtomicUsize::new(0));

    let seen = Arc::clone(&rotations_seen);
    let hooks = FnHooks::new()
        .on_before_rotation(move |_, _| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .on_before_showing(move || {
            entered_tx.send(()).unwrap();
            release_rx.recv().unwrap();
            Ok(())
        });
    let cube = Arc::new(Cube::new(3, hooks).unwrap());

    let parked_show = {
        let cube = Arc::clone(&cube);
        thread::spawn(move || cube.show())
    };
    entered.recv_timeout(PROMPT).expect("show never reached its hook");

    // Every axis is free, so the rotation gets as far as the fence.
    let token = CancelToken::new();
    let blocked = {
        let cube = Arc::clone(&cube);
        let token = token.clone();
        thread::spawn(move || cube.rotate_with(0, 0, &token))
    };
    settle();
    assert!(!blocked.is_finished(), "rotation did not wait for the snapshot");

    let start = Instant::now();
    token.cancel();
    assert_eq!(join_promptly(blocked), Err(CubeError::Cancelled));
    assert!(start.elapsed() < PROMPT);
    assert_eq!(rotations_seen.load(Ordering::SeqCst), 0);

    release.send(()).unwrap();
    let shown = join_promptly(parked_show).unwrap();
    assert_eq!(shown, FaceletState::new(3).unwrap().serialize());
    assert!(cube.is_quiescent());
    assert_eq!(cube.stats().cancelled, 1);
}

#[test]
fn test_panicking_hook_releases_locks() {
    let hooks = FnHooks::new().on_before_rotation(|side, _| {
        assert_ne!(side, Side::Back, "hook blew up");
        Ok(())
    });
    let cube = Arc::new(Cube::new(3, hooks).unwrap());

    let doomed = {
        let cube = Arc::clone(&cube);
        thread::spawn(move || cube.rotate(4, 0))
    };
    assert!(doomed.join().is_err());

    assert!(cube.is_quiescent());
    cube.rotate(0, 0).unwrap();
    cube.rotate(3, 1).unwrap();
    assert!(cube.is_quiescent());
    assert_eq!(cube.show().unwrap().len(), 54);
}

#[test]
fn test_hook_reported_cancellation_is_surfaced() {
    let token = CancelToken::new();
    let hook_token = token.clone();
    let hooks = FnHooks::new().on_before_showing(move || hook_token.check());
    let cube = Cube::new(2, hooks).unwrap();

    assert!(cube.show().is_ok());
    token.cancel();
    assert_eq!(cube.show(), Err(CubeError::Cancelled));
    assert!(cube.is_quiescent());
    assert_eq!(cube.stats().shows, 1);
    assert_eq!(cube.stats().cancelled, 1);
}
