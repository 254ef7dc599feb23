//! # Fair Cancellable Shared/Exclusive Lock
//!
//! A FIFO ticket lock with two modes and RAII guards.
//!
//! ## Grant Rules
//!
//! ```text
//!   queue (oldest first):  [S] [S] [X] [S] [X]
//!                           └─┬─┘   │   └── waits for the X ahead of it
//!                  granted together  └── waits for the head of the queue
//! ```
//!
//! - Shared: no exclusive holder, and every waiter queued ahead is shared.
//! - Exclusive: no holder at all, and nobody queued ahead.
//!
//! A stream of shared requests therefore can never starve an exclusive one:
//! once the exclusive request is queued, later shared requests line up
//! behind it.
//!
//! ## Cancellation
//!
//! Waiters re-check their [`CancelToken`] at least once per poll interval.
//! A cancelled waiter leaves the queue, wakes the others (its departure may
//! unblock them) and returns [`CubeError::Cancelled`] holding nothing.

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use crate::error::{CubeError, CubeResult};
use crate::sync::CancelToken;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Shared,
    Exclusive,
}

#[derive(Clone, Copy, Debug)]
struct Waiter {
    ticket: u64,
    mode: Mode,
}

#[derive(Debug, Default)]
struct LockState {
    readers: usize,
    writer: bool,
    queue: VecDeque<Waiter>,
    next_ticket: u64,
}

impl LockState {
    /// Whether a request in `mode` may be granted now. `ticket` is the
    /// caller's queue position; `None` means "behind everyone".
    fn may_grant(&self, ticket: Option<u64>, mode: Mode) -> bool {
        if self.writer {
            return false;
        }
        let mut ahead = self
            .queue
            .iter()
            .take_while(|w| Some(w.ticket) != ticket);
        match mode {
            Mode::Shared => ahead.all(|w| w.mode == Mode::Shared),
            Mode::Exclusive => self.readers == 0 && ahead.next().is_none(),
        }
    }

    fn grant(&mut self, mode: Mode) {
        match mode {
            Mode::Shared => self.readers += 1,
            Mode::Exclusive => self.writer = true,
        }
    }

    fn enqueue(&mut self, mode: Mode) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.queue.push_back(Waiter { ticket, mode });
        ticket
    }

    fn dequeue(&mut self, ticket: u64) {
        self.queue.retain(|w| w.ticket != ticket);
    }
}

/// Point-in-time view of a lock, for diagnostics and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LockStatus {
    /// Number of shared holders.
    pub readers: usize,
    /// Whether an exclusive holder exists.
    pub writer: bool,
    /// Number of queued waiters.
    pub waiters: usize,
}

impl LockStatus {
    /// Nobody holds or waits for the lock.
    #[inline]
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.readers == 0 && !self.writer && self.waiters == 0
    }
}

/// Fair shared/exclusive lock whose waits can be cancelled.
///
/// Protects no data of its own; the guards only encode ownership.
#[derive(Debug)]
pub struct FairLock {
    state: Mutex<LockState>,
    changed: Condvar,
    poll: Duration,
}

impl FairLock {
    /// Creates an unlocked lock. Blocked waiters notice cancellation within
    /// `poll`.
    #[must_use]
    pub fn new(poll: Duration) -> Self {
        Self {
            state: Mutex::new(LockState::default()),
            changed: Condvar::new(),
            poll,
        }
    }

    /// Acquires the lock in shared mode.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::Cancelled`] if `cancel` fires before the lock is
    /// granted; nothing is held in that case.
    pub fn shared(&self, cancel: &CancelToken) -> CubeResult<SharedGuard<'_>> {
        self.acquire(Mode::Shared, cancel)?;
        Ok(SharedGuard { lock: self })
    }

    /// Acquires the lock in exclusive mode.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::Cancelled`] if `cancel` fires before the lock is
    /// granted; nothing is held in that case.
    pub fn exclusive(&self, cancel: &CancelToken) -> CubeResult<ExclusiveGuard<'_>> {
        self.acquire(Mode::Exclusive, cancel)?;
        Ok(ExclusiveGuard { lock: self })
    }

    /// Acquires and immediately releases exclusive mode: blocks until every
    /// holder present or queued at call time has left.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::Cancelled`] if `cancel` fires while waiting.
    pub fn touch_exclusive(&self, cancel: &CancelToken) -> CubeResult<()> {
        drop(self.exclusive(cancel)?);
        Ok(())
    }

    /// Current holders and waiters.
    #[must_use]
    pub fn status(&self) -> LockStatus {
        let state = self.state.lock();
        LockStatus {
            readers: state.readers,
            writer: state.writer,
            waiters: state.queue.len(),
        }
    }

    fn acquire(&self, mode: Mode, cancel: &CancelToken) -> CubeResult<()> {
        cancel.check()?;

        let mut state = self.state.lock();
        if state.may_grant(None, mode) {
            state.grant(mode);
            return Ok(());
        }

        let ticket = state.enqueue(mode);
        loop {
            self.changed.wait_for(&mut state, self.poll);

            if state.may_grant(Some(ticket), mode) {
                state.dequeue(ticket);
                state.grant(mode);
                drop(state);
                // Leaving the queue may let shared waiters behind us in.
                self.changed.notify_all();
                return Ok(());
            }

            if cancel.is_cancelled() {
                state.dequeue(ticket);
                drop(state);
                self.changed.notify_all();
                return Err(CubeError::Cancelled);
            }
        }
    }

    fn release(&self, mode: Mode) {
        let mut state = self.state.lock();
        match mode {
            Mode::Shared => state.readers -= 1,
            Mode::Exclusive => state.writer = false,
        }
        drop(state);
        self.changed.notify_all();
    }
}

/// Shared ownership of a [`FairLock`]. Released on drop.
#[must_use = "the lock is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct SharedGuard<'a> {
    lock: &'a FairLock,
}

impl Drop for SharedGuard<'_> {
    fn drop(&mut self) {
        self.lock.release(Mode::Shared);
    }
}

/// Exclusive ownership of a [`FairLock`]. Released on drop.
#[must_use = "the lock is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ExclusiveGuard<'a> {
    lock: &'a FairLock,
}

impl Drop for ExclusiveGuard<'_> {
    fn drop(&mut self) {
        self.lock.release(Mode::Exclusive);
    }
}
