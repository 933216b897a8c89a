//! One-shot scheduled callbacks on the single interaction loop
//!
//! Timers are plain data: the scheduler hands back whatever payload was
//! scheduled once the clock passes its deadline. Each timer also carries
//! the owner's generation at scheduling time so the owner can discard
//! callbacks that belong to a superseded gesture.

use serde::{Deserialize, Serialize};

/// Slack when comparing the clock against a deadline, so summed fixed
/// steps that land a hair short of a whole second still fire on time
const DEADLINE_EPSILON: f64 = 1e-9;

/// Handle to a scheduled timer; cancelling it is always safe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle {
    id: u64,
}

/// A timer whose deadline has passed
#[derive(Debug, Clone, PartialEq)]
pub struct Fired<E> {
    pub handle: TimerHandle,
    pub generation: u64,
    pub event: E,
}

#[derive(Debug, Clone)]
struct Pending<E> {
    id: u64,
    deadline: f64,
    generation: u64,
    event: E,
}

/// Single-threaded one-shot timer queue driven by an explicit clock
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    /// Seconds since the scheduler was created
    now: f64,
    next_id: u64,
    /// Sorted by (deadline, id) so same-deadline timers fire in order
    pending: Vec<Pending<E>>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_id: 1,
            pending: Vec::new(),
        }
    }

    /// Current clock (seconds)
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Schedule `event` to fire `delay` seconds from now
    pub fn schedule(&mut self, delay: f64, generation: u64, event: E) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;

        let deadline = self.now + delay.max(0.0);
        let idx = self
            .pending
            .partition_point(|p| (p.deadline, p.id) <= (deadline, id));
        self.pending.insert(
            idx,
            Pending {
                id,
                deadline,
                generation,
                event,
            },
        );

        TimerHandle { id }
    }

    /// Cancel a timer. Returns whether it was still pending; cancelling a
    /// fired or already-cancelled timer does nothing.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.pending.iter().position(|p| p.id == handle.id) {
            Some(idx) => {
                self.pending.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Seconds until the timer fires, if it is still pending
    pub fn remaining(&self, handle: TimerHandle) -> Option<f64> {
        self.pending
            .iter()
            .find(|p| p.id == handle.id)
            .map(|p| (p.deadline - self.now).max(0.0))
    }

    /// Move the clock forward by `dt` seconds and return every timer that
    /// came due, in deadline order
    pub fn advance(&mut self, dt: f64) -> Vec<Fired<E>> {
        self.now += dt.max(0.0);

        let due = self
            .pending
            .partition_point(|p| p.deadline <= self.now + DEADLINE_EPSILON);

        self.pending
            .drain(..due)
            .map(|p| Fired {
                handle: TimerHandle { id: p.id },
                generation: p.generation,
                event: p.event,
            })
            .collect()
    }
}
