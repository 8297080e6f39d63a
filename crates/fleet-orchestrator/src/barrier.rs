//! Fixed-party cyclic barrier with a completion hook, standing in for the
//! source's `std::barrier<std::function<void()>>`.
//!
//! Every vehicle worker calls [`SyncBarrier::arrive_and_wait`] at the end of
//! each pipeline stage; once the last party arrives, the completion hook
//! runs once and every waiter is released together. A worker that has
//! failed calls [`SyncBarrier::arrive_and_drop`] instead, permanently
//! shrinking the party count so the remaining workers don't wait on it.

use std::sync::{Condvar, Mutex};

/// What the completion hook decided after the last party arrived at a
/// phase. Mirrors `sync_handler`'s decision to `exit()` the whole process
/// when the accumulated status is critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOutcome {
    Continue,
    AbortWithCode(i32),
}

struct State {
    parties: u32,
    arrived: u32,
    phase: u64,
    aborted: Option<i32>,
}

/// A reusable barrier for a known, shrinkable set of parties.
pub struct SyncBarrier<F>
where
    F: Fn() -> PhaseOutcome + Send + Sync,
{
    state: Mutex<State>,
    condvar: Condvar,
    on_completion: F,
}

impl<F> SyncBarrier<F>
where
    F: Fn() -> PhaseOutcome + Send + Sync,
{
    pub fn new(parties: u32, on_completion: F) -> Self {
        SyncBarrier {
            state: Mutex::new(State { parties, arrived: 0, phase: 0, aborted: None }),
            condvar: Condvar::new(),
            on_completion,
        }
    }

    /// Returns `Some(code)` once any phase's completion hook has decided to
    /// abort; every subsequent `arrive_*` call observes the same code
    /// immediately instead of blocking.
    pub fn aborted_code(&self) -> Option<i32> {
        self.state.lock().unwrap().aborted
    }

    /// Arrive at the current phase and block until every remaining party
    /// has also arrived. Returns the abort code if the completion hook (run
    /// by whichever thread happens to be last) decided to abort.
    pub fn arrive_and_wait(&self) -> Option<i32> {
        let mut state = self.state.lock().unwrap();
        if let Some(code) = state.aborted {
            return Some(code);
        }
        let phase = state.phase;
        state.arrived += 1;

        if state.arrived == state.parties {
            let outcome = (self.on_completion)();
            if let PhaseOutcome::AbortWithCode(code) = outcome {
                state.aborted = Some(code);
            }
            state.arrived = 0;
            state.phase += 1;
            self.condvar.notify_all();
            return state.aborted;
        }

        while state.phase == phase && state.aborted.is_none() {
            state = self.condvar.wait(state).unwrap();
        }
        state.aborted
    }

    /// Leave the barrier permanently: this party no longer counts toward
    /// the total, which may immediately complete the current phase for
    /// everyone still waiting.
    pub fn arrive_and_drop(&self) -> Option<i32> {
        let mut state = self.state.lock().unwrap();
        if let Some(code) = state.aborted {
            return Some(code);
        }
        state.parties = state.parties.saturating_sub(1);
        if state.parties > 0 && state.arrived == state.parties {
            let outcome = (self.on_completion)();
            if let PhaseOutcome::AbortWithCode(code) = outcome {
                state.aborted = Some(code);
            }
            state.arrived = 0;
            state.phase += 1;
            self.condvar.notify_all();
        }
        state.aborted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn all_parties_release_together() {
        let completions = Arc::new(AtomicU32::new(0));
        let completions_clone = completions.clone();
        let barrier = Arc::new(SyncBarrier::new(3, move || {
            completions_clone.fetch_add(1, Ordering::SeqCst);
            PhaseOutcome::Continue
        }));

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let b = barrier.clone();
                thread::spawn(move || b.arrive_and_wait())
            })
            .collect();

        for h in handles {
            assert_eq!(h.join().unwrap(), None);
        }
        assert_eq!(completions.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_a_party_can_complete_the_phase() {
        let barrier = SyncBarrier::new(2, || PhaseOutcome::Continue);
        assert_eq!(barrier.arrive_and_drop(), None);
    }

    #[test]
    fn abort_propagates_to_all_future_arrivals() {
        let barrier = SyncBarrier::new(1, || PhaseOutcome::AbortWithCode(7));
        assert_eq!(barrier.arrive_and_wait(), Some(7));
        assert_eq!(barrier.arrive_and_wait(), Some(7));
    }
}
