//! Search budget
//!
//! A shared, cooperatively polled exhaustion signal. One budget instance is
//! created per process (or per search phase by an external scheduler) and
//! handed by reference to every refinement call; the search only ever polls
//! it, never advances it.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Cooperative cancellation budget for local search
///
/// Internally atomic, so concurrent workers can poll it without any
/// external synchronization. Exhaustion is latched: once [`is_finished`]
/// has reported `true` it keeps reporting `true` until an external
/// scheduler calls [`reset`].
///
/// Cancellation is advisory. A strategy must stop issuing new candidate
/// evaluations at the first failed poll, but still completes its final
/// accept/revert bookkeeping so the test case is left consistent.
///
/// [`is_finished`]: SearchBudget::is_finished
/// [`reset`]: SearchBudget::reset
#[derive(Debug)]
pub struct SearchBudget {
    tripped: AtomicBool,
    evaluations: AtomicU64,
    /// 0 means unlimited
    max_evaluations: u64,
    time_limit: Option<Duration>,
    started: Instant,
}

impl SearchBudget {
    /// Create an unlimited budget (finishes only via [`exhaust`])
    ///
    /// [`exhaust`]: SearchBudget::exhaust
    pub fn unlimited() -> Self {
        Self {
            tripped: AtomicBool::new(false),
            evaluations: AtomicU64::new(0),
            max_evaluations: 0,
            time_limit: None,
            started: Instant::now(),
        }
    }

    /// Create a budget that exhausts after `max` recorded evaluations
    pub fn with_max_evaluations(max: u64) -> Self {
        Self {
            max_evaluations: max,
            ..Self::unlimited()
        }
    }

    /// Create a budget that exhausts once `limit` wall-clock time has passed
    pub fn with_time_limit(limit: Duration) -> Self {
        Self {
            time_limit: Some(limit),
            ..Self::unlimited()
        }
    }

    /// Poll whether the budget is exhausted
    ///
    /// This is the only call the search makes. It never blocks, and it is
    /// monotonic: any triggering condition latches the exhausted state.
    pub fn is_finished(&self) -> bool {
        if self.tripped.load(Ordering::Acquire) {
            return true;
        }
        let exhausted = (self.max_evaluations > 0
            && self.evaluations.load(Ordering::Acquire) >= self.max_evaluations)
            || self
                .time_limit
                .is_some_and(|limit| self.started.elapsed() >= limit);
        if exhausted {
            self.tripped.store(true, Ordering::Release);
        }
        exhausted
    }

    /// Trip the budget manually (external scheduler)
    pub fn exhaust(&self) {
        self.tripped.store(true, Ordering::Release);
    }

    /// Record one candidate evaluation
    ///
    /// Called by objective implementations after each test execution, never
    /// by the search itself.
    pub fn record_evaluation(&self) {
        self.evaluations.fetch_add(1, Ordering::AcqRel);
    }

    /// Number of evaluations recorded so far
    pub fn evaluations(&self) -> u64 {
        self.evaluations.load(Ordering::Acquire)
    }

    /// Clear the latch and the evaluation counter (external scheduler)
    ///
    /// The time anchor is not reset; a scheduler that budgets by wall-clock
    /// time creates a fresh instance per phase instead.
    pub fn reset(&self) {
        self.evaluations.store(0, Ordering::Release);
        self.tripped.store(false, Ordering::Release);
    }
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self::unlimited()
    }
}
