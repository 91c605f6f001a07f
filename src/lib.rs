//! # local-refine
//!
//! Budget-bounded local-search refinement of the concrete values embedded
//! in generated test cases.
//!
//! Given a test case, a statement index and a fitness objective, the engine
//! hill-climbs the statement's value (string, integer, float or boolean)
//! one candidate mutation at a time: apply, evaluate, accept or revert.
//! Every candidate evaluation is preceded by a poll of a shared
//! [`SearchBudget`](budget::SearchBudget), so unrelated refinement workers
//! cooperatively stop the moment the budget runs out, always leaving the
//! test case in a consistent state.
//!
//! ## Core Concepts
//!
//! - **Transactional mutation**: every candidate is accepted or rolled back
//!   through an explicit backup record; a rejected candidate leaves no trace
//! - **Cooperative cancellation**: the budget is polled, never waited on,
//!   and exhaustion is an ordinary early exit rather than an error
//! - **First-improvement scans**: ordered neighborhoods accept the first
//!   improving candidate instead of paying for an exhaustive best pick
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use local_refine::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let budget = SearchBudget::with_max_evaluations(10_000);
//! let config = SearchConfig::default();
//!
//! let mut test = TestCase::from_values(["hello", "world"]);
//! let mut objective = MinimizingObjective::new(execute_test, &mut test);
//!
//! let improved = refine(&mut test, 0, &mut objective, &budget, &config, &mut rng);
//! ```

pub mod budget;
pub mod config;
pub mod error;
pub mod objective;
pub mod search;
pub mod testcase;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::budget::SearchBudget;
    pub use crate::config::SearchConfig;
    pub use crate::error::*;
    pub use crate::objective::{FitnessChange, LocalSearchObjective, MinimizingObjective};
    pub use crate::search::{refine, BackupRecord};
    pub use crate::testcase::{
        ExecutionResult, PrimitiveValue, Statement, TestCase, TestOutcome, ValueKind,
    };
}
