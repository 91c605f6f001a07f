//! Statement-level local search
//!
//! This module hosts the dispatcher that routes a statement to the
//! neighborhood strategy for its value kind, and the transactional backup
//! record every strategy uses to accept or revert candidate mutations.

use rand::Rng;
use tracing::debug;

use crate::budget::SearchBudget;
use crate::config::SearchConfig;
use crate::objective::LocalSearchObjective;
use crate::testcase::{ExecutionResult, PrimitiveValue, TestCase};

pub mod boolean;
pub mod float;
pub mod integer;
pub mod string;

/// Transactional backup of one statement's state
///
/// Captures the statement value together with the execution snapshot and
/// dirty flag it corresponds to, so the three are always accepted or
/// reverted in lock-step. Owned by the active strategy invocation and
/// passed explicitly into every phase helper.
///
/// Invariant: whenever the search is not mid-candidate, the statement's
/// live value equals this record's value.
#[derive(Clone, Debug)]
pub struct BackupRecord {
    value: PrimitiveValue,
    last_result: Option<ExecutionResult>,
    changed: bool,
}

impl BackupRecord {
    /// Snapshot the current state of the statement at `index`
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range; callers go through [`refine`],
    /// which checks the index up front.
    pub fn capture(test: &TestCase, index: usize) -> Self {
        let statement = test
            .statement(index)
            .unwrap_or_else(|| panic!("statement index {index} out of range"));
        Self {
            value: statement.value().clone(),
            last_result: test.last_result().cloned(),
            changed: test.is_changed(),
        }
    }

    /// Re-snapshot after a candidate has been accepted
    pub fn commit(&mut self, test: &TestCase, index: usize) {
        *self = Self::capture(test, index);
    }

    /// Restore the statement and execution snapshot to the backed-up state
    pub fn rollback(&self, test: &mut TestCase, index: usize) {
        test.set_value(index, self.value.clone());
        test.set_last_result(self.last_result.clone());
        test.set_changed(self.changed);
    }

    /// The backed-up (current baseline) value
    pub fn value(&self) -> &PrimitiveValue {
        &self.value
    }
}

/// Refine the concrete value held by one statement
///
/// Dispatches to the neighborhood strategy for the statement's value kind
/// and returns whether any net improvement was accepted. On return the
/// statement's value and execution snapshot reflect either the best
/// accepted mutation or the original input, even when the budget expires
/// mid-strategy.
///
/// # Panics
///
/// Panics if `statement` is not a valid index into `test`; selecting a
/// refinable statement is the caller's job, so an out-of-range index is a
/// programming error.
pub fn refine<O, R>(
    test: &mut TestCase,
    statement: usize,
    objective: &mut O,
    budget: &SearchBudget,
    config: &SearchConfig,
    rng: &mut R,
) -> bool
where
    O: LocalSearchObjective,
    R: Rng,
{
    assert!(
        statement < test.len(),
        "statement index {statement} out of range for test case of length {}",
        test.len()
    );

    let mut backup = BackupRecord::capture(test, statement);
    debug!(statement, value = %backup.value(), "refining statement");

    match backup.value().clone() {
        PrimitiveValue::Str(baseline) => string::search(
            test, statement, baseline, objective, budget, config, rng, &mut backup,
        ),
        PrimitiveValue::Int(baseline) => {
            integer::search(test, statement, baseline, objective, budget, &mut backup)
        }
        PrimitiveValue::Float(baseline) => float::search(
            test, statement, baseline, objective, budget, config, &mut backup,
        ),
        PrimitiveValue::Bool(baseline) => {
            boolean::search(test, statement, baseline, objective, budget, &mut backup)
        }
    }
}
