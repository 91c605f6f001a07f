//! Integer neighborhood strategy
//!
//! The neighborhood is totally ordered, so no sensitivity probe is needed:
//! both unit steps, an accelerating climb in any improving direction, and
//! the sign flip are exhausted directly with `has_improved`.

use tracing::trace;

use crate::budget::SearchBudget;
use crate::objective::LocalSearchObjective;
use crate::search::BackupRecord;
use crate::testcase::TestCase;

/// Run the integer search on the statement at `index`
pub(crate) fn search<O>(
    test: &mut TestCase,
    index: usize,
    baseline: i64,
    objective: &mut O,
    budget: &SearchBudget,
    backup: &mut BackupRecord,
) -> bool
where
    O: LocalSearchObjective,
{
    let mut baseline = baseline;
    let mut improvement = climb_passes(test, index, objective, budget, backup, &mut baseline);

    if try_sign_flip(test, index, objective, budget, backup, &mut baseline) {
        improvement = true;
        // The flip landed in new territory; climb again from there.
        climb_passes(test, index, objective, budget, backup, &mut baseline);
    }

    improvement
}

/// Repeat unit-step passes in both directions until a full pass fails
fn climb_passes<O>(
    test: &mut TestCase,
    index: usize,
    objective: &mut O,
    budget: &SearchBudget,
    backup: &mut BackupRecord,
    baseline: &mut i64,
) -> bool
where
    O: LocalSearchObjective,
{
    let mut improvement = false;
    loop {
        let mut improved_this_pass = false;
        for direction in [1i64, -1] {
            if climb(test, index, objective, budget, backup, baseline, direction) {
                improved_this_pass = true;
            }
        }
        if !improved_this_pass {
            break;
        }
        improvement = true;
    }
    improvement
}

/// Take one unit step in `direction`; on improvement, keep going with
/// doubling deltas while the objective keeps accepting
fn climb<O>(
    test: &mut TestCase,
    index: usize,
    objective: &mut O,
    budget: &SearchBudget,
    backup: &mut BackupRecord,
    baseline: &mut i64,
    direction: i64,
) -> bool
where
    O: LocalSearchObjective,
{
    if !try_step(test, index, objective, budget, backup, baseline, direction) {
        return false;
    }

    let mut delta = 2i64;
    while try_step(
        test,
        index,
        objective,
        budget,
        backup,
        baseline,
        direction.saturating_mul(delta),
    ) {
        delta = delta.saturating_mul(2);
    }
    true
}

/// Evaluate `baseline + delta`; commit on improvement, roll back otherwise
fn try_step<O>(
    test: &mut TestCase,
    index: usize,
    objective: &mut O,
    budget: &SearchBudget,
    backup: &mut BackupRecord,
    baseline: &mut i64,
    delta: i64,
) -> bool
where
    O: LocalSearchObjective,
{
    if budget.is_finished() {
        return false;
    }
    let Some(candidate) = baseline.checked_add(delta) else {
        return false;
    };

    test.set_value(index, candidate);
    if objective.has_improved(test) {
        trace!(from = *baseline, to = candidate, "integer step accepted");
        *baseline = candidate;
        backup.commit(test, index);
        true
    } else {
        backup.rollback(test, index);
        false
    }
}

fn try_sign_flip<O>(
    test: &mut TestCase,
    index: usize,
    objective: &mut O,
    budget: &SearchBudget,
    backup: &mut BackupRecord,
    baseline: &mut i64,
) -> bool
where
    O: LocalSearchObjective,
{
    if budget.is_finished() {
        return false;
    }
    let Some(candidate) = baseline.checked_neg() else {
        return false;
    };
    if candidate == *baseline {
        return false;
    }

    test.set_value(index, candidate);
    if objective.has_improved(test) {
        trace!(from = *baseline, to = candidate, "integer sign flip accepted");
        *baseline = candidate;
        backup.commit(test, index);
        true
    } else {
        backup.rollback(test, index);
        false
    }
}
