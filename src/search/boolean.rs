//! Boolean neighborhood strategy
//!
//! The neighborhood is a single candidate: the negation.

use crate::budget::SearchBudget;
use crate::objective::LocalSearchObjective;
use crate::search::BackupRecord;
use crate::testcase::TestCase;

/// Run the boolean search on the statement at `index`
pub(crate) fn search<O>(
    test: &mut TestCase,
    index: usize,
    baseline: bool,
    objective: &mut O,
    budget: &SearchBudget,
    backup: &mut BackupRecord,
) -> bool
where
    O: LocalSearchObjective,
{
    if budget.is_finished() {
        return false;
    }

    test.set_value(index, !baseline);
    if objective.has_improved(test) {
        backup.commit(test, index);
        true
    } else {
        backup.rollback(test, index);
        false
    }
}
