//! Float neighborhood strategy
//!
//! Same skeleton as the integer strategy at unit scale, followed by a
//! fractional refinement pass that tunes one decimal digit at a time.

use tracing::trace;

use crate::budget::SearchBudget;
use crate::config::SearchConfig;
use crate::objective::LocalSearchObjective;
use crate::search::BackupRecord;
use crate::testcase::TestCase;

/// Run the float search on the statement at `index`
pub(crate) fn search<O>(
    test: &mut TestCase,
    index: usize,
    baseline: f64,
    objective: &mut O,
    budget: &SearchBudget,
    config: &SearchConfig,
    backup: &mut BackupRecord,
) -> bool
where
    O: LocalSearchObjective,
{
    let mut baseline = baseline;
    let mut improvement = climb_passes(test, index, objective, budget, backup, &mut baseline);

    let flipped = -baseline;
    if try_candidate(test, index, objective, budget, backup, &mut baseline, flipped) {
        improvement = true;
        climb_passes(test, index, objective, budget, backup, &mut baseline);
    }

    if refine_fraction(test, index, objective, budget, config, backup, &mut baseline) {
        improvement = true;
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
    baseline: &mut f64,
) -> bool
where
    O: LocalSearchObjective,
{
    let mut improvement = false;
    loop {
        let mut improved_this_pass = false;
        for direction in [1.0f64, -1.0] {
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

/// Take one unit step in `direction`, then keep doubling while improving
fn climb<O>(
    test: &mut TestCase,
    index: usize,
    objective: &mut O,
    budget: &SearchBudget,
    backup: &mut BackupRecord,
    baseline: &mut f64,
    direction: f64,
) -> bool
where
    O: LocalSearchObjective,
{
    let first = *baseline + direction;
    if !try_candidate(test, index, objective, budget, backup, baseline, first) {
        return false;
    }

    let mut delta = 2.0f64;
    loop {
        let candidate = *baseline + direction * delta;
        if !try_candidate(test, index, objective, budget, backup, baseline, candidate) {
            break;
        }
        delta *= 2.0;
    }
    true
}

/// Tune one decimal digit at a time, from 0.1 down to the configured
/// precision, stepping repeatedly in each direction while it improves
fn refine_fraction<O>(
    test: &mut TestCase,
    index: usize,
    objective: &mut O,
    budget: &SearchBudget,
    config: &SearchConfig,
    backup: &mut BackupRecord,
    baseline: &mut f64,
) -> bool
where
    O: LocalSearchObjective,
{
    let mut improvement = false;
    for step in 1..=config.float_precision_steps {
        let magnitude = 10f64.powi(-(step as i32));
        for sign in [1.0f64, -1.0] {
            loop {
                let candidate = *baseline + sign * magnitude;
                if !try_candidate(test, index, objective, budget, backup, baseline, candidate) {
                    break;
                }
                improvement = true;
            }
        }
    }
    improvement
}

/// Evaluate one candidate value; commit on improvement, roll back otherwise
fn try_candidate<O>(
    test: &mut TestCase,
    index: usize,
    objective: &mut O,
    budget: &SearchBudget,
    backup: &mut BackupRecord,
    baseline: &mut f64,
    candidate: f64,
) -> bool
where
    O: LocalSearchObjective,
{
    if budget.is_finished() {
        return false;
    }
    if !candidate.is_finite() || candidate == *baseline {
        return false;
    }

    test.set_value(index, candidate);
    if objective.has_improved(test) {
        trace!(from = *baseline, to = candidate, "float step accepted");
        *baseline = candidate;
        backup.commit(test, index);
        true
    } else {
        backup.rollback(test, index);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::MinimizingObjective;
    use crate::search::refine;
    use crate::testcase::{ExecutionResult, PrimitiveValue};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn refine_float(start: f64, target: f64, budget: &SearchBudget) -> (bool, f64) {
        let mut test = TestCase::from_values([PrimitiveValue::Float(start)]);
        let mut objective = MinimizingObjective::new(
            move |test: &TestCase| {
                let value = test.try_value(0).unwrap().as_float().unwrap();
                ExecutionResult::passed((value - target).abs())
            },
            &mut test,
        );
        let config = SearchConfig::default();
        let mut rng = StdRng::seed_from_u64(0);
        let improved = refine(&mut test, 0, &mut objective, budget, &config, &mut rng);
        let value = test.try_value(0).unwrap().as_float().unwrap();
        (improved, value)
    }

    #[test]
    fn test_climbs_to_integral_target() {
        let budget = SearchBudget::unlimited();
        let (improved, value) = refine_float(0.0, 6.0, &budget);
        assert!(improved);
        assert!((value - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_refines_fractional_digits() {
        let budget = SearchBudget::unlimited();
        let (improved, value) = refine_float(0.0, 2.75, &budget);
        assert!(improved);
        assert!((value - 2.75).abs() < 1e-3);
    }

    #[test]
    fn test_already_optimal_is_noop() {
        let budget = SearchBudget::unlimited();
        let (improved, value) = refine_float(1.5, 1.5, &budget);
        assert!(!improved);
        assert_eq!(value, 1.5);
    }

    #[test]
    fn test_exhausted_budget_leaves_value_untouched() {
        let budget = SearchBudget::unlimited();
        budget.exhaust();
        let (improved, value) = refine_float(0.0, 6.0, &budget);
        assert!(!improved);
        assert_eq!(value, 0.0);
    }

    #[test]
    fn test_sign_flip_candidate() {
        // Only the exact negation improves.
        let mut test = TestCase::from_values([PrimitiveValue::Float(42.0)]);
        let mut objective = MinimizingObjective::new(
            |test: &TestCase| {
                let value = test.try_value(0).unwrap().as_float().unwrap();
                let fitness = if value == -42.0 { 0.0 } else { 1.0 };
                ExecutionResult::passed(fitness)
            },
            &mut test,
        );
        let budget = SearchBudget::unlimited();
        let config = SearchConfig::default();
        let mut rng = StdRng::seed_from_u64(0);

        let improved = refine(&mut test, 0, &mut objective, &budget, &config, &mut rng);
        assert!(improved);
        assert_eq!(test.try_value(0).unwrap().as_float(), Some(-42.0));
    }

    #[test]
    fn test_non_finite_baseline_is_noop() {
        let budget = SearchBudget::unlimited();
        let (improved, value) = refine_float(f64::NAN, 0.0, &budget);
        assert!(!improved);
        assert!(value.is_nan());
    }
}
