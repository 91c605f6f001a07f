//! String neighborhood strategy
//!
//! The most elaborate strategy: a sensitivity probe followed by three
//! character-level phases (removal, replacement, insertion), each running
//! the same transactional mutate/evaluate/accept-or-revert loop against the
//! objective. Phases run strictly in sequence; any of them may be cut short
//! by budget exhaustion but they are never reordered.

use rand::Rng;
use tracing::{debug, trace};

use crate::budget::SearchBudget;
use crate::config::SearchConfig;
use crate::objective::{FitnessChange, LocalSearchObjective};
use crate::search::BackupRecord;
use crate::testcase::{PrimitiveValue, TestCase};

/// Where a grow pass inserts its new character
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GrowEnd {
    Back,
    Front,
}

/// Run the full string search on the statement at `index`
///
/// Returns true iff the removal, replacement or insertion phase accepted at
/// least one improvement. Probe adoptions alone do not count: without an
/// accepted improvement the search reports false even when the baseline
/// shifted during probing.
#[allow(clippy::too_many_arguments)]
pub(crate) fn search<O, R>(
    test: &mut TestCase,
    index: usize,
    baseline: String,
    objective: &mut O,
    budget: &SearchBudget,
    config: &SearchConfig,
    rng: &mut R,
    backup: &mut BackupRecord,
) -> bool
where
    O: LocalSearchObjective,
    R: Rng,
{
    let mut baseline = baseline;

    if !probe_sensitivity(
        test,
        index,
        objective,
        budget,
        config,
        rng,
        backup,
        &mut baseline,
    ) {
        trace!(value = %PrimitiveValue::Str(baseline), "string does not affect fitness, skipping");
        return false;
    }

    debug!(value = %PrimitiveValue::Str(baseline.clone()), "applying character-level search");

    let mut improved = false;
    if remove_characters(test, index, objective, budget, backup, &mut baseline) {
        improved = true;
    }
    if replace_characters(test, index, objective, budget, config, backup, &mut baseline) {
        improved = true;
    }
    if insert_characters(test, index, objective, budget, config, backup, &mut baseline) {
        improved = true;
    }

    debug!(value = %PrimitiveValue::Str(baseline), improved, "string search finished");
    improved
}

/// Phase 0: establish whether the string influences the objective at all
///
/// Character-level search is only worth its cost once sensitivity is
/// established; up to `probe_attempts` random mutations are tried, and the
/// loop ends at the first one with any observable effect. A favorable
/// change is adopted as the new baseline, everything else is reverted.
#[allow(clippy::too_many_arguments)]
fn probe_sensitivity<O, R>(
    test: &mut TestCase,
    index: usize,
    objective: &mut O,
    budget: &SearchBudget,
    config: &SearchConfig,
    rng: &mut R,
    backup: &mut BackupRecord,
    baseline: &mut String,
) -> bool
where
    O: LocalSearchObjective,
    R: Rng,
{
    for attempt in 0..config.probe_attempts {
        if budget.is_finished() {
            return false;
        }

        let candidate = if rng.gen_bool(0.5) {
            successor_string(baseline, config)
        } else {
            random_string(config, rng)
        };
        trace!(attempt, from = %PrimitiveValue::Str(baseline.clone()),
               to = %PrimitiveValue::Str(candidate.clone()), "probing string");

        test.set_value(index, candidate.clone());
        let change = objective.has_changed(test);
        if change == FitnessChange::Favorable {
            *baseline = candidate;
            backup.commit(test, index);
        } else {
            backup.rollback(test, index);
        }
        if change.is_change() {
            debug!("string affects fitness");
            return true;
        }
    }
    false
}

/// Phase 1: try to remove each character of the baseline
///
/// Positions are scanned from last to first: an accepted deletion shortens
/// the string, and descending order keeps every not-yet-visited index valid
/// without re-indexing.
fn remove_characters<O>(
    test: &mut TestCase,
    index: usize,
    objective: &mut O,
    budget: &SearchBudget,
    backup: &mut BackupRecord,
    baseline: &mut String,
) -> bool
where
    O: LocalSearchObjective,
{
    let mut improvement = false;

    let mut position = baseline.chars().count();
    while position > 0 {
        position -= 1;
        if budget.is_finished() {
            break;
        }

        let candidate: String = baseline
            .chars()
            .enumerate()
            .filter(|(i, _)| *i != position)
            .map(|(_, c)| c)
            .collect();
        trace!(position, from = %PrimitiveValue::Str(baseline.clone()),
               to = %PrimitiveValue::Str(candidate.clone()), "removing character");

        test.set_value(index, candidate.clone());
        if objective.has_improved(test) {
            *baseline = candidate;
            backup.commit(test, index);
            improvement = true;
        } else {
            backup.rollback(test, index);
        }
    }

    improvement
}

/// Phase 2: try replacing each character with every other candidate
///
/// First-improvement per index: the first replacement the objective accepts
/// ends the scan for that index. Exhaustive best-improvement would cost up
/// to the full character range per index with no guaranteed further gain.
fn replace_characters<O>(
    test: &mut TestCase,
    index: usize,
    objective: &mut O,
    budget: &SearchBudget,
    config: &SearchConfig,
    backup: &mut BackupRecord,
    baseline: &mut String,
) -> bool
where
    O: LocalSearchObjective,
{
    let mut improvement = false;

    let mut position = 0;
    while position < baseline.chars().count() {
        let chars: Vec<char> = baseline.chars().collect();
        let current = chars[position];
        trace!(position, %current, "replacing character");

        for replacement in config.char_range() {
            if budget.is_finished() {
                return improvement;
            }
            if replacement == current {
                continue;
            }

            let mut candidate_chars = chars.clone();
            candidate_chars[position] = replacement;
            let candidate: String = candidate_chars.into_iter().collect();

            test.set_value(index, candidate.clone());
            if objective.has_improved(test) {
                *baseline = candidate;
                backup.commit(test, index);
                improvement = true;
                break;
            }
            backup.rollback(test, index);
        }
        position += 1;
    }

    improvement
}

/// Phase 3: grow the string one character at a time, while it keeps improving
///
/// Two independent passes: append at the end, then prepend at the front,
/// starting from whatever baseline the append pass left behind.
fn insert_characters<O>(
    test: &mut TestCase,
    index: usize,
    objective: &mut O,
    budget: &SearchBudget,
    config: &SearchConfig,
    backup: &mut BackupRecord,
    baseline: &mut String,
) -> bool
where
    O: LocalSearchObjective,
{
    let mut improvement = false;

    for end in [GrowEnd::Back, GrowEnd::Front] {
        while grow_once(test, index, objective, budget, config, backup, baseline, end) {
            improvement = true;
        }
    }

    improvement
}

/// One grow attempt: try every candidate character at the given end,
/// first-improvement. Returns whether the baseline grew.
#[allow(clippy::too_many_arguments)]
fn grow_once<O>(
    test: &mut TestCase,
    index: usize,
    objective: &mut O,
    budget: &SearchBudget,
    config: &SearchConfig,
    backup: &mut BackupRecord,
    baseline: &mut String,
    end: GrowEnd,
) -> bool
where
    O: LocalSearchObjective,
{
    for insertion in config.char_range() {
        if budget.is_finished() {
            return false;
        }

        let candidate = match end {
            GrowEnd::Back => {
                let mut s = baseline.clone();
                s.push(insertion);
                s
            }
            GrowEnd::Front => {
                let mut s = String::with_capacity(baseline.len() + insertion.len_utf8());
                s.push(insertion);
                s.push_str(baseline);
                s
            }
        };

        test.set_value(index, candidate.clone());
        if objective.has_improved(test) {
            trace!(?end, to = %PrimitiveValue::Str(candidate.clone()), "grew string");
            *baseline = candidate;
            backup.commit(test, index);
            return true;
        }
        backup.rollback(test, index);
    }
    false
}

/// Canonical successor of a string: bump the last character to the next one
/// in the candidate range (wrapping); an empty string gains one character.
fn successor_string(s: &str, config: &SearchConfig) -> String {
    let mut chars: Vec<char> = s.chars().collect();
    match chars.pop() {
        Some(c) => chars.push(next_char_in_range(c, config)),
        None => chars.push(config.char_min),
    }
    chars.into_iter().collect()
}

fn next_char_in_range(c: char, config: &SearchConfig) -> char {
    let next = char::from_u32(c as u32 + 1).unwrap_or(config.char_min);
    if c < config.char_min || next >= config.char_max {
        config.char_min
    } else {
        next
    }
}

/// A fresh random string over the candidate character range
fn random_string<R: Rng>(config: &SearchConfig, rng: &mut R) -> String {
    let len = rng.gen_range(1..=config.random_string_max_len);
    (0..len)
        .map(|_| rng.gen_range(config.char_min..config.char_max))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::refine;
    use crate::testcase::ExecutionResult;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    /// Objective that improves exactly when the string value reaches the
    /// next unreached stage, and reports every probe as an unfavorable
    /// change (sensitive, but nothing adopted during probing).
    struct StagedObjective {
        stages: Vec<&'static str>,
        reached: usize,
        evaluated: Vec<String>,
        budget: Option<Arc<SearchBudget>>,
    }

    impl StagedObjective {
        fn new(stages: Vec<&'static str>) -> Self {
            Self {
                stages,
                reached: 0,
                evaluated: Vec::new(),
                budget: None,
            }
        }

        fn with_budget(stages: Vec<&'static str>, budget: Arc<SearchBudget>) -> Self {
            Self {
                budget: Some(budget),
                ..Self::new(stages)
            }
        }

        fn record(&mut self, test: &mut TestCase) -> String {
            let value = test.string_value(0).unwrap().to_owned();
            self.evaluated.push(value.clone());
            if let Some(budget) = &self.budget {
                budget.record_evaluation();
            }
            test.set_last_result(Some(ExecutionResult::passed(
                (self.stages.len() - self.reached) as f64,
            )));
            test.set_changed(false);
            value
        }
    }

    impl LocalSearchObjective for StagedObjective {
        fn has_improved(&mut self, test: &mut TestCase) -> bool {
            let value = self.record(test);
            if self.reached < self.stages.len() && value == self.stages[self.reached] {
                self.reached += 1;
                true
            } else {
                false
            }
        }

        fn has_changed(&mut self, test: &mut TestCase) -> FitnessChange {
            self.record(test);
            FitnessChange::Unfavorable
        }
    }

    /// Objective whose `has_changed` never observes an effect.
    struct UnaffectedObjective {
        changed_calls: usize,
        improved_calls: usize,
    }

    impl LocalSearchObjective for UnaffectedObjective {
        fn has_improved(&mut self, test: &mut TestCase) -> bool {
            self.improved_calls += 1;
            test.set_changed(false);
            false
        }

        fn has_changed(&mut self, test: &mut TestCase) -> FitnessChange {
            self.changed_calls += 1;
            test.set_changed(false);
            FitnessChange::None
        }
    }

    fn run_refine<O: LocalSearchObjective>(
        value: &str,
        objective: &mut O,
        budget: &SearchBudget,
    ) -> (bool, TestCase) {
        let mut test = TestCase::from_values([value]);
        let config = SearchConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        let improved = refine(&mut test, 0, objective, budget, &config, &mut rng);
        (improved, test)
    }

    #[test]
    fn test_probe_finds_no_effect() {
        let mut objective = UnaffectedObjective {
            changed_calls: 0,
            improved_calls: 0,
        };
        let budget = SearchBudget::unlimited();
        let (improved, test) = run_refine("x", &mut objective, &budget);

        assert!(!improved);
        assert_eq!(test.string_value(0).unwrap(), "x");
        assert_eq!(objective.changed_calls, SearchConfig::default().probe_attempts);
        assert_eq!(objective.improved_calls, 0);
    }

    #[test]
    fn test_replacement_accepts_first_improving_character() {
        let mut objective = StagedObjective::new(vec!["zb"]);
        let budget = SearchBudget::unlimited();
        let (improved, test) = run_refine("ab", &mut objective, &budget);

        assert!(improved);
        assert_eq!(test.string_value(0).unwrap(), "zb");

        // First-improvement: once "zb" is accepted at index 0, the code
        // points past 'z' are never tried there. evaluated[0] is the probe
        // candidate, which is random; skip it.
        for c in '{'..'\u{7f}' {
            let skipped = format!("{c}b");
            assert!(
                !objective.evaluated[1..].contains(&skipped),
                "tried {skipped:?} past the first improvement"
            );
        }
    }

    #[test]
    fn test_append_grows_only_while_improving() {
        let mut objective = StagedObjective::new(vec!["a", "ab"]);
        let budget = SearchBudget::unlimited();
        let (improved, test) = run_refine("", &mut objective, &budget);

        assert!(improved);
        assert_eq!(test.string_value(0).unwrap(), "ab");
        assert_eq!(objective.reached, 2);

        // The growth loop stops after a full scan fails on "ab"; no
        // three-character candidate is ever accepted. evaluated[0] is the
        // random probe candidate; skip it.
        assert!(objective.evaluated[1..].iter().all(|s| s.chars().count() <= 3));
    }

    #[test]
    fn test_removal_scans_descending() {
        // From "cat", the first deletion candidate drops the final
        // character.
        let mut objective = StagedObjective::new(vec!["ca"]);
        let budget = SearchBudget::unlimited();
        let (improved, test) = run_refine("cat", &mut objective, &budget);

        assert!(improved);
        // "ca" accepted during removal; later phases find nothing more.
        assert_eq!(test.string_value(0).unwrap(), "ca");

        // The probe evaluates one candidate (unfavorable, reverted), then
        // removal starts at the last position.
        assert_eq!(objective.evaluated[1], "ca");
        assert_eq!(objective.evaluated[2], "c");
        assert_eq!(objective.evaluated[3], "a");
    }

    #[test]
    fn test_budget_cuts_off_mid_phase() {
        // One probe evaluation plus two removal candidates, then the cap
        // trips and every remaining phase is skipped.
        let budget = Arc::new(SearchBudget::with_max_evaluations(3));
        let mut objective = StagedObjective::with_budget(vec!["zzzz"], Arc::clone(&budget));
        let (improved, test) = run_refine("abcdef", &mut objective, &budget);

        assert!(!improved);
        assert_eq!(test.string_value(0).unwrap(), "abcdef");
        assert_eq!(objective.evaluated.len(), 3);
    }

    #[test]
    fn test_exhausted_budget_means_zero_evaluations() {
        let mut objective = StagedObjective::new(vec!["zzzz"]);
        let budget = SearchBudget::unlimited();
        budget.exhaust();
        let (improved, test) = run_refine("abcdef", &mut objective, &budget);

        assert!(!improved);
        assert_eq!(test.string_value(0).unwrap(), "abcdef");
        assert!(objective.evaluated.is_empty());
    }

    #[test]
    fn test_successor_string() {
        let config = SearchConfig::default();
        assert_eq!(successor_string("ab", &config), "ac");
        assert_eq!(successor_string("", &config), "\t");
        // Last character of the range wraps to the first.
        assert_eq!(successor_string("a~", &config), "a\t");
        // Characters outside the range restart at the range minimum.
        assert_eq!(successor_string("a\u{1f600}", &config), "a\t");
    }

    #[test]
    fn test_random_string_respects_config() {
        let config = SearchConfig {
            random_string_max_len: 5,
            ..SearchConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..100 {
            let s = random_string(&config, &mut rng);
            let len = s.chars().count();
            assert!((1..=5).contains(&len));
            assert!(s.chars().all(|c| c >= config.char_min && c < config.char_max));
        }
    }
}
