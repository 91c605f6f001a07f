//! Fitness objective contract
//!
//! The search never computes fitness itself; it asks an externally supplied
//! objective whether a candidate mutation helped, hurt, or did anything at
//! all. Both queries execute the test case and are assumed arbitrarily
//! expensive, so every strategy is designed around minimizing the number of
//! calls.

use crate::budget::SearchBudget;
use crate::testcase::{ExecutionResult, TestCase};

/// Sign-bearing indicator of whether a mutation moved the fitness signal
///
/// Returned by [`LocalSearchObjective::has_changed`] during sensitivity
/// probing. The probe adopts a `Favorable` mutation as its new baseline and
/// reverts anything else; any non-`None` result proves the value is
/// *affected* (it measurably influences the objective) and ends the probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FitnessChange {
    /// Fitness moved in the direction worth keeping as the new baseline
    Favorable,
    /// No observable effect on fitness
    None,
    /// Fitness moved, but not in a direction worth keeping
    Unfavorable,
}

impl FitnessChange {
    /// Map a raw signed delta to a change indicator
    ///
    /// Pins the sign convention of the surrounding system: a negative delta
    /// (fitness decreased, under the minimizing convention) is the one worth
    /// adopting. Objectives built on a raw comparison should go through this
    /// constructor rather than matching on signs themselves.
    pub fn from_signum(delta: i64) -> Self {
        match delta.signum() {
            -1 => FitnessChange::Favorable,
            0 => FitnessChange::None,
            _ => FitnessChange::Unfavorable,
        }
    }

    /// Whether the mutation had any observable effect
    pub fn is_change(self) -> bool {
        self != FitnessChange::None
    }
}

/// Oracle answering whether a candidate mutation improved the test case
///
/// Both queries are impure: they execute the test case and refresh its
/// execution snapshot ([`TestCase::set_last_result`]) and dirty flag. A
/// crash of the code under test is recorded in the snapshot, never raised;
/// whether a crashing candidate counts as an improvement is entirely the
/// objective's call.
pub trait LocalSearchObjective {
    /// Execute the test case and report whether the current mutated state is
    /// strictly better than the previous accepted state
    fn has_improved(&mut self, test: &mut TestCase) -> bool;

    /// Execute the test case and report whether (and in which direction)
    /// fitness moved, without implying "improved"
    ///
    /// Used only by the sensitivity probe.
    fn has_changed(&mut self, test: &mut TestCase) -> FitnessChange;
}

/// Objective over a fitness-minimizing executor function
///
/// Wraps a closure that executes the test case and reports an
/// [`ExecutionResult`]; lower fitness is better, zero typically meaning the
/// coverage goal is reached. Keeps the fitness of the last accepted baseline
/// and compares candidates strictly against it.
///
/// When built with [`MinimizingObjective::with_budget`], every execution of
/// the wrapped closure is recorded against the budget, so an evaluation cap
/// set via [`SearchBudget::with_max_evaluations`] actually bounds the
/// search.
pub struct MinimizingObjective<'b, E>
where
    E: FnMut(&TestCase) -> ExecutionResult,
{
    execute: E,
    baseline_fitness: f64,
    budget: Option<&'b SearchBudget>,
}

impl<'b, E> MinimizingObjective<'b, E>
where
    E: FnMut(&TestCase) -> ExecutionResult,
{
    /// Create an objective, executing the test case once to seed the
    /// baseline fitness
    pub fn new(execute: E, test: &mut TestCase) -> Self {
        Self::build(execute, test, None)
    }

    /// Like [`MinimizingObjective::new`], but records every execution of the
    /// closure against `budget`, the seeding execution included
    pub fn with_budget(execute: E, test: &mut TestCase, budget: &'b SearchBudget) -> Self {
        Self::build(execute, test, Some(budget))
    }

    fn build(mut execute: E, test: &mut TestCase, budget: Option<&'b SearchBudget>) -> Self {
        let result = execute(test);
        if let Some(budget) = budget {
            budget.record_evaluation();
        }
        let baseline_fitness = result.fitness;
        test.set_last_result(Some(result));
        test.set_changed(false);
        Self {
            execute,
            baseline_fitness,
            budget,
        }
    }

    /// Fitness of the last accepted baseline
    pub fn baseline_fitness(&self) -> f64 {
        self.baseline_fitness
    }

    fn run(&mut self, test: &mut TestCase) -> f64 {
        let result = (self.execute)(test);
        if let Some(budget) = self.budget {
            budget.record_evaluation();
        }
        let fitness = result.fitness;
        test.set_last_result(Some(result));
        test.set_changed(false);
        fitness
    }
}

impl<E> LocalSearchObjective for MinimizingObjective<'_, E>
where
    E: FnMut(&TestCase) -> ExecutionResult,
{
    fn has_improved(&mut self, test: &mut TestCase) -> bool {
        let fitness = self.run(test);
        if fitness < self.baseline_fitness {
            self.baseline_fitness = fitness;
            true
        } else {
            false
        }
    }

    fn has_changed(&mut self, test: &mut TestCase) -> FitnessChange {
        let fitness = self.run(test);
        let change = if fitness < self.baseline_fitness {
            FitnessChange::Favorable
        } else if fitness > self.baseline_fitness {
            FitnessChange::Unfavorable
        } else {
            FitnessChange::None
        };
        if change == FitnessChange::Favorable {
            self.baseline_fitness = fitness;
        }
        change
    }
}
