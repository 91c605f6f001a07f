//! Test case model
//!
//! This module provides the statement-level view of a generated test case
//! that the local search operates on: an ordered sequence of statements,
//! each carrying one concrete primitive value, plus the snapshot of the
//! last execution outcome.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StatementError;

/// Discriminant for the kinds of values a statement can hold
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// A string value
    Str,
    /// A signed integer value
    Int,
    /// A floating point value
    Float,
    /// A boolean value
    Bool,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Str => "string",
            ValueKind::Int => "integer",
            ValueKind::Float => "float",
            ValueKind::Bool => "boolean",
        };
        write!(f, "{name}")
    }
}

/// A concrete primitive value embedded in a statement
///
/// This is a closed set: the dispatcher selects a search strategy by an
/// exhaustive match, so adding a kind here is a compile-time-checked
/// exercise across every strategy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PrimitiveValue {
    /// A string value
    Str(String),
    /// A signed integer value
    Int(i64),
    /// A floating point value
    Float(f64),
    /// A boolean value
    Bool(bool),
}

impl PrimitiveValue {
    /// The kind of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            PrimitiveValue::Str(_) => ValueKind::Str,
            PrimitiveValue::Int(_) => ValueKind::Int,
            PrimitiveValue::Float(_) => ValueKind::Float,
            PrimitiveValue::Bool(_) => ValueKind::Bool,
        }
    }

    /// Borrow the string payload, if this is a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PrimitiveValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer payload, if this is an integer value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PrimitiveValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the float payload, if this is a float value
    pub fn as_float(&self) -> Option<f64> {
        match self {
            PrimitiveValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the boolean payload, if this is a boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PrimitiveValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for PrimitiveValue {
    /// Human-readable rendering, for diagnostics only
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveValue::Str(s) => write!(f, "{s:?}"),
            PrimitiveValue::Int(v) => write!(f, "{v}"),
            PrimitiveValue::Float(v) => write!(f, "{v}"),
            PrimitiveValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<String> for PrimitiveValue {
    fn from(value: String) -> Self {
        PrimitiveValue::Str(value)
    }
}

impl From<&str> for PrimitiveValue {
    fn from(value: &str) -> Self {
        PrimitiveValue::Str(value.to_owned())
    }
}

impl From<i64> for PrimitiveValue {
    fn from(value: i64) -> Self {
        PrimitiveValue::Int(value)
    }
}

impl From<f64> for PrimitiveValue {
    fn from(value: f64) -> Self {
        PrimitiveValue::Float(value)
    }
}

impl From<bool> for PrimitiveValue {
    fn from(value: bool) -> Self {
        PrimitiveValue::Bool(value)
    }
}

/// Outcome of executing a test case
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestOutcome {
    /// The test ran to completion without a failure
    Passed,
    /// The test ran to completion but a check failed
    Failed,
    /// The code under test crashed or timed out
    ///
    /// A crashing candidate is not a search error; it is an outcome the
    /// objective may or may not consider an improvement.
    Crashed {
        /// Diagnostic message describing the crash
        message: String,
    },
}

/// Snapshot of the last execution of a test case
///
/// Saved and restored in lock-step with the statement value it corresponds
/// to: mutating a value invalidates the snapshot until the objective
/// re-executes the test.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// How the execution ended
    pub outcome: TestOutcome,
    /// Fitness the objective observed for this execution (lower = better
    /// under the minimizing convention)
    pub fitness: f64,
}

impl ExecutionResult {
    /// Create a passed result with the given fitness
    pub fn passed(fitness: f64) -> Self {
        Self {
            outcome: TestOutcome::Passed,
            fitness,
        }
    }

    /// Create a failed result with the given fitness
    pub fn failed(fitness: f64) -> Self {
        Self {
            outcome: TestOutcome::Failed,
            fitness,
        }
    }

    /// Create a crashed result with the given fitness
    pub fn crashed(message: impl Into<String>, fitness: f64) -> Self {
        Self {
            outcome: TestOutcome::Crashed {
                message: message.into(),
            },
            fitness,
        }
    }
}

/// A statement carrying one concrete primitive value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    value: PrimitiveValue,
}

impl Statement {
    /// Create a statement holding the given value
    pub fn new(value: impl Into<PrimitiveValue>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// The value this statement holds
    pub fn value(&self) -> &PrimitiveValue {
        &self.value
    }

    /// The kind of value this statement holds
    pub fn kind(&self) -> ValueKind {
        self.value.kind()
    }
}

/// An ordered sequence of statements under refinement
///
/// Owned exclusively by the search while it runs. Statement positions stay
/// stable throughout refinement: string edits change a value's length, not
/// the statement count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct TestCase {
    statements: Vec<Statement>,
    last_result: Option<ExecutionResult>,
    changed: bool,
}

impl TestCase {
    /// Create an empty test case
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a test case from a sequence of values
    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<PrimitiveValue>,
    {
        Self {
            statements: values.into_iter().map(Statement::new).collect(),
            last_result: None,
            changed: true,
        }
    }

    /// Append a statement holding the given value
    pub fn push(&mut self, value: impl Into<PrimitiveValue>) {
        self.statements.push(Statement::new(value));
        self.changed = true;
    }

    /// Number of statements
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Whether the test case has no statements
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Get a statement by position
    pub fn statement(&self, index: usize) -> Option<&Statement> {
        self.statements.get(index)
    }

    /// Get a statement's value by position, with a descriptive error
    pub fn try_value(&self, index: usize) -> Result<&PrimitiveValue, StatementError> {
        self.statements
            .get(index)
            .map(Statement::value)
            .ok_or(StatementError::OutOfRange {
                index,
                len: self.statements.len(),
            })
    }

    /// Get a statement's string value by position
    pub fn string_value(&self, index: usize) -> Result<&str, StatementError> {
        let value = self.try_value(index)?;
        value.as_str().ok_or(StatementError::KindMismatch {
            index,
            expected: ValueKind::Str,
            actual: value.kind(),
        })
    }

    /// Overwrite a statement's value and mark the test case dirty
    ///
    /// The kind of the value may differ from the previous one; the search
    /// itself only ever writes values of the statement's original kind.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range; writing to a statement that does
    /// not exist is a programming error.
    pub fn set_value(&mut self, index: usize, value: impl Into<PrimitiveValue>) {
        let len = self.statements.len();
        let stmt = self.statements.get_mut(index).unwrap_or_else(|| {
            panic!("statement index {index} out of range for test case of length {len}")
        });
        stmt.value = value.into();
        self.changed = true;
    }

    /// The snapshot of the last execution, if any
    pub fn last_result(&self) -> Option<&ExecutionResult> {
        self.last_result.as_ref()
    }

    /// Record (or clear) the execution snapshot
    pub fn set_last_result(&mut self, result: Option<ExecutionResult>) {
        self.last_result = result;
    }

    /// Whether a statement value changed since the last recorded execution
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Set the dirty flag directly (used by objectives after executing, and
    /// by transactional rollback)
    pub fn set_changed(&mut self, changed: bool) {
        self.changed = changed;
    }
}
