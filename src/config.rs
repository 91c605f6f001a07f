//! Search configuration
//!
//! Tunable parameters for the refinement strategies, mirroring the
//! property defaults of the surrounding test-generation system.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for statement-level local search
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of random mutations tried while probing whether a string
    /// value influences the fitness signal at all
    pub probe_attempts: usize,

    /// Inclusive lower bound of the candidate character range
    pub char_min: char,

    /// Exclusive upper bound of the candidate character range
    ///
    /// The default range `[9, 127)` covers tab, newline and the printable
    /// ASCII characters.
    pub char_max: char,

    /// Maximum length of a freshly randomized probe string
    pub random_string_max_len: usize,

    /// Number of fractional digits the float strategy refines, one order
    /// of magnitude per step (0.1, 0.01, ...)
    pub float_precision_steps: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            probe_attempts: 10,
            char_min: '\t',
            char_max: '\u{7f}',
            random_string_max_len: 20,
            float_precision_steps: 7,
        }
    }
}

impl SearchConfig {
    /// Check the configuration for values the search cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.probe_attempts == 0 {
            return Err(ConfigError::ZeroProbeAttempts);
        }
        if self.char_min >= self.char_max {
            return Err(ConfigError::EmptyCharacterRange {
                min: self.char_min,
                max: self.char_max,
            });
        }
        if self.random_string_max_len == 0 {
            return Err(ConfigError::ZeroRandomStringLength);
        }
        if self.float_precision_steps == 0 {
            return Err(ConfigError::ZeroPrecisionSteps);
        }
        Ok(())
    }

    /// Iterator over the candidate character range, ascending
    pub(crate) fn char_range(&self) -> impl Iterator<Item = char> {
        self.char_min..self.char_max
    }
}
