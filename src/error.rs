//! Error types for grammar validation and rendering.
//!
//! Validation problems are collected into [`ValidationErrors`] so a caller can surface every
//! message at once. Failures during expansion or interpretation are [`RenderError`]s and only ever
//! terminate the current run.

use thiserror::Error;

/// A single problem found while validating the starting sequence or the production rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The starting sequence contains a character outside the symbol alphabet.
    #[error(
        "Starting sequence wrong: {found:?} at position {position}. A-Z, +, -, [, ] and separating commas allowed."
    )]
    InvalidStartSequence {
        /// Char index of the offending character.
        position: usize,
        /// The offending character.
        found: char,
    },

    /// The rules text does not follow `(A,AAA+-[]),(B,CDF+-[])`.
    #[error("Production rules wrong at position {position}. (A,AAA+-[]),(B,CDF+-[]) allowed.")]
    MalformedRules {
        /// Char index where parsing stopped.
        position: usize,
    },

    /// A rule clause has a different number of `[` and `]`.
    #[error("Production rules wrong bracket number in clause {clause}: {open} '[' and {close} ']'.")]
    UnbalancedBrackets {
        /// Zero-based clause index.
        clause: usize,
        /// Number of `[` in the clause.
        open: usize,
        /// Number of `]` in the clause.
        close: usize,
    },

    /// A rule clause closes a bracket before opening it.
    #[error("Production rules wrong bracket order in clause {clause}.")]
    MisnestedBrackets {
        /// Zero-based clause index.
        clause: usize,
    },

    /// The same letter is the left-hand side of more than one rule.
    #[error("Production rules wrong: letter {letter} can't have more than 1 rule.")]
    DuplicateRule {
        /// The letter defined twice.
        letter: char,
    },
}

/// Every validation problem found in one pass over the inputs. Never empty.
///
/// Displays one message per line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", join_lines(.0))]
pub struct ValidationErrors(Vec<ValidationError>);

fn join_lines(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl ValidationErrors {
    /// Wraps a list of errors, returning `None` when the list is empty.
    pub fn from_vec(errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    pub fn as_slice(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if any contained error satisfies `pred`.
    pub fn contains(&self, pred: impl Fn(&ValidationError) -> bool) -> bool {
        self.0.iter().any(pred)
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self(vec![error])
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Failure of a render run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The grammar inputs did not validate; the run never started.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    /// The numeric render settings are unusable (zero canvas, bad step, ...).
    #[error("Invalid render configuration: {0}")]
    Config(String),

    /// A `]` was interpreted while the branch stack was empty.
    #[error("Branch stack underflow: ']' at symbol {position} has no matching '['")]
    StackUnderflow {
        /// Index of the offending `]` in the expanded sequence.
        position: usize,
    },

    /// Expansion or interpretation needed more memory than is available or allowed.
    #[error("OutOfMemory")]
    OutOfMemory {
        /// Number of elements the failed allocation asked for.
        requested: usize,
    },
}
