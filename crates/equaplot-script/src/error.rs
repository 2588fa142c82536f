//! Error and warning types for formula handling
//!
//! Nothing here is fatal. Warnings ride along with preprocessed text,
//! evaluation failures are replaced by 0 unless a caller asks for them, and
//! an invalid definition only skips that definition's regeneration.

use thiserror::Error;

/// Result type alias using the script error type
pub type Result<T> = std::result::Result<T, ScriptError>;

/// Errors that stop a formula from being dispatched to a generator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// A parametric formula did not split into exactly three components
    #[error("Parametric formula needs 3 components separated by ';', found {components}")]
    InvalidDefinition { components: usize },
}

/// Non-fatal problems found while normalizing formula text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreprocessWarning {
    /// `^` operators were still present after the rewrite passes ran out
    #[error("{remaining} exponent operator(s) could not be rewritten")]
    UnresolvedExponent { remaining: usize },
}

/// Why a single sample could not produce a number
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationFailure {
    /// The canonical text is not a valid expression
    #[error("Parse error: {0}")]
    Parse(String),

    /// Evaluation raised an error, e.g. an unknown variable or function
    #[error("Evaluation error: {0}")]
    Runtime(String),

    /// The expression produced NaN or an infinity
    #[error("Non-finite result: {0}")]
    NonFinite(f64),

    /// The expression produced something other than a number
    #[error("Expected a number, got {0}")]
    NotNumeric(String),
}
