use thiserror::Error;

use crate::parse::SyntaxError;

/// Errors raised while evaluating a tree against a [`Record`](crate::Record).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("attribute '{attribute}' is not present in the record")]
    MissingAttribute { attribute: String },

    #[error("type mismatch on '{attribute}': expected {expected}, found {actual}")]
    TypeMismatch {
        attribute: String,
        expected: String,
        actual: String,
    },
}

/// Errors raised while combining rule strings into one tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombineError {
    #[error("no rules to combine; at least one rule is required")]
    EmptyInput,

    #[error("rule #{index} is invalid: {source}")]
    Syntax {
        index: usize,
        #[source]
        source: SyntaxError,
    },

    #[error("adding rule #{index} makes the combined tree deeper than the limit of {max} levels")]
    TooDeep { index: usize, max: usize },
}
