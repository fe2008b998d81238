use thiserror::Error;

use crate::config::ConfigError;
use crate::parse::SyntaxError;
use crate::transport::MalformedTreeError;
use crate::{CombineError, EvalError};

/// Unified error type covering parsing, combining, decoding, evaluation and
/// configuration.
///
/// Returned by convenience functions like [`evaluate_str()`](crate::evaluate_str)
/// and by the [`boundary`](crate::boundary) handlers.
#[derive(Debug, Error)]
pub enum RuleTreeError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Combine(#[from] CombineError),

    #[error(transparent)]
    MalformedTree(#[from] MalformedTreeError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid request body: {0}")]
    InvalidRequest(#[from] serde_json::Error),
}

impl RuleTreeError {
    /// Short machine-readable name for the failure, e.g. `"missing_attribute"`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            RuleTreeError::Syntax(_) => "syntax_error",
            RuleTreeError::Combine(CombineError::EmptyInput) => "empty_input",
            RuleTreeError::Combine(CombineError::Syntax { .. }) => "syntax_error",
            RuleTreeError::Combine(CombineError::TooDeep { .. }) => "tree_too_deep",
            RuleTreeError::MalformedTree(_) => "malformed_tree",
            RuleTreeError::Eval(EvalError::MissingAttribute { .. }) => "missing_attribute",
            RuleTreeError::Eval(EvalError::TypeMismatch { .. }) => "type_mismatch",
            RuleTreeError::Config(_) => "config_error",
            RuleTreeError::InvalidRequest(_) => "invalid_request",
        }
    }
}
