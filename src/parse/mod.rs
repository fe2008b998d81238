mod error;
mod grammar;

pub use error::SyntaxError;

use tracing::debug;

use crate::{EngineConfig, ExpressionNode};

/// Parse a rule string into an [`ExpressionNode`] using the default configuration.
///
/// # Errors
///
/// Returns [`SyntaxError`] if the input is not a valid rule.
pub fn parse(input: &str) -> Result<ExpressionNode, SyntaxError> {
    parse_with(input, &EngineConfig::default())
}

/// Parse a rule string, rejecting nesting deeper than `config.max_nesting`
/// and trees deeper than `config.max_tree_depth`.
///
/// The tree limit also covers flat chains, since `a AND b AND c` folds into
/// `((a AND b) AND c)`. Every tree this returns therefore decodes again with
/// [`from_transport_with`](crate::from_transport_with) under the same config.
///
/// # Errors
///
/// Returns [`SyntaxError`] if the input is not a valid rule or is too deep.
pub fn parse_with(input: &str, config: &EngineConfig) -> Result<ExpressionNode, SyntaxError> {
    use winnow::Parser;

    let (max_nesting, max_depth) = (config.max_nesting, config.max_tree_depth);
    let result = (|i: &mut &str| grammar::rule(i, max_nesting, max_depth))
        .parse(input)
        .map_err(|e| {
            let message = e.inner().to_string().replace('\n', "; ");
            let message = if message.is_empty() {
                "unexpected input; expected AND, OR or end of rule".to_owned()
            } else {
                message
            };
            SyntaxError::new(e.offset(), message)
        });
    match &result {
        Ok(node) => debug!(rule = input, depth = node.depth(), "parsed rule"),
        Err(err) => debug!(rule = input, error = %err, "rejected rule"),
    }
    result
}
