use tracing::debug;

use crate::parse::parse_with;
use crate::{CombineError, EngineConfig, ExpressionNode, LogicalOp};

/// Parse each rule and join the trees with `OR`.
///
/// # Errors
///
/// See [`combine_with`].
pub fn combine<S: AsRef<str>>(rules: &[S]) -> Result<ExpressionNode, CombineError> {
    combine_with(rules, LogicalOp::Or)
}

/// Parse each rule and fold the trees left to right with `op`:
/// `[r1, r2, r3]` becomes `((r1 op r2) op r3)`.
///
/// A single rule comes back as its own tree with no wrapping node. Every
/// rule's tree is kept intact as a subtree of the result.
///
/// # Errors
///
/// Returns [`CombineError::EmptyInput`] for an empty slice,
/// [`CombineError::Syntax`] naming the first rule that fails to parse, and
/// [`CombineError::TooDeep`] when the folded tree would be deeper than the
/// default `max_tree_depth`. Each rule adds a level, so folding `n`
/// single-comparison rules gives a tree `n` levels deep.
pub fn combine_with<S: AsRef<str>>(
    rules: &[S],
    op: LogicalOp,
) -> Result<ExpressionNode, CombineError> {
    combine_inner(rules, op, &EngineConfig::default())
}

/// Like [`combine_with`], using `config.default_operator` and the
/// configured limits.
///
/// # Errors
///
/// See [`combine_with`].
pub fn combine_with_config<S: AsRef<str>>(
    rules: &[S],
    config: &EngineConfig,
) -> Result<ExpressionNode, CombineError> {
    combine_inner(rules, config.default_operator, config)
}

/// Fold already-parsed trees with `op`, with the same shape as [`combine_with`].
///
/// # Errors
///
/// Returns [`CombineError::EmptyInput`] if `trees` yields nothing, and
/// [`CombineError::TooDeep`] once the fold passes the default `max_tree_depth`.
pub fn combine_trees(
    trees: impl IntoIterator<Item = ExpressionNode>,
    op: LogicalOp,
) -> Result<ExpressionNode, CombineError> {
    fold_trees(trees, op, EngineConfig::default().max_tree_depth)
}

fn fold_trees(
    trees: impl IntoIterator<Item = ExpressionNode>,
    op: LogicalOp,
    max_depth: usize,
) -> Result<ExpressionNode, CombineError> {
    let too_deep = |index| CombineError::TooDeep {
        index,
        max: max_depth,
    };
    let mut trees = trees.into_iter().enumerate();
    let (_, mut combined) = trees.next().ok_or(CombineError::EmptyInput)?;
    let mut depth = combined.depth();
    if depth > max_depth {
        return Err(too_deep(0));
    }
    for (index, tree) in trees {
        depth = 1 + depth.max(tree.depth());
        if depth > max_depth {
            return Err(too_deep(index));
        }
        combined = ExpressionNode::operator(op, combined, tree);
    }
    Ok(combined)
}

pub(crate) fn combine_inner<S: AsRef<str>>(
    rules: &[S],
    op: LogicalOp,
    config: &EngineConfig,
) -> Result<ExpressionNode, CombineError> {
    let trees = rules
        .iter()
        .enumerate()
        .map(|(index, rule)| {
            parse_with(rule.as_ref(), config)
                .map_err(|source| CombineError::Syntax { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let combined = fold_trees(trees, op, config.max_tree_depth)?;
    debug!(rules = rules.len(), %op, depth = combined.depth(), "combined rules");
    Ok(combined)
}
