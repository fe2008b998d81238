use tracing::trace;

use crate::{ComparisonOp, EvalError, ExpressionNode, Literal, LogicalOp, Record};

/// Evaluate a tree against a record.
///
/// `AND` and `OR` evaluate their left child first and skip the right child
/// once the result is decided, so errors in a skipped branch are never raised.
///
/// # Errors
///
/// Returns [`EvalError::MissingAttribute`] when a reached operand names an
/// attribute absent from `record`, and [`EvalError::TypeMismatch`] when the
/// record value cannot be compared with the operand's literal.
pub fn evaluate(tree: &ExpressionNode, record: &Record) -> Result<bool, EvalError> {
    match tree {
        ExpressionNode::Operand {
            attribute,
            operator,
            literal,
        } => {
            let value = record
                .get(attribute)
                .ok_or_else(|| EvalError::MissingAttribute {
                    attribute: attribute.clone(),
                })?;
            let result = compare(attribute, value, *operator, literal)?;
            trace!(%attribute, %operator, %literal, %value, result, "compared operand");
            Ok(result)
        }
        ExpressionNode::Operator { kind, left, right } => {
            let lhs = evaluate(left, record)?;
            match (kind, lhs) {
                (LogicalOp::And, false) => Ok(false),
                (LogicalOp::Or, true) => Ok(true),
                _ => evaluate(right, record),
            }
        }
        ExpressionNode::Not(inner) => Ok(!evaluate(inner, record)?),
    }
}

fn compare(
    attribute: &str,
    value: &Literal,
    operator: ComparisonOp,
    literal: &Literal,
) -> Result<bool, EvalError> {
    value
        .compare(operator, literal)
        .ok_or_else(|| EvalError::TypeMismatch {
            attribute: attribute.to_owned(),
            expected: expected_type(operator, literal).to_owned(),
            actual: value.type_name().to_owned(),
        })
}

fn expected_type(operator: ComparisonOp, literal: &Literal) -> &'static str {
    match literal {
        Literal::Bool(_) if operator.is_ordering() => "number or string",
        other => other.type_name(),
    }
}

impl ExpressionNode {
    /// Evaluate this tree against a record. See [`evaluate`].
    ///
    /// # Errors
    ///
    /// Returns [`EvalError`] on a missing attribute or incomparable types.
    pub fn evaluate(&self, record: &Record) -> Result<bool, EvalError> {
        evaluate(self, record)
    }
}
