mod error;
mod literal;
mod node;
mod record;

pub use error::{CombineError, EvalError};
pub use literal::Literal;
pub use node::{AttrExpr, ComparisonOp, ExpressionNode, LogicalOp, attr};
pub use record::Record;
