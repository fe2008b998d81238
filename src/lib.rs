//! Boolean eligibility rules: parse rule text into an expression tree, fold
//! several rules into one, move trees across a JSON boundary, and evaluate
//! them against attribute records.
//!
//! ```
//! use ruletree::{parse, Record};
//!
//! let tree = parse(r#"age > 30 AND department == "Sales""#).unwrap();
//! let record = Record::new().set("age", 35).set("department", "Sales");
//! assert_eq!(tree.evaluate(&record), Ok(true));
//! ```

pub mod boundary;
mod combine;
pub mod config;
mod error;
mod evaluate;
pub mod parse;
pub mod transport;
mod types;

pub use combine::{combine, combine_trees, combine_with, combine_with_config};
pub use config::{ConfigError, EngineConfig};
pub use error::RuleTreeError;
pub use evaluate::evaluate;
pub use parse::{SyntaxError, parse, parse_with};
pub use transport::{MalformedTreeError, from_transport, from_transport_with, to_transport};
pub use types::{
    AttrExpr, CombineError, ComparisonOp, EvalError, ExpressionNode, Literal, LogicalOp, Record,
    attr,
};

/// Parse `rule` and evaluate it against `record` in one step.
///
/// # Errors
///
/// Returns [`RuleTreeError::Syntax`] if the rule does not parse, or
/// [`RuleTreeError::Eval`] if evaluation fails.
pub fn evaluate_str(rule: &str, record: &Record) -> Result<bool, RuleTreeError> {
    let tree = parse(rule)?;
    Ok(tree.evaluate(record)?)
}
