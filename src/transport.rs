//! Conversion between [`ExpressionNode`] trees and their JSON transport form.
//!
//! Every node is an object with exactly four keys:
//!
//! ```text
//! Key         Operand                           Operator (AND / OR)   Operator (NOT)
//! node_type   "operand"                         "operator"            "operator"
//! value       [attribute, comparison, literal]  "AND" | "OR"          "NOT"
//! left        null                              node                  node
//! right       null                              node                  null
//! ```
//!
//! Absent children are written as explicit `null`. Decoding accepts an omitted
//! `left`/`right` key wherever `null` is allowed, and rejects anything else that
//! does not fit the table with a [`MalformedTreeError`] naming the offending
//! location (e.g. `$.left.right`).
//!
//! Decoding enforces the same `max_tree_depth` as the parser and the combiner,
//! so any tree they build decodes again under the same config. The limit is
//! capped at [`MAX_TREE_DEPTH_LIMIT`](crate::config::MAX_TREE_DEPTH_LIMIT)
//! levels, which keeps the JSON text of a tree, inside a request body, within
//! the 128-level nesting `serde_json::from_str` accepts by default.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::{ComparisonOp, EngineConfig, ExpressionNode, Literal, LogicalOp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const NODE_TYPE: &str = "node_type";
const VALUE: &str = "value";
const LEFT: &str = "left";
const RIGHT: &str = "right";

const OPERATOR: &str = "operator";
const OPERAND: &str = "operand";
const NOT: &str = "NOT";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// A transport value that does not decode to a well-formed tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed tree at {path}: {reason}")]
pub struct MalformedTreeError {
    pub path: String,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode a tree into its transport value.
#[must_use]
pub fn to_transport(tree: &ExpressionNode) -> Value {
    match tree {
        ExpressionNode::Operand {
            attribute,
            operator,
            literal,
        } => json!({
            NODE_TYPE: OPERAND,
            VALUE: [attribute, operator.symbol(), literal.to_json()],
            LEFT: null,
            RIGHT: null,
        }),
        ExpressionNode::Operator { kind, left, right } => json!({
            NODE_TYPE: OPERATOR,
            VALUE: kind.keyword(),
            LEFT: to_transport(left),
            RIGHT: to_transport(right),
        }),
        ExpressionNode::Not(inner) => json!({
            NODE_TYPE: OPERATOR,
            VALUE: NOT,
            LEFT: to_transport(inner),
            RIGHT: null,
        }),
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode a transport value using the default depth limit.
///
/// # Errors
///
/// Returns [`MalformedTreeError`] if `value` does not have the node shape
/// described in the [module docs](self).
pub fn from_transport(value: &Value) -> Result<ExpressionNode, MalformedTreeError> {
    from_transport_with(value, &EngineConfig::default())
}

/// Decode a transport value, rejecting trees deeper than `config.max_tree_depth`
/// levels. A lone operand is one level.
///
/// # Errors
///
/// Returns [`MalformedTreeError`] on any shape violation or excess depth.
pub fn from_transport_with(
    value: &Value,
    config: &EngineConfig,
) -> Result<ExpressionNode, MalformedTreeError> {
    Decoder {
        max_depth: config.max_tree_depth,
        path: Vec::new(),
    }
    .node(value)
}

struct Decoder {
    max_depth: usize,
    path: Vec<&'static str>,
}

impl Decoder {
    fn error(&self, reason: impl Into<String>) -> MalformedTreeError {
        let mut path = String::from("$");
        for segment in &self.path {
            path.push('.');
            path.push_str(segment);
        }
        MalformedTreeError {
            path,
            reason: reason.into(),
        }
    }

    fn node(&mut self, value: &Value) -> Result<ExpressionNode, MalformedTreeError> {
        if self.path.len() >= self.max_depth {
            return Err(self.error(format!(
                "tree is deeper than the limit of {} levels",
                self.max_depth
            )));
        }
        let Value::Object(fields) = value else {
            return Err(self.error(format!("expected a node object, found {}", kind_of(value))));
        };
        match fields.get(NODE_TYPE) {
            Some(Value::String(t)) if t == OPERAND => self.operand(fields),
            Some(Value::String(t)) if t == OPERATOR => self.operator(fields),
            Some(Value::String(t)) => Err(self.error(format!(
                "unknown node_type `{t}`; expected `operand` or `operator`"
            ))),
            Some(other) => Err(self.error(format!(
                "node_type must be a string, found {}",
                kind_of(other)
            ))),
            None => Err(self.error("missing `node_type`")),
        }
    }

    fn operand(&self, fields: &Map<String, Value>) -> Result<ExpressionNode, MalformedTreeError> {
        let parts = match fields.get(VALUE) {
            Some(Value::Array(parts)) if parts.len() == 3 => parts,
            Some(Value::Array(parts)) => {
                return Err(self.error(format!(
                    "operand value must have 3 elements [attribute, operator, literal], found {}",
                    parts.len()
                )));
            }
            Some(other) => {
                return Err(self.error(format!(
                    "operand value must be an [attribute, operator, literal] array, found {}",
                    kind_of(other)
                )));
            }
            None => return Err(self.error("operand is missing `value`")),
        };
        let attribute = match &parts[0] {
            Value::String(a) if !a.is_empty() => a.clone(),
            Value::String(_) => return Err(self.error("operand attribute is empty")),
            other => {
                return Err(self.error(format!(
                    "operand attribute must be a string, found {}",
                    kind_of(other)
                )));
            }
        };
        let operator = parts[1]
            .as_str()
            .and_then(ComparisonOp::from_symbol)
            .ok_or_else(|| self.error(format!("unknown comparison operator {}", parts[1])))?;
        let literal = Literal::from_json(&parts[2]).ok_or_else(|| {
            self.error(format!(
                "operand literal must be a number, string or boolean, found {}",
                kind_of(&parts[2])
            ))
        })?;
        for side in [LEFT, RIGHT] {
            if !child_absent(fields, side) {
                return Err(self.error(format!("operand must not have a `{side}` child")));
            }
        }
        Ok(ExpressionNode::Operand {
            attribute,
            operator,
            literal,
        })
    }

    fn operator(
        &mut self,
        fields: &Map<String, Value>,
    ) -> Result<ExpressionNode, MalformedTreeError> {
        let kind = match fields.get(VALUE) {
            Some(Value::String(k)) if k == LogicalOp::And.keyword() => Some(LogicalOp::And),
            Some(Value::String(k)) if k == LogicalOp::Or.keyword() => Some(LogicalOp::Or),
            Some(Value::String(k)) if k == NOT => None,
            Some(other) => {
                return Err(self.error(format!(
                    "unknown logical operator {other}; expected \"AND\", \"OR\" or \"NOT\""
                )));
            }
            None => return Err(self.error("operator is missing `value`")),
        };
        match kind {
            Some(kind) => {
                let left = self.child(fields, LEFT)?;
                let right = self.child(fields, RIGHT)?;
                Ok(ExpressionNode::operator(kind, left, right))
            }
            None => {
                let inner = self.child(fields, LEFT)?;
                if !child_absent(fields, RIGHT) {
                    return Err(self.error("NOT takes a single `left` child; `right` must be null"));
                }
                Ok(!inner)
            }
        }
    }

    fn child(
        &mut self,
        fields: &Map<String, Value>,
        side: &'static str,
    ) -> Result<ExpressionNode, MalformedTreeError> {
        match fields.get(side) {
            Some(Value::Null) | None => Err(self.error(format!("operator is missing its `{side}` child"))),
            Some(child) => {
                self.path.push(side);
                let node = self.node(child)?;
                self.path.pop();
                Ok(node)
            }
        }
    }
}

fn child_absent(fields: &Map<String, Value>, side: &str) -> bool {
    matches!(fields.get(side), None | Some(Value::Null))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// serde integration
// ---------------------------------------------------------------------------

impl Serialize for ExpressionNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        to_transport(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ExpressionNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        from_transport(&value).map_err(de::Error::custom)
    }
}
