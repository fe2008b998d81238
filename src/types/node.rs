use std::collections::BTreeSet;
use std::fmt;
use std::ops::Not;

use serde::{Deserialize, Serialize};

use super::Literal;

/// Comparison operators supported in rule expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl ComparisonOp {
    pub const ALL: [ComparisonOp; 6] = [
        ComparisonOp::Eq,
        ComparisonOp::Neq,
        ComparisonOp::Gt,
        ComparisonOp::Gte,
        ComparisonOp::Lt,
        ComparisonOp::Lte,
    ];

    /// The operator's source symbol, e.g. `">="`.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "==",
            ComparisonOp::Neq => "!=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Gte => ">=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Lte => "<=",
        }
    }

    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<ComparisonOp> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    /// Whether the operator needs an ordering rather than plain equality.
    #[must_use]
    pub fn is_ordering(self) -> bool {
        !matches!(self, ComparisonOp::Eq | ComparisonOp::Neq)
    }
}

/// Binary logical connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOp {
    And,
    #[default]
    Or,
}

impl LogicalOp {
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
        }
    }
}

/// A parsed rule.
///
/// Leaves are [`Operand`](ExpressionNode::Operand) comparisons; internal
/// nodes combine owned subtrees. Trees are never mutated after construction,
/// so a single tree can be shared across threads and evaluated concurrently.
///
/// Traversals recurse once per level. The parser, the combiner and the
/// transport decoder never produce a tree deeper than
/// [`EngineConfig::max_tree_depth`](crate::EngineConfig::max_tree_depth); the
/// [`and`](Self::and), [`or`](Self::or) and `!` builders do not check depth.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionNode {
    Operand {
        attribute: String,
        operator: ComparisonOp,
        literal: Literal,
    },
    Operator {
        kind: LogicalOp,
        left: Box<ExpressionNode>,
        right: Box<ExpressionNode>,
    },
    Not(Box<ExpressionNode>),
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl fmt::Display for ExpressionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionNode::Operand {
                attribute,
                operator,
                literal,
            } => write!(f, "({attribute} {operator} {literal})"),
            ExpressionNode::Operator { kind, left, right } => {
                write!(f, "({left} {kind} {right})")
            }
            ExpressionNode::Not(inner) => write!(f, "(NOT {inner})"),
        }
    }
}

impl ExpressionNode {
    #[must_use]
    pub fn operator(kind: LogicalOp, left: ExpressionNode, right: ExpressionNode) -> ExpressionNode {
        ExpressionNode::Operator {
            kind,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[must_use]
    pub fn and(self, other: ExpressionNode) -> ExpressionNode {
        Self::operator(LogicalOp::And, self, other)
    }

    #[must_use]
    pub fn or(self, other: ExpressionNode) -> ExpressionNode {
        Self::operator(LogicalOp::Or, self, other)
    }

    /// Names of every attribute the tree compares, sorted and de-duplicated.
    #[must_use]
    pub fn attributes(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.collect_attributes(&mut out);
        out
    }

    fn collect_attributes<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            ExpressionNode::Operand { attribute, .. } => {
                out.insert(attribute.as_str());
            }
            ExpressionNode::Operator { left, right, .. } => {
                left.collect_attributes(out);
                right.collect_attributes(out);
            }
            ExpressionNode::Not(inner) => inner.collect_attributes(out),
        }
    }

    /// Number of nodes on the longest root-to-leaf path. A lone operand has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            ExpressionNode::Operand { .. } => 1,
            ExpressionNode::Operator { left, right, .. } => 1 + left.depth().max(right.depth()),
            ExpressionNode::Not(inner) => 1 + inner.depth(),
        }
    }

    #[must_use]
    pub fn operand_count(&self) -> usize {
        match self {
            ExpressionNode::Operand { .. } => 1,
            ExpressionNode::Operator { left, right, .. } => {
                left.operand_count() + right.operand_count()
            }
            ExpressionNode::Not(inner) => inner.operand_count(),
        }
    }
}

impl Not for ExpressionNode {
    type Output = ExpressionNode;

    fn not(self) -> ExpressionNode {
        ExpressionNode::Not(Box::new(self))
    }
}

/// Intermediate builder for comparison leaves.
/// Created by [`attr()`]; requires a comparison method to produce an [`ExpressionNode`].
#[derive(Debug, Clone)]
pub struct AttrExpr {
    name: String,
}

impl AttrExpr {
    #[must_use]
    pub fn compare(self, operator: ComparisonOp, literal: impl Into<Literal>) -> ExpressionNode {
        ExpressionNode::Operand {
            attribute: self.name,
            operator,
            literal: literal.into(),
        }
    }

    #[must_use]
    pub fn eq(self, literal: impl Into<Literal>) -> ExpressionNode {
        self.compare(ComparisonOp::Eq, literal)
    }

    #[must_use]
    pub fn neq(self, literal: impl Into<Literal>) -> ExpressionNode {
        self.compare(ComparisonOp::Neq, literal)
    }

    #[must_use]
    pub fn gt(self, literal: impl Into<Literal>) -> ExpressionNode {
        self.compare(ComparisonOp::Gt, literal)
    }

    #[must_use]
    pub fn gte(self, literal: impl Into<Literal>) -> ExpressionNode {
        self.compare(ComparisonOp::Gte, literal)
    }

    #[must_use]
    pub fn lt(self, literal: impl Into<Literal>) -> ExpressionNode {
        self.compare(ComparisonOp::Lt, literal)
    }

    #[must_use]
    pub fn lte(self, literal: impl Into<Literal>) -> ExpressionNode {
        self.compare(ComparisonOp::Lte, literal)
    }
}

#[must_use]
pub fn attr(name: &str) -> AttrExpr {
    AttrExpr {
        name: name.to_owned(),
    }
}
