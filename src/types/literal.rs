use std::cmp::Ordering;
use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::node::ComparisonOp;

/// A typed constant: the right-hand side of a comparison, or a value held by
/// a [`Record`](super::Record).
///
/// `Int` and `Float` together make up the number type and compare with each
/// other freely.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A boolean value.
    Bool(bool),
    /// A UTF-8 string.
    String(String),
}

impl Literal {
    /// Name of this literal's type as reported in evaluation errors.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Int(_) | Literal::Float(_) => "number",
            Literal::Bool(_) => "bool",
            Literal::String(_) => "string",
        }
    }

    /// Compare this value (left-hand side) to `other` using the given operator.
    ///
    /// Returns `None` when the two types are not comparable under `op`:
    /// differing types, or an ordering operator applied to booleans.
    /// Strings order lexicographically by bytes. Numbers use exact equality;
    /// a NaN operand is unequal to everything and never ordered.
    #[must_use]
    pub fn compare(&self, op: ComparisonOp, other: &Literal) -> Option<bool> {
        if let (Literal::Bool(a), Literal::Bool(b)) = (self, other) {
            return match op {
                ComparisonOp::Eq => Some(a == b),
                ComparisonOp::Neq => Some(a != b),
                _ => None,
            };
        }
        let Some(ord) = self.partial_cmp_literal(other)? else {
            return Some(op == ComparisonOp::Neq);
        };
        Some(match op {
            ComparisonOp::Eq => ord == Ordering::Equal,
            ComparisonOp::Neq => ord != Ordering::Equal,
            ComparisonOp::Gt => ord == Ordering::Greater,
            ComparisonOp::Gte => ord != Ordering::Less,
            ComparisonOp::Lt => ord == Ordering::Less,
            ComparisonOp::Lte => ord != Ordering::Greater,
        })
    }

    /// Outer `None`: incompatible types. Inner `None`: unordered (NaN).
    #[allow(clippy::cast_precision_loss)]
    fn partial_cmp_literal(&self, other: &Literal) -> Option<Option<Ordering>> {
        match (self, other) {
            (Literal::Int(a), Literal::Int(b)) => Some(Some(a.cmp(b))),
            (Literal::Float(a), Literal::Float(b)) => Some(a.partial_cmp(b)),
            (Literal::Int(a), Literal::Float(b)) => Some((*a as f64).partial_cmp(b)),
            (Literal::Float(a), Literal::Int(b)) => Some(a.partial_cmp(&(*b as f64))),
            (Literal::String(a), Literal::String(b)) => Some(Some(a.cmp(b))),
            _ => None,
        }
    }

    /// Convert a JSON scalar into a literal. `null`, arrays and objects have
    /// no literal form.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Literal> {
        match value {
            serde_json::Value::Bool(b) => Some(Literal::Bool(*b)),
            serde_json::Value::String(s) => Some(Literal::String(s.clone())),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Literal::Int)
                .or_else(|| n.as_f64().map(Literal::Float)),
            serde_json::Value::Null | serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                None
            }
        }
    }

    /// Convert this literal into a JSON scalar. Non-finite floats become `null`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Literal::Int(v) => serde_json::Value::from(*v),
            Literal::Float(v) => serde_json::Number::from_f64(*v)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Literal::Bool(v) => serde_json::Value::Bool(*v),
            Literal::String(v) => serde_json::Value::String(v.clone()),
        }
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Literal::Int(v)
    }
}

impl From<i32> for Literal {
    fn from(v: i32) -> Self {
        Literal::Int(i64::from(v))
    }
}

impl From<f64> for Literal {
    fn from(v: f64) -> Self {
        Literal::Float(v)
    }
}

impl From<bool> for Literal {
    fn from(v: bool) -> Self {
        Literal::Bool(v)
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Literal::String(v.to_owned())
    }
}

impl From<String> for Literal {
    fn from(v: String) -> Self {
        Literal::String(v)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{v}"),
            // `{:?}` keeps the decimal point on whole floats so the text re-parses as a float
            Literal::Float(v) => write!(f, "{v:?}"),
            Literal::Bool(v) => write!(f, "{v}"),
            Literal::String(v) => {
                f.write_str("\"")?;
                for c in v.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        c => write!(f, "{c}")?,
                    }
                }
                f.write_str("\"")
            }
        }
    }
}

impl Serialize for Literal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Literal::Int(v) => serializer.serialize_i64(*v),
            Literal::Float(v) => serializer.serialize_f64(*v),
            Literal::Bool(v) => serializer.serialize_bool(*v),
            Literal::String(v) => serializer.serialize_str(v),
        }
    }
}

struct LiteralVisitor;

impl Visitor<'_> for LiteralVisitor {
    type Value = Literal;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, string or boolean")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Literal, E> {
        Ok(Literal::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Literal, E> {
        Ok(Literal::Int(v))
    }

    #[allow(clippy::cast_precision_loss)]
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Literal, E> {
        Ok(i64::try_from(v).map_or(Literal::Float(v as f64), Literal::Int))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Literal, E> {
        Ok(Literal::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Literal, E> {
        Ok(Literal::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Literal, E> {
        Ok(Literal::String(v))
    }
}

impl<'de> Deserialize<'de> for Literal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LiteralVisitor)
    }
}
