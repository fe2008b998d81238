use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::Literal;

/// The data a rule is evaluated against: attribute names mapped to [`Literal`]s.
///
/// Deserializes from a flat JSON object whose values are numbers, strings or
/// booleans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    data: HashMap<String, Literal>,
}

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, replacing any previous value.
    #[must_use]
    pub fn set(mut self, attribute: &str, value: impl Into<Literal>) -> Self {
        self.insert(attribute, value.into());
        self
    }

    /// Insert an attribute (mutable reference version).
    pub fn insert(&mut self, attribute: &str, value: Literal) {
        self.data.insert(attribute.to_owned(), value);
    }

    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<&Literal> {
        self.data.get(attribute)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Literal)> {
        self.data.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Literal>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            data: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let record = Record::new().set("department", "Sales").set("age", 40);
        assert_eq!(
            record.get("department"),
            Some(&Literal::String("Sales".to_owned()))
        );
        assert_eq!(record.get("age"), Some(&Literal::Int(40)));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn get_missing_returns_none() {
        let record = Record::new().set("age", 25);
        assert_eq!(record.get("salary"), None);
        assert!(Record::new().is_empty());
    }

    #[test]
    fn overwrite_value() {
        let record = Record::new().set("score", 10).set("score", 20);
        assert_eq!(record.get("score"), Some(&Literal::Int(20)));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn dotted_names_are_plain_keys() {
        let record = Record::new().set("user.age", 30);
        assert_eq!(record.get("user.age"), Some(&Literal::Int(30)));
        assert_eq!(record.get("user"), None);
    }

    #[test]
    fn insert_mutable_ref() {
        let mut record = Record::new();
        record.insert("active", Literal::Bool(true));
        assert_eq!(record.get("active"), Some(&Literal::Bool(true)));
    }

    #[test]
    fn from_iterator() {
        let record: Record = [("age", Literal::Int(35)), ("salary", Literal::Float(5.5e4))]
            .into_iter()
            .collect();
        assert_eq!(record.get("salary"), Some(&Literal::Float(55_000.0)));
        assert_eq!(record.iter().count(), 2);
    }

    #[test]
    fn deserialize_from_json_object() {
        let record: Record =
            serde_json::from_str(r#"{"age": 40, "department": "Sales", "salary": 5.5e4, "manager": false}"#)
                .unwrap();
        assert_eq!(record.get("age"), Some(&Literal::Int(40)));
        assert_eq!(record.get("salary"), Some(&Literal::Float(55_000.0)));
        assert_eq!(record.get("manager"), Some(&Literal::Bool(false)));
    }

    #[test]
    fn deserialize_rejects_non_scalars() {
        assert!(serde_json::from_str::<Record>(r#"{"age": null}"#).is_err());
        assert!(serde_json::from_str::<Record>(r#"{"tags": ["a"]}"#).is_err());
        assert!(serde_json::from_str::<Record>(r#"[1, 2]"#).is_err());
    }
}
