use serde::{Deserialize, Serialize};
use std::fmt;

/// The value of a single reported field
///
/// `List` is the array type: two lists are equal only when they hold the
/// same elements in the same order. Scalars compare by value, so
/// `Integer(30)` and `Text("30")` are different values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Integer(i64),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Build a text value
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Build a list value from anything yielding strings
    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::List(values.into_iter().map(Into::into).collect())
    }

    /// Apply `f` to every string carried by this value
    ///
    /// Text is mapped once, lists element by element. Booleans and integers
    /// are returned unchanged.
    pub fn map_text(self, f: impl Fn(String) -> String) -> Self {
        match self {
            FieldValue::Text(s) => FieldValue::Text(f(s)),
            FieldValue::List(items) => FieldValue::List(items.into_iter().map(f).collect()),
            other => other,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_equality_is_order_sensitive() {
        assert_ne!(FieldValue::list(["A", "B"]), FieldValue::list(["B", "A"]));
        assert_eq!(FieldValue::list(["A", "B"]), FieldValue::list(["A", "B"]));
    }

    #[test]
    fn test_scalar_types_are_distinct() {
        assert_ne!(FieldValue::Integer(30), FieldValue::text("30"));
        assert_ne!(FieldValue::Bool(true), FieldValue::text("true"));
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::Bool(false).to_string(), "false");
        assert_eq!(FieldValue::Integer(-4).to_string(), "-4");
        assert_eq!(FieldValue::text("x y").to_string(), "x y");
        assert_eq!(FieldValue::list(["a", "b"]).to_string(), "[a, b]");
    }

    #[test]
    fn test_map_text_leaves_scalars_alone() {
        let upper = |s: String| s.to_uppercase();
        assert_eq!(FieldValue::text("a").map_text(upper), FieldValue::text("A"));
        assert_eq!(
            FieldValue::list(["a", "b"]).map_text(upper),
            FieldValue::list(["A", "B"])
        );
        assert_eq!(FieldValue::Integer(1).map_text(upper), FieldValue::Integer(1));
    }

    #[test]
    fn test_untagged_json_shapes() {
        let v: FieldValue = serde_json::from_str("30").unwrap();
        assert_eq!(v, FieldValue::Integer(30));
        let v: FieldValue = serde_json::from_str("\"30\"").unwrap();
        assert_eq!(v, FieldValue::text("30"));
        let v: FieldValue = serde_json::from_str("[\"a\"]").unwrap();
        assert_eq!(v, FieldValue::list(["a"]));
        let v: FieldValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, FieldValue::Bool(true));
    }
}
