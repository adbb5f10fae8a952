//! Source attributes and translated claims.
//!
//! An upstream assertion can carry several values per attribute, so
//! [`SourceAttributes`] maps each attribute name to an ordered list of
//! values. Translation produces [`Claims`], where each claim is either a
//! single string or an ordered list depending on the multi-value policy.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Attributes released by the upstream identity provider.
///
/// Insertion order is preserved so diagnostics list attributes in the
/// order the provider released them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceAttributes(IndexMap<String, Vec<String>>);

impl SourceAttributes {
    /// Creates an empty attribute set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an attribute, replacing any previous values.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Option<Vec<String>> {
        self.0
            .insert(name.into(), values.into_iter().map(Into::into).collect())
    }

    /// Adds an attribute, builder style.
    #[must_use]
    pub fn with(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.insert(name, values);
        self
    }

    /// Removes an attribute, keeping the order of the remaining ones.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.0.shift_remove(name)
    }

    /// Returns the values of an attribute.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    /// Returns the first value of an attribute.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.first()).map(String::as_str)
    }

    /// Returns `true` if the attribute was released, even with no values.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Returns the attribute names in release order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterates over `(name, values)` pairs in release order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Keeps only the attributes for which the predicate returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.0.retain(|name, _| keep(name));
    }

    /// Returns the number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no attributes were released.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, I> FromIterator<(K, I)> for SourceAttributes
where
    K: Into<String>,
    I: IntoIterator,
    I::Item: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        let mut attributes = Self::new();
        for (name, values) in iter {
            attributes.insert(name, values);
        }
        attributes
    }
}

impl From<IndexMap<String, Vec<String>>> for SourceAttributes {
    fn from(map: IndexMap<String, Vec<String>>) -> Self {
        Self(map)
    }
}

/// The value of a translated claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimValue {
    /// The first value of the matched source attribute.
    Single(String),
    /// Every value of the matched source attribute, in release order.
    Multiple(Vec<String>),
}

impl ClaimValue {
    /// Returns the value if this is a single-valued claim.
    #[must_use]
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::Multiple(_) => None,
        }
    }

    /// Returns all values as a slice-like list.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Single(value) => vec![value.as_str()],
            Self::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<Vec<String>> for ClaimValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multiple(values)
    }
}

/// Claims keyed by claim name.
pub type Claims = IndexMap<String, ClaimValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut attrs = SourceAttributes::new();
        attrs.insert("mail", ["a@example.org", "b@example.org"]);

        assert_eq!(
            attrs.get("mail"),
            Some(&["a@example.org".to_string(), "b@example.org".to_string()][..])
        );
        assert_eq!(attrs.first("mail"), Some("a@example.org"));
        assert!(attrs.get("cn").is_none());
    }

    #[test]
    fn test_first_of_empty_attribute() {
        let attrs = SourceAttributes::new().with("uid", Vec::<String>::new());
        assert!(attrs.contains("uid"));
        assert_eq!(attrs.first("uid"), None);
    }

    #[test]
    fn test_names_preserve_release_order() {
        let attrs = SourceAttributes::new()
            .with("sn", ["One"])
            .with("cn", ["User One"])
            .with("mail", ["u1@example.org"]);

        let names: Vec<_> = attrs.names().collect();
        assert_eq!(names, vec!["sn", "cn", "mail"]);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut attrs = SourceAttributes::new()
            .with("a", ["1"])
            .with("b", ["2"])
            .with("c", ["3"]);
        attrs.remove("a");
        let names: Vec<_> = attrs.names().collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn test_from_iterator() {
        let attrs: SourceAttributes = vec![("uid", vec!["u1"]), ("cn", vec!["User One"])]
            .into_iter()
            .collect();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.first("uid"), Some("u1"));
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let attrs = SourceAttributes::new().with("uid", ["u1"]);
        let json = serde_json::to_value(&attrs).unwrap();
        assert_eq!(json, serde_json::json!({"uid": ["u1"]}));
    }

    #[test]
    fn test_claim_value_serialization() {
        assert_eq!(
            serde_json::to_value(ClaimValue::from("x")).unwrap(),
            serde_json::json!("x")
        );
        assert_eq!(
            serde_json::to_value(ClaimValue::from(vec!["a".to_string(), "b".to_string()]))
                .unwrap(),
            serde_json::json!(["a", "b"])
        );
    }

    #[test]
    fn test_claim_value_accessors() {
        let single = ClaimValue::from("x");
        assert_eq!(single.as_single(), Some("x"));
        assert_eq!(single.values(), vec!["x"]);

        let multiple = ClaimValue::from(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(multiple.as_single(), None);
        assert_eq!(multiple.values(), vec!["a", "b"]);
    }
}
