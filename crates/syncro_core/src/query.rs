//! Ordered query-string parameters.

use serde::Serialize;
use std::fmt::Display;

/// Ordered list of query parameters.
///
/// Insertion order is kept so generated URLs are stable. Optional values that
/// are `None` are never added.
///
/// # Examples
///
/// ```
/// use syncro_core::QueryParams;
///
/// let query = QueryParams::new()
///     .with("query", "acme")
///     .with_opt("customer_id", None::<u64>)
///     .with("include_disabled", true);
/// assert_eq!(query.len(), 2);
/// assert_eq!(query.get("include_disabled"), Some("true"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// An empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter.
    pub fn push(&mut self, key: impl Into<String>, value: impl Display) {
        self.0.push((key.into(), value.to_string()));
    }

    /// Append a parameter if it has a value.
    pub fn push_opt(&mut self, key: impl Into<String>, value: Option<impl Display>) {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.push(key, value);
        self
    }

    /// Builder-style [`push_opt`](Self::push_opt).
    pub fn with_opt(mut self, key: impl Into<String>, value: Option<impl Display>) -> Self {
        self.push_opt(key, value);
        self
    }

    /// Append every parameter of `other`.
    pub fn extend(&mut self, other: &QueryParams) {
        self.0.extend(other.0.iter().cloned());
    }

    /// First value recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Display,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = QueryParams::new();
        for (key, value) in iter {
            query.push(key, value);
        }
        query
    }
}
