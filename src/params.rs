//! Route parameter maps
//!
//! Parameters captured from path segments (like `:id`) and parameters
//! supplied when reverse-resolving a named route. Values are always stored as
//! strings; insertion accepts anything `ToString` so numeric values coerce at
//! the call site (`params.insert("id", 1)` produces `"1"`).

use std::collections::HashMap;

/// Route parameters keyed by placeholder name
///
/// # Example
///
/// ```
/// use wayfinder::Params;
///
/// // Route pattern: /users/:id
/// // Matched path:  /users/123
/// let mut params = Params::new();
/// params.insert("id", "123");
///
/// assert_eq!(params.get("id"), Some("123"));
/// assert_eq!(params.get_as::<i32>("id"), Some(123));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    params: HashMap<String, String>,
}

impl Params {
    /// Create new empty params
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a plain string map
    pub fn from_map(params: HashMap<String, String>) -> Self {
        Self { params }
    }

    /// Get a parameter value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(|s| s.as_str())
    }

    /// Get a parameter parsed as a specific type
    ///
    /// Returns `None` if the parameter doesn't exist or cannot be parsed.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.params.get(key)?.parse().ok()
    }

    /// Insert a parameter, coercing the value to its string form
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        self.params.insert(key.into(), value.to_string());
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Check if a parameter exists
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// All parameters as a plain map
    pub fn all(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Iterate over all parameters
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.params.iter()
    }

    /// Check if there are no parameters
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.params.len()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_basic() {
        let mut params = Params::new();
        params.insert("id", "123");

        assert_eq!(params.get("id"), Some("123"));
        assert!(params.contains("id"));
        assert!(!params.contains("missing"));
    }

    #[test]
    fn test_params_numeric_coercion() {
        let mut params = Params::new();
        params.insert("id", 1);
        params.insert("page", 42u64);

        assert_eq!(params.get("id"), Some("1"));
        assert_eq!(params.get("page"), Some("42"));
    }

    #[test]
    fn test_params_get_as() {
        let mut params = Params::new();
        params.insert("id", "123");
        params.insert("active", "true");

        assert_eq!(params.get_as::<i32>("id"), Some(123));
        assert_eq!(params.get_as::<bool>("active"), Some(true));
        assert_eq!(params.get_as::<i32>("missing"), None);
    }

    #[test]
    fn test_params_from_iter() {
        let params: Params = [("name", "John"), ("age", "30")].into_iter().collect();

        assert_eq!(params.get("name"), Some("John"));
        assert_eq!(params.get_as::<i32>("age"), Some(30));
    }

    #[test]
    fn test_params_empty() {
        let params = Params::new();
        assert!(params.is_empty());
        assert_eq!(params.len(), 0);

        let params = Params::new().with("key", "value");
        assert!(!params.is_empty());
        assert_eq!(params.len(), 1);
    }
}
