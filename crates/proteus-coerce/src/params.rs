//! Captured path parameter storage.
//!
//! Both the raw captures handed in by the router and the typed values handed
//! back use a small-vector representation: routes rarely carry more than a
//! handful of parameters, so the common case stays off the heap and capture
//! order is preserved.

use crate::TypedValue;
use smallvec::SmallVec;

/// Maximum number of parameters stored inline (stack allocated).
const INLINE_PARAMS: usize = 4;

/// Raw path captures from a route match, as `(name, value)` pairs.
///
/// Values are the percent-decoded segment strings exactly as the transport
/// layer captured them; no interpretation has happened yet.
///
/// # Example
///
/// ```
/// use proteus_coerce::RawParams;
///
/// let mut params = RawParams::new();
/// params.push("PetName", "Fido");
/// params.push("ID", "12345");
///
/// assert_eq!(params.get("PetName"), Some("Fido"));
/// assert_eq!(params.get("unknown"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawParams {
    inner: SmallVec<[(String, String); INLINE_PARAMS]>,
}

impl RawParams {
    /// Creates an empty capture set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a captured parameter.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Returns the raw value for a parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if there are no captures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of captures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns an iterator over the captures in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for RawParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

/// Coerced parameter values, preserving capture order.
///
/// Created per request by [`crate::coerce_path_params`] and discarded when
/// the request completes; never shared across requests.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypedParams {
    inner: SmallVec<[(String, TypedValue); INLINE_PARAMS]>,
}

impl TypedParams {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set with the given capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: SmallVec::with_capacity(capacity),
        }
    }

    /// Adds a typed value.
    pub fn push(&mut self, name: impl Into<String>, value: TypedValue) {
        self.inner.push((name.into(), value));
    }

    /// Returns the typed value for a parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.inner.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Returns `true` if there are no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns an iterator over the values in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedValue)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl FromIterator<(String, TypedValue)> for TypedParams {
    fn from_iter<I: IntoIterator<Item = (String, TypedValue)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_params_push_and_get() {
        let mut params = RawParams::new();
        params.push("PetName", "Fido");
        params.push("ID", "12345");

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("PetName"), Some("Fido"));
        assert_eq!(params.get("ID"), Some("12345"));
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn test_raw_params_preserve_capture_order() {
        let mut params = RawParams::new();
        params.push("b", "2");
        params.push("a", "1");

        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![("b", "2"), ("a", "1")]);
    }

    #[test]
    fn test_raw_params_from_iterator() {
        let params: RawParams = vec![("a".to_string(), "1".to_string())].into_iter().collect();
        assert_eq!(params.get("a"), Some("1"));
    }

    #[test]
    fn test_typed_params_get() {
        let mut params = TypedParams::new();
        params.push("ID", TypedValue::Integer(12345));

        assert_eq!(params.get("ID"), Some(&TypedValue::Integer(12345)));
        assert!(params.get("PetName").is_none());
    }

    #[test]
    fn test_typed_params_beyond_inline_capacity() {
        let mut params = TypedParams::new();
        for i in 0..10 {
            params.push(format!("key{i}"), TypedValue::Integer(i));
        }

        assert_eq!(params.len(), 10);
        assert_eq!(params.get("key7"), Some(&TypedValue::Integer(7)));
    }
}
