//! Resources and their payloads.

use crate::merge::deep_merge;
use bytes::Bytes;
use chrono::{DateTime, Utc};

/// The data carried by a resource: structured JSON or a binary buffer.
///
/// A binary payload remembers the media type it arrived with (e.g. the
/// uploaded file's content type) so a `file`-shaped response can serve it
/// back faithfully. It is also representable as a tagged byte-sequence JSON
/// value, or as its decoded string form, for responses whose declared
/// schema is `object` or `string` rather than `file`.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Structured data (object, array, scalar, or null).
    Value(serde_json::Value),
    /// A binary buffer, e.g. an uploaded file.
    Binary {
        /// The raw bytes.
        data: Bytes,
        /// The media type the buffer arrived with, if known.
        media_type: Option<String>,
    },
}

impl Payload {
    /// Creates a structured payload.
    #[must_use]
    pub fn json(value: serde_json::Value) -> Self {
        Self::Value(value)
    }

    /// Creates a binary payload without a known media type.
    #[must_use]
    pub fn binary(data: impl Into<Bytes>) -> Self {
        Self::Binary {
            data: data.into(),
            media_type: None,
        }
    }

    /// Creates a binary payload with its media type.
    #[must_use]
    pub fn binary_with_type(data: impl Into<Bytes>, media_type: impl Into<String>) -> Self {
        Self::Binary {
            data: data.into(),
            media_type: Some(media_type.into()),
        }
    }

    /// Returns the structured value, if this payload is one.
    #[must_use]
    pub fn as_value(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Binary { .. } => None,
        }
    }

    /// Returns the binary buffer, if this payload is one.
    #[must_use]
    pub fn as_binary(&self) -> Option<&Bytes> {
        match self {
            Self::Binary { data, .. } => Some(data),
            Self::Value(_) => None,
        }
    }

    /// Returns the binary payload's media type, if known.
    #[must_use]
    pub fn media_type(&self) -> Option<&str> {
        match self {
            Self::Binary { media_type, .. } => media_type.as_deref(),
            Self::Value(_) => None,
        }
    }

    /// Returns `true` for a structured `null` payload.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Value(serde_json::Value::Null))
    }

    /// Converts the payload into a JSON value.
    ///
    /// Structured data converts as-is; a binary buffer becomes the tagged
    /// byte-sequence form `{"type": "bytes", "data": [..]}`.
    #[must_use]
    pub fn to_tagged_value(&self) -> serde_json::Value {
        match self {
            Self::Value(value) => value.clone(),
            Self::Binary { data, .. } => serde_json::json!({
                "type": "bytes",
                "data": data.iter().copied().collect::<Vec<u8>>(),
            }),
        }
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Self::Value(value)
    }
}

/// One named, persisted unit of data within a collection.
///
/// A resource is exclusively owned by its store; the mock engine reads and
/// writes it only through the [`crate::DataStore`] interface. Collection
/// paths and names are normalized on construction so `(collection, name)`
/// works as a stable key: collections keep a leading slash and lose any
/// trailing one, names keep a leading slash.
///
/// # Example
///
/// ```
/// use proteus_store::{Payload, Resource};
/// use serde_json::json;
///
/// let resource = Resource::new("/api/pets/", "Fido", Payload::json(json!({"Type": "dog"})));
/// assert_eq!(resource.collection(), "/api/pets");
/// assert_eq!(resource.name(), "/Fido");
/// assert_eq!(resource.display_name(), "Fido");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    collection: String,
    name: String,
    data: Payload,
    last_modified: DateTime<Utc>,
}

impl Resource {
    /// Creates a resource with normalized collection path and name.
    #[must_use]
    pub fn new(collection: &str, name: &str, data: Payload) -> Self {
        Self {
            collection: normalize_collection(collection),
            name: normalize_name(name),
            data,
            last_modified: Utc::now(),
        }
    }

    /// Creates a resource from a concrete request path.
    ///
    /// The trailing segment identifies the resource, the rest is the
    /// collection: `/api/pets/Fido` becomes `("/api/pets", "/Fido")`.
    #[must_use]
    pub fn from_path(path: &str, data: Payload) -> Self {
        let (collection, name) = split_path(path);
        Self::new(&collection, &name, data)
    }

    /// Returns the normalized collection path.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Returns the normalized resource name (with leading slash).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the resource name without its leading slash.
    ///
    /// Suitable for human-facing uses such as attachment filenames.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.trim_start_matches('/')
    }

    /// Returns the resource data.
    #[must_use]
    pub fn data(&self) -> &Payload {
        &self.data
    }

    /// Consumes the resource and returns its data.
    #[must_use]
    pub fn into_data(self) -> Payload {
        self.data
    }

    /// Returns when the resource was last created or modified.
    #[must_use]
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    /// Replaces the data wholesale and bumps `last_modified`.
    pub fn replace_data(&mut self, data: Payload) {
        self.data = data;
        self.touch();
    }

    /// Deep-merges an incoming payload into the existing data.
    ///
    /// Structured-into-structured merges per [`deep_merge`]; any pairing
    /// involving a binary payload replaces wholesale. Bumps `last_modified`.
    pub fn merge(&mut self, incoming: Payload) {
        match (&mut self.data, incoming) {
            (Payload::Value(existing), Payload::Value(incoming)) => {
                deep_merge(existing, incoming);
            }
            (slot, incoming) => *slot = incoming,
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.last_modified = Utc::now();
    }
}

/// Splits a concrete path into `(collection, name)` at the last segment.
#[must_use]
pub fn split_path(path: &str) -> (String, String) {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => (
            normalize_collection(&trimmed[..idx]),
            normalize_name(&trimmed[idx..]),
        ),
        None => (normalize_collection(""), normalize_name(trimmed)),
    }
}

/// Normalizes a collection path: leading slash, no trailing slash.
#[must_use]
pub fn normalize_collection(collection: &str) -> String {
    let trimmed = collection.trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Normalizes a resource name: leading slash.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    if name.starts_with('/') {
        name.to_string()
    } else {
        format!("/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalization() {
        let resource = Resource::new("api/pets/", "Fluffy", Payload::json(json!({})));
        assert_eq!(resource.collection(), "/api/pets");
        assert_eq!(resource.name(), "/Fluffy");
    }

    #[test]
    fn test_from_path_splits_trailing_segment() {
        let resource = Resource::from_path("/api/pets/Fido", Payload::json(json!({})));
        assert_eq!(resource.collection(), "/api/pets");
        assert_eq!(resource.name(), "/Fido");
        assert_eq!(resource.display_name(), "Fido");
    }

    #[test]
    fn test_split_path_single_segment() {
        let (collection, name) = split_path("/pets");
        assert_eq!(collection, "/");
        assert_eq!(name, "/pets");
    }

    #[test]
    fn test_replace_discards_previous_data() {
        let mut resource = Resource::new(
            "/api/pets",
            "Fido",
            Payload::json(json!({"Type": "dog", "Vet": {"Name": "Vet Name"}})),
        );
        resource.replace_data(Payload::json(json!({"Type": "cat"})));

        assert_eq!(resource.data().as_value(), Some(&json!({"Type": "cat"})));
    }

    #[test]
    fn test_merge_structured_data() {
        let mut resource = Resource::new(
            "/api/pets",
            "Fido",
            Payload::json(json!({"Name": "Fido", "Type": "dog"})),
        );
        resource.merge(Payload::json(json!({"Type": "cat", "Age": 4})));

        assert_eq!(
            resource.data().as_value(),
            Some(&json!({"Name": "Fido", "Type": "cat", "Age": 4}))
        );
    }

    #[test]
    fn test_merge_binary_replaces_wholesale() {
        let mut resource = Resource::new(
            "/api/pets",
            "Fido",
            Payload::json(json!({"Name": "Fido"})),
        );
        resource.merge(Payload::binary_with_type(&b"jpeg bytes"[..], "image/jpeg"));

        assert_eq!(resource.data().as_binary().map(|b| b.as_ref()), Some(&b"jpeg bytes"[..]));
        assert_eq!(resource.data().media_type(), Some("image/jpeg"));
    }

    #[test]
    fn test_tagged_value_for_binary() {
        let payload = Payload::binary(&b"hi"[..]);
        assert_eq!(
            payload.to_tagged_value(),
            json!({"type": "bytes", "data": [104, 105]})
        );
    }

    #[test]
    fn test_null_payload() {
        assert!(Payload::json(json!(null)).is_null());
        assert!(!Payload::binary(&b""[..]).is_null());
    }
}
