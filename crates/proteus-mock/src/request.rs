//! The request boundary type.

use http::Method;
use proteus_store::Payload;

/// One validated, coerced request as handed to the [`crate::MockEngine`].
///
/// Built by the routing/validation collaborators: the matched route
/// template, the verb, the raw path captures (percent-decoded), the decoded
/// request payload with its content type, and optionally a pre-set response
/// body that upstream middleware already produced, which the engine must
/// not overwrite (first-writer-wins).
///
/// # Example
///
/// ```
/// use http::Method;
/// use proteus_mock::MockRequest;
/// use proteus_store::Payload;
/// use serde_json::json;
///
/// let request = MockRequest::new(Method::PUT, "/pets/{PetName}")
///     .param("PetName", "Fido")
///     .payload(Payload::json(json!({"Name": "Fido", "Type": "dog"})))
///     .content_type("application/json");
///
/// assert_eq!(request.params().get("PetName"), Some("Fido"));
/// ```
#[derive(Debug, Clone)]
pub struct MockRequest {
    method: Method,
    template: String,
    params: RawCaptures,
    payload: Option<Payload>,
    content_type: Option<String>,
    preset_body: Option<Payload>,
}

/// Raw path captures as `(name, value)` pairs in capture order.
pub type RawCaptures = Vec<(String, String)>;

impl MockRequest {
    /// Creates a request for the given verb and route template.
    #[must_use]
    pub fn new(method: Method, template: impl Into<String>) -> Self {
        Self {
            method,
            template: template.into(),
            params: Vec::new(),
            payload: None,
            content_type: None,
            preset_body: None,
        }
    }

    /// Adds a raw path capture.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Sets the decoded request payload.
    #[must_use]
    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Sets the payload's declared content type.
    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Sets a response body produced by upstream middleware.
    ///
    /// The engine still performs the store operation, but returns this body
    /// unmodified instead of its own shaped output.
    #[must_use]
    pub fn preset_body(mut self, body: Payload) -> Self {
        self.preset_body = Some(body);
        self
    }

    /// Returns the request verb.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the matched route template.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the raw path captures.
    #[must_use]
    pub fn params(&self) -> ParamsView<'_> {
        ParamsView(&self.params)
    }

    /// Returns the decoded request payload, if any.
    #[must_use]
    pub fn body(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// Returns the payload's declared content type, if any.
    #[must_use]
    pub fn body_content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Returns the pre-set response body, if upstream middleware set one.
    #[must_use]
    pub fn preset(&self) -> Option<&Payload> {
        self.preset_body.as_ref()
    }
}

/// Borrowed view over the raw captures.
#[derive(Debug, Clone, Copy)]
pub struct ParamsView<'a>(&'a [(String, String)]);

impl<'a> ParamsView<'a> {
    /// Returns the raw value for a capture by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if there are no captures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the captures in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builder() {
        let request = MockRequest::new(Method::PATCH, "/pets/{PetName}")
            .param("PetName", "Fido")
            .payload(Payload::json(json!({"Type": "dog"})))
            .content_type("application/json");

        assert_eq!(request.method(), &Method::PATCH);
        assert_eq!(request.template(), "/pets/{PetName}");
        assert_eq!(request.params().get("PetName"), Some("Fido"));
        assert_eq!(request.body_content_type(), Some("application/json"));
        assert!(request.preset().is_none());
    }

    #[test]
    fn test_params_view_misses() {
        let request = MockRequest::new(Method::GET, "/pets");
        assert!(request.params().is_empty());
        assert_eq!(request.params().get("PetName"), None);
    }
}
