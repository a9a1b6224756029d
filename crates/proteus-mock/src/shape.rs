//! Response shaping.
//!
//! The contract's declared response schema drives the output encoding,
//! independent of how the data happens to be stored: the same stored object
//! can come back as JSON, the whole collection, a rendered scalar, or a raw
//! binary attachment, depending only on what the operation declares.

use crate::MockError;
use chrono::{DateTime, NaiveDate, SecondsFormat};
use http::StatusCode;
use percent_encoding::{percent_encode, AsciiSet, NON_ALPHANUMERIC};
use proteus_contract::{ResponseDecl, ResponseSchema};
use proteus_store::{Payload, Resource};

/// Characters kept literal in an attachment filename; everything else is
/// percent-encoded so the header value never carries raw path characters.
const FILENAME_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// The `content-disposition` response header name.
const CONTENT_DISPOSITION: &str = "content-disposition";

/// A shaped response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapedBody {
    /// No body at all.
    Empty,
    /// Structured JSON output.
    Json(serde_json::Value),
    /// A rendered scalar.
    Text(String),
    /// Raw bytes (a `file`-shaped response).
    Binary(bytes::Bytes),
}

impl ShapedBody {
    /// Returns `true` for the empty body.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// The engine's output: a shaped body plus the resolved content type and any
/// headers the shaping step determined.
///
/// The transport collaborator turns this into the actual wire response.
#[derive(Debug, Clone, PartialEq)]
pub struct MockResponse {
    status: StatusCode,
    body: ShapedBody,
    content_type: Option<String>,
    headers: Vec<(String, String)>,
}

impl MockResponse {
    /// Creates an empty-bodied response with the given status.
    #[must_use]
    pub fn empty(status: StatusCode) -> Self {
        Self {
            status,
            body: ShapedBody::Empty,
            content_type: None,
            headers: Vec::new(),
        }
    }

    fn new(status: StatusCode, body: ShapedBody, content_type: &str) -> Self {
        Self {
            status,
            body,
            content_type: Some(content_type.to_string()),
            headers: Vec::new(),
        }
    }

    fn with_header(mut self, name: &str, value: String) -> Self {
        self.headers.push((name.to_string(), value));
        self
    }

    /// Returns the resolved status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the shaped body.
    #[must_use]
    pub fn body(&self) -> &ShapedBody {
        &self.body
    }

    /// Returns the resolved content type, if the body has one.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Returns the shaped response headers.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns the header value by name, if shaped.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Resolves the status code from the matched response declaration.
pub(crate) fn resolve_status(decl: Option<&ResponseDecl>) -> StatusCode {
    decl.and_then(ResponseDecl::status)
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::OK)
}

/// Shapes a pre-set body from upstream middleware, bypassing the schema.
pub(crate) fn shape_preset(status: StatusCode, preset: &Payload) -> MockResponse {
    match preset {
        Payload::Value(value) => MockResponse::new(
            status,
            ShapedBody::Json(value.clone()),
            mime::APPLICATION_JSON.as_ref(),
        ),
        Payload::Binary { data, media_type } => MockResponse::new(
            status,
            ShapedBody::Binary(data.clone()),
            media_type
                .as_deref()
                .unwrap_or(mime::APPLICATION_OCTET_STREAM.as_ref()),
        ),
    }
}

/// Shapes a single resource's payload per the declared schema.
///
/// `payload` is `None` when the operation produced nothing to shape (e.g. an
/// idempotent delete of an absent resource); the declared schema still
/// decides the content type semantics, but the body is empty.
pub(crate) fn shape_single(
    decl: Option<&ResponseDecl>,
    payload: Option<&Payload>,
    display_name: &str,
) -> Result<MockResponse, MockError> {
    let status = resolve_status(decl);
    let Some(schema) = decl.and_then(ResponseDecl::body_schema) else {
        return Ok(MockResponse::empty(status));
    };

    let Some(payload) = payload.filter(|p| !p.is_null()) else {
        return Ok(MockResponse::empty(status));
    };

    match schema {
        ResponseSchema::Object => Ok(MockResponse::new(
            status,
            ShapedBody::Json(payload.to_tagged_value()),
            mime::APPLICATION_JSON.as_ref(),
        )),

        // A single payload cannot satisfy an array schema; the engine
        // fetches the collection before getting here.
        ResponseSchema::Array => Err(MockError::shape_mismatch("array", payload_kind(payload))),

        ResponseSchema::String => {
            let text = match payload {
                Payload::Value(serde_json::Value::String(s)) => s.clone(),
                Payload::Binary { data, .. } => String::from_utf8_lossy(data).into_owned(),
                Payload::Value(other) => {
                    return Err(MockError::shape_mismatch("string", value_kind(other)))
                }
            };
            Ok(text_response(status, text))
        }

        ResponseSchema::Number | ResponseSchema::Integer => match payload.as_value() {
            Some(serde_json::Value::Number(n)) => Ok(text_response(status, n.to_string())),
            _ => Err(MockError::shape_mismatch("number", payload_kind(payload))),
        },

        ResponseSchema::Boolean => match payload.as_value() {
            Some(serde_json::Value::Bool(b)) => Ok(text_response(status, b.to_string())),
            _ => Err(MockError::shape_mismatch("boolean", payload_kind(payload))),
        },

        ResponseSchema::Date => {
            let date = payload
                .as_value()
                .and_then(serde_json::Value::as_str)
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
                .ok_or_else(|| MockError::shape_mismatch("date", payload_kind(payload)))?;
            Ok(text_response(status, date.format("%Y-%m-%d").to_string()))
        }

        ResponseSchema::DateTime => {
            let dt = payload
                .as_value()
                .and_then(serde_json::Value::as_str)
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .ok_or_else(|| MockError::shape_mismatch("date & time", payload_kind(payload)))?;
            Ok(text_response(
                status,
                dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            ))
        }

        ResponseSchema::File => {
            let Payload::Binary { data, media_type } = payload else {
                return Err(MockError::shape_mismatch("file", payload_kind(payload)));
            };
            let mut response = MockResponse::new(
                status,
                ShapedBody::Binary(data.clone()),
                media_type
                    .as_deref()
                    .unwrap_or(mime::APPLICATION_OCTET_STREAM.as_ref()),
            );
            if decl.is_some_and(|d| d.declares_header(CONTENT_DISPOSITION)) {
                response = response
                    .with_header(CONTENT_DISPOSITION, attachment_disposition(display_name));
            }
            Ok(response)
        }
    }
}

/// Shapes an ordered collection per the declared schema.
pub(crate) fn shape_collection(
    decl: Option<&ResponseDecl>,
    resources: &[Resource],
) -> Result<MockResponse, MockError> {
    let status = resolve_status(decl);
    match decl.and_then(ResponseDecl::body_schema) {
        None => Ok(MockResponse::empty(status)),
        Some(ResponseSchema::Array) => {
            let items: Vec<serde_json::Value> = resources
                .iter()
                .map(|r| r.data().to_tagged_value())
                .collect();
            Ok(MockResponse::new(
                status,
                ShapedBody::Json(serde_json::Value::Array(items)),
                mime::APPLICATION_JSON.as_ref(),
            ))
        }
        Some(_) => Err(MockError::shape_mismatch("array", "collection")),
    }
}

fn text_response(status: StatusCode, text: String) -> MockResponse {
    MockResponse::new(status, ShapedBody::Text(text), mime::TEXT_PLAIN_UTF_8.as_ref())
}

/// Builds the attachment `content-disposition` value for a resource name.
///
/// The plain `filename` parameter carries the percent-encoded name (header
/// values cannot carry arbitrary literal characters from the raw path
/// segment); the RFC 5987 `filename*` parameter re-encodes that encoded
/// form.
fn attachment_disposition(filename: &str) -> String {
    let encoded = percent_encode(filename.as_bytes(), FILENAME_SAFE).to_string();
    let double_encoded = percent_encode(encoded.as_bytes(), FILENAME_SAFE).to_string();
    format!("attachment; filename=\"{encoded}\"; filename*=UTF-8''{double_encoded}")
}

/// Names a payload's kind for shape-mismatch messages.
fn payload_kind(payload: &Payload) -> &'static str {
    match payload {
        Payload::Value(value) => value_kind(value),
        Payload::Binary { .. } => "binary",
    }
}

/// Names a JSON value's kind for shape-mismatch messages.
fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
