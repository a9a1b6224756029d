//! Coercion error type.

use http::StatusCode;
use proteus_contract::ParamKind;
use thiserror::Error;

/// A path parameter's raw value did not match its declared kind.
///
/// The first failing parameter aborts the whole coercion call; nothing is
/// partially coerced. The error identifies the parameter, the offending raw
/// value, and the expected kind.
///
/// # Example
///
/// ```
/// use proteus_coerce::CoercionError;
/// use proteus_contract::ParamKind;
///
/// let err = CoercionError::new("ID", "52.5", ParamKind::Integer);
/// assert!(err
///     .to_string()
///     .contains("\"52.5\" is not a properly-formatted whole number"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid path parameter \"{name}\": \"{value}\" is not a properly-formatted {expected}")]
pub struct CoercionError {
    name: String,
    value: String,
    expected: &'static str,
}

impl CoercionError {
    /// Creates an error for the given parameter, raw value, and declared kind.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            expected: kind.expected(),
        }
    }

    /// Returns the offending parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw value that failed to convert.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the expected kind, as used in the message.
    #[must_use]
    pub fn expected(&self) -> &'static str {
        self.expected
    }

    /// Returns the HTTP status code for this error.
    ///
    /// A coercion failure is always the client's malformed input.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}
