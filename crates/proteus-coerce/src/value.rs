//! Typed parameter values.

use base64::Engine as _;
use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat};

/// A coerced parameter value, tagged with its resolved type.
///
/// `Raw` is the pass-through tag: the route or capture had no matching
/// declaration in the current contract, so the string crossed the coercer
/// untouched.
///
/// # Example
///
/// ```
/// use proteus_coerce::TypedValue;
///
/// let value = TypedValue::Integer(12345);
/// assert_eq!(value.canonical_string(), "12345");
/// assert_eq!(value.as_i64(), Some(12345));
/// assert!(value.as_bool().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// A declared plain string.
    String(String),
    /// A whole number.
    Integer(i64),
    /// A decimal number.
    Number(f64),
    /// A boolean.
    Boolean(bool),
    /// A calendar date without a time component.
    Date(NaiveDate),
    /// A full timestamp with offset.
    DateTime(DateTime<FixedOffset>),
    /// Decoded base64 bytes.
    Bytes(Vec<u8>),
    /// Pass-through string: no contract declaration matched.
    Raw(String),
}

impl TypedValue {
    /// Renders the value back to its canonical string form.
    ///
    /// Re-coercing the canonical form under the same declaration yields an
    /// equal value (round-trip identity).
    #[must_use]
    pub fn canonical_string(&self) -> String {
        match self {
            Self::String(s) | Self::Raw(s) => s.clone(),
            Self::Integer(n) => n.to_string(),
            Self::Number(n) => n.to_string(),
            Self::Boolean(b) => b.to_string(),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
            Self::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, false),
            Self::Bytes(bytes) => base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Converts the value into a JSON representation.
    ///
    /// Bytes render as their base64 form; a non-finite number renders as
    /// `null` since JSON has no representation for it.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::String(s) | Self::Raw(s) => serde_json::Value::String(s.clone()),
            Self::Integer(n) => serde_json::Value::from(*n),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::Boolean(b) => serde_json::Value::Bool(*b),
            Self::Date(_) | Self::DateTime(_) | Self::Bytes(_) => {
                serde_json::Value::String(self.canonical_string())
            }
        }
    }

    /// Returns the string content for `String` and `Raw` values.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Raw(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer content, if this is an `Integer`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the float content, if this is a `Number`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean content, if this is a `Boolean`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the date content, if this is a `Date`.
    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the timestamp content, if this is a `DateTime`.
    #[must_use]
    pub fn as_datetime(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Returns the byte content, if this is `Bytes`.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns `true` when the value passed through without a declaration.
    #[must_use]
    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }
}
