//! Mock engine error types.

use http::{Method, StatusCode};
use proteus_store::StoreError;
use thiserror::Error;

/// Errors reported by the [`crate::MockEngine`].
///
/// Every variant is terminal for the current request: nothing is retried and
/// nothing is partially applied. The upstream collaborator decides the
/// outward representation; [`status_code`](Self::status_code) provides the
/// conventional mapping.
#[derive(Error, Debug)]
pub enum MockError {
    /// The requested resource does not exist.
    ///
    /// Recoverable: a GET surfaces 404. Distinct from "found but empty",
    /// which shapes into an empty-bodied success.
    #[error("resource \"{name}\" not found in collection \"{collection}\"")]
    NotFound {
        /// The collection path that was searched.
        collection: String,
        /// The resource name that was not found.
        name: String,
    },

    /// The resource store reported an internal failure.
    #[error("data store failure: {message}")]
    Backend {
        /// The originating error's message.
        message: String,
        /// The underlying error (not exposed to clients).
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The declared response schema is incompatible with the stored data.
    ///
    /// This indicates a contract defect, not a store defect, and is surfaced
    /// with backend-class severity.
    #[error("declared {expected} response cannot be shaped from stored {actual} data")]
    ShapeMismatch {
        /// The schema kind the contract declared.
        expected: &'static str,
        /// The kind of data the store actually held.
        actual: &'static str,
    },

    /// The contract declares no operation for the routed template and verb.
    ///
    /// The coercer's pass-through path should have kept such requests away
    /// from the engine; reaching here is a wiring defect.
    #[error("no operation declared for {method} {template}")]
    UnknownOperation {
        /// The request verb.
        method: Method,
        /// The routed template.
        template: String,
    },
}

impl MockError {
    /// Creates a `NotFound` error.
    #[must_use]
    pub fn not_found(collection: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            collection: collection.into(),
            name: name.into(),
        }
    }

    /// Creates a `Backend` error from a message.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a `Backend` error with the underlying error attached.
    pub fn backend_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Backend {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Creates a `ShapeMismatch` error.
    #[must_use]
    pub fn shape_mismatch(expected: &'static str, actual: &'static str) -> Self {
        Self::ShapeMismatch { expected, actual }
    }

    /// Creates an `UnknownOperation` error.
    #[must_use]
    pub fn unknown_operation(method: Method, template: impl Into<String>) -> Self {
        Self::UnknownOperation {
            method,
            template: template.into(),
        }
    }

    /// Returns `true` for the `NotFound` variant.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns the conventional HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Backend { .. } | Self::ShapeMismatch { .. } | Self::UnknownOperation { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<StoreError> for MockError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { collection, name } => Self::NotFound { collection, name },
            StoreError::Backend { message } => Self::Backend {
                message,
                source: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = MockError::not_found("/api/pets", "/Fido");
        assert!(err.is_not_found());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_backend_carries_originating_message() {
        let err = MockError::from(StoreError::backend("Test Error"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("Test Error"));
    }

    #[test]
    fn test_store_not_found_converts() {
        let err = MockError::from(StoreError::not_found("/api/pets", "/Ghost"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_shape_mismatch_is_backend_class() {
        let err = MockError::shape_mismatch("file", "object");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("file"));
    }
}
