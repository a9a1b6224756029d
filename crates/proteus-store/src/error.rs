//! Store error type.

use thiserror::Error;

/// Errors reported by a [`crate::DataStore`] implementation.
///
/// `NotFound` is recoverable by the caller (a GET surfaces 404, a DELETE
/// treats it as a no-op); `Backend` is an opaque internal failure that is
/// never retried and always terminates the request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The requested resource does not exist.
    #[error("resource \"{name}\" does not exist in collection \"{collection}\"")]
    NotFound {
        /// The collection path that was searched.
        collection: String,
        /// The resource name that was not found.
        name: String,
    },

    /// The backend reported an internal failure.
    #[error("data store error: {message}")]
    Backend {
        /// The originating error's message.
        message: String,
    },
}

impl StoreError {
    /// Creates a `NotFound` error.
    #[must_use]
    pub fn not_found(collection: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            collection: collection.into(),
            name: name.into(),
        }
    }

    /// Creates a `Backend` error from the originating error's message.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Returns `true` for the `NotFound` variant.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = StoreError::not_found("/api/pets", "/Fido");
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "resource \"/Fido\" does not exist in collection \"/api/pets\""
        );
    }

    #[test]
    fn test_backend_carries_originating_message() {
        let err = StoreError::backend("Test Error");
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("Test Error"));
    }
}
