//! The store capability trait.

use crate::{Payload, Resource, StoreError};
use async_trait::async_trait;

/// CRUD persistence for mock resources, keyed by `(collection, name)`.
///
/// All operations are async: a backend may suspend on disk or network I/O.
/// Each operation completes exactly once, with a result or an error, and is
/// never partially applied: a failed save must not leave a half-written
/// resource visible to concurrent readers.
///
/// Implementations own serialization per resource key: the reference
/// [`crate::MemoryDataStore`] performs each read-modify-write as one
/// uninterrupted step, so concurrent merges to the same resource do not
/// tear. No cross-call atomicity is promised by the interface.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Returns the resource, or `None` if it does not exist.
    async fn get_resource(
        &self,
        collection: &str,
        name: &str,
    ) -> Result<Option<Resource>, StoreError>;

    /// Returns every resource in the collection, in insertion order.
    ///
    /// An unknown or empty collection yields an empty vec, never an error.
    async fn get_collection(&self, collection: &str) -> Result<Vec<Resource>, StoreError>;

    /// Inserts the resource, fully overwriting any previous data under the
    /// same `(collection, name)`.
    async fn save_resource(&self, resource: Resource) -> Result<(), StoreError>;

    /// Deep-merges `partial` into the existing resource and persists it.
    ///
    /// Returns the merged resource. A missing base is
    /// [`StoreError::NotFound`]: merge needs something to merge into.
    async fn update_resource(
        &self,
        collection: &str,
        name: &str,
        partial: Payload,
    ) -> Result<Resource, StoreError>;

    /// Removes the resource, returning it if it existed.
    ///
    /// Deleting an absent resource is not an error (`Ok(None)`).
    async fn delete_resource(
        &self,
        collection: &str,
        name: &str,
    ) -> Result<Option<Resource>, StoreError>;

    /// Removes the whole collection, returning the removed resources in
    /// insertion order (empty vec if there were none).
    async fn delete_collection(&self, collection: &str) -> Result<Vec<Resource>, StoreError>;
}
