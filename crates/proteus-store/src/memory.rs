//! In-memory reference store.

use crate::resource::{normalize_collection, normalize_name};
use crate::{DataStore, Payload, Resource, StoreError};
use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;

/// The in-memory reference implementation of [`DataStore`].
///
/// Collections are insertion-ordered maps from resource name to resource,
/// guarded by a single `RwLock`. Every operation runs as one uninterrupted
/// critical section, so a read-modify-write merge never tears even under
/// concurrent requests. The store introduces no failure mode beyond
/// [`StoreError::NotFound`].
///
/// # Example
///
/// ```
/// use proteus_store::{DataStore, MemoryDataStore, Payload, Resource};
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let store = MemoryDataStore::new();
/// let fido = Resource::new("/api/pets", "Fido", Payload::json(json!({"Type": "dog"})));
/// store.save_resource(fido).await.unwrap();
///
/// let found = store.get_resource("/api/pets", "Fido").await.unwrap();
/// assert!(found.is_some());
/// # });
/// ```
#[derive(Debug, Default)]
pub struct MemoryDataStore {
    collections: RwLock<IndexMap<String, IndexMap<String, Resource>>>,
}

impl MemoryDataStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataStore for MemoryDataStore {
    async fn get_resource(
        &self,
        collection: &str,
        name: &str,
    ) -> Result<Option<Resource>, StoreError> {
        let collection = normalize_collection(collection);
        let name = normalize_name(name);
        Ok(self
            .collections
            .read()
            .get(&collection)
            .and_then(|resources| resources.get(&name))
            .cloned())
    }

    async fn get_collection(&self, collection: &str) -> Result<Vec<Resource>, StoreError> {
        let collection = normalize_collection(collection);
        Ok(self
            .collections
            .read()
            .get(&collection)
            .map(|resources| resources.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn save_resource(&self, resource: Resource) -> Result<(), StoreError> {
        tracing::debug!(
            collection = %resource.collection(),
            name = %resource.name(),
            "Saving resource"
        );
        let mut collections = self.collections.write();
        collections
            .entry(resource.collection().to_string())
            .or_default()
            .insert(resource.name().to_string(), resource);
        Ok(())
    }

    async fn update_resource(
        &self,
        collection: &str,
        name: &str,
        partial: Payload,
    ) -> Result<Resource, StoreError> {
        let collection = normalize_collection(collection);
        let name = normalize_name(name);
        tracing::debug!(collection = %collection, name = %name, "Merging resource");

        // One uninterrupted read-modify-write per call; concurrent merges to
        // the same resource cannot tear.
        let mut collections = self.collections.write();
        let resource = collections
            .get_mut(&collection)
            .and_then(|resources| resources.get_mut(&name))
            .ok_or_else(|| StoreError::not_found(&collection, &name))?;
        resource.merge(partial);
        Ok(resource.clone())
    }

    async fn delete_resource(
        &self,
        collection: &str,
        name: &str,
    ) -> Result<Option<Resource>, StoreError> {
        let collection = normalize_collection(collection);
        let name = normalize_name(name);
        tracing::debug!(collection = %collection, name = %name, "Deleting resource");
        Ok(self
            .collections
            .write()
            .get_mut(&collection)
            .and_then(|resources| resources.shift_remove(&name)))
    }

    async fn delete_collection(&self, collection: &str) -> Result<Vec<Resource>, StoreError> {
        let collection = normalize_collection(collection);
        tracing::debug!(collection = %collection, "Deleting collection");
        Ok(self
            .collections
            .write()
            .shift_remove(&collection)
            .map(|resources| resources.into_values().collect())
            .unwrap_or_default())
    }
}
