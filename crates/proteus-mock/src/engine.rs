//! The mock engine itself.

use crate::shape::{resolve_status, shape_collection, shape_preset, shape_single};
use crate::{MockError, MockRequest, MockResponse};
use http::Method;
use proteus_contract::{Contract, Operation, ParameterDecl, ResponseDecl, ResponseSchema, Route};
use proteus_store::resource::{normalize_collection, split_path};
use proteus_store::{DataStore, Payload, Resource};
use std::sync::Arc;

/// Orchestrates one request: operation selection, store CRUD, response
/// shaping.
///
/// The engine holds the store as a shared capability; the contract arrives
/// per request as the snapshot the caller already cloned from the registry,
/// so a hot-swap mid-request never changes the rules under a running
/// operation.
///
/// # Example
///
/// ```
/// use http::Method;
/// use proteus_contract::{Contract, Operation, ParameterDecl, ResponseDecl, ResponseSchema, Route};
/// use proteus_mock::{MockEngine, MockRequest, ShapedBody};
/// use proteus_store::{MemoryDataStore, Payload};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// # tokio_test::block_on(async {
/// let contract = Contract::builder("petstore")
///     .route(
///         Route::builder("/pets/{PetName}")
///             .operation(
///                 Operation::builder(Method::PUT)
///                     .parameter(ParameterDecl::path("PetName"))
///                     .response(ResponseDecl::new(200).schema(ResponseSchema::Object))
///                     .build(),
///             )
///             .build(),
///     )
///     .build();
///
/// let engine = MockEngine::new(Arc::new(MemoryDataStore::new()));
/// let request = MockRequest::new(Method::PUT, "/pets/{PetName}")
///     .param("PetName", "Fido")
///     .payload(Payload::json(json!({"Name": "Fido", "Type": "dog"})));
///
/// let response = engine.handle(&contract, &request).await.unwrap();
/// assert_eq!(
///     response.body(),
///     &ShapedBody::Json(json!({"Name": "Fido", "Type": "dog"}))
/// );
/// # });
/// ```
pub struct MockEngine {
    store: Arc<dyn DataStore>,
}

/// The behavior an operation's declared verb selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Semantics {
    /// Full overwrite (typically PUT).
    Replace,
    /// Deep merge into the existing resource (typically POST/PATCH).
    Merge,
    /// Read a resource or collection (GET/HEAD).
    Read,
    /// Remove a resource or collection (DELETE).
    Delete,
}

impl Semantics {
    fn from_method(method: &Method) -> Option<Self> {
        match method.as_str() {
            "PUT" => Some(Self::Replace),
            "POST" | "PATCH" => Some(Self::Merge),
            "GET" | "HEAD" => Some(Self::Read),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }
}

impl MockEngine {
    /// Creates an engine backed by the given store.
    #[must_use]
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Returns the underlying store capability.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn DataStore> {
        &self.store
    }

    /// Handles one coerced request against the given contract snapshot.
    ///
    /// # Errors
    ///
    /// - [`MockError::UnknownOperation`] when the contract declares no
    ///   operation for the routed template and verb (a wiring defect: the
    ///   pass-through path should have kept the request away from the
    ///   engine);
    /// - [`MockError::NotFound`] when a read misses;
    /// - [`MockError::Backend`] for any store failure;
    /// - [`MockError::ShapeMismatch`] when the declared response schema
    ///   cannot be produced from the stored data.
    pub async fn handle(
        &self,
        contract: &Contract,
        request: &MockRequest,
    ) -> Result<MockResponse, MockError> {
        let unknown =
            || MockError::unknown_operation(request.method().clone(), request.template());
        let route = contract.route(request.template()).ok_or_else(unknown)?;
        let operation = route.operation(request.method()).ok_or_else(unknown)?;
        let semantics = Semantics::from_method(request.method()).ok_or_else(unknown)?;

        let path = route.render_path(|name| request.params().get(name));
        let decl = operation.success_response();
        tracing::debug!(
            method = %request.method(),
            path = %path,
            semantics = ?semantics,
            "Dispatching mock operation"
        );

        match semantics {
            Semantics::Replace | Semantics::Merge => {
                let merge = semantics == Semantics::Merge;
                self.edit(route, operation, &path, request, decl, merge)
                    .await
            }
            Semantics::Read => self.read(route, &path, request, decl).await,
            Semantics::Delete => self.delete(route, &path, request, decl).await,
        }
    }

    /// Create-or-replace and create-or-merge semantics.
    async fn edit(
        &self,
        route: &Route,
        operation: &Operation,
        path: &str,
        request: &MockRequest,
        decl: Option<&ResponseDecl>,
        merge: bool,
    ) -> Result<MockResponse, MockError> {
        // The request payload wins; an optional body parameter's declared
        // default fills in when the payload is absent.
        let data = request
            .body()
            .cloned()
            .or_else(|| {
                operation
                    .body_parameter()
                    .filter(|p| !p.is_required())
                    .and_then(ParameterDecl::default_value_ref)
                    .cloned()
                    .map(Payload::json)
            })
            .unwrap_or_else(|| Payload::json(serde_json::Value::Null));

        let (collection, name) = if route.is_resource() {
            split_path(path)
        } else {
            (normalize_collection(path), derive_name(&data))
        };

        let saved = if merge {
            // Merge into the existing resource; an absent base degrades to
            // create-or-replace.
            match self
                .store
                .update_resource(&collection, &name, data.clone())
                .await
            {
                Ok(merged) => merged.into_data(),
                Err(err) if err.is_not_found() => {
                    self.store
                        .save_resource(Resource::new(&collection, &name, data.clone()))
                        .await?;
                    data
                }
                Err(err) => return Err(err.into()),
            }
        } else {
            // Full overwrite: prior content for this name is discarded.
            self.store
                .save_resource(Resource::new(&collection, &name, data.clone()))
                .await?;
            data
        };

        if let Some(preset) = request.preset() {
            return Ok(shape_preset(resolve_status(decl), preset));
        }
        if decl.and_then(ResponseDecl::body_schema) == Some(ResponseSchema::Array) {
            let resources = self.store.get_collection(&collection).await?;
            return shape_collection(decl, &resources);
        }
        shape_single(decl, Some(&saved), name.trim_start_matches('/'))
    }

    /// Read semantics: single resource or whole collection per the schema.
    async fn read(
        &self,
        route: &Route,
        path: &str,
        request: &MockRequest,
        decl: Option<&ResponseDecl>,
    ) -> Result<MockResponse, MockError> {
        if let Some(preset) = request.preset() {
            return Ok(shape_preset(resolve_status(decl), preset));
        }

        let schema = decl.and_then(ResponseDecl::body_schema);
        if schema == Some(ResponseSchema::Array) {
            let collection = if route.is_resource() {
                split_path(path).0
            } else {
                normalize_collection(path)
            };
            let resources = self.store.get_collection(&collection).await?;
            return shape_collection(decl, &resources);
        }

        if route.is_resource() {
            let (collection, name) = split_path(path);
            let resource = self
                .store
                .get_resource(&collection, &name)
                .await?
                .ok_or_else(|| MockError::not_found(&collection, &name))?;
            return shape_single(decl, Some(resource.data()), resource.display_name());
        }

        // A collection route read without an array schema can only produce
        // an empty body; anything else is a contract defect.
        match schema {
            None => Ok(MockResponse::empty(resolve_status(decl))),
            Some(_) => Err(MockError::shape_mismatch("array", "collection")),
        }
    }

    /// Delete semantics: single resource or whole collection per the route
    /// granularity. Idempotent; the removed data shapes like any response.
    async fn delete(
        &self,
        route: &Route,
        path: &str,
        request: &MockRequest,
        decl: Option<&ResponseDecl>,
    ) -> Result<MockResponse, MockError> {
        let removed: Vec<Resource> = if route.is_resource() {
            let (collection, name) = split_path(path);
            self.store
                .delete_resource(&collection, &name)
                .await?
                .into_iter()
                .collect()
        } else {
            self.store
                .delete_collection(&normalize_collection(path))
                .await?
        };

        if let Some(preset) = request.preset() {
            return Ok(shape_preset(resolve_status(decl), preset));
        }

        match decl.and_then(ResponseDecl::body_schema) {
            Some(ResponseSchema::Array) => shape_collection(decl, &removed),
            _ => match removed.first() {
                Some(resource) => {
                    shape_single(decl, Some(resource.data()), resource.display_name())
                }
                None => Ok(MockResponse::empty(resolve_status(decl))),
            },
        }
    }
}

/// Derives a resource name for a collection-granularity write.
///
/// Prefers a name-like property of the payload (`Name`, `id`, `key`, any
/// casing); falls back to a timestamp-derived name when the payload carries
/// none.
fn derive_name(data: &Payload) -> String {
    if let Some(object) = data.as_value().and_then(serde_json::Value::as_object) {
        for candidate in ["name", "id", "key"] {
            let found = object
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(candidate));
            match found.map(|(_, value)| value) {
                Some(serde_json::Value::String(s)) if !s.is_empty() => return s.clone(),
                Some(serde_json::Value::Number(n)) => return n.to_string(),
                _ => {}
            }
        }
    }
    chrono::Utc::now().timestamp_millis().to_string()
}
