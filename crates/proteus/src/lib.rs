//! # Proteus
//!
//! **Schema-Driven Mock-API Engine**
//!
//! Proteus turns a machine-readable API contract into a live mock: raw path
//! captures are coerced into correctly-typed values, and CRUD requests are
//! synthesized against a pluggable resource store, honoring the contract's
//! declared response shape (object, array, string, number, date, binary
//! file) and HTTP semantics (replace vs. merge vs. delete).
//!
//! ## Quick Start
//!
//! ```
//! use http::Method;
//! use proteus::prelude::*;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! // 1. Register a contract (hot-swappable at runtime via `init`).
//! let registry = ContractRegistry::new();
//! registry.init(
//!     Contract::builder("petstore")
//!         .route(
//!             Route::builder("/pets/{PetName}")
//!                 .operation(
//!                     Operation::builder(Method::PUT)
//!                         .parameter(ParameterDecl::path("PetName").kind(ParamKind::String))
//!                         .parameter(ParameterDecl::body("PetData"))
//!                         .response(ResponseDecl::new(200).schema(ResponseSchema::Object))
//!                         .build(),
//!                 )
//!                 .build(),
//!         )
//!         .build(),
//! );
//!
//! // 2. Coerce the raw captures against the request's contract snapshot.
//! let snapshot = registry.current();
//! let mut raw = RawParams::new();
//! raw.push("PetName", "Fido");
//! let typed = coerce_path_params(&snapshot, "/pets/{PetName}", &Method::PUT, &raw).unwrap();
//! assert_eq!(typed.get("PetName"), Some(&TypedValue::String("Fido".into())));
//!
//! // 3. Run the mock engine against the store.
//! let engine = MockEngine::new(Arc::new(MemoryDataStore::new()));
//! let request = MockRequest::new(Method::PUT, "/pets/{PetName}")
//!     .param("PetName", "Fido")
//!     .payload(Payload::json(json!({"Name": "Fido", "Type": "dog"})));
//! let response = engine.handle(&snapshot, &request).await.unwrap();
//! assert_eq!(response.status(), http::StatusCode::OK);
//! # });
//! ```
//!
//! ## Architecture
//!
//! ```text
//! request → route match (external) → coerce_path_params ──┐
//!                                                          ▼
//!            ContractRegistry ──snapshot──▶ MockEngine ──▶ DataStore
//!                                                │
//!                                 shaped response▼ (transport's concern)
//! ```

#![doc(html_root_url = "https://docs.rs/proteus/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export contract types
pub use proteus_contract as contract;

// Re-export coercion types
pub use proteus_coerce as coerce;

// Re-export store types
pub use proteus_store as store;

// Re-export the mock engine
pub use proteus_mock as mock;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```
/// use proteus::prelude::*;
/// ```
pub mod prelude {
    pub use proteus_contract::{
        Contract, ContractRegistry, Operation, ParamKind, ParamLocation, ParameterDecl,
        ResponseDecl, ResponseSchema, Route,
    };

    pub use proteus_coerce::{coerce_path_params, CoercionError, RawParams, TypedParams, TypedValue};

    pub use proteus_store::{
        deep_merge, DataStore, MemoryDataStore, Payload, Resource, StoreError,
    };

    pub use proteus_mock::{MockEngine, MockError, MockRequest, MockResponse, ShapedBody};
}
