//! # proteus-store
//!
//! The resource store capability for the Proteus mock engine.
//!
//! Persistence is expressed as the [`DataStore`] trait: six async CRUD
//! operations keyed by collection path and resource name. The mock engine
//! only ever talks to the store through this trait, so the in-memory
//! reference implementation ([`MemoryDataStore`]) and any durable backend
//! are interchangeable.
//!
//! Resources carry arbitrary structured or binary [`Payload`]s. Merge
//! semantics (used by PATCH/POST mocks) deep-merge mapping values and never
//! drop keys absent from the incoming payload; replace semantics (PUT) always
//! do.

pub mod error;
pub mod memory;
pub mod merge;
pub mod resource;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryDataStore;
pub use merge::deep_merge;
pub use resource::{Payload, Resource};
pub use store::DataStore;
