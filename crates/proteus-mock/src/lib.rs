//! # proteus-mock
//!
//! The mock resource engine: turns one coerced request into a store
//! operation and a shaped response.
//!
//! The engine resolves the operation's semantics from its declared verb
//! (create-or-replace, create-or-merge, read, delete), realizes them against
//! a pluggable [`proteus_store::DataStore`], and shapes the result per the
//! contract's declared response schema: structured JSON, an ordered
//! collection, a rendered scalar, or a binary payload served as a named
//! attachment.
//!
//! Request-body validation, CORS, multipart decoding, and the HTTP transport
//! itself are collaborators outside this crate: they hand over a
//! [`MockRequest`] with a decoded payload and receive a [`MockResponse`]
//! with a resolved content type.

pub mod engine;
pub mod error;
pub mod request;
pub mod shape;

pub use engine::MockEngine;
pub use error::MockError;
pub use request::MockRequest;
pub use shape::{MockResponse, ShapedBody};
