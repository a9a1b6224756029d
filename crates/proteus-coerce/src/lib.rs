//! # proteus-coerce
//!
//! Contract-driven coercion of raw path captures into typed values.
//!
//! The router hands over each matched path segment as a raw string (already
//! percent-decoded by the transport layer). This crate looks up the matching
//! operation in a [`proteus_contract::Contract`] snapshot and converts each
//! capture according to its declared parameter kind, producing a
//! [`TypedParams`] set carried on the request for the rest of the pipeline.
//!
//! Coercion is deliberately forgiving about *coverage* and strict about
//! *format*: a route or capture the contract doesn't know passes through as a
//! raw string, but a declared parameter whose value doesn't match its kind
//! aborts the whole request with a [`CoercionError`] before any mock
//! semantics run.

pub mod coerce;
pub mod error;
pub mod params;
pub mod value;

pub use coerce::coerce_path_params;
pub use error::CoercionError;
pub use params::{RawParams, TypedParams};
pub use value::TypedValue;
