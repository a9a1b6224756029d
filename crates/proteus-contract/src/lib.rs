//! # proteus-contract
//!
//! Contract data model and hot-swappable registry for the Proteus mock
//! engine.
//!
//! A [`Contract`] is an immutable snapshot of an API definition: route
//! templates (e.g. `/pets/{PetName}/photos/{ID}`), per-verb operations,
//! parameter declarations, and response declarations. Contracts are built
//! once via builders and never mutated afterwards; replacing the active
//! contract at runtime goes through [`ContractRegistry::init`], which swaps
//! an `Arc` snapshot so readers never observe a partially-updated route
//! table.
//!
//! This crate only models an already-parsed definition. Parsing raw contract
//! text (OpenAPI documents and friends) is a collaborator's job.

pub mod contract;
pub mod registry;

pub use contract::{
    Contract, ContractBuilder, Operation, OperationBuilder, ParamKind, ParamLocation,
    ParameterDecl, ResponseDecl, ResponseSchema, Route, RouteBuilder,
};
pub use registry::ContractRegistry;
