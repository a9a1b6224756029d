//! Hot-swappable contract registry.
//!
//! The registry holds the active [`Contract`] behind an atomically-swapped
//! `Arc`. Replacing the contract at runtime is a single pointer swap:
//! readers either see the whole old table or the whole new one, never a mix.
//! A request that already cloned its snapshot keeps working against that
//! snapshot until it completes (snapshot-per-request, not live refresh).

use crate::Contract;
use parking_lot::RwLock;
use std::sync::Arc;

/// Process-wide holder of the active contract.
///
/// Reads are extremely frequent and swaps are rare, so the lock is only held
/// long enough to clone or replace the `Arc`.
///
/// # Example
///
/// ```
/// use proteus_contract::{Contract, ContractRegistry};
///
/// let registry = ContractRegistry::new();
/// assert!(registry.current().routes().is_empty());
///
/// registry.init(Contract::builder("petstore").build());
/// assert_eq!(registry.current().name(), "petstore");
/// ```
#[derive(Debug)]
pub struct ContractRegistry {
    active: RwLock<Arc<Contract>>,
}

impl ContractRegistry {
    /// Creates a registry holding an empty contract.
    ///
    /// Until [`init`](Self::init) is called, every route lookup misses and
    /// requests take the pass-through path.
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: RwLock::new(Arc::new(Contract::empty())),
        }
    }

    /// Creates a registry with an initial contract.
    #[must_use]
    pub fn with_contract(contract: Contract) -> Self {
        Self {
            active: RwLock::new(Arc::new(contract)),
        }
    }

    /// Atomically replaces the active contract.
    ///
    /// Subsequent [`current`](Self::current) calls return the new contract
    /// entirely. Snapshots already handed out are unaffected.
    pub fn init(&self, contract: Contract) {
        let contract = Arc::new(contract);
        tracing::info!(
            name = %contract.name(),
            version = %contract.version(),
            routes = contract.routes().len(),
            "Contract replaced"
        );
        *self.active.write() = contract;
    }

    /// Returns the current contract snapshot.
    ///
    /// The returned `Arc` stays valid for the caller's whole request even if
    /// the registry is re-initialized mid-flight.
    #[must_use]
    pub fn current(&self) -> Arc<Contract> {
        Arc::clone(&self.active.read())
    }
}

impl Default for ContractRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Operation, ParamKind, ParameterDecl, Route};
    use http::Method;

    fn petstore(version: &str) -> Contract {
        Contract::builder("petstore")
            .version(version)
            .route(
                Route::builder("/pets/{PetName}")
                    .operation(
                        Operation::builder(Method::GET)
                            .parameter(ParameterDecl::path("PetName").kind(ParamKind::String))
                            .build(),
                    )
                    .build(),
            )
            .build()
    }

    #[test]
    fn test_registry_starts_empty() {
        let registry = ContractRegistry::new();
        assert!(registry.current().routes().is_empty());
    }

    #[test]
    fn test_init_replaces_contract() {
        let registry = ContractRegistry::new();
        registry.init(petstore("1.0.0"));

        let contract = registry.current();
        assert_eq!(contract.version(), "1.0.0");
        assert!(contract.operation("/pets/{PetName}", &Method::GET).is_some());
    }

    #[test]
    fn test_held_snapshot_survives_swap() {
        let registry = ContractRegistry::with_contract(petstore("1.0.0"));

        // An in-flight request clones its snapshot before the swap...
        let snapshot = registry.current();
        registry.init(petstore("2.0.0"));

        // ...and keeps seeing the old contract, while new reads see the new one.
        assert_eq!(snapshot.version(), "1.0.0");
        assert_eq!(registry.current().version(), "2.0.0");
    }

    #[test]
    fn test_swap_is_whole_table() {
        let registry = ContractRegistry::with_contract(petstore("1.0.0"));

        // Replace with a contract where the parameterized route is gone.
        let replacement = Contract::builder("petstore")
            .version("2.0.0")
            .route(Route::builder("/pets/Fido/photos/12345").build())
            .build();
        registry.init(replacement);

        let contract = registry.current();
        assert!(contract.route("/pets/{PetName}").is_none());
        assert!(contract.route("/pets/Fido/photos/12345").is_some());
    }

    #[test]
    fn test_concurrent_readers_during_swap() {
        use std::thread;

        let registry = std::sync::Arc::new(ContractRegistry::with_contract(petstore("1.0.0")));
        let mut handles = Vec::new();

        for _ in 0..4 {
            let registry = std::sync::Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                for _ in 0..1000 {
                    let contract = registry.current();
                    // Every observed snapshot is internally consistent.
                    assert_eq!(contract.name(), "petstore");
                    assert!(matches!(contract.version(), "1.0.0" | "2.0.0"));
                }
            }));
        }

        registry.init(petstore("2.0.0"));
        for handle in handles {
            handle.join().expect("reader thread should not panic");
        }
    }
}
