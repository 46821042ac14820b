//! In-memory registry and its persisted format

pub mod format;
pub mod path;

pub use format::{parse_entries, parse_line, render};
pub use path::{BINDINGS_PREFIX, RegistryKind, SERVICES_PREFIX, resource_path};

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{ContractName, ImplementationName};

/// Mapping from contract to its known implementations.
///
/// Both levels are ordered, so iteration and rendering are deterministic
/// regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    entries: BTreeMap<ContractName, BTreeSet<ImplementationName>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one pair; returns `true` if it was not known yet
    pub fn insert(&mut self, contract: ContractName, implementation: ImplementationName) -> bool {
        self.entries.entry(contract).or_default().insert(implementation)
    }

    /// Add several implementations for one contract, returns how many were new
    pub fn extend<I>(&mut self, contract: &ContractName, implementations: I) -> usize
    where
        I: IntoIterator<Item = ImplementationName>,
    {
        let set = self.entries.entry(contract.clone()).or_default();
        implementations
            .into_iter()
            .filter(|implementation| set.insert(implementation.clone()))
            .count()
    }

    /// Union another registry into this one
    pub fn merge(&mut self, other: Registry) {
        for (contract, implementations) in other.entries {
            self.entries.entry(contract).or_default().extend(implementations);
        }
    }

    pub fn entry(&self, contract: &ContractName) -> Option<&BTreeSet<ImplementationName>> {
        self.entries.get(contract)
    }

    pub fn contains(&self, contract: &ContractName, implementation: &ImplementationName) -> bool {
        self.entries
            .get(contract)
            .is_some_and(|set| set.contains(implementation))
    }

    pub fn contracts(&self) -> impl Iterator<Item = &ContractName> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ContractName, &BTreeSet<ImplementationName>)> {
        self.entries.iter()
    }

    /// Number of contracts
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Persisted form of one contract's entry
    pub fn render(&self, contract: &ContractName) -> String {
        match self.entries.get(contract) {
            Some(set) => render(set),
            None => String::new(),
        }
    }

    /// Remove and return one contract's entry
    pub fn take(&mut self, contract: &ContractName) -> Option<BTreeSet<ImplementationName>> {
        self.entries.remove(contract)
    }
}
