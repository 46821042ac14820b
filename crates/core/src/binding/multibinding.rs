use std::collections::BTreeMap;
use tracing::debug;

use super::{BindFailure, BindingStrategy};
use crate::{
    error::Result,
    resolver::Resolved,
    types::{ContractName, ImplementationName},
};

/// Container capability: an open set of bindings per contract
pub trait SetBinder<H> {
    fn add_binding(
        &mut self,
        contract: &ContractName,
        implementation: &ImplementationName,
        handle: H,
    ) -> std::result::Result<(), BindFailure>;
}

impl<H, B: SetBinder<H> + ?Sized> SetBinder<H> for &mut B {
    fn add_binding(
        &mut self,
        contract: &ContractName,
        implementation: &ImplementationName,
        handle: H,
    ) -> std::result::Result<(), BindFailure> {
        (**self).add_binding(contract, implementation, handle)
    }
}

/// Adds every resolved implementation to the contract's set
#[derive(Debug, Clone, Default)]
pub struct MultibindingStrategy<B> {
    binder: B,
}

impl<B> MultibindingStrategy<B> {
    pub fn new(binder: B) -> Self {
        Self { binder }
    }

    pub fn binder(&self) -> &B {
        &self.binder
    }

    pub fn binder_mut(&mut self) -> &mut B {
        &mut self.binder
    }

    pub fn into_inner(self) -> B {
        self.binder
    }
}

impl<H: Clone, B: SetBinder<H>> BindingStrategy<H> for MultibindingStrategy<B> {
    fn name(&self) -> &str {
        "multibinding"
    }

    fn bind(&mut self, contract: &ContractName, implementations: &[Resolved<H>]) -> Result<()> {
        for resolved in implementations {
            debug!("Adding {} to the set of {}", resolved.name, contract);
            self.binder
                .add_binding(contract, &resolved.name, resolved.handle.clone())
                .map_err(|failure| failure.into_error(contract, &resolved.name))?;
        }
        Ok(())
    }
}

/// Built-in set container.
///
/// Keeps first-bound order per contract; binding an implementation that is
/// already in the set does nothing.
#[derive(Debug, Clone)]
pub struct MultiBinder<H> {
    sets: BTreeMap<ContractName, Vec<(ImplementationName, H)>>,
}

impl<H> Default for MultiBinder<H> {
    fn default() -> Self {
        Self {
            sets: BTreeMap::new(),
        }
    }
}

impl<H> MultiBinder<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound implementations of `contract` with their handles
    pub fn get(&self, contract: &ContractName) -> &[(ImplementationName, H)] {
        self.sets.get(contract).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn names(&self, contract: &ContractName) -> Vec<&str> {
        self.get(contract).iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn handles(&self, contract: &ContractName) -> impl Iterator<Item = &H> {
        self.get(contract).iter().map(|(_, handle)| handle)
    }

    pub fn contracts(&self) -> impl Iterator<Item = &ContractName> {
        self.sets.keys()
    }
}

impl<H> SetBinder<H> for MultiBinder<H> {
    fn add_binding(
        &mut self,
        contract: &ContractName,
        implementation: &ImplementationName,
        handle: H,
    ) -> std::result::Result<(), BindFailure> {
        let set = self.sets.entry(contract.clone()).or_default();
        if !set.iter().any(|(name, _)| name == implementation) {
            set.push((implementation.clone(), handle));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::binding::BindFailureKind;

    fn resolved(name: &str, handle: u32) -> Resolved<u32> {
        Resolved {
            name: ImplementationName::new(name).unwrap(),
            handle,
            resource: "memory:META-INF/bindings/app::Bob".to_string(),
            line: 1,
        }
    }

    #[test]
    fn test_rebinding_is_a_no_op() {
        let contract = ContractName::new("app::Bob").unwrap();
        let mut strategy = MultibindingStrategy::new(MultiBinder::new());

        strategy
            .bind(&contract, &[resolved("app::Fred", 1), resolved("app::Nancy", 2)])
            .unwrap();
        strategy
            .bind(&contract, &[resolved("app::Nancy", 3), resolved("app::Fred", 4)])
            .unwrap();

        let binder = strategy.into_inner();
        assert_eq!(binder.names(&contract), vec!["app::Fred", "app::Nancy"]);
        assert_eq!(binder.handles(&contract).copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(binder.contracts().count(), 1);
    }

    #[test]
    fn test_unknown_contract_is_empty() {
        let binder: MultiBinder<u32> = MultiBinder::new();
        let contract = ContractName::new("app::Nobody").unwrap();
        assert!(binder.get(&contract).is_empty());
    }

    struct Refusing;

    impl SetBinder<u32> for Refusing {
        fn add_binding(
            &mut self,
            _contract: &ContractName,
            implementation: &ImplementationName,
            _handle: u32,
        ) -> std::result::Result<(), BindFailure> {
            Err(BindFailure::class_not_found(implementation.to_string()))
        }
    }

    #[test]
    fn test_adapter_failure_is_wrapped() {
        let contract = ContractName::new("app::Bob").unwrap();
        let mut refusing = Refusing;
        let mut strategy = MultibindingStrategy::new(&mut refusing);

        let err = strategy.bind(&contract, &[resolved("app::Fred", 1)]).unwrap_err();
        match err {
            Error::Binding {
                contract,
                implementation,
                source,
            } => {
                assert_eq!(contract, "app::Bob");
                assert_eq!(implementation, "app::Fred");
                assert_eq!(source.kind, BindFailureKind::ClassNotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
