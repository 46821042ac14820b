//! Pluggable registration of resolved implementations
//!
//! A [`BindingStrategy`] takes the resolver's output for one contract and
//! registers it with a host container. [`ServiceBinder`] wires a resolver, a
//! strategy and a default classpath together.

pub mod bean_definition;
pub mod multibinding;

pub use bean_definition::{
    AutowireMode, BeanDefinition, BeanDefinitionRegistry, BeanDefinitionStrategy, BeanRegistry,
};
pub use multibinding::{MultiBinder, MultibindingStrategy, SetBinder};

use std::fmt;
use tracing::info;

use crate::{
    error::{Error, Result},
    resolver::{Classpath, Resolved, ServiceResolver},
    types::ContractName,
};

/// What went wrong inside a host container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindFailureKind {
    ClassNotFound,
    DuplicateDefinition,
    Rejected,
}

impl fmt::Display for BindFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            BindFailureKind::ClassNotFound => "class not found",
            BindFailureKind::DuplicateDefinition => "duplicate definition",
            BindFailureKind::Rejected => "rejected",
        };
        f.write_str(text)
    }
}

/// Failure reported by a container adapter
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct BindFailure {
    pub kind: BindFailureKind,
    pub message: String,
}

impl BindFailure {
    pub fn new(kind: BindFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn class_not_found(message: impl Into<String>) -> Self {
        Self::new(BindFailureKind::ClassNotFound, message)
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::new(BindFailureKind::DuplicateDefinition, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(BindFailureKind::Rejected, message)
    }

    /// Attach the contract and implementation the failure happened for
    pub fn into_error(self, contract: &ContractName, implementation: impl fmt::Display) -> Error {
        Error::Binding {
            contract: contract.to_string(),
            implementation: implementation.to_string(),
            source: self,
        }
    }
}

/// Registers resolved implementations of a contract with a host container
pub trait BindingStrategy<H> {
    /// Short name, used in logs and `Display`
    fn name(&self) -> &str;

    fn bind(&mut self, contract: &ContractName, implementations: &[Resolved<H>]) -> Result<()>;
}

impl<H, S: BindingStrategy<H> + ?Sized> BindingStrategy<H> for &mut S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn bind(&mut self, contract: &ContractName, implementations: &[Resolved<H>]) -> Result<()> {
        (**self).bind(contract, implementations)
    }
}

/// Resolve a contract and hand the result to a strategy in one call
pub struct ServiceBinder<H, S> {
    resolver: ServiceResolver,
    strategy: S,
    classpath: Classpath<H>,
}

impl<H: Clone, S: BindingStrategy<H>> ServiceBinder<H, S> {
    pub fn new(strategy: S, classpath: Classpath<H>) -> Self {
        Self {
            resolver: ServiceResolver::default(),
            strategy,
            classpath,
        }
    }

    pub fn with_resolver(mut self, resolver: ServiceResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Bind `contract` from the default classpath
    pub fn bind(&mut self, contract: &ContractName) -> Result<usize> {
        self.bind_with(contract, None)
    }

    /// Bind `contract`, reading from `classpath` when given.
    ///
    /// Returns how many implementations were handed to the strategy.
    pub fn bind_with(
        &mut self,
        contract: &ContractName,
        classpath: Option<&Classpath<H>>,
    ) -> Result<usize> {
        let classpath = classpath.unwrap_or(&self.classpath);
        let resolved = self.resolver.resolve_in(contract, classpath)?;
        self.strategy.bind(contract, &resolved)?;
        info!(
            "Bound {} implementation(s) of {} with {}",
            resolved.len(),
            contract,
            self.strategy.name()
        );
        Ok(resolved.len())
    }

    pub fn resolver(&self) -> &ServiceResolver {
        &self.resolver
    }

    pub fn classpath(&self) -> &Classpath<H> {
        &self.classpath
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn strategy_mut(&mut self) -> &mut S {
        &mut self.strategy
    }

    pub fn into_strategy(self) -> S {
        self.strategy
    }
}

impl<H, S: BindingStrategy<H>> fmt::Display for ServiceBinder<H, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceBinder[{}]", self.strategy.name())
    }
}
