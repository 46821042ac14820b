use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::{BindFailure, BindingStrategy};
use crate::{
    error::Result,
    resolver::Resolved,
    types::{ContractName, ImplementationName},
};

/// How a container satisfies the dependencies of a bean
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutowireMode {
    No,
    ByName,
    ByType,
    #[default]
    Constructor,
}

/// Registration record handed to a bean registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeanDefinition<H> {
    pub bean_name: String,
    pub implementation: ImplementationName,
    pub contract: ContractName,
    pub handle: H,
    pub autowire: AutowireMode,
    pub dependency_check: bool,
}

/// Container capability: named bean definitions
pub trait BeanDefinitionRegistry<H> {
    fn register_bean_definition(
        &mut self,
        definition: BeanDefinition<H>,
    ) -> std::result::Result<(), BindFailure>;
}

impl<H, R: BeanDefinitionRegistry<H> + ?Sized> BeanDefinitionRegistry<H> for &mut R {
    fn register_bean_definition(
        &mut self,
        definition: BeanDefinition<H>,
    ) -> std::result::Result<(), BindFailure> {
        (**self).register_bean_definition(definition)
    }
}

/// Registers one constructor-autowired bean per implementation.
///
/// Bean names are the implementation name, or `contract#implementation`
/// when qualified so one type can serve several contracts.
#[derive(Debug, Clone, Default)]
pub struct BeanDefinitionStrategy<R> {
    registry: R,
    qualify: bool,
}

impl<R> BeanDefinitionStrategy<R> {
    pub fn new(registry: R) -> Self {
        Self {
            registry,
            qualify: false,
        }
    }

    pub fn qualified(mut self, qualify: bool) -> Self {
        self.qualify = qualify;
        self
    }

    pub fn bean_name(&self, contract: &ContractName, implementation: &ImplementationName) -> String {
        if self.qualify {
            format!("{contract}#{implementation}")
        } else {
            implementation.to_string()
        }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    pub fn into_inner(self) -> R {
        self.registry
    }
}

impl<H: Clone, R: BeanDefinitionRegistry<H>> BindingStrategy<H> for BeanDefinitionStrategy<R> {
    fn name(&self) -> &str {
        "bean-definition"
    }

    fn bind(&mut self, contract: &ContractName, implementations: &[Resolved<H>]) -> Result<()> {
        for resolved in implementations {
            let definition = BeanDefinition {
                bean_name: self.bean_name(contract, &resolved.name),
                implementation: resolved.name.clone(),
                contract: contract.clone(),
                handle: resolved.handle.clone(),
                autowire: AutowireMode::Constructor,
                dependency_check: true,
            };
            debug!("Registering bean {}", definition.bean_name);
            self.registry
                .register_bean_definition(definition)
                .map_err(|failure| failure.into_error(contract, &resolved.name))?;
        }
        Ok(())
    }
}

/// Built-in bean registry; a name can only be registered once
#[derive(Debug, Clone)]
pub struct BeanRegistry<H> {
    definitions: BTreeMap<String, BeanDefinition<H>>,
}

impl<H> Default for BeanRegistry<H> {
    fn default() -> Self {
        Self {
            definitions: BTreeMap::new(),
        }
    }
}

impl<H> BeanRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, bean_name: &str) -> Option<&BeanDefinition<H>> {
        self.definitions.get(bean_name)
    }

    pub fn bean_names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl<H> BeanDefinitionRegistry<H> for BeanRegistry<H> {
    fn register_bean_definition(
        &mut self,
        definition: BeanDefinition<H>,
    ) -> std::result::Result<(), BindFailure> {
        if self.definitions.contains_key(&definition.bean_name) {
            return Err(BindFailure::duplicate(format!(
                "A bean named {} is already registered",
                definition.bean_name
            )));
        }
        self.definitions.insert(definition.bean_name.clone(), definition);
        Ok(())
    }
}
