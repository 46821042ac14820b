use serde::{Deserialize, Serialize};

use super::{ImplementationName, SourceLocation};

/// Kind of an annotated item
///
/// Structs, enums and unions play the role of classes; traits are interfaces.
/// Only those two families can carry a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Struct,
    Enum,
    Union,
    Trait,
    Function,
    Other,
}

impl DeclarationKind {
    pub fn is_class(self) -> bool {
        matches!(self, Self::Struct | Self::Enum | Self::Union)
    }

    pub fn is_interface(self) -> bool {
        matches!(self, Self::Trait)
    }
}

/// The contract argument of a binding annotation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractRef {
    /// No contract given, infer it from the declaration's supertypes
    Inferred,
    /// Explicit contract, already resolved to a binary name
    Named(String),
    /// Something that is not a type was given as the contract
    Invalid(String),
}

/// An instance of the binding annotation on a declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BindingAnnotation {
    pub contract: ContractRef,
}

impl BindingAnnotation {
    pub fn inferred() -> Self {
        Self {
            contract: ContractRef::Inferred,
        }
    }

    pub fn named(contract: impl Into<String>) -> Self {
        Self {
            contract: ContractRef::Named(contract.into()),
        }
    }
}

/// An item seen by the collector in one compilation round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Binary name of the item itself
    pub name: ImplementationName,
    pub kind: DeclarationKind,
    /// Direct supertype, if the host language has one
    pub superclass: Option<String>,
    /// Directly implemented interfaces, binary names
    pub interfaces: Vec<String>,
    /// `None` when the annotation is present but unusable
    pub annotation: Option<BindingAnnotation>,
    pub location: Option<SourceLocation>,
}

impl Declaration {
    pub fn new(name: ImplementationName, kind: DeclarationKind) -> Self {
        Self {
            name,
            kind,
            superclass: None,
            interfaces: Vec::new(),
            annotation: Some(BindingAnnotation::inferred()),
            location: None,
        }
    }

    pub fn with_superclass(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn with_annotation(mut self, annotation: Option<BindingAnnotation>) -> Self {
        self.annotation = annotation;
        self
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }
}
