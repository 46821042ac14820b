//! Contract inference for annotated declarations

use std::collections::BTreeSet;

use crate::types::{ContractName, ContractRef, Declaration, Diagnostic, names::simple_name};

/// Traits every type may implement without that saying anything about
/// which contract it fulfils.
pub const DEFAULT_UNIVERSAL_TYPES: &[&str] = &[
    "Any", "AsMut", "AsRef", "Borrow", "Clone", "Copy", "Debug", "Default", "Deref", "DerefMut",
    "Display", "Drop", "Eq", "From", "Hash", "Into", "Ord", "PartialEq", "PartialOrd", "Send",
    "Sized", "Sync", "TryFrom", "TryInto", "Unpin",
];

pub const CANNOT_INFER: &str = "Contract type was not specified, but it couldn't be inferred.";
pub const INVALID_CONTRACT: &str = "Invalid type specified as the contract";

/// Derives the contract a declaration is bound to
#[derive(Debug, Clone)]
pub struct ContractInference {
    universal: BTreeSet<String>,
}

impl Default for ContractInference {
    fn default() -> Self {
        Self::new(DEFAULT_UNIVERSAL_TYPES.iter().copied())
    }
}

impl ContractInference {
    /// `universal` holds simple names that never count as a supertype
    pub fn new<I, S>(universal: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            universal: universal.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_universal(&self, type_name: &str) -> bool {
        self.universal.contains(simple_name(type_name))
    }

    /// Infer the contract, or explain why that is impossible.
    ///
    /// An explicit contract always wins. Otherwise exactly one of a named
    /// superclass or a single named interface must be present.
    pub fn infer(&self, declaration: &Declaration) -> Result<ContractName, Diagnostic> {
        let fail = |message: &str| {
            Diagnostic::error(message)
                .on_element(declaration.name.as_str(), declaration.location.clone())
        };

        let annotation = declaration
            .annotation
            .as_ref()
            .ok_or_else(|| fail(CANNOT_INFER))?;

        match &annotation.contract {
            ContractRef::Named(name) => ContractName::new(name).map_err(|_| fail(INVALID_CONTRACT)),
            ContractRef::Invalid(_) => Err(fail(INVALID_CONTRACT)),
            ContractRef::Inferred => {
                let superclass = declaration
                    .superclass
                    .as_deref()
                    .filter(|name| !self.is_universal(name));
                let interfaces: Vec<&str> = declaration
                    .interfaces
                    .iter()
                    .map(String::as_str)
                    .filter(|name| !self.is_universal(name))
                    .collect();

                let inferred = match (superclass, interfaces.as_slice()) {
                    (Some(superclass), []) => superclass,
                    (None, [interface]) => *interface,
                    _ => return Err(fail(CANNOT_INFER)),
                };
                ContractName::new(inferred).map_err(|_| fail(INVALID_CONTRACT))
            }
        }
    }
}
