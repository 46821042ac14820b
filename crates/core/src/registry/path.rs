use serde::{Deserialize, Serialize};

use crate::types::ContractName;

/// Prefix of registries written by the binding collector
pub const BINDINGS_PREFIX: &str = "META-INF/bindings/";

/// Prefix of plain, hand-maintained service registries
pub const SERVICES_PREFIX: &str = "META-INF/services/";

/// Which family of registry resources to read or write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryKind {
    #[default]
    Bindings,
    Services,
}

impl RegistryKind {
    pub fn prefix(self) -> &'static str {
        match self {
            RegistryKind::Bindings => BINDINGS_PREFIX,
            RegistryKind::Services => SERVICES_PREFIX,
        }
    }
}

/// Resource path of the registry for `contract` under `prefix`
pub fn resource_path(prefix: &str, contract: &ContractName) -> String {
    format!("{prefix}{contract}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_path() {
        let contract = ContractName::new("app::Bob").unwrap();
        assert_eq!(
            resource_path(RegistryKind::Bindings.prefix(), &contract),
            "META-INF/bindings/app::Bob"
        );
        assert_eq!(
            resource_path(RegistryKind::Services.prefix(), &contract),
            "META-INF/services/app::Bob"
        );
    }

    #[test]
    fn test_default_kind_is_bindings() {
        assert_eq!(RegistryKind::default(), RegistryKind::Bindings);
    }
}
