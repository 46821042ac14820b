//! Runtime lookup of registered implementations
//!
//! The resolver reads every registry resource for a contract across all
//! search roots and turns each listed name into a handle. Nothing is cached:
//! each call re-reads the resources.

pub mod classpath;
pub mod loader;

pub use classpath::Classpath;
pub use loader::{Factory, ImplementationLoader, ImplementationTable};

use tracing::debug;

use crate::{
    error::{Error, Result},
    registry::{RegistryKind, format, resource_path},
    resource::ResourceSource,
    types::{ContractName, ImplementationName},
};

/// One surviving line of a registry resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub name: ImplementationName,
    /// Identifier of the resource the entry was read from
    pub resource: String,
    /// 1-based line number inside that resource
    pub line: usize,
}

/// A registry entry with its loaded handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<H> {
    pub name: ImplementationName,
    pub handle: H,
    pub resource: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResolver {
    prefix: String,
}

impl Default for ServiceResolver {
    fn default() -> Self {
        Self::for_kind(RegistryKind::Bindings)
    }
}

impl ServiceResolver {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn for_kind(kind: RegistryKind) -> Self {
        Self::new(kind.prefix())
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Every entry for `contract`, in resource order then line order.
    ///
    /// No resource at all is an empty result. Entries repeated across
    /// resources are kept.
    pub fn entries(
        &self,
        contract: &ContractName,
        source: &dyn ResourceSource,
    ) -> Result<Vec<RegistryEntry>> {
        let path = resource_path(&self.prefix, contract);
        let locations = source.find(&path).map_err(|source| Error::ResourceLookup {
            contract: contract.to_string(),
            source,
        })?;
        debug!("Found {} resource(s) for {}", locations.len(), path);

        let mut entries = Vec::new();
        for location in &locations {
            let read_error = |source: std::io::Error| Error::ResourceRead {
                contract: contract.to_string(),
                resource: location.id.clone(),
                source,
            };
            let lines = source
                .open(location)
                .and_then(format::parse_entries)
                .map_err(read_error)?;

            for (line, entry) in lines {
                let name = ImplementationName::new(&entry).map_err(|_| Error::MalformedEntry {
                    contract: contract.to_string(),
                    resource: location.id.clone(),
                    line,
                    entry: entry.clone(),
                })?;
                entries.push(RegistryEntry {
                    name,
                    resource: location.id.clone(),
                    line,
                });
            }
        }

        Ok(entries)
    }

    /// Load every entry for `contract`; the first unknown name aborts the call
    pub fn resolve<H, L>(
        &self,
        contract: &ContractName,
        source: &dyn ResourceSource,
        loader: &L,
    ) -> Result<Vec<Resolved<H>>>
    where
        L: ImplementationLoader<H> + ?Sized,
    {
        self.entries(contract, source)?
            .into_iter()
            .map(|entry| match loader.load(&entry.name) {
                Some(handle) => Ok(Resolved {
                    name: entry.name,
                    handle,
                    resource: entry.resource,
                    line: entry.line,
                }),
                None => Err(Error::ClassNotFound {
                    contract: contract.to_string(),
                    resource: entry.resource,
                    line: entry.line,
                    entry: entry.name.to_string(),
                }),
            })
            .collect()
    }

    pub fn resolve_in<H: Clone>(
        &self,
        contract: &ContractName,
        classpath: &Classpath<H>,
    ) -> Result<Vec<Resolved<H>>> {
        self.resolve(contract, classpath.source(), classpath)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::MemoryResources;

    fn contract() -> ContractName {
        ContractName::new("app::Bob").unwrap()
    }

    fn table(names: &[&str]) -> ImplementationTable<String> {
        let mut table = ImplementationTable::new();
        for name in names {
            table.register(name, name.to_uppercase()).unwrap();
        }
        table
    }

    #[test]
    fn test_no_resource_is_empty() {
        let resolver = ServiceResolver::default();
        let resources = MemoryResources::new();
        let resolved = resolver.resolve(&contract(), &resources, &table(&[])).unwrap();
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_entries_across_roots_keep_order_and_duplicates() {
        let mut resources = MemoryResources::with_roots(["core", "plugins"]);
        resources.insert(0, "META-INF/bindings/app::Bob", "# header\napp::Nancy\n\napp::Fred # inline\n");
        resources.insert(1, "META-INF/bindings/app::Bob", "app::Fred\n");

        let entries = ServiceResolver::default().entries(&contract(), &resources).unwrap();
        let summary: Vec<_> = entries
            .iter()
            .map(|e| (e.name.as_str(), e.resource.as_str(), e.line))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("app::Nancy", "core:META-INF/bindings/app::Bob", 2),
                ("app::Fred", "core:META-INF/bindings/app::Bob", 4),
                ("app::Fred", "plugins:META-INF/bindings/app::Bob", 1),
            ]
        );
    }

    #[test]
    fn test_comment_only_resource_contributes_nothing() {
        let mut resources = MemoryResources::new();
        resources.insert(0, "META-INF/bindings/app::Bob", "# nothing here\n   \n#app::Fred\n");
        let resolved = ServiceResolver::default()
            .resolve(&contract(), &resources, &table(&["app::Fred"]))
            .unwrap();
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_unknown_name_is_hard_error() {
        let mut resources = MemoryResources::new();
        resources.insert(0, "META-INF/bindings/app::Bob", "app::Fred\norg::acme::Ghost\n");

        let err = ServiceResolver::default()
            .resolve(&contract(), &resources, &table(&["app::Fred"]))
            .unwrap_err();
        match &err {
            Error::ClassNotFound {
                contract,
                resource,
                line,
                entry,
            } => {
                assert_eq!(contract, "app::Bob");
                assert_eq!(resource, "memory:META-INF/bindings/app::Bob");
                assert_eq!(*line, 2);
                assert_eq!(entry, "org::acme::Ghost");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("Cannot bind implementation for org::acme::Ghost"));
    }

    #[test]
    fn test_malformed_entry_is_reported() {
        let mut resources = MemoryResources::new();
        resources.insert(0, "META-INF/bindings/app::Bob", "app::Fred app::Nancy\n");
        let err = ServiceResolver::default()
            .entries(&contract(), &resources)
            .unwrap_err();
        assert!(matches!(err, Error::MalformedEntry { line: 1, .. }));
    }

    #[test]
    fn test_unreadable_resource_aborts_with_context() {
        let mut resources = MemoryResources::with_roots(["core", "broken"]);
        resources.insert(0, "META-INF/bindings/app::Bob", "app::Fred\n");
        resources.insert_unreadable(1, "META-INF/bindings/app::Bob");

        let err = ServiceResolver::default()
            .resolve(&contract(), &resources, &table(&["app::Fred"]))
            .unwrap_err();
        match err {
            Error::ResourceRead { resource, .. } => {
                assert_eq!(resource, "broken:META-INF/bindings/app::Bob")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_services_prefix_and_classpath() {
        let mut resources = MemoryResources::new();
        resources.insert(0, "META-INF/services/app::Bob", "app::Fred\n");
        let classpath = Classpath::new(resources, table(&["app::Fred"]));

        let resolver = ServiceResolver::for_kind(RegistryKind::Services);
        let resolved = resolver.resolve_in(&contract(), &classpath).unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].handle, "APP::FRED");

        let bindings = ServiceResolver::default().resolve_in(&contract(), &classpath).unwrap();
        assert!(bindings.is_empty());
    }
}
