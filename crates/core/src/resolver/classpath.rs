use super::loader::{ImplementationLoader, ImplementationTable};
use crate::{resource::ResourceSource, types::ImplementationName};

/// Where registries are looked up and how their names become handles.
///
/// Owns both halves so a binder can carry a default one and callers can
/// pass an override per call.
pub struct Classpath<H> {
    source: Box<dyn ResourceSource>,
    table: ImplementationTable<H>,
}

impl<H> Classpath<H> {
    pub fn new(source: impl ResourceSource + 'static, table: ImplementationTable<H>) -> Self {
        Self {
            source: Box::new(source),
            table,
        }
    }

    pub fn source(&self) -> &dyn ResourceSource {
        self.source.as_ref()
    }

    pub fn table(&self) -> &ImplementationTable<H> {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut ImplementationTable<H> {
        &mut self.table
    }
}

impl<H: Clone> ImplementationLoader<H> for Classpath<H> {
    fn load(&self, name: &ImplementationName) -> Option<H> {
        self.table.load(name)
    }
}
