use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::{error::Result, types::ImplementationName};

/// Turns an implementation name into a usable handle
pub trait ImplementationLoader<H> {
    /// `None` when nothing is known under `name`
    fn load(&self, name: &ImplementationName) -> Option<H>;
}

impl<H, F> ImplementationLoader<H> for F
where
    F: Fn(&ImplementationName) -> Option<H>,
{
    fn load(&self, name: &ImplementationName) -> Option<H> {
        self(name)
    }
}

/// Constructor of a boxed implementation
pub type Factory<T> = Arc<dyn Fn() -> Box<T> + Send + Sync>;

/// Registration table mapping implementation names to handles.
///
/// Applications fill it once at startup, usually with [`Factory`] values,
/// and the resolver looks every registry entry up in it.
#[derive(Clone)]
pub struct ImplementationTable<H> {
    handles: BTreeMap<ImplementationName, H>,
}

impl<H> Default for ImplementationTable<H> {
    fn default() -> Self {
        Self {
            handles: BTreeMap::new(),
        }
    }
}

impl<H> fmt::Debug for ImplementationTable<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.handles.keys()).finish()
    }
}

impl<H> ImplementationTable<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handle` under `name`, returning the handle it replaced
    pub fn register(&mut self, name: impl AsRef<str>, handle: H) -> Result<Option<H>> {
        let name = ImplementationName::new(name)?;
        Ok(self.handles.insert(name, handle))
    }

    pub fn contains(&self, name: &ImplementationName) -> bool {
        self.handles.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &ImplementationName> {
        self.handles.keys()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl<T: ?Sized + 'static> ImplementationTable<Factory<T>> {
    pub fn register_factory<F>(&mut self, name: impl AsRef<str>, factory: F) -> Result<()>
    where
        F: Fn() -> Box<T> + Send + Sync + 'static,
    {
        self.register(name, Arc::new(factory) as Factory<T>)?;
        Ok(())
    }
}

impl<H: Clone> ImplementationLoader<H> for ImplementationTable<H> {
    fn load(&self, name: &ImplementationName) -> Option<H> {
        self.handles.get(name).cloned()
    }
}
