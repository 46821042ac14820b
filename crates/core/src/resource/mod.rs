//! Byte-stream access to registry resources
//!
//! The collector writes through a [`ResourceStore`], the resolver reads
//! through a [`ResourceSource`] that may span several roots. Both are small
//! capabilities so build tools and embedders can supply their own.

pub mod fs;
pub mod memory;

pub use fs::{OutputDir, SearchPath};
pub use memory::MemoryResources;

use std::fmt;
use std::io::{self, BufRead};

/// Read-then-write access to the collector's output location
pub trait ResourceStore {
    /// Read a resource; `Ok(None)` when it does not exist
    fn read(&self, path: &str) -> io::Result<Option<String>>;

    /// Create or replace a resource
    fn write(&mut self, path: &str, contents: &str) -> io::Result<()>;
}

/// One physical resource found by a [`ResourceSource`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceLocation {
    /// Index of the search root the resource was found under
    pub root: usize,
    /// Human readable identifier, used in error messages
    pub id: String,
}

impl fmt::Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Multi-root, read-only lookup of resources
pub trait ResourceSource {
    /// Every resource named `path`, in search-root order; may be empty
    fn find(&self, path: &str) -> io::Result<Vec<ResourceLocation>>;

    /// Open a previously found resource for reading
    fn open(&self, location: &ResourceLocation) -> io::Result<Box<dyn BufRead + '_>>;
}

impl<T: ResourceSource + ?Sized> ResourceSource for Box<T> {
    fn find(&self, path: &str) -> io::Result<Vec<ResourceLocation>> {
        (**self).find(path)
    }

    fn open(&self, location: &ResourceLocation) -> io::Result<Box<dyn BufRead + '_>> {
        (**self).open(location)
    }
}
