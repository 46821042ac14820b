use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, BufRead, Cursor};

use super::{ResourceLocation, ResourceSource, ResourceStore};

/// In-memory resources spread over one or more named roots.
///
/// Writes always go to the first root. A resource can be marked unreadable,
/// or read-only, to exercise failure paths.
#[derive(Debug, Clone)]
pub struct MemoryResources {
    roots: Vec<MemoryRoot>,
    read_only: BTreeSet<String>,
}

#[derive(Debug, Clone, Default)]
struct MemoryRoot {
    name: String,
    files: BTreeMap<String, Option<String>>,
}

impl Default for MemoryResources {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryResources {
    /// A single root named `memory`
    pub fn new() -> Self {
        Self::with_roots(["memory"])
    }

    pub fn with_roots<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let roots = names
            .into_iter()
            .map(|name| MemoryRoot {
                name: name.into(),
                files: BTreeMap::new(),
            })
            .collect();
        Self {
            roots,
            read_only: BTreeSet::new(),
        }
    }

    /// Put a resource under the given root
    ///
    /// # Panics
    ///
    /// Panics if `root` is out of range.
    pub fn insert(&mut self, root: usize, path: impl Into<String>, contents: impl Into<String>) {
        self.roots[root].files.insert(path.into(), Some(contents.into()));
    }

    /// Make a resource exist but fail every read
    ///
    /// # Panics
    ///
    /// Panics if `root` is out of range.
    pub fn insert_unreadable(&mut self, root: usize, path: impl Into<String>) {
        self.roots[root].files.insert(path.into(), None);
    }

    /// Keep reads working but fail every write to `path`
    pub fn protect(&mut self, path: impl Into<String>) {
        self.read_only.insert(path.into());
    }

    /// Contents of a resource in the first root
    pub fn get(&self, path: &str) -> Option<&str> {
        self.roots
            .first()
            .and_then(|root| root.files.get(path))
            .and_then(|contents| contents.as_deref())
    }

    fn unreadable(id: &str) -> io::Error {
        io::Error::new(io::ErrorKind::PermissionDenied, format!("{id} is unreadable"))
    }
}

impl ResourceStore for MemoryResources {
    fn read(&self, path: &str) -> io::Result<Option<String>> {
        let Some(root) = self.roots.first() else {
            return Ok(None);
        };
        match root.files.get(path) {
            None => Ok(None),
            Some(Some(contents)) => Ok(Some(contents.clone())),
            Some(None) => Err(Self::unreadable(path)),
        }
    }

    fn write(&mut self, path: &str, contents: &str) -> io::Result<()> {
        let root = self
            .roots
            .first_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no resource root"))?;
        if matches!(root.files.get(path), Some(None)) {
            return Err(Self::unreadable(path));
        }
        if self.read_only.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{path} is read-only"),
            ));
        }
        root.files.insert(path.to_string(), Some(contents.to_string()));
        Ok(())
    }
}

impl ResourceSource for MemoryResources {
    fn find(&self, path: &str) -> io::Result<Vec<ResourceLocation>> {
        Ok(self
            .roots
            .iter()
            .enumerate()
            .filter(|(_, root)| root.files.contains_key(path))
            .map(|(index, root)| ResourceLocation {
                root: index,
                id: format!("{}:{}", root.name, path),
            })
            .collect())
    }

    fn open(&self, location: &ResourceLocation) -> io::Result<Box<dyn BufRead + '_>> {
        let root = self
            .roots
            .get(location.root)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, location.id.clone()))?;
        let path = location
            .id
            .strip_prefix(&format!("{}:", root.name))
            .unwrap_or(&location.id);
        match root.files.get(path) {
            Some(Some(contents)) => Ok(Box::new(Cursor::new(contents.as_bytes()))),
            Some(None) => Err(Self::unreadable(&location.id)),
            None => Err(io::Error::new(io::ErrorKind::NotFound, location.id.clone())),
        }
    }
}
