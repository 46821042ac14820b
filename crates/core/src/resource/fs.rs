use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{ResourceLocation, ResourceSource, ResourceStore};

/// File-system store rooted at the collector's output directory
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl ResourceStore for OutputDir {
    fn read(&self, path: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_of(path)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&mut self, path: &str, contents: &str) -> io::Result<()> {
        let target = self.path_of(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        debug!("Writing {}", target.display());
        fs::write(target, contents)
    }
}

/// Ordered list of directories searched for resources
#[derive(Debug, Clone, Default)]
pub struct SearchPath {
    roots: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    pub fn push(&mut self, root: impl Into<PathBuf>) {
        self.roots.push(root.into());
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl ResourceSource for SearchPath {
    fn find(&self, path: &str) -> io::Result<Vec<ResourceLocation>> {
        let mut found = Vec::new();
        for (index, root) in self.roots.iter().enumerate() {
            let candidate = root.join(path);
            match fs::metadata(&candidate) {
                Ok(metadata) if metadata.is_file() => found.push(ResourceLocation {
                    root: index,
                    id: candidate.display().to_string(),
                }),
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        debug!("Found {} resource(s) for {}", found.len(), path);
        Ok(found)
    }

    fn open(&self, location: &ResourceLocation) -> io::Result<Box<dyn BufRead + '_>> {
        let file = File::open(&location.id)?;
        Ok(Box::new(BufReader::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_dir_absent_resource_is_none() {
        let temp = TempDir::new().unwrap();
        let store = OutputDir::new(temp.path());
        assert_eq!(store.read("META-INF/bindings/app::Bob").unwrap(), None);
    }

    #[test]
    fn test_output_dir_write_creates_parents() {
        let temp = TempDir::new().unwrap();
        let mut store = OutputDir::new(temp.path());
        store.write("META-INF/bindings/app::Bob", "app::Fred\n").unwrap();

        assert_eq!(
            store.read("META-INF/bindings/app::Bob").unwrap().as_deref(),
            Some("app::Fred\n")
        );
    }

    #[test]
    fn test_search_path_finds_every_root_in_order() {
        let first = TempDir::new().unwrap();
        let empty = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        for root in [&first, &second] {
            let dir = root.path().join("META-INF/bindings");
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("app::Bob"), "app::Fred\n").unwrap();
        }

        let search = SearchPath::new([first.path(), empty.path(), second.path()]);
        let found = search.find("META-INF/bindings/app::Bob").unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].root, 0);
        assert_eq!(found[1].root, 2);

        let mut line = String::new();
        search.open(&found[1]).unwrap().read_line(&mut line).unwrap();
        assert_eq!(line, "app::Fred\n");
    }

    #[test]
    fn test_search_path_ignores_directories() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("META-INF/bindings/app::Bob")).unwrap();

        let search = SearchPath::new([root.path()]);
        assert!(search.find("META-INF/bindings/app::Bob").unwrap().is_empty());
    }
}
