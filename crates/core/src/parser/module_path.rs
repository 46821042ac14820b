use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Position of a source file in its crate's module tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePath {
    pub crate_name: String,
    pub segments: Vec<String>,
}

impl ModulePath {
    pub fn new(crate_name: impl Into<String>, segments: Vec<String>) -> Self {
        Self {
            crate_name: crate_name.into(),
            segments,
        }
    }

    /// Module path of `file_path`, derived from its location under `src/`
    pub fn for_file(file_path: &Path, crate_name: &str) -> Self {
        let components: Vec<&str> = file_path
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => s.to_str(),
                _ => None,
            })
            .collect();

        let start_idx = components
            .iter()
            .rposition(|&c| c == "src")
            .map(|i| i + 1)
            .unwrap_or(components.len().saturating_sub(1));

        let mut segments = Vec::new();
        let Some(relative) = components.get(start_idx..) else {
            return Self::new(crate_name, segments);
        };
        for (index, component) in relative.iter().enumerate() {
            let is_file = index + 1 == relative.len();
            if is_file && matches!(*component, "mod.rs" | "lib.rs" | "main.rs") {
                continue;
            }
            let part = component.strip_suffix(".rs").unwrap_or(*component);
            segments.push(part.to_string());
        }

        Self::new(crate_name, segments)
    }

    /// Nested inline module
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self::new(self.crate_name.clone(), segments)
    }

    /// Enclosing module; the crate root is its own parent
    pub fn parent(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.pop();
        Self::new(self.crate_name.clone(), segments)
    }

    /// Binary name of `item` declared in this module
    pub fn qualify(&self, item: &str) -> String {
        let mut parts = Vec::with_capacity(self.segments.len() + 2);
        parts.push(self.crate_name.as_str());
        parts.extend(self.segments.iter().map(String::as_str));
        parts.push(item);
        parts.join("::")
    }

    /// Full path of the module itself
    pub fn full(&self) -> String {
        let mut parts = vec![self.crate_name.as_str()];
        parts.extend(self.segments.iter().map(String::as_str));
        parts.join("::")
    }

    /// Walk up from `start_path` to the closest `Cargo.toml`
    pub fn find_cargo_toml(start_path: &Path) -> Option<PathBuf> {
        let abs_path = if start_path.is_relative() {
            std::env::current_dir().ok()?.join(start_path)
        } else {
            start_path.to_path_buf()
        };

        let mut current: &Path = if abs_path.is_file() {
            abs_path.parent()?
        } else {
            &abs_path
        };

        loop {
            let cargo_toml = current.join("Cargo.toml");
            if cargo_toml.exists() {
                return Some(cargo_toml);
            }
            current = current.parent()?;
        }
    }

    /// Crate name declared by a manifest, with `-` mapped to `_`
    pub fn crate_name_from_manifest(cargo_toml_path: &Path) -> Result<String> {
        let manifest = cargo_toml::Manifest::from_path(cargo_toml_path)
            .map_err(|e| Error::ParseError(format!("Failed to parse Cargo.toml: {e}")))?;

        let package = manifest.package.as_ref().ok_or_else(|| {
            Error::ParseError(format!(
                "No [package] section found in {}",
                cargo_toml_path.display()
            ))
        })?;

        if let Some(lib_name) = manifest.lib.as_ref().and_then(|lib| lib.name.as_ref()) {
            return Ok(lib_name.replace('-', "_"));
        }
        Ok(package.name.replace('-', "_"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_file_module_path() {
        let path = Path::new("/project/src/models/user.rs");
        assert_eq!(ModulePath::for_file(path, "app").segments, vec!["models", "user"]);

        let path = Path::new("/project/src/lib.rs");
        assert!(ModulePath::for_file(path, "app").segments.is_empty());

        let path = Path::new("/project/src/models/mod.rs");
        assert_eq!(ModulePath::for_file(path, "app").segments, vec!["models"]);
    }

    #[test]
    fn test_file_outside_src_is_its_own_module() {
        let path = Path::new("standalone.rs");
        assert_eq!(ModulePath::for_file(path, "app").segments, vec!["standalone"]);
    }

    #[test]
    fn test_qualify_and_navigate() {
        let module = ModulePath::new("app", vec!["shapes".to_string()]);
        assert_eq!(module.qualify("Circle"), "app::shapes::Circle");
        assert_eq!(module.child("inner").full(), "app::shapes::inner");
        assert_eq!(module.parent().full(), "app");
        assert_eq!(module.parent().parent().full(), "app");
    }

    #[test]
    fn test_crate_name_from_manifest() {
        let temp = TempDir::new().unwrap();
        let manifest = temp.path().join("Cargo.toml");
        fs::write(
            &manifest,
            "[package]\nname = \"my-app\"\nversion = \"0.1.0\"\nedition = \"2021\"\n",
        )
        .unwrap();
        fs::create_dir_all(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("src/lib.rs"), "").unwrap();

        assert_eq!(ModulePath::crate_name_from_manifest(&manifest).unwrap(), "my_app");

        let found = ModulePath::find_cargo_toml(&temp.path().join("src/lib.rs")).unwrap();
        assert_eq!(found, manifest);
    }
}
