use anyhow::{Context, Result};
use bindery_core::Config;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Load the configuration and the directory its relative paths start from.
///
/// An explicit file must exist; otherwise the closest `.bindery.json` above
/// `cwd` is used, falling back to the defaults relative to `cwd`.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<(Config, PathBuf)> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => Config::find_config_file(cwd),
    };

    match path {
        Some(path) => {
            let config = Config::load_from_file(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            let base = path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map_or_else(|| cwd.to_path_buf(), Path::to_path_buf);
            debug!("Using config {} (base {})", path.display(), base.display());
            Ok((config, base))
        }
        None => Ok((Config::default(), cwd.to_path_buf())),
    }
}

fn is_skipped_dir(name: &str) -> bool {
    name == "target" || (name.starts_with('.') && name.len() > 1)
}

/// Every `.rs` file under `roots`, sorted; files given directly are kept
pub fn rust_files(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for root in roots {
        if !root.exists() {
            debug!("Skipping missing source root {}", root.display());
            continue;
        }

        for entry in WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !e.file_type().is_dir()
                    || !e.file_name().to_str().is_some_and(is_skipped_dir)
            })
            .filter_map(|e| e.ok())
        {
            let is_rust = entry.path().extension().is_some_and(|ext| ext == "rs");
            if entry.file_type().is_file() && is_rust {
                files.push(entry.path().to_path_buf());
            }
        }
    }

    files.sort();
    files.dedup();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_rust_files_skips_target_and_hidden() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        for path in ["src/lib.rs", "src/a/b.rs", "src/notes.txt", "src/target/x.rs", "src/.hidden/y.rs"] {
            let path = root.join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }

        let files = rust_files(&[root.join("src"), root.join("missing")]);
        assert_eq!(files, vec![root.join("src/a/b.rs"), root.join("src/lib.rs")]);

        let single = rust_files(&[root.join("src/lib.rs")]);
        assert_eq!(single, vec![root.join("src/lib.rs")]);
    }

    #[test]
    fn test_load_config_defaults_and_base() {
        let temp = TempDir::new().unwrap();
        let (config, base) = load_config(None, temp.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(base, temp.path());

        let path = temp.path().join(".bindery.json");
        fs::write(&path, r#"{ "crate_name": "app" }"#).unwrap();
        let nested = temp.path().join("src");
        fs::create_dir_all(&nested).unwrap();

        let (config, base) = load_config(None, &nested).unwrap();
        assert_eq!(config.crate_name.as_deref(), Some("app"));
        assert_eq!(base, temp.path());

        assert!(load_config(Some(&temp.path().join("nope.json")), temp.path()).is_err());
    }
}
