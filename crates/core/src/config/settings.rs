use crate::{
    binding::BeanDefinitionStrategy,
    collector::{CollectorOptions, ContractInference, DEFAULT_UNIVERSAL_TYPES},
    error::{Error, Result},
    parser::declaration_scanner::DEFAULT_ATTRIBUTE,
    registry::BINDINGS_PREFIX,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = ".bindery.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct Config {
    /// Overrides the crate name read from `Cargo.toml`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crate_name: Option<String>,
    /// Directories scanned for `.rs` files, relative to the config file
    pub source_roots: Vec<PathBuf>,
    /// Where registries are written
    pub output_dir: PathBuf,
    pub prefix: String,
    /// Name of the binding attribute
    pub attribute: String,
    /// Traits ignored when inferring a contract
    pub universal_types: Vec<String>,
    /// Extra roots searched by `list`, after `output_dir`
    pub search_path: Vec<PathBuf>,
    /// Register beans as `contract#implementation`
    pub qualify_bean_names: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crate_name: None,
            source_roots: vec![PathBuf::from("src")],
            output_dir: PathBuf::from("target/bindings"),
            prefix: BINDINGS_PREFIX.to_string(),
            attribute: DEFAULT_ATTRIBUTE.to_string(),
            universal_types: DEFAULT_UNIVERSAL_TYPES.iter().map(|s| s.to_string()).collect(),
            search_path: Vec::new(),
            qualify_bean_names: false,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path;

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Some(config_path);
            }

            current = current.parent()?;
        }
    }

    /// Closest config file above `start_path`, or the defaults
    pub fn load_or_default(start_path: &Path) -> Result<Self> {
        match Self::find_config_file(start_path) {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                Self::load_from_file(&path)
            }
            None => {
                debug!("No {} above {}, using defaults", CONFIG_FILE_NAME, start_path.display());
                Ok(Self::default())
            }
        }
    }

    pub fn collector_options(&self) -> CollectorOptions {
        CollectorOptions {
            prefix: self.prefix.clone(),
            inference: ContractInference::new(self.universal_types.iter().cloned()),
        }
    }

    /// Bean-definition strategy over `registry`, naming beans as configured
    pub fn bean_definition_strategy<R>(&self, registry: R) -> BeanDefinitionStrategy<R> {
        BeanDefinitionStrategy::new(registry).qualified(self.qualify_bean_names)
    }
}
