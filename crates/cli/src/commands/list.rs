use anyhow::{Context, Result};
use std::{
    env,
    path::{Path, PathBuf},
};
use tracing::debug;

use bindery_core::{ContractName, RegistryKind, SearchPath, ServiceResolver};

use crate::utils::load_config;

pub fn list_command(
    contract: &str,
    search: &[PathBuf],
    services: bool,
    config_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let cwd = env::current_dir().context("Failed to get current directory")?;
    let (config, base) = load_config(config_path, &cwd)?;

    let contract = ContractName::new(contract).context("Invalid contract name")?;
    let roots: Vec<PathBuf> = if search.is_empty() {
        std::iter::once(&config.output_dir)
            .chain(&config.search_path)
            .map(|root| base.join(root))
            .collect()
    } else {
        search.to_vec()
    };
    debug!("Search path: {:?}", roots);

    let resolver = if services {
        ServiceResolver::for_kind(RegistryKind::Services)
    } else {
        ServiceResolver::new(config.prefix.clone())
    };
    let entries = resolver
        .entries(&contract, &SearchPath::new(roots))
        .with_context(|| format!("Failed to read registries for {contract}"))?;

    if json {
        let values: Vec<_> = entries
            .iter()
            .map(|entry| {
                serde_json::json!({
                    "implementation": entry.name.as_str(),
                    "resource": entry.resource,
                    "line": entry.line,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No implementations registered for {contract}");
        return Ok(());
    }

    println!("📦 {} ({} implementation(s))", contract, entries.len());
    for entry in &entries {
        println!("   {}  ({}:{})", entry.name, entry.resource, entry.line);
    }
    Ok(())
}
