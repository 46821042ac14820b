use anyhow::{Context, Result};
use std::{env, path::PathBuf};
use tracing::{debug, info};

use bindery_core::{config::CONFIG_FILE_NAME, parser::ModulePath, Config};

pub fn init_command(cwd: Option<&str>, force: bool) -> Result<()> {
    // Determine the project root
    let project_root = if let Some(cwd) = cwd {
        PathBuf::from(cwd)
    } else {
        env::current_dir().context("Failed to get current directory")?
    };

    let project_root = project_root
        .canonicalize()
        .context("Failed to canonicalize project root")?;

    let config_path = project_root.join(CONFIG_FILE_NAME);
    if config_path.exists() && !force {
        println!("❌ Config already exists at: {}", config_path.display());
        println!("   Use --force to overwrite");
        return Ok(());
    }

    let mut config = Config::default();
    let manifest = project_root.join("Cargo.toml");
    if manifest.exists() {
        // Workspace-only manifests have no package and keep the name unset
        match ModulePath::crate_name_from_manifest(&manifest) {
            Ok(name) => config.crate_name = Some(name),
            Err(e) => debug!("No crate name from {}: {}", manifest.display(), e),
        }
    }

    config
        .save_to_file(&config_path)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    info!("Created config: {}", config_path.display());

    println!("✅ Created config: {}", config_path.display());
    if let Some(name) = &config.crate_name {
        println!("   • crate_name: {name}");
    }
    println!("   • output_dir: {}", config.output_dir.display());
    Ok(())
}
