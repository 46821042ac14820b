use anyhow::{Context, Result, bail};
use std::{
    env,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use bindery_core::{BindingCollector, OutputDir, Round, RoundOutcome, RustParser, SourceSet};

use crate::utils::{load_config, rust_files};

pub fn collect_command(
    paths: &[PathBuf],
    out: Option<&Path>,
    config_path: Option<&Path>,
    crate_name: Option<&str>,
) -> Result<()> {
    let cwd = env::current_dir().context("Failed to get current directory")?;
    let (config, base) = load_config(config_path, &cwd)?;

    let roots: Vec<PathBuf> = if paths.is_empty() {
        config.source_roots.iter().map(|root| base.join(root)).collect()
    } else {
        paths.to_vec()
    };
    let files = rust_files(&roots);
    info!("Scanning {} Rust file(s)", files.len());

    let crate_name = crate_name.or(config.crate_name.as_deref());
    let mut parser = RustParser::with_attribute(&config.attribute)
        .context("Failed to create Rust parser")?;
    let mut sources = SourceSet::new();
    for file in &files {
        let scanned = parser
            .scan_file(file, crate_name)
            .with_context(|| format!("Failed to scan {}", file.display()))?;
        debug!("{}: {} annotated item(s)", file.display(), scanned.items.len());
        sources.add(scanned);
    }

    let output_dir = match out {
        Some(dir) => dir.to_path_buf(),
        None => base.join(&config.output_dir),
    };
    let mut store = OutputDir::new(&output_dir);
    let mut collector = BindingCollector::new(config.collector_options());

    // All sources are known up front: one discovery round, then the closing one
    collector.process(&Round::new(sources.declarations()), &mut store);
    let outcome = collector.process(&Round::last(), &mut store);

    for diagnostic in collector.diagnostics() {
        if diagnostic.is_error() {
            eprintln!("{diagnostic}");
        } else {
            println!("{diagnostic}");
        }
    }

    if let RoundOutcome::Finalized(report) = outcome {
        println!(
            "✅ {} registr{} written, {} unchanged, {} failed ({})",
            report.written.len(),
            if report.written.len() == 1 { "y" } else { "ies" },
            report.unchanged.len(),
            report.failed.len(),
            output_dir.display()
        );
    }

    let errors = collector.diagnostics().iter().filter(|d| d.is_error()).count();
    if errors > 0 {
        bail!("Binding collection finished with {errors} error(s)");
    }
    Ok(())
}
