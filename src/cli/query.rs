//! `felipe query`
//!
//! Reads every `*.yaml` components document of a directory into one
//! collection, resolves inheritance, runs the query and prints the result
//! as a components document.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::options::QueryOptions;
use super::output::Output;
use crate::definitions::{read_components_definition, ComponentsDefinition};
use crate::domain::Components;

/// Runs the query over the definitions in `src_dir`
pub fn run(output: &Output, src_dir: &Path, options: &QueryOptions) -> Result<()> {
    let mut components = Components::new();

    let files = definition_files(src_dir)?;
    output.verbose_ctx("query", &format!("Found {} definition files", files.len()));

    for path in &files {
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let def = read_components_definition(file)
            .with_context(|| format!("Invalid definition: {}", path.display()))?;
        let added = def.add_to(&mut components);
        output.verbose_ctx("query", &format!("{}: {} components", path.display(), added));
    }

    components
        .complement()
        .context("Failed to resolve inheritance")?;
    output.verbose_ctx("query", &format!("Resolved {} components", components.len()));

    output.verbose_ctx(
        "query",
        &format!(
            "filter={}, complementation={}",
            options
                .filter
                .as_ref()
                .map(|f| f.to_string())
                .unwrap_or_else(|| "none".to_string()),
            options.complementation
        ),
    );
    let result = options.query(&components).run();
    output.verbose_ctx("query", &format!("Selected {} components", result.len()));

    output.data(&ComponentsDefinition::from_selection(&result))
}

/// Lists the `*.yaml` files directly inside `dir`, sorted by file name
fn definition_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?
            .path();
        if path.is_file() && path.extension().map(|ext| ext == "yaml").unwrap_or(false) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}
