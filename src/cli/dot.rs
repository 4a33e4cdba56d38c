//! `felipe dot`

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};

use super::options::QueryOptions;
use super::output::Output;
use crate::config::Config;
use crate::definitions::{read_components_definition, read_faces_definition};
use crate::domain::Components;
use crate::render::{render_dot, Face};

/// Renders the queried part of one components document as DOT
///
/// The document is read from `src_file`, or from stdin when it is `None`.
pub fn run(
    output: &Output,
    src_file: Option<&Path>,
    face_file: Option<&Path>,
    config_file: Option<&Path>,
    options: &QueryOptions,
) -> Result<()> {
    let config = Config::load(config_file)?;
    output.verbose_ctx("dot", &format!("rankdir={}, fontsize={}", config.rankdir, config.fontsize));

    let def = match src_file {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
            read_components_definition(file)
                .with_context(|| format!("Invalid definition: {}", path.display()))?
        }
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read stdin")?;
            read_components_definition(buf.as_slice()).context("Invalid definition: <stdin>")?
        }
    };

    let mut components = Components::new();
    let added = def.add_to(&mut components);
    output.verbose_ctx("dot", &format!("Read {} components", added));

    let faces = match face_file {
        Some(path) => load_faces(path)?,
        None => Vec::new(),
    };
    output.verbose_ctx("dot", &format!("Loaded {} faces", faces.len()));

    components
        .complement()
        .context("Failed to resolve inheritance")?;

    let result = options.query(&components).run();
    output.verbose_ctx("dot", &format!("Rendering {} components", result.len()));

    let dot = render_dot(&result, &components, &faces, &config).context("Failed to render graph")?;
    output.text(&dot);

    Ok(())
}

fn load_faces(path: &Path) -> Result<Vec<Face>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let def = read_faces_definition(file)
        .with_context(|| format!("Invalid faces definition: {}", path.display()))?;
    Ok(def.to_faces())
}
