//! Range generation orchestrator.
//!
//! Coordinates a generation run: template discovery, topology construction,
//! role verification, rendering of both range documents and the manifest,
//! and finally writing them to the output directory. Everything is rendered
//! in memory first so a failed run leaves no partial files behind.

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::config::RangeConfig;
use crate::ludus::{require_templates, verify_required_roles, Inventory};
use crate::manifest::RangeManifest;
use crate::render::render_range;
use crate::topology::{Topology, TopologyBuilder};

/// File name of the range document without network isolation
pub const OPEN_CONFIG_FILE: &str = "range-config-open.yml";
/// File name of the range document with VLAN isolation
pub const SEGMENTED_CONFIG_FILE: &str = "range-config-segmented.yml";
/// File name of the JSON manifest
pub const MANIFEST_FILE: &str = "range-manifest.json";

/// Which range document to hand to Ludus
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RangeVariant {
    Open,
    Segmented,
}

/// Paths of the files written by a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFiles {
    pub open: PathBuf,
    pub segmented: PathBuf,
    pub manifest: PathBuf,
}

impl GeneratedFiles {
    fn in_dir(output_dir: &Path) -> Self {
        Self {
            open: output_dir.join(OPEN_CONFIG_FILE),
            segmented: output_dir.join(SEGMENTED_CONFIG_FILE),
            manifest: output_dir.join(MANIFEST_FILE),
        }
    }

    pub fn document(&self, variant: RangeVariant) -> &Path {
        match variant {
            RangeVariant::Open => &self.open,
            RangeVariant::Segmented => &self.segmented,
        }
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".tmp");
    PathBuf::from(staged)
}

/// Write every file or none of them.
///
/// Contents go to `<name>.tmp` first and are renamed into place once all
/// of them are on disk. On failure, staged and already renamed files are
/// removed again.
fn write_all_or_nothing(outputs: &[(&Path, &str)]) -> Result<()> {
    let mut staged = Vec::with_capacity(outputs.len());
    for (path, contents) in outputs {
        let tmp = staging_path(path);
        if let Err(e) = std::fs::write(&tmp, contents) {
            for tmp in &staged {
                let _ = std::fs::remove_file(tmp);
            }
            return Err(e).wrap_err_with(|| format!("Failed to write '{}'", tmp.display()));
        }
        staged.push(tmp);
    }

    for (i, ((path, _), tmp)) in outputs.iter().zip(&staged).enumerate() {
        if let Err(e) = std::fs::rename(tmp, path) {
            for (done, _) in &outputs[..i] {
                let _ = std::fs::remove_file(done);
            }
            for tmp in &staged[i..] {
                let _ = std::fs::remove_file(tmp);
            }
            return Err(e).wrap_err_with(|| format!("Failed to move '{}' into place", path.display()));
        }
        info!("Wrote {}", path.display());
    }
    Ok(())
}

/// Build the topology of a validated range description.
///
/// Construction order: forest root, child domains, standalone machines,
/// attackers.
pub fn build_topology(config: &RangeConfig) -> Result<Topology> {
    let mut builder = TopologyBuilder::new(config.build_context());

    let parent = builder
        .parent_domain(&config.parent.resolve())
        .wrap_err("Failed to build the forest root")?;

    for child in &config.children {
        let added = builder
            .child_domain(&parent, &child.resolve())
            .wrap_err_with(|| format!("Failed to build child domain '{}'", child.name))?;
        debug!("Child domain '{}' added {} machine(s)", child.name, added);
    }

    for machine in &config.standalone {
        builder
            .standalone(&machine.resolve())
            .wrap_err_with(|| format!("Failed to build standalone machine '{}'", machine.hostname))?;
    }

    if let Some(attackers) = &config.attackers {
        builder
            .attackers(&attackers.resolve())
            .wrap_err("Failed to build the attacker infrastructure")?;
    }

    Ok(builder.finish()?)
}

/// Generate the range documents and manifest into `output_dir`.
///
/// With an inventory, every template the description uses must be built
/// and every role the topology references must be installed. Without one
/// (offline runs) both checks are skipped.
pub fn generate_range_configs(
    config: &RangeConfig,
    inventory: Option<&dyn Inventory>,
    output_dir: &Path,
) -> Result<GeneratedFiles> {
    if let Some(inventory) = inventory {
        let templates = require_templates(inventory)?;
        config.check_templates(&templates)?;
    } else {
        info!("Offline mode: skipping template and role discovery");
    }

    let topology = build_topology(config)?;

    if let Some(inventory) = inventory {
        verify_required_roles(inventory, topology.role_names())?;
    }

    let rendered = render_range(&topology, &config.defaults)
        .wrap_err("Failed to render the range documents")?;
    let manifest = RangeManifest::from_topology(&topology)
        .to_json()
        .wrap_err("Failed to serialize the range manifest")?;

    let files = GeneratedFiles::in_dir(output_dir);
    std::fs::create_dir_all(output_dir)
        .wrap_err_with(|| format!("Failed to create output directory '{}'", output_dir.display()))?;
    write_all_or_nothing(&[
        (files.open.as_path(), rendered.open.as_str()),
        (files.segmented.as_path(), rendered.segmented.as_str()),
        (files.manifest.as_path(), manifest.as_str()),
    ])?;

    info!(
        "Generated range {} with {} machine(s)",
        topology.range_id(),
        topology.machines().len()
    );
    Ok(files)
}
