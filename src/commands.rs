//! Headless operations behind the `wayedit` subcommands.

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::Context;
use tracing::{info, warn};
use wayedit_core::PixelPoint;
use wayedit_editor::compositor::to_rgb_image;
use wayedit_editor::legacy::{convert_from_legacy, convert_to_legacy};
use wayedit_editor::{ImportOutcome, MapDocument};
use wayedit_settings::Config;

use crate::document_options;

/// Summary printed by `wayedit info`.
#[derive(Debug, Clone, PartialEq)]
pub struct MapInfo {
    pub image: Option<String>,
    pub size: Option<(u32, u32)>,
    pub resolution: f64,
    pub origin: Option<PixelPoint>,
}

impl fmt::Display for MapInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Image:      {}", self.image.as_deref().unwrap_or("-"))?;
        match self.size {
            Some((w, h)) => writeln!(f, "Size:       {}x{} px", w, h)?,
            None => writeln!(f, "Size:       -")?,
        }
        writeln!(f, "Resolution: {} m/px", self.resolution)?;
        match self.origin {
            Some(origin) => write!(f, "Origin:     {}", origin),
            None => write!(f, "Origin:     -"),
        }
    }
}

/// Which waypoint layout `convert_waypoints` writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaypointLayout {
    /// `points: [[x, y, z, qx, qy, qz, qw], ...]`
    Legacy,
    /// `format_version` + `waypoints` entries
    Current,
}

/// Options for `render_map`.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions<'a> {
    pub waypoints: Option<&'a Path>,
    pub scale: Option<f64>,
    pub grid: bool,
    pub path: bool,
}

/// Opens a sidecar into a document configured from `config`.
pub fn open_document(sidecar: &Path, config: &Config) -> anyhow::Result<MapDocument> {
    let mut doc = MapDocument::with_options(document_options(config));
    doc.load_sidecar(sidecar)?;
    Ok(doc)
}

/// Puts `sidecar` at the front of the recent files and saves `config` to
/// `config_path` when one is known.
pub fn remember_map(
    config: &mut Config,
    config_path: Option<&Path>,
    sidecar: &Path,
) -> anyhow::Result<()> {
    let entry = fs::canonicalize(sidecar).unwrap_or_else(|_| sidecar.to_path_buf());
    config.add_recent_file(entry);
    if let Some(path) = config_path {
        config
            .save_to_file(path)
            .with_context(|| format!("Failed to save config {}", path.display()))?;
    }
    Ok(())
}

pub fn map_info(sidecar: &Path, config: &Config) -> anyhow::Result<MapInfo> {
    let doc = open_document(sidecar, config)?;
    let meta = doc
        .metadata()
        .context("Sidecar did not produce map metadata")?;
    Ok(MapInfo {
        image: meta.image.clone(),
        size: doc.map_size(),
        resolution: meta.resolution,
        origin: doc.origin(),
    })
}

/// Composites the map with its overlays and writes a PNG.
pub fn render_map(
    sidecar: &Path,
    out: &Path,
    options: &RenderOptions<'_>,
    config: &Config,
) -> anyhow::Result<()> {
    let mut doc = open_document(sidecar, config)?;
    if !doc.has_map() {
        anyhow::bail!("Sidecar {} has no loadable map image", sidecar.display());
    }

    if let Some(scale) = options.scale {
        if !doc.set_scale_factor(scale) && scale != doc.scale_factor() {
            anyhow::bail!("Scale {} is outside the supported range", scale);
        }
    }
    if options.grid {
        doc.set_grid_visible(true);
    }
    if options.path {
        doc.set_path_enabled(true);
    }
    if let Some(path) = options.waypoints {
        let outcome = doc.import_waypoints(path, |mismatch| {
            warn!(
                "Importing waypoint file version {} as {}",
                mismatch.file_version, mismatch.expected
            );
            true
        })?;
        if let ImportOutcome::Imported(report) = outcome {
            info!(
                "{} waypoints imported, {} skipped",
                report.imported,
                report.skipped.len()
            );
        }
    }

    let frame = doc.render().context("Nothing to render")?;
    let image = to_rgb_image(frame);
    image
        .save(out)
        .with_context(|| format!("Failed to write image {}", out.display()))?;
    info!("Rendered {}x{} image to {}", image.width(), image.height(), out.display());
    Ok(())
}

pub fn export_pgm(sidecar: &Path, out: &Path, config: &Config) -> anyhow::Result<()> {
    let mut doc = open_document(sidecar, config)?;
    doc.export_pgm(out)
}

pub fn convert_waypoints(input: &Path, output: &Path, to: WaypointLayout) -> anyhow::Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read waypoints {}", input.display()))?;
    let converted = match to {
        WaypointLayout::Legacy => convert_to_legacy(&text),
        WaypointLayout::Current => convert_from_legacy(&text),
    }
    .with_context(|| format!("Failed to convert {}", input.display()))?;
    fs::write(output, converted)
        .with_context(|| format!("Failed to write waypoints {}", output.display()))?;
    info!("Converted {} -> {}", input.display(), output.display());
    Ok(())
}
