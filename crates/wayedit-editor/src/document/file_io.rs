//! File I/O operations (map, sidecar, PGM export, waypoint export/import).

use std::path::Path;

use anyhow::Context;
use image::GrayImage;
use tracing::{info, warn};
use wayedit_core::{Error, PixelPoint, WaypointFileError};

use super::MapDocument;
use crate::compositor::{flatten_to_gray, gray_to_pixmap};
use crate::events::DocumentEvent;
use crate::layer::LayerKind;
use crate::map_meta::MapMetadata;
use crate::markers;
use crate::pgm;
use crate::transform::MapFrame;
use crate::waypoint_io::{self, ImportReport, VersionMismatch, WaypointFile};

/// Result of a waypoint import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Imported(ImportReport),
    /// The user declined a format version mismatch; nothing changed.
    Declined(VersionMismatch),
}

impl MapDocument {
    /// Load a binary PGM as the base map.
    pub fn load_map(&mut self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let image = pgm::load_pgm(path)
            .with_context(|| format!("Failed to load map {}", path.display()))?;
        self.set_base_map(image)?;
        self.map_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Install a decoded raster as the base map; derived layers are reset.
    ///
    /// Waypoints keep their pixel positions.
    pub fn set_base_map(&mut self, image: GrayImage) -> anyhow::Result<()> {
        let raster = gray_to_pixmap(&image)
            .ok_or_else(|| Error::other("map has zero width or height"))?;
        let (width, height) = image.dimensions();

        self.layers.get_mut(LayerKind::BaseMap).set_raster(Some(raster));
        self.layers.reset_derived(width, height);
        self.base_map = Some(image);
        self.is_modified = false;

        self.redraw_origin();
        self.refresh_path();
        self.invalidate();
        info!("Loaded {}x{} map", width, height);
        self.emit(DocumentEvent::MapLoaded { width, height });
        Ok(())
    }

    /// Load a map sidecar YAML: the referenced PGM (if present) and the origin.
    ///
    /// Nothing changes if the sidecar or its PGM is malformed. A PGM that does
    /// not exist is reported and the origin is still applied.
    pub fn load_sidecar(&mut self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let meta = MapMetadata::load(path)
            .with_context(|| format!("Failed to read map metadata {}", path.display()))?;

        let mut image = None;
        if let Some(image_path) = meta.image_path(path) {
            if image_path.exists() {
                image = Some(pgm::load_pgm(&image_path).with_context(|| {
                    format!("Failed to load map {}", image_path.display())
                })?);
            } else {
                warn!("Map image not found: {}", image_path.display());
            }
        }

        if let Some(image) = image {
            self.set_base_map(image)?;
            if let Some(image_path) = meta.image_path(path) {
                self.map_path = Some(image_path);
            }
        }

        if let Some(origin) = meta.origin_pixel(self.map_size().map(|(_, h)| h)) {
            self.set_origin(origin, meta.resolution);
        }
        self.metadata = Some(meta);
        Ok(())
    }

    /// Set the metric origin and recompute every waypoint's metric position.
    pub fn set_origin(&mut self, origin: PixelPoint, resolution: f64) {
        let frame = MapFrame::new(origin, resolution);
        self.transform.set_frame(origin, resolution);
        self.waypoints.recompute_all(frame);
        self.redraw_origin();
        self.invalidate();
        info!("Origin at pixel {} ({} m/px)", origin, resolution);
        self.emit(DocumentEvent::OriginChanged(origin));
        let updated: Vec<_> = self.waypoints.iter().cloned().collect();
        for waypoint in updated {
            self.emit(DocumentEvent::WaypointUpdated(waypoint));
        }
    }

    pub(super) fn redraw_origin(&mut self) {
        let origin = self.transform.origin();
        let Some(raster) = self.layers.get_mut(LayerKind::Origin).raster_mut() else {
            return;
        };
        raster.fill(tiny_skia::Color::TRANSPARENT);
        if let Some(origin) = origin {
            markers::draw_origin(raster, origin);
        }
    }

    /// Base map plus drawing edits, flattened to grayscale. Grid and markers are excluded.
    pub fn export_map_image(&self) -> Option<GrayImage> {
        let frame = self.compositor.compose_only(
            &self.layers,
            &[LayerKind::BaseMap, LayerKind::Drawing],
            None,
        )?;
        Some(flatten_to_gray(&frame))
    }

    /// Write the edited map as a binary PGM.
    pub fn export_pgm(&mut self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let image = self
            .export_map_image()
            .context("No map loaded; nothing to export")?;
        pgm::save_pgm(path, &image)
            .with_context(|| format!("Failed to write map {}", path.display()))?;
        self.is_modified = false;
        info!("Exported map to {}", path.display());
        Ok(())
    }

    /// Serialize the waypoints with the active format descriptor.
    pub fn export_waypoints_string(&self) -> anyhow::Result<String> {
        Ok(waypoint_io::export_to_string(
            self.waypoints.as_slice(),
            &self.format,
        )?)
    }

    pub fn export_waypoints(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        waypoint_io::save_waypoints(path, self.waypoints.as_slice(), &self.format)
            .with_context(|| format!("Failed to write waypoints {}", path.display()))?;
        info!(
            "Exported {} waypoints to {}",
            self.waypoints.len(),
            path.display()
        );
        Ok(())
    }

    /// Replace the waypoints with those in `text`.
    ///
    /// Requires an origin. When the file declares a version different from the
    /// active format, `confirm` decides whether to continue.
    pub fn import_waypoints_str(
        &mut self,
        text: &str,
        confirm: impl FnOnce(&VersionMismatch) -> bool,
    ) -> anyhow::Result<ImportOutcome> {
        let frame = self
            .transform
            .frame()
            .ok_or(Error::from(WaypointFileError::OriginNotSet))?;
        let file = WaypointFile::from_yaml_str(text)?;

        if let Some(mismatch) = file.version_mismatch(&self.format.version) {
            warn!(
                "Waypoint file version {} differs from {}",
                mismatch.file_version, mismatch.expected
            );
            if !confirm(&mismatch) {
                return Ok(ImportOutcome::Declined(mismatch));
            }
        }

        let (poses, skipped) = file.decode(&frame);
        let imported = poses.len();
        self.replace_waypoints(poses);
        info!("Imported {} waypoints ({} skipped)", imported, skipped.len());
        Ok(ImportOutcome::Imported(ImportReport { imported, skipped }))
    }

    pub fn import_waypoints(
        &mut self,
        path: impl AsRef<Path>,
        confirm: impl FnOnce(&VersionMismatch) -> bool,
    ) -> anyhow::Result<ImportOutcome> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read waypoints {}", path.display()))?;
        self.import_waypoints_str(&text, confirm)
            .with_context(|| format!("Failed to import waypoints {}", path.display()))
    }
}
