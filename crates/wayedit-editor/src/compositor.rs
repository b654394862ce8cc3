//! Layer compositing.
//!
//! A frame is built on an opaque white canvas the size of the base map. The
//! visible layers are painted bottom to top with their opacity, and the grid
//! overlay is inserted right after the base map. The result can be resampled
//! for display or flattened to grayscale for PGM export.

use image::{GrayImage, Luma, Rgb, RgbImage};
use tiny_skia::{
    BlendMode, Color, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, StrokeDash,
    Transform,
};
use tracing::debug;
use wayedit_core::constants::{DEFAULT_GRID_SIZE, GRID_OPACITY};

use crate::layer::{LayerKind, LayerStack};

fn grid_color(opacity: f32) -> Color {
    Color::from_rgba8(160, 160, 164, (opacity.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// Dashed reference grid drawn over the base map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridOverlay {
    /// Line spacing in map pixels
    pub spacing: u32,
    pub opacity: f32,
}

impl Default for GridOverlay {
    fn default() -> Self {
        Self {
            spacing: DEFAULT_GRID_SIZE,
            opacity: GRID_OPACITY,
        }
    }
}

impl GridOverlay {
    fn draw(&self, pixmap: &mut Pixmap) {
        if self.spacing == 0 {
            return;
        }
        let (w, h) = (pixmap.width(), pixmap.height());
        let mut pb = PathBuilder::new();
        for x in (0..w).step_by(self.spacing as usize) {
            pb.move_to(x as f32 + 0.5, 0.0);
            pb.line_to(x as f32 + 0.5, h as f32);
        }
        for y in (0..h).step_by(self.spacing as usize) {
            pb.move_to(0.0, y as f32 + 0.5);
            pb.line_to(w as f32, y as f32 + 0.5);
        }
        let Some(path) = pb.finish() else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(grid_color(self.opacity));
        let stroke = Stroke {
            width: 1.0,
            dash: StrokeDash::new(vec![4.0, 2.0], 0.0),
            ..Default::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}

/// Paints a layer stack into a single frame.
#[derive(Debug, Clone)]
pub struct Compositor {
    background: Color,
}

impl Default for Compositor {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
        }
    }
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Composites every layer at base-map size. `None` until a base map exists.
    pub fn compose(&self, layers: &LayerStack, grid: Option<&GridOverlay>) -> Option<Pixmap> {
        self.compose_only(layers, &LayerKind::PAINT_ORDER, grid)
    }

    /// Composites the listed layers (still in paint order) at base-map size.
    pub fn compose_only(
        &self,
        layers: &LayerStack,
        kinds: &[LayerKind],
        grid: Option<&GridOverlay>,
    ) -> Option<Pixmap> {
        let base = layers.get(LayerKind::BaseMap).raster()?;
        let mut canvas = Pixmap::new(base.width(), base.height())?;
        canvas.fill(self.background);

        for layer in layers.iter() {
            if kinds.contains(&layer.kind()) && layer.is_paintable() {
                if let Some(raster) = layer.raster() {
                    let paint = PixmapPaint {
                        opacity: layer.opacity(),
                        blend_mode: BlendMode::SourceOver,
                        quality: FilterQuality::Nearest,
                    };
                    canvas.draw_pixmap(0, 0, raster.as_ref(), &paint, Transform::identity(), None);
                }
            }
            if layer.kind() == LayerKind::BaseMap {
                if let Some(grid) = grid {
                    grid.draw(&mut canvas);
                }
            }
        }
        Some(canvas)
    }
}

/// Resamples a frame by `scale` with bilinear filtering; size is truncated, min 1x1.
pub fn scale_for_display(frame: &Pixmap, scale: f64) -> Option<Pixmap> {
    let width = ((frame.width() as f64 * scale) as u32).max(1);
    let height = ((frame.height() as f64 * scale) as u32).max(1);
    let mut out = Pixmap::new(width, height)?;
    let sx = width as f32 / frame.width() as f32;
    let sy = height as f32 / frame.height() as f32;
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..Default::default()
    };
    out.draw_pixmap(0, 0, frame.as_ref(), &paint, Transform::from_scale(sx, sy), None);
    debug!("Scaled frame {}x{} -> {}x{}", frame.width(), frame.height(), width, height);
    Some(out)
}

/// Converts an opaque frame to grayscale using integer luma weights (11, 16, 5) / 32.
pub fn flatten_to_gray(frame: &Pixmap) -> GrayImage {
    GrayImage::from_fn(frame.width(), frame.height(), |x, y| {
        let value = frame
            .pixel(x, y)
            .map(|p| {
                let c = p.demultiply();
                ((c.red() as u32 * 11 + c.green() as u32 * 16 + c.blue() as u32 * 5) / 32) as u8
            })
            .unwrap_or(255);
        Luma([value])
    })
}

/// Drops alpha from an opaque frame.
pub fn to_rgb_image(frame: &Pixmap) -> RgbImage {
    let data = frame.data();
    let width = frame.width();
    RgbImage::from_fn(width, frame.height(), |x, y| {
        let idx = ((y * width + x) * 4) as usize;
        Rgb([data[idx], data[idx + 1], data[idx + 2]])
    })
}

/// Builds an opaque RGBA raster from grayscale map data.
pub fn gray_to_pixmap(image: &GrayImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.data_mut().chunks_exact_mut(4).zip(image.as_raw()) {
        dst.copy_from_slice(&[*src, *src, *src, 255]);
    }
    Some(pixmap)
}
