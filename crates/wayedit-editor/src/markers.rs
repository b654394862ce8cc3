//! Vector painting onto layer rasters using tiny-skia.
//!
//! Features:
//! - Waypoint markers (heading arrow, filled disc, number)
//! - Origin cross
//! - Path segments between consecutive waypoints
//! - Pen and eraser strokes
//!
//! Numbers are drawn with a built-in seven-segment glyph set so rendering does
//! not depend on system fonts.

use std::f64::consts::PI;

use tiny_skia::{Color, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};
use wayedit_core::constants::{EDIT_SIZE_MULTIPLIER, MARKER_LINE_WIDTH, ORIGIN_MARKER_SIZE};
use wayedit_core::PixelPoint;

use crate::waypoint::Waypoint;

fn waypoint_color() -> Color {
    Color::from_rgba8(255, 0, 0, 255)
}
fn edit_color() -> Color {
    Color::from_rgba8(0, 120, 255, 255)
}
fn label_color() -> Color {
    Color::from_rgba8(255, 255, 255, 230)
}
fn origin_color() -> Color {
    Color::from_rgba8(255, 0, 0, 255)
}
fn path_color() -> Color {
    Color::from_rgba8(76, 175, 80, 255)
}

/// Paint applied by a freehand stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrokeTool {
    /// Opaque black (occupied)
    Pen,
    /// Opaque white (free space)
    Eraser,
}

impl StrokeTool {
    fn color(&self) -> Color {
        match self {
            Self::Pen => Color::BLACK,
            Self::Eraser => Color::WHITE,
        }
    }
}

fn paint_of(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    paint
}

fn line_stroke(width: f32, cap: LineCap) -> Stroke {
    Stroke {
        width,
        line_cap: cap,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

fn stroke_line(pixmap: &mut Pixmap, from: (f32, f32), to: (f32, f32), paint: &Paint, stroke: &Stroke) {
    let mut pb = PathBuilder::new();
    pb.move_to(from.0, from.1);
    pb.line_to(to.0, to.1);
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, paint, stroke, Transform::identity(), None);
    }
}

fn fill_circle(pixmap: &mut Pixmap, cx: f32, cy: f32, radius: f32, paint: &Paint) {
    if let Some(path) = PathBuilder::from_circle(cx, cy, radius) {
        pixmap.fill_path(&path, paint, FillRule::Winding, Transform::identity(), None);
    }
}

/// Segment bits: a=top, b=top-right, c=bottom-right, d=bottom, e=bottom-left,
/// f=top-left, g=middle.
const DIGIT_SEGMENTS: [u8; 10] = [63, 6, 91, 79, 102, 109, 125, 7, 127, 111];

fn draw_digit(pixmap: &mut Pixmap, digit: usize, left: f32, top: f32, height: f32, paint: &Paint) {
    let w = height * 0.5;
    let h = height;
    let mid = h / 2.0;
    let segments: [((f32, f32), (f32, f32)); 7] = [
        ((0.0, 0.0), (w, 0.0)),
        ((w, 0.0), (w, mid)),
        ((w, mid), (w, h)),
        ((0.0, h), (w, h)),
        ((0.0, mid), (0.0, h)),
        ((0.0, 0.0), (0.0, mid)),
        ((0.0, mid), (w, mid)),
    ];
    let mask = DIGIT_SEGMENTS[digit % 10];
    let stroke = line_stroke((height / 6.0).max(1.0), LineCap::Round);
    for (bit, (a, b)) in segments.iter().enumerate() {
        if mask & (1 << bit) != 0 {
            stroke_line(
                pixmap,
                (left + a.0, top + a.1),
                (left + b.0, top + b.1),
                paint,
                &stroke,
            );
        }
    }
}

/// Draws a decimal number centered on `(cx, cy)` with the given glyph height.
pub fn draw_number(pixmap: &mut Pixmap, number: u32, cx: f32, cy: f32, height: f32, color: Color) {
    let digits: Vec<usize> = number
        .to_string()
        .bytes()
        .map(|b| (b - b'0') as usize)
        .collect();
    let glyph_w = height * 0.5;
    let gap = height * 0.25;
    let total = digits.len() as f32 * glyph_w + (digits.len() as f32 - 1.0) * gap;
    let paint = paint_of(color);
    let mut left = cx - total / 2.0;
    let top = cy - height / 2.0;
    for d in digits {
        draw_digit(pixmap, d, left, top, height, &paint);
        left += glyph_w + gap;
    }
}

/// Draws a waypoint marker: heading arrow, disc, and number.
pub fn draw_waypoint(pixmap: &mut Pixmap, waypoint: &Waypoint, size: f32, editing: bool) {
    let (color, size) = if editing {
        (edit_color(), size * EDIT_SIZE_MULTIPLIER as f32)
    } else {
        (waypoint_color(), size)
    };
    let paint = paint_of(color);
    let stroke = line_stroke(MARKER_LINE_WIDTH, LineCap::Round);

    let center = waypoint.pixel();
    let angle = waypoint.angle();
    let length = 3.0 * size as f64;
    let end_x = center.x.saturating_add((length * angle.cos()) as i32);
    let end_y = center.y.saturating_sub((length * angle.sin()) as i32);
    let end = (end_x as f32, end_y as f32);
    stroke_line(pixmap, (center.x as f32, center.y as f32), end, &paint, &stroke);

    let arrow = (size / 2.0).floor() as f64;
    for offset in [3.0 * PI / 4.0, -3.0 * PI / 4.0] {
        let a = angle + offset;
        let tip = (
            end_x.saturating_add((arrow * a.cos()) as i32) as f32,
            end_y.saturating_sub((arrow * a.sin()) as i32) as f32,
        );
        stroke_line(pixmap, end, tip, &paint, &stroke);
    }

    fill_circle(pixmap, center.x as f32, center.y as f32, size, &paint);
    draw_number(
        pixmap,
        waypoint.number(),
        center.x as f32,
        center.y as f32,
        size,
        label_color(),
    );
}

/// Draws the origin cross and ring.
pub fn draw_origin(pixmap: &mut Pixmap, origin: PixelPoint) {
    let paint = paint_of(origin_color());
    let stroke = line_stroke(MARKER_LINE_WIDTH, LineCap::Butt);
    let (x, y) = (origin.x as f32, origin.y as f32);
    let arm = ORIGIN_MARKER_SIZE;
    stroke_line(pixmap, (x - arm, y), (x + arm, y), &paint, &stroke);
    stroke_line(pixmap, (x, y - arm), (x, y + arm), &paint, &stroke);
    if let Some(ring) = PathBuilder::from_circle(x, y, arm / 2.0) {
        pixmap.stroke_path(&ring, &paint, &stroke, Transform::identity(), None);
    }
}

/// Joins consecutive points with path segments. Fewer than two points draws nothing.
pub fn draw_path(pixmap: &mut Pixmap, points: &[PixelPoint]) {
    let paint = paint_of(path_color());
    let stroke = line_stroke(MARKER_LINE_WIDTH, LineCap::Round);
    for pair in points.windows(2) {
        stroke_line(
            pixmap,
            (pair[0].x as f32, pair[0].y as f32),
            (pair[1].x as f32, pair[1].y as f32),
            &paint,
            &stroke,
        );
    }
}

/// Paints one freehand segment; a zero-length segment paints a round dot.
pub fn draw_stroke(pixmap: &mut Pixmap, from: PixelPoint, to: PixelPoint, tool: StrokeTool, width: f32) {
    let paint = paint_of(tool.color());
    if from == to {
        fill_circle(pixmap, from.x as f32, from.y as f32, width / 2.0, &paint);
        return;
    }
    let stroke = line_stroke(width, LineCap::Round);
    stroke_line(
        pixmap,
        (from.x as f32, from.y as f32),
        (to.x as f32, to.y as f32),
        &paint,
        &stroke,
    );
}
