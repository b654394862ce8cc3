use proptest::prelude::*;
use wayedit_editor::transform::{
    display_to_pixel, metric_to_pixel, pixel_to_display, pixel_to_metric, try_metric_to_pixel,
};
use wayedit_editor::{DisplayPoint, MetricPoint, PixelPoint};

#[test]
fn test_pixel_to_display_and_back() {
    let p = PixelPoint::new(120, 45);
    let d = pixel_to_display(p, 0.5);
    assert!((d.x - 60.0).abs() < 0.01);
    assert!((d.y - 22.5).abs() < 0.01);
    assert_eq!(display_to_pixel(d, 0.5), Some(p));
}

#[test]
fn test_metric_to_pixel_truncates_toward_zero() {
    let origin = PixelPoint::new(0, 0);
    // -0.07 / 0.05 = -1.4 -> -1, not -2
    let p = metric_to_pixel(MetricPoint::new(-0.07, 0.07), origin, 0.05);
    assert_eq!(p, PixelPoint::new(-1, -1));
}

#[test]
fn test_origin_maps_to_metric_zero() {
    let origin = PixelPoint::new(20, 60);
    let m = pixel_to_metric(origin, origin, 0.05);
    assert_eq!(m, MetricPoint::new(0.0, 0.0));
}

#[test]
fn test_display_to_pixel_rejects_zero_scale() {
    assert!(display_to_pixel(DisplayPoint::new(10.0, 10.0), 0.0).is_none());
    assert!(display_to_pixel(DisplayPoint::new(10.0, 10.0), -1.0).is_none());
}

#[test]
fn test_extreme_pixels_convert_without_overflow() {
    let origin = PixelPoint::new(i32::MIN, i32::MAX);
    let m = pixel_to_metric(PixelPoint::new(i32::MAX, i32::MIN), origin, 1.0);
    assert_eq!(m, MetricPoint::new(u32::MAX as f64, u32::MAX as f64));
}

#[test]
fn test_try_metric_to_pixel_range() {
    let origin = PixelPoint::new(-100, 150);
    assert_eq!(
        try_metric_to_pixel(MetricPoint::new(1.0, 1.0), origin, 0.05),
        Some(PixelPoint::new(-80, 130))
    );
    assert_eq!(try_metric_to_pixel(MetricPoint::new(1.0e9, 0.0), origin, 0.05), None);
    assert_eq!(try_metric_to_pixel(MetricPoint::new(0.0, 1.0e9), origin, 0.05), None);
}

proptest! {
    #[test]
    fn prop_metric_round_trip_within_one_pixel(
        px in -5000i32..5000,
        py in -5000i32..5000,
        ox in -2000i32..2000,
        oy in -2000i32..2000,
        resolution in 0.001f64..1.0,
    ) {
        let p = PixelPoint::new(px, py);
        let origin = PixelPoint::new(ox, oy);
        let back = metric_to_pixel(pixel_to_metric(p, origin, resolution), origin, resolution);
        prop_assert!((back.x - p.x).abs() <= 1);
        prop_assert!((back.y - p.y).abs() <= 1);
    }
}
