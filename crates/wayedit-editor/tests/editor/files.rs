use std::fs;
use std::path::Path;

use image::{GrayImage, Luma};
use tempfile::TempDir;
use wayedit_core::{Error, MapError, WaypointFileError};
use wayedit_editor::pgm::{load_pgm, save_pgm};
use wayedit_editor::{
    DisplayPoint, ImportOutcome, MapDocument, Modifiers, PixelPoint, PointerButton, Tool,
};

fn write_map(dir: &Path, width: u32, height: u32, origin: &str) {
    let image = GrayImage::from_pixel(width, height, Luma([205]));
    save_pgm(dir.join("map.pgm"), &image).unwrap();
    fs::write(
        dir.join("map.yaml"),
        format!(
            "image: map.pgm\nresolution: 0.05\norigin: {}\nnegate: 0\noccupied_thresh: 0.65\nfree_thresh: 0.196\n",
            origin
        ),
    )
    .unwrap();
}

#[test]
fn test_pgm_round_trip_4x3() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("small.pgm");
    let data: Vec<u8> = (0..12).map(|i| i * 20).collect();
    let image = GrayImage::from_raw(4, 3, data.clone()).unwrap();

    save_pgm(&path, &image).unwrap();
    let back = load_pgm(&path).unwrap();
    assert_eq!(back.dimensions(), (4, 3));
    assert_eq!(back.as_raw(), &data);
}

#[test]
fn test_sidecar_sets_origin_pixel() {
    let dir = TempDir::new().unwrap();
    write_map(dir.path(), 80, 100, "[-1.0, -2.0, 0.0]");

    let mut doc = MapDocument::new();
    doc.load_sidecar(dir.path().join("map.yaml")).unwrap();
    assert_eq!(doc.map_size(), Some((80, 100)));
    assert_eq!(doc.origin(), Some(PixelPoint::new(20, 60)));
    assert_eq!(doc.metadata().and_then(|m| m.occupied_thresh), Some(0.65));
    assert!(doc.display_name().starts_with("map.pgm"));
}

#[test]
fn test_sidecar_with_missing_image_still_sets_origin() {
    let dir = TempDir::new().unwrap();
    let yaml = dir.path().join("map.yaml");
    fs::write(&yaml, "image: gone.pgm\norigin: [-1.0, -2.0, 0.0]\n").unwrap();

    let mut doc = MapDocument::new();
    doc.load_sidecar(&yaml).unwrap();
    assert!(!doc.has_map());
    // No height to flip against.
    assert_eq!(doc.origin(), Some(PixelPoint::new(20, 40)));
}

#[test]
fn test_malformed_files_leave_document_unchanged() {
    let dir = TempDir::new().unwrap();
    write_map(dir.path(), 80, 100, "[-1.0, -2.0, 0.0]");
    let mut doc = MapDocument::new();
    doc.load_sidecar(dir.path().join("map.yaml")).unwrap();

    let bad_yaml = dir.path().join("bad.yaml");
    fs::write(&bad_yaml, "resolution: 0.1\n").unwrap();
    assert!(doc.load_sidecar(&bad_yaml).is_err());

    let bad_pgm = dir.path().join("bad.pgm");
    fs::write(&bad_pgm, b"P2\n1 1\n255\n0").unwrap();
    let err = doc.load_map(&bad_pgm).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::Map(MapError::InvalidMagic { .. }))
    ));

    let broken_ref = dir.path().join("broken.yaml");
    fs::write(&broken_ref, "image: bad.pgm\norigin: [5.0, 5.0]\n").unwrap();
    assert!(doc.load_sidecar(&broken_ref).is_err());

    assert_eq!(doc.map_size(), Some((80, 100)));
    assert_eq!(doc.origin(), Some(PixelPoint::new(20, 60)));
}

#[test]
fn test_new_map_keeps_waypoints() {
    let dir = TempDir::new().unwrap();
    write_map(dir.path(), 80, 100, "[-1.0, -2.0, 0.0]");
    let mut doc = MapDocument::new();
    doc.load_sidecar(dir.path().join("map.yaml")).unwrap();
    doc.add_waypoint(PixelPoint::new(40, 20), 0.0);

    doc.load_map(dir.path().join("map.pgm")).unwrap();
    assert_eq!(doc.waypoints().len(), 1);
    assert_eq!(doc.waypoints().get(1).unwrap().pixel(), PixelPoint::new(40, 20));
}

#[test]
fn test_export_import_round_trip() {
    let mut doc = MapDocument::new();
    doc.set_base_map(GrayImage::from_pixel(200, 200, Luma([205])))
        .unwrap();
    doc.set_origin(PixelPoint::new(20, 180), 0.05);
    doc.add_waypoint(PixelPoint::new(40, 160), 0.5);
    doc.add_waypoint(PixelPoint::new(120, 30), -2.0);
    let text = doc.export_waypoints_string().unwrap();
    assert!(text.contains("format_version: '1.0'"));
    assert!(text.contains("angle_radians"));

    let mut other = MapDocument::new();
    other
        .set_base_map(GrayImage::from_pixel(200, 200, Luma([205])))
        .unwrap();
    other.set_origin(PixelPoint::new(20, 180), 0.05);
    other.add_waypoint(PixelPoint::new(1, 1), 0.0);

    let outcome = other.import_waypoints_str(&text, |_| true).unwrap();
    let ImportOutcome::Imported(report) = outcome else {
        panic!("import declined");
    };
    assert_eq!(report.imported, 2);
    assert!(report.skipped.is_empty());
    assert_eq!(other.waypoints().len(), 2);

    for (a, b) in doc.waypoints().iter().zip(other.waypoints().iter()) {
        assert_eq!(a.number(), b.number());
        assert!((a.pixel().x - b.pixel().x).abs() <= 1);
        assert!((a.pixel().y - b.pixel().y).abs() <= 1);
        assert!((a.angle() - b.angle()).abs() < 1e-9);
    }
}

#[test]
fn test_export_respects_custom_format() {
    let mut doc = MapDocument::new();
    doc.set_base_map(GrayImage::from_pixel(50, 50, Luma([205])))
        .unwrap();
    doc.set_origin(PixelPoint::new(0, 50), 0.1);
    doc.add_waypoint(PixelPoint::new(25, 25), 0.0);
    let format = wayedit_core::FormatDescriptor::from_yaml_str(
        "version: '2.0'\nformat:\n  name: str\n  x: int\n  heading: float\n",
    )
    .unwrap();
    doc.set_format(format);

    let text = doc.export_waypoints_string().unwrap();
    assert!(text.contains("format_version: '2.0'"));
    assert!(text.contains("name: Waypoint 1"));
    assert!(text.contains("x: 2\n"));
    assert!(!text.contains("heading"));
    assert!(!text.contains("angle_degrees"));

    doc.reset_format();
    assert_eq!(doc.format().version, "1.0");
}

#[test]
fn test_declined_version_mismatch_changes_nothing() {
    let mut doc = MapDocument::new();
    doc.set_base_map(GrayImage::from_pixel(50, 50, Luma([205])))
        .unwrap();
    doc.set_origin(PixelPoint::new(0, 50), 0.1);
    doc.add_waypoint(PixelPoint::new(5, 5), 0.0);

    let text = "format_version: '0.9'\nwaypoints:\n- {x: 1.0, y: 1.0, angle_degrees: 0}\n";
    let mut asked = false;
    let outcome = doc
        .import_waypoints_str(text, |m| {
            asked = true;
            assert_eq!(m.file_version, "0.9");
            false
        })
        .unwrap();
    assert!(asked);
    assert!(matches!(outcome, ImportOutcome::Declined(_)));
    assert_eq!(doc.waypoints().len(), 1);
    assert_eq!(doc.waypoints().get(1).unwrap().pixel(), PixelPoint::new(5, 5));
}

#[test]
fn test_import_requires_origin() {
    let mut doc = MapDocument::new();
    let err = doc
        .import_waypoints_str("waypoints: []\n", |_| true)
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::Waypoint(WaypointFileError::OriginNotSet))
    ));
}

#[test]
fn test_import_from_file_reports_skips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wps.yaml");
    fs::write(
        &path,
        "waypoints:\n- {x: 0.5, y: 0.5, angle_degrees: 45}\n- {x: 0.5}\n",
    )
    .unwrap();

    let mut doc = MapDocument::new();
    doc.set_base_map(GrayImage::from_pixel(50, 50, Luma([205])))
        .unwrap();
    doc.set_origin(PixelPoint::new(0, 50), 0.1);
    let outcome = doc.import_waypoints(&path, |_| true).unwrap();
    let ImportOutcome::Imported(report) = outcome else {
        panic!("import declined");
    };
    assert_eq!(report.imported, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].index, 1);
    assert_eq!(doc.waypoints().get(1).unwrap().degrees(), 45);
}

#[test]
fn test_import_skips_coordinates_beyond_pixel_range() {
    let text = "waypoints:\n- {x: 1.0e9, y: 0, angle_degrees: 0}\n- {x: 1.0, y: 1.0, angle_degrees: 90}\n";
    let mut doc = MapDocument::new();
    doc.set_base_map(GrayImage::from_pixel(60, 40, Luma([205])))
        .unwrap();
    doc.set_origin(PixelPoint::new(-100, 150), 0.05);

    let ImportOutcome::Imported(report) = doc.import_waypoints_str(text, |_| true).unwrap() else {
        panic!("import declined");
    };
    assert_eq!(report.imported, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].index, 0);
    assert_eq!(report.skipped[0].reason, "coordinate out of range");
    assert_eq!(doc.waypoints().get(1).unwrap().pixel(), PixelPoint::new(-80, 130));
}

#[test]
fn test_render_with_far_off_waypoints() {
    let text = "waypoints:\n- {x: 1.0e9, y: 0, angle_degrees: 0}\n";
    let mut doc = MapDocument::new();
    doc.set_base_map(GrayImage::from_pixel(60, 40, Luma([205])))
        .unwrap();
    doc.set_origin(PixelPoint::new(20, 30), 0.05);
    doc.import_waypoints_str(text, |_| true).unwrap();
    assert!(doc.render().is_some());

    doc.set_path_enabled(true);
    doc.add_waypoint(PixelPoint::new(i32::MAX - 1, i32::MIN + 1), 0.0);
    doc.add_waypoint(PixelPoint::new(i32::MIN + 1, i32::MAX - 1), 3.0);
    doc.double_click(DisplayPoint::new(-10.0, 10.0));
    let frame = doc.render().unwrap();
    assert_eq!((frame.width(), frame.height()), (60, 40));
    assert_eq!(doc.waypoints().len(), 2);
}

#[test]
fn test_export_pgm_contains_only_map_and_drawing() {
    let dir = TempDir::new().unwrap();
    let mut doc = MapDocument::new();
    doc.set_base_map(GrayImage::from_pixel(60, 60, Luma([205])))
        .unwrap();
    doc.set_origin(PixelPoint::new(10, 50), 0.05);
    doc.set_path_enabled(true);
    doc.add_waypoint(PixelPoint::new(45, 45), 0.0);
    doc.add_waypoint(PixelPoint::new(45, 10), 0.0);

    doc.set_pen_size(6);
    doc.select_tool(Some(Tool::Pen));
    doc.pointer_press(DisplayPoint::new(10.0, 20.0), PointerButton::Primary, Modifiers::NONE);
    doc.pointer_move(DisplayPoint::new(30.0, 20.0));
    doc.pointer_release(DisplayPoint::new(30.0, 20.0));
    assert!(doc.is_modified());

    let out = dir.path().join("edited.pgm");
    doc.export_pgm(&out).unwrap();
    assert!(!doc.is_modified());

    let image = load_pgm(&out).unwrap();
    assert_eq!(image.get_pixel(20, 20).0, [0]);
    assert_eq!(image.get_pixel(45, 45).0, [205]);
    assert_eq!(image.get_pixel(10, 50).0, [205]);
    assert_eq!(image.get_pixel(45, 30).0, [205]);
}
