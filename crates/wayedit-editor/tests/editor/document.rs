use std::cell::RefCell;
use std::f64::consts::FRAC_PI_2;
use std::rc::Rc;

use image::{GrayImage, Luma};
use wayedit_editor::{
    DisplayPoint, DocumentEvent, InteractionState, LayerKind, MapDocument, Modifiers,
    PixelPoint, PlacementPhase, PointerButton, Tool, ToolMode,
};

fn document(width: u32, height: u32) -> MapDocument {
    let mut doc = MapDocument::new();
    doc.set_base_map(GrayImage::from_pixel(width, height, Luma([205])))
        .unwrap();
    doc
}

fn click(doc: &mut MapDocument, x: f64, y: f64) {
    doc.pointer_press(DisplayPoint::new(x, y), PointerButton::Primary, Modifiers::NONE);
    doc.pointer_release(DisplayPoint::new(x, y));
}

fn recorder(doc: &mut MapDocument) -> Rc<RefCell<Vec<DocumentEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    doc.subscribe(move |event: &DocumentEvent| sink.borrow_mut().push(event.clone()));
    log
}

#[test]
fn test_selecting_active_tool_returns_to_idle() {
    let mut doc = document(50, 50);
    doc.select_tool(Some(Tool::Pen));
    assert_eq!(doc.mode(), ToolMode::Pen);
    doc.select_tool(Some(Tool::Pen));
    assert_eq!(doc.mode(), ToolMode::Idle);

    doc.select_tool(Some(Tool::Eraser));
    doc.select_tool(Some(Tool::Waypoint));
    assert_eq!(doc.mode(), ToolMode::PlaceWaypoint);
    doc.select_tool(None);
    assert_eq!(doc.mode(), ToolMode::Idle);
    assert_eq!(Tool::from_id(0), None);
}

#[test]
fn test_waypoint_placement_sets_heading() {
    let mut doc = document(200, 200);
    doc.select_tool(Some(Tool::Waypoint));

    doc.pointer_press(DisplayPoint::new(50.0, 50.0), PointerButton::Primary, Modifiers::NONE);
    let w = doc.waypoints().get(1).unwrap();
    assert_eq!(w.pixel(), PixelPoint::new(50, 50));
    assert_eq!(w.angle(), 0.0);

    doc.pointer_move(DisplayPoint::new(50.0, 40.0));
    assert!((doc.waypoints().get(1).unwrap().angle() - FRAC_PI_2).abs() < 1e-12);

    doc.pointer_release(DisplayPoint::new(50.0, 40.0));
    assert_eq!(
        *doc.state(),
        InteractionState::PlacingWaypoint(PlacementPhase::AwaitingClick)
    );
    assert_eq!(doc.waypoints().get(1).unwrap().degrees(), 90);

    click(&mut doc, 80.0, 80.0);
    assert_eq!(doc.waypoints().len(), 2);
    assert_eq!(doc.waypoints().get(2).unwrap().number(), 2);
}

#[test]
fn test_pointer_positions_follow_scale() {
    let mut doc = document(200, 200);
    assert!(doc.set_scale_factor(0.5));
    doc.select_tool(Some(Tool::Waypoint));
    click(&mut doc, 25.0, 10.0);
    assert_eq!(doc.waypoints().get(1).unwrap().pixel(), PixelPoint::new(50, 20));
    assert_eq!(doc.display_size(), Some((100, 100)));
}

#[test]
fn test_secondary_button_is_ignored() {
    let mut doc = document(200, 200);
    doc.select_tool(Some(Tool::Waypoint));
    doc.pointer_press(DisplayPoint::new(10.0, 10.0), PointerButton::Secondary, Modifiers::NONE);
    assert!(doc.waypoints().is_empty());
}

#[test]
fn test_edit_mode_moves_and_rotates() {
    let mut doc = document(200, 200);
    doc.add_waypoint(PixelPoint::new(100, 100), 0.0);

    doc.double_click(DisplayPoint::new(105.0, 95.0));
    assert_eq!(doc.mode(), ToolMode::EditWaypoint(1));

    doc.pointer_press(DisplayPoint::new(120.0, 130.0), PointerButton::Primary, Modifiers::NONE);
    assert_eq!(doc.waypoints().get(1).unwrap().pixel(), PixelPoint::new(120, 130));
    doc.pointer_move(DisplayPoint::new(125.0, 135.0));
    doc.pointer_release(DisplayPoint::new(125.0, 135.0));
    assert_eq!(doc.waypoints().get(1).unwrap().pixel(), PixelPoint::new(125, 135));

    doc.pointer_press(DisplayPoint::new(125.0, 135.0), PointerButton::Primary, Modifiers::SHIFT);
    doc.pointer_move(DisplayPoint::new(125.0, 125.0));
    doc.pointer_release(DisplayPoint::new(125.0, 125.0));
    let w = doc.waypoints().get(1).unwrap();
    assert_eq!(w.pixel(), PixelPoint::new(125, 135));
    assert!((w.angle() - FRAC_PI_2).abs() < 1e-12);

    doc.double_click(DisplayPoint::new(0.0, 0.0));
    assert_eq!(doc.mode(), ToolMode::Idle);
}

#[test]
fn test_double_click_misses_and_ignored_while_drawing() {
    let mut doc = document(200, 200);
    doc.add_waypoint(PixelPoint::new(100, 100), 0.0);

    // Hit box is strict: 15 pixels away is outside.
    doc.double_click(DisplayPoint::new(115.0, 100.0));
    assert_eq!(doc.mode(), ToolMode::Idle);

    doc.select_tool(Some(Tool::Pen));
    doc.double_click(DisplayPoint::new(100.0, 100.0));
    assert_eq!(doc.mode(), ToolMode::Pen);
}

#[test]
fn test_selecting_tool_leaves_edit_mode() {
    let mut doc = document(200, 200);
    doc.add_waypoint(PixelPoint::new(100, 100), 0.0);
    doc.double_click(DisplayPoint::new(100.0, 100.0));
    doc.select_tool(Some(Tool::Eraser));
    assert_eq!(doc.mode(), ToolMode::Eraser);
    assert_eq!(doc.state().editing(), None);
}

#[test]
fn test_removing_waypoints_updates_edit_target() {
    let mut doc = document(200, 200);
    doc.add_waypoint(PixelPoint::new(20, 20), 0.0);
    doc.add_waypoint(PixelPoint::new(100, 100), 0.0);
    doc.add_waypoint(PixelPoint::new(180, 180), 0.0);

    doc.double_click(DisplayPoint::new(100.0, 100.0));
    assert_eq!(doc.mode(), ToolMode::EditWaypoint(2));
    assert!(doc.remove_waypoint(1));
    assert_eq!(doc.mode(), ToolMode::EditWaypoint(1));
    assert_eq!(doc.waypoints().get(1).unwrap().pixel(), PixelPoint::new(100, 100));

    assert!(doc.remove_waypoint(1));
    assert_eq!(doc.mode(), ToolMode::Idle);
    assert!(!doc.remove_waypoint(7));
    assert_eq!(doc.waypoints().len(), 1);
}

#[test]
fn test_renumbered_edit_target_announces_mode() {
    let mut doc = document(200, 200);
    doc.add_waypoint(PixelPoint::new(20, 20), 0.0);
    doc.add_waypoint(PixelPoint::new(100, 100), 0.0);
    doc.double_click(DisplayPoint::new(100.0, 100.0));

    let log = recorder(&mut doc);
    assert!(doc.remove_waypoint(1));
    assert_eq!(doc.mode(), ToolMode::EditWaypoint(1));
    assert_eq!(
        log.borrow().first(),
        Some(&DocumentEvent::ModeChanged(ToolMode::EditWaypoint(1)))
    );
}

#[test]
fn test_handlers_are_noops_without_map() {
    let mut doc = MapDocument::new();
    doc.add_waypoint(PixelPoint::new(10, 10), 0.0);
    doc.select_tool(Some(Tool::Waypoint));
    click(&mut doc, 10.0, 10.0);
    assert_eq!(doc.waypoints().len(), 1);

    doc.select_tool(None);
    doc.double_click(DisplayPoint::new(10.0, 10.0));
    assert_eq!(doc.mode(), ToolMode::Idle);
    assert!(doc.cursor_readout(DisplayPoint::new(10.0, 10.0)).is_none());
    assert!(doc.render().is_none());
    assert!(!doc.is_modified());
}

#[test]
fn test_events_reach_listeners() {
    let mut doc = document(100, 100);
    let log = recorder(&mut doc);

    doc.select_tool(Some(Tool::Waypoint));
    click(&mut doc, 10.0, 10.0);
    doc.set_origin(PixelPoint::new(0, 100), 0.05);
    doc.remove_all_waypoints();

    let events = log.borrow();
    assert_eq!(events[0], DocumentEvent::ModeChanged(ToolMode::PlaceWaypoint));
    assert!(matches!(events[1], DocumentEvent::WaypointAdded(ref w) if w.number() == 1));
    assert!(events
        .iter()
        .any(|e| *e == DocumentEvent::OriginChanged(PixelPoint::new(0, 100))));
    assert_eq!(events.last(), Some(&DocumentEvent::WaypointsCleared));
}

#[test]
fn test_unsubscribed_listener_hears_nothing() {
    let mut doc = document(100, 100);
    let log = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&log);
    let handle = doc.subscribe(move |_: &DocumentEvent| *sink.borrow_mut() += 1);
    assert!(doc.unsubscribe(handle));
    doc.add_waypoint(PixelPoint::new(1, 1), 0.0);
    assert_eq!(*log.borrow(), 0);
}

#[test]
fn test_edit_entry_posts_status_message() {
    let mut doc = document(200, 200);
    doc.add_waypoint(PixelPoint::new(100, 100), 0.0);
    let log = recorder(&mut doc);
    doc.double_click(DisplayPoint::new(100.0, 100.0));
    assert!(log
        .borrow()
        .iter()
        .any(|e| matches!(e, DocumentEvent::StatusMessage { text, .. } if text.contains("waypoint 1"))));
}

#[test]
fn test_cursor_readout_needs_origin() {
    let mut doc = document(200, 200);
    assert!(doc.cursor_readout(DisplayPoint::new(40.0, 160.0)).is_none());

    doc.set_origin(PixelPoint::new(20, 180), 0.05);
    let readout = doc.cursor_readout(DisplayPoint::new(40.0, 160.0)).unwrap();
    assert_eq!(readout.pixel, PixelPoint::new(40, 160));
    assert!((readout.metric.x - 1.0).abs() < 1e-9);
    assert!((readout.metric.y - 1.0).abs() < 1e-9);
    assert_eq!(readout.to_string(), "Pixel: (40, 160)  Metric: (1.00, 1.00)");
}

#[test]
fn test_zoom_stays_in_range() {
    let mut doc = document(10, 10);
    assert!(doc.zoom_in());
    assert!((doc.scale_factor() - 1.2).abs() < 1e-12);
    assert!(!doc.set_scale_factor(5.0));
    assert!(!doc.set_scale_factor(0.0));

    while doc.zoom_in() {}
    assert!(doc.scale_factor() <= 2.0);
    while doc.zoom_out() {}
    assert!(doc.scale_factor() >= 0.02);
    assert!(doc.zoom_reset());
    assert_eq!(doc.scale_factor(), 1.0);
}

#[test]
fn test_path_layer_follows_waypoints() {
    let mut doc = document(200, 200);
    doc.add_waypoint(PixelPoint::new(20, 100), 0.0);
    doc.add_waypoint(PixelPoint::new(180, 100), 0.0);

    let alpha = |doc: &MapDocument| {
        doc.layers()
            .get(LayerKind::Path)
            .raster()
            .unwrap()
            .pixel(100, 100)
            .unwrap()
            .alpha()
    };
    assert_eq!(alpha(&doc), 0);

    doc.set_path_enabled(true);
    assert!(alpha(&doc) > 0);

    doc.remove_waypoint(2);
    assert_eq!(alpha(&doc), 0);
}

#[test]
fn test_render_caches_until_change() {
    let mut doc = document(40, 30);
    let size = doc.render().map(|p| (p.width(), p.height()));
    assert_eq!(size, Some((40, 30)));

    doc.set_scale_factor(0.5);
    let size = doc.render().map(|p| (p.width(), p.height()));
    assert_eq!(size, Some((20, 15)));

    assert!(doc.set_layer_visible(LayerKind::Origin, false));
    assert!(!doc.set_layer_visible(LayerKind::Origin, false));
}

#[test]
fn test_pen_marks_document_modified() {
    let mut doc = document(50, 50);
    assert!(!doc.is_modified());
    doc.select_tool(Some(Tool::Pen));
    click(&mut doc, 25.0, 25.0);
    assert!(doc.is_modified());
    assert!(doc.display_name().ends_with('*'));
}
