use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use proptest::prelude::*;
use wayedit_editor::{MapFrame, PixelPoint, WaypointCollection};

fn pixels(c: &WaypointCollection) -> Vec<PixelPoint> {
    c.iter().map(|w| w.pixel()).collect()
}

fn numbers(c: &WaypointCollection) -> Vec<u32> {
    c.iter().map(|w| w.number()).collect()
}

fn four() -> WaypointCollection {
    let mut c = WaypointCollection::new();
    for i in 1..=4 {
        c.add(PixelPoint::new(i * 100, i), 0.0);
    }
    c
}

#[test]
fn test_reorder_moves_payload_backward() {
    let mut c = four();
    assert!(c.reorder(4, 2));
    assert_eq!(numbers(&c), [1, 2, 3, 4]);
    assert_eq!(
        pixels(&c),
        [
            PixelPoint::new(100, 1),
            PixelPoint::new(400, 4),
            PixelPoint::new(200, 2),
            PixelPoint::new(300, 3),
        ]
    );
}

#[test]
fn test_reorder_moves_payload_forward() {
    let mut c = four();
    assert!(c.reorder(1, 3));
    assert_eq!(
        pixels(&c),
        [
            PixelPoint::new(200, 2),
            PixelPoint::new(300, 3),
            PixelPoint::new(100, 1),
            PixelPoint::new(400, 4),
        ]
    );
}

#[test]
fn test_reorder_noops() {
    let mut c = four();
    assert!(!c.reorder(2, 2));
    assert!(!c.reorder(9, 1));
    assert!(!c.reorder(1, 9));
    assert_eq!(pixels(&c), pixels(&four()));
}

#[test]
fn test_degrees_truncate() {
    let mut c = WaypointCollection::new();
    assert_eq!(c.add(PixelPoint::new(0, 0), FRAC_PI_2).degrees(), 90);
    assert_eq!(c.add(PixelPoint::new(0, 0), -FRAC_PI_4).degrees(), -45);
    // No wraparound normalization.
    assert_eq!(c.add(PixelPoint::new(0, 0), 10.0).degrees(), 572);
}

#[test]
fn test_display_name_after_origin() {
    let mut c = WaypointCollection::new();
    c.add(PixelPoint::new(40, 20), FRAC_PI_2);
    c.recompute_all(MapFrame::new(PixelPoint::new(20, 60), 0.05));
    let w = c.get(1).unwrap();
    assert_eq!(w.display_name(), "#01 (1.00, 2.00) 90°");
    assert_eq!(w.name(), "Waypoint 1");
}

#[test]
fn test_remove_all_resets_counter() {
    let mut c = four();
    c.remove_all();
    assert!(c.is_empty());
    assert_eq!(c.counter(), 0);
    assert_eq!(c.add(PixelPoint::new(1, 1), 0.0).number(), 1);
}

#[derive(Debug, Clone)]
enum Op {
    Add,
    Remove(u32),
    Reorder(u32, u32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Add),
        (1u32..8).prop_map(Op::Remove),
        (1u32..8, 1u32..8).prop_map(|(a, b)| Op::Reorder(a, b)),
    ]
}

proptest! {
    #[test]
    fn prop_numbers_stay_dense(ops in prop::collection::vec(op(), 0..40)) {
        let mut c = WaypointCollection::new();
        for (i, op) in ops.into_iter().enumerate() {
            match op {
                Op::Add => {
                    c.add(PixelPoint::new(i as i32, 0), 0.0);
                }
                Op::Remove(n) => {
                    c.remove(n);
                }
                Op::Reorder(a, b) => {
                    c.reorder(a, b);
                }
            }
            let expected: Vec<u32> = (1..=c.len() as u32).collect();
            prop_assert_eq!(numbers(&c), expected);
        }
    }
}
