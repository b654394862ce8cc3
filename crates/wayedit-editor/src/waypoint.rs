//! Waypoints and the ordered collection that numbers them.
//!
//! Numbers are dense: after any structural change the waypoints are numbered
//! `1..=N` in collection order and the next waypoint gets `N + 1`. The
//! collection owns the map frame, so metric coordinates are recomputed on every
//! position change once an origin is known and stay `(0, 0)` before that.

use wayedit_core::{MetricPoint, PixelPoint};

use crate::transform::MapFrame;

/// A numbered pose on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    number: u32,
    pixel: PixelPoint,
    angle: f64,
    metric: MetricPoint,
}

impl Waypoint {
    fn new(number: u32, pixel: PixelPoint, angle: f64) -> Self {
        Self {
            number,
            pixel,
            angle,
            metric: MetricPoint::default(),
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn pixel(&self) -> PixelPoint {
        self.pixel
    }

    /// Heading in radians, counter-clockwise from +x.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn metric(&self) -> MetricPoint {
        self.metric
    }

    /// Heading in degrees (unbounded, not normalized).
    pub fn angle_degrees(&self) -> f64 {
        self.angle.to_degrees()
    }

    /// Heading in whole degrees, truncated toward zero.
    pub fn degrees(&self) -> i32 {
        self.angle_degrees() as i32
    }

    pub fn name(&self) -> String {
        format!("Waypoint {}", self.number)
    }

    /// List label, e.g. `#01 (1.00, -2.50) 90°`.
    pub fn display_name(&self) -> String {
        format!(
            "#{:02} ({:.2}, {:.2}) {}°",
            self.number,
            self.metric.x,
            self.metric.y,
            self.degrees()
        )
    }

    pub fn set_angle(&mut self, angle: f64) {
        self.angle = angle;
    }

    /// Moves the waypoint; the caller recomputes the metric position.
    pub fn set_position(&mut self, pixel: PixelPoint) {
        self.pixel = pixel;
    }

    pub fn update_metric(&mut self, frame: &MapFrame) {
        self.metric = frame.to_metric(self.pixel);
    }
}

/// Ordered, densely numbered waypoints.
#[derive(Debug, Clone, Default)]
pub struct WaypointCollection {
    waypoints: Vec<Waypoint>,
    counter: u32,
    frame: Option<MapFrame>,
}

impl WaypointCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Number the next added waypoint will receive, minus one.
    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn frame(&self) -> Option<MapFrame> {
        self.frame
    }

    pub fn iter(&self) -> impl Iterator<Item = &Waypoint> {
        self.waypoints.iter()
    }

    pub fn as_slice(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn get(&self, number: u32) -> Option<&Waypoint> {
        self.waypoints.iter().find(|w| w.number == number)
    }

    fn get_mut(&mut self, number: u32) -> Option<&mut Waypoint> {
        self.waypoints.iter_mut().find(|w| w.number == number)
    }

    fn index_of(&self, number: u32) -> Option<usize> {
        self.waypoints.iter().position(|w| w.number == number)
    }

    /// Appends a waypoint and returns a copy of it.
    pub fn add(&mut self, pixel: PixelPoint, angle: f64) -> Waypoint {
        self.counter += 1;
        let mut waypoint = Waypoint::new(self.counter, pixel, angle);
        if let Some(frame) = &self.frame {
            waypoint.update_metric(frame);
        }
        self.waypoints.push(waypoint.clone());
        waypoint
    }

    /// Removes a waypoint and renumbers the rest. Unknown numbers are a no-op.
    pub fn remove(&mut self, number: u32) -> Option<Waypoint> {
        let index = self.index_of(number)?;
        let removed = self.waypoints.remove(index);
        self.renumber();
        Some(removed)
    }

    pub fn remove_all(&mut self) {
        self.waypoints.clear();
        self.counter = 0;
    }

    /// Moves `source` to the slot `target` occupied before the move.
    ///
    /// With `[1,2,3,4]`, `reorder(4, 2)` yields `[1,4,2,3]` renumbered to
    /// `[1,2,3,4]`. Returns false when nothing moves (unknown numbers or
    /// `source == target`).
    pub fn reorder(&mut self, source: u32, target: u32) -> bool {
        let (Some(from), Some(to)) = (self.index_of(source), self.index_of(target)) else {
            return false;
        };
        if from == to {
            return false;
        }
        let moved = self.waypoints.remove(from);
        self.waypoints.insert(to, moved);
        self.renumber();
        true
    }

    /// Replaces the collection with freshly numbered waypoints.
    pub fn replace_all(&mut self, poses: impl IntoIterator<Item = (PixelPoint, f64)>) {
        self.remove_all();
        for (pixel, angle) in poses {
            self.add(pixel, angle);
        }
    }

    /// Stores the map frame and recomputes every metric position.
    pub fn recompute_all(&mut self, frame: MapFrame) {
        self.frame = Some(frame);
        for waypoint in &mut self.waypoints {
            waypoint.update_metric(&frame);
        }
    }

    pub fn set_position(&mut self, number: u32, pixel: PixelPoint) -> Option<&Waypoint> {
        let frame = self.frame;
        let waypoint = self.get_mut(number)?;
        waypoint.set_position(pixel);
        if let Some(frame) = &frame {
            waypoint.update_metric(frame);
        }
        Some(waypoint)
    }

    pub fn set_angle(&mut self, number: u32, angle: f64) -> Option<&Waypoint> {
        let waypoint = self.get_mut(number)?;
        waypoint.set_angle(angle);
        Some(waypoint)
    }

    /// First waypoint whose pixel lies within the square hit box around `pixel`.
    pub fn hit_test(&self, pixel: PixelPoint, radius: i32) -> Option<u32> {
        self.waypoints
            .iter()
            .find(|w| w.pixel.within_box(&pixel, radius))
            .map(|w| w.number)
    }

    fn renumber(&mut self) {
        for (i, waypoint) in self.waypoints.iter_mut().enumerate() {
            waypoint.number = i as u32 + 1;
        }
        self.counter = self.waypoints.len() as u32;
    }
}

impl<'a> IntoIterator for &'a WaypointCollection {
    type Item = &'a Waypoint;
    type IntoIter = std::slice::Iter<'a, Waypoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.waypoints.iter()
    }
}
