//! Named raster layers and their fixed paint order.

use std::fmt;

use tiny_skia::Pixmap;

/// Identity of each layer, in paint order (first is bottom-most).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    BaseMap,
    Drawing,
    Path,
    Waypoints,
    Origin,
}

impl LayerKind {
    /// All layers, bottom to top.
    pub const PAINT_ORDER: [LayerKind; 5] = [
        LayerKind::BaseMap,
        LayerKind::Drawing,
        LayerKind::Path,
        LayerKind::Waypoints,
        LayerKind::Origin,
    ];

    /// Stable name used to bind layer controls.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BaseMap => "PGM Layer",
            Self::Drawing => "Drawing Layer",
            Self::Path => "Path Layer",
            Self::Waypoints => "Waypoint Layer",
            Self::Origin => "Origin Layer",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::PAINT_ORDER.into_iter().find(|k| k.name() == name)
    }

    fn index(&self) -> usize {
        match self {
            Self::BaseMap => 0,
            Self::Drawing => 1,
            Self::Path => 2,
            Self::Waypoints => 3,
            Self::Origin => 4,
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A raster plus its visibility and opacity.
#[derive(Debug, Clone)]
pub struct Layer {
    kind: LayerKind,
    visible: bool,
    opacity: f32,
    raster: Option<Pixmap>,
}

impl Layer {
    pub fn new(kind: LayerKind) -> Self {
        Self {
            kind,
            visible: true,
            opacity: 1.0,
            raster: None,
        }
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn raster(&self) -> Option<&Pixmap> {
        self.raster.as_ref()
    }

    pub fn raster_mut(&mut self) -> Option<&mut Pixmap> {
        self.raster.as_mut()
    }

    pub fn set_raster(&mut self, raster: Option<Pixmap>) {
        self.raster = raster;
    }

    /// Returns true when the visibility changed.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        let changed = self.visible != visible;
        self.visible = visible;
        changed
    }

    /// Sets opacity clamped to `[0, 1]`; NaN is ignored.
    ///
    /// Returns true when the stored opacity changed.
    pub fn set_opacity(&mut self, opacity: f32) -> bool {
        if opacity.is_nan() {
            return false;
        }
        let clamped = opacity.clamp(0.0, 1.0);
        let changed = self.opacity != clamped;
        self.opacity = clamped;
        changed
    }

    /// True when the layer contributes to a composite.
    pub fn is_paintable(&self) -> bool {
        self.visible && self.opacity > 0.0 && self.raster.is_some()
    }
}

/// The five layers of a map document in paint order.
#[derive(Debug, Clone)]
pub struct LayerStack {
    layers: [Layer; 5],
}

impl Default for LayerStack {
    fn default() -> Self {
        Self {
            layers: LayerKind::PAINT_ORDER.map(Layer::new),
        }
    }
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: LayerKind) -> &Layer {
        &self.layers[kind.index()]
    }

    pub fn get_mut(&mut self, kind: LayerKind) -> &mut Layer {
        &mut self.layers[kind.index()]
    }

    pub fn by_name(&self, name: &str) -> Option<&Layer> {
        LayerKind::from_name(name).map(|k| self.get(k))
    }

    /// Layers bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    /// Replaces every derived layer with a transparent raster of the given size.
    pub fn reset_derived(&mut self, width: u32, height: u32) {
        for layer in self.layers.iter_mut().skip(1) {
            layer.raster = Pixmap::new(width, height);
        }
    }
}
