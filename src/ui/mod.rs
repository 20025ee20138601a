//! Presentation state for the picker surface.
//!
//! The host has no renderer, so the panel keeps just what a renderer would
//! need (visibility, marker, swatch color) and a one-line status for the
//! window title.

use glam::Vec2;

use crate::color::{Hsv, Rgb};
use crate::scene::SceneState;
use crate::session::{PickerView, SessionObserver};
use crate::targeting::ObjectId;

pub struct PickerPanel {
    visible: bool,
    selected: Option<ObjectId>,
    hsv: Hsv,
    rgb: Rgb,
    marker: Vec2,
    marker_tint: Rgb,
    hue_marker: Vec2,
    updates: u64,
}

impl PickerPanel {
    pub fn new() -> Self {
        Self {
            visible: false,
            selected: None,
            hsv: Hsv::default(),
            rgb: Rgb::WHITE,
            marker: Vec2::ZERO,
            marker_tint: Rgb::BLACK,
            hue_marker: Vec2::ZERO,
            updates: 0,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    pub fn rgb(&self) -> Rgb {
        self.rgb
    }

    pub fn marker(&self) -> Vec2 {
        self.marker
    }

    pub fn marker_tint(&self) -> Rgb {
        self.marker_tint
    }

    pub fn hue_marker(&self) -> Vec2 {
        self.hue_marker
    }

    pub fn updates(&self) -> u64 {
        self.updates
    }

    pub fn summary(&self, scene: &SceneState) -> String {
        if !self.visible {
            return "Aiming (tap a wall to paint it)".to_string();
        }
        let name = self
            .selected
            .and_then(|id| scene.object(id))
            .map(|object| object.name.as_str())
            .unwrap_or("?");
        format!(
            "Editing {} #{} (H {:.0} S {:.0}% V {:.0}%)",
            name,
            self.rgb.to_hex(),
            self.hsv.h * 360.0,
            self.hsv.s * 100.0,
            self.hsv.v * 100.0
        )
    }
}

impl Default for PickerPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionObserver for PickerPanel {
    fn on_object_selected(&mut self, object: ObjectId) {
        self.visible = true;
        self.selected = Some(object);
    }

    fn on_picker_updated(&mut self, view: PickerView<'_>) {
        self.hsv = view.hsv;
        self.rgb = view.rgb;
        self.marker = view.marker;
        self.marker_tint = view.marker_tint;
        self.hue_marker = view.hue_marker;
        self.updates += 1;
    }

    fn on_session_closed(&mut self) {
        self.visible = false;
        self.selected = None;
    }
}
