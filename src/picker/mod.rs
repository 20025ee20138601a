//! Pointer ↔ color-coordinate mapping for the picker widget.
//!
//! The SV area maps x to saturation and y to value. Raw pointer input has y
//! growing downward; value grows upward, so the vertical axis is inverted.
//! The hue strip follows the same convention: hue grows upward, matching
//! the rows of the hue ramp buffer.

use glam::Vec2;

use crate::color::{hsv_to_rgb, Hsv, Rgb};

/// Axis-aligned widget rectangle in window pixels (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PickerRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PickerRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= self.x
            && pos.x <= self.x + self.width
            && pos.y >= self.y
            && pos.y <= self.y + self.height
    }

    /// Pointer position in the rectangle's local frame, clamped to its bounds.
    fn local_clamped(&self, pos: Vec2) -> Vec2 {
        (pos - self.min()).clamp(Vec2::ZERO, self.size())
    }
}

/// Map a pointer position to `(saturation, value)` in `[0, 1]²`.
pub fn position_to_sv(pos: Vec2, rect: &PickerRect) -> (f32, f32) {
    let local = rect.local_clamped(pos);
    let s = local.x / rect.width;
    let v = (rect.height - local.y) / rect.height;
    (s, v)
}

/// Inverse of [`position_to_sv`] for `(s, v)` already in `[0, 1]²`.
pub fn sv_to_position(s: f32, v: f32, rect: &PickerRect) -> Vec2 {
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);
    Vec2::new(
        rect.x + s * rect.width,
        rect.y + (rect.height - v * rect.height),
    )
}

/// Map a pointer position on the vertical hue strip to a hue in `[0, 1]`.
pub fn position_to_hue(pos: Vec2, rect: &PickerRect) -> f32 {
    let local = rect.local_clamped(pos);
    (rect.height - local.y) / rect.height
}

/// Slider handle position for `hue`, centered horizontally on the strip.
pub fn hue_to_position(hue: f32, rect: &PickerRect) -> Vec2 {
    let hue = hue.clamp(0.0, 1.0);
    Vec2::new(
        rect.x + rect.width * 0.5,
        rect.y + (rect.height - hue * rect.height),
    )
}

/// The SV area together with its marker. The marker and `(s, v)` are two
/// views of the same point and are only ever updated together. `(s, v)` is
/// stored as given, so reading it back never goes through screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickerGeometry {
    rect: PickerRect,
    marker: Vec2,
    sv: (f32, f32),
}

impl PickerGeometry {
    pub fn new(rect: PickerRect) -> Self {
        let hsv = Hsv::default();
        let mut geometry = Self {
            rect,
            marker: rect.min(),
            sv: (0.0, 0.0),
        };
        geometry.place(hsv.s, hsv.v);
        geometry
    }

    pub fn rect(&self) -> &PickerRect {
        &self.rect
    }

    pub fn marker(&self) -> Vec2 {
        self.marker
    }

    pub fn sv(&self) -> (f32, f32) {
        self.sv
    }

    /// Move the marker under the pointer (clamped) and return the new `(s, v)`.
    ///
    /// Drags and clicks both land here; the phase never changes the mapping.
    pub fn track_pointer(&mut self, pos: Vec2) -> (f32, f32) {
        self.marker = self.rect.min() + self.rect.local_clamped(pos);
        self.sv = position_to_sv(pos, &self.rect);
        self.sv
    }

    /// Reposition the marker for an externally supplied color.
    pub fn place(&mut self, s: f32, v: f32) {
        self.sv = (s.clamp(0.0, 1.0), v.clamp(0.0, 1.0));
        self.marker = sv_to_position(s, v, &self.rect);
    }

    /// Gray that stays visible over the square: dark near the top, light
    /// near the bottom.
    pub fn marker_tint(&self) -> Rgb {
        let (_, v) = self.sv;
        hsv_to_rgb(Hsv::new(0.0, 0.0, 1.0 - v))
    }
}

/// Which part of the picker a pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerRegion {
    SaturationValue,
    HueStrip,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PickerLayout {
    pub sv_area: PickerRect,
    pub hue_strip: PickerRect,
}

impl PickerLayout {
    pub fn hit(&self, pos: Vec2) -> Option<PickerRegion> {
        if self.sv_area.contains(pos) {
            Some(PickerRegion::SaturationValue)
        } else if self.hue_strip.contains(pos) {
            Some(PickerRegion::HueStrip)
        } else {
            None
        }
    }
}
