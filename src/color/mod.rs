//! HSV color model.
//!
//! HSV is the canonical representation while editing; RGB is derived for
//! display and for writing onto materials. All components are `f32` in
//! the 0.0–1.0 range.

pub mod raster;

pub use raster::{GradientBuffer, GradientKind, GradientRaster, RasterError};

/// RGB color with components in the 0.0–1.0 range.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// HSV color. `h` is circular and kept in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

impl Rgb {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        [to_u8(self.r), to_u8(self.g), to_u8(self.b), 255]
    }

    /// Format as uppercase hex (no `#` prefix).
    pub fn to_hex(self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("{:02X}{:02X}{:02X}", r, g, b)
    }

    /// Parse a hex string with or without `#`, 3 or 6 digits.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let stripped = hex.trim_start_matches('#');
        if !stripped.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        let (r, g, b) = match stripped.len() {
            3 => (
                channel(&stripped[0..1])? * 17,
                channel(&stripped[1..2])? * 17,
                channel(&stripped[2..3])? * 17,
            ),
            6 => (
                channel(&stripped[0..2])?,
                channel(&stripped[2..4])?,
                channel(&stripped[4..6])?,
            ),
            _ => return None,
        };
        Some(Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
        ))
    }
}

fn to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

impl Hsv {
    pub const fn new(h: f32, s: f32, v: f32) -> Self {
        Self { h, s, v }
    }
}

impl Default for Hsv {
    fn default() -> Self {
        // The picker opens on white with the hue ramp at red.
        Self::new(0.0, 0.0, 1.0)
    }
}

/// HSV → RGB.
pub fn hsv_to_rgb(hsv: Hsv) -> Rgb {
    let Hsv { h, s, v } = hsv;
    if s <= 0.0 {
        return Rgb::new(v, v, v);
    }
    let h6 = h.rem_euclid(1.0) * 6.0;
    let sector = h6.floor();
    let f = h6 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match sector as u32 % 6 {
        0 => Rgb::new(v, t, p),
        1 => Rgb::new(q, v, p),
        2 => Rgb::new(p, v, t),
        3 => Rgb::new(p, q, v),
        4 => Rgb::new(t, p, v),
        _ => Rgb::new(v, p, q),
    }
}

/// RGB → HSV.
///
/// Achromatic input (r == g == b) has no hue of its own; `previous_hue` is
/// returned in that case so the hue ramp does not jump when a gray is loaded.
pub fn rgb_to_hsv(rgb: Rgb, previous_hue: f32) -> Hsv {
    let Rgb { r, g, b } = rgb;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let v = max;
    let s = if max <= 0.0 { 0.0 } else { delta / max };

    let h = if delta <= 0.0 {
        previous_hue
    } else if max == r {
        ((g - b) / delta).rem_euclid(6.0) / 6.0
    } else if max == g {
        ((b - r) / delta + 2.0) / 6.0
    } else {
        ((r - g) / delta + 4.0) / 6.0
    };

    Hsv::new(wrap_hue(h), s.clamp(0.0, 1.0), v.clamp(0.0, 1.0))
}

fn wrap_hue(h: f32) -> f32 {
    let wrapped = h.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs.
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

/// Which gradient buffers need regenerating after a model change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dirty {
    pub saturation_value: bool,
    pub output: bool,
}

impl Dirty {
    pub fn any(self) -> bool {
        self.saturation_value || self.output
    }
}

/// Current editing color plus the set of buffers it has invalidated.
#[derive(Debug, Clone, Default)]
pub struct ColorModel {
    hsv: Hsv,
    dirty: Dirty,
}

impl ColorModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hsv(&self) -> Hsv {
        self.hsv
    }

    pub fn rgb(&self) -> Rgb {
        hsv_to_rgb(self.hsv)
    }

    pub fn dirty(&self) -> Dirty {
        self.dirty
    }

    /// Return and clear the pending dirty flags.
    pub fn take_dirty(&mut self) -> Dirty {
        std::mem::take(&mut self.dirty)
    }

    /// Set the hue. Invalidates the SV square and the output swatch.
    pub fn set_hue(&mut self, h: f32) {
        if !h.is_finite() {
            return;
        }
        self.hsv.h = wrap_hue(h);
        self.dirty.saturation_value = true;
        self.dirty.output = true;
    }

    /// Set saturation and value. Invalidates only the output swatch.
    pub fn set_sv(&mut self, s: f32, v: f32) {
        if !s.is_finite() || !v.is_finite() {
            return;
        }
        self.hsv.s = s.clamp(0.0, 1.0);
        self.hsv.v = v.clamp(0.0, 1.0);
        self.dirty.output = true;
    }

    /// Replace the whole color from an object's RGB, keeping the hue for grays.
    pub fn load_rgb(&mut self, rgb: Rgb) {
        if !(rgb.r.is_finite() && rgb.g.is_finite() && rgb.b.is_finite()) {
            return;
        }
        let clamped = Rgb::new(
            rgb.r.clamp(0.0, 1.0),
            rgb.g.clamp(0.0, 1.0),
            rgb.b.clamp(0.0, 1.0),
        );
        self.hsv = rgb_to_hsv(clamped, self.hsv.h);
        self.dirty.saturation_value = true;
        self.dirty.output = true;
    }
}
