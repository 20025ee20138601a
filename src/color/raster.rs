//! Gradient rasters behind the picker widget.
//!
//! Three small buffers are kept: the universal hue ramp, the
//! saturation/value square for the current hue, and the output swatch.
//! Buffers are always regenerated in full from the model; nothing patches
//! individual pixels, so a buffer can never be partially stale.

use std::path::Path;

use super::{hsv_to_rgb, ColorModel, Dirty, Hsv, Rgb};
use crate::config::{check_resolution, ConfigError};

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed writing gradient image: {0}")]
    Image(#[from] image::ImageError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientKind {
    Hue,
    SaturationValue,
    Output,
}

impl GradientKind {
    fn file_stem(self) -> &'static str {
        match self {
            Self::Hue => "hue",
            Self::SaturationValue => "saturation_value",
            Self::Output => "output",
        }
    }
}

/// Fixed-size grid of RGB samples. Pixel `(x, y)` has `y = 0` at the bottom.
#[derive(Debug, Clone)]
pub struct GradientBuffer {
    kind: GradientKind,
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl GradientBuffer {
    fn new(kind: GradientKind, width: u32, height: u32) -> Self {
        Self {
            kind,
            width,
            height,
            pixels: vec![Rgb::BLACK; width as usize * height as usize],
        }
    }

    pub fn kind(&self) -> GradientKind {
        self.kind
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }

    fn fill_with(&mut self, mut sample: impl FnMut(u32, u32) -> Rgb) {
        let width = self.width as usize;
        for (index, pixel) in self.pixels.iter_mut().enumerate() {
            *pixel = sample((index % width) as u32, (index / width) as u32);
        }
    }

    /// Convert to an RGBA8 image. Image row 0 is the top, so rows are flipped.
    pub fn to_rgba8(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, row| {
            let y = self.height - 1 - row;
            let rgb = self.pixels[y as usize * self.width as usize + x as usize];
            image::Rgba(rgb.to_rgba8())
        })
    }
}

/// Owner of the three picker buffers. Only this type mutates them.
#[derive(Debug, Clone)]
pub struct GradientRaster {
    hue: GradientBuffer,
    saturation_value: GradientBuffer,
    output: GradientBuffer,
}

impl GradientRaster {
    /// Build the buffers for a `1×hue_resolution` ramp/swatch and a
    /// `sv_resolution²` square, filled from `model`.
    pub fn new(
        hue_resolution: u32,
        sv_resolution: u32,
        model: &ColorModel,
    ) -> Result<Self, ConfigError> {
        check_resolution("hue_resolution", hue_resolution)?;
        check_resolution("sv_resolution", sv_resolution)?;

        let mut hue = GradientBuffer::new(GradientKind::Hue, 1, hue_resolution);
        let rows = hue_resolution as f32;
        hue.fill_with(|_, y| hsv_to_rgb(Hsv::new(y as f32 / rows, 1.0, 1.0)));

        let mut raster = Self {
            hue,
            saturation_value: GradientBuffer::new(
                GradientKind::SaturationValue,
                sv_resolution,
                sv_resolution,
            ),
            output: GradientBuffer::new(GradientKind::Output, 1, hue_resolution),
        };
        raster.regenerate_all(model);
        Ok(raster)
    }

    pub fn hue(&self) -> &GradientBuffer {
        &self.hue
    }

    pub fn saturation_value(&self) -> &GradientBuffer {
        &self.saturation_value
    }

    pub fn output(&self) -> &GradientBuffer {
        &self.output
    }

    /// Regenerate whatever the model has invalidated since the last sync.
    pub fn sync(&mut self, model: &mut ColorModel) -> Dirty {
        let dirty = model.take_dirty();
        let hsv = model.hsv();
        if dirty.saturation_value {
            self.regenerate_saturation_value(hsv.h);
        }
        if dirty.output {
            self.regenerate_output(hsv);
        }
        dirty
    }

    /// Regenerate every buffer that depends on the model. Safe to call redundantly.
    pub fn regenerate_all(&mut self, model: &ColorModel) {
        let hsv = model.hsv();
        self.regenerate_saturation_value(hsv.h);
        self.regenerate_output(hsv);
    }

    fn regenerate_saturation_value(&mut self, hue: f32) {
        let w = self.saturation_value.width as f32;
        let h = self.saturation_value.height as f32;
        self.saturation_value
            .fill_with(|x, y| hsv_to_rgb(Hsv::new(hue, x as f32 / w, y as f32 / h)));
    }

    fn regenerate_output(&mut self, hsv: Hsv) {
        let color = hsv_to_rgb(hsv);
        self.output.fill_with(|_, _| color);
    }

    /// Write `hue.png`, `saturation_value.png` and `output.png` into `dir`.
    pub fn save_pngs(&self, dir: &Path) -> Result<(), RasterError> {
        std::fs::create_dir_all(dir)?;
        for buffer in [&self.hue, &self.saturation_value, &self.output] {
            let path = dir.join(format!("{}.png", buffer.kind.file_stem()));
            buffer.to_rgba8().save_with_format(&path, image::ImageFormat::Png)?;
        }
        Ok(())
    }
}
