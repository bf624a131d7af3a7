//! Resampling a buffer through a displacement field.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::buffer::{Extend, PixelBuffer};
use crate::pixel::Pixel;

/// How [`PixelBuffer::warp`] reads its sources.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarpOptions {
    /// Displacement multiplier in relative mode.
    pub step: f32,
    /// Bilinear sampling of the source.
    pub smooth: bool,
    /// Field values are offsets from each pixel's own logical position,
    /// rather than absolute logical coordinates.
    pub relative: bool,
    pub extend: Extend,
}

impl Default for WarpOptions {
    fn default() -> Self {
        Self {
            step: 1.0,
            smooth: true,
            relative: true,
            extend: Extend::Repeat,
        }
    }
}

impl<T: Pixel> PixelBuffer<T> {
    /// Overwrites every pixel with `source` sampled through `field`.
    ///
    /// When the field is not the same size as this buffer it is bilinearly
    /// sampled at the proportional position.
    pub fn warp(&mut self, source: &PixelBuffer<T>, field: &PixelBuffer<Vec2>, options: WarpOptions) {
        if self.is_empty() || field.is_empty() {
            return;
        }
        let same_dims = field.dim() == self.dim();
        let to_field = field_ratio(self.space().float_max, field.space().float_max);
        let width = self.width();

        for y in 0..self.height() {
            for x in 0..width {
                let p = Vec2::new(x as f32, y as f32);
                let d = if same_dims {
                    field.data()[y * width + x]
                } else {
                    field.sample_pixel(p * to_field, true, Extend::Single)
                };
                let coord = if options.relative {
                    self.pixel_to_logical(p) + d * options.step
                } else {
                    d
                };
                self.data_mut()[y * width + x] = source.sample(coord, options.smooth, options.extend);
            }
        }
    }
}

/// Per-axis scale from this buffer's float pixel space to the field's.
fn field_ratio(own: Vec2, field: Vec2) -> Vec2 {
    let axis = |o: f32, f: f32| if o > 0.0 { f / o } else { 0.0 };
    Vec2::new(axis(own.x, field.x), axis(own.y, field.y))
}
