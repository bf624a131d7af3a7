//! Additive stamp compositing.
//!
//! A splat places a small stamp raster onto a larger buffer at a logical
//! center, radius and rotation, and adds the stamp's (optionally tinted)
//! values into every covered destination pixel. There is no blending: the
//! result is pure addition, so repeated splats accumulate.

use glam::{I64Vec2, Vec2};

use crate::buffer::PixelBuffer;
use crate::pixel::Pixel;

/// 16.16 fixed point.
const FIXED_SHIFT: u32 = 16;
const FIXED_ONE: f64 = (1u64 << FIXED_SHIFT) as f64;

/// Destination box and stamp-space mapping shared by both splat paths.
struct SplatFrame {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
    center: Vec2,
    stamp_half: Vec2,
    /// Stamp-space step for one destination pixel along x.
    du: Vec2,
    /// Stamp-space step for one destination pixel along y.
    dv: Vec2,
}

impl SplatFrame {
    fn new<T: Pixel>(
        dest: &PixelBuffer<T>,
        center: Vec2,
        radius: f32,
        rotation_degrees: f32,
        stamp: &PixelBuffer<T>,
    ) -> Option<Self> {
        if stamp.is_empty() || dest.is_empty() || !(radius > 0.0) {
            return None;
        }
        let c = dest.logical_to_pixel(center);
        let r = radius * dest.space().pixels_per_unit().x;
        if !(r > 0.0) || !c.is_finite() {
            return None;
        }
        let max = dest.space().float_max;
        let lo = (c - Vec2::splat(r)).floor().max(Vec2::ZERO);
        let hi = (c + Vec2::splat(r)).ceil().min(max);
        if lo.x > hi.x || lo.y > hi.y {
            return None;
        }

        let stamp_dim = Vec2::new(stamp.width() as f32, stamp.height() as f32);
        let scale = stamp_dim / (2.0 * r);
        let (sin, cos) = (-rotation_degrees).to_radians().sin_cos();
        Some(Self {
            x0: lo.x as usize,
            y0: lo.y as usize,
            x1: hi.x as usize,
            y1: hi.y as usize,
            center: c,
            stamp_half: stamp_dim * 0.5,
            du: Vec2::new(cos, sin) * scale,
            dv: Vec2::new(-sin, cos) * scale,
        })
    }

    fn stamp_coord(&self, x: usize, y: usize) -> Vec2 {
        let d = Vec2::new(x as f32, y as f32) - self.center;
        self.stamp_half + self.du * d.x + self.dv * d.y
    }
}

fn to_fixed(v: Vec2) -> I64Vec2 {
    I64Vec2::new(
        (v.x as f64 * FIXED_ONE).round() as i64,
        (v.y as f64 * FIXED_ONE).round() as i64,
    )
}

impl<T: Pixel> PixelBuffer<T> {
    /// Adds `stamp` (multiplied by `tint` if given) onto this buffer.
    ///
    /// `center` is a logical coordinate and `radius` is in logical units;
    /// `rotation_degrees` turns the stamp clockwise on screen. The scan steps
    /// the stamp-space position incrementally in 16.16 fixed point. An empty
    /// stamp or a non-positive radius leaves the buffer untouched.
    pub fn splat(
        &mut self,
        center: Vec2,
        radius: f32,
        rotation_degrees: f32,
        tint: Option<T>,
        stamp: &PixelBuffer<T>,
    ) {
        let Some(frame) = SplatFrame::new(self, center, radius, rotation_degrees, stamp) else {
            return;
        };
        let (sw, sh) = (stamp.width() as i64, stamp.height() as i64);
        let du = to_fixed(frame.du);
        let dv = to_fixed(frame.dv);
        let mut row_start = to_fixed(frame.stamp_coord(frame.x0, frame.y0));
        let width = self.width();

        for y in frame.y0..=frame.y1 {
            let mut s = row_start;
            let row = y * width;
            for x in frame.x0..=frame.x1 {
                let sx = s.x >> FIXED_SHIFT;
                let sy = s.y >> FIXED_SHIFT;
                if (0..sw).contains(&sx) && (0..sh).contains(&sy) {
                    let v = stamp.data()[(sy * sw + sx) as usize];
                    let v = tint.map_or(v, |t| v.modulate(t));
                    let dst = &mut self.data_mut()[row + x];
                    *dst = *dst + v;
                }
                s += du;
            }
            row_start += dv;
        }
    }

    /// Floating-point reference for [`PixelBuffer::splat`]: transforms every
    /// destination pixel independently instead of stepping.
    pub fn splat_exact(
        &mut self,
        center: Vec2,
        radius: f32,
        rotation_degrees: f32,
        tint: Option<T>,
        stamp: &PixelBuffer<T>,
    ) {
        let Some(frame) = SplatFrame::new(self, center, radius, rotation_degrees, stamp) else {
            return;
        };
        let (sw, sh) = (stamp.width() as i32, stamp.height() as i32);
        let width = self.width();
        for y in frame.y0..=frame.y1 {
            for x in frame.x0..=frame.x1 {
                let s = frame.stamp_coord(x, y).floor().as_ivec2();
                if (0..sw).contains(&s.x) && (0..sh).contains(&s.y) {
                    let v = stamp.data()[(s.y * sw + s.x) as usize];
                    let v = tint.map_or(v, |t| v.modulate(t));
                    let dst = &mut self.data_mut()[y * width + x];
                    *dst = *dst + v;
                }
            }
        }
    }
}
