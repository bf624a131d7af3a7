//! Pixel value types.
//!
//! A [`PixelBuffer`](crate::buffer::PixelBuffer) is generic over any type
//! implementing [`Pixel`]: an opaque `Copy` value with an additive identity,
//! componentwise addition, scalar multiply, linear interpolation and
//! equality. The concrete instances used by the engine are
//! `glam::Vec3` (float RGB), [`Argb`] (packed `0xAARRGGBB`), `glam::Vec2`,
//! `glam::IVec2` and `i32`.

use std::fmt;
use std::ops::Add;

use glam::{IVec2, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::RasterError;

/// Luma weights (Rec. 601) applied to RGB channels.
const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;

/// A value that can live in a [`PixelBuffer`](crate::buffer::PixelBuffer).
pub trait Pixel: Copy + PartialEq + fmt::Debug + Add<Output = Self> + Send + Sync + 'static {
    /// The additive identity. Out-of-range reads in `Extend::Single` mode return this.
    fn zero() -> Self;

    /// Scalar multiply.
    fn scaled(self, factor: f32) -> Self;

    /// Componentwise multiply, used to tint splat stamps.
    fn modulate(self, other: Self) -> Self;

    /// Linear interpolation. `a.mix(b, 0.0)` must return `a` unchanged.
    fn mix(self, other: Self, t: f32) -> Self;

    /// Brightness of the value.
    fn luma(&self) -> f32;

    /// Opacity in [0, 1]. Types without an alpha channel are fully opaque.
    fn opacity(&self) -> f32 {
        1.0
    }

    /// Euclidean distance between two values.
    fn distance_to(&self, other: &Self) -> f32;
}

/// A pixel that can round-trip through an 8-bit RGBA image.
pub trait RgbaPixel: Pixel {
    fn from_rgba8(rgba: [u8; 4]) -> Self;
    fn to_rgba8(&self) -> [u8; 4];
}

fn luma_rgb(r: f32, g: f32, b: f32) -> f32 {
    LUMA_R * r + LUMA_G * g + LUMA_B * b
}

impl Pixel for Vec3 {
    fn zero() -> Self {
        Vec3::ZERO
    }

    fn scaled(self, factor: f32) -> Self {
        self * factor
    }

    fn modulate(self, other: Self) -> Self {
        self * other
    }

    fn mix(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn luma(&self) -> f32 {
        luma_rgb(self.x, self.y, self.z)
    }

    fn distance_to(&self, other: &Self) -> f32 {
        Vec3::distance(*self, *other)
    }
}

impl RgbaPixel for Vec3 {
    fn from_rgba8(rgba: [u8; 4]) -> Self {
        Vec3::new(
            rgba[0] as f32 / 255.0,
            rgba[1] as f32 / 255.0,
            rgba[2] as f32 / 255.0,
        )
    }

    fn to_rgba8(&self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.x), q(self.y), q(self.z), 255]
    }
}

impl Pixel for Vec2 {
    fn zero() -> Self {
        Vec2::ZERO
    }

    fn scaled(self, factor: f32) -> Self {
        self * factor
    }

    fn modulate(self, other: Self) -> Self {
        self * other
    }

    fn mix(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }

    /// Vector magnitude.
    fn luma(&self) -> f32 {
        self.length()
    }

    fn distance_to(&self, other: &Self) -> f32 {
        Vec2::distance(*self, *other)
    }
}

impl Pixel for IVec2 {
    fn zero() -> Self {
        IVec2::ZERO
    }

    fn scaled(self, factor: f32) -> Self {
        (self.as_vec2() * factor).round().as_ivec2()
    }

    fn modulate(self, other: Self) -> Self {
        self * other
    }

    fn mix(self, other: Self, t: f32) -> Self {
        if t == 0.0 {
            return self;
        }
        let a = self.as_vec2();
        (a + (other.as_vec2() - a) * t).round().as_ivec2()
    }

    fn luma(&self) -> f32 {
        self.as_vec2().length()
    }

    fn distance_to(&self, other: &Self) -> f32 {
        self.as_vec2().distance(other.as_vec2())
    }
}

impl Pixel for i32 {
    fn zero() -> Self {
        0
    }

    fn scaled(self, factor: f32) -> Self {
        (self as f32 * factor).round() as i32
    }

    fn modulate(self, other: Self) -> Self {
        self.wrapping_mul(other)
    }

    fn mix(self, other: Self, t: f32) -> Self {
        if t == 0.0 {
            return self;
        }
        let a = self as f32;
        (a + (other as f32 - a) * t).round() as i32
    }

    fn luma(&self) -> f32 {
        *self as f32
    }

    fn distance_to(&self, other: &Self) -> f32 {
        (*self as f32 - *other as f32).abs()
    }
}

/// Packed 32-bit color, `0xAARRGGBB`.
///
/// Addition saturates per channel, so splatting onto a bright area clips at
/// white instead of wrapping into another hue.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Argb(pub u32);

impl Argb {
    pub const TRANSPARENT: Argb = Argb(0);
    pub const BLACK: Argb = Argb(0xFF00_0000);
    pub const WHITE: Argb = Argb(0xFFFF_FFFF);

    /// Packs four channels.
    pub const fn from_channels(a: u8, r: u8, g: u8, b: u8) -> Self {
        Argb(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    /// Unpacks to `[a, r, g, b]`.
    pub const fn channels(self) -> [u8; 4] {
        [
            (self.0 >> 24) as u8,
            (self.0 >> 16) as u8,
            (self.0 >> 8) as u8,
            self.0 as u8,
        ]
    }

    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    fn map2(self, other: Argb, f: impl Fn(u8, u8) -> u8) -> Argb {
        let [a0, r0, g0, b0] = self.channels();
        let [a1, r1, g1, b1] = other.channels();
        Argb::from_channels(f(a0, a1), f(r0, r1), f(g0, g1), f(b0, b1))
    }

    fn map(self, f: impl Fn(u8) -> u8) -> Argb {
        let [a, r, g, b] = self.channels();
        Argb::from_channels(f(a), f(r), f(g), f(b))
    }
}

impl fmt::Debug for Argb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Argb(#{:08x})", self.0)
    }
}

impl Add for Argb {
    type Output = Argb;

    fn add(self, rhs: Argb) -> Argb {
        self.map2(rhs, u8::saturating_add)
    }
}

impl Pixel for Argb {
    fn zero() -> Self {
        Argb::TRANSPARENT
    }

    fn scaled(self, factor: f32) -> Self {
        self.map(|c| (c as f32 * factor).round().clamp(0.0, 255.0) as u8)
    }

    fn modulate(self, other: Self) -> Self {
        self.map2(other, |a, b| ((a as u16 * b as u16 + 127) / 255) as u8)
    }

    fn mix(self, other: Self, t: f32) -> Self {
        if t == 0.0 {
            return self;
        }
        self.map2(other, |a, b| {
            let a = a as f32;
            (a + (b as f32 - a) * t).round().clamp(0.0, 255.0) as u8
        })
    }

    fn luma(&self) -> f32 {
        luma_rgb(self.r() as f32, self.g() as f32, self.b() as f32) / 255.0
    }

    fn opacity(&self) -> f32 {
        self.a() as f32 / 255.0
    }

    fn distance_to(&self, other: &Self) -> f32 {
        let d = |a: u8, b: u8| (a as f32 - b as f32) / 255.0;
        let (dr, dg, db) = (
            d(self.r(), other.r()),
            d(self.g(), other.g()),
            d(self.b(), other.b()),
        );
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

impl RgbaPixel for Argb {
    fn from_rgba8(rgba: [u8; 4]) -> Self {
        Argb::from_channels(rgba[3], rgba[0], rgba[1], rgba[2])
    }

    fn to_rgba8(&self) -> [u8; 4] {
        [self.r(), self.g(), self.b(), self.a()]
    }
}

/// Parses `#rrggbb` (opaque) or `#aarrggbb` into `[r, g, b, a]`.
///
/// The leading `#` is optional and digits are case-insensitive.
pub fn parse_hex(hex: &str) -> Result<[u8; 4], RasterError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if !digits.is_ascii() {
        return Err(RasterError::InvalidColor(format!("'{hex}': not a hex color")));
    }
    let byte = |s: &str| {
        u8::from_str_radix(s, 16)
            .map_err(|e| RasterError::InvalidColor(format!("'{hex}': {e}")))
    };
    match digits.len() {
        6 => Ok([byte(&digits[0..2])?, byte(&digits[2..4])?, byte(&digits[4..6])?, 255]),
        8 => Ok([
            byte(&digits[2..4])?,
            byte(&digits[4..6])?,
            byte(&digits[6..8])?,
            byte(&digits[0..2])?,
        ]),
        n => Err(RasterError::InvalidColor(format!(
            "'{hex}': expected 6 or 8 hex digits, got {n}"
        ))),
    }
}
