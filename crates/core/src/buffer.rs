//! Generic two-dimensional raster container.
//!
//! A [`PixelBuffer`] stores `width * height` values of any [`Pixel`] type in
//! row-major order, origin top-left, y increasing downward. Three coordinate
//! spaces describe it:
//!
//! - integer pixel space, `[0, dim)`, used by [`PixelBuffer::index`];
//! - float pixel space, `[0, dim - 1]`, where pixel centers sit on integers;
//! - a caller-assigned logical box ([`Bounds`]) used for resolution
//!   independent placement by [`PixelBuffer::sample`], splat and warp.
//!
//! All three live in one [`CoordSpace`] that is rebuilt as a whole whenever
//! the dimensions or the logical box change.

use glam::{DVec2, IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::RasterError;
use crate::pixel::Pixel;

/// Float pixel coordinates closer than this to an integer are treated as
/// lying exactly on it, so grid points survive the logical round trip.
const GRID_SNAP: f32 = 1e-4;

/// Units of `f32::EPSILON`, relative to the magnitudes involved, that the
/// snap tolerance grows by on large buffers.
const SNAP_ULPS: f32 = 4.0;

/// Out-of-range policy for [`PixelBuffer::index`] and [`PixelBuffer::sample`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extend {
    /// Outside the buffer reads as `T::zero()`.
    #[default]
    Single,
    /// The buffer tiles the plane.
    Repeat,
    /// The buffer tiles the plane, mirrored on every odd tile.
    Reflect,
}

/// An axis-aligned continuous rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Aspect-corrected box: the shorter axis spans [-1, 1].
    pub fn aspect(width: usize, height: usize) -> Self {
        if width == 0 || height == 0 {
            return Self::new(Vec2::splat(-1.0), Vec2::splat(1.0));
        }
        let (w, h) = (width as f32, height as f32);
        let half = if w >= h {
            Vec2::new(w / h, 1.0)
        } else {
            Vec2::new(1.0, h / w)
        };
        Self::new(-half, half)
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// An integer rectangle, `x..x + width` by `y..y + height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl IntRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Intersects with `[0, w) x [0, h)`, returning `(x0, y0, x1, y1)` as
    /// half-open usize ranges, or `None` if the overlap is empty.
    fn clip(&self, w: usize, h: usize) -> Option<(usize, usize, usize, usize)> {
        let x0 = (self.x as i64).max(0);
        let y0 = (self.y as i64).max(0);
        let x1 = (self.x as i64 + self.width as i64).min(w as i64);
        let y1 = (self.y as i64 + self.height as i64).min(h as i64);
        (x0 < x1 && y0 < y1).then(|| (x0 as usize, y0 as usize, x1 as usize, y1 as usize))
    }
}

/// The coordinate spaces of a buffer, derived together from its dimensions
/// and logical box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordSpace {
    /// Exclusive upper corner of integer pixel space.
    pub int_max: IVec2,
    /// Inclusive upper corner of float pixel space.
    pub float_max: Vec2,
    /// Logical box.
    pub logical: Bounds,
    to_pixel_scale: DVec2,
    to_logical_scale: DVec2,
    /// Largest logical magnitude on each axis, in pixels.
    reach: Vec2,
}

impl CoordSpace {
    fn new(width: usize, height: usize, logical: Bounds) -> Self {
        let float_max = Vec2::new(
            width.saturating_sub(1) as f32,
            height.saturating_sub(1) as f32,
        );
        let size = logical.max.as_dvec2() - logical.min.as_dvec2();
        let pixels = float_max.as_dvec2();
        let ratio = |a: f64, b: f64| if b != 0.0 { a / b } else { 0.0 };
        let to_pixel_scale = DVec2::new(ratio(pixels.x, size.x), ratio(pixels.y, size.y));
        let to_logical_scale = DVec2::new(ratio(size.x, pixels.x), ratio(size.y, pixels.y));
        let magnitude = logical.min.abs().max(logical.max.abs());
        Self {
            int_max: IVec2::new(width as i32, height as i32),
            float_max,
            logical,
            to_pixel_scale,
            to_logical_scale,
            reach: magnitude * to_pixel_scale.as_vec2(),
        }
    }

    /// Pixels per logical unit along each axis.
    pub fn pixels_per_unit(&self) -> Vec2 {
        self.to_pixel_scale.as_vec2()
    }

    /// Distance within which a float pixel coordinate `p` that came from a
    /// logical coordinate is taken to sit on the grid. Covers the f32
    /// rounding of the logical value, magnified by pixels per unit.
    fn snap_tolerance(&self, p: Vec2) -> Vec2 {
        (SNAP_ULPS * f32::EPSILON * (self.reach + p.abs())).max(Vec2::splat(GRID_SNAP))
    }
}

/// A 2D raster over an arbitrary pixel type.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer<T: Pixel> {
    width: usize,
    height: usize,
    data: Vec<T>,
    space: CoordSpace,
}

fn checked_len(width: usize, height: usize) -> Result<usize, RasterError> {
    let side_ok = width <= i32::MAX as usize && height <= i32::MAX as usize;
    width
        .checked_mul(height)
        .filter(|_| side_ok)
        .ok_or_else(|| RasterError::InvalidDimensions(format!("{width}x{height} overflows")))
}

impl<T: Pixel> PixelBuffer<T> {
    /// A 0x0 buffer.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Vec::new(),
            space: CoordSpace::new(0, 0, Bounds::aspect(0, 0)),
        }
    }

    /// Creates a zero-filled buffer.
    ///
    /// Returns `RasterError::InvalidDimensions` if `width * height`
    /// overflows or either side exceeds `i32::MAX`.
    pub fn new(width: usize, height: usize) -> Result<Self, RasterError> {
        Self::filled(width, height, T::zero())
    }

    /// Creates a buffer with every pixel set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> Result<Self, RasterError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![value; len],
            space: CoordSpace::new(width, height, Bounds::aspect(width, height)),
        })
    }

    /// Wraps a row-major vector, validating `data.len() == width * height`.
    pub fn from_data(width: usize, height: usize, data: Vec<T>) -> Result<Self, RasterError> {
        let expected = checked_len(width, height)?;
        if data.len() != expected {
            return Err(RasterError::DimensionMismatch {
                lhs_w: width,
                lhs_h: height,
                rhs_w: data.len(),
                rhs_h: 1,
            });
        }
        Ok(Self {
            width,
            height,
            data,
            space: CoordSpace::new(width, height, Bounds::aspect(width, height)),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`.
    pub fn dim(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn space(&self) -> &CoordSpace {
        &self.space
    }

    /// Integer pixel space as a rectangle at the origin.
    pub fn int_bounds(&self) -> IntRect {
        IntRect::new(0, 0, self.width as u32, self.height as u32)
    }

    /// Float pixel space, `[0, dim - 1]`.
    pub fn float_bounds(&self) -> Bounds {
        Bounds::new(Vec2::ZERO, self.space.float_max)
    }

    pub fn logical_bounds(&self) -> Bounds {
        self.space.logical
    }

    /// Assigns a new logical box and rebuilds the coordinate spaces.
    pub fn set_logical_bounds(&mut self, logical: Bounds) {
        self.space = CoordSpace::new(self.width, self.height, logical);
    }

    /// Changes the dimensions. Contents are discarded (zero-filled) and the
    /// logical box resets to the aspect-corrected default.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), RasterError> {
        let len = checked_len(width, height)?;
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.resize(len, T::zero());
        self.space = CoordSpace::new(width, height, Bounds::aspect(width, height));
        Ok(())
    }

    /// Copies pixel contents (not the logical box) from a same-sized buffer.
    pub fn copy_from(&mut self, other: &PixelBuffer<T>) -> Result<(), RasterError> {
        if self.dim() != other.dim() {
            return Err(RasterError::mismatch(self.dim(), other.dim()));
        }
        self.data.copy_from_slice(&other.data);
        Ok(())
    }

    /// Maps a logical coordinate into float pixel space.
    pub fn logical_to_pixel(&self, p: Vec2) -> Vec2 {
        ((p.as_dvec2() - self.space.logical.min.as_dvec2()) * self.space.to_pixel_scale).as_vec2()
    }

    /// Maps a float pixel coordinate into logical space.
    pub fn pixel_to_logical(&self, p: Vec2) -> Vec2 {
        (self.space.logical.min.as_dvec2() + p.as_dvec2() * self.space.to_logical_scale).as_vec2()
    }

    /// In-range read.
    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        (x < self.width && y < self.height).then(|| self.data[y * self.width + x])
    }

    /// In-range write. Returns false (and writes nothing) out of range.
    pub fn set(&mut self, x: usize, y: usize, value: T) -> bool {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = value;
            true
        } else {
            false
        }
    }

    /// Reads an integer coordinate with the given out-of-range policy.
    pub fn index(&self, coord: IVec2, extend: Extend) -> T {
        if self.data.is_empty() {
            return T::zero();
        }
        let (w, h) = (self.width as i32, self.height as i32);
        let (x, y) = match extend {
            Extend::Single => {
                if coord.x < 0 || coord.y < 0 || coord.x >= w || coord.y >= h {
                    return T::zero();
                }
                (coord.x, coord.y)
            }
            Extend::Repeat => (coord.x.rem_euclid(w), coord.y.rem_euclid(h)),
            Extend::Reflect => (reflect(coord.x, w), reflect(coord.y, h)),
        };
        self.data[y as usize * self.width + x as usize]
    }

    /// Samples at a logical coordinate.
    ///
    /// With `smooth`, bilinearly blends the four surrounding cells; otherwise
    /// returns the nearest cell. Sampling exactly on a grid point with
    /// `smooth` returns that cell unchanged.
    pub fn sample(&self, coord: Vec2, smooth: bool, extend: Extend) -> T {
        let p = self.logical_to_pixel(coord);
        let p = snap_to_grid(p, self.space.snap_tolerance(p));
        self.sample_snapped(p, smooth, extend)
    }

    /// Like [`PixelBuffer::sample`], but `p` is already in float pixel space.
    pub fn sample_pixel(&self, p: Vec2, smooth: bool, extend: Extend) -> T {
        let tolerance = (SNAP_ULPS * f32::EPSILON * p.abs()).max(Vec2::splat(GRID_SNAP));
        self.sample_snapped(snap_to_grid(p, tolerance), smooth, extend)
    }

    fn sample_snapped(&self, p: Vec2, smooth: bool, extend: Extend) -> T {
        if !smooth {
            let cell = (p + Vec2::splat(0.5)).floor();
            return self.index(cell.as_ivec2(), extend);
        }
        let base = p.floor();
        let frac = p - base;
        let i = base.as_ivec2();
        let c00 = self.index(i, extend);
        if frac == Vec2::ZERO {
            return c00;
        }
        let c10 = self.index(i + IVec2::X, extend);
        let c01 = self.index(i + IVec2::Y, extend);
        let c11 = self.index(i + IVec2::ONE, extend);
        let top = c00.mix(c10, frac.x);
        let bottom = c01.mix(c11, frac.x);
        top.mix(bottom, frac.y)
    }

    /// Fills the whole buffer, or only `region` clipped to the buffer.
    pub fn fill(&mut self, value: T, region: Option<IntRect>) {
        let Some(region) = region else {
            self.data.fill(value);
            return;
        };
        let Some((x0, y0, x1, y1)) = region.clip(self.width, self.height) else {
            return;
        };
        for row in self.data.chunks_exact_mut(self.width).take(y1).skip(y0) {
            row[x0..x1].fill(value);
        }
    }

    /// Minimum and maximum luma over the buffer, `None` when empty.
    pub fn luma_range(&self) -> Option<(f32, f32)> {
        self.data.iter().map(Pixel::luma).fold(None, |acc, l| match acc {
            None => Some((l, l)),
            Some((lo, hi)) => Some((lo.min(l), hi.max(l))),
        })
    }

    /// Iterates over all pixels yielding `(x, y, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        let w = self.width.max(1);
        self.data
            .iter()
            .enumerate()
            .map(move |(i, &v)| (i % w, i / w, v))
    }
}

impl<T: Pixel> Default for PixelBuffer<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Mirrored tiling: floor-divide into tiles and flip within odd tiles.
fn reflect(c: i32, size: i32) -> i32 {
    let tile = c.div_euclid(size);
    let r = c.rem_euclid(size);
    if tile % 2 != 0 {
        size - 1 - r
    } else {
        r
    }
}

fn snap_to_grid(p: Vec2, tolerance: Vec2) -> Vec2 {
    let r = p.round();
    Vec2::new(
        if (p.x - r.x).abs() < tolerance.x { r.x } else { p.x },
        if (p.y - r.y).abs() < tolerance.y { r.y } else { p.y },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn ramp(w: usize, h: usize) -> PixelBuffer<i32> {
        let data = (0..(w * h) as i32).collect();
        PixelBuffer::from_data(w, h, data).unwrap()
    }

    // -- Construction --

    #[test]
    fn new_creates_zero_filled_buffer() {
        let buf = PixelBuffer::<Vec3>::new(4, 3).unwrap();
        assert_eq!(buf.dim(), (4, 3));
        assert_eq!(buf.len(), 12);
        assert!(buf.data().iter().all(|&v| v == Vec3::ZERO));
    }

    #[test]
    fn zero_sized_buffers_are_legal_and_empty() {
        let buf = PixelBuffer::<i32>::new(0, 7).unwrap();
        assert!(buf.is_empty());
        assert_eq!(buf.index(IVec2::new(0, 0), Extend::Repeat), 0);
        assert_eq!(buf.luma_range(), None);
    }

    #[test]
    fn overflowing_dimensions_are_rejected() {
        let result = PixelBuffer::<i32>::new(usize::MAX, 2);
        assert!(matches!(result, Err(RasterError::InvalidDimensions(_))));
    }

    #[test]
    fn from_data_checks_length() {
        let result = PixelBuffer::from_data(3, 3, vec![0_i32; 8]);
        assert!(matches!(result, Err(RasterError::DimensionMismatch { .. })));
    }

    #[test]
    fn get_and_set_stay_in_range() {
        let mut buf = PixelBuffer::<i32>::new(2, 2).unwrap();
        assert!(buf.set(1, 1, 9));
        assert!(!buf.set(2, 0, 9));
        assert_eq!(buf.get(1, 1), Some(9));
        assert_eq!(buf.get(0, 2), None);
    }

    // -- Coordinate spaces --

    #[test]
    fn default_logical_box_is_aspect_corrected() {
        let wide = PixelBuffer::<i32>::new(200, 100).unwrap();
        assert_eq!(wide.logical_bounds(), Bounds::new(Vec2::new(-2.0, -1.0), Vec2::new(2.0, 1.0)));
        let tall = PixelBuffer::<i32>::new(50, 100).unwrap();
        assert_eq!(tall.logical_bounds(), Bounds::new(Vec2::new(-1.0, -2.0), Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn bounds_and_extend_serialize_as_json() {
        let bounds = Bounds::new(Vec2::new(-2.0, -1.0), Vec2::new(2.0, 1.0));
        let text = serde_json::to_string(&bounds).unwrap();
        assert_eq!(serde_json::from_str::<Bounds>(&text).unwrap(), bounds);
        assert_eq!(serde_json::to_string(&Extend::Reflect).unwrap(), "\"reflect\"");
    }

    #[test]
    fn logical_corners_map_to_float_pixel_corners() {
        let buf = PixelBuffer::<i32>::new(11, 11).unwrap();
        assert_eq!(buf.logical_to_pixel(Vec2::new(-1.0, -1.0)), Vec2::ZERO);
        assert_eq!(buf.logical_to_pixel(Vec2::new(1.0, 1.0)), Vec2::new(10.0, 10.0));
        assert_eq!(buf.pixel_to_logical(Vec2::new(5.0, 5.0)), Vec2::ZERO);
    }

    #[test]
    fn resize_rebuilds_every_space() {
        let mut buf = PixelBuffer::<i32>::new(4, 4).unwrap();
        buf.set_logical_bounds(Bounds::new(Vec2::ZERO, Vec2::ONE));
        buf.resize(9, 3).unwrap();
        assert_eq!(buf.int_bounds(), IntRect::new(0, 0, 9, 3));
        assert_eq!(buf.float_bounds().max, Vec2::new(8.0, 2.0));
        assert_eq!(buf.logical_bounds(), Bounds::aspect(9, 3));
        assert_eq!(buf.space().int_max, IVec2::new(9, 3));
        assert_eq!(buf.len(), 27);
    }

    #[test]
    fn set_logical_bounds_changes_mapping() {
        let mut buf = PixelBuffer::<i32>::new(5, 5).unwrap();
        buf.set_logical_bounds(Bounds::new(Vec2::ZERO, Vec2::splat(8.0)));
        assert_eq!(buf.logical_to_pixel(Vec2::splat(4.0)), Vec2::splat(2.0));
        assert_eq!(buf.space().pixels_per_unit(), Vec2::splat(0.5));
    }

    // -- index --

    #[test]
    fn single_extend_returns_zero_outside() {
        let buf = ramp(3, 3);
        assert_eq!(buf.index(IVec2::new(-1, 0), Extend::Single), 0);
        assert_eq!(buf.index(IVec2::new(0, 3), Extend::Single), 0);
        assert_eq!(buf.index(IVec2::new(2, 2), Extend::Single), 8);
    }

    #[test]
    fn repeat_extend_floors_negative_coordinates() {
        let buf = ramp(3, 2);
        // -1 floors into the previous tile: column 2.
        assert_eq!(buf.index(IVec2::new(-1, 0), Extend::Repeat), 2);
        assert_eq!(buf.index(IVec2::new(-4, -1), Extend::Repeat), 5);
    }

    #[test]
    fn reflect_extend_mirrors_odd_tiles() {
        let buf = ramp(4, 1);
        let row: Vec<i32> = (-4..8)
            .map(|x| buf.index(IVec2::new(x, 0), Extend::Reflect))
            .collect();
        assert_eq!(row, vec![3, 2, 1, 0, 0, 1, 2, 3, 3, 2, 1, 0]);
    }

    // -- sample --

    #[test]
    fn smooth_sample_between_cells_blends() {
        let mut buf = PixelBuffer::<Vec3>::new(2, 1).unwrap();
        buf.set(1, 0, Vec3::ONE);
        let mid = buf.pixel_to_logical(Vec2::new(0.5, 0.0));
        let v = buf.sample(mid, true, Extend::Single);
        assert!((v - Vec3::splat(0.5)).abs().max_element() < 1e-6, "got {v:?}");
    }

    #[test]
    fn grid_points_of_a_wide_buffer_sample_exactly() {
        let w = 4096;
        let data = (0..w).map(|i| Vec3::splat(i as f32)).collect();
        let mut buf = PixelBuffer::from_data(w, 1, data).unwrap();
        buf.set_logical_bounds(Bounds::new(Vec2::splat(-1.0), Vec2::splat(1.0)));
        let mismatches: Vec<usize> = (0..w)
            .filter(|&x| {
                let logical = buf.pixel_to_logical(Vec2::new(x as f32, 0.0));
                buf.sample(logical, true, Extend::Single) != buf.index(IVec2::new(x as i32, 0), Extend::Single)
            })
            .collect();
        assert!(mismatches.is_empty(), "{} mismatches, first {:?}", mismatches.len(), mismatches.first());
    }

    #[test]
    fn nearest_sample_rounds_to_closest_cell() {
        let buf = ramp(4, 1);
        assert_eq!(buf.sample_pixel(Vec2::new(1.4, 0.0), false, Extend::Single), 1);
        assert_eq!(buf.sample_pixel(Vec2::new(1.6, 0.0), false, Extend::Single), 2);
    }

    #[test]
    fn sample_floors_negative_pixel_coordinates() {
        let buf = ramp(4, 1);
        // -0.25 lies between column -1 (wraps to 3) and column 0.
        let v = buf.sample_pixel(Vec2::new(-0.25, 0.0), true, Extend::Repeat);
        assert_eq!(v, 3_i32.mix(0, 0.75));
    }

    // -- fill --

    #[test]
    fn fill_region_is_clipped() {
        let mut buf = PixelBuffer::<i32>::new(4, 4).unwrap();
        buf.fill(1, Some(IntRect::new(2, -1, 10, 2)));
        let ones: Vec<(usize, usize)> = buf
            .iter()
            .filter(|&(_, _, v)| v == 1)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert_eq!(ones, vec![(2, 0), (3, 0)]);
    }

    #[test]
    fn fill_region_outside_is_noop() {
        let mut buf = PixelBuffer::<i32>::new(3, 3).unwrap();
        buf.fill(5, Some(IntRect::new(5, 5, 2, 2)));
        assert!(buf.data().iter().all(|&v| v == 0));
        buf.fill(5, None);
        assert!(buf.data().iter().all(|&v| v == 5));
    }

    #[test]
    fn copy_from_requires_equal_dims() {
        let mut a = PixelBuffer::<i32>::new(2, 2).unwrap();
        let b = PixelBuffer::<i32>::filled(2, 2, 4).unwrap();
        a.copy_from(&b).unwrap();
        assert_eq!(a.data(), b.data());
        let c = PixelBuffer::<i32>::new(3, 2).unwrap();
        assert!(a.copy_from(&c).is_err());
    }

    #[test]
    fn luma_range_spans_values() {
        let buf = ramp(3, 2);
        assert_eq!(buf.luma_range(), Some((0.0, 5.0)));
    }

    // ---- Property-based tests ----

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn repeat_is_periodic(
                w in 1_usize..12,
                h in 1_usize..12,
                x in -50_i32..50,
                y in -50_i32..50,
                kx in -4_i32..4,
                ky in -4_i32..4,
            ) {
                let buf = ramp(w, h);
                let p = IVec2::new(x, y);
                let shifted = p + IVec2::new(kx * w as i32, ky * h as i32);
                prop_assert_eq!(buf.index(p, Extend::Repeat), buf.index(shifted, Extend::Repeat));
            }

            #[test]
            fn reflect_mirrors_across_tile_parity(
                w in 1_usize..12,
                x in -50_i32..50,
                k in -4_i32..4,
            ) {
                let buf = ramp(w, 1);
                let w = w as i32;
                let p = IVec2::new(x, 0);
                // Two tiles over is the same orientation.
                prop_assert_eq!(
                    buf.index(p, Extend::Reflect),
                    buf.index(p + IVec2::new(2 * k * w, 0), Extend::Reflect)
                );
                // Mirroring about the tile edge at 0 swaps x with -1 - x.
                prop_assert_eq!(
                    buf.index(p, Extend::Reflect),
                    buf.index(IVec2::new(-1 - x, 0), Extend::Reflect)
                );
            }

            #[test]
            fn smooth_sample_on_grid_equals_index(
                w in 2_usize..16,
                h in 2_usize..16,
                x in -20_i32..36,
                y in -20_i32..36,
                seed: u32,
            ) {
                let data = (0..w * h)
                    .map(|i| {
                        let v = (i as u32).wrapping_mul(2_654_435_761).wrapping_add(seed);
                        Vec3::new((v & 0xff) as f32, (v >> 8 & 0xff) as f32, (v >> 16 & 0xff) as f32)
                    })
                    .collect();
                let buf = PixelBuffer::from_data(w, h, data).unwrap();
                let p = IVec2::new(x, y);
                let logical = buf.pixel_to_logical(p.as_vec2());
                for extend in [Extend::Single, Extend::Repeat, Extend::Reflect] {
                    prop_assert_eq!(buf.sample(logical, true, extend), buf.index(p, extend));
                }
            }

            #[test]
            fn smooth_sample_on_grid_equals_index_on_wide_buffers(
                w in 1000_usize..6000,
                h in 2_usize..4,
                x in -64_i32..6064,
                y in -2_i32..6,
                unit_box: bool,
            ) {
                let data = (0..w * h)
                    .map(|i| Vec3::new(i as f32, (i % 13) as f32, 1.0))
                    .collect();
                let mut buf = PixelBuffer::from_data(w, h, data).unwrap();
                if unit_box {
                    buf.set_logical_bounds(Bounds::new(Vec2::splat(-1.0), Vec2::splat(1.0)));
                }
                let p = IVec2::new(x, y);
                let logical = buf.pixel_to_logical(p.as_vec2());
                for extend in [Extend::Single, Extend::Repeat, Extend::Reflect] {
                    prop_assert_eq!(
                        buf.sample(logical, true, extend),
                        buf.index(p, extend),
                        "x={} lands on {:?}",
                        x,
                        buf.logical_to_pixel(logical)
                    );
                }
            }
        }
    }
}
