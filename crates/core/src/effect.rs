//! The `Effect` trait the scene graph drives once per render tick.
//!
//! The trait is object-safe, so a scene can hold `Box<dyn Effect<T>>` values
//! for effects with different state (automata, warps) over the same pixel
//! type.

use glam::Vec2;
use serde_json::{json, Value};

use crate::buffer::PixelBuffer;
use crate::context::EvalContext;
use crate::double_buffer::DoubleBuffer;
use crate::error::RasterError;
use crate::pixel::Pixel;
use crate::warp::WarpOptions;

/// A stateful image operation applied to a [`DoubleBuffer`].
pub trait Effect<T: Pixel> {
    /// Short identifier for logs and listings.
    fn name(&self) -> &str;

    /// Runs one tick. Implementations read the front buffer, write the back
    /// buffer, and swap only after a complete pass. On error neither buffer
    /// has been modified.
    fn apply(
        &mut self,
        buffers: &mut DoubleBuffer<T>,
        ctx: &dyn EvalContext,
    ) -> Result<(), RasterError>;

    /// Current settings as a JSON object.
    fn params(&self) -> Value;
}

/// Warps the front buffer through a fixed vector field each tick.
///
/// The live parameter `warp_step`, when present, overrides the configured
/// step for that tick.
pub struct WarpEffect {
    field: PixelBuffer<Vec2>,
    options: WarpOptions,
}

impl WarpEffect {
    pub fn new(field: PixelBuffer<Vec2>, options: WarpOptions) -> Self {
        Self { field, options }
    }

    pub fn field(&self) -> &PixelBuffer<Vec2> {
        &self.field
    }

    pub fn options(&self) -> WarpOptions {
        self.options
    }
}

impl<T: Pixel> Effect<T> for WarpEffect {
    fn name(&self) -> &str {
        "warp"
    }

    fn apply(
        &mut self,
        buffers: &mut DoubleBuffer<T>,
        ctx: &dyn EvalContext,
    ) -> Result<(), RasterError> {
        if self.field.is_empty() {
            return Err(RasterError::MissingBuffer("warp field"));
        }
        let options = WarpOptions {
            step: ctx.param_or("warp_step", self.options.step as f64) as f32,
            ..self.options
        };
        let (front, back) = buffers.split_mut()?;
        back.set_logical_bounds(front.logical_bounds());
        back.warp(front, &self.field, options);
        tracing::debug!(step = options.step, relative = options.relative, "warp applied");
        buffers.swap();
        Ok(())
    }

    fn params(&self) -> Value {
        json!({
            "step": self.options.step,
            "smooth": self.options.smooth,
            "relative": self.options.relative,
            "field_width": self.field.width(),
            "field_height": self.field.height(),
        })
    }
}
