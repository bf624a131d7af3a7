#![deny(unsafe_code)]
//! Raster core for the raster-synth image pipeline.
//!
//! Provides the `Pixel` trait and its concrete pixel types, `PixelBuffer`
//! (toroidal/reflective indexing, bilinear sampling, splatting, warping),
//! `DoubleBuffer` ping-pong storage, the `Effect` trait driven by a scene,
//! `EvalContext` live parameters, the `Xorshift64` PRNG, and PNG/JPEG file
//! I/O behind the `codec` feature.

pub mod any_buffer;
pub mod buffer;
#[cfg(feature = "codec")]
pub mod codec;
pub mod context;
pub mod double_buffer;
pub mod effect;
pub mod error;
pub mod pixel;
pub mod prng;
pub mod splat;
pub mod warp;

pub use any_buffer::{AnyBuffer, BufferVisitor, BufferVisitorMut, PixelKind};
pub use buffer::{Bounds, CoordSpace, Extend, IntRect, PixelBuffer};
#[cfg(feature = "codec")]
pub use codec::ImageFormat;
pub use context::{EvalContext, JsonContext, NullContext};
pub use double_buffer::DoubleBuffer;
pub use effect::{Effect, WarpEffect};
pub use error::RasterError;
pub use pixel::{parse_hex, Argb, Pixel, RgbaPixel};
pub use prng::Xorshift64;
pub use warp::WarpOptions;
