//! Runtime-typed buffers for places where several pixel types coexist.
//!
//! The raster core is generic over [`Pixel`]; a scene that stores buffers of
//! different pixel types side by side keeps them as [`AnyBuffer`] and reaches
//! the typed buffer through a [`BufferVisitor`].

use std::fmt;

use glam::{IVec2, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::pixel::{Argb, Pixel};

/// Names the concrete pixel type of an [`AnyBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelKind {
    Color,
    Packed,
    Vector,
    IntVector,
    Scalar,
}

impl fmt::Display for PixelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PixelKind::Color => "color",
            PixelKind::Packed => "packed",
            PixelKind::Vector => "vector",
            PixelKind::IntVector => "int_vector",
            PixelKind::Scalar => "scalar",
        };
        f.write_str(name)
    }
}

/// A [`PixelBuffer`] of one of the engine's concrete pixel types.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyBuffer {
    /// Float RGB.
    Color(PixelBuffer<Vec3>),
    /// `0xAARRGGBB`.
    Packed(PixelBuffer<Argb>),
    Vector(PixelBuffer<Vec2>),
    IntVector(PixelBuffer<IVec2>),
    Scalar(PixelBuffer<i32>),
}

/// Generic operation over whichever buffer an [`AnyBuffer`] holds.
pub trait BufferVisitor {
    type Output;

    fn visit<T: Pixel>(&mut self, buffer: &PixelBuffer<T>) -> Self::Output;
}

/// Mutable counterpart of [`BufferVisitor`].
pub trait BufferVisitorMut {
    type Output;

    fn visit_mut<T: Pixel>(&mut self, buffer: &mut PixelBuffer<T>) -> Self::Output;
}

impl AnyBuffer {
    pub fn kind(&self) -> PixelKind {
        match self {
            AnyBuffer::Color(_) => PixelKind::Color,
            AnyBuffer::Packed(_) => PixelKind::Packed,
            AnyBuffer::Vector(_) => PixelKind::Vector,
            AnyBuffer::IntVector(_) => PixelKind::IntVector,
            AnyBuffer::Scalar(_) => PixelKind::Scalar,
        }
    }

    pub fn accept<V: BufferVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            AnyBuffer::Color(b) => visitor.visit(b),
            AnyBuffer::Packed(b) => visitor.visit(b),
            AnyBuffer::Vector(b) => visitor.visit(b),
            AnyBuffer::IntVector(b) => visitor.visit(b),
            AnyBuffer::Scalar(b) => visitor.visit(b),
        }
    }

    pub fn accept_mut<V: BufferVisitorMut>(&mut self, visitor: &mut V) -> V::Output {
        match self {
            AnyBuffer::Color(b) => visitor.visit_mut(b),
            AnyBuffer::Packed(b) => visitor.visit_mut(b),
            AnyBuffer::Vector(b) => visitor.visit_mut(b),
            AnyBuffer::IntVector(b) => visitor.visit_mut(b),
            AnyBuffer::Scalar(b) => visitor.visit_mut(b),
        }
    }

    /// `(width, height)` of the held buffer.
    pub fn dim(&self) -> (usize, usize) {
        struct Dim;
        impl BufferVisitor for Dim {
            type Output = (usize, usize);
            fn visit<T: Pixel>(&mut self, buffer: &PixelBuffer<T>) -> (usize, usize) {
                buffer.dim()
            }
        }
        self.accept(&mut Dim)
    }

    pub fn as_color(&self) -> Option<&PixelBuffer<Vec3>> {
        match self {
            AnyBuffer::Color(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_packed(&self) -> Option<&PixelBuffer<Argb>> {
        match self {
            AnyBuffer::Packed(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&PixelBuffer<Vec2>> {
        match self {
            AnyBuffer::Vector(b) => Some(b),
            _ => None,
        }
    }
}

macro_rules! impl_from_buffer {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<PixelBuffer<$ty>> for AnyBuffer {
                fn from(buffer: PixelBuffer<$ty>) -> Self {
                    AnyBuffer::$variant(buffer)
                }
            }
        )*
    };
}

impl_from_buffer! {
    Vec3 => Color,
    Argb => Packed,
    Vec2 => Vector,
    IVec2 => IntVector,
    i32 => Scalar,
}
