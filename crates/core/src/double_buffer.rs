//! Front/back buffer pair for iterative, history-dependent effects.
//!
//! Effects read the front buffer, write the back buffer, and call
//! [`DoubleBuffer::swap`] once the pass is complete. The back buffer does not
//! exist until first demanded; it starts life as a deep copy of the front.
//! Swapping exchanges the two buffers by identity and never copies pixels.

use crate::buffer::PixelBuffer;
use crate::error::RasterError;
use crate::pixel::Pixel;

/// A front buffer and a lazily allocated back buffer of the same size.
///
/// Invariant: whenever both buffers are observable through this type, their
/// dimensions are equal.
#[derive(Debug, Clone)]
pub struct DoubleBuffer<T: Pixel> {
    front: Option<PixelBuffer<T>>,
    back: Option<PixelBuffer<T>>,
    swapped: bool,
}

impl<T: Pixel> DoubleBuffer<T> {
    /// A double buffer with no image yet.
    pub fn empty() -> Self {
        Self {
            front: None,
            back: None,
            swapped: false,
        }
    }

    /// Wraps `front`. The back buffer is created on first use.
    pub fn new(front: PixelBuffer<T>) -> Self {
        Self {
            front: Some(front),
            back: None,
            swapped: false,
        }
    }

    pub fn has_image(&self) -> bool {
        self.front.is_some()
    }

    /// True once the back buffer has been allocated.
    pub fn has_back(&self) -> bool {
        self.back.is_some()
    }

    /// Flips on every swap. Bookkeeping only; nothing depends on it.
    pub fn swapped(&self) -> bool {
        self.swapped
    }

    pub fn front(&self) -> Result<&PixelBuffer<T>, RasterError> {
        self.front.as_ref().ok_or(RasterError::MissingBuffer("front"))
    }

    pub fn front_mut(&mut self) -> Result<&mut PixelBuffer<T>, RasterError> {
        self.front.as_mut().ok_or(RasterError::MissingBuffer("front"))
    }

    /// The back buffer, allocated as a copy of the front on first access.
    pub fn back(&mut self) -> Result<&mut PixelBuffer<T>, RasterError> {
        Ok(self.split_mut()?.1)
    }

    /// Borrows the front for reading and the back for writing at once.
    ///
    /// A back buffer of a different size is replaced by a copy of the front;
    /// one with a different logical box takes over the front's box.
    pub fn split_mut(&mut self) -> Result<(&PixelBuffer<T>, &mut PixelBuffer<T>), RasterError> {
        let front = self.front.as_ref().ok_or(RasterError::MissingBuffer("front"))?;
        let stale = self
            .back
            .as_ref()
            .map_or(true, |back| back.dim() != front.dim());
        if stale {
            self.back = Some(front.clone());
        } else if let Some(back) = self.back.as_mut() {
            if back.logical_bounds() != front.logical_bounds() {
                back.set_logical_bounds(front.logical_bounds());
            }
        }
        match (&self.front, &mut self.back) {
            (Some(front), Some(back)) => Ok((front, back)),
            _ => Err(RasterError::MissingBuffer("back")),
        }
    }

    /// Exchanges front and back. Allocates the back first if it does not
    /// exist yet; a double buffer without an image is left alone.
    pub fn swap(&mut self) {
        if self.front.is_none() {
            return;
        }
        if self.split_mut().is_err() {
            return;
        }
        std::mem::swap(&mut self.front, &mut self.back);
        self.swapped = !self.swapped;
    }

    /// Replaces the front, discarding the back buffer.
    pub fn reset(&mut self, front: PixelBuffer<T>) {
        self.front = Some(front);
        self.back = None;
        self.swapped = false;
    }

    /// Makes `other` a fresh double buffer around a copy of this front.
    pub fn clone_front_into(&self, other: &mut DoubleBuffer<T>) -> Result<(), RasterError> {
        other.reset(self.front()?.clone());
        Ok(())
    }

    /// Takes the front image out, leaving the double buffer empty.
    pub fn into_front(self) -> Option<PixelBuffer<T>> {
        self.front
    }
}

impl<T: Pixel> Default for DoubleBuffer<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Pixel> From<PixelBuffer<T>> for DoubleBuffer<T> {
    fn from(front: PixelBuffer<T>) -> Self {
        Self::new(front)
    }
}
