//! Targeted mode: steer an automaton toward a reference image.
//!
//! After the rule proposes an output, the proposal is kept only if it is no
//! farther from the target than the unmodified input; otherwise the input
//! passes through. A generation can therefore never move a cell away from
//! the target. Margolus blocks are accepted or rejected whole, and only when
//! none of their four cells moves away.

use raster_synth_core::{DoubleBuffer, Pixel, PixelBuffer, RasterError};
use serde::{Deserialize, Serialize};

/// Distance between a candidate and the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// [`Pixel::distance_to`].
    #[default]
    Euclidean,
    /// Absolute luma difference.
    Luma,
}

impl Metric {
    pub fn distance<T: Pixel>(self, a: &T, b: &T) -> f32 {
        match self {
            Metric::Euclidean => a.distance_to(b),
            Metric::Luma => (a.luma() - b.luma()).abs(),
        }
    }
}

/// A reference image and the metric used to compare against it.
#[derive(Debug, Clone)]
pub struct Target<T: Pixel> {
    buffers: DoubleBuffer<T>,
    metric: Metric,
}

impl<T: Pixel> Target<T> {
    pub fn new(buffers: DoubleBuffer<T>, metric: Metric) -> Self {
        Self { buffers, metric }
    }

    pub fn from_buffer(buffer: PixelBuffer<T>, metric: Metric) -> Self {
        Self::new(DoubleBuffer::new(buffer), metric)
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn set_metric(&mut self, metric: Metric) {
        self.metric = metric;
    }

    /// The image compared against.
    pub fn front(&self) -> Result<&PixelBuffer<T>, RasterError> {
        self.buffers
            .front()
            .map_err(|_| RasterError::MissingBuffer("target"))
    }

    /// Owning double buffer; a scene may keep animating the target.
    pub fn buffers_mut(&mut self) -> &mut DoubleBuffer<T> {
        &mut self.buffers
    }

    /// Fails unless the target image has dimensions `dim`.
    pub fn check_dim(&self, dim: (usize, usize)) -> Result<&PixelBuffer<T>, RasterError> {
        let front = self.front()?;
        if front.dim() != dim {
            return Err(RasterError::mismatch(dim, front.dim()));
        }
        Ok(front)
    }
}

/// Borrowed view used during one scan.
#[derive(Clone, Copy)]
pub(crate) struct Guide<'a, T: Pixel> {
    pub data: &'a [T],
    pub metric: Metric,
}

impl<T: Pixel> Guide<'_, T> {
    /// `proposal` if it is no farther from the target at `index` than
    /// `original`, else `original`.
    pub fn choose_cell(&self, index: usize, original: T, proposal: T) -> T {
        let t = &self.data[index];
        if self.metric.distance(&proposal, t) <= self.metric.distance(&original, t) {
            proposal
        } else {
            original
        }
    }

    /// Block version of [`Guide::choose_cell`]: `proposal` only if each of
    /// its cells is no farther from the target than the original cell.
    pub fn choose_block(&self, indices: &[usize; 4], original: [T; 4], proposal: [T; 4]) -> [T; 4] {
        let no_worse = indices.iter().enumerate().all(|(k, &i)| {
            let t = &self.data[i];
            self.metric.distance(&proposal[k], t) <= self.metric.distance(&original[k], t)
        });
        if no_worse {
            proposal
        } else {
            original
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn metrics_differ_on_equal_luma_colors() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::splat(a.luma());
        assert!(Metric::Luma.distance(&a, &b) < 1e-6);
        assert!(Metric::Euclidean.distance(&a, &b) > 0.5);
    }

    #[test]
    fn check_dim_reports_mismatch() {
        let target = Target::from_buffer(PixelBuffer::<i32>::new(4, 4).unwrap(), Metric::Luma);
        assert!(target.check_dim((4, 4)).is_ok());
        assert!(matches!(
            target.check_dim((4, 5)),
            Err(RasterError::DimensionMismatch { rhs_h: 4, lhs_h: 5, .. })
        ));
    }

    #[test]
    fn empty_target_is_a_missing_buffer() {
        let target = Target::<i32>::new(DoubleBuffer::empty(), Metric::Euclidean);
        assert!(matches!(
            target.check_dim((1, 1)),
            Err(RasterError::MissingBuffer("target"))
        ));
    }

    #[test]
    fn guide_prefers_proposal_on_ties() {
        let data = [5_i32];
        let guide = Guide {
            data: &data,
            metric: Metric::Euclidean,
        };
        assert_eq!(guide.choose_cell(0, 3, 7), 7);
        assert_eq!(guide.choose_cell(0, 4, 7), 4);
        assert_eq!(guide.choose_cell(0, 7, 5), 5);
    }

    #[test]
    fn block_is_rejected_when_any_cell_gets_worse() {
        let data = [0_i32, 0, 0, 0];
        let guide = Guide {
            data: &data,
            metric: Metric::Euclidean,
        };
        let idx = [0, 1, 2, 3];
        // The total improves but cell 2 moves away.
        assert_eq!(
            guide.choose_block(&idx, [4, 4, 0, 0], [1, 1, 1, 0]),
            [4, 4, 0, 0]
        );
        assert_eq!(
            guide.choose_block(&idx, [4, 4, 1, 0], [1, 1, 1, 0]),
            [1, 1, 1, 0]
        );
    }

    #[test]
    fn block_rotation_toward_target_is_kept_only_if_every_cell_agrees() {
        // Rotating [9, 0, 0, 1] counter-clockwise moves a 1 into cell 1.
        let data = [0_i32, 0, 9, 1];
        let guide = Guide {
            data: &data,
            metric: Metric::Euclidean,
        };
        let idx = [0, 1, 2, 3];
        assert_eq!(
            guide.choose_block(&idx, [9, 0, 0, 1], [0, 1, 9, 0]),
            [9, 0, 0, 1]
        );
        assert_eq!(
            guide.choose_block(&idx, [9, 0, 0, 1], [0, 0, 9, 1]),
            [0, 0, 9, 1]
        );
    }
}
