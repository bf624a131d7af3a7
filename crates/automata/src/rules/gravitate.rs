//! Brightness-driven block rotation: `gravitate` and its mirrored `snow`
//! variant.

use raster_synth_core::{Pixel, Xorshift64};
use serde_json::{json, Value};

use super::{rotate_ccw, rotate_cw};
use crate::rule::Rule;
use crate::topology::{MargolusVariant, NeighborhoodKind, Topology, TopologySelector};

/// Lets bright cells sink through darker ones.
///
/// A block whose top row carries more luma than its bottom row turns a
/// quarter toward its heavier column: counter-clockwise when the left column
/// is brighter, clockwise when the right one is. Balanced blocks stay.
///
/// `snow` turns the opposite way. That drifts bright cells sideways
/// instead of down; existing scenes depend on the look, so it is kept as its
/// own rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Gravitate {
    mirrored: bool,
    selector: TopologySelector,
}

impl Gravitate {
    pub fn new() -> Self {
        Self {
            mirrored: false,
            selector: TopologySelector::Fixed(Topology::Margolus(MargolusVariant::Plain)),
        }
    }

    pub fn snow() -> Self {
        Self {
            mirrored: true,
            ..Self::new()
        }
    }

    pub fn is_snow(&self) -> bool {
        self.mirrored
    }
}

impl Default for Gravitate {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Pixel> Rule<T> for Gravitate {
    fn name(&self) -> &str {
        if self.mirrored {
            "snow"
        } else {
            "gravitate"
        }
    }

    fn supports(&self, kind: NeighborhoodKind) -> bool {
        kind == NeighborhoodKind::Margolus
    }

    fn selector(&self) -> &TopologySelector {
        &self.selector
    }

    fn set_selector(&mut self, selector: TopologySelector) {
        self.selector = selector;
    }

    fn block(&self, block: &[T; 4], _rng: &mut Xorshift64) -> [T; 4] {
        let [tl, tr, bl, br] = block.map(|c| c.luma());
        if tl + tr <= bl + br {
            return *block;
        }
        let (left, right) = (tl + bl, tr + br);
        let clockwise = if right > left {
            true
        } else if left > right {
            false
        } else {
            return *block;
        };
        if clockwise != self.mirrored {
            rotate_cw(block)
        } else {
            rotate_ccw(block)
        }
    }

    fn params(&self) -> Value {
        json!({ "mirrored": self.mirrored })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(rule: &Gravitate, block: [i32; 4]) -> [i32; 4] {
        rule.block(&block, &mut Xorshift64::new(1))
    }

    #[test]
    fn bright_top_cell_falls() {
        let g = Gravitate::new();
        assert_eq!(run(&g, [9, 0, 0, 0]), [0, 0, 9, 0]);
        assert_eq!(run(&g, [0, 9, 0, 0]), [0, 0, 0, 9]);
    }

    #[test]
    fn bottom_heavy_and_balanced_blocks_stay() {
        let g = Gravitate::new();
        assert_eq!(run(&g, [0, 0, 9, 0]), [0, 0, 9, 0]);
        assert_eq!(run(&g, [5, 5, 1, 1]), [5, 5, 1, 1]);
        assert_eq!(run(&g, [3, 3, 3, 3]), [3, 3, 3, 3]);
    }

    #[test]
    fn snow_turns_the_other_way() {
        let s = Gravitate::snow();
        assert_eq!(run(&s, [9, 0, 0, 0]), [0, 9, 0, 0]);
        assert_eq!(run(&s, [0, 9, 0, 0]), [9, 0, 0, 0]);
        assert_eq!(Rule::<i32>::name(&s), "snow");
        assert_eq!(Rule::<i32>::name(&Gravitate::new()), "gravitate");
    }

    #[test]
    fn rotation_preserves_cells() {
        let g = Gravitate::new();
        let mut out = run(&g, [7, 2, 1, 0]);
        out.sort_unstable();
        assert_eq!(out, [0, 1, 2, 7]);
    }
}
