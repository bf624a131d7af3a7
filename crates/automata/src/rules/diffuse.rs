//! Random block rotation.

use raster_synth_core::{Pixel, Xorshift64};
use serde_json::{json, Value};

use super::{param_opt_f32, rotate_ccw, rotate_cw};
use crate::rule::Rule;
use crate::topology::{MargolusVariant, NeighborhoodKind, Topology, TopologySelector};

/// Rotates each 2×2 block a quarter turn, clockwise or counter-clockwise
/// with equal probability.
///
/// With `max_opacity` set, a block holding any cell more opaque than that
/// stays where it is, so opaque regions act as walls.
#[derive(Debug, Clone, PartialEq)]
pub struct Diffuse {
    max_opacity: Option<f32>,
    selector: TopologySelector,
}

impl Default for Diffuse {
    fn default() -> Self {
        Self {
            max_opacity: None,
            selector: TopologySelector::Fixed(Topology::Margolus(MargolusVariant::Plain)),
        }
    }
}

impl Diffuse {
    pub fn with_max_opacity(mut self, max_opacity: Option<f32>) -> Self {
        self.max_opacity = max_opacity;
        self
    }

    pub fn from_json(params: &Value) -> Self {
        Self::default().with_max_opacity(param_opt_f32(params, "max_opacity"))
    }
}

impl<T: Pixel> Rule<T> for Diffuse {
    fn name(&self) -> &str {
        "diffuse"
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

    fn block(&self, block: &[T; 4], rng: &mut Xorshift64) -> [T; 4] {
        if let Some(max) = self.max_opacity {
            if block.iter().any(|c| c.opacity() > max) {
                return *block;
            }
        }
        if rng.next_bool() {
            rotate_cw(block)
        } else {
            rotate_ccw(block)
        }
    }

    fn params(&self) -> Value {
        json!({ "max_opacity": self.max_opacity })
    }
}
