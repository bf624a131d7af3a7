//! The identity rule.

use raster_synth_core::Pixel;

use crate::rule::Rule;
use crate::topology::{NeighborhoodKind, Topology, TopologySelector};

/// Leaves every cell unchanged under any topology.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    selector: TopologySelector,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            selector: TopologySelector::Fixed(Topology::Moore),
        }
    }
}

impl<T: Pixel> Rule<T> for Identity {
    fn name(&self) -> &str {
        "identity"
    }

    fn supports(&self, _kind: NeighborhoodKind) -> bool {
        true
    }

    fn selector(&self) -> &TopologySelector {
        &self.selector
    }

    fn set_selector(&mut self, selector: TopologySelector) {
        self.selector = selector;
    }
}
