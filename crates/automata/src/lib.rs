#![deny(unsafe_code)]
//! Cellular-automaton engine for raster-synth.
//!
//! An [`Automaton`] advances a [`Rule`] one generation per call over a
//! `DoubleBuffer`, using either the Moore 3×3 neighborhood or Margolus 2×2
//! blocks whose alignment cycles with the frame counter. Optional gates
//! hold cells back, and an optional [`Target`] steers every generation
//! toward a reference image.
//!
//! [`RuleKind`] and [`AutomatonConfig`] build automata from names and JSON.

pub mod automaton;
pub mod config;
pub mod gate;
pub mod rule;
pub mod rules;
pub mod target;
pub mod topology;

pub use automaton::{Automaton, Phase, DEFAULT_SEED};
pub use config::{AutomatonConfig, LiveTopologyConfig};
pub use gate::Gates;
pub use rule::Rule;
pub use rules::RuleKind;
pub use target::{Metric, Target};
pub use topology::{MargolusVariant, NeighborhoodKind, Topology, TopologySelector, TOPOLOGY_NAMES};
