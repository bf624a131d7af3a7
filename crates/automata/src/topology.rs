//! Neighborhood topologies and the Margolus phase tables.
//!
//! A Moore generation maps every cell's 3×3 neighborhood to one output cell.
//! A Margolus generation partitions the grid into 2×2 blocks whose alignment
//! shifts with the frame counter; the [`MargolusVariant`] picks the shift
//! sequence.

use std::fmt;
use std::str::FromStr;

use glam::UVec2;
use raster_synth_core::{EvalContext, RasterError, Xorshift64};

/// The two neighborhood shapes a rule may be evaluated over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NeighborhoodKind {
    Moore,
    Margolus,
}

impl fmt::Display for NeighborhoodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NeighborhoodKind::Moore => "moore",
            NeighborhoodKind::Margolus => "margolus",
        })
    }
}

/// How the 2×2 block alignment advances from frame to frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MargolusVariant {
    #[default]
    Plain,
    Hourglass,
    ReverseHourglass,
    Bowtie,
    ReverseBowtie,
    Square,
    ReverseSquare,
    Random,
}

const SQUARE_CYCLE: [(u32, u32); 4] = [(0, 0), (1, 0), (1, 1), (0, 1)];
const REVERSE_SQUARE_CYCLE: [(u32, u32); 4] = [(0, 0), (0, 1), (1, 1), (1, 0)];

impl MargolusVariant {
    /// Block phase `(x, y)`, each 0 or 1, for `frame`.
    ///
    /// Only [`MargolusVariant::Random`] draws from `rng` (two coin flips).
    pub fn phase(self, frame: u64, rng: &mut Xorshift64) -> UVec2 {
        let odd = (frame % 2) as u32;
        let half = ((frame / 2) % 2) as u32;
        let (x, y) = match self {
            MargolusVariant::Plain => (odd, odd),
            MargolusVariant::Hourglass => (odd, half),
            MargolusVariant::ReverseHourglass => (1 - odd, half),
            MargolusVariant::Bowtie => (half, odd),
            MargolusVariant::ReverseBowtie => (half, 1 - odd),
            MargolusVariant::Square => SQUARE_CYCLE[(frame % 4) as usize],
            MargolusVariant::ReverseSquare => REVERSE_SQUARE_CYCLE[(frame % 4) as usize],
            MargolusVariant::Random => (rng.next_bool() as u32, rng.next_bool() as u32),
        };
        UVec2::new(x, y)
    }
}

/// Pixel coordinate of the first block's top-left cell for `phase`.
///
/// The y phase counts upward, so phase `(1, 1)` starts the grid at
/// `(1, height - 1)`. `width` and `height` must be non-zero.
pub fn block_origin(phase: UVec2, width: usize, height: usize) -> (usize, usize) {
    let x = phase.x as usize % width;
    let y = (height - phase.y as usize % height) % height;
    (x, y)
}

/// A fully resolved neighborhood topology for one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    Moore,
    Margolus(MargolusVariant),
}

/// Names accepted by [`Topology::from_str`], in listing order.
pub const TOPOLOGY_NAMES: &[&str] = &[
    "moore",
    "margolus",
    "hourglass",
    "reverse_hourglass",
    "bowtie",
    "reverse_bowtie",
    "square",
    "reverse_square",
    "random",
];

impl Topology {
    pub fn kind(self) -> NeighborhoodKind {
        match self {
            Topology::Moore => NeighborhoodKind::Moore,
            Topology::Margolus(_) => NeighborhoodKind::Margolus,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Topology::Moore => "moore",
            Topology::Margolus(v) => match v {
                MargolusVariant::Plain => "margolus",
                MargolusVariant::Hourglass => "hourglass",
                MargolusVariant::ReverseHourglass => "reverse_hourglass",
                MargolusVariant::Bowtie => "bowtie",
                MargolusVariant::ReverseBowtie => "reverse_bowtie",
                MargolusVariant::Square => "square",
                MargolusVariant::ReverseSquare => "reverse_square",
                MargolusVariant::Random => "random",
            },
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Topology {
    type Err = RasterError;

    /// Parses a topology name. `-` and `_` are interchangeable and `plain`
    /// is an alias for `margolus`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase().replace('-', "_");
        let topology = match name.as_str() {
            "moore" => Topology::Moore,
            "margolus" | "plain" => Topology::Margolus(MargolusVariant::Plain),
            "hourglass" => Topology::Margolus(MargolusVariant::Hourglass),
            "reverse_hourglass" => Topology::Margolus(MargolusVariant::ReverseHourglass),
            "bowtie" => Topology::Margolus(MargolusVariant::Bowtie),
            "reverse_bowtie" => Topology::Margolus(MargolusVariant::ReverseBowtie),
            "square" => Topology::Margolus(MargolusVariant::Square),
            "reverse_square" => Topology::Margolus(MargolusVariant::ReverseSquare),
            "random" => Topology::Margolus(MargolusVariant::Random),
            _ => return Err(RasterError::InvalidConfig(format!("unknown topology '{s}'"))),
        };
        Ok(topology)
    }
}

/// Chooses a rule's topology once per generation.
#[derive(Debug, Clone, PartialEq)]
pub enum TopologySelector {
    Fixed(Topology),
    /// Reads `param` from the evaluation context, floors it, and picks
    /// `choices[i mod len]`. A missing parameter selects the first choice.
    Live {
        param: String,
        choices: Vec<Topology>,
    },
}

impl TopologySelector {
    pub fn resolve(&self, ctx: &dyn EvalContext) -> Result<Topology, RasterError> {
        match self {
            TopologySelector::Fixed(t) => Ok(*t),
            TopologySelector::Live { param, choices } => {
                if choices.is_empty() {
                    return Err(RasterError::InvalidConfig(format!(
                        "live topology '{param}' has no choices"
                    )));
                }
                let raw = ctx.param_or(param, 0.0);
                let i = if raw.is_finite() {
                    (raw.floor() as i64).rem_euclid(choices.len() as i64) as usize
                } else {
                    0
                };
                Ok(choices[i])
            }
        }
    }

    /// Every topology this selector can produce.
    pub fn candidates(&self) -> Vec<Topology> {
        match self {
            TopologySelector::Fixed(t) => vec![*t],
            TopologySelector::Live { choices, .. } => choices.clone(),
        }
    }
}

impl From<Topology> for TopologySelector {
    fn from(topology: Topology) -> Self {
        TopologySelector::Fixed(topology)
    }
}
