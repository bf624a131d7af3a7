//! Block-local sorting: `pixel_sort` swaps single pairs, `funky_sort` swaps
//! whole block halves.
//!
//! Both read the live parameter `direction` each generation: below 0.5 sorts
//! along rows (left/right), otherwise along columns (top/bottom).

use raster_synth_core::{EvalContext, Pixel, RasterError, Xorshift64};
use serde_json::{json, Value};

use super::{param_bool, param_opt_f32};
use crate::rule::Rule;
use crate::topology::{MargolusVariant, NeighborhoodKind, Topology, TopologySelector};

/// Sort axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Horizontal,
    Vertical,
}

impl Direction {
    fn from_value(v: f64) -> Self {
        if v < 0.5 {
            Direction::Horizontal
        } else {
            Direction::Vertical
        }
    }

    fn as_value(self) -> f64 {
        match self {
            Direction::Horizontal => 0.0,
            Direction::Vertical => 1.0,
        }
    }

    /// Index pairs `(first, second)` across the split of `[tl, tr, bl, br]`.
    fn pairs(self) -> [(usize, usize); 2] {
        match self {
            Direction::Horizontal => [(0, 1), (2, 3)],
            Direction::Vertical => [(0, 2), (1, 3)],
        }
    }
}

/// Settings shared by both sort rules.
#[derive(Debug, Clone, PartialEq)]
pub struct SortParams {
    /// Configured axis; the live `direction` parameter overrides it.
    pub direction: Direction,
    /// Pairs farther apart in color than this are left alone.
    pub max_distance: Option<f32>,
    /// Brighter cells go first instead of last.
    pub descending: bool,
}

impl Default for SortParams {
    fn default() -> Self {
        Self {
            direction: Direction::Horizontal,
            max_distance: None,
            descending: false,
        }
    }
}

impl SortParams {
    /// Reads `direction` (`"horizontal"`, `"vertical"` or a number),
    /// `max_distance` and `descending`.
    pub fn from_json(params: &Value) -> Result<Self, RasterError> {
        let direction = match params.get("direction") {
            None | Some(Value::Null) => Direction::Horizontal,
            Some(Value::String(s)) => match s.as_str() {
                "horizontal" => Direction::Horizontal,
                "vertical" => Direction::Vertical,
                other => {
                    return Err(RasterError::InvalidConfig(format!(
                        "sort direction must be 'horizontal' or 'vertical', got '{other}'"
                    )))
                }
            },
            Some(v) => match v.as_f64() {
                Some(n) => Direction::from_value(n),
                None => {
                    return Err(RasterError::InvalidConfig(format!(
                        "sort direction must be a string or number, got {v}"
                    )))
                }
            },
        };
        Ok(Self {
            direction,
            max_distance: param_opt_f32(params, "max_distance"),
            descending: param_bool(params, "descending", false),
        })
    }

    fn within(&self, distance: f32) -> bool {
        self.max_distance.map_or(true, |max| distance <= max)
    }

    /// True when `first` belongs after `second`.
    fn out_of_order(&self, first: f32, second: f32) -> bool {
        if self.descending {
            first < second
        } else {
            first > second
        }
    }

    fn to_json(&self, direction: Direction) -> Value {
        json!({
            "direction": direction.as_value(),
            "max_distance": self.max_distance,
            "descending": self.descending,
        })
    }
}

fn margolus_plain() -> TopologySelector {
    TopologySelector::Fixed(Topology::Margolus(MargolusVariant::Plain))
}

/// Swaps each pair across the block split when the pair is out of order
/// by luma and close enough in color.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelSort {
    params: SortParams,
    direction: Direction,
    selector: TopologySelector,
}

impl PixelSort {
    pub fn new(params: SortParams) -> Self {
        Self {
            direction: params.direction,
            params,
            selector: margolus_plain(),
        }
    }

    /// Axis in effect for the current generation.
    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl Default for PixelSort {
    fn default() -> Self {
        Self::new(SortParams::default())
    }
}

impl<T: Pixel> Rule<T> for PixelSort {
    fn name(&self) -> &str {
        "pixel_sort"
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

    fn update(&mut self, ctx: &dyn EvalContext) {
        self.direction = Direction::from_value(
            ctx.param_or("direction", self.params.direction.as_value()),
        );
    }

    fn block(&self, block: &[T; 4], _rng: &mut Xorshift64) -> [T; 4] {
        let mut out = *block;
        for (a, b) in self.direction.pairs() {
            let (first, second) = (block[a], block[b]);
            if self.params.within(first.distance_to(&second))
                && self.params.out_of_order(first.luma(), second.luma())
            {
                out[a] = second;
                out[b] = first;
            }
        }
        out
    }

    fn params(&self) -> Value {
        self.params.to_json(self.direction)
    }
}

/// Swaps the two halves of a block when the first half is out of order by
/// summed luma and the halves' mean colors are close enough.
#[derive(Debug, Clone, PartialEq)]
pub struct FunkySort {
    params: SortParams,
    direction: Direction,
    selector: TopologySelector,
}

impl FunkySort {
    pub fn new(params: SortParams) -> Self {
        Self {
            direction: params.direction,
            params,
            selector: margolus_plain(),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl Default for FunkySort {
    fn default() -> Self {
        Self::new(SortParams::default())
    }
}

impl<T: Pixel> Rule<T> for FunkySort {
    fn name(&self) -> &str {
        "funky_sort"
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

    fn update(&mut self, ctx: &dyn EvalContext) {
        self.direction = Direction::from_value(
            ctx.param_or("direction", self.params.direction.as_value()),
        );
    }

    fn block(&self, block: &[T; 4], _rng: &mut Xorshift64) -> [T; 4] {
        let [(a0, b0), (a1, b1)] = self.direction.pairs();
        let first_luma = block[a0].luma() + block[a1].luma();
        let second_luma = block[b0].luma() + block[b1].luma();
        let first_mean = block[a0].mix(block[a1], 0.5);
        let second_mean = block[b0].mix(block[b1], 0.5);
        if !self.params.within(first_mean.distance_to(&second_mean))
            || !self.params.out_of_order(first_luma, second_luma)
        {
            return *block;
        }
        let mut out = *block;
        out.swap(a0, b0);
        out.swap(a1, b1);
        out
    }

    fn params(&self) -> Value {
        self.params.to_json(self.direction)
    }
}
