//! Conway's Game of Life over brightness-thresholded cells.

use raster_synth_core::{EvalContext, Pixel, RasterError, RgbaPixel, Xorshift64};
use serde_json::{json, Value};

use super::{param_color, param_f32};
use crate::rule::{Rule, CENTER};
use crate::topology::{NeighborhoodKind, Topology, TopologySelector};

/// Luma at or above which a cell counts as live.
pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// B3/S23 life. Live cells become `on`, dead cells `off`.
///
/// The live parameter `threshold` overrides the configured threshold each
/// generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Life<T: Pixel> {
    on: T,
    off: T,
    base_threshold: f32,
    threshold: f32,
    selector: TopologySelector,
}

impl<T: Pixel> Life<T> {
    pub fn new(on: T, off: T) -> Self {
        Self {
            on,
            off,
            base_threshold: DEFAULT_THRESHOLD,
            threshold: DEFAULT_THRESHOLD,
            selector: TopologySelector::Fixed(Topology::Moore),
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.base_threshold = threshold;
        self.threshold = threshold;
        self
    }

    /// Threshold in effect for the current generation.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    fn is_live(&self, cell: &T) -> bool {
        cell.luma() >= self.threshold
    }
}

impl<T: RgbaPixel> Life<T> {
    /// Reads `on`/`off` (hex colors, default white/black) and `threshold`.
    pub fn from_json(params: &Value) -> Result<Self, RasterError> {
        let on = param_color(params, "on", [255, 255, 255, 255])?;
        let off = param_color(params, "off", [0, 0, 0, 255])?;
        Ok(Self::new(on, off).with_threshold(param_f32(params, "threshold", DEFAULT_THRESHOLD)))
    }
}

impl<T: Pixel> Rule<T> for Life<T> {
    fn name(&self) -> &str {
        "life"
    }

    fn supports(&self, kind: NeighborhoodKind) -> bool {
        kind == NeighborhoodKind::Moore
    }

    fn selector(&self) -> &TopologySelector {
        &self.selector
    }

    fn set_selector(&mut self, selector: TopologySelector) {
        self.selector = selector;
    }

    fn update(&mut self, ctx: &dyn EvalContext) {
        self.threshold = ctx.param_or("threshold", self.base_threshold as f64) as f32;
    }

    fn moore(&self, window: &[T; 9], _rng: &mut Xorshift64) -> T {
        let neighbors = window
            .iter()
            .enumerate()
            .filter(|&(i, c)| i != CENTER && self.is_live(c))
            .count();
        let alive = if self.is_live(&window[CENTER]) {
            (2..=3).contains(&neighbors)
        } else {
            neighbors == 3
        };
        if alive {
            self.on
        } else {
            self.off
        }
    }

    fn params(&self) -> Value {
        json!({
            "threshold": self.threshold,
            "on": format!("{:?}", self.on),
            "off": format!("{:?}", self.off),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raster_synth_core::{Argb, JsonContext, NullContext};

    fn window(live: &[usize]) -> [i32; 9] {
        let mut w = [0; 9];
        for &i in live {
            w[i] = 1;
        }
        w
    }

    #[test]
    fn survival_and_birth_counts() {
        let life = Life::new(1, 0);
        let mut rng = Xorshift64::new(1);
        // Center live with 1, 2, 3, 4 neighbors.
        assert_eq!(life.moore(&window(&[4, 0]), &mut rng), 0);
        assert_eq!(life.moore(&window(&[4, 0, 1]), &mut rng), 1);
        assert_eq!(life.moore(&window(&[4, 0, 1, 2]), &mut rng), 1);
        assert_eq!(life.moore(&window(&[4, 0, 1, 2, 3]), &mut rng), 0);
        // Dead center with 2 and 3 neighbors.
        assert_eq!(life.moore(&window(&[0, 8]), &mut rng), 0);
        assert_eq!(life.moore(&window(&[0, 5, 8]), &mut rng), 1);
    }

    #[test]
    fn live_threshold_overrides_configured_value() {
        let mut life = Life::new(1, 0).with_threshold(0.5);
        let ctx = JsonContext::new(serde_json::json!({"threshold": 2.0}));
        Rule::<i32>::update(&mut life, &ctx);
        assert_eq!(life.threshold(), 2.0);
        // Every 1-valued cell is now dead.
        let mut rng = Xorshift64::new(1);
        assert_eq!(life.moore(&window(&[0, 5, 8]), &mut rng), 0);

        Rule::<i32>::update(&mut life, &NullContext);
        assert_eq!(life.threshold(), 0.5);
    }

    #[test]
    fn from_json_parses_colors() {
        let params = serde_json::json!({"on": "#ff0000", "off": "#80000000", "threshold": 0.25});
        let life = Life::<Argb>::from_json(&params).unwrap();
        assert_eq!(life.on, Argb::from_channels(255, 255, 0, 0));
        assert_eq!(life.off, Argb::from_channels(0x80, 0, 0, 0));
        assert_eq!(life.threshold(), 0.25);
    }

    #[test]
    fn from_json_rejects_bad_color() {
        let params = serde_json::json!({"on": "#nothex"});
        assert!(matches!(
            Life::<Argb>::from_json(&params),
            Err(RasterError::InvalidColor(_))
        ));
    }

    #[test]
    fn only_moore_is_supported() {
        let life = Life::new(1_i32, 0);
        assert!(life.supports(NeighborhoodKind::Moore));
        assert!(!life.supports(NeighborhoodKind::Margolus));
    }
}
