//! Blocking gates: conditions under which a cell or block keeps its input
//! instead of being handed to the rule.

use raster_synth_core::{Pixel, RasterError, Xorshift64};
use serde::{Deserialize, Serialize};

/// Gate settings. All gates are AND-composed: the rule runs only when every
/// configured gate is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Gates {
    /// Apply the rule with this probability.
    pub probability: Option<f32>,
    /// Skip neighborhoods that touch the outer row or column of the grid.
    pub edges: bool,
    /// Skip neighborhoods holding any cell whose luma is outside `[min, max]`.
    pub brightness: Option<(f32, f32)>,
}

impl Gates {
    pub fn validate(&self) -> Result<(), RasterError> {
        if let Some(p) = self.probability {
            if !(0.0..=1.0).contains(&p) {
                return Err(RasterError::InvalidConfig(format!(
                    "gate probability {p} is outside [0, 1]"
                )));
            }
        }
        if let Some((min, max)) = self.brightness {
            if min.is_nan() || max.is_nan() || min > max {
                return Err(RasterError::InvalidConfig(format!(
                    "brightness range [{min}, {max}] is empty"
                )));
            }
        }
        Ok(())
    }

    /// True when the rule may run on `cells`.
    ///
    /// The deterministic gates are checked first; the probability gate draws
    /// from `rng` only when they pass.
    pub fn admit<T: Pixel>(&self, cells: &[T], touches_edge: bool, rng: &mut Xorshift64) -> bool {
        if self.edges && touches_edge {
            return false;
        }
        if let Some((min, max)) = self.brightness {
            if cells.iter().any(|c| !(min..=max).contains(&c.luma())) {
                return false;
            }
        }
        match self.probability {
            Some(p) => rng.chance(p),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_gates_admit_everything_without_drawing() {
        let gates = Gates::default();
        let mut rng = Xorshift64::new(4);
        let before = rng.clone();
        assert!(gates.admit(&[0_i32, 100, -5], true, &mut rng));
        assert_eq!(rng, before);
    }

    #[test]
    fn edge_gate_blocks_only_edge_neighborhoods() {
        let gates = Gates {
            edges: true,
            ..Gates::default()
        };
        let mut rng = Xorshift64::new(4);
        assert!(!gates.admit(&[1_i32], true, &mut rng));
        assert!(gates.admit(&[1_i32], false, &mut rng));
    }

    #[test]
    fn brightness_gate_checks_every_cell() {
        let gates = Gates {
            brightness: Some((1.0, 3.0)),
            ..Gates::default()
        };
        let mut rng = Xorshift64::new(4);
        assert!(gates.admit(&[1_i32, 2, 3], false, &mut rng));
        assert!(!gates.admit(&[1_i32, 2, 4], false, &mut rng));
        assert!(!gates.admit(&[0_i32, 2, 3], false, &mut rng));
    }

    #[test]
    fn probability_gate_passes_at_expected_rate() {
        let gates = Gates {
            probability: Some(0.3),
            ..Gates::default()
        };
        let mut rng = Xorshift64::new(8);
        let passed = (0..10_000)
            .filter(|_| gates.admit(&[0_i32], false, &mut rng))
            .count();
        assert!((2_700..3_300).contains(&passed), "passed = {passed}");
    }

    #[test]
    fn validate_rejects_out_of_range_settings() {
        let bad_p = Gates {
            probability: Some(1.5),
            ..Gates::default()
        };
        assert!(bad_p.validate().is_err());
        let inverted = Gates {
            brightness: Some((0.8, 0.2)),
            ..Gates::default()
        };
        assert!(inverted.validate().is_err());
        assert!(Gates::default().validate().is_ok());
    }

    #[test]
    fn deserializes_brightness_as_pair() {
        let gates: Gates =
            serde_json::from_value(json!({"brightness": [0.1, 0.9], "edges": true})).unwrap();
        assert_eq!(gates.brightness, Some((0.1, 0.9)));
        assert!(gates.edges);
        assert_eq!(gates.probability, None);
    }

    #[test]
    fn unknown_gate_is_rejected() {
        let result: Result<Gates, _> = serde_json::from_value(json!({"alpha": 1}));
        assert!(result.is_err());
    }
}
