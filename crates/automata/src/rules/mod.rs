//! Rule registry: maps rule names to implementations.
//!
//! [`RuleKind`] wraps each rule and delegates the [`Rule`] methods, so the
//! configuration layer and the CLI can build any rule from a name and a JSON
//! params object.

mod diffuse;
mod gravitate;
mod identity;
mod life;
mod sort;

pub use diffuse::Diffuse;
pub use gravitate::Gravitate;
pub use identity::Identity;
pub use life::{Life, DEFAULT_THRESHOLD};
pub use sort::{Direction, FunkySort, PixelSort, SortParams};

use raster_synth_core::{parse_hex, EvalContext, RasterError, RgbaPixel, Xorshift64};
use serde_json::Value;

use crate::rule::Rule;
use crate::topology::{NeighborhoodKind, Topology, TopologySelector};

/// All available rule names.
const RULE_NAMES: &[&str] = &[
    "identity",
    "life",
    "diffuse",
    "gravitate",
    "snow",
    "pixel_sort",
    "funky_sort",
];

/// Quarter turn clockwise of `[tl, tr, bl, br]`.
pub fn rotate_cw<T: Copy>(b: &[T; 4]) -> [T; 4] {
    [b[2], b[0], b[3], b[1]]
}

/// Quarter turn counter-clockwise of `[tl, tr, bl, br]`.
pub fn rotate_ccw<T: Copy>(b: &[T; 4]) -> [T; 4] {
    [b[1], b[3], b[0], b[2]]
}

fn param_f32(params: &Value, name: &str, default: f32) -> f32 {
    params
        .get(name)
        .and_then(Value::as_f64)
        .map_or(default, |v| v as f32)
}

fn param_opt_f32(params: &Value, name: &str) -> Option<f32> {
    params.get(name).and_then(Value::as_f64).map(|v| v as f32)
}

fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

/// Reads a hex color string. Missing keys give `default` (`[r, g, b, a]`);
/// anything present but unparseable is an error.
fn param_color<T: RgbaPixel>(params: &Value, name: &str, default: [u8; 4]) -> Result<T, RasterError> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(T::from_rgba8(default)),
        Some(Value::String(s)) => parse_hex(s).map(T::from_rgba8),
        Some(other) => Err(RasterError::InvalidColor(format!(
            "'{name}' must be a hex string, got {other}"
        ))),
    }
}

/// Every built-in rule.
///
/// Use [`RuleKind::from_name`] for string-based construction.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleKind<T: RgbaPixel> {
    Identity(Identity),
    Life(Life<T>),
    Diffuse(Diffuse),
    /// `gravitate` and `snow`.
    Gravitate(Gravitate),
    PixelSort(PixelSort),
    FunkySort(FunkySort),
}

impl<T: RgbaPixel> RuleKind<T> {
    /// Constructs a rule by name with its default topology.
    ///
    /// Names are case-insensitive and `-` may stand in for `_`. Returns
    /// `RasterError::UnknownRule` if the name is not recognized.
    pub fn from_name(name: &str, params: &Value) -> Result<Self, RasterError> {
        let key = name.trim().to_ascii_lowercase().replace('-', "_");
        let rule = match key.as_str() {
            "identity" => RuleKind::Identity(Identity::default()),
            "life" => RuleKind::Life(Life::from_json(params)?),
            "diffuse" => RuleKind::Diffuse(Diffuse::from_json(params)),
            "gravitate" => RuleKind::Gravitate(Gravitate::new()),
            "snow" => RuleKind::Gravitate(Gravitate::snow()),
            "pixel_sort" => RuleKind::PixelSort(PixelSort::new(SortParams::from_json(params)?)),
            "funky_sort" => RuleKind::FunkySort(FunkySort::new(SortParams::from_json(params)?)),
            _ => return Err(RasterError::UnknownRule(name.to_string())),
        };
        Ok(rule)
    }

    /// Returns a slice of all recognized rule names.
    pub fn list_rules() -> &'static [&'static str] {
        RULE_NAMES
    }

    fn inner(&self) -> &dyn Rule<T> {
        match self {
            RuleKind::Identity(r) => r,
            RuleKind::Life(r) => r,
            RuleKind::Diffuse(r) => r,
            RuleKind::Gravitate(r) => r,
            RuleKind::PixelSort(r) => r,
            RuleKind::FunkySort(r) => r,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Rule<T> {
        match self {
            RuleKind::Identity(r) => r,
            RuleKind::Life(r) => r,
            RuleKind::Diffuse(r) => r,
            RuleKind::Gravitate(r) => r,
            RuleKind::PixelSort(r) => r,
            RuleKind::FunkySort(r) => r,
        }
    }
}

impl<T: RgbaPixel> Rule<T> for RuleKind<T> {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn supports(&self, kind: NeighborhoodKind) -> bool {
        self.inner().supports(kind)
    }

    fn selector(&self) -> &TopologySelector {
        self.inner().selector()
    }

    fn set_selector(&mut self, selector: TopologySelector) {
        self.inner_mut().set_selector(selector);
    }

    fn update(&mut self, ctx: &dyn EvalContext) {
        self.inner_mut().update(ctx);
    }

    fn prepare(&mut self, ctx: &dyn EvalContext) -> Result<Topology, RasterError> {
        self.inner_mut().prepare(ctx)
    }

    fn moore(&self, window: &[T; 9], rng: &mut Xorshift64) -> T {
        self.inner().moore(window, rng)
    }

    fn block(&self, block: &[T; 4], rng: &mut Xorshift64) -> [T; 4] {
        self.inner().block(block, rng)
    }

    fn params(&self) -> Value {
        self.inner().params()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use raster_synth_core::Argb;
    use serde_json::json;

    #[test]
    fn rotations_are_inverse() {
        let b = [1, 2, 3, 4];
        assert_eq!(rotate_ccw(&rotate_cw(&b)), b);
        assert_eq!(rotate_cw(&rotate_cw(&rotate_cw(&rotate_cw(&b)))), b);
    }

    #[test]
    fn from_name_builds_every_listed_rule() {
        for name in RuleKind::<Argb>::list_rules() {
            let rule = RuleKind::<Argb>::from_name(name, &json!({})).unwrap();
            assert_eq!(rule.name(), *name);
        }
    }

    #[test]
    fn from_name_unknown_returns_error() {
        let result = RuleKind::<Vec3>::from_name("nonexistent", &json!({}));
        assert!(matches!(result, Err(RasterError::UnknownRule(_))));
    }

    #[test]
    fn from_name_normalizes_case_and_dashes() {
        let rule = RuleKind::<Vec3>::from_name("Pixel-Sort", &json!({})).unwrap();
        assert!(matches!(rule, RuleKind::PixelSort(_)));
    }

    #[test]
    fn default_topologies_match_supported_kinds() {
        for name in RuleKind::<Argb>::list_rules() {
            let rule = RuleKind::<Argb>::from_name(name, &json!({})).unwrap();
            for t in rule.selector().candidates() {
                assert!(rule.supports(t.kind()), "{name} defaults to unsupported {t}");
            }
        }
    }

    #[test]
    fn delegation_reaches_inner_rule() {
        let rule = RuleKind::<Argb>::from_name("snow", &json!({})).unwrap();
        let mut rng = Xorshift64::new(1);
        let w = Argb::WHITE;
        let k = Argb::BLACK;
        assert_eq!(rule.block(&[w, k, k, k], &mut rng), [k, w, k, k]);
        assert_eq!(rule.params()["mirrored"], true);
    }

    #[test]
    fn bad_params_surface_as_errors() {
        assert!(matches!(
            RuleKind::<Argb>::from_name("life", &json!({"on": 7})),
            Err(RasterError::InvalidColor(_))
        ));
        assert!(matches!(
            RuleKind::<Argb>::from_name("funky_sort", &json!({"direction": "up"})),
            Err(RasterError::InvalidConfig(_))
        ));
    }

    #[test]
    fn param_helpers_fall_back_on_wrong_types() {
        let p = json!({"x": "fast", "flag": 1, "y": 2});
        assert_eq!(param_f32(&p, "x", 1.5), 1.5);
        assert_eq!(param_f32(&p, "y", 0.0), 2.0);
        assert_eq!(param_opt_f32(&p, "missing"), None);
        assert!(!param_bool(&p, "flag", false));
    }
}
