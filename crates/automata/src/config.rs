//! JSON configuration for building an automaton.
//!
//! ```json
//! {
//!   "rule": "pixel_sort",
//!   "topology": "hourglass",
//!   "gates": { "probability": 0.8, "brightness": [0.1, 0.9] },
//!   "metric": "luma",
//!   "seed": 7,
//!   "params": { "max_distance": 0.3 }
//! }
//! ```

use raster_synth_core::{RasterError, RgbaPixel};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::automaton::{Automaton, DEFAULT_SEED};
use crate::gate::Gates;
use crate::rule::Rule;
use crate::rules::RuleKind;
use crate::target::{Metric, Target};
use crate::topology::{Topology, TopologySelector};

/// A topology chosen per generation from a live parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LiveTopologyConfig {
    pub param: String,
    pub choices: Vec<String>,
}

/// Everything needed to construct an [`Automaton`] over [`RuleKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutomatonConfig {
    pub rule: String,
    /// Overrides the rule's default topology.
    pub topology: Option<String>,
    /// Takes precedence over `topology` when both are set.
    pub live_topology: Option<LiveTopologyConfig>,
    pub gates: Gates,
    /// Used when a target is attached.
    pub metric: Metric,
    pub seed: u64,
    /// Rule parameters, passed to [`RuleKind::from_name`].
    pub params: Value,
}

impl Default for AutomatonConfig {
    fn default() -> Self {
        Self {
            rule: "identity".to_string(),
            topology: None,
            live_topology: None,
            gates: Gates::default(),
            metric: Metric::default(),
            seed: DEFAULT_SEED,
            params: Value::Object(serde_json::Map::new()),
        }
    }
}

impl AutomatonConfig {
    /// A default config for `rule`.
    pub fn for_rule(rule: &str) -> Self {
        Self {
            rule: rule.to_string(),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, RasterError> {
        serde_json::from_str(json).map_err(|e| RasterError::InvalidConfig(e.to_string()))
    }

    pub fn from_value(value: Value) -> Result<Self, RasterError> {
        serde_json::from_value(value).map_err(|e| RasterError::InvalidConfig(e.to_string()))
    }

    /// The explicit topology selector, or `None` to keep the rule's default.
    pub fn selector(&self) -> Result<Option<TopologySelector>, RasterError> {
        if let Some(live) = &self.live_topology {
            if live.choices.is_empty() {
                return Err(RasterError::InvalidConfig(format!(
                    "live topology '{}' has no choices",
                    live.param
                )));
            }
            let choices = live
                .choices
                .iter()
                .map(|c| c.parse::<Topology>())
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Some(TopologySelector::Live {
                param: live.param.clone(),
                choices,
            }));
        }
        self.topology
            .as_deref()
            .map(|t| t.parse::<Topology>().map(TopologySelector::Fixed))
            .transpose()
    }

    /// Checks every field without building anything.
    pub fn validate(&self) -> Result<(), RasterError> {
        if !self.params.is_object() {
            return Err(RasterError::InvalidConfig("params must be a JSON object".into()));
        }
        self.gates.validate()?;
        self.selector()?;
        Ok(())
    }
}

impl<T: RgbaPixel> Automaton<T, RuleKind<T>> {
    /// Builds an automaton from `config`.
    ///
    /// # Errors
    ///
    /// `UnknownRule`, `InvalidConfig` or `InvalidColor` for bad settings and
    /// `InvalidTopology` when the chosen topology does not suit the rule.
    pub fn from_config(config: &AutomatonConfig) -> Result<Self, RasterError> {
        config.validate()?;
        let mut rule = RuleKind::<T>::from_name(&config.rule, &config.params)?;
        if let Some(selector) = config.selector()? {
            rule.set_selector(selector);
        }
        let automaton = Automaton::new(rule)?
            .with_seed(config.seed)
            .with_gates(config.gates)?;
        tracing::debug!(rule = %config.rule, seed = config.seed, "automaton configured");
        Ok(automaton)
    }

    /// [`Automaton::from_config`] with a target compared using the
    /// configured metric.
    pub fn from_config_with_target(
        config: &AutomatonConfig,
        target: raster_synth_core::PixelBuffer<T>,
    ) -> Result<Self, RasterError> {
        Ok(Self::from_config(config)?.with_target(Target::from_buffer(target, config.metric)))
    }
}
