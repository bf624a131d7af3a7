//! The `Rule` trait every automaton rule implements.

use raster_synth_core::{EvalContext, Pixel, RasterError, Xorshift64};
use serde_json::Value;

use crate::topology::{NeighborhoodKind, Topology, TopologySelector};

/// Moore window layout: `[nw, n, ne, w, c, e, sw, s, se]`.
pub const CENTER: usize = 4;

/// A cell-update rule.
///
/// [`Rule::prepare`] runs once per generation and is the only place a rule
/// may read live parameters. The cell bodies ([`Rule::moore`] and
/// [`Rule::block`]) depend on nothing but their inputs, the parameters
/// resolved by `prepare`, and the supplied generator.
pub trait Rule<T: Pixel> {
    fn name(&self) -> &str;

    /// Whether the rule defines a transform for this neighborhood shape.
    fn supports(&self, kind: NeighborhoodKind) -> bool;

    fn selector(&self) -> &TopologySelector;

    fn set_selector(&mut self, selector: TopologySelector);

    /// Refreshes live parameters from the context. Does nothing by default.
    fn update(&mut self, _ctx: &dyn EvalContext) {}

    /// Resolves live parameters and the topology for the next generation.
    fn prepare(&mut self, ctx: &dyn EvalContext) -> Result<Topology, RasterError> {
        self.update(ctx);
        self.selector().resolve(ctx)
    }

    /// Maps a 3×3 window to the new center value.
    fn moore(&self, window: &[T; 9], _rng: &mut Xorshift64) -> T {
        window[CENTER]
    }

    /// Maps a 2×2 block `[tl, tr, bl, br]` to its replacement.
    fn block(&self, block: &[T; 4], _rng: &mut Xorshift64) -> [T; 4] {
        *block
    }

    /// Current settings as a JSON object.
    fn params(&self) -> Value {
        Value::Object(serde_json::Map::new())
    }
}

/// Fails with [`RasterError::InvalidTopology`] unless `rule` supports every
/// topology its selector can produce.
pub fn check_selector<T: Pixel, R: Rule<T> + ?Sized>(rule: &R) -> Result<(), RasterError> {
    for topology in rule.selector().candidates() {
        check_pairing(rule, topology)?;
    }
    Ok(())
}

/// Fails with [`RasterError::InvalidTopology`] unless `rule` supports `topology`.
pub fn check_pairing<T: Pixel, R: Rule<T> + ?Sized>(
    rule: &R,
    topology: Topology,
) -> Result<(), RasterError> {
    if rule.supports(topology.kind()) {
        Ok(())
    } else {
        Err(RasterError::InvalidTopology {
            rule: rule.name().to_owned(),
            topology: topology.to_string(),
        })
    }
}
