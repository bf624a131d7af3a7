//! The automaton: drives one generation of a [`Rule`] over a
//! [`DoubleBuffer`] per call.
//!
//! A generation resolves the rule's live parameters and topology, validates
//! everything it is about to touch, scans the front buffer into the back
//! buffer, then advances the frame counter and swaps. A failing generation
//! returns before any of that state changes.

use raster_synth_core::{
    DoubleBuffer, Effect, EvalContext, Pixel, PixelBuffer, RasterError, Xorshift64,
};
use serde_json::{json, Value};

use crate::gate::Gates;
use crate::rule::{check_pairing, check_selector, Rule};
use crate::target::{Guide, Target};
use crate::topology::{block_origin, Topology};

/// Seed used when none is given.
pub const DEFAULT_SEED: u64 = 42;

/// Lifecycle state, a pure function of the frame counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Frame 0: the generation copies its input through unchanged.
    WarmUp,
    Running,
}

/// A cellular automaton bound to one rule.
pub struct Automaton<T: Pixel, R: Rule<T>> {
    rule: R,
    frame: u64,
    gates: Gates,
    target: Option<Target<T>>,
    rng: Xorshift64,
    warned_odd: bool,
}

impl<T: Pixel, R: Rule<T>> Automaton<T, R> {
    /// Wraps `rule`. Fails with [`RasterError::InvalidTopology`] if the
    /// rule's own selector can produce a topology the rule does not support.
    pub fn new(rule: R) -> Result<Self, RasterError> {
        check_selector(&rule)?;
        Ok(Self {
            rule,
            frame: 0,
            gates: Gates::default(),
            target: None,
            rng: Xorshift64::new(DEFAULT_SEED),
            warned_odd: false,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Xorshift64::new(seed);
        self
    }

    pub fn with_gates(mut self, gates: Gates) -> Result<Self, RasterError> {
        gates.validate()?;
        self.gates = gates;
        Ok(self)
    }

    pub fn with_target(mut self, target: Target<T>) -> Self {
        self.target = Some(target);
        self
    }

    pub fn set_target(&mut self, target: Option<Target<T>>) {
        self.target = target;
    }

    pub fn target(&self) -> Option<&Target<T>> {
        self.target.as_ref()
    }

    pub fn target_mut(&mut self) -> Option<&mut Target<T>> {
        self.target.as_mut()
    }

    pub fn rule(&self) -> &R {
        &self.rule
    }

    pub fn rule_mut(&mut self) -> &mut R {
        &mut self.rule
    }

    pub fn gates(&self) -> &Gates {
        &self.gates
    }

    /// Generations completed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn phase(&self) -> Phase {
        if self.frame == 0 {
            Phase::WarmUp
        } else {
            Phase::Running
        }
    }

    /// Advances one generation.
    ///
    /// # Errors
    ///
    /// - [`RasterError::MissingBuffer`] if `buffers` (or the target) has no image
    /// - [`RasterError::InvalidTopology`] if the resolved topology does not
    ///   suit the rule
    /// - [`RasterError::DimensionMismatch`] if the target is a different size
    /// - [`RasterError::InvalidDimensions`] for a Margolus step on a grid
    ///   narrower or shorter than 2
    pub fn step(
        &mut self,
        buffers: &mut DoubleBuffer<T>,
        ctx: &dyn EvalContext,
    ) -> Result<(), RasterError> {
        let topology = self.rule.prepare(ctx)?;
        check_pairing(&self.rule, topology)?;

        let dim = buffers.front()?.dim();
        let guide = match &self.target {
            Some(target) => Some(Guide {
                data: target.check_dim(dim)?.data(),
                metric: target.metric(),
            }),
            None => None,
        };
        if matches!(topology, Topology::Margolus(_)) && (dim.0 < 2 || dim.1 < 2) {
            return Err(RasterError::InvalidDimensions(format!(
                "margolus blocks need at least 2x2 cells, got {}x{}",
                dim.0, dim.1
            )));
        }

        let phase = self.phase();
        let (front, back) = buffers.split_mut()?;
        back.set_logical_bounds(front.logical_bounds());
        match (phase, topology) {
            (Phase::WarmUp, _) => back.copy_from(front)?,
            (Phase::Running, Topology::Moore) => {
                moore_scan(&self.rule, &self.gates, guide, &mut self.rng, front, back);
            }
            (Phase::Running, Topology::Margolus(variant)) => {
                let (w, h) = dim;
                if (w % 2 == 1 || h % 2 == 1) && !self.warned_odd {
                    tracing::warn!(
                        width = w,
                        height = h,
                        "odd grid size leaves one row or column outside every margolus block"
                    );
                    self.warned_odd = true;
                }
                let origin = block_origin(variant.phase(self.frame, &mut self.rng), w, h);
                back.copy_from(front)?;
                margolus_scan(&self.rule, &self.gates, guide, &mut self.rng, origin, front, back);
            }
        }

        tracing::debug!(
            rule = self.rule.name(),
            %topology,
            frame = self.frame,
            ?phase,
            "generation complete"
        );
        self.frame += 1;
        buffers.swap();
        Ok(())
    }
}

/// One output cell per input cell from a rolling 3×3 window.
///
/// Row wrap is resolved once per row and column wrap only at the first and
/// last column; the window shifts one column per cell.
fn moore_scan<T: Pixel, R: Rule<T>>(
    rule: &R,
    gates: &Gates,
    guide: Option<Guide<'_, T>>,
    rng: &mut Xorshift64,
    src: &PixelBuffer<T>,
    dst: &mut PixelBuffer<T>,
) {
    let (w, h) = src.dim();
    if w == 0 || h == 0 {
        return;
    }
    let data = src.data();
    let out = dst.data_mut();
    for y in 0..h {
        let up = if y == 0 { h - 1 } else { y - 1 };
        let down = if y == h - 1 { 0 } else { y + 1 };
        let rows = [up * w, y * w, down * w];
        let east0 = if w == 1 { 0 } else { 1 };

        let mut window = [T::zero(); 9];
        for (r, &row) in rows.iter().enumerate() {
            window[r * 3] = data[row + w - 1];
            window[r * 3 + 1] = data[row];
            window[r * 3 + 2] = data[row + east0];
        }

        for x in 0..w {
            if x > 0 {
                let east = if x == w - 1 { 0 } else { x + 1 };
                for (r, &row) in rows.iter().enumerate() {
                    window[r * 3] = window[r * 3 + 1];
                    window[r * 3 + 1] = window[r * 3 + 2];
                    window[r * 3 + 2] = data[row + east];
                }
            }
            let center = window[4];
            let touches_edge = x == 0 || y == 0 || x == w - 1 || y == h - 1;
            let proposal = if gates.admit(&window, touches_edge, rng) {
                rule.moore(&window, rng)
            } else {
                center
            };
            let index = y * w + x;
            out[index] = match guide {
                Some(g) => g.choose_cell(index, center, proposal),
                None => proposal,
            };
        }
    }
}

/// Rewrites every 2×2 block of the grid whose first block starts at
/// `origin`. Blocks past the right or bottom edge wrap around. `dst` must
/// already hold a copy of `src` so cells outside every block pass through.
fn margolus_scan<T: Pixel, R: Rule<T>>(
    rule: &R,
    gates: &Gates,
    guide: Option<Guide<'_, T>>,
    rng: &mut Xorshift64,
    origin: (usize, usize),
    src: &PixelBuffer<T>,
    dst: &mut PixelBuffer<T>,
) {
    let (w, h) = src.dim();
    let data = src.data();
    let out = dst.data_mut();
    let on_edge = |x: usize, max: usize| x == 0 || x == max - 1;
    for by in 0..h / 2 {
        let y0 = (origin.1 + 2 * by) % h;
        let y1 = (y0 + 1) % h;
        for bx in 0..w / 2 {
            let x0 = (origin.0 + 2 * bx) % w;
            let x1 = (x0 + 1) % w;
            let indices = [y0 * w + x0, y0 * w + x1, y1 * w + x0, y1 * w + x1];
            let cells = indices.map(|i| data[i]);
            let touches_edge =
                on_edge(x0, w) || on_edge(x1, w) || on_edge(y0, h) || on_edge(y1, h);
            let proposal = if gates.admit(&cells, touches_edge, rng) {
                rule.block(&cells, rng)
            } else {
                cells
            };
            let result = match guide {
                Some(g) => g.choose_block(&indices, cells, proposal),
                None => proposal,
            };
            for (&i, v) in indices.iter().zip(result) {
                out[i] = v;
            }
        }
    }
}

impl<T: Pixel, R: Rule<T>> Effect<T> for Automaton<T, R> {
    fn name(&self) -> &str {
        self.rule.name()
    }

    fn apply(
        &mut self,
        buffers: &mut DoubleBuffer<T>,
        ctx: &dyn EvalContext,
    ) -> Result<(), RasterError> {
        self.step(buffers, ctx)
    }

    fn params(&self) -> Value {
        json!({
            "rule": self.rule.name(),
            "frame": self.frame,
            "gates": {
                "probability": self.gates.probability,
                "edges": self.gates.edges,
                "brightness": self.gates.brightness.map(|(lo, hi)| [lo, hi]),
            },
            "targeted": self.target.is_some(),
            "rule_params": self.rule.params(),
        })
    }
}
