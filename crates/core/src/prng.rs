//! Deterministic PRNG for reproducible generations.
//!
//! Every random decision an automaton makes (probability gates, random
//! Margolus phases, block rotations) draws from one seeded [`Xorshift64`],
//! so the same seed and input always produce the same output.

use serde::{Deserialize, Serialize};

/// Xorshift64 generator with shifts (13, 7, 17).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    /// Replaces a zero seed, which is a fixed point of xorshift.
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform in [0, 1), from the top 24 bits.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u32 << 24) as f32
    }

    /// A fair coin.
    pub fn next_bool(&mut self) -> bool {
        self.next_u64() >> 63 == 1
    }

    /// True with probability `p` (clamped to [0, 1]).
    ///
    /// `p >= 1` and `p <= 0` are decided without drawing, so a gate that is
    /// always open does not disturb the sequence.
    pub fn chance(&mut self, p: f32) -> bool {
        if p >= 1.0 {
            true
        } else if p <= 0.0 {
            false
        } else {
            self.next_f32() < p
        }
    }

    /// Uniform in [0, max). `max` must be non-zero.
    pub fn next_below(&mut self, max: u32) -> u32 {
        ((self.next_u64() >> 32) * max as u64 >> 32) as u32
    }
}
