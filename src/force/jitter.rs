//! Seeded jitter source.
//!
//! Coincident nodes have no direction to push along, so the forces nudge them
//! apart by a tiny random offset. The offsets come from a 32-bit linear
//! congruential generator so that a fixed seed replays the exact same layout.

const LCG_A: u32 = 1_664_525;
const LCG_C: u32 = 1_013_904_223;
const LCG_M: f64 = 4_294_967_296.0;

/// Magnitude of a single jiggle.
const JIGGLE_SCALE: f64 = 1e-6;

/// Deterministic pseudo-random source for degenerate geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jitter {
    state: u32,
}

impl Jitter {
    /// Create a jitter source from a seed.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next value in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_mul(LCG_A).wrapping_add(LCG_C);
        self.state as f64 / LCG_M
    }

    /// A tiny non-zero offset centred on zero.
    pub fn jiggle(&mut self) -> f64 {
        loop {
            let offset = (self.next_f64() - 0.5) * JIGGLE_SCALE;
            if offset != 0.0 {
                return offset;
            }
        }
    }
}

impl Default for Jitter {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = Jitter::new(42);
        let mut b = Jitter::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_f64(), b.next_f64());
        }
    }

    #[test]
    fn test_values_in_unit_interval() {
        let mut jitter = Jitter::new(7);
        for _ in 0..1000 {
            let v = jitter.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_jiggle_is_tiny_and_non_zero() {
        let mut jitter = Jitter::default();
        for _ in 0..1000 {
            let j = jitter.jiggle();
            assert!(j != 0.0);
            assert!(j.abs() <= JIGGLE_SCALE / 2.0);
        }
    }
}
