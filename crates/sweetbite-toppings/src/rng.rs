//! Random sources for spawn jitter, velocity, orientation and scale
//!
//! The simulation only needs uniform floats. `ToppingRng` is a seedable
//! xorshift32 so tests can replay exact spawns; hosts that already carry a
//! `rand` generator can hand it in instead.

use rand::rngs::StdRng;
use rand::Rng;

/// Uniform float source consumed by the emitter
pub trait RandomSource {
    /// Returns a float in [0, 1)
    fn next_f32(&mut self) -> f32;

    /// Returns a float in [min, max), or exactly `min` when the range is empty
    fn range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        min + self.next_f32() * (max - min)
    }
}

/// Lightweight xorshift32 PRNG
#[derive(Debug, Clone)]
pub struct ToppingRng {
    state: u32,
}

impl ToppingRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Seed from the thread-local system generator
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u32>())
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

impl Default for ToppingRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for ToppingRng {
    fn next_f32(&mut self) -> f32 {
        // Top 24 bits fill the f32 mantissa exactly, so the result stays below 1.0
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }
}

impl RandomSource for StdRng {
    fn next_f32(&mut self) -> f32 {
        self.random::<f32>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn rng_range_bounds() {
        let mut rng = ToppingRng::new(42);
        for _ in 0..1000 {
            let v = rng.range(0.0, 10.0);
            assert!((0.0..=10.0).contains(&v));
        }
    }

    #[test]
    fn unit_interval_is_half_open() {
        let mut rng = ToppingRng::new(7);
        for _ in 0..10_000 {
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = ToppingRng::new(1234);
        let mut b = ToppingRng::new(1234);
        for _ in 0..32 {
            assert_eq!(a.next_f32().to_bits(), b.next_f32().to_bits());
        }
    }

    #[test]
    fn zero_seed_is_usable() {
        let mut rng = ToppingRng::new(0);
        let first = rng.next_f32();
        let second = rng.next_f32();
        assert_ne!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn empty_range_returns_min() {
        let mut rng = ToppingRng::new(99);
        assert_eq!(rng.range(-1.0, -1.0), -1.0);
        assert_eq!(rng.range(2.0, 1.0), 2.0);
    }

    #[test]
    fn std_rng_is_a_source() {
        let mut rng = StdRng::seed_from_u64(5);
        let v = rng.range(0.8, 1.2);
        assert!((0.8..=1.2).contains(&v));
    }
}
