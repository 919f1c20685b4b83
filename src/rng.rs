use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The single seeded generator every vehicle draws from. Draws happen in
/// event-processing order, so a fixed seed replays the same run.
#[derive(Clone, Debug)]
pub struct RandomStream {
    rng: StdRng,
}

impl RandomStream {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform duration over the inclusive millisecond range.
    pub fn next_interval(&mut self, low_ms: u64, high_ms: u64) -> u64 {
        self.rng.gen_range(low_ms..=high_ms)
    }

    /// Uniform index in `0..len`.
    pub fn next_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// Uniform real in `low..high`; a degenerate range yields `low` without
    /// consuming a draw.
    pub fn next_value(&mut self, low: f64, high: f64) -> f64 {
        if low >= high {
            return low;
        }
        self.rng.gen_range(low..high)
    }
}
