use crate::error::ConfigError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Anything that can produce the next scalar reading.
pub trait SampleSource {
    fn next_value(&mut self) -> f64;
}

impl<F: FnMut() -> f64> SampleSource for F {
    fn next_value(&mut self) -> f64 {
        self()
    }
}

/// Simulated activity feed: uniform draws over `[low, high]`.
#[derive(Debug)]
pub struct UniformSource {
    low: f64,
    high: f64,
    rng: StdRng,
}

impl UniformSource {
    pub fn new(low: f64, high: f64) -> Result<Self, ConfigError> {
        Self::build(low, high, StdRng::from_entropy())
    }

    /// Same draws for the same seed.
    pub fn seeded(low: f64, high: f64, seed: u64) -> Result<Self, ConfigError> {
        Self::build(low, high, StdRng::seed_from_u64(seed))
    }

    fn build(low: f64, high: f64, rng: StdRng) -> Result<Self, ConfigError> {
        if !low.is_finite() || !high.is_finite() {
            return Err(ConfigError::invalid("value range", "bounds must be finite"));
        }
        if low > high {
            return Err(ConfigError::invalid(
                "value range",
                format!("min {low} is greater than max {high}"),
            ));
        }
        Ok(Self { low, high, rng })
    }
}

impl SampleSource for UniformSource {
    fn next_value(&mut self) -> f64 {
        self.rng.gen_range(self.low..=self.high)
    }
}
