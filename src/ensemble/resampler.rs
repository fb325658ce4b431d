//! Online bootstrap resampling
//!
//! The number of times an example appears in a bootstrap replicate of an
//! unbounded stream tends to Poisson(1), so each member draws its own count
//! per example instead of storing and resampling the data.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Poisson};

use crate::error::{DriftBaggingError, Result};

/// Seeded Poisson draw source shared by all ensemble slots
#[derive(Debug, Clone)]
pub struct PoissonResampler {
    distribution: Poisson<f64>,
    rng: ChaCha8Rng,
    seed: u64,
}

impl PoissonResampler {
    /// Create a resampler with mean `lambda`
    pub fn new(lambda: f64, seed: u64) -> Result<Self> {
        let distribution = Poisson::new(lambda).map_err(|e| DriftBaggingError::InvalidParameter {
            name: "poisson_lambda".to_string(),
            value: lambda.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            distribution,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        })
    }

    /// Poisson(1) resampler
    pub fn standard(seed: u64) -> Result<Self> {
        Self::new(1.0, seed)
    }

    /// Next replication count
    pub fn draw(&mut self) -> u32 {
        self.distribution.sample(&mut self.rng) as u32
    }

    /// `n` consecutive counts, in draw order
    pub fn draw_many(&mut self, n: usize) -> Vec<u32> {
        (0..n).map(|_| self.draw()).collect()
    }

    /// Restart the stream from the configured seed
    pub fn reseed(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = PoissonResampler::standard(7).unwrap();
        let mut b = PoissonResampler::standard(7).unwrap();
        assert_eq!(a.draw_many(100), b.draw_many(100));
    }

    #[test]
    fn test_reseed_replays_stream() {
        let mut r = PoissonResampler::standard(3).unwrap();
        let first = r.draw_many(50);
        r.reseed();
        assert_eq!(r.draw_many(50), first);
    }

    #[test]
    fn test_poisson_one_moments() {
        let mut r = PoissonResampler::standard(42).unwrap();
        let n = 50_000;
        let draws = r.draw_many(n);

        let mean = draws.iter().map(|&k| k as f64).sum::<f64>() / n as f64;
        let var = draws.iter().map(|&k| (k as f64 - mean).powi(2)).sum::<f64>() / n as f64;
        let zeros = draws.iter().filter(|&&k| k == 0).count() as f64 / n as f64;

        assert!((mean - 1.0).abs() < 0.03, "mean {}", mean);
        assert!((var - 1.0).abs() < 0.05, "variance {}", var);
        // P(k = 0) = e^-1
        assert!((zeros - (-1.0f64).exp()).abs() < 0.01, "p0 {}", zeros);
    }

    #[test]
    fn test_invalid_lambda() {
        assert!(PoissonResampler::new(0.0, 1).is_err());
        assert!(PoissonResampler::new(-2.0, 1).is_err());
    }
}
