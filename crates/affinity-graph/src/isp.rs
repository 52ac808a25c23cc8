//! Synthetic ISP population
//!
//! ISPs are real-valued identifiers sampled from a normal distribution so
//! that most providers cluster around the mean. The mean and its
//! ± one-standard-deviation neighbours form the "base" ISP set every
//! province is guaranteed to route through.

use crate::{AffinityError, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, info};

pub const DEFAULT_ISP_COUNT: usize = 100;
pub const DEFAULT_ISP_MEAN: f64 = 0.0;
pub const DEFAULT_ISP_STDDEV: f64 = 1.0;

/// A provider identifier
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Isp(pub f64);

impl Isp {
    /// ISP of points built for geography-only comparisons
    pub const ZERO: Isp = Isp(0.0);

    pub fn value(self) -> f64 {
        self.0
    }

    /// Integer bucket used for base-ISP membership (truncation toward zero)
    pub fn bucket(self) -> i64 {
        self.0.trunc() as i64
    }
}

impl fmt::Display for Isp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ISP({:.6})", self.0)
    }
}

/// Distribution parameters for the ISP population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IspConfig {
    pub count: usize,
    pub mean: f64,
    pub stddev: f64,
    /// Fixed seed for bit-exact populations; OS entropy when unset
    pub seed: Option<u64>,
}

impl Default for IspConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_ISP_COUNT,
            mean: DEFAULT_ISP_MEAN,
            stddev: DEFAULT_ISP_STDDEV,
            seed: None,
        }
    }
}

impl IspConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.mean.is_finite() {
            return Err(AffinityError::InvalidDistribution(format!(
                "mean must be finite, got {}",
                self.mean
            )));
        }
        if !self.stddev.is_finite() || self.stddev < 0.0 {
            return Err(AffinityError::InvalidDistribution(format!(
                "stddev must be finite and non-negative, got {}",
                self.stddev
            )));
        }
        Ok(())
    }

    pub fn rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

/// Immutable population of sampled ISPs
#[derive(Debug, Clone, Serialize)]
pub struct IspPopulation {
    isps: Vec<Isp>,
    min: Option<Isp>,
    max: Option<Isp>,
    base_buckets: BTreeSet<i64>,
}

impl IspPopulation {
    /// Sample a population using the RNG described by `config`
    pub fn generate(config: &IspConfig) -> Result<Self> {
        let mut rng = config.rng();
        Self::populate(config, &mut rng)
    }

    /// Sample `config.count` ISPs from `rng`
    pub fn populate<R: Rng + ?Sized>(config: &IspConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let normal = Normal::new(config.mean, config.stddev)
            .map_err(|e| AffinityError::InvalidDistribution(e.to_string()))?;

        let isps: Vec<Isp> = (0..config.count).map(|_| Isp(normal.sample(rng))).collect();
        let min = isps.iter().copied().reduce(|a, b| if b < a { b } else { a });
        let max = isps.iter().copied().reduce(|a, b| if b > a { b } else { a });

        let base_buckets = [
            config.mean,
            config.mean - config.stddev,
            config.mean + config.stddev,
        ]
        .into_iter()
        .map(|v| Isp(v).bucket())
        .collect();

        let population = Self {
            isps,
            min,
            max,
            base_buckets,
        };

        info!(
            "Sampled {} ISPs from N({}, {}), base buckets {:?}",
            population.len(),
            config.mean,
            config.stddev,
            population.base_buckets
        );
        if let (Some(min), Some(max)) = (population.min, population.max) {
            debug!("ISP range {} ..= {}", min, max);
        }

        Ok(population)
    }

    /// Whether `isp` falls in one of the base buckets, sampled or not
    pub fn is_base(&self, isp: Isp) -> bool {
        self.base_buckets.contains(&isp.bucket())
    }

    pub fn base_buckets(&self) -> impl Iterator<Item = i64> + '_ {
        self.base_buckets.iter().copied()
    }

    /// ISP at `index` modulo the population size
    pub fn get(&self, index: usize) -> Option<Isp> {
        if self.isps.is_empty() {
            return None;
        }
        Some(self.isps[index % self.isps.len()])
    }

    pub fn as_slice(&self) -> &[Isp] {
        &self.isps
    }

    pub fn len(&self) -> usize {
        self.isps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.isps.is_empty()
    }

    pub fn min(&self) -> Option<Isp> {
        self.min
    }

    pub fn max(&self) -> Option<Isp> {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> IspConfig {
        IspConfig {
            seed: Some(seed),
            ..IspConfig::default()
        }
    }

    #[test]
    fn test_default_population() {
        let population = IspPopulation::generate(&seeded(1)).unwrap();
        assert_eq!(population.len(), DEFAULT_ISP_COUNT);

        let min = population.min().unwrap();
        let max = population.max().unwrap();
        assert!(min < max);
        assert!(population.as_slice().iter().all(|&isp| min <= isp && isp <= max));
        assert!(population.as_slice().contains(&min));
        assert!(population.as_slice().contains(&max));
    }

    #[test]
    fn test_seeded_population_is_reproducible() {
        let a = IspPopulation::generate(&seeded(42)).unwrap();
        let b = IspPopulation::generate(&seeded(42)).unwrap();
        let c = IspPopulation::generate(&seeded(43)).unwrap();

        assert_eq!(a.as_slice(), b.as_slice());
        assert_ne!(a.as_slice(), c.as_slice());
    }

    #[test]
    fn test_base_buckets() {
        let population = IspPopulation::generate(&seeded(7)).unwrap();
        assert_eq!(population.base_buckets().collect::<Vec<_>>(), vec![-1, 0, 1]);

        // Truncation toward zero: everything in (-2, 2) is base
        assert!(population.is_base(Isp::ZERO));
        assert!(population.is_base(Isp(0.73)));
        assert!(population.is_base(Isp(-1.99)));
        assert!(population.is_base(Isp(1.5)));
        assert!(!population.is_base(Isp(2.0)));
        assert!(!population.is_base(Isp(-2.4)));
    }

    #[test]
    fn test_base_buckets_follow_config() {
        let config = IspConfig {
            count: 10,
            mean: 5.0,
            stddev: 2.0,
            seed: Some(3),
        };
        let population = IspPopulation::generate(&config).unwrap();
        assert_eq!(population.base_buckets().collect::<Vec<_>>(), vec![3, 5, 7]);
        assert!(population.is_base(Isp(7.9)));
        assert!(!population.is_base(Isp(6.0)));
    }

    #[test]
    fn test_empty_population() {
        let config = IspConfig {
            count: 0,
            ..seeded(1)
        };
        let population = IspPopulation::generate(&config).unwrap();
        assert!(population.is_empty());
        assert!(population.min().is_none());
        assert!(population.max().is_none());
        assert!(population.get(5).is_none());
        assert!(population.is_base(Isp::ZERO));
    }

    #[test]
    fn test_get_wraps() {
        let population = IspPopulation::generate(&seeded(9)).unwrap();
        assert_eq!(population.get(3), population.get(3 + DEFAULT_ISP_COUNT));
        assert_eq!(population.get(0), Some(population.as_slice()[0]));
    }

    #[test]
    fn test_zero_stddev_collapses_to_mean() {
        let config = IspConfig {
            count: 5,
            mean: 0.5,
            stddev: 0.0,
            seed: Some(1),
        };
        let population = IspPopulation::generate(&config).unwrap();
        assert!(population.as_slice().iter().all(|&isp| isp == Isp(0.5)));
        assert_eq!(population.min(), population.max());
    }

    #[test]
    fn test_invalid_distribution() {
        for (mean, stddev) in [(0.0, -1.0), (0.0, f64::NAN), (f64::INFINITY, 1.0)] {
            let config = IspConfig {
                mean,
                stddev,
                ..seeded(1)
            };
            assert!(matches!(
                IspPopulation::generate(&config),
                Err(AffinityError::InvalidDistribution(_))
            ));
        }
    }

    #[test]
    fn test_isp_display_and_bucket() {
        assert_eq!(Isp(0.5).to_string(), "ISP(0.500000)");
        assert_eq!(Isp(-1.7).bucket(), -1);
        assert_eq!(Isp(2.3).bucket(), 2);
    }
}
