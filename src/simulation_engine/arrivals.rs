// arrivals.rs
use crate::error::{Result, SimError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Rates below this use Knuth's multiplication method; rates at or above it use
/// transformed rejection, whose cost does not grow with the rate.
const PTRS_THRESHOLD: f64 = 10.0;

/// Below this count `log_poisson_pmf` sums `ln k!` directly.
const STIRLING_FROM: f64 = 30.0;

/// Draws per-lane vehicle arrival counts for one simulation step.
///
/// Each lane's count is an independent Poisson draw whose mean is the lane's
/// configured arrival rate. The sampler owns its generator, so two samplers never
/// share random state.
#[derive(Debug, Clone)]
pub struct ArrivalSampler<R = ChaCha8Rng> {
    rng: R,
}

impl ArrivalSampler<ChaCha8Rng> {
    /// Reproducible sampler: the same seed and rates always give the same counts.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Non-reproducible sampler seeded from the thread-local OS-seeded generator.
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_rng(&mut rand::rng()),
        }
    }
}

impl<R: Rng> ArrivalSampler<R> {
    /// Wraps any random source, e.g. a `StdRng` or a mocked generator in tests.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Samples one arrival count per rate.
    ///
    /// Every rate is validated before the first draw, so a bad rate consumes no
    /// entropy and produces no partial result.
    pub fn sample(&mut self, rates: &[f64]) -> Result<Vec<u64>> {
        validate_rates(rates)?;
        Ok(rates
            .iter()
            .map(|&rate| poisson_sample(&mut self.rng, rate))
            .collect())
    }

    /// Samples a single rate with no lane context.
    ///
    /// An invalid rate is reported as `InvalidRate` on lane 0, the same index a
    /// one-element `sample` call would report.
    pub fn sample_one(&mut self, rate: f64) -> Result<u64> {
        validate_rates(&[rate])?;
        Ok(poisson_sample(&mut self.rng, rate))
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

/// A rate is usable when it is a finite, non-negative number.
pub fn is_valid_rate(rate: f64) -> bool {
    rate.is_finite() && rate >= 0.0
}

/// Checks a whole rate vector, reporting the first offending lane.
pub fn validate_rates(rates: &[f64]) -> Result<()> {
    match rates.iter().position(|&rate| !is_valid_rate(rate)) {
        Some(lane) => Err(SimError::InvalidRate {
            junction: None,
            lane,
            rate: rates[lane],
        }),
        None => Ok(()),
    }
}

/// Poisson draw for any non-negative finite mean, in time independent of the mean.
///
/// Counts beyond `u64::MAX` (only reachable for means above ~1.8e19) saturate
/// to `u64::MAX`.
pub fn poisson_sample<R: Rng + ?Sized>(rng: &mut R, lambda: f64) -> u64 {
    if lambda < PTRS_THRESHOLD {
        knuth_sample(rng, lambda)
    } else {
        // float-to-int `as` saturates
        ptrs_sample(rng, lambda) as u64
    }
}

// Knuth's multiplication method, exact for small lambda.
fn knuth_sample<R: Rng + ?Sized>(rng: &mut R, lambda: f64) -> u64 {
    if lambda <= 0.0 {
        return 0;
    }
    let limit = (-lambda).exp();
    let mut k: u64 = 0;
    let mut p: f64 = 1.0;
    loop {
        k += 1;
        p *= rng.random::<f64>();
        if p <= limit {
            return k - 1;
        }
    }
}

// Hörmann's transformed rejection with squeeze (PTRS), lambda >= 10.
// Acceptance is above 90% for every lambda, so the expected number of loop
// iterations is bounded by a small constant.
fn ptrs_sample<R: Rng + ?Sized>(rng: &mut R, lambda: f64) -> f64 {
    let slam = lambda.sqrt();
    let b = 0.931 + 2.53 * slam;
    let a = -0.059 + 0.02483 * b;
    let inv_alpha = 1.1239 + 1.1328 / (b - 3.4);
    let v_r = 0.9277 - 3.6224 / (b - 2.0);

    loop {
        let u = rng.random::<f64>() - 0.5;
        let v = rng.random::<f64>();
        let us = 0.5 - u.abs();
        let k = ((2.0 * a / us + b) * u + lambda + 0.43).floor();

        if us >= 0.07 && v <= v_r {
            return k;
        }
        if k < 0.0 || (us < 0.013 && v > us) {
            continue;
        }
        let lhs = v.ln() + inv_alpha.ln() - (a / (us * us) + b).ln();
        if lhs <= log_poisson_pmf(k, lambda) {
            return k;
        }
    }
}

/// `ln P(X = k)` for `X ~ Poisson(lambda)`.
///
/// For large `k` this is written around the saddle point, `-lambda * g((k - lambda) / lambda)`
/// with `g(x) = (1 + x) ln(1 + x) - x`, so no two huge terms are subtracted and the
/// value stays accurate for any finite `lambda`.
fn log_poisson_pmf(k: f64, lambda: f64) -> f64 {
    if k < STIRLING_FROM {
        let ln_factorial: f64 = (2..=k as u64).map(|i| (i as f64).ln()).sum();
        return -lambda + k * lambda.ln() - ln_factorial;
    }
    let x = (k - lambda) / lambda;
    -lambda * saddle_g(x) - 0.5 * (2.0 * std::f64::consts::PI * k).ln() - stirling_tail(k)
}

// (1 + x) ln(1 + x) - x, with a power series near 0 where the closed form cancels.
fn saddle_g(x: f64) -> f64 {
    if x.abs() < 0.1 {
        // sum over n >= 2 of (-1)^n x^n / (n (n - 1))
        let mut term = x * x;
        let mut sum = 0.0;
        for n in 2..=16 {
            let n = n as f64;
            sum += term / (n * (n - 1.0));
            term *= -x;
        }
        sum
    } else {
        (1.0 + x) * x.ln_1p() - x
    }
}

// ln k! - (k ln k - k + ln(2 pi k) / 2)
fn stirling_tail(k: f64) -> f64 {
    let k2 = k * k;
    1.0 / (12.0 * k) - 1.0 / (360.0 * k * k2) + 1.0 / (1260.0 * k * k2 * k2)
}
