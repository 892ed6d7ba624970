use crate::config::{MortalityConfig, MortalityKind};
use crate::particle::Particle;
use crate::rng::{create_rng, derive_stream_seed};
use crate::time::TimeUnit;
use rand::Rng;
use rand_chacha::ChaCha12Rng;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MortalityError {
    #[error("mortality rate must be finite and non-negative, got {0}")]
    InvalidRate(f64),
    #[error("weibull scale (lambda) must be finite and positive, got {0}")]
    InvalidScale(f64),
    #[error("weibull shape (k) must be finite and positive, got {0}")]
    InvalidShape(f64),
}

/// Constant hazard: survival over an interval `dt` is `exp(-rate * dt)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Exponential {
    rate: f64,
    unit: TimeUnit,
    rate_per_ms: f64,
}

impl Exponential {
    /// `rate` is the expected number of deaths per `unit` of time.
    pub fn new(rate: f64, unit: TimeUnit) -> Result<Self, MortalityError> {
        if !(rate.is_finite() && rate >= 0.0) {
            return Err(MortalityError::InvalidRate(rate));
        }
        Ok(Self {
            rate,
            unit,
            rate_per_ms: rate / unit.millis(),
        })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Probability of surviving `interval_ms`.
    pub fn survival(&self, interval_ms: f64) -> f64 {
        (-self.rate_per_ms * interval_ms).exp()
    }
}

/// Weibull survivorship `S(t) = exp(-(t / lambda)^k)`, `t` in `unit`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Weibull {
    lambda: f64,
    k: f64,
    unit: TimeUnit,
}

impl Weibull {
    pub fn new(lambda: f64, k: f64, unit: TimeUnit) -> Result<Self, MortalityError> {
        if !(lambda.is_finite() && lambda > 0.0) {
            return Err(MortalityError::InvalidScale(lambda));
        }
        if !(k.is_finite() && k > 0.0) {
            return Err(MortalityError::InvalidShape(k));
        }
        Ok(Self { lambda, k, unit })
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn k(&self) -> f64 {
        self.k
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// `S(t)`; ages at or before release survive with certainty.
    pub fn survivorship(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 1.0;
        }
        (-(t / self.lambda).powf(self.k)).exp()
    }

    /// Probability of dying during the `interval_ms` that ends at `age_ms`,
    /// given survival to its start: `(S(t0) - S(t1)) / S(t0)`.
    pub fn death_probability(&self, age_ms: i64, interval_ms: f64) -> f64 {
        let t1 = self.unit.from_millis(age_ms as f64);
        let t0 = t1 - self.unit.from_millis(interval_ms);
        let s0 = self.survivorship(t0);
        if s0 <= 0.0 {
            return 1.0;
        }
        let s1 = self.survivorship(t1);
        ((s0 - s1) / s0).clamp(0.0, 1.0)
    }
}

/// Hazard functions available to a [`MortalityModel`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Hazard {
    Exponential(Exponential),
    Weibull(Weibull),
}

impl Hazard {
    /// Probability that a particle of age `age_ms` dies within the interval
    /// of `interval_ms` ending now.
    pub fn death_probability(&self, age_ms: i64, interval_ms: f64) -> f64 {
        match self {
            Hazard::Exponential(e) => 1.0 - e.survival(interval_ms),
            Hazard::Weibull(w) => w.death_probability(age_ms, interval_ms),
        }
    }

    fn kills(&self, draw: f64, age_ms: i64, interval_ms: f64) -> bool {
        match self {
            Hazard::Exponential(e) => draw > e.survival(interval_ms),
            Hazard::Weibull(w) => draw < w.death_probability(age_ms, interval_ms),
        }
    }
}

/// Stochastic per-tick mortality. Each instance owns its random stream, so
/// concurrent workers must each hold their own [`fork`](Self::fork).
///
/// Both hazards take the tick interval at call time. The Weibull hazard also
/// reads the particle's age, which is expected to already include the
/// interval being charged.
#[derive(Debug)]
pub struct MortalityModel {
    hazard: Hazard,
    seed: u64,
    rng: ChaCha12Rng,
}

impl MortalityModel {
    pub fn new(hazard: Hazard, seed: u64) -> Self {
        Self {
            hazard,
            seed,
            rng: create_rng(seed),
        }
    }

    pub fn from_config(config: &MortalityConfig, seed: u64) -> Result<Self, MortalityError> {
        let hazard = match config.kind {
            MortalityKind::Exponential => {
                Hazard::Exponential(Exponential::new(config.rate, config.units)?)
            }
            MortalityKind::Weibull => Hazard::Weibull(Weibull::new(
                config.weibull_lambda,
                config.weibull_k,
                config.units,
            )?),
        };
        debug!(?hazard, seed, "mortality model configured");
        Ok(Self::new(hazard, seed))
    }

    pub fn hazard(&self) -> &Hazard {
        &self.hazard
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Apply one interval of mortality. Returns `true` if the particle died
    /// in this call. Dead particles are skipped and consume no draw.
    pub fn apply(&mut self, particle: &mut Particle, interval_ms: i64) -> bool {
        self.apply_cycles(particle, interval_ms, 1.0)
    }

    /// As [`apply`](Self::apply) with the interval scaled by `cycles`, for
    /// sub-stepped application within a nominal tick. Negative or NaN cycles
    /// are treated as zero.
    pub fn apply_cycles(&mut self, particle: &mut Particle, interval_ms: i64, cycles: f64) -> bool {
        if !particle.alive {
            return false;
        }
        let interval = interval_ms as f64 * cycles.max(0.0);
        let draw: f64 = self.rng.random();
        if self.hazard.kills(draw, particle.age_ms, interval) {
            particle.kill();
            return true;
        }
        false
    }

    /// New model with the same hazard and an independent stream seeded from
    /// this model's seed and `stream`. The source stream is left untouched.
    pub fn fork(&self, stream: u64) -> Self {
        Self::new(self.hazard, derive_stream_seed(self.seed, stream))
    }
}
