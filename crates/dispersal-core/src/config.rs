use crate::constants::{DEFAULT_MORTALITY_INTERVAL_MS, EARTH_RADIUS_M};
use crate::mortality::{MortalityError, MortalityModel};
use crate::projection::{Equirectangular, ProjectionError};
use crate::rng::derive_stream_seed;
use crate::sampler::LongitudeConvention;
use crate::time::TimeUnit;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MortalityKind {
    #[default]
    #[serde(alias = "Exponential")]
    Exponential,
    #[serde(alias = "Weibull")]
    Weibull,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MortalityConfig {
    /// Hazard family used for every particle.
    pub kind: MortalityKind,
    /// Exponential mortality rate, deaths per `units`.
    pub rate: f64,
    /// Weibull scale parameter, in `units`.
    pub weibull_lambda: f64,
    /// Weibull shape parameter.
    pub weibull_k: f64,
    /// Time unit in which `rate` and `weibull_lambda` are expressed.
    pub units: TimeUnit,
    /// Interval over which mortality is charged each tick (milliseconds).
    pub interval_ms: i64,
}

impl Default for MortalityConfig {
    fn default() -> Self {
        Self {
            kind: MortalityKind::Exponential,
            rate: 0.0,
            weibull_lambda: 1.0 / 0.0635,
            weibull_k: 0.7559,
            units: TimeUnit::Days,
            interval_ms: DEFAULT_MORTALITY_INTERVAL_MS,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Reference sphere radius (metres).
    pub radius_m: f64,
    /// Central meridian (degrees east).
    pub origin_lon: f64,
    /// Standard parallel (degrees north).
    pub origin_lat: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            radius_m: EARTH_RADIUS_M,
            origin_lon: 0.0,
            origin_lat: 0.0,
        }
    }
}

impl ProjectionConfig {
    pub fn build(&self) -> Result<Equirectangular, ProjectionError> {
        Equirectangular::new(self.radius_m, self.origin_lon, self.origin_lat)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SamplerConfig {
    /// Longitude convention of the environmental grids.
    pub longitude: LongitudeConvention,
}

/// Constructor inputs for the survival and sampling core.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CoreConfig {
    /// Base seed; every mortality stream is derived from it.
    pub seed: u64,
    pub mortality: MortalityConfig,
    pub projection: ProjectionConfig,
    pub sampler: SamplerConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            mortality: MortalityConfig::default(),
            projection: ProjectionConfig::default(),
            sampler: SamplerConfig::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("mortality.interval_ms must be positive, got {0}")]
    InvalidInterval(i64),
    #[error("invalid mortality parameters: {0}")]
    Mortality(#[from] MortalityError),
    #[error("invalid projection parameters: {0}")]
    Projection(#[from] ProjectionError),
}

impl CoreConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every parameter that would otherwise fail at construction time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mortality.interval_ms <= 0 {
            return Err(ConfigError::InvalidInterval(self.mortality.interval_ms));
        }
        MortalityModel::from_config(&self.mortality, self.seed)?;
        self.projection.build()?;
        Ok(())
    }

    /// Mortality model for one worker or particle stream.
    pub fn mortality_model(&self, stream: u64) -> Result<MortalityModel, MortalityError> {
        MortalityModel::from_config(&self.mortality, derive_stream_seed(self.seed, stream))
    }
}
