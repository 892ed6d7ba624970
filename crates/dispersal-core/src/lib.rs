pub mod config;
pub mod constants;
pub mod grid;
pub mod lookup;
pub mod mortality;
pub mod particle;
pub mod projection;
pub mod rng;
pub mod sampler;
pub mod spline;
pub mod time;

pub use config::{ConfigError, CoreConfig, MortalityConfig, MortalityKind};
pub use grid::{Grid, GridArray, GridError};
pub use lookup::{Bounds, IndexLookup, IndexLookupResult};
pub use mortality::{Exponential, Hazard, MortalityError, MortalityModel, Weibull};
pub use particle::{Particle, Position};
pub use projection::{Coordinate, Equirectangular, Projection, ProjectionError};
pub use sampler::{FieldSampler, LongitudeConvention};
pub use spline::{SplineError, SplineFunction, SplineInterpolator};
pub use time::TimeUnit;
