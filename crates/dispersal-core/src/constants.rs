/// Equatorial radius of the WGS84 ellipsoid (metres). Reference radius for the
/// equirectangular projection.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Prime multiplier used to derive per-stream RNG seeds from a base seed.
/// Chosen so streams for consecutive stream ids have minimal overlap.
pub const RNG_DERIVATION_PRIME: u64 = 7919;

/// Default mortality sub-interval: two hours.
pub const DEFAULT_MORTALITY_INTERVAL_MS: i64 = 7_200_000;

/// Minimum number of knots accepted by the spline interpolator.
pub const MIN_SPLINE_POINTS: usize = 3;
