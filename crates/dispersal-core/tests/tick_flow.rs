use dispersal_core::{
    Coordinate, CoreConfig, Equirectangular, FieldSampler, GridArray, LongitudeConvention,
    MortalityConfig, MortalityKind, Particle, Position, Projection, SplineInterpolator,
};
use std::sync::Arc;

const HOUR_MS: i64 = 3_600_000;

/// Sea temperature on a 0.5 degree grid straddling the antimeridian, hourly.
fn temperature_grid() -> GridArray {
    let times: Vec<f64> = (0..48).map(|h| (h * HOUR_MS) as f64).collect();
    let lats: Vec<f64> = (0..20).map(|i| -20.0 + 0.5 * i as f64).collect();
    let lons: Vec<f64> = (0..20).map(|j| 175.0 + 0.5 * j as f64).collect();
    GridArray::from_fn(times, lats, lons, |t, i, _| 20.0 + 0.1 * i as f64 + 0.01 * t as f64)
        .expect("grid should build")
}

#[test]
fn driver_tick_samples_covariates_and_applies_mortality() {
    let config = CoreConfig {
        mortality: MortalityConfig {
            kind: MortalityKind::Weibull,
            interval_ms: HOUR_MS,
            ..MortalityConfig::default()
        },
        sampler: dispersal_core::config::SamplerConfig {
            longitude: LongitudeConvention::Unsigned360,
        },
        ..CoreConfig::default()
    };
    config.validate().expect("config should be valid");

    let grid = Arc::new(temperature_grid());
    let sampler =
        FieldSampler::new(Arc::clone(&grid), config.sampler.longitude).expect("sampler");

    // Released just west of the antimeridian, described in signed degrees.
    let mut particles: Vec<Particle> = (0..200)
        .map(|id| Particle::new(id, Position::new(-178.0, -15.0, 10.0)))
        .collect();
    let mut model = config.mortality_model(0).expect("mortality model");

    for tick in 1..=24 {
        let now = (tick * HOUR_MS) as f64;
        for p in particles.iter_mut().filter(|p| p.alive) {
            p.advance_age(config.mortality.interval_ms);
            model.apply(p, config.mortality.interval_ms);
            let temp = sampler
                .value(now, p.position.lon, p.position.lat)
                .expect("release site lies inside the grid");
            assert!((20.0..22.0).contains(&temp));
        }
    }
    assert!(sampler.value(1e12, -178.0, -15.0).is_none(), "beyond the time axis");

    let alive = particles.iter().filter(|p| p.alive).count();
    assert!(alive < 200, "a day of Weibull mortality should remove someone");
    assert!(particles.iter().all(|p| p.alive || p.age_ms <= 24 * HOUR_MS));
}

#[test]
fn release_polygon_centroid_and_resampled_series() {
    let projection: Equirectangular = CoreConfig::default()
        .projection
        .build()
        .expect("default projection");
    let reef = [
        Coordinate::xy(145.0, -16.0),
        Coordinate::xy(146.0, -16.0),
        Coordinate::xy(146.0, -15.0),
        Coordinate::xy(145.0, -15.0),
    ];
    let centre = projection.polygon_centroid(&reef).expect("non-empty polygon");
    let round_trip = projection.inverse(projection.forward(centre));
    assert!((round_trip.x - 145.5).abs() < 1e-9 && (round_trip.y + 15.5).abs() < 1e-9);

    // Daily river discharge resampled onto an hourly clock.
    let days = [0.0, 24.0, 48.0, 72.0];
    let discharge = [120.0f32, 180.0, 150.0, 90.0];
    let spline = SplineInterpolator::new()
        .interpolate(&days, &discharge)
        .expect("valid series");
    let hours: Vec<f64> = (0..=80).map(f64::from).collect();
    let hourly = spline.resample(&hours);
    assert!(hourly[..=72].iter().all(Option::is_some));
    assert!(hourly[73..].iter().all(Option::is_none));
    assert!((hourly[24].expect("knot") - 180.0).abs() < 1e-9);
}
