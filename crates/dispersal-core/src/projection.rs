use crate::constants::EARTH_RADIUS_M;
use serde::{Deserialize, Serialize};

/// A point in either geographic (`x` = lon°, `y` = lat°) or planar (metres)
/// space. `z` (depth) is carried through every transform unchanged.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Coordinate {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn xy(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProjectionError {
    #[error("radius must be positive and finite, got {0}")]
    InvalidRadius(f64),
    #[error("origin longitude must be finite, got {0}")]
    InvalidOriginLongitude(f64),
    #[error("origin latitude must be finite and strictly within (-90, 90), got {0}")]
    InvalidOriginLatitude(f64),
}

/// Reversible mapping between geographic degrees and planar distance units.
pub trait Projection {
    fn forward(&self, c: Coordinate) -> Coordinate;
    fn inverse(&self, c: Coordinate) -> Coordinate;

    /// Element-wise forward transform; missing coordinates stay missing.
    fn forward_all(&self, coords: &[Option<Coordinate>]) -> Vec<Option<Coordinate>> {
        coords.iter().map(|c| c.map(|c| self.forward(c))).collect()
    }

    /// Element-wise inverse transform; missing coordinates stay missing.
    fn inverse_all(&self, coords: &[Option<Coordinate>]) -> Vec<Option<Coordinate>> {
        coords.iter().map(|c| c.map(|c| self.inverse(c))).collect()
    }
}

/// Equirectangular (plate carrée) projection:
/// `x = R (λ - λ0) cos φ0`, `y = R φ`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Equirectangular {
    radius: f64,
    origin_lon: f64,
    origin_lat: f64,
    // Cached R cos φ0.
    x_scale: f64,
}

impl Default for Equirectangular {
    fn default() -> Self {
        Self {
            radius: EARTH_RADIUS_M,
            origin_lon: 0.0,
            origin_lat: 0.0,
            x_scale: EARTH_RADIUS_M,
        }
    }
}

impl Equirectangular {
    /// `origin_lon` / `origin_lat` are the central meridian and standard
    /// parallel in degrees.
    pub fn new(radius: f64, origin_lon: f64, origin_lat: f64) -> Result<Self, ProjectionError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ProjectionError::InvalidRadius(radius));
        }
        if !origin_lon.is_finite() {
            return Err(ProjectionError::InvalidOriginLongitude(origin_lon));
        }
        if !(origin_lat.is_finite() && origin_lat.abs() < 90.0) {
            return Err(ProjectionError::InvalidOriginLatitude(origin_lat));
        }
        Ok(Self {
            radius,
            origin_lon,
            origin_lat,
            x_scale: radius * origin_lat.to_radians().cos(),
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn origin(&self) -> (f64, f64) {
        (self.origin_lon, self.origin_lat)
    }

    pub fn project(&self, lon: f64, lat: f64) -> [f64; 2] {
        [
            self.x_scale * (lon.to_radians() - self.origin_lon.to_radians()),
            self.radius * lat.to_radians(),
        ]
    }

    pub fn unproject(&self, x: f64, y: f64) -> [f64; 2] {
        [
            (self.origin_lon.to_radians() + x / self.x_scale).to_degrees(),
            (y / self.radius).to_degrees(),
        ]
    }

    /// Planar distance in metres between two geographic coordinates.
    pub fn distance(&self, a: Coordinate, b: Coordinate) -> f64 {
        let [ax, ay] = self.project(a.x, a.y);
        let [bx, by] = self.project(b.x, b.y);
        (bx - ax).hypot(by - ay)
    }

    /// Area-weighted centroid of a geographic polygon ring, computed in planar
    /// space and mapped back to degrees. The ring may be open or closed.
    ///
    /// Degenerate (zero-area) rings fall back to the vertex mean. Depth is the
    /// vertex mean in both cases. Returns `None` for an empty ring.
    pub fn polygon_centroid(&self, ring: &[Coordinate]) -> Option<Coordinate> {
        let ring = match ring {
            [] => return None,
            [rest @ .., last] if rest.len() > 1 && *last == rest[0] => rest,
            all => all,
        };
        let planar: Vec<[f64; 2]> = ring.iter().map(|c| self.project(c.x, c.y)).collect();
        let n = planar.len() as f64;
        let mean_z = ring.iter().map(|c| c.z).sum::<f64>() / n;

        let mut twice_area = 0.0;
        let mut cx = 0.0;
        let mut cy = 0.0;
        for (i, p) in planar.iter().enumerate() {
            let q = planar[(i + 1) % planar.len()];
            let cross = p[0] * q[1] - q[0] * p[1];
            twice_area += cross;
            cx += (p[0] + q[0]) * cross;
            cy += (p[1] + q[1]) * cross;
        }

        let [x, y] = if twice_area.abs() <= f64::EPSILON * self.radius * self.radius {
            let sx = planar.iter().map(|p| p[0]).sum::<f64>() / n;
            let sy = planar.iter().map(|p| p[1]).sum::<f64>() / n;
            [sx, sy]
        } else {
            [cx / (3.0 * twice_area), cy / (3.0 * twice_area)]
        };
        let [lon, lat] = self.unproject(x, y);
        Some(Coordinate::new(lon, lat, mean_z))
    }
}

impl Projection for Equirectangular {
    fn forward(&self, c: Coordinate) -> Coordinate {
        let [x, y] = self.project(c.x, c.y);
        Coordinate::new(x, y, c.z)
    }

    fn inverse(&self, c: Coordinate) -> Coordinate {
        let [lon, lat] = self.unproject(c.x, c.y);
        Coordinate::new(lon, lat, c.z)
    }
}
