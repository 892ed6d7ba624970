use std::fmt;
use std::sync::Arc;

/// The three axes of an environmental grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Time,
    Latitude,
    Longitude,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::Time => "time",
            Axis::Latitude => "latitude",
            Axis::Longitude => "longitude",
        })
    }
}

/// Errors raised when a grid or one of its axes is malformed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("{axis} axis must contain at least one value")]
    EmptyAxis { axis: Axis },
    #[error("{axis} axis value at index {index} is not finite")]
    NonFiniteAxis { axis: Axis, index: usize },
    #[error("{axis} axis is not strictly increasing at index {index}")]
    NonMonotonicAxis { axis: Axis, index: usize },
    #[error("grid holds {actual} values but axes describe {expected}")]
    ShapeMismatch { expected: usize, actual: usize },
}

/// Read-only environmental field indexed by `(time, lat, lon)`.
///
/// Axes must be strictly increasing. Implementations are populated by an
/// external reader during setup and never mutated afterwards.
pub trait Grid {
    fn times(&self) -> &[f64];
    fn lats(&self) -> &[f64];
    fn lons(&self) -> &[f64];

    /// Value at an index triple. Callers guarantee the indices are in range.
    fn value(&self, t: usize, lat: usize, lon: usize) -> f64;

    fn shape(&self) -> (usize, usize, usize) {
        (self.times().len(), self.lats().len(), self.lons().len())
    }
}

impl<G: Grid + ?Sized> Grid for &G {
    fn times(&self) -> &[f64] {
        (**self).times()
    }

    fn lats(&self) -> &[f64] {
        (**self).lats()
    }

    fn lons(&self) -> &[f64] {
        (**self).lons()
    }

    fn value(&self, t: usize, lat: usize, lon: usize) -> f64 {
        (**self).value(t, lat, lon)
    }
}

impl<G: Grid + ?Sized> Grid for Arc<G> {
    fn times(&self) -> &[f64] {
        (**self).times()
    }

    fn lats(&self) -> &[f64] {
        (**self).lats()
    }

    fn lons(&self) -> &[f64] {
        (**self).lons()
    }

    fn value(&self, t: usize, lat: usize, lon: usize) -> f64 {
        (**self).value(t, lat, lon)
    }
}

/// Check that an axis is non-empty, finite and strictly increasing.
pub fn validate_axis(axis: Axis, values: &[f64]) -> Result<(), GridError> {
    if values.is_empty() {
        return Err(GridError::EmptyAxis { axis });
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(GridError::NonFiniteAxis { axis, index });
    }
    if let Some(index) = values.windows(2).position(|w| w[1] <= w[0]) {
        return Err(GridError::NonMonotonicAxis {
            axis,
            index: index + 1,
        });
    }
    Ok(())
}

/// Dense in-memory grid, values stored row-major as `[time][lat][lon]`.
#[derive(Clone, Debug)]
pub struct GridArray {
    times: Vec<f64>,
    lats: Vec<f64>,
    lons: Vec<f64>,
    data: Vec<f64>,
}

impl GridArray {
    pub fn new(
        times: Vec<f64>,
        lats: Vec<f64>,
        lons: Vec<f64>,
        data: Vec<f64>,
    ) -> Result<Self, GridError> {
        validate_axis(Axis::Time, &times)?;
        validate_axis(Axis::Latitude, &lats)?;
        validate_axis(Axis::Longitude, &lons)?;
        let expected = times.len() * lats.len() * lons.len();
        if data.len() != expected {
            return Err(GridError::ShapeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            times,
            lats,
            lons,
            data,
        })
    }

    /// Build a grid by evaluating `f(t_idx, lat_idx, lon_idx)` for every cell.
    pub fn from_fn(
        times: Vec<f64>,
        lats: Vec<f64>,
        lons: Vec<f64>,
        mut f: impl FnMut(usize, usize, usize) -> f64,
    ) -> Result<Self, GridError> {
        let mut data = Vec::with_capacity(times.len() * lats.len() * lons.len());
        for t in 0..times.len() {
            for i in 0..lats.len() {
                for j in 0..lons.len() {
                    data.push(f(t, i, j));
                }
            }
        }
        Self::new(times, lats, lons, data)
    }

    fn offset(&self, t: usize, lat: usize, lon: usize) -> usize {
        (t * self.lats.len() + lat) * self.lons.len() + lon
    }
}

impl Grid for GridArray {
    fn times(&self) -> &[f64] {
        &self.times
    }

    fn lats(&self) -> &[f64] {
        &self.lats
    }

    fn lons(&self) -> &[f64] {
        &self.lons
    }

    fn value(&self, t: usize, lat: usize, lon: usize) -> f64 {
        self.data[self.offset(t, lat, lon)]
    }
}
