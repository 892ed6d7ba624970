use crate::grid::{validate_axis, Axis, GridError};

/// Where a query value fell relative to the axis extent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bounds {
    Below,
    In,
    Above,
}

/// Result of resolving a coordinate on one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexLookupResult {
    pub index: usize,
    pub bounds: Bounds,
}

impl IndexLookupResult {
    pub fn is_in_bounds(&self) -> bool {
        self.bounds == Bounds::In
    }
}

/// Nearest-neighbour index resolution on one strictly increasing axis.
#[derive(Clone, Debug)]
pub struct IndexLookup {
    axis: Axis,
    values: Vec<f64>,
}

impl IndexLookup {
    pub fn new(axis: Axis, values: Vec<f64>) -> Result<Self, GridError> {
        validate_axis(axis, &values)?;
        Ok(Self { axis, values })
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Resolve `v` to the index of the nearest axis element.
    ///
    /// Out-of-range queries clamp to the first/last index and are flagged
    /// `Below`/`Above`. Exact midpoints resolve to the upper neighbour.
    /// NaN queries are reported as `Above` of the last index.
    pub fn lookup(&self, v: f64) -> IndexLookupResult {
        let last = self.values.len() - 1;
        if v < self.values[0] {
            return IndexLookupResult {
                index: 0,
                bounds: Bounds::Below,
            };
        }
        if v > self.values[last] || v.is_nan() {
            return IndexLookupResult {
                index: last,
                bounds: Bounds::Above,
            };
        }

        // First element >= v; the nearest is either it or its predecessor.
        let upper = self.values.partition_point(|&x| x < v);
        let index = if upper == 0 {
            0
        } else {
            let lower = upper - 1;
            if v - self.values[lower] < self.values[upper] - v {
                lower
            } else {
                upper
            }
        };
        IndexLookupResult {
            index,
            bounds: Bounds::In,
        }
    }
}
