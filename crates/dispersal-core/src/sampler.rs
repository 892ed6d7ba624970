use crate::grid::{Axis, Grid, GridError};
use crate::lookup::{IndexLookup, IndexLookupResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Longitude convention of the backing grid. Query longitudes are mapped into
/// it before lookup. Upstream datasets use both conventions, so the choice is
/// explicit per sampler.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LongitudeConvention {
    /// Use the query longitude unchanged.
    #[default]
    AsIs,
    /// Map into [-180, 180).
    Signed180,
    /// Map into [0, 360).
    Unsigned360,
}

impl LongitudeConvention {
    pub fn normalize(self, lon: f64) -> f64 {
        match self {
            LongitudeConvention::AsIs => lon,
            LongitudeConvention::Signed180 => {
                // rem_euclid can round up to exactly 360 for tiny negatives.
                let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
                if wrapped >= 180.0 {
                    -180.0
                } else {
                    wrapped
                }
            }
            LongitudeConvention::Unsigned360 => {
                let wrapped = lon.rem_euclid(360.0);
                if wrapped >= 360.0 {
                    0.0
                } else {
                    wrapped
                }
            }
        }
    }
}

/// Nearest-neighbour sampler over a `(time, lat, lon)` grid.
///
/// Immutable after construction; share one instance across workers.
#[derive(Clone, Debug)]
pub struct FieldSampler<G> {
    grid: G,
    time: IndexLookup,
    lats: IndexLookup,
    lons: IndexLookup,
    longitude: LongitudeConvention,
}

impl<G: Grid> FieldSampler<G> {
    pub fn new(grid: G, longitude: LongitudeConvention) -> Result<Self, GridError> {
        let time = IndexLookup::new(Axis::Time, grid.times().to_vec())?;
        let lats = IndexLookup::new(Axis::Latitude, grid.lats().to_vec())?;
        let lons = IndexLookup::new(Axis::Longitude, grid.lons().to_vec())?;
        debug!(
            times = time.len(),
            lats = lats.len(),
            lons = lons.len(),
            ?longitude,
            "field sampler ready"
        );
        Ok(Self {
            grid,
            time,
            lats,
            lons,
            longitude,
        })
    }

    /// Resolve a query to its index triple without reading the grid.
    pub fn locate(
        &self,
        t: f64,
        lon: f64,
        lat: f64,
    ) -> (IndexLookupResult, IndexLookupResult, IndexLookupResult) {
        let lon = self.longitude.normalize(lon);
        (
            self.time.lookup(t),
            self.lats.lookup(lat),
            self.lons.lookup(lon),
        )
    }

    /// Stored value of the grid cell nearest `(t, lon, lat)`.
    ///
    /// Returns `None` ("no data") if any coordinate falls outside its axis or
    /// the stored cell is itself non-finite (fill value).
    pub fn value(&self, t: f64, lon: f64, lat: f64) -> Option<f64> {
        let (tm, i, j) = self.locate(t, lon, lat);
        if !(tm.is_in_bounds() && i.is_in_bounds() && j.is_in_bounds()) {
            return None;
        }
        let v = self.grid.value(tm.index, i.index, j.index);
        v.is_finite().then_some(v)
    }

    pub fn longitude_convention(&self) -> LongitudeConvention {
        self.longitude
    }

    pub fn grid(&self) -> &G {
        &self.grid
    }
}
