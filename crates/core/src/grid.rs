//! Gridded mesh of locations

use crate::error::{Error, Result};
use crate::kdtree::KdTree;
use crate::point::{CoordinateType, Point};
use ndarray::Array2;

/// An `nY × nX` mesh of locations with per-cell coordinates.
///
/// Immutable after construction. Elevation and land-area fraction default to
/// NaN (unknown). A k-d tree over the cell centres supports nearest-neighbour
/// lookup; the lat/lon bounding box defines the domain used for clipping
/// observation sets.
#[derive(Debug, Clone)]
pub struct Grid {
    lats: Array2<f32>,
    lons: Array2<f32>,
    elevs: Array2<f32>,
    lafs: Array2<f32>,
    tree: KdTree,
    lat_range: (f32, f32),
    lon_range: (f32, f32),
}

impl Grid {
    /// Create a grid with unknown elevations and land-area fractions.
    pub fn new(lats: Array2<f32>, lons: Array2<f32>) -> Result<Self> {
        let shape = lats.dim();
        let elevs = Array2::from_elem(shape, f32::NAN);
        let lafs = Array2::from_elem(shape, f32::NAN);
        Self::with_fields(lats, lons, elevs, lafs)
    }

    /// Create a grid with all coordinate fields.
    pub fn with_fields(
        lats: Array2<f32>,
        lons: Array2<f32>,
        elevs: Array2<f32>,
        lafs: Array2<f32>,
    ) -> Result<Self> {
        let shape = lats.dim();
        if shape.0 == 0 || shape.1 == 0 {
            return Err(Error::invalid_parameter(
                "lats",
                format!("{}x{}", shape.0, shape.1),
                "grid must have at least one cell",
            ));
        }
        for (name, dim) in [
            ("lons", lons.dim()),
            ("elevs", elevs.dim()),
            ("lafs", lafs.dim()),
        ] {
            if dim != shape {
                return Err(Error::SizeMismatch {
                    what: name,
                    expected: format!("({}, {})", shape.0, shape.1),
                    actual: format!("({}, {})", dim.0, dim.1),
                });
            }
        }

        let (mut lat_min, mut lat_max) = (f32::INFINITY, f32::NEG_INFINITY);
        for &v in lats.iter() {
            lat_min = lat_min.min(v);
            lat_max = lat_max.max(v);
        }
        let (mut lon_min, mut lon_max) = (f32::INFINITY, f32::NEG_INFINITY);
        for &v in lons.iter() {
            lon_min = lon_min.min(v);
            lon_max = lon_max.max(v);
        }

        // Row-major flattening matches the (y, x) unravelling in nearest lookup
        let flat_lats: Vec<f32> = lats.iter().copied().collect();
        let flat_lons: Vec<f32> = lons.iter().copied().collect();
        let tree = KdTree::build(&flat_lats, &flat_lons, CoordinateType::Geodetic);

        Ok(Self {
            lats,
            lons,
            elevs,
            lafs,
            tree,
            lat_range: (lat_min, lat_max),
            lon_range: (lon_min, lon_max),
        })
    }

    /// Number of rows (y dimension).
    pub fn ny(&self) -> usize {
        self.lats.nrows()
    }

    /// Number of columns (x dimension).
    pub fn nx(&self) -> usize {
        self.lats.ncols()
    }

    /// Dimensions as (ny, nx).
    pub fn shape(&self) -> (usize, usize) {
        self.lats.dim()
    }

    pub fn lats(&self) -> &Array2<f32> {
        &self.lats
    }

    pub fn lons(&self) -> &Array2<f32> {
        &self.lons
    }

    pub fn elevs(&self) -> &Array2<f32> {
        &self.elevs
    }

    pub fn lafs(&self) -> &Array2<f32> {
        &self.lafs
    }

    /// The cell centre at (y, x). Panics if out of range.
    pub fn point(&self, y: usize, x: usize) -> Point {
        Point {
            lat: self.lats[(y, x)],
            lon: self.lons[(y, x)],
            elev: self.elevs[(y, x)],
            laf: self.lafs[(y, x)],
            ctype: CoordinateType::Geodetic,
        }
    }

    /// The (y, x) index of the cell centre closest to (lat, lon).
    pub fn get_nearest_neighbour(&self, lat: f32, lon: f32) -> (usize, usize) {
        // The tree always holds ny*nx >= 1 entries
        let flat = self.tree.nearest(lat, lon).unwrap_or(0);
        (flat / self.nx(), flat % self.nx())
    }

    /// Whether (lat, lon) falls inside the grid's bounding box.
    pub fn is_inside(&self, lat: f32, lon: f32) -> bool {
        lat >= self.lat_range.0
            && lat <= self.lat_range.1
            && lon >= self.lon_range.0
            && lon <= self.lon_range.1
    }
}
