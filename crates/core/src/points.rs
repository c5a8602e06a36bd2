//! Observation site collection

use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::kdtree::KdTree;
use crate::point::{CoordinateType, Point};

/// An ordered, immutable collection of observation sites.
///
/// Sites carry lat/lon plus optional elevation and land-area fraction
/// (NaN when unknown). A k-d tree over the site locations is built at
/// construction and shared read-only by all queries.
#[derive(Debug, Clone)]
pub struct Points {
    lats: Vec<f32>,
    lons: Vec<f32>,
    elevs: Vec<f32>,
    lafs: Vec<f32>,
    ctype: CoordinateType,
    tree: KdTree,
}

impl Points {
    /// Create geodetic points with unknown elevations and land-area fractions.
    pub fn new(lats: Vec<f32>, lons: Vec<f32>) -> Result<Self> {
        let n = lats.len();
        Self::with_fields(lats, lons, vec![f32::NAN; n], vec![f32::NAN; n])
    }

    /// Create geodetic points with all coordinate fields.
    pub fn with_fields(
        lats: Vec<f32>,
        lons: Vec<f32>,
        elevs: Vec<f32>,
        lafs: Vec<f32>,
    ) -> Result<Self> {
        Self::with_coordinate_type(lats, lons, elevs, lafs, CoordinateType::Geodetic)
    }

    /// Create points with an explicit coordinate type.
    pub fn with_coordinate_type(
        lats: Vec<f32>,
        lons: Vec<f32>,
        elevs: Vec<f32>,
        lafs: Vec<f32>,
        ctype: CoordinateType,
    ) -> Result<Self> {
        let n = lats.len();
        for (name, len) in [("lons", lons.len()), ("elevs", elevs.len()), ("lafs", lafs.len())] {
            if len != n {
                return Err(Error::SizeMismatch {
                    what: name,
                    expected: format!("{} values", n),
                    actual: format!("{} values", len),
                });
            }
        }
        let tree = KdTree::build(&lats, &lons, ctype);
        Ok(Self {
            lats,
            lons,
            elevs,
            lafs,
            ctype,
            tree,
        })
    }

    /// Number of sites.
    pub fn len(&self) -> usize {
        self.lats.len()
    }

    /// Whether the collection has no sites.
    pub fn is_empty(&self) -> bool {
        self.lats.is_empty()
    }

    pub fn lats(&self) -> &[f32] {
        &self.lats
    }

    pub fn lons(&self) -> &[f32] {
        &self.lons
    }

    pub fn elevs(&self) -> &[f32] {
        &self.elevs
    }

    pub fn lafs(&self) -> &[f32] {
        &self.lafs
    }

    /// Coordinate type shared by all sites.
    pub fn coordinate_type(&self) -> CoordinateType {
        self.ctype
    }

    /// The site at index `i`. Panics if out of range.
    pub fn point(&self, i: usize) -> Point {
        Point {
            lat: self.lats[i],
            lon: self.lons[i],
            elev: self.elevs[i],
            laf: self.lafs[i],
            ctype: self.ctype,
        }
    }

    /// Indices of all sites within `radius` metres of (lat, lon).
    pub fn get_neighbours(&self, lat: f32, lon: f32, radius: f32) -> Vec<usize> {
        self.tree.within_radius(lat, lon, radius)
    }

    /// Index of the site closest to (lat, lon), or `None` if empty.
    pub fn get_nearest_neighbour(&self, lat: f32, lon: f32) -> Option<usize> {
        self.tree.nearest(lat, lon)
    }

    /// Indices of the sites inside the grid's lat/lon bounding box,
    /// in the original ordering.
    pub fn get_in_domain_indices(&self, grid: &Grid) -> Vec<usize> {
        (0..self.len())
            .filter(|&i| grid.is_inside(self.lats[i], self.lons[i]))
            .collect()
    }

    /// The subset of sites inside the grid's domain.
    ///
    /// The subset ordering matches [`Points::get_in_domain_indices`].
    pub fn get_in_domain(&self, grid: &Grid) -> Self {
        self.subset(&self.get_in_domain_indices(grid))
    }

    /// A new collection containing the sites at `indices`, in that order.
    pub fn subset(&self, indices: &[usize]) -> Self {
        let lats: Vec<f32> = indices.iter().map(|&i| self.lats[i]).collect();
        let lons: Vec<f32> = indices.iter().map(|&i| self.lons[i]).collect();
        let elevs: Vec<f32> = indices.iter().map(|&i| self.elevs[i]).collect();
        let lafs: Vec<f32> = indices.iter().map(|&i| self.lafs[i]).collect();
        let tree = KdTree::build(&lats, &lons, self.ctype);
        Self {
            lats,
            lons,
            elevs,
            lafs,
            ctype: self.ctype,
            tree,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn grid_3x3() -> Grid {
        // Lats 59..61, lons 9..11
        let lats = Array2::from_shape_fn((3, 3), |(y, _)| 59.0 + y as f32);
        let lons = Array2::from_shape_fn((3, 3), |(_, x)| 9.0 + x as f32);
        Grid::new(lats, lons).unwrap()
    }

    #[test]
    fn test_size_mismatch() {
        assert!(Points::new(vec![60.0, 61.0], vec![10.0]).is_err());
        assert!(
            Points::with_fields(vec![60.0], vec![10.0], vec![100.0, 200.0], vec![0.5]).is_err()
        );
    }

    #[test]
    fn test_empty_points() {
        let points = Points::new(vec![], vec![]).unwrap();
        assert!(points.is_empty());
        assert!(points.get_nearest_neighbour(60.0, 10.0).is_none());
        assert!(points.get_neighbours(60.0, 10.0, 1e6).is_empty());
    }

    #[test]
    fn test_nearest_and_neighbours() {
        let points = Points::new(vec![60.0, 60.0, 61.0], vec![10.0, 10.5, 10.0]).unwrap();
        assert_eq!(points.get_nearest_neighbour(60.0, 10.4), Some(1));
        // Sites 0 and 1 are ~28 km apart; site 2 is ~111 km from site 0
        let mut near = points.get_neighbours(60.0, 10.0, 50_000.0);
        near.sort_unstable();
        assert_eq!(near, vec![0, 1]);
    }

    #[test]
    fn test_in_domain() {
        let grid = grid_3x3();
        let points = Points::new(
            vec![60.0, 58.0, 59.5, 62.0],
            vec![10.0, 10.0, 10.5, 10.0],
        )
        .unwrap();
        let indices = points.get_in_domain_indices(&grid);
        assert_eq!(indices, vec![0, 2]);

        let inside = points.get_in_domain(&grid);
        assert_eq!(inside.len(), 2);
        assert_eq!(inside.lats(), &[60.0, 59.5]);
        assert_eq!(inside.lons(), &[10.0, 10.5]);
    }

    #[test]
    fn test_subset_keeps_fields() {
        let points = Points::with_fields(
            vec![60.0, 61.0, 62.0],
            vec![10.0, 11.0, 12.0],
            vec![5.0, 50.0, 500.0],
            vec![0.1, 0.5, 0.9],
        )
        .unwrap();
        let sub = points.subset(&[2, 0]);
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.elevs(), &[500.0, 5.0]);
        assert_eq!(sub.lafs(), &[0.9, 0.1]);
        let p = sub.point(0);
        assert_eq!(p.lat, 62.0);
        assert_eq!(p.elev, 500.0);
    }
}
