//! 3D k-d tree for spatial indexing of lat/lon locations
//!
//! Provides O(log n) nearest-neighbour and radius queries for scattered
//! locations on the sphere. Geodetic coordinates are embedded as
//! earth-centred Cartesian points, so chord distance is a monotone proxy for
//! great-circle distance and radius queries are exact after converting the
//! arc radius to a chord radius.
//!
//! Reference:
//! Bentley, J.L. (1975). Multidimensional binary search trees used
//! for associative searching. CACM, 18(9).

use crate::point::{CoordinateType, RADIUS_EARTH};

/// A k-d tree over fixed locations, queried by (lat, lon).
#[derive(Debug, Clone)]
pub struct KdTree {
    nodes: Vec<KdNode>,
    coords: Vec<[f64; 3]>,
    ctype: CoordinateType,
}

#[derive(Debug, Clone)]
struct KdNode {
    /// Index into `coords` (and the caller's original ordering)
    point_idx: usize,
    /// Split dimension: 0 = x, 1 = y, 2 = z
    split_dim: u8,
    left: Option<usize>,
    right: Option<usize>,
}

/// Embed a location in the 3D search space.
fn to_coords(lat: f32, lon: f32, ctype: CoordinateType) -> [f64; 3] {
    match ctype {
        CoordinateType::Geodetic => {
            let latr = (lat as f64).to_radians();
            let lonr = (lon as f64).to_radians();
            let r = RADIUS_EARTH as f64;
            [
                r * latr.cos() * lonr.cos(),
                r * latr.cos() * lonr.sin(),
                r * latr.sin(),
            ]
        }
        CoordinateType::Cartesian => [lon as f64, lat as f64, 0.0],
    }
}

/// Convert an arc-length search radius (metres along the sphere surface)
/// into the equivalent chord radius in the embedding space.
fn chord_radius(radius: f32, ctype: CoordinateType) -> f64 {
    let r = radius as f64;
    match ctype {
        CoordinateType::Geodetic => {
            let earth = RADIUS_EARTH as f64;
            if r >= std::f64::consts::PI * earth {
                // Covers the whole sphere
                2.0 * earth
            } else {
                2.0 * earth * (r / (2.0 * earth)).sin()
            }
        }
        CoordinateType::Cartesian => r,
    }
}

impl KdTree {
    /// Build a tree from parallel coordinate slices.
    ///
    /// Construction is O(n log n) using median-of-coordinate splitting.
    /// Indices returned by queries refer to positions in the input slices.
    pub fn build(lats: &[f32], lons: &[f32], ctype: CoordinateType) -> Self {
        debug_assert_eq!(lats.len(), lons.len());
        let coords: Vec<[f64; 3]> = lats
            .iter()
            .zip(lons.iter())
            .map(|(&lat, &lon)| to_coords(lat, lon, ctype))
            .collect();

        let mut nodes = Vec::with_capacity(coords.len());
        if !coords.is_empty() {
            let mut indices: Vec<usize> = (0..coords.len()).collect();
            build_recursive(&coords, &mut indices, 0, &mut nodes);
        }

        Self {
            nodes,
            coords,
            ctype,
        }
    }

    /// Number of locations in the tree.
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Index of the location closest to (lat, lon), or `None` if empty.
    pub fn nearest(&self, lat: f32, lon: f32) -> Option<usize> {
        if self.nodes.is_empty() {
            return None;
        }
        let q = to_coords(lat, lon, self.ctype);
        let mut best_dist_sq = f64::MAX;
        let mut best_idx = 0;
        self.nearest_recursive(0, &q, &mut best_dist_sq, &mut best_idx);
        Some(best_idx)
    }

    /// Indices of all locations within `radius` metres of (lat, lon).
    ///
    /// The radius is an arc length for geodetic trees. Results are in no
    /// particular order. A non-positive radius returns nothing.
    pub fn within_radius(&self, lat: f32, lon: f32, radius: f32) -> Vec<usize> {
        if self.nodes.is_empty() || !(radius > 0.0) {
            return Vec::new();
        }
        let q = to_coords(lat, lon, self.ctype);
        let chord = chord_radius(radius, self.ctype);
        let mut results = Vec::new();
        self.radius_recursive(0, &q, chord * chord, &mut results);
        results
    }

    fn nearest_recursive(
        &self,
        node_idx: usize,
        q: &[f64; 3],
        best_dist_sq: &mut f64,
        best_idx: &mut usize,
    ) {
        let node = &self.nodes[node_idx];
        let p = &self.coords[node.point_idx];

        let dist_sq = dist_sq(q, p);
        if dist_sq < *best_dist_sq {
            *best_dist_sq = dist_sq;
            *best_idx = node.point_idx;
        }

        let dim = node.split_dim as usize;
        let diff = q[dim] - p[dim];
        let (first, second) = if diff < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        // Search the closer side first
        if let Some(child) = first {
            self.nearest_recursive(child, q, best_dist_sq, best_idx);
        }
        if diff * diff < *best_dist_sq {
            if let Some(child) = second {
                self.nearest_recursive(child, q, best_dist_sq, best_idx);
            }
        }
    }

    fn radius_recursive(
        &self,
        node_idx: usize,
        q: &[f64; 3],
        radius_sq: f64,
        results: &mut Vec<usize>,
    ) {
        let node = &self.nodes[node_idx];
        let p = &self.coords[node.point_idx];

        if dist_sq(q, p) <= radius_sq {
            results.push(node.point_idx);
        }

        let dim = node.split_dim as usize;
        let diff = q[dim] - p[dim];

        if let Some(left) = node.left {
            if diff < 0.0 || diff * diff <= radius_sq {
                self.radius_recursive(left, q, radius_sq, results);
            }
        }
        if let Some(right) = node.right {
            if diff >= 0.0 || diff * diff <= radius_sq {
                self.radius_recursive(right, q, radius_sq, results);
            }
        }
    }
}

#[inline]
fn dist_sq(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}

fn build_recursive(
    coords: &[[f64; 3]],
    indices: &mut [usize],
    depth: usize,
    nodes: &mut Vec<KdNode>,
) -> usize {
    let n = indices.len();
    let split_dim = (depth % 3) as u8;
    let dim = split_dim as usize;

    indices.sort_by(|&a, &b| {
        coords[a][dim]
            .partial_cmp(&coords[b][dim])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let median = n / 2;
    let point_idx = indices[median];

    let node_idx = nodes.len();
    nodes.push(KdNode {
        point_idx,
        split_dim,
        left: None,
        right: None,
    });

    if median > 0 {
        let mut left_indices = indices[..median].to_vec();
        let left_idx = build_recursive(coords, &mut left_indices, depth + 1, nodes);
        nodes[node_idx].left = Some(left_idx);
    }
    if median + 1 < n {
        let mut right_indices = indices[median + 1..].to_vec();
        let right_idx = build_recursive(coords, &mut right_indices, depth + 1, nodes);
        nodes[node_idx].right = Some(right_idx);
    }

    node_idx
}
