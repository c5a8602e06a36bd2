//! Barnes (Gaussian) structure function

use ndarray::Array2;
use stratus_core::{calc_distance_fast, is_valid, Error, Grid, Point, Result};

use super::{barnes_rho, check_length, StructureFunction, DEFAULT_MIN_RHO};

/// Length scales, either uniform or varying across a carrier grid.
#[derive(Debug, Clone)]
enum Scales {
    Uniform {
        h: f32,
        v: f32,
        w: f32,
    },
    Spatial {
        grid: Grid,
        h: Array2<f32>,
        v: Array2<f32>,
        w: Array2<f32>,
    },
}

/// Gaussian correlation in horizontal distance, elevation, and land-area
/// fraction:
///
/// ```text
/// rho = exp(-1/2 (d_h/h)^2) * exp(-1/2 (d_elev/v)^2) * exp(-1/2 (d_laf/w)^2)
/// ```
///
/// A zero length scale disables its dimension. The elevation and LAF factors
/// apply only when the coordinate is known on both points. Correlation is cut
/// to 0 beyond the localization distance `sqrt(-2 ln(min_rho)) * h`.
///
/// With spatially varying scales, the lengths are looked up at the nearest
/// carrier-grid cell of the first point only; no averaging with the second
/// point is performed.
#[derive(Debug, Clone)]
pub struct BarnesStructure {
    scales: Scales,
    min_rho: f32,
    /// Largest h across the domain, for the call-wide search radius
    max_h: f32,
}

impl BarnesStructure {
    /// Uniform length scales.
    ///
    /// `hmax`, when given, sets the localization distance directly by solving
    /// `exp(-1/2 (hmax/h)^2) = min_rho`; otherwise [`DEFAULT_MIN_RHO`] is
    /// used.
    pub fn new(h: f32, v: f32, w: f32, hmax: Option<f32>) -> Result<Self> {
        check_length("h", h)?;
        check_length("v", v)?;
        check_length("w", w)?;
        let min_rho = match hmax {
            Some(m) => {
                check_length("hmax", m)?;
                if h > 0.0 {
                    let r = m / h;
                    (-0.5 * r * r).exp()
                } else {
                    DEFAULT_MIN_RHO
                }
            }
            None => DEFAULT_MIN_RHO,
        };
        Ok(Self {
            scales: Scales::Uniform { h, v, w },
            min_rho,
            max_h: h,
        })
    }

    /// Length scales varying across a carrier grid.
    ///
    /// The three scale fields must have the grid's shape and contain at least
    /// one finite value of `h`.
    pub fn with_spatial_scales(
        grid: Grid,
        h: Array2<f32>,
        v: Array2<f32>,
        w: Array2<f32>,
        min_rho: f32,
    ) -> Result<Self> {
        let shape = grid.shape();
        for (name, dim) in [("h", h.dim()), ("v", v.dim()), ("w", w.dim())] {
            if dim != shape {
                return Err(Error::SizeMismatch {
                    what: name,
                    expected: format!("({}, {})", shape.0, shape.1),
                    actual: format!("({}, {})", dim.0, dim.1),
                });
            }
        }
        if !is_valid(min_rho) || min_rho <= 0.0 || min_rho >= 1.0 {
            return Err(Error::invalid_parameter(
                "min_rho",
                min_rho,
                "must be in (0, 1)",
            ));
        }
        let max_h = h
            .iter()
            .copied()
            .filter(|x| is_valid(*x))
            .fold(f32::NEG_INFINITY, f32::max);
        if !is_valid(max_h) || max_h < 0.0 {
            return Err(Error::invalid_parameter(
                "h",
                "all-invalid field",
                "needs at least one finite value >= 0",
            ));
        }
        Ok(Self {
            scales: Scales::Spatial { grid, h, v, w },
            min_rho,
            max_h,
        })
    }

    /// The (h, v, w) scales governing a query at `p`.
    fn scales_at(&self, p: &Point) -> (f32, f32, f32) {
        match &self.scales {
            Scales::Uniform { h, v, w } => (*h, *v, *w),
            Scales::Spatial { grid, h, v, w } => {
                let (y, x) = grid.get_nearest_neighbour(p.lat, p.lon);
                (h[(y, x)], v[(y, x)], w[(y, x)])
            }
        }
    }

    fn localization_for_h(&self, h: f32) -> f32 {
        if !is_valid(h) || h <= 0.0 {
            return 0.0;
        }
        let factor = (-2.0 * (self.min_rho as f64).ln()).sqrt();
        (factor * h as f64) as f32
    }
}

impl StructureFunction for BarnesStructure {
    fn corr(&self, p1: &Point, p2: &Point) -> f32 {
        let hdist = calc_distance_fast(p1, p2);
        if hdist > self.localization_distance(p1) {
            return 0.0;
        }
        let (h, v, w) = self.scales_at(p1);
        let mut rho = barnes_rho(hdist, h);
        if is_valid(p1.elev) && is_valid(p2.elev) {
            rho *= barnes_rho(p1.elev - p2.elev, v);
        }
        if is_valid(p1.laf) && is_valid(p2.laf) {
            rho *= barnes_rho(p1.laf - p2.laf, w);
        }
        rho
    }

    fn localization_distance(&self, p: &Point) -> f32 {
        let (h, _, _) = self.scales_at(p);
        self.localization_for_h(h)
    }

    fn max_localization_distance(&self) -> f32 {
        self.localization_for_h(self.max_h)
    }

    fn clone_box(&self) -> Box<dyn StructureFunction> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn uniform(h: f32) -> BarnesStructure {
        BarnesStructure::new(h, 0.0, 0.0, None).unwrap()
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(BarnesStructure::new(-1.0, 0.0, 0.0, None).is_err());
        assert!(BarnesStructure::new(f32::NAN, 0.0, 0.0, None).is_err());
        assert!(BarnesStructure::new(1e5, -2.0, 0.0, None).is_err());
        assert!(BarnesStructure::new(1e5, 0.0, f32::INFINITY, None).is_err());
        assert!(BarnesStructure::new(1e5, 0.0, 0.0, Some(-1.0)).is_err());
    }

    #[test]
    fn test_self_correlation_is_one() {
        let s = uniform(100_000.0);
        let p = Point::with_coords(60.0, 10.0, 100.0, 0.5);
        assert_eq!(s.corr(&p, &p), 1.0);
    }

    #[test]
    fn test_horizontal_decay() {
        let s = uniform(100_000.0);
        let p0 = Point::new(60.0, 10.0);
        let p1 = Point::new(60.3, 10.0);
        let p2 = Point::new(60.6, 10.0);
        let r1 = s.corr(&p0, &p1);
        let r2 = s.corr(&p0, &p2);
        assert!(r1 > 0.0 && r1 < 1.0);
        assert!(r2 < r1);
        // Gaussian form
        let d = calc_distance_fast(&p0, &p1);
        let expected = (-0.5 * (d / 100_000.0) * (d / 100_000.0)).exp();
        assert!((r1 - expected).abs() < 1e-5);
    }

    #[test]
    fn test_zero_beyond_localization() {
        let s = uniform(100_000.0);
        let loc = s.max_localization_distance();
        // sqrt(-2 ln 0.0013) ~ 3.646
        assert!((loc - 364_600.0).abs() < 1000.0, "got {}", loc);
        let p0 = Point::new(60.0, 10.0);
        let p1 = Point::new(64.0, 10.0); // ~445 km
        assert!(calc_distance_fast(&p0, &p1) > loc);
        assert_eq!(s.corr(&p0, &p1), 0.0);
    }

    #[test]
    fn test_hmax_sets_localization() {
        let s = BarnesStructure::new(100_000.0, 0.0, 0.0, Some(200_000.0)).unwrap();
        assert!((s.max_localization_distance() - 200_000.0).abs() < 10.0);
    }

    #[test]
    fn test_elevation_factor() {
        let s = BarnesStructure::new(1e7, 100.0, 0.0, None).unwrap();
        let p1 = Point::with_coords(60.0, 10.0, 0.0, f32::NAN);
        let p2 = Point::with_coords(60.0, 10.0, 100.0, f32::NAN);
        let r = s.corr(&p1, &p2);
        assert!((r - (-0.5f32).exp()).abs() < 1e-5);

        // Unknown elevation on either side skips the factor
        let p3 = Point::new(60.0, 10.0);
        assert_eq!(s.corr(&p1, &p3), 1.0);
    }

    #[test]
    fn test_laf_factor() {
        let s = BarnesStructure::new(1e7, 0.0, 0.5, None).unwrap();
        let p1 = Point::with_coords(60.0, 10.0, f32::NAN, 0.0);
        let p2 = Point::with_coords(60.0, 10.0, f32::NAN, 0.5);
        let r = s.corr(&p1, &p2);
        assert!((r - (-0.5f32).exp()).abs() < 1e-5);
    }

    #[test]
    fn test_zero_h_disables_structure() {
        let s = uniform(0.0);
        assert_eq!(s.max_localization_distance(), 0.0);
        let p0 = Point::new(60.0, 10.0);
        let p1 = Point::new(60.001, 10.0);
        // Any non-zero distance exceeds the zero localization radius
        assert_eq!(s.corr(&p0, &p1), 0.0);
        assert_eq!(s.corr(&p0, &p0), 1.0);
    }

    #[test]
    fn test_spatial_scales_shape_mismatch() {
        let lats = Array2::from_shape_fn((2, 2), |(y, _)| 59.0 + y as f32);
        let lons = Array2::from_shape_fn((2, 2), |(_, x)| 9.0 + x as f32);
        let grid = Grid::new(lats, lons).unwrap();
        let good = Array2::from_elem((2, 2), 1e5);
        let bad = Array2::from_elem((3, 2), 1e5);
        assert!(BarnesStructure::with_spatial_scales(
            grid.clone(),
            bad,
            good.clone(),
            good.clone(),
            0.0013
        )
        .is_err());
        assert!(
            BarnesStructure::with_spatial_scales(grid, good.clone(), good.clone(), good, 0.0013)
                .is_ok()
        );
    }

    #[test]
    fn test_spatial_scales_lookup_at_first_point() {
        let lats = Array2::from_shape_fn((1, 2), |_| 60.0);
        let lons = Array2::from_shape_fn((1, 2), |(_, x)| 10.0 + x as f32);
        let grid = Grid::new(lats, lons).unwrap();
        // Cell (0,0) has a huge scale, cell (0,1) a tiny one
        let h = Array2::from_shape_vec((1, 2), vec![1e6, 1.0]).unwrap();
        let zeros = Array2::from_elem((1, 2), 0.0);
        let s =
            BarnesStructure::with_spatial_scales(grid, h, zeros.clone(), zeros, 0.0013).unwrap();

        let near_first = Point::new(60.0, 10.1);
        let near_second = Point::new(60.0, 10.9);
        // Queried from the wide-scale cell: strong correlation
        assert!(s.corr(&near_first, &near_second) > 0.9);
        // Queried from the tiny-scale cell: localization kills it
        assert_eq!(s.corr(&near_second, &near_first), 0.0);
    }
}
