//! Cressman structure function

use stratus_core::{calc_distance_fast, is_valid, Point, Result};

use super::{check_length, cressman_rho, StructureFunction};

/// Cressman correlation in horizontal distance, elevation, and land-area
/// fraction. Each dimension contributes `(L² - d²)/(L² + d²)` inside its
/// length scale and 0 outside, so the kernel has compact support: the
/// localization distance is the horizontal length scale itself.
#[derive(Debug, Clone)]
pub struct CressmanStructure {
    h: f32,
    v: f32,
    w: f32,
}

impl CressmanStructure {
    pub fn new(h: f32, v: f32, w: f32) -> Result<Self> {
        check_length("h", h)?;
        check_length("v", v)?;
        check_length("w", w)?;
        Ok(Self { h, v, w })
    }
}

impl StructureFunction for CressmanStructure {
    fn corr(&self, p1: &Point, p2: &Point) -> f32 {
        let hdist = calc_distance_fast(p1, p2);
        let mut rho = cressman_rho(hdist, self.h);
        if is_valid(p1.elev) && is_valid(p2.elev) {
            rho *= cressman_rho(p1.elev - p2.elev, self.v);
        }
        if is_valid(p1.laf) && is_valid(p2.laf) {
            rho *= cressman_rho(p1.laf - p2.laf, self.w);
        }
        rho
    }

    fn localization_distance(&self, _p: &Point) -> f32 {
        self.h
    }

    fn max_localization_distance(&self) -> f32 {
        self.h
    }

    fn clone_box(&self) -> Box<dyn StructureFunction> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_arguments() {
        assert!(CressmanStructure::new(-1.0, 0.0, 0.0).is_err());
        assert!(CressmanStructure::new(1e5, f32::NAN, 0.0).is_err());
        assert!(CressmanStructure::new(1e5, 0.0, -0.1).is_err());
    }

    #[test]
    fn test_self_correlation_is_one() {
        let s = CressmanStructure::new(1e5, 200.0, 0.5).unwrap();
        let p = Point::with_coords(60.0, 10.0, 100.0, 0.5);
        assert_eq!(s.corr(&p, &p), 1.0);
    }

    #[test]
    fn test_compact_support() {
        let s = CressmanStructure::new(50_000.0, 0.0, 0.0).unwrap();
        let p0 = Point::new(60.0, 10.0);
        let near = Point::new(60.2, 10.0); // ~22 km
        let far = Point::new(60.6, 10.0); // ~67 km
        assert!(s.corr(&p0, &near) > 0.0);
        assert_eq!(s.corr(&p0, &far), 0.0);
        assert_eq!(s.max_localization_distance(), 50_000.0);
    }

    #[test]
    fn test_elevation_factor() {
        let s = CressmanStructure::new(1e7, 1000.0, 0.0).unwrap();
        let p1 = Point::with_coords(60.0, 10.0, 0.0, f32::NAN);
        let p2 = Point::with_coords(60.0, 10.0, 500.0, f32::NAN);
        // (1e6 - 2.5e5)/(1e6 + 2.5e5) = 0.6
        assert!((s.corr(&p1, &p2) - 0.6).abs() < 1e-6);
        // Elevation difference beyond the scale kills the correlation
        let p3 = Point::with_coords(60.0, 10.0, 1500.0, f32::NAN);
        assert_eq!(s.corr(&p1, &p3), 0.0);
    }

    #[test]
    fn test_unknown_elevation_skips_factor() {
        let s = CressmanStructure::new(1e7, 1000.0, 0.0).unwrap();
        let p1 = Point::with_coords(60.0, 10.0, 0.0, f32::NAN);
        let p2 = Point::new(60.0, 10.0);
        assert_eq!(s.corr(&p1, &p2), 1.0);
    }
}
