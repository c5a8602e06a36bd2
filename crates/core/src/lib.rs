//! # Stratus Core
//!
//! Core types and spatial indexing for the Stratus post-processing library.
//!
//! This crate provides:
//! - [`Field`]: 2D single-precision value container
//! - [`Grid`]: gridded mesh of locations with nearest-neighbour lookup
//! - [`Points`]: scattered observation sites with radius queries
//! - [`KdTree`]: the spatial index behind both
//! - [`Transform`]: monotone transforms for analysis in transformed space
//! - Great-circle distance functions and the missing-value convention

pub mod error;
pub mod field;
pub mod grid;
pub mod kdtree;
pub mod point;
pub mod points;
pub mod transform;

pub use error::{Error, Result};
pub use field::Field;
pub use grid::Grid;
pub use kdtree::KdTree;
pub use point::{calc_distance, calc_distance_fast, CoordinateType, Point, RADIUS_EARTH};
pub use points::Points;
pub use transform::{BoxCox, Identity, Log, Transform};

/// Whether a value carries data. NaN and infinities mark missing values.
#[inline]
pub fn is_valid(value: f32) -> bool {
    value.is_finite()
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::field::Field;
    pub use crate::grid::Grid;
    pub use crate::is_valid;
    pub use crate::point::{calc_distance, calc_distance_fast, CoordinateType, Point};
    pub use crate::points::Points;
    pub use crate::transform::{BoxCox, Identity, Log, Transform};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid() {
        assert!(is_valid(1.0));
        assert!(is_valid(-999.0));
        assert!(is_valid(0.0));
        assert!(!is_valid(f32::NAN));
        assert!(!is_valid(f32::INFINITY));
        assert!(!is_valid(f32::NEG_INFINITY));
    }
}
