//! Spatial correlation structure functions
//!
//! A structure function defines the background-error correlation between two
//! locations in horizontal distance, elevation, and land-area-fraction space.
//! The optimal-interpolation solver uses it to populate the local covariance
//! matrices and to prune candidate observations beyond the localization
//! radius.
//!
//! Variants:
//! - Barnes: Gaussian decay per dimension
//! - Cressman: rational decay with compact support
//! - Multiple: tensor product of three independent structures
//! - CrossValidation: wrapper zeroing near-self background correlation

mod barnes;
mod cressman;
mod cross_validation;
mod multiple;

pub use barnes::BarnesStructure;
pub use cressman::CressmanStructure;
pub use cross_validation::CrossValidation;
pub use multiple::MultipleStructure;

use stratus_core::{is_valid, Point};

/// Default correlation value at the localization distance.
pub const DEFAULT_MIN_RHO: f32 = 0.0013;

/// A correlation kernel over pairs of locations.
///
/// Implementations are immutable and reentrant; the solver queries them
/// concurrently from multiple threads. `clone_box` produces a deep copy with
/// an independent lifetime, so stored structures are never shared.
pub trait StructureFunction: Send + Sync {
    /// Correlation between two locations, in [0, 1].
    fn corr(&self, p1: &Point, p2: &Point) -> f32;

    /// Correlation used between a gridpoint and an observation.
    ///
    /// Identical to [`StructureFunction::corr`] except for wrappers such as
    /// [`CrossValidation`] that suppress near-self correlation.
    fn corr_background(&self, p1: &Point, p2: &Point) -> f32 {
        self.corr(p1, p2)
    }

    /// Distance beyond which `corr` involving `p` is 0.
    fn localization_distance(&self, p: &Point) -> f32;

    /// Upper bound on [`StructureFunction::localization_distance`] over all
    /// query points. The solver uses this single scalar as its candidate
    /// search radius for a whole call.
    fn max_localization_distance(&self) -> f32;

    /// Deep copy with an independent lifetime.
    fn clone_box(&self) -> Box<dyn StructureFunction>;
}

impl Clone for Box<dyn StructureFunction> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Gaussian correlation factor for one dimension.
///
/// An invalid or zero length scale disables the dimension (factor 1);
/// an invalid distance yields factor 0.
pub(crate) fn barnes_rho(dist: f32, length: f32) -> f32 {
    if !is_valid(length) || length == 0.0 {
        return 1.0;
    }
    if !is_valid(dist) {
        return 0.0;
    }
    let v = dist / length;
    (-0.5 * v * v).exp()
}

/// Cressman correlation factor for one dimension.
///
/// `(L² - d²)/(L² + d²)` inside the length scale, 0 outside. An invalid or
/// zero length scale disables the dimension; an invalid distance yields 0.
pub(crate) fn cressman_rho(dist: f32, length: f32) -> f32 {
    if !is_valid(length) || length == 0.0 {
        return 1.0;
    }
    if !is_valid(dist) {
        return 0.0;
    }
    if dist.abs() >= length {
        return 0.0;
    }
    (length * length - dist * dist) / (length * length + dist * dist)
}

/// Validate a length-scale constructor argument.
pub(crate) fn check_length(name: &'static str, value: f32) -> stratus_core::Result<()> {
    if !is_valid(value) || value < 0.0 {
        return Err(stratus_core::Error::invalid_parameter(
            name,
            value,
            "must be a finite value >= 0",
        ));
    }
    Ok(())
}
