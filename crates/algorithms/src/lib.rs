//! # Stratus Algorithms
//!
//! Numerical engine for the Stratus post-processing library.
//!
//! ## Available modules
//!
//! - **structure**: spatial correlation models (Barnes, Cressman, tensor
//!   product, cross-validation wrapper)
//! - **oi**: optimal interpolation of point observations onto a gridded
//!   background, with an optional transformed-space variant
//! - **neighbourhood**: square-window search and replacement

pub mod neighbourhood;
pub mod oi;
pub mod structure;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::neighbourhood::calc_neighbourhood;
    pub use crate::oi::{
        background_at_points, optimal_interpolation, optimal_interpolation_transform,
    };
    pub use crate::structure::{
        BarnesStructure, CressmanStructure, CrossValidation, MultipleStructure,
        StructureFunction, DEFAULT_MIN_RHO,
    };
    pub use stratus_core::prelude::*;
}
