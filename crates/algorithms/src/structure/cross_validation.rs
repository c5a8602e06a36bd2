//! Cross-validation wrapper structure

use stratus_core::{calc_distance_fast, is_valid, Error, Point, Result};

use super::StructureFunction;

/// Wraps another structure function for leave-out verification experiments.
///
/// `corr` is unchanged, but `corr_background` is zero within `dist` metres,
/// so observations close to the evaluation point are excluded from their own
/// analysis while still contributing to observation-observation covariance.
#[derive(Clone)]
pub struct CrossValidation {
    structure: Box<dyn StructureFunction>,
    dist: f32,
}

impl CrossValidation {
    pub fn new(structure: Box<dyn StructureFunction>, dist: f32) -> Result<Self> {
        if !is_valid(dist) || dist < 0.0 {
            return Err(Error::invalid_parameter(
                "dist",
                dist,
                "must be a finite value >= 0",
            ));
        }
        Ok(Self { structure, dist })
    }
}

impl StructureFunction for CrossValidation {
    fn corr(&self, p1: &Point, p2: &Point) -> f32 {
        self.structure.corr(p1, p2)
    }

    fn corr_background(&self, p1: &Point, p2: &Point) -> f32 {
        if calc_distance_fast(p1, p2) <= self.dist {
            return 0.0;
        }
        self.structure.corr_background(p1, p2)
    }

    fn localization_distance(&self, p: &Point) -> f32 {
        self.structure.localization_distance(p)
    }

    fn max_localization_distance(&self) -> f32 {
        self.structure.max_localization_distance()
    }

    fn clone_box(&self) -> Box<dyn StructureFunction> {
        Box::new(self.clone())
    }
}
