//! Tensor-product structure function

use stratus_core::Point;

use super::StructureFunction;

/// Composes three structure functions, one per coordinate axis.
///
/// The horizontal, elevation, and LAF correlations are evaluated on partial
/// point pairs that differ in only the relevant axis, then multiplied. This
/// lets e.g. a Barnes horizontal kernel combine with a Cressman elevation
/// kernel.
#[derive(Clone)]
pub struct MultipleStructure {
    structure_h: Box<dyn StructureFunction>,
    structure_v: Box<dyn StructureFunction>,
    structure_w: Box<dyn StructureFunction>,
}

impl MultipleStructure {
    pub fn new(
        structure_h: Box<dyn StructureFunction>,
        structure_v: Box<dyn StructureFunction>,
        structure_w: Box<dyn StructureFunction>,
    ) -> Self {
        Self {
            structure_h,
            structure_v,
            structure_w,
        }
    }
}

impl StructureFunction for MultipleStructure {
    fn corr(&self, p1: &Point, p2: &Point) -> f32 {
        // Each pair varies in exactly one axis; the other axes are pinned to
        // p1 so the sub-structures see zero difference there.
        let p2_h = Point {
            lat: p2.lat,
            lon: p2.lon,
            ..*p1
        };
        let p2_v = Point { elev: p2.elev, ..*p1 };
        let p2_w = Point { laf: p2.laf, ..*p1 };

        let corr_h = self.structure_h.corr(p1, &p2_h);
        let corr_v = self.structure_v.corr(p1, &p2_v);
        let corr_w = self.structure_w.corr(p1, &p2_w);
        corr_h * corr_v * corr_w
    }

    fn localization_distance(&self, p: &Point) -> f32 {
        self.structure_h.localization_distance(p)
    }

    fn max_localization_distance(&self) -> f32 {
        self.structure_h.max_localization_distance()
    }

    fn clone_box(&self) -> Box<dyn StructureFunction> {
        Box::new(self.clone())
    }
}
