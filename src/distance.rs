//! distance between entities.
//!
//! Entities live in a planar projected system (the same unit on both axes), so the
//! natural metric is the euclidean one. The [Metric] trait is the seam used by the
//! selection and assignment code, [Euclidean] the implementation used by default.

use crate::entity::Entity;

/// A metric on entities. Must be symmetric and non negative.
pub trait Metric {
    fn eval(&self, a: &Entity, b: &Entity) -> f64;
}

/// planar euclidean distance
#[derive(Copy, Clone, Debug, Default)]
pub struct Euclidean;

impl Metric for Euclidean {
    fn eval(&self, a: &Entity, b: &Entity) -> f64 {
        let (xa, ya) = a.get_position();
        let (xb, yb) = b.get_position();
        (xa - xb).hypot(ya - yb)
    }
}

/// euclidean distance between 2 entities
pub fn distance(a: &Entity, b: &Entity) -> f64 {
    Euclidean.eval(a, b)
}

// end of mod tests
