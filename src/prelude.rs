// inclusion facility

pub use crate::distance::*;

pub use crate::entity::*;

pub use crate::error::FacilityError;

pub use crate::facility::*;

pub use crate::metrics::*;

pub use crate::partition::*;

pub use crate::pipeline::*;

pub use crate::selector::*;

pub use crate::voronoi::*;
