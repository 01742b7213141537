//! Service areas: each entity is dispatched to its nearest facility.
//!
//! This is a discrete Voronoi partition sampled at entity locations. A cell can cross
//! cluster boundaries, an entity is not necessarily served by the facility of its own cluster.

use indexmap::IndexMap;
use rayon::prelude::*;

use crate::distance::{Euclidean, Metric};
use crate::entity::Entity;
use crate::error::{FacilityError, Result};
use crate::facility::Facilities;

/// affectation of an entity to its nearest facility
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    entity: Entity,
    // key of the nearest facility
    assigned_cluster: String,
    // name of the facility entity
    facility_name: String,
    distance: f64,
}

impl Assignment {
    pub fn get_entity(&self) -> &Entity {
        &self.entity
    }

    pub fn get_assigned_cluster(&self) -> &str {
        &self.assigned_cluster
    }

    pub fn get_facility_name(&self) -> &str {
        &self.facility_name
    }

    pub fn get_distance(&self) -> f64 {
        self.distance
    }
}

/// dispatch with euclidean distance
pub fn assign(entities: &[Entity], facilities: &Facilities) -> Result<Vec<Assignment>> {
    assign_with(entities, facilities, &Euclidean)
}

/// Returns one assignment per entity, in entity order.
/// Entity scans are independent and run in parallel over a read only facility map.
pub fn assign_with<Dist>(entities: &[Entity], facilities: &Facilities, distance: &Dist) -> Result<Vec<Assignment>>
where
    Dist: Metric + Sync,
{
    if facilities.is_empty() {
        return Err(FacilityError::invalid("cannot assign entities without facility"));
    }
    log::debug!(
        "dispatching {} entities to {} facilities",
        entities.len(),
        facilities.len()
    );
    //
    let dispatch_i = |entity: &Entity| -> Result<Assignment> {
        let (f, d) = facilities
            .get_nearest_facility(entity, distance)
            .ok_or_else(|| FacilityError::invalid("cannot assign entities without facility"))?;
        Ok(Assignment {
            entity: entity.clone(),
            assigned_cluster: f.get_cluster().to_string(),
            facility_name: f.get_entity().get_name().to_string(),
            distance: d,
        })
    };
    entities.par_iter().map(dispatch_i).collect()
} // end of assign_with

/// Names of entities in the service area of each facility, in facility order.
/// Every facility has an entry, possibly empty.
pub fn service_areas(assignments: &[Assignment], facilities: &Facilities) -> IndexMap<String, Vec<String>> {
    let mut areas: IndexMap<String, Vec<String>> = facilities.keys().map(|k| (k.to_string(), Vec::new())).collect();
    for a in assignments {
        match areas.get_mut(a.get_assigned_cluster()) {
            Some(area) => area.push(a.get_entity().get_name().to_string()),
            None => log::error!(
                "service_areas : facility {} is unknown",
                a.get_assigned_cluster()
            ),
        }
    }
    areas
}

// end of mod tests
