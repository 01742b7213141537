//! implement facility management

use indexmap::IndexMap;
use ndarray::Array2;
use quantiles::ckms::CKMS; // we could use also greenwald_khanna

use crate::distance::Metric;
use crate::entity::Entity;
use crate::selector::Objective;
use crate::voronoi::Assignment;

/// A facility is the entity chosen to represent a cluster.
/// The structure stores the entity (cloned), the cost of the selection under the objective and,
/// once entities have been dispatched to their nearest facility, the size of the service area:
/// number of entities, population and sum of distances.
#[derive(Clone, Debug)]
pub struct Facility {
    // cluster key
    cluster: String,
    // facility location
    entity: Entity,
    //
    objective: Objective,
    // objective value for the cluster
    cost: f64,
    // service area, filled by insert
    nb_served: usize,
    population: u64,
    served_cost: f64,
}

impl Facility {
    pub fn new(cluster: &str, entity: &Entity, objective: Objective, cost: f64) -> Self {
        Facility {
            cluster: cluster.to_string(),
            entity: entity.clone(),
            objective,
            cost,
            nb_served: 0,
            population: 0,
            served_cost: 0.,
        }
    }

    pub fn get_cluster(&self) -> &str {
        &self.cluster
    }

    pub fn get_entity(&self) -> &Entity {
        &self.entity
    }

    pub fn get_objective(&self) -> Objective {
        self.objective
    }

    /// max distance to cluster members for p-center, sum of distances for 1-median
    pub fn get_cost(&self) -> f64 {
        self.cost
    }

    /// number of entities in the service area
    pub fn get_nb_served(&self) -> usize {
        self.nb_served
    }

    /// sum of population of the service area
    pub fn get_served_population(&self) -> u64 {
        self.population
    }

    /// sum of distances of the service area entities to this facility
    pub fn get_served_cost(&self) -> f64 {
        self.served_cost
    }

    pub(crate) fn insert(&mut self, population: u64, dist: f64) {
        self.nb_served += 1;
        self.population = self.population.saturating_add(population);
        self.served_cost += dist;
    }

    pub fn log(&self) {
        log::info!(
            "facility {} ({}), {} cost : {:.3e}, served : {}, population : {}, served cost : {:.3e}",
            self.entity.get_name(),
            self.cluster,
            self.objective,
            self.cost,
            self.nb_served,
            self.population,
            self.served_cost
        );
    }
} // end of block Facility

//===================================================================================

/// Facilities indexed by cluster key. Iteration order is insertion order, which is the
/// cluster key order when built by [select_facilities](crate::selector::select_facilities).
#[derive(Clone, Debug, Default)]
pub struct Facilities {
    centers: IndexMap<String, Facility>,
}

impl Facilities {
    /// size should be the number of clusters
    pub fn new(size: usize) -> Self {
        Facilities {
            centers: IndexMap::with_capacity(size),
        }
    }

    /// return number of facility
    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    /// a facility replaces an existing one with the same cluster key
    pub(crate) fn insert(&mut self, facility: Facility) {
        self.centers.insert(facility.get_cluster().to_string(), facility);
    }

    /// retrieve facility by cluster key
    pub fn get_facility(&self, cluster: &str) -> Option<&Facility> {
        self.centers.get(cluster)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.centers.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Facility)> {
        self.centers.iter().map(|(k, f)| (k.as_str(), f))
    }

    /// Return cluster key of nearest facility and distance to it, None if there is no facility.
    /// Facilities are scanned in order, the first one at minimal distance wins.
    pub fn get_nearest_facility<Dist: Metric>(&self, entity: &Entity, distance: &Dist) -> Option<(&Facility, f64)> {
        let mut best: Option<(&Facility, f64)> = None;
        for f in self.centers.values() {
            let d = distance.eval(f.get_entity(), entity);
            match best {
                Some((_, dmin)) if d >= dmin => {}
                _ => best = Some((f, d)),
            }
        }
        best
    } // end of get_nearest_facility

    /// Fills service area information of each facility from an assignment.
    /// Counters are reset before, so calling twice gives the same result.
    pub fn register(&mut self, assignments: &[Assignment]) {
        for f in self.centers.values_mut() {
            f.nb_served = 0;
            f.population = 0;
            f.served_cost = 0.;
        }
        for a in assignments {
            match self.centers.get_mut(a.get_assigned_cluster()) {
                Some(f) => f.insert(a.get_entity().get_population(), a.get_distance()),
                None => log::error!(
                    "register : {} assigned to unknown facility {}",
                    a.get_entity().get_name(),
                    a.get_assigned_cluster()
                ),
            }
        }
    } // end of register

    pub fn log(&self) {
        for f in self.centers.values() {
            f.log();
        }
    }

    /// Computes distances between facilities, in iteration order.
    /// Logs quantiles of cross distances and the pairs of facilities closer than the 0.01 quantile.
    pub fn cross_distances<Dist: Metric>(&self, distance: &Dist) -> Array2<f64> {
        let nb_facility = self.centers.len();
        let mut distances = Array2::<f64>::zeros((nb_facility, nb_facility));
        if nb_facility < 2 {
            return distances;
        }
        let mut q_dist = CKMS::<f64>::new(0.01);
        //
        let centers: Vec<&Facility> = self.centers.values().collect();
        for i in 0..nb_facility {
            for j in 0..nb_facility {
                if i != j {
                    distances[[i, j]] = distance.eval(centers[i].get_entity(), centers[j].get_entity());
                    if i < j {
                        q_dist.insert(distances[[i, j]]);
                    }
                }
            }
        }
        //
        log::info!("cross facility distances quantiles");
        for q in [0.05, 0.1, 0.5, 0.75, 0.9] {
            if let Some((_, v)) = q_dist.query(q) {
                log::info!("  quantile at {:.2} : {:.3e}", q, v);
            }
        }
        log::debug!("cross distances : {:.3e}", distances);
        if let Some((_, threshold)) = q_dist.query(0.01) {
            for i in 0..nb_facility {
                for j in (i + 1)..nb_facility {
                    if distances[[i, j]] < threshold {
                        log::info!(
                            "close facilities : {} and {}, distance : {:.3e}",
                            centers[i].get_entity().get_name(),
                            centers[j].get_entity().get_name(),
                            distances[[i, j]]
                        );
                    }
                }
            }
        }
        distances
    } // end of cross_distances

    /// smallest distance between 2 facilities with their keys. None if less than 2 facilities
    pub fn min_spacing<Dist: Metric>(&self, distance: &Dist) -> Option<(&str, &str, f64)> {
        let centers: Vec<&Facility> = self.centers.values().collect();
        let mut best: Option<(&str, &str, f64)> = None;
        for i in 0..centers.len() {
            for j in (i + 1)..centers.len() {
                let d = distance.eval(centers[i].get_entity(), centers[j].get_entity());
                match best {
                    Some((_, _, dmin)) if d >= dmin => {}
                    _ => best = Some((centers[i].get_cluster(), centers[j].get_cluster(), d)),
                }
            }
        }
        best
    }
} // end of impl block Facilities

// end of mod tests
