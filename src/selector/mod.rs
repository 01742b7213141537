//! Selection of one facility per cluster.
//!
//! Two objectives are provided:
//!   - [pcenter](pcenter::pcenter) : minimize the maximal distance from the facility to the cluster members
//!   - [median](median::median) : 1-median, minimize the sum of distances to the cluster members
//!
//! Both honour a population threshold for eligibility with a deterministic fallback when no member meets it.
//! Ties are always broken in favour of the first entity in input order.

pub mod median;
pub mod pcenter;

pub use median::*;
pub use pcenter::*;

use rayon::prelude::*;

use crate::distance::{Euclidean, Metric};
use crate::entity::Entity;
use crate::error::{FacilityError, Result};
use crate::facility::{Facilities, Facility};
use crate::partition::Clusters;

/// objective function used to choose a facility
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Objective {
    /// minimize worst case distance
    PCenter,
    /// minimize total distance
    Median,
}

impl std::fmt::Display for Objective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Objective::PCenter => write!(f, "p-center"),
            Objective::Median => write!(f, "1-median"),
        }
    }
}

impl std::str::FromStr for Objective {
    type Err = FacilityError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pcenter" | "p-center" => Ok(Objective::PCenter),
            "median" | "1median" | "1-median" => Ok(Objective::Median),
            _ => Err(FacilityError::invalid(format!(
                "objective must be pcenter or median, got {:?}",
                s
            ))),
        }
    }
}

/// The entity chosen for a cluster and its cost under the objective.
#[derive(Copy, Clone, Debug)]
pub struct Selection<'a> {
    entity: &'a Entity,
    cost: f64,
}

impl<'a> Selection<'a> {
    pub(crate) fn new(entity: &'a Entity, cost: f64) -> Self {
        Selection { entity, cost }
    }

    pub fn get_entity(&self) -> &'a Entity {
        self.entity
    }

    pub fn get_cost(&self) -> f64 {
        self.cost
    }
}

// members whose population reaches threshold, in input order
pub(crate) fn eligible<'a>(members: &[&'a Entity], threshold: u64) -> Vec<&'a Entity> {
    members
        .iter()
        .filter(|e| e.get_population() >= threshold)
        .copied()
        .collect()
}

// Returns entity with minimal cost and its cost. A later entity must be strictly
// better to replace the current best, so the first one wins on ties.
pub(crate) fn first_argmin<'a, F>(items: &[&'a Entity], cost: F) -> Option<(&'a Entity, f64)>
where
    F: Fn(&Entity) -> f64,
{
    let mut best: Option<(&'a Entity, f64)> = None;
    for &e in items {
        let c = cost(e);
        match best {
            Some((_, best_cost)) if c >= best_cost => {}
            _ => best = Some((e, c)),
        }
    }
    best
}

pub(crate) fn check_not_empty(members: &[&Entity]) -> Result<()> {
    if members.is_empty() {
        return Err(FacilityError::invalid("cannot select a facility in an empty cluster"));
    }
    Ok(())
}

/// select a facility in cluster members with euclidean distance
pub fn select<'a>(members: &[&'a Entity], objective: Objective, threshold: u64) -> Result<Selection<'a>> {
    select_with(members, objective, threshold, &Euclidean)
}

/// select a facility in cluster members with a given metric
pub fn select_with<'a, Dist: Metric>(
    members: &[&'a Entity],
    objective: Objective,
    threshold: u64,
    distance: &Dist,
) -> Result<Selection<'a>> {
    match objective {
        Objective::PCenter => pcenter(members, threshold, distance),
        Objective::Median => median(members, threshold, distance),
    }
}

/// One selection per cluster. Clusters are processed in parallel, the map is built once
/// all selections are done and keeps the order of the cluster keys.
pub fn select_facilities<Dist>(
    clusters: &Clusters<'_>,
    objective: Objective,
    threshold: u64,
    distance: &Dist,
) -> Result<Facilities>
where
    Dist: Metric + Sync,
{
    log::info!(
        "selecting facilities for {} clusters, objective : {}, population threshold : {}",
        clusters.len(),
        objective,
        threshold
    );
    let todo: Vec<(&String, &Vec<&Entity>)> = clusters.iter().collect();
    let selected: Vec<Facility> = todo
        .into_par_iter()
        .map(|(key, members)| {
            select_with(members, objective, threshold, distance)
                .map(|s| Facility::new(key, s.get_entity(), objective, s.get_cost()))
        })
        .collect::<Result<Vec<Facility>>>()?;
    //
    let mut facilities = Facilities::new(selected.len());
    for f in selected {
        log::debug!(
            "cluster {} : facility {}, cost : {:.3e}",
            f.get_cluster(),
            f.get_entity().get_name(),
            f.get_cost()
        );
        facilities.insert(f);
    }
    Ok(facilities)
} // end of select_facilities

//==================================================================================

#[cfg(test)]
pub(crate) mod tests {

    use super::*;
    use crate::partition::Partitioner;

    pub(crate) fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    pub(crate) fn town(name: &str, population: u64, x: f64, y: f64) -> Entity {
        Entity::new(name, "R", "S", x, y, population).unwrap()
    }

    // the A, B, C line : A(500, x=0), B(100, x=10), C(400, x=5)
    pub(crate) fn abc() -> Vec<Entity> {
        vec![
            town("A", 500, 0., 0.),
            town("B", 100, 10., 0.),
            town("C", 400, 5., 0.),
        ]
    }

    #[test]
    fn objective_from_str() {
        assert_eq!("pcenter".parse::<Objective>().unwrap(), Objective::PCenter);
        assert_eq!("P-Center".parse::<Objective>().unwrap(), Objective::PCenter);
        assert!("1mediana".parse::<Objective>().is_err());
        assert_eq!("median".parse::<Objective>().unwrap(), Objective::Median);
        assert_eq!(Objective::Median.to_string(), "1-median");
    }

    #[test]
    fn argmin_first_wins() {
        let entities = vec![town("a", 1, 0., 0.), town("b", 1, 0., 0.), town("c", 1, 0., 0.)];
        let members: Vec<&Entity> = entities.iter().collect();
        let (best, cost) = first_argmin(&members, |e| if e.get_name() == "a" { 2. } else { 1. }).unwrap();
        assert_eq!(best.get_name(), "b");
        assert_eq!(cost, 1.);
        assert!(first_argmin(&[], |_| 0.).is_none());
    }

    #[test]
    fn empty_cluster_is_invalid() {
        for objective in [Objective::PCenter, Objective::Median] {
            let res = select(&[], objective, 300);
            assert!(matches!(res, Err(FacilityError::InvalidArgument(_))));
        }
    }

    #[test]
    fn singleton_cluster() {
        let lonely = town("lonely", 10, 3., 4.);
        for objective in [Objective::PCenter, Objective::Median] {
            let s = select(&[&lonely], objective, 300).unwrap();
            assert_eq!(s.get_entity().get_name(), "lonely");
            assert_eq!(s.get_cost(), 0.);
        }
    }

    #[test]
    fn one_facility_per_cluster() {
        log_init_test();
        let entities = vec![
            Entity::new("a", "R1", "S", 0., 0., 500).unwrap(),
            Entity::new("b", "R2", "S", 10., 0., 500).unwrap(),
            Entity::new("c", "R1", "S", 1., 0., 500).unwrap(),
            Entity::new("d", "R3", "S", 5., 5., 5).unwrap(),
            Entity::new("e", "R2", "S", 11., 0., 50).unwrap(),
        ];
        let clusters = Partitioner::default().partition(&entities);
        for objective in [Objective::PCenter, Objective::Median] {
            let facilities = select_facilities(&clusters, objective, 300, &Euclidean).unwrap();
            assert_eq!(facilities.len(), clusters.len());
            let keys: Vec<&str> = facilities.keys().collect();
            assert_eq!(keys, vec!["R1", "R2", "R3"]);
            assert_eq!(facilities.get_facility("R3").unwrap().get_entity().get_name(), "d");
            assert_eq!(facilities.get_facility("R2").unwrap().get_entity().get_name(), "b");
        }
    }
} // end of mod tests
