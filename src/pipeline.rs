//! This module chains the whole computation:
//! partition of entities into clusters, selection of one facility per cluster,
//! dispatching of all entities to their nearest facility and summary of distances.
//!
//! Either the whole chain succeeds and a complete [Plan] is returned, or the first error is returned.

use std::time::{Duration, SystemTime};

use cpu_time::ProcessTime;

use crate::distance::{Euclidean, Metric};
use crate::entity::{Entity, check_unique_names};
use crate::error::{FacilityError, Result};
use crate::facility::Facilities;
use crate::metrics::{MetricsSummary, summarize_assignments};
use crate::partition::{Partitioner, RegionOverride, bierzo_override};
use crate::selector::{Objective, select_facilities};
use crate::voronoi::{Assignment, assign_with};

/// default population a facility must reach
pub const DEFAULT_THRESHOLD: u64 = 300;

/// parameters of a run
#[derive(Clone, Debug)]
pub struct SelectionArg {
    objective: Objective,
    /// minimal population for an entity to be eligible as facility
    threshold: u64,
    /// cluster overrides, first match wins
    overrides: Vec<RegionOverride>,
}

impl SelectionArg {
    pub fn new(objective: Objective, threshold: u64, overrides: Vec<RegionOverride>) -> Self {
        SelectionArg {
            objective,
            threshold,
            overrides,
        }
    }

    pub fn get_objective(&self) -> Objective {
        self.objective
    }

    pub fn get_threshold(&self) -> u64 {
        self.threshold
    }

    pub fn get_overrides(&self) -> &[RegionOverride] {
        &self.overrides
    }
}

impl Default for SelectionArg {
    fn default() -> Self {
        SelectionArg {
            objective: Objective::PCenter,
            threshold: DEFAULT_THRESHOLD,
            overrides: vec![bierzo_override()],
        }
    }
}

//==================================================================

/// result of a run
#[derive(Clone, Debug)]
pub struct Plan {
    facilities: Facilities,
    assignments: Vec<Assignment>,
    summary: MetricsSummary,
}

impl Plan {
    /// cluster -> facility
    pub fn get_facilities(&self) -> &Facilities {
        &self.facilities
    }

    /// one assignment per entity in input order
    pub fn get_assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn get_summary(&self) -> &MetricsSummary {
        &self.summary
    }
}

//==================================================================

pub struct FacilityPlanner<Dist: Metric + Sync = Euclidean> {
    arg: SelectionArg,
    partitioner: Partitioner,
    distance: Dist,
}

impl FacilityPlanner<Euclidean> {
    pub fn new(arg: SelectionArg) -> Self {
        FacilityPlanner::with_metric(arg, Euclidean)
    }
}

impl<Dist: Metric + Sync> FacilityPlanner<Dist> {
    pub fn with_metric(arg: SelectionArg, distance: Dist) -> Self {
        lazy_static::initialize(&crate::LOG);
        let partitioner = Partitioner::new(arg.get_overrides().to_vec());
        FacilityPlanner {
            arg,
            partitioner,
            distance,
        }
    }

    pub fn get_arg(&self) -> &SelectionArg {
        &self.arg
    }

    pub fn get_partitioner(&self) -> &Partitioner {
        &self.partitioner
    }

    /// runs partition, selection, dispatch and summary.
    /// Entities must be non empty with unique names.
    pub fn compute(&self, entities: &[Entity]) -> Result<Plan> {
        //
        let cpu_start = ProcessTime::now();
        let sys_now = SystemTime::now();
        //
        if entities.is_empty() {
            return Err(FacilityError::invalid("no entity to process"));
        }
        check_unique_names(entities)?;
        //
        let clusters = self.partitioner.partition(entities);
        log::info!("{} entities in {} clusters", entities.len(), clusters.len());
        let mut facilities = select_facilities(
            &clusters,
            self.arg.get_objective(),
            self.arg.get_threshold(),
            &self.distance,
        )?;
        if facilities.len() != clusters.len() {
            return Err(FacilityError::invalid(format!(
                "{} facilities selected for {} clusters",
                facilities.len(),
                clusters.len()
            )));
        }
        //
        let assignments = assign_with(entities, &facilities, &self.distance)?;
        facilities.register(&assignments);
        let summary = summarize_assignments(&assignments)?;
        summary.log();
        //
        let cpu_time: Duration = cpu_start.elapsed();
        log::info!(
            "FacilityPlanner::compute sys time(ms) {:?} cpu time(ms) {:?}",
            sys_now.elapsed().map(|d| d.as_millis()).unwrap_or(0),
            cpu_time.as_millis()
        );
        //
        Ok(Plan {
            facilities,
            assignments,
            summary,
        })
    } // end of compute
} // end of impl FacilityPlanner

#[cfg(test)]
mod tests {

    use super::*;
    use crate::distance::distance;
    use crate::voronoi::service_areas;

    use rand::Rng;
    use rand_xoshiro::Xoshiro256PlusPlus;
    use rand_xoshiro::rand_core::SeedableRng;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    // random municipalities in 4 provinces, some in the Bierzo
    fn random_country(nb: usize, seed: u64) -> Vec<Entity> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let provinces = ["BURGOS", "LEÓN", "PALENCIA", "ZAMORA"];
        (0..nb)
            .map(|i| {
                let p = rng.random_range(0..provinces.len());
                let subregion = if p == 1 && rng.random_bool(0.3) {
                    "COMARCA DE EL BIERZO"
                } else {
                    "OTRA"
                };
                let x = 100_000. * p as f64 + rng.random_range(0. ..120_000.);
                let y = rng.random_range(4_500_000. ..4_700_000.);
                Entity::new(
                    &format!("muni-{}", i),
                    provinces[p],
                    subregion,
                    x,
                    y,
                    rng.random_range(0..2000),
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn abc_end_to_end() {
        log_init_test();
        let entities = vec![
            Entity::new("A", "R", "S", 0., 0., 500).unwrap(),
            Entity::new("B", "R", "S", 10., 0., 100).unwrap(),
            Entity::new("C", "R", "S", 5., 0., 400).unwrap(),
        ];
        for objective in [Objective::PCenter, Objective::Median] {
            let planner = FacilityPlanner::new(SelectionArg::new(objective, 300, vec![]));
            let plan = planner.compute(&entities).unwrap();
            let f = plan.get_facilities().get_facility("R").unwrap();
            assert_eq!(f.get_entity().get_name(), "C");
            assert_eq!(f.get_nb_served(), 3);
            assert_eq!(f.get_served_population(), 1000);
            let distances: Vec<f64> = plan.get_assignments().iter().map(|a| a.get_distance()).collect();
            assert_eq!(distances, vec![5., 5., 0.]);
            assert_eq!(plan.get_summary().get_max(), 5.);
        }
    }

    #[test]
    fn invariants_on_random_country() {
        log_init_test();
        let entities = random_country(500, 117);
        for objective in [Objective::PCenter, Objective::Median] {
            let planner = FacilityPlanner::new(SelectionArg::new(objective, 300, vec![bierzo_override()]));
            let plan = planner.compute(&entities).unwrap();
            let clusters = planner.get_partitioner().partition(&entities);
            let facilities = plan.get_facilities();
            assert_eq!(facilities.len(), clusters.len());
            assert!(facilities.get_facility("BIERZO").is_some());
            // one assignment per entity, to its nearest facility
            let assignments = plan.get_assignments();
            assert_eq!(assignments.len(), entities.len());
            for (a, e) in assignments.iter().zip(entities.iter()) {
                assert_eq!(a.get_entity().get_name(), e.get_name());
                for (_, f) in facilities.iter() {
                    assert!(a.get_distance() <= distance(e, f.get_entity()));
                }
            }
            // selected facility belongs to its cluster
            for (key, f) in facilities.iter() {
                assert_eq!(planner.get_partitioner().cluster_key(f.get_entity()), key);
            }
            let served: usize = facilities.iter().map(|(_, f)| f.get_nb_served()).sum();
            assert_eq!(served, entities.len());
            let areas = service_areas(assignments, facilities);
            assert_eq!(areas.values().map(|a| a.len()).sum::<usize>(), entities.len());
        }
    }

    #[test]
    fn pcenter_cost_bounds_its_cluster() {
        let entities = random_country(300, 4664);
        let planner = FacilityPlanner::new(SelectionArg::default());
        let plan = planner.compute(&entities).unwrap();
        let clusters = planner.get_partitioner().partition(&entities);
        for (key, members) in clusters.iter() {
            let f = plan.get_facilities().get_facility(key).unwrap();
            for m in members {
                assert!(distance(f.get_entity(), m) <= f.get_cost());
            }
        }
    }

    #[test]
    fn runs_are_identical() {
        let entities = random_country(400, 1454691);
        for objective in [Objective::PCenter, Objective::Median] {
            let planner = FacilityPlanner::new(SelectionArg::new(objective, 300, vec![bierzo_override()]));
            let first = planner.compute(&entities).unwrap();
            let second = planner.compute(&entities).unwrap();
            assert_eq!(first.get_assignments(), second.get_assignments());
            assert_eq!(first.get_summary(), second.get_summary());
        }
    }

    #[test]
    fn bad_inputs_rejected() {
        let planner = FacilityPlanner::new(SelectionArg::default());
        assert!(matches!(planner.compute(&[]), Err(FacilityError::InvalidArgument(_))));
        let dup = vec![
            Entity::new("A", "R", "S", 0., 0., 500).unwrap(),
            Entity::new("A", "Q", "S", 1., 0., 500).unwrap(),
        ];
        assert!(planner.compute(&dup).is_err());
        // all populations at zero, weighted mean undefined
        let empty_towns = vec![
            Entity::new("A", "R", "S", 0., 0., 0).unwrap(),
            Entity::new("B", "R", "S", 1., 0., 0).unwrap(),
        ];
        assert!(planner.compute(&empty_towns).is_err());
    }
} // end of mod tests
