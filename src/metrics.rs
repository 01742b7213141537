//! Summary of distances from entities to the facility serving them.

use std::collections::HashMap;

use quantiles::ckms::CKMS;

use crate::error::{FacilityError, Result};
use crate::voronoi::Assignment;

#[cfg_attr(doc, katexit::katexit)]
/// Aggregates over an assignment of $N$ entities, $d_{i}$ being the distance of entity $i$ to its facility
/// and $p_{i}$ its population:
/// - max : $ \max_{i} d_{i} $, the p-center criterion
/// - mean : $ \frac{1}{N} \sum_{i} d_{i} $
/// - total : $ \sum_{i} d_{i} $
/// - weighted mean : $ \frac{\sum_{i} p_{i} d_{i}}{\sum_{i} p_{i}} $
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MetricsSummary {
    max: f64,
    mean: f64,
    total: f64,
    weighted_mean: f64,
    nb_assignments: usize,
    total_population: u64,
}

impl MetricsSummary {
    pub fn get_max(&self) -> f64 {
        self.max
    }

    pub fn get_mean(&self) -> f64 {
        self.mean
    }

    pub fn get_total(&self) -> f64 {
        self.total
    }

    pub fn get_weighted_mean(&self) -> f64 {
        self.weighted_mean
    }

    pub fn get_nb_assignments(&self) -> usize {
        self.nb_assignments
    }

    pub fn get_total_population(&self) -> u64 {
        self.total_population
    }

    pub fn log(&self) {
        log::info!(
            "metrics : max : {:.3e}, mean : {:.3e}, total : {:.3e}, weighted mean : {:.3e}, nb : {}, population : {}",
            self.max,
            self.mean,
            self.total,
            self.weighted_mean,
            self.nb_assignments,
            self.total_population
        );
    }
}

// distances and populations must have same length, checked by callers
fn summarize_values(distances: &[f64], populations: &[u64]) -> Result<MetricsSummary> {
    if distances.is_empty() {
        return Err(FacilityError::invalid("cannot summarize an empty assignment"));
    }
    let total_population = populations
        .iter()
        .try_fold(0u64, |acc, p| acc.checked_add(*p))
        .ok_or_else(|| FacilityError::invalid("total population overflows"))?;
    if total_population == 0 {
        return Err(FacilityError::invalid(
            "total population is zero, weighted mean is undefined",
        ));
    }
    let total: f64 = distances.iter().sum();
    let max = distances.iter().copied().fold(0., f64::max);
    let weighted: f64 = distances
        .iter()
        .zip(populations.iter())
        .map(|(d, p)| d * (*p as f64))
        .sum();
    Ok(MetricsSummary {
        max,
        mean: total / distances.len() as f64,
        total,
        weighted_mean: weighted / total_population as f64,
        nb_assignments: distances.len(),
        total_population,
    })
} // end of summarize_values

/// Summary with populations given by entity name.
/// Fails if assignments is empty, if an entity has no population or if total population is 0.
pub fn summarize(assignments: &[Assignment], populations: &HashMap<String, u64>) -> Result<MetricsSummary> {
    let mut pops = Vec::<u64>::with_capacity(assignments.len());
    for a in assignments {
        let name = a.get_entity().get_name();
        match populations.get(name) {
            Some(p) => pops.push(*p),
            None => {
                return Err(FacilityError::invalid(format!("no population for entity {:?}", name)));
            }
        }
    }
    let distances: Vec<f64> = assignments.iter().map(|a| a.get_distance()).collect();
    summarize_values(&distances, &pops)
}

/// Summary with the populations carried by assigned entities
pub fn summarize_assignments(assignments: &[Assignment]) -> Result<MetricsSummary> {
    let distances: Vec<f64> = assignments.iter().map(|a| a.get_distance()).collect();
    let pops: Vec<u64> = assignments.iter().map(|a| a.get_entity().get_population()).collect();
    summarize_values(&distances, &pops)
}

/// Approximate quantiles of distances to facility, returns couples (quantile, distance).
/// Quantiles must be in [0,1].
pub fn distance_quantiles(assignments: &[Assignment], quantiles: &[f64]) -> Result<Vec<(f64, f64)>> {
    if assignments.is_empty() {
        return Err(FacilityError::invalid("cannot compute quantiles of an empty assignment"));
    }
    if let Some(q) = quantiles.iter().find(|q| !(0. ..=1.).contains(*q)) {
        return Err(FacilityError::invalid(format!("quantile {} not in [0,1]", q)));
    }
    let mut q_dist = CKMS::<f64>::new(0.001);
    for a in assignments {
        q_dist.insert(a.get_distance());
    }
    let res = quantiles
        .iter()
        .filter_map(|q| q_dist.query(*q).map(|(_, v)| (*q, v)))
        .collect();
    Ok(res)
}

// end of mod tests
