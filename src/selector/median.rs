//! 1-median selection with a population constraint.
//!
//! The algorithm runs in 2 phases:
//!   - the unconstrained 1-median of the cluster is computed over *all* members (the ideal center),
//!     the cost of a member being the sum of its distances to the other members.
//!   - if the ideal center has enough population it is the facility. If not the eligible member nearest
//!     to the ideal center is chosen, or the most populous member if no member is eligible.
//!
//! Contrary to [pcenter](super::pcenter::pcenter) the population filter does not restrict the cost evaluation,
//! it only corrects an ineligible ideal center.

use crate::distance::Metric;
use crate::entity::Entity;
use crate::error::{FacilityError, Result};

use super::{Selection, check_not_empty, eligible, first_argmin};

/// sum of distances from candidate to the other members
pub fn total_distance<Dist: Metric>(candidate: &Entity, members: &[&Entity], distance: &Dist) -> f64 {
    let mut cost = 0.;
    for m in members {
        if !std::ptr::eq(*m, candidate) {
            cost += distance.eval(candidate, m);
        }
    }
    cost
}

/// returns the unconstrained 1-median of members and its cost
pub fn ideal_center<'a, Dist: Metric>(members: &[&'a Entity], distance: &Dist) -> Result<Selection<'a>> {
    check_not_empty(members)?;
    let (center, cost) = first_argmin(members, |m| total_distance(m, members, distance))
        .ok_or_else(|| FacilityError::invalid("no member in cluster"))?;
    Ok(Selection::new(center, cost))
}

// most populous member, first one on ties
fn most_populous<'a>(members: &[&'a Entity]) -> Option<&'a Entity> {
    let mut best: Option<&'a Entity> = None;
    for &m in members {
        match best {
            Some(b) if m.get_population() <= b.get_population() => {}
            _ => best = Some(m),
        }
    }
    best
}

/// returns the facility of members under the 1-median objective with population threshold
pub fn median<'a, Dist: Metric>(
    members: &[&'a Entity],
    threshold: u64,
    distance: &Dist,
) -> Result<Selection<'a>> {
    let ideal = ideal_center(members, distance)?;
    let center = ideal.get_entity();
    if center.get_population() >= threshold {
        log::trace!("median : ideal center {} is eligible", center.get_name());
        return Ok(ideal);
    }
    //
    let candidates = eligible(members, threshold);
    let chosen = if candidates.is_empty() {
        log::debug!(
            "median : no member with population >= {}, falling back to most populous",
            threshold
        );
        most_populous(members).ok_or_else(|| FacilityError::invalid("no member in cluster"))?
    } else {
        let (nearest, d) = first_argmin(&candidates, |c| distance.eval(c, center))
            .ok_or_else(|| FacilityError::invalid("no candidate in cluster"))?;
        log::debug!(
            "median : ideal center {} has population {}, replaced by {} at distance {:.3e}",
            center.get_name(),
            center.get_population(),
            nearest.get_name(),
            d
        );
        nearest
    };
    //
    Ok(Selection::new(chosen, total_distance(chosen, members, distance)))
} // end of median

// end of mod tests
