//! p-center (p = 1 per cluster) selection.
//!
//! Candidates are filtered on population *before* cost evaluation. The cost of a candidate is its
//! maximal distance to any member of the cluster (itself included), and the chosen facility is the candidate of minimal cost.

use crate::distance::Metric;
use crate::entity::Entity;
use crate::error::{FacilityError, Result};

use super::{Selection, check_not_empty, eligible, first_argmin};

/// worst case distance from candidate to members
pub fn radius<Dist: Metric>(candidate: &Entity, members: &[&Entity], distance: &Dist) -> f64 {
    members
        .iter()
        .map(|m| distance.eval(candidate, m))
        .fold(0., f64::max)
}

/// Choose among members with population >= threshold (or among all members if there is none)
/// the one minimizing the maximal distance to all members.
pub fn pcenter<'a, Dist: Metric>(
    members: &[&'a Entity],
    threshold: u64,
    distance: &Dist,
) -> Result<Selection<'a>> {
    check_not_empty(members)?;
    //
    let mut candidates = eligible(members, threshold);
    if candidates.is_empty() {
        log::debug!(
            "pcenter : no member with population >= {}, all {} members are candidates",
            threshold,
            members.len()
        );
        candidates = members.to_vec();
    }
    let (center, cost) = first_argmin(&candidates, |c| radius(c, members, distance))
        .ok_or_else(|| FacilityError::invalid("no candidate in cluster"))?;
    log::trace!("pcenter : {} radius : {:.3e}", center.get_name(), cost);
    //
    Ok(Selection::new(center, cost))
} // end of pcenter

// end of mod tests
