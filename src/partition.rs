//! Partition of entities into clusters.
//!
//! The base rule is one cluster per region. An override table can carve a subregion out of
//! a region into its own cluster, the default table does this for the Bierzo in León.

use std::collections::BTreeMap;

use crate::entity::Entity;

/// (region, subregion) -> cluster key.  Matching is exact (case and accents).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionOverride {
    region: String,
    subregion: String,
    key: String,
}

impl RegionOverride {
    pub fn new(region: &str, subregion: &str, key: &str) -> Self {
        RegionOverride {
            region: region.to_string(),
            subregion: subregion.to_string(),
            key: key.to_string(),
        }
    }

    pub fn get_key(&self) -> &str {
        &self.key
    }

    fn matches(&self, entity: &Entity) -> bool {
        entity.get_region() == self.region && entity.get_subregion() == self.subregion
    }
}

/// the Bierzo comarca is a cluster of its own
pub fn bierzo_override() -> RegionOverride {
    RegionOverride::new("LEÓN", "COMARCA DE EL BIERZO", "BIERZO")
}

/// Clusters are kept ordered by key, members in input order.
pub type Clusters<'a> = BTreeMap<String, Vec<&'a Entity>>;

#[derive(Clone, Debug)]
pub struct Partitioner {
    overrides: Vec<RegionOverride>,
}

impl Default for Partitioner {
    fn default() -> Self {
        Partitioner {
            overrides: vec![bierzo_override()],
        }
    }
}

impl Partitioner {
    /// first matching override wins
    pub fn new(overrides: Vec<RegionOverride>) -> Self {
        Partitioner { overrides }
    }

    /// no override, clusters are regions
    pub fn by_region() -> Self {
        Partitioner { overrides: Vec::new() }
    }

    pub fn get_overrides(&self) -> &[RegionOverride] {
        &self.overrides
    }

    /// cluster key of an entity
    pub fn cluster_key<'b>(&'b self, entity: &'b Entity) -> &'b str {
        self.overrides
            .iter()
            .find(|o| o.matches(entity))
            .map(|o| o.get_key())
            .unwrap_or_else(|| entity.get_region())
    }

    /// group entities by cluster key. Every cluster returned has at least one member.
    pub fn partition<'a>(&self, entities: &'a [Entity]) -> Clusters<'a> {
        let mut clusters = Clusters::new();
        for e in entities {
            let key = self.cluster_key(e);
            match clusters.get_mut(key) {
                Some(members) => members.push(e),
                None => {
                    clusters.insert(key.to_string(), vec![e]);
                }
            }
        }
        log::debug!(
            "partition of {} entities in {} clusters",
            entities.len(),
            clusters.len()
        );
        clusters
    } // end of partition
} // end of impl Partitioner

#[cfg(test)]
mod tests {

    use super::*;

    fn muni(name: &str, region: &str, subregion: &str) -> Entity {
        Entity::new(name, region, subregion, 0., 0., 100).unwrap()
    }

    #[test]
    fn bierzo_carved_out_of_leon() {
        let entities = vec![
            muni("PONFERRADA", "LEÓN", "COMARCA DE EL BIERZO"),
            muni("LEÓN", "LEÓN", "TIERRA DE LEÓN"),
            muni("ASTORGA", "LEÓN", "MARAGATERÍA"),
            muni("ZAMORA", "ZAMORA", "TIERRA DEL PAN"),
            muni("BEMBIBRE", "LEÓN", "COMARCA DE EL BIERZO"),
        ];
        let clusters = Partitioner::default().partition(&entities);
        let keys: Vec<&str> = clusters.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["BIERZO", "LEÓN", "ZAMORA"]);
        let bierzo: Vec<&str> = clusters["BIERZO"].iter().map(|e| e.get_name()).collect();
        assert_eq!(bierzo, vec!["PONFERRADA", "BEMBIBRE"]);
        assert_eq!(clusters["LEÓN"].len(), 2);
    }

    #[test]
    fn matching_is_exact() {
        // without accent, or the subregion in another region, no override
        let entities = vec![
            muni("a", "LEON", "COMARCA DE EL BIERZO"),
            muni("b", "ZAMORA", "COMARCA DE EL BIERZO"),
            muni("c", "LEÓN", "Comarca de El Bierzo"),
        ];
        let partitioner = Partitioner::default();
        assert_eq!(partitioner.cluster_key(&entities[0]), "LEON");
        assert_eq!(partitioner.cluster_key(&entities[1]), "ZAMORA");
        assert_eq!(partitioner.cluster_key(&entities[2]), "LEÓN");
    }

    #[test]
    fn every_entity_in_one_cluster() {
        let entities = vec![
            muni("a", "R1", "S1"),
            muni("b", "R1", "S2"),
            muni("c", "R2", "S1"),
            muni("d", "R3", "S3"),
        ];
        let partitioner = Partitioner::new(vec![
            RegionOverride::new("R1", "S2", "R1-S2"),
            RegionOverride::new("R1", "S2", "never used"),
        ]);
        let clusters = partitioner.partition(&entities);
        let total: usize = clusters.values().map(|m| m.len()).sum();
        assert_eq!(total, entities.len());
        assert!(clusters.values().all(|m| !m.is_empty()));
        assert_eq!(clusters["R1-S2"][0].get_name(), "b");
        assert!(!clusters.contains_key("never used"));
        //
        let plain = Partitioner::by_region().partition(&entities);
        assert_eq!(plain.len(), 3);
        assert_eq!(plain["R1"].len(), 2);
    }
} // end of mod tests
