//! Entities (municipalities) the engine works on.
//!
//! An [Entity] is built once from a raw [EntityRecord] coming from ingestion, and never mutated after.

use std::collections::HashSet;

use crate::error::{FacilityError, Result};

/// A located, populated point. Identity is the name.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    name: String,
    region: String,
    subregion: String,
    x: f64,
    y: f64,
    population: u64,
}

impl Entity {
    /// direct construction, mostly for tests and synthetic data.
    /// Coordinates must be finite.
    pub fn new(
        name: &str,
        region: &str,
        subregion: &str,
        x: f64,
        y: f64,
        population: u64,
    ) -> Result<Self> {
        if !x.is_finite() || !y.is_finite() {
            return Err(FacilityError::invalid(format!(
                "entity {:?} has non finite coordinates ({}, {})",
                name, x, y
            )));
        }
        Ok(Entity {
            name: name.to_string(),
            region: region.to_string(),
            subregion: subregion.to_string(),
            x,
            y,
            population,
        })
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_region(&self) -> &str {
        &self.region
    }

    pub fn get_subregion(&self) -> &str {
        &self.subregion
    }

    /// returns (x,y)
    pub fn get_position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn get_population(&self) -> u64 {
        self.population
    }
} // end of impl Entity

//==================================================================================

/// A row as delivered by an ingestion layer, every field may be missing.
/// Population is signed so that negative values can be detected and rejected.
#[derive(Clone, Debug, Default)]
pub struct EntityRecord {
    pub name: Option<String>,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub population: Option<i64>,
}

fn required<T>(field: Option<T>, fieldname: &str, name: &str) -> Result<T> {
    field.ok_or_else(|| {
        FacilityError::invalid(format!("record {:?} is missing field {}", name, fieldname))
    })
}

impl TryFrom<EntityRecord> for Entity {
    type Error = FacilityError;

    fn try_from(record: EntityRecord) -> Result<Entity> {
        let name = required(record.name, "name", "")?;
        let region = required(record.region, "region", &name)?;
        let subregion = required(record.subregion, "subregion", &name)?;
        let x = required(record.x, "x", &name)?;
        let y = required(record.y, "y", &name)?;
        let population = required(record.population, "population", &name)?;
        if population < 0 {
            return Err(FacilityError::invalid(format!(
                "record {:?} has negative population {}",
                name, population
            )));
        }
        Entity::new(&name, &region, &subregion, x, y, population as u64)
    }
}

/// converts a batch of records, failing on the first malformed one.
pub fn entities_from_records<I>(records: I) -> Result<Vec<Entity>>
where
    I: IntoIterator<Item = EntityRecord>,
{
    records.into_iter().map(Entity::try_from).collect()
}

/// check names are unique, as downstream lookups are done by name.
pub fn check_unique_names(entities: &[Entity]) -> Result<()> {
    let mut seen = HashSet::<&str>::with_capacity(entities.len());
    for e in entities {
        if !seen.insert(e.get_name()) {
            return Err(FacilityError::invalid(format!(
                "duplicate entity name {:?}",
                e.get_name()
            )));
        }
    }
    Ok(())
}

// end of mod tests
