//! reading of the municipality csv file.
//!
//! The file has one row per municipality, `;` separated, with (at least) the columns
//! Municipio, Provincia, Comarca, CoordenadaX, CoordenadaY, Población.
//! Other columns are ignored. A UTF-8 BOM in front of the header line is removed.

use anyhow::{Context, anyhow};
use serde::Deserialize;
use std::fs::OpenOptions;
use std::io::{BufReader, Read};
use std::path::Path;

use helibase::entity::{Entity, EntityRecord};

/// default delimiter of the municipality file
pub const DEFAULT_DELIMITER: u8 = b';';

/// A row of the municipality file. Unparsable numbers are read as missing,
/// the selection engine rejects rows with missing fields.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MunicipioRow {
    #[serde(rename = "Municipio")]
    pub municipio: Option<String>,
    #[serde(rename = "Provincia")]
    pub provincia: Option<String>,
    #[serde(rename = "Comarca")]
    pub comarca: Option<String>,
    #[serde(rename = "CoordenadaX", default, deserialize_with = "csv::invalid_option")]
    pub x: Option<f64>,
    #[serde(rename = "CoordenadaY", default, deserialize_with = "csv::invalid_option")]
    pub y: Option<f64>,
    #[serde(rename = "Población", default, deserialize_with = "csv::invalid_option")]
    pub poblacion: Option<i64>,
}

impl From<MunicipioRow> for EntityRecord {
    fn from(row: MunicipioRow) -> Self {
        EntityRecord {
            name: row.municipio,
            region: row.provincia,
            subregion: row.comarca,
            x: row.x,
            y: row.y,
            population: row.poblacion,
        }
    }
}

// remove BOM and surrounding blanks from header names
fn clean_header(field: &str) -> String {
    field.replace('\u{feff}', "").trim().to_string()
}

/// read all rows. Fails on csv syntax errors only.
pub fn read_rows<R: Read>(reader: R, delimiter: u8) -> anyhow::Result<Vec<MunicipioRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);
    //
    let headers: csv::StringRecord = rdr.headers()?.iter().map(clean_header).collect();
    log::debug!("municipality file headers : {:?}", headers);
    for expected in ["Municipio", "Provincia", "Comarca", "CoordenadaX", "CoordenadaY", "Población"] {
        if !headers.iter().any(|h| h == expected) {
            return Err(anyhow!("municipality file has no column {}", expected));
        }
    }
    rdr.set_headers(headers);
    //
    let mut rows = Vec::<MunicipioRow>::new();
    for (i, result) in rdr.deserialize().enumerate() {
        let row: MunicipioRow = result.with_context(|| format!("reading municipality row {}", i + 1))?;
        rows.push(row);
    }
    log::info!("read {} municipality rows", rows.len());
    Ok(rows)
} // end of read_rows

/// read and validate entities
pub fn read_entities<R: Read>(reader: R, delimiter: u8) -> anyhow::Result<Vec<Entity>> {
    let rows = read_rows(reader, delimiter)?;
    let mut entities = Vec::<Entity>::with_capacity(rows.len());
    for (i, row) in rows.into_iter().enumerate() {
        let entity = Entity::try_from(EntityRecord::from(row))
            .with_context(|| format!("invalid municipality at row {}", i + 1))?;
        entities.push(entity);
    }
    Ok(entities)
}

/// read entities from a csv file
pub fn entities_from_csv(path: &Path, delimiter: u8) -> anyhow::Result<Vec<Entity>> {
    let file = OpenOptions::new()
        .read(true)
        .open(path)
        .with_context(|| format!("could not open municipality file : {:?}", path))?;
    let entities = read_entities(BufReader::new(file), delimiter)?;
    log::info!("entities_from_csv loaded {} entities from {:?}", entities.len(), path);
    Ok(entities)
}

#[cfg(test)]
mod tests {

    use super::*;

    const SAMPLE: &str = "\u{feff}Municipio;Cod_Municipio;Provincia;Comarca;CoordenadaX;CoordenadaY;Población
PONFERRADA;149;LEÓN;COMARCA DE EL BIERZO;698123.5;4713456.25;63747
ANDAVÍAS;9;ZAMORA;TIERRA DEL PAN;267000;4613000;567
";

    #[test]
    fn read_sample() {
        let entities = read_entities(SAMPLE.as_bytes(), DEFAULT_DELIMITER).unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].get_name(), "PONFERRADA");
        assert_eq!(entities[0].get_region(), "LEÓN");
        assert_eq!(entities[0].get_subregion(), "COMARCA DE EL BIERZO");
        assert_eq!(entities[0].get_position(), (698123.5, 4713456.25));
        assert_eq!(entities[0].get_population(), 63747);
        assert_eq!(entities[1].get_name(), "ANDAVÍAS");
    }

    #[test]
    fn missing_value_rejected() {
        let data = "Municipio;Provincia;Comarca;CoordenadaX;CoordenadaY;Población
A;R;S;1;;10
";
        let rows = read_rows(data.as_bytes(), b';').unwrap();
        assert!(rows[0].y.is_none());
        let err = read_entities(data.as_bytes(), b';').unwrap_err();
        assert!(format!("{:#}", err).contains("row 1"));
    }

    #[test]
    fn bad_numbers_and_negative_population_rejected() {
        let data = "Municipio;Provincia;Comarca;CoordenadaX;CoordenadaY;Población
A;R;S;1,5;2;10
";
        assert!(read_entities(data.as_bytes(), b';').is_err());
        let data = "Municipio;Provincia;Comarca;CoordenadaX;CoordenadaY;Población
A;R;S;1;2;-10
";
        assert!(read_entities(data.as_bytes(), b';').is_err());
    }

    #[test]
    fn missing_column_rejected() {
        let data = "Municipio;Provincia;CoordenadaX;CoordenadaY;Población
A;R;1;2;10
";
        let err = read_rows(data.as_bytes(), b';').unwrap_err();
        assert!(err.to_string().contains("Comarca"));
    }

    #[test]
    fn other_delimiter() {
        let data = "Municipio,Provincia,Comarca,CoordenadaX,CoordenadaY,Población
A,R,S,1,2,10
";
        let entities = read_entities(data.as_bytes(), b',').unwrap();
        assert_eq!(entities[0].get_position(), (1., 2.));
    }
} // end of mod tests
