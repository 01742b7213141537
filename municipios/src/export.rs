//! export of the service areas in csv and console report of a plan

use anyhow::Context;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use helibase::partition::Partitioner;
use helibase::pipeline::Plan;
use helibase::selector::Objective;
use helibase::voronoi::service_areas;

/// one line of the exported file
#[derive(Debug, Serialize)]
pub struct ExportRow<'a> {
    #[serde(rename = "Municipio")]
    municipio: &'a str,
    #[serde(rename = "Provincia")]
    provincia: &'a str,
    #[serde(rename = "Comarca")]
    comarca: &'a str,
    cluster: &'a str,
    #[serde(rename = "CoordenadaX")]
    x: f64,
    #[serde(rename = "CoordenadaY")]
    y: f64,
    #[serde(rename = "Población")]
    poblacion: u64,
    area_servicio: &'a str,
    helipuerto_municipio: &'a str,
    distancia_helipuerto: f64,
}

/// name of the exported file for an objective
pub fn default_output_name(objective: Objective) -> &'static str {
    match objective {
        Objective::PCenter => "helipuertos_con_asignacion.csv",
        Objective::Median => "helipuertos_1mediana_con_asignacion.csv",
    }
}

/// Writes one line per assignment, comma separated with a header line. Returns number of records written.
pub fn write_assignments<W: Write>(writer: W, plan: &Plan, partitioner: &Partitioner) -> anyhow::Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut nb_record = 0;
    for a in plan.get_assignments() {
        let e = a.get_entity();
        let (x, y) = e.get_position();
        wtr.serialize(ExportRow {
            municipio: e.get_name(),
            provincia: e.get_region(),
            comarca: e.get_subregion(),
            cluster: partitioner.cluster_key(e),
            x,
            y,
            poblacion: e.get_population(),
            area_servicio: a.get_assigned_cluster(),
            helipuerto_municipio: a.get_facility_name(),
            distancia_helipuerto: a.get_distance(),
        })?;
        nb_record += 1;
    }
    wtr.flush()?;
    Ok(nb_record)
} // end of write_assignments

/// dumps assignments in file path. If Ok returns number of record dumped.
pub fn dump_assignments(path: &Path, plan: &Plan, partitioner: &Partitioner) -> anyhow::Result<usize> {
    let file = std::fs::File::create(path).with_context(|| format!("could not create {:?}", path))?;
    let bufw = std::io::BufWriter::new(file);
    let nb_record = write_assignments(bufw, plan, partitioner)?;
    log::info!("dumping service areas in file {:?}, nb_record : {}", path, nb_record);
    Ok(nb_record)
}

/// prints size of each service area and distance metrics
pub fn report<W: Write>(out: &mut W, plan: &Plan, objective: Objective) -> anyhow::Result<()> {
    let facilities = plan.get_facilities();
    let areas = service_areas(plan.get_assignments(), facilities);
    for (cluster, names) in areas.iter() {
        if let Some(f) = facilities.get_facility(cluster) {
            writeln!(
                out,
                "service area of {} ({}): {} municipalities",
                f.get_entity().get_name(),
                cluster,
                names.len()
            )?;
        }
    }
    let summary = plan.get_summary();
    writeln!(out, "\nmetrics of the {} model", objective)?;
    writeln!(out, "max distance to heliport: {:.2}", summary.get_max())?;
    writeln!(out, "mean distance to heliport: {:.2}", summary.get_mean())?;
    writeln!(out, "total distance (sum of distances): {:.2}", summary.get_total())?;
    writeln!(
        out,
        "population weighted mean distance: {:.2}",
        summary.get_weighted_mean()
    )?;
    Ok(())
} // end of report

// end of mod tests
