//! Chooses one heliport per province (the Bierzo being a cluster of its own) in a municipality file,
//! dispatches every municipality to its nearest heliport, dumps the service areas in csv and prints metrics.
//!
//! usage : heliports --data municipios.csv [--objective pcenter|median] [--threshold 300] [--output file.csv]

use cpu_time::ProcessTime;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use clap::{Arg, ArgAction, ArgMatches, Command};

use helibase::prelude::*;
use municipios::{export::*, io::*};

struct HeliportParams {
    data: PathBuf,
    output: PathBuf,
    delimiter: u8,
    arg: SelectionArg,
}

fn parse_cmd(matches: &ArgMatches) -> Result<HeliportParams, anyhow::Error> {
    log::debug!("in parse_cmd");
    let data = matches
        .get_one::<String>("data")
        .ok_or_else(|| anyhow::anyhow!("data file is required"))?;
    let objective = match matches.get_one::<String>("objective") {
        Some(name) => name.parse::<Objective>()?,
        None => Objective::PCenter,
    };
    let threshold = matches
        .get_one::<u64>("threshold")
        .copied()
        .unwrap_or(DEFAULT_THRESHOLD);
    let output = match matches.get_one::<String>("output") {
        Some(name) => PathBuf::from(name),
        None => PathBuf::from(default_output_name(objective)),
    };
    let delimiter = match matches.get_one::<String>("delimiter") {
        Some(d) if d.len() == 1 => d.as_bytes()[0],
        Some(d) => {
            return Err(anyhow::anyhow!("delimiter must be a single byte, got {:?}", d));
        }
        None => DEFAULT_DELIMITER,
    };
    let overrides = if matches.get_flag("by_region") {
        Vec::new()
    } else {
        vec![bierzo_override()]
    };
    //
    Ok(HeliportParams {
        data: PathBuf::from(data),
        output,
        delimiter,
        arg: SelectionArg::new(objective, threshold, overrides),
    })
} // end of parse_cmd

//=====================================================================

pub fn main() -> anyhow::Result<()> {
    //
    let _ = env_logger::builder().try_init();
    //
    log::info!("running heliports");
    //
    let matches = Command::new("heliports")
        .arg_required_else_help(true)
        .arg(
            Arg::new("data")
                .long("data")
                .required(true)
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(String))
                .help("municipality csv file"),
        )
        .arg(
            Arg::new("objective")
                .long("objective")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(String))
                .default_value("pcenter")
                .help("expecting pcenter or median"),
        )
        .arg(
            Arg::new("threshold")
                .long("threshold")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(u64))
                .default_value("300")
                .help("minimal population of a heliport municipality"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(String))
                .help("csv file for service areas, default depends on objective"),
        )
        .arg(
            Arg::new("delimiter")
                .long("delimiter")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(String))
                .default_value(";")
                .help("delimiter of the municipality file"),
        )
        .arg(
            Arg::new("by_region")
                .long("by-region")
                .action(ArgAction::SetTrue)
                .help("one cluster per province, no Bierzo cluster"),
        )
        .get_matches();
    //
    let params = parse_cmd(&matches)?;
    //
    let cpu_start = ProcessTime::now();
    let sys_now = SystemTime::now();
    //
    let entities = entities_from_csv(&params.data, params.delimiter)?;
    let objective = params.arg.get_objective();
    let planner = FacilityPlanner::new(params.arg);
    let plan = planner.compute(&entities)?;
    //
    let facilities = plan.get_facilities();
    facilities.log();
    let _ = facilities.cross_distances(&Euclidean);
    if let Some((c1, c2, d)) = facilities.min_spacing(&Euclidean) {
        log::info!("closest heliports : {} and {}, distance : {:.3e}", c1, c2, d);
    }
    for (q, d) in distance_quantiles(plan.get_assignments(), &[0.5, 0.9, 0.99])? {
        log::info!("distance to heliport quantile at {:.2} : {:.3e}", q, d);
    }
    //
    let nb_record = dump_assignments(&params.output, &plan, planner.get_partitioner())?;
    println!("csv created: {} ({} rows)", params.output.display(), nb_record);
    //
    let mut stdout = std::io::stdout();
    report(&mut stdout, &plan, objective)?;
    //
    let cpu_time: Duration = cpu_start.elapsed();
    log::info!(
        "  sys time(ms) {:?} cpu time(ms) {:?}",
        sys_now.elapsed().map(|d| d.as_millis()).unwrap_or(0),
        cpu_time.as_millis()
    );
    Ok(())
} // end of main
