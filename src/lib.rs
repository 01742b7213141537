//! Choice of one facility (an helicopter base for instance) per region among candidate locations,
//! dispatch of all locations to their nearest facility and summary of service distances.
//!
//! The chain is : [partition](partition) -> [selector] -> [voronoi] -> [metrics], and is driven by [pipeline].

use lazy_static::lazy_static;

pub mod prelude;

pub mod distance;
pub mod entity;
pub mod error;
pub mod partition;

pub mod facility;
pub mod selector;
pub mod voronoi;

pub mod metrics;
pub mod pipeline;

lazy_static! {
    static ref LOG: u64 = init_log();
}

// install a logger facility, done once by the first FacilityPlanner
fn init_log() -> u64 {
    let _res = env_logger::try_init();
    log::debug!("initializing logger");
    1
}

// end of tests
