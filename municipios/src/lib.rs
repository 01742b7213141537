//! Reading of the municipality csv file, export of service areas and console report.

pub mod export;
pub mod io;
