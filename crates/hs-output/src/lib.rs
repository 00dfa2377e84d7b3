//! `hs-output` — CSV output for the HVAC coordination core.
//!
//! | File                       | One row per                                   |
//! |----------------------------|-----------------------------------------------|
//! | `sub_steps.csv`            | accepted sub-step: length, iterations, status |
//! | `zone_averages.csv`        | zone and zone step: mean temperature and W    |
//! | `zone_mass_balance.csv`    | zone and sub-step: conservation terms         |
//! | `convergence_findings.csv` | divergence finding of a non-converged solve   |
//! | `environments.csv`         | finished environment: warning counters        |
//!
//! [`CsvWriter`] implements [`OutputWriter`] and is driven by
//! [`HvacOutputObserver`], which implements `hs_sim::HvacObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use hs_output::{CsvWriter, HvacOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = HvacOutputObserver::new(writer);
//! sim.run_zone_steps(96, &mut obs)?;
//! sim.end_environment(&mut obs);
//! obs.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::HvacOutputObserver;
pub use row::{EnvironmentRow, FindingRow, SubStepRow, ZoneAverageRow, ZoneMassBalanceRow};
pub use writer::OutputWriter;
