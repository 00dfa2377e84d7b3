//! The `OutputWriter` trait implemented by backend writers.

use crate::{
    EnvironmentRow, FindingRow, OutputResult, SubStepRow, ZoneAverageRow, ZoneMassBalanceRow,
};

/// Trait implemented by output backends.
///
/// All methods are infallible from the observer's perspective: errors are
/// stored internally and retrieved with
/// [`HvacOutputObserver::take_error`][crate::HvacOutputObserver::take_error].
pub trait OutputWriter {
    fn write_sub_step(&mut self, row: &SubStepRow) -> OutputResult<()>;

    /// Write the averages of every zone for one zone step.
    fn write_zone_averages(&mut self, rows: &[ZoneAverageRow]) -> OutputResult<()>;

    /// Write the mass balance terms of every zone for one sub-step.
    fn write_mass_balance(&mut self, rows: &[ZoneMassBalanceRow]) -> OutputResult<()>;

    fn write_finding(&mut self, row: &FindingRow) -> OutputResult<()>;

    fn write_environment(&mut self, row: &EnvironmentRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
