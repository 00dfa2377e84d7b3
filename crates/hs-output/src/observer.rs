//! `HvacOutputObserver<W>` — bridges `HvacObserver` to an `OutputWriter`.

use hs_airflow::MassBalanceSnapshot;
use hs_core::{HvacClock, SubStep};
use hs_sim::{
    ConvergenceFinding, EnvironmentSummary, FindingKind, HvacObserver, SolveOutcome,
    ZoneStepReport,
};

use crate::row::{EnvironmentRow, FindingRow, SubStepRow, ZoneAverageRow, ZoneMassBalanceRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// An [`HvacObserver`] that writes sub-step, zone-average, mass-balance and
/// convergence rows to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `HvacObserver`
/// methods have no return value.  After the run, call
/// [`finish`][Self::finish] and check [`take_error`][Self::take_error].
///
/// Environments are numbered from 0 in the order they end.
pub struct HvacOutputObserver<W: OutputWriter> {
    writer:      W,
    environment: u32,
    last_error:  Option<OutputError>,
}

impl<W: OutputWriter> HvacOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, environment: 0, last_error: None }
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush the writer.  Returns the first stored error, if any, before the
    /// flush result.
    pub fn finish(&mut self) -> OutputResult<()> {
        let result = self.writer.finish();
        self.store_err(result);
        self.take_error().map_or(Ok(()), Err)
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> HvacObserver for HvacOutputObserver<W> {
    fn on_solve(&mut self, clock: &HvacClock, step: &SubStep, outcome: &SolveOutcome) {
        let row = SubStepRow {
            environment:   self.environment,
            zone_step:     clock.zone_step,
            sub_step:      step.index,
            sub_steps:     step.count,
            start_secs:    clock.sys_time_elapsed_secs,
            duration_secs: step.duration_secs,
            iterations:    outcome.iterations,
            converged:     outcome.converged,
            interrupted:   outcome.interrupted,
        };
        let result = self.writer.write_sub_step(&row);
        self.store_err(result);
    }

    fn on_finding(&mut self, clock: &HvacClock, step: &SubStep, finding: &ConvergenceFinding) {
        let row = FindingRow {
            environment: self.environment,
            zone_step:   clock.zone_step,
            sub_step:    step.index,
            location:    finding.location.to_string(),
            quantity:    finding.quantity.label(),
            kind:        match finding.kind {
                FindingKind::Oscillating => "oscillating",
                FindingKind::MonotonicIncrease => "increasing",
                FindingKind::MonotonicDecrease => "decreasing",
            },
            latest:      finding.latest,
            slope:       finding.slope,
        };
        let result = self.writer.write_finding(&row);
        self.store_err(result);
    }

    fn on_mass_balance(&mut self, clock: &HvacClock, step: &SubStep, snapshot: &MassBalanceSnapshot) {
        let rows: Vec<ZoneMassBalanceRow> = snapshot
            .zones
            .iter()
            .enumerate()
            .map(|(z, mc)| ZoneMassBalanceRow {
                environment:        self.environment,
                zone_step:          clock.zone_step,
                sub_step:           step.index,
                zone:               z as u32,
                in_flow:            mc.in_flow,
                exhaust_flow:       mc.exhaust_flow,
                return_flow:        mc.return_flow,
                mixing_flow:        mc.mixing_flow,
                mixing_source_flow: mc.mixing_source_flow,
                infiltration_flow:  mc.infiltration_flow,
                residual:           mc.residual(),
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_mass_balance(&rows);
            self.store_err(result);
        }
    }

    fn on_zone_step_end(&mut self, _clock: &HvacClock, report: &ZoneStepReport) {
        // A zone step stopped before its first sub-step has nothing to average.
        if report.sub_steps == 0 {
            return;
        }
        let rows: Vec<ZoneAverageRow> = report
            .averages
            .iter()
            .map(|avg| ZoneAverageRow {
                environment:  self.environment,
                zone_step:    report.zone_step,
                zone:         avg.zone.0,
                mean_temp:    avg.mean_temp,
                mean_hum_rat: avg.mean_hum_rat,
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_zone_averages(&rows);
            self.store_err(result);
        }
    }

    fn on_environment_end(&mut self, summary: &EnvironmentSummary) {
        let row = EnvironmentRow {
            environment:          self.environment,
            non_converged_solves: summary.non_converged_solves,
            suppressed_warnings:  summary.suppressed_warnings,
            air_iteration_caps:   summary.air_iteration_caps,
        };
        let result = self.writer.write_environment(&row);
        self.store_err(result);
        self.environment += 1;
    }
}
