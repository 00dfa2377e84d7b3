//! CSV output backend.
//!
//! Creates five files in the configured output directory:
//! - `sub_steps.csv`
//! - `zone_averages.csv`
//! - `zone_mass_balance.csv`
//! - `convergence_findings.csv`
//! - `environments.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{
    EnvironmentRow, FindingRow, OutputResult, SubStepRow, ZoneAverageRow, ZoneMassBalanceRow,
};

/// Writes simulation output to CSV files.
pub struct CsvWriter {
    sub_steps:    Writer<File>,
    averages:     Writer<File>,
    mass_balance: Writer<File>,
    findings:     Writer<File>,
    environments: Writer<File>,
    finished:     bool,
}

impl CsvWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut sub_steps = Writer::from_path(dir.join("sub_steps.csv"))?;
        sub_steps.write_record([
            "environment",
            "zone_step",
            "sub_step",
            "sub_steps",
            "start_secs",
            "duration_secs",
            "iterations",
            "converged",
            "interrupted",
        ])?;

        let mut averages = Writer::from_path(dir.join("zone_averages.csv"))?;
        averages.write_record(["environment", "zone_step", "zone", "mean_temp", "mean_hum_rat"])?;

        let mut mass_balance = Writer::from_path(dir.join("zone_mass_balance.csv"))?;
        mass_balance.write_record([
            "environment",
            "zone_step",
            "sub_step",
            "zone",
            "in_flow",
            "exhaust_flow",
            "return_flow",
            "mixing_flow",
            "mixing_source_flow",
            "infiltration_flow",
            "residual",
        ])?;

        let mut findings = Writer::from_path(dir.join("convergence_findings.csv"))?;
        findings.write_record([
            "environment",
            "zone_step",
            "sub_step",
            "location",
            "quantity",
            "kind",
            "latest",
            "slope",
        ])?;

        let mut environments = Writer::from_path(dir.join("environments.csv"))?;
        environments.write_record([
            "environment",
            "non_converged_solves",
            "suppressed_warnings",
            "air_iteration_caps",
        ])?;

        Ok(Self {
            sub_steps,
            averages,
            mass_balance,
            findings,
            environments,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_sub_step(&mut self, row: &SubStepRow) -> OutputResult<()> {
        self.sub_steps.write_record(&[
            row.environment.to_string(),
            row.zone_step.to_string(),
            row.sub_step.to_string(),
            row.sub_steps.to_string(),
            row.start_secs.to_string(),
            row.duration_secs.to_string(),
            row.iterations.to_string(),
            (row.converged as u8).to_string(),
            (row.interrupted as u8).to_string(),
        ])?;
        Ok(())
    }

    fn write_zone_averages(&mut self, rows: &[ZoneAverageRow]) -> OutputResult<()> {
        for row in rows {
            self.averages.write_record(&[
                row.environment.to_string(),
                row.zone_step.to_string(),
                row.zone.to_string(),
                row.mean_temp.to_string(),
                row.mean_hum_rat.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_mass_balance(&mut self, rows: &[ZoneMassBalanceRow]) -> OutputResult<()> {
        for row in rows {
            self.mass_balance.write_record(&[
                row.environment.to_string(),
                row.zone_step.to_string(),
                row.sub_step.to_string(),
                row.zone.to_string(),
                row.in_flow.to_string(),
                row.exhaust_flow.to_string(),
                row.return_flow.to_string(),
                row.mixing_flow.to_string(),
                row.mixing_source_flow.to_string(),
                row.infiltration_flow.to_string(),
                row.residual.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_finding(&mut self, row: &FindingRow) -> OutputResult<()> {
        self.findings.write_record(&[
            row.environment.to_string(),
            row.zone_step.to_string(),
            row.sub_step.to_string(),
            row.location.clone(),
            row.quantity.to_owned(),
            row.kind.to_owned(),
            row.latest.to_string(),
            row.slope.map(|s| s.to_string()).unwrap_or_default(),
        ])?;
        Ok(())
    }

    fn write_environment(&mut self, row: &EnvironmentRow) -> OutputResult<()> {
        self.environments.write_record(&[
            row.environment.to_string(),
            row.non_converged_solves.to_string(),
            row.suppressed_warnings.to_string(),
            row.air_iteration_caps.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.sub_steps.flush()?;
        self.averages.flush()?;
        self.mass_balance.flush()?;
        self.findings.flush()?;
        self.environments.flush()?;
        Ok(())
    }
}
