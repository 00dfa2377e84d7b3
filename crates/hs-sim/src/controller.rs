//! `TimestepController` — adaptive sub-stepping of one zone step.
//!
//! # Zone step
//!
//! ```text
//! predict(full step) → solve → correct → ΔT
//! ΔT ≤ max_zone_temp_diff (or kick-off) → accept as one sub-step
//! otherwise:
//!     N = ceil(ΔT / max_zone_temp_diff), clamped by max_sys_steps and min_sys_step_secs
//!     revert zone history
//!     N × (predict → solve → correct → accept)
//! ```
//!
//! Each accepted sub-step adds its zone air temperature and humidity ratio
//! to the zone-step averages with weight `sub-step length / zone step`.
//! The stop signal is checked before every sub-step; a stopped zone step
//! keeps the averages of the sub-steps already accepted.

use hs_airflow::MassBalanceSnapshot;
use hs_core::{HvacClock, SubStep, TimestepConfig, ZoneId};
use hs_model::HvacModel;

use crate::{
    ConvergenceSolver, HvacObserver, HvacSystems, SimResult, SolveOutcome, SolverContext,
    SolverParts, ZoneAirModel,
};

// ── Report ────────────────────────────────────────────────────────────────────

/// Time-weighted zone air state over one zone step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneAverage {
    pub zone:         ZoneId,
    pub mean_temp:    f64,
    pub mean_hum_rat: f64,
}

/// What happened during one zone step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneStepReport {
    /// Zero-based zone step index within the environment.
    pub zone_step:         u64,
    /// Accepted sub-steps (0 if the run was stopped before the first).
    pub sub_steps:         u32,
    /// Length of the accepted sub-steps [s].
    pub sys_step_secs:     f64,
    /// Largest zone temperature change of the full-step trial [K].
    pub trial_temp_change: f64,
    pub averages:          Vec<ZoneAverage>,
    /// One entry per accepted sub-step.
    pub convergence:       Vec<SolveOutcome>,
}

impl ZoneStepReport {
    fn new(zone_step: u64, model: &HvacModel) -> Self {
        Self {
            zone_step,
            averages: model
                .zone_ids()
                .map(|zone| ZoneAverage { zone, mean_temp: 0.0, mean_hum_rat: 0.0 })
                .collect(),
            ..Self::default()
        }
    }

    /// Every accepted sub-step converged.
    pub fn all_converged(&self) -> bool {
        self.convergence.iter().all(|c| c.converged)
    }
}

// ── TimestepController ────────────────────────────────────────────────────────

pub struct TimestepController {
    config: TimestepConfig,
    clock:  HvacClock,
}

impl TimestepController {
    pub fn new(config: TimestepConfig) -> Self {
        Self { config, clock: HvacClock::new() }
    }

    pub fn config(&self) -> &TimestepConfig {
        &self.config
    }

    pub fn clock(&self) -> &HvacClock {
        &self.clock
    }

    /// Restart the clock at an environment boundary.
    pub fn reset(&mut self) {
        self.clock.reset();
    }

    /// Simulate one zone step.
    pub fn advance<S, Z, O>(
        &mut self,
        zone_air: &mut Z,
        solver:   &mut ConvergenceSolver,
        parts:    &mut SolverParts<'_, S>,
        run:      &mut SolverContext,
        observer: &mut O,
    ) -> SimResult<ZoneStepReport>
    where
        S: HvacSystems,
        Z: ZoneAirModel,
        O: HvacObserver,
    {
        let zone_step_secs = self.config.zone_step_secs;
        let mut report = ZoneStepReport::new(self.clock.zone_step, parts.model);
        if run.stop_requested() {
            return Ok(report);
        }
        observer.on_zone_step_start(&self.clock);

        // ── Trial at the full zone step ───────────────────────────────────
        let whole = SubStep::whole(zone_step_secs);
        zone_air.predict(parts.model, &whole);
        let outcome = solver.solve(parts, run, &whole)?;
        let change = zone_air.correct(parts.model, &whole);
        report.trial_temp_change = change;

        let count = if run.kickoff || outcome.interrupted {
            1
        } else {
            self.config.sub_step_count(change)
        };

        if count == 1 {
            self.accept(&whole, outcome, parts, &mut report, observer);
        } else {
            log::debug!(
                "{}: zone temperature change {change:.3} K exceeds {:.3} K, using {count} sub-steps",
                self.clock,
                self.config.max_zone_temp_diff
            );
            zone_air.revert(parts.model);

            // ── Sub-steps ─────────────────────────────────────────────────
            for step in SubStep::split(zone_step_secs, count) {
                if run.stop_requested() {
                    log::debug!("{}: stop requested before {step}", self.clock);
                    break;
                }
                zone_air.predict(parts.model, &step);
                let outcome = solver.solve(parts, run, &step)?;
                zone_air.correct(parts.model, &step);
                self.accept(&step, outcome, parts, &mut report, observer);
            }
        }

        observer.on_zone_step_end(&self.clock, &report);
        self.clock.advance_zone_step();
        Ok(report)
    }

    /// Report an accepted sub-step and fold it into the zone-step averages.
    fn accept<S: HvacSystems, O: HvacObserver>(
        &mut self,
        step:     &SubStep,
        outcome:  SolveOutcome,
        parts:    &SolverParts<'_, S>,
        report:   &mut ZoneStepReport,
        observer: &mut O,
    ) {
        let model = &*parts.model;
        self.clock.begin_sub_step(step);
        observer.on_sub_step_start(&self.clock, step);
        observer.on_solve(&self.clock, step, &outcome);
        for finding in &outcome.findings {
            observer.on_finding(&self.clock, step, finding);
        }
        let snapshot = MassBalanceSnapshot::capture(model, parts.zone_equipment.last_balance());
        observer.on_mass_balance(&self.clock, step, &snapshot);

        let weight = step.fraction_of_zone_step();
        for avg in &mut report.averages {
            let air_node = model.zone(avg.zone).air_node;
            if let Some(node) = model.nodes.get(air_node) {
                avg.mean_temp += weight * node.temp;
                avg.mean_hum_rat += weight * node.hum_rat;
            }
        }

        observer.on_sub_step_end(&self.clock, step, model);
        self.clock.end_sub_step(step);

        report.sub_steps += 1;
        report.sys_step_secs = step.duration_secs;
        report.convergence.push(outcome);
    }
}
