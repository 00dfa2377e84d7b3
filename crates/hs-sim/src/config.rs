//! Run configuration for the solver, the timestep controller, the mass
//! balance and diagnostics.

use hs_airflow::MassBalanceConfig;
use hs_core::TimestepConfig;

use crate::{SimError, SimResult};

// ── SolverConfig ──────────────────────────────────────────────────────────────

/// Iteration limits of the convergence solver.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Passes allowed after the first one.  Default: 20.
    pub max_iter: u32,

    /// Air loops and zone equipment are forced to run until this many
    /// passes after the first have completed.  Default: 1.
    pub min_air_loop_iterations_after_first: u32,

    /// Non-convergence warnings logged per environment before further
    /// occurrences are only counted.  Default: 15.
    pub max_convergence_warnings: u32,

    /// Cap on air-loop re-simulations after the first pass.  `None`
    /// disables the cap.  Default: `None`.
    pub max_air_iterations: Option<u32>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iter:                            20,
            min_air_loop_iterations_after_first: 1,
            max_convergence_warnings:            15,
            max_air_iterations:                  None,
        }
    }
}

// ── DiagnosticsConfig ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiagnosticsConfig {
    /// Analyse the convergence trace after every non-converged solve and
    /// report oscillating or drifting locations.  Default: `false`.
    pub verbose_diagnostics: bool,
}

// ── HvacConfig ────────────────────────────────────────────────────────────────

/// Everything a run needs besides the model itself.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HvacConfig {
    pub solver:       SolverConfig,
    pub timestep:     TimestepConfig,
    pub mass_balance: MassBalanceConfig,
    pub diagnostics:  DiagnosticsConfig,
}

impl HvacConfig {
    /// Reject values that would make the run meaningless.
    pub fn validate(&self) -> SimResult<()> {
        let t = &self.timestep;
        if !(t.zone_step_secs.is_finite() && t.zone_step_secs > 0.0) {
            return Err(SimError::Config(format!(
                "zone step must be a positive number of seconds, got {}",
                t.zone_step_secs
            )));
        }
        if !(t.max_zone_temp_diff.is_finite() && t.max_zone_temp_diff > 0.0) {
            return Err(SimError::Config(format!(
                "max_zone_temp_diff must be positive, got {}",
                t.max_zone_temp_diff
            )));
        }
        if t.max_sys_steps == 0 {
            return Err(SimError::Config("max_sys_steps must be at least 1".into()));
        }
        if t.min_sys_step_secs < 0.0 {
            return Err(SimError::Config("min_sys_step_secs must not be negative".into()));
        }
        if self.solver.max_iter == 0 {
            return Err(SimError::Config("max_iter must be at least 1".into()));
        }
        self.mass_balance.validate()?;
        Ok(())
    }
}
