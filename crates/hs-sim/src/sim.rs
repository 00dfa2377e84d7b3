//! The `HvacSim` struct — owner of all run state.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use hs_airflow::MassBalanceEngine;
use hs_core::Psychrometrics;
use hs_model::HvacModel;

use crate::{
    ConvergenceSolver, EnvironmentSummary, HvacConfig, HvacObserver, HvacSystems, OverrideHook,
    SimResult, SolverContext, SolverParts, TimestepController, ZoneAirModel, ZoneEquipmentManager,
    ZoneStepReport,
};

/// The HVAC coordination core for one model.
///
/// `HvacSim<S, Z>` advances zone steps:
///
/// 1. **Trial**: predict, solve and correct at the full zone step.
/// 2. **Split** (if the zone temperatures moved too far): revert and run N
///    shorter sub-steps, each predicting, solving once and correcting.
/// 3. **Solve** (per sub-step): the [`ConvergenceSolver`] runs air loops,
///    zone equipment (load distribution, mass balance, leaving conditions),
///    non-zone equipment, plant and electric circuits until no subsystem
///    asks for another pass.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct HvacSim<S: HvacSystems, Z: ZoneAirModel> {
    pub config:         HvacConfig,

    /// Nodes, zones, air loops and demand records.
    pub model:          HvacModel,

    /// Air loops, non-zone equipment, plant and electric circuits.
    pub systems:        S,

    /// Zone heat balance predictor/corrector.
    pub zone_air:       Z,

    pub zone_equipment: ZoneEquipmentManager,
    pub mass_balance:   MassBalanceEngine,
    pub hooks:          Vec<Box<dyn OverrideHook>>,
    pub solver:         ConvergenceSolver,
    pub controller:     TimestepController,

    /// Warm-up and kick-off switches, warning counters, stop signal.
    pub context:        SolverContext,

    pub(crate) psychro: Box<dyn Psychrometrics>,
}

impl<S: HvacSystems, Z: ZoneAirModel> HvacSim<S, Z> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Simulate one zone step.
    pub fn run_zone_step<O: HvacObserver>(&mut self, observer: &mut O) -> SimResult<ZoneStepReport> {
        let Self {
            model,
            systems,
            zone_air,
            zone_equipment,
            mass_balance,
            hooks,
            solver,
            controller,
            context,
            psychro,
            ..
        } = self;

        let mut parts = SolverParts {
            model,
            systems,
            zone_equipment,
            mass_balance,
            hooks:   hooks.as_mut_slice(),
            psychro: &**psychro,
        };
        controller.advance(zone_air, solver, &mut parts, context, observer)
    }

    /// Simulate up to `n` zone steps, stopping early when the stop signal is
    /// raised.  Returns the number of zone steps completed.
    pub fn run_zone_steps<O: HvacObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<u64> {
        for done in 0..n {
            if self.context.stop_requested() {
                return Ok(done);
            }
            let report = self.run_zone_step(observer)?;
            if report.sub_steps == 0 {
                return Ok(done);
            }
        }
        Ok(n)
    }

    /// Close the current environment: summarise and clear warning counters,
    /// reset one-shot model latches and restart the clock.
    pub fn end_environment<O: HvacObserver>(&mut self, observer: &mut O) -> EnvironmentSummary {
        let summary = self.context.reset_environment();
        self.model.reset_environment();
        self.controller.reset();
        observer.on_environment_end(&summary);
        summary
    }

    /// Handle for requesting a cooperative stop from another thread.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.context.stop_handle()
    }

    pub fn psychrometrics(&self) -> &dyn Psychrometrics {
        &*self.psychro
    }
}
