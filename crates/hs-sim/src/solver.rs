//! `ConvergenceSolver` — drives the subsystems to a fixed point within one
//! sub-step.
//!
//! # Protocol
//!
//! ```text
//! hooks(BeforeManagerLoop), hooks(AfterManagerLoop)
//! first pass:  air, zone, non-zone, plant, elec  (unconditionally)
//! flags ← all set
//! while (any flag || iterations < min) && iterations ≤ max_iter:
//!     stop signal?               → interrupted
//!     hooks(IterationLoop)
//!     iterations < min           → force air + zone
//!     a hook ran, iterations ≤ 2 → force air
//!     run flagged subsystems in order; each clears its own flag first,
//!         its intents raise others; air/zone/non-zone/plant raise elec
//!     optimisation requested     → repeat the selected subsystems
//!     record trace; iterations += 1
//! plant discontinuity → 2 × (plant only, unlocked; everything else, plant locked)
//! ```

use hs_core::{Psychrometrics, SubStep};
use hs_equipment::{Intent, SimulationFlags, Subsystem};
use hs_model::HvacModel;
use hs_airflow::MassBalanceEngine;

use crate::diagnostics::{ConvergenceFinding, analyse_trace};
use crate::{
    CallingPoint, ConvergenceTrace, DiagnosticsConfig, HvacSystems, OverrideHook, PlantFlowLock,
    SimResult, SolverConfig, SolverContext, SystemContext, TraceLocation, ZoneEquipmentManager,
    ZonePass,
};

/// Result of one [`ConvergenceSolver::solve`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolveOutcome {
    /// Every flag cleared before the iteration cap.
    pub converged:   bool,
    /// Passes run after the first one.
    pub iterations:  u32,
    /// The stop signal ended iteration early.
    pub interrupted: bool,
    /// Divergence findings; only filled with verbose diagnostics on.
    pub findings:    Vec<ConvergenceFinding>,
}

/// Borrowed view of everything a solve dispatches to.
pub struct SolverParts<'a, S: HvacSystems> {
    pub model:          &'a mut HvacModel,
    pub systems:        &'a mut S,
    pub zone_equipment: &'a mut ZoneEquipmentManager,
    pub mass_balance:   &'a mut MassBalanceEngine,
    pub hooks:          &'a mut [Box<dyn OverrideHook>],
    pub psychro:        &'a dyn Psychrometrics,
}

pub struct ConvergenceSolver {
    config:      SolverConfig,
    diagnostics: DiagnosticsConfig,
    flags:       SimulationFlags,
    trace:       ConvergenceTrace,
    /// Air-loop runs after the first pass in the current solve.
    air_resims:  u32,
}

impl ConvergenceSolver {
    pub fn new(config: SolverConfig, diagnostics: DiagnosticsConfig) -> Self {
        Self {
            config,
            diagnostics,
            flags: SimulationFlags::default(),
            trace: ConvergenceTrace::new(),
            air_resims: 0,
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Flags left at the end of the last solve.
    pub fn flags(&self) -> &SimulationFlags {
        &self.flags
    }

    /// Trace of the last solve.
    pub fn trace(&self) -> &ConvergenceTrace {
        &self.trace
    }

    /// Iterate the subsystems until no flag is left or the cap is reached.
    pub fn solve<S: HvacSystems>(
        &mut self,
        parts: &mut SolverParts<'_, S>,
        run:   &mut SolverContext,
        step:  &SubStep,
    ) -> SimResult<SolveOutcome> {
        self.trace.clear();
        self.air_resims = 0;
        self.flags.clear();

        for point in [CallingPoint::BeforeManagerLoop, CallingPoint::AfterManagerLoop] {
            call_hooks(parts, point);
        }

        // ── First pass ────────────────────────────────────────────────────
        self.flags.set_all();
        self.run_pass(parts, run, step, true, PlantFlowLock::Unlocked)?;
        self.flags.set_all();

        // ── Iteration loop ────────────────────────────────────────────────
        let max_iter = self.config.max_iter;
        let min_iter = self.config.min_air_loop_iterations_after_first;
        let mut iterations = 0;
        let mut interrupted = false;
        while (self.flags.any() || iterations < min_iter) && iterations <= max_iter {
            if run.stop_requested() {
                interrupted = true;
                break;
            }

            let (hook_ran, hook_intents) = call_hooks(parts, CallingPoint::IterationLoop);
            self.flags.apply(&hook_intents);
            if iterations < min_iter {
                self.flags.air_loops = true;
                self.flags.zone_equipment = true;
            }
            // Overrides only reach the air loops if they run at least twice.
            if hook_ran && iterations <= 2 {
                self.flags.air_loops = true;
            }

            let selected = self.flags;
            self.run_pass(parts, run, step, false, PlantFlowLock::Unlocked)?;

            if !run.warmup && parts.systems.optimisation_requested() {
                let mut repeats = 0;
                while parts.systems.optimisation_requested() && repeats < max_iter {
                    self.flags = selected;
                    self.run_pass(parts, run, step, false, PlantFlowLock::Unlocked)?;
                    repeats += 1;
                }
            }

            self.record_trace(parts);
            iterations += 1;
        }
        let converged = !interrupted && !self.flags.any();

        // ── Plant flow-lock reconciliation ────────────────────────────────
        if !interrupted && parts.systems.plant_lacks_continuity() {
            log::debug!("plant splitter/mixer lacks continuity, running flow-lock passes");
            for _ in 0..2 {
                self.flags.clear();
                self.flags.plant_loops = true;
                self.run_pass(parts, run, step, false, PlantFlowLock::Unlocked)?;

                self.flags.set_all();
                self.flags.plant_loops = false;
                self.run_pass(parts, run, step, false, PlantFlowLock::Locked)?;
            }
        }

        // ── Non-convergence reporting ─────────────────────────────────────
        let mut findings = Vec::new();
        if !converged && !interrupted && !run.warmup {
            if run.record_non_convergence(self.config.max_convergence_warnings) {
                log::warn!(
                    "HVAC system simulation did not converge within {max_iter} iterations ({step}); \
                     still flagged: {:?}",
                    pending(&self.flags)
                );
            }
            if self.diagnostics.verbose_diagnostics {
                findings = analyse_trace(&self.trace);
                for finding in &findings {
                    log::warn!("  convergence diagnostics: {finding}");
                }
            }
        }

        Ok(SolveOutcome { converged, iterations, interrupted, findings })
    }

    /// Run every flagged subsystem once, in dispatch order.
    fn run_pass<S: HvacSystems>(
        &mut self,
        parts:           &mut SolverParts<'_, S>,
        run:             &mut SolverContext,
        step:            &SubStep,
        first_iteration: bool,
        plant_flow:      PlantFlowLock,
    ) -> SimResult<()> {
        let sys = SystemContext {
            first_iteration,
            sys_step_secs: step.duration_secs,
            plant_flow,
            warmup: run.warmup,
        };

        for subsystem in Subsystem::ALL {
            if !self.flags.get(subsystem) {
                continue;
            }
            if subsystem == Subsystem::AirLoops && !first_iteration && self.air_cap_reached(run) {
                continue;
            }
            self.flags.set(subsystem, false);

            let intents = match subsystem {
                Subsystem::AirLoops => {
                    if !first_iteration {
                        self.air_resims += 1;
                    }
                    parts.systems.simulate_air_loops(parts.model, &sys)
                }
                Subsystem::ZoneEquipment => parts.zone_equipment.simulate(
                    parts.model,
                    parts.mass_balance,
                    &ZonePass {
                        psychro: parts.psychro,
                        first_iteration,
                        sys_step_secs: step.duration_secs,
                        warmup: run.warmup,
                    },
                )?,
                Subsystem::NonZoneEquipment => parts.systems.simulate_non_zone_equipment(parts.model, &sys),
                Subsystem::PlantLoops => parts.systems.simulate_plant_loops(parts.model, &sys),
                Subsystem::ElecCircuits => parts.systems.simulate_elec_circuits(parts.model, &sys),
            };
            self.flags.apply(&intents);
            if subsystem != Subsystem::ElecCircuits {
                self.flags.elec_circuits = true;
            }
        }
        Ok(())
    }

    /// Enforce `max_air_iterations`: once reached, the air loops and zone
    /// equipment stop being re-simulated for the rest of the solve.
    fn air_cap_reached(&mut self, run: &mut SolverContext) -> bool {
        let Some(cap) = self.config.max_air_iterations else {
            return false;
        };
        if self.air_resims < cap {
            return false;
        }
        self.flags.air_loops = false;
        self.flags.zone_equipment = false;
        if run.record_air_iteration_cap() {
            log::warn!("air loops re-simulated {cap} times in one sub-step; accepting current state");
        }
        true
    }

    fn record_trace<S: HvacSystems>(&mut self, parts: &SolverParts<'_, S>) {
        let model = &*parts.model;
        for cfg in &model.equip_configs {
            for &node_id in &cfg.inlet_nodes {
                if let Some(node) = model.nodes.get(node_id) {
                    self.trace.record_state(
                        TraceLocation::ZoneInlet { zone: cfg.zone, node: node_id },
                        node.mass_flow,
                        node.temp,
                        node.hum_rat,
                    );
                }
            }
        }
        parts.systems.record_trace(model, &mut self.trace);
    }
}

/// Call every hook at `point`.  Returns whether any of them ran and the
/// intents they raised.
fn call_hooks<S: HvacSystems>(parts: &mut SolverParts<'_, S>, point: CallingPoint) -> (bool, Vec<Intent>) {
    let mut ran = false;
    let mut intents = Vec::new();
    for hook in parts.hooks.iter_mut() {
        let outcome = hook.call(point, parts.model);
        if outcome.ran {
            log::trace!("override hook `{}` ran at {point:?}", hook.name());
        }
        ran |= outcome.ran;
        intents.extend(outcome.intents);
    }
    (ran, intents)
}

fn pending(flags: &SimulationFlags) -> Vec<Subsystem> {
    Subsystem::ALL.into_iter().filter(|&s| flags.get(s)).collect()
}
