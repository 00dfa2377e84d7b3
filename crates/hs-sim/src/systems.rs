//! Traits for the collaborators the core drives but does not implement.
//!
//! | Trait            | Collaborator                                                  |
//! |------------------|---------------------------------------------------------------|
//! | [`HvacSystems`]  | air loops, non-zone equipment, plant loops, electric circuits |
//! | [`ZoneAirModel`] | zone heat balance predictor / corrector                       |
//! | [`OverrideHook`] | availability managers and runtime overrides                   |
//!
//! Zone equipment has its own trait in `hs-equipment` because the core
//! dispatches it one piece at a time.

use hs_core::SubStep;
use hs_equipment::Intent;
use hs_model::HvacModel;

use crate::ConvergenceTrace;

// ── HvacSystems ───────────────────────────────────────────────────────────────

/// Whether plant loop flow rates may change during a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlantFlowLock {
    #[default]
    Unlocked,
    /// Plant flows are frozen at their last resolved values.
    Locked,
}

/// Per-call state handed to [`HvacSystems`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemContext {
    /// `true` on the first pass of the solver.
    pub first_iteration: bool,
    pub sys_step_secs:   f64,
    pub plant_flow:      PlantFlowLock,
    pub warmup:          bool,
}

/// The non-zone subsystems of the HVAC model.
///
/// Every `simulate_*` method runs its subsystem once against the current
/// model state and returns the re-simulation intents its outputs imply.
/// Only [`simulate_air_loops`][Self::simulate_air_loops] is required; the
/// rest default to "nothing there".
pub trait HvacSystems {
    fn simulate_air_loops(&mut self, model: &mut HvacModel, ctx: &SystemContext) -> Vec<Intent>;

    fn simulate_non_zone_equipment(&mut self, _model: &mut HvacModel, _ctx: &SystemContext) -> Vec<Intent> {
        Vec::new()
    }

    fn simulate_plant_loops(&mut self, _model: &mut HvacModel, _ctx: &SystemContext) -> Vec<Intent> {
        Vec::new()
    }

    fn simulate_elec_circuits(&mut self, _model: &mut HvacModel, _ctx: &SystemContext) -> Vec<Intent> {
        Vec::new()
    }

    /// Some plant splitter/mixer ended the last pass with inconsistent
    /// inlet and outlet flows.
    fn plant_lacks_continuity(&self) -> bool {
        false
    }

    /// A temperature-optimisation controller wants the selected subsystems
    /// run again before the pass is accepted.
    fn optimisation_requested(&self) -> bool {
        false
    }

    /// Record air-loop and plant-loop interface values after a pass.
    /// Zone inlet nodes are recorded by the solver itself.
    fn record_trace(&self, _model: &HvacModel, _trace: &mut ConvergenceTrace) {}
}

/// Systems for a model with zonal equipment only.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSystems;

impl HvacSystems for NoSystems {
    fn simulate_air_loops(&mut self, _model: &mut HvacModel, _ctx: &SystemContext) -> Vec<Intent> {
        Vec::new()
    }
}

// ── ZoneAirModel ──────────────────────────────────────────────────────────────

/// The zone heat balance around the HVAC solve.
pub trait ZoneAirModel {
    /// Write each zone's predicted sensible and latent demand for `step`
    /// into `model.demands`.
    fn predict(&mut self, model: &mut HvacModel, step: &SubStep);

    /// Update zone air nodes with the supplied HVAC output and return the
    /// largest absolute zone temperature change over the step [K].
    fn correct(&mut self, model: &mut HvacModel, step: &SubStep) -> f64;

    /// Restore zone state to the start of the zone step.
    fn revert(&mut self, model: &mut HvacModel);
}

// ── OverrideHook ──────────────────────────────────────────────────────────────

/// Points in a sub-step at which override hooks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallingPoint {
    /// Before availability managers are consulted.
    BeforeManagerLoop,
    /// After availability managers are consulted.
    AfterManagerLoop,
    /// At the top of every solver pass after the first.
    IterationLoop,
}

/// What a hook did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HookOutcome {
    /// Any override program actually executed.
    pub ran:     bool,
    pub intents: Vec<Intent>,
}

impl HookOutcome {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn ran(intents: Vec<Intent>) -> Self {
        Self { ran: true, intents }
    }
}

/// Availability managers and runtime override programs.
pub trait OverrideHook {
    fn name(&self) -> &str;

    fn call(&mut self, point: CallingPoint, model: &mut HvacModel) -> HookOutcome;
}
