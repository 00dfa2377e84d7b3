//! Observer trait for reporting and data collection.

use hs_airflow::MassBalanceSnapshot;
use hs_core::{HvacClock, SubStep};
use hs_model::HvacModel;

use crate::{ConvergenceFinding, EnvironmentSummary, SolveOutcome, ZoneStepReport};

/// Callbacks invoked by [`HvacSim`][crate::HvacSim] and the
/// [`TimestepController`][crate::TimestepController].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// Sub-step callbacks fire only for accepted sub-steps.  A trial solve at
/// the full zone step that is then split into shorter sub-steps is never
/// reported.
///
/// # Example — non-convergence counter
///
/// ```rust,ignore
/// struct Failures(u32);
///
/// impl HvacObserver for Failures {
///     fn on_solve(&mut self, _clock: &HvacClock, _step: &SubStep, outcome: &SolveOutcome) {
///         if !outcome.converged {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait HvacObserver {
    /// Called before the zone step's first solve.
    fn on_zone_step_start(&mut self, _clock: &HvacClock) {}

    /// Called when an accepted sub-step begins to be reported.
    fn on_sub_step_start(&mut self, _clock: &HvacClock, _step: &SubStep) {}

    /// Called with the outcome of the sub-step's convergence solve.
    fn on_solve(&mut self, _clock: &HvacClock, _step: &SubStep, _outcome: &SolveOutcome) {}

    /// Called once per divergence finding of a non-converged solve.
    fn on_finding(&mut self, _clock: &HvacClock, _step: &SubStep, _finding: &ConvergenceFinding) {}

    /// Called with the zone air mass balance as it stood after the solve.
    fn on_mass_balance(&mut self, _clock: &HvacClock, _step: &SubStep, _snapshot: &MassBalanceSnapshot) {}

    /// Called after the sub-step's zone correction.
    fn on_sub_step_end(&mut self, _clock: &HvacClock, _step: &SubStep, _model: &HvacModel) {}

    /// Called once the zone step is complete.
    fn on_zone_step_end(&mut self, _clock: &HvacClock, _report: &ZoneStepReport) {}

    /// Called when an environment ends.
    fn on_environment_end(&mut self, _summary: &EnvironmentSummary) {}
}

/// An [`HvacObserver`] that does nothing.
pub struct NoopObserver;

impl HvacObserver for NoopObserver {}
