//! `SolverContext` — run-scoped state shared by the controller and solver.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Counters summarised when an environment ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvironmentSummary {
    /// Solves that hit the iteration cap outside warm-up.
    pub non_converged_solves: u32,
    /// Of those, how many were not individually logged.
    pub suppressed_warnings:  u32,
    /// Passes in which the air-loop re-simulation cap cut iteration short.
    pub air_iteration_caps:   u32,
}

/// Created once per run.  Call [`reset_environment`][Self::reset_environment]
/// at every environment (design day / run period) boundary.
#[derive(Debug, Clone, Default)]
pub struct SolverContext {
    /// Warm-up days: non-convergence is neither warned about nor counted.
    pub warmup:  bool,
    /// Start-up phase: zone steps are never subdivided.
    pub kickoff: bool,

    stop:    Arc<AtomicBool>,
    summary: EnvironmentSummary,
}

impl SolverContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `stop` as the cooperative stop signal.
    pub fn with_stop_signal(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    /// A handle that other threads can set to stop the run at the next
    /// sub-step or solver pass.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    #[inline]
    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Count a non-converged solve.  Returns `true` while the warning should
    /// still be logged (the first `limit` occurrences of the environment).
    pub fn record_non_convergence(&mut self, limit: u32) -> bool {
        self.summary.non_converged_solves += 1;
        if self.summary.non_converged_solves <= limit {
            true
        } else {
            self.summary.suppressed_warnings += 1;
            false
        }
    }

    /// Count an air-loop iteration cap.  Returns `true` only the first time
    /// in the environment.
    pub fn record_air_iteration_cap(&mut self) -> bool {
        self.summary.air_iteration_caps += 1;
        self.summary.air_iteration_caps == 1
    }

    pub fn summary(&self) -> &EnvironmentSummary {
        &self.summary
    }

    /// Close the current environment: log the recurring-warning summary,
    /// clear the counters and return what they held.
    pub fn reset_environment(&mut self) -> EnvironmentSummary {
        let summary = std::mem::take(&mut self.summary);
        if summary.suppressed_warnings > 0 {
            log::info!(
                "HVAC did not converge in {} solves this environment; {} warnings were not shown",
                summary.non_converged_solves,
                summary.suppressed_warnings
            );
        }
        if summary.air_iteration_caps > 0 {
            log::info!(
                "air-loop iteration cap reached in {} passes this environment",
                summary.air_iteration_caps
            );
        }
        summary
    }
}
