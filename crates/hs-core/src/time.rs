//! HVAC time model.
//!
//! # Design
//!
//! The building heat balance advances in fixed *zone timesteps*.  The HVAC
//! core may split one zone timestep into `N` equal *system sub-steps* when
//! zone temperatures move too fast to resolve at the coarser step:
//!
//!   sys_step_secs = zone_step_secs / N,   1 <= N <= max_sys_steps
//!
//! Durations are `f64` seconds because sub-step lengths are generally not
//! integral.

use std::fmt;

// ── TimestepConfig ────────────────────────────────────────────────────────────

/// Adaptive sub-stepping parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimestepConfig {
    /// Length of one zone (reporting) timestep in seconds.  Default: 900.
    pub zone_step_secs: f64,

    /// Largest zone temperature change [K] accepted within one sub-step
    /// before the zone step is subdivided.  Default: 0.3.
    pub max_zone_temp_diff: f64,

    /// Upper bound on the number of sub-steps per zone step.  Default: 20.
    pub max_sys_steps: u32,

    /// Shortest permitted sub-step in seconds.  Default: 60.
    pub min_sys_step_secs: f64,
}

impl Default for TimestepConfig {
    fn default() -> Self {
        Self {
            zone_step_secs:     900.0,
            max_zone_temp_diff: 0.3,
            max_sys_steps:      20,
            min_sys_step_secs:  60.0,
        }
    }
}

impl TimestepConfig {
    /// Number of sub-steps needed to keep the per-sub-step change of
    /// `zone_temp_change` within `max_zone_temp_diff`.
    ///
    /// Returns 1 when the change is already within tolerance.  Otherwise
    /// `ceil(change / tolerance)`, clamped so that neither `max_sys_steps`
    /// nor `min_sys_step_secs` is violated.
    pub fn sub_step_count(&self, zone_temp_change: f64) -> u32 {
        if zone_temp_change.is_nan()
            || zone_temp_change <= self.max_zone_temp_diff
            || self.max_zone_temp_diff <= 0.0
        {
            return 1;
        }
        let wanted = (zone_temp_change / self.max_zone_temp_diff).ceil();
        let by_min_len = if self.min_sys_step_secs > 0.0 {
            (self.zone_step_secs / self.min_sys_step_secs).floor().max(1.0)
        } else {
            f64::INFINITY
        };
        let cap = (self.max_sys_steps.max(1) as f64).min(by_min_len);
        wanted.min(cap).max(1.0) as u32
    }
}

// ── SubStep ───────────────────────────────────────────────────────────────────

/// One system sub-step inside a zone timestep.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubStep {
    /// Zero-based position within the zone step.
    pub index: u32,
    /// Total number of sub-steps in this zone step.
    pub count: u32,
    /// Sub-step length in seconds.
    pub duration_secs: f64,
    /// Zone step length in seconds.
    pub zone_step_secs: f64,
}

impl SubStep {
    /// The single sub-step covering a whole zone step.
    pub fn whole(zone_step_secs: f64) -> Self {
        Self { index: 0, count: 1, duration_secs: zone_step_secs, zone_step_secs }
    }

    /// All `count` equal sub-steps of `zone_step_secs`.
    pub fn split(zone_step_secs: f64, count: u32) -> impl Iterator<Item = SubStep> {
        let count = count.max(1);
        let duration_secs = zone_step_secs / count as f64;
        (0..count).map(move |index| SubStep { index, count, duration_secs, zone_step_secs })
    }

    /// Weight of this sub-step in zone-step averages.
    #[inline]
    pub fn fraction_of_zone_step(&self) -> f64 {
        if self.zone_step_secs > 0.0 {
            self.duration_secs / self.zone_step_secs
        } else {
            0.0
        }
    }

    #[inline]
    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.count
    }
}

impl fmt::Display for SubStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-step {}/{} ({:.1} s)", self.index + 1, self.count, self.duration_secs)
    }
}

// ── HvacClock ─────────────────────────────────────────────────────────────────

/// Tracks simulated time at zone-step and sub-step resolution.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HvacClock {
    /// Completed zone steps since the start of the environment.
    pub zone_step: u64,
    /// Seconds of the current zone step already covered by finished sub-steps.
    pub sys_time_elapsed_secs: f64,
    /// Length of the sub-step currently being simulated.
    pub sys_step_secs: f64,
}

impl HvacClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of `step`.
    #[inline]
    pub fn begin_sub_step(&mut self, step: &SubStep) {
        self.sys_step_secs = step.duration_secs;
    }

    /// Mark the end of `step`.
    #[inline]
    pub fn end_sub_step(&mut self, step: &SubStep) {
        self.sys_time_elapsed_secs += step.duration_secs;
    }

    /// Advance to the next zone step.
    #[inline]
    pub fn advance_zone_step(&mut self) {
        self.zone_step += 1;
        self.sys_time_elapsed_secs = 0.0;
    }

    /// Reset at an environment (run period / design day) boundary.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for HvacClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zone step {} +{:.1} s", self.zone_step, self.sys_time_elapsed_secs)
    }
}
