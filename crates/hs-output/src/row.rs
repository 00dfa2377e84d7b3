//! Plain data row types written by output backends.

/// Outcome of one accepted sub-step's convergence solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubStepRow {
    pub environment:   u32,
    pub zone_step:     u64,
    /// Zero-based index within the zone step.
    pub sub_step:      u32,
    pub sub_steps:     u32,
    /// Offset of the sub-step start from the zone step start [s].
    pub start_secs:    f64,
    pub duration_secs: f64,
    pub iterations:    u32,
    pub converged:     bool,
    pub interrupted:   bool,
}

/// Time-weighted zone air state over one zone step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneAverageRow {
    pub environment:  u32,
    pub zone_step:    u64,
    pub zone:         u32,
    pub mean_temp:    f64,
    pub mean_hum_rat: f64,
}

/// Mass conservation terms of one zone after a sub-step [kg/s].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneMassBalanceRow {
    pub environment:        u32,
    pub zone_step:          u64,
    pub sub_step:           u32,
    pub zone:               u32,
    pub in_flow:            f64,
    pub exhaust_flow:       f64,
    pub return_flow:        f64,
    pub mixing_flow:        f64,
    pub mixing_source_flow: f64,
    pub infiltration_flow:  f64,
    /// `in + mixing in − exhaust − return − mixing out`.
    pub residual:           f64,
}

/// One divergence finding of a non-converged solve.
#[derive(Debug, Clone, PartialEq)]
pub struct FindingRow {
    pub environment: u32,
    pub zone_step:   u64,
    pub sub_step:    u32,
    pub location:    String,
    pub quantity:    &'static str,
    /// `oscillating`, `increasing` or `decreasing`.
    pub kind:        &'static str,
    pub latest:      f64,
    /// Least-squares slope per pass; `None` for oscillation.
    pub slope:       Option<f64>,
}

/// Warning counters of one finished environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvironmentRow {
    pub environment:          u32,
    pub non_converged_solves: u32,
    pub suppressed_warnings:  u32,
    pub air_iteration_caps:   u32,
}
