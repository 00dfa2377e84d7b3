//! `ConvergenceTrace` — recent history of monitored solver quantities.
//!
//! Every pass of the convergence solver records the current mass flow,
//! temperature and humidity ratio at each monitored location: the
//! supply/demand interfaces of air loops and plant loop sides, and every
//! zone inlet node.  Only the last [`TRACE_DEPTH`] values are kept.  The
//! trace is cleared at the start of each solve and read only by the
//! divergence reporter in [`diagnostics`][crate::diagnostics].

use std::fmt;

use hs_core::{AirLoopId, NodeId, PlantLoopId, ZoneId};

#[cfg(feature = "fx-hash")]
type TraceIndex = rustc_hash::FxHashMap<TraceKey, usize>;
#[cfg(not(feature = "fx-hash"))]
type TraceIndex = std::collections::HashMap<TraceKey, usize>;

/// Values kept per location and quantity.
pub const TRACE_DEPTH: usize = 10;

// ── Keys ──────────────────────────────────────────────────────────────────────

/// Monitored quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceQuantity {
    MassFlow,
    Temperature,
    HumidityRatio,
}

impl TraceQuantity {
    /// Change between the last two passes above which the location counts
    /// as not converged.
    pub fn tolerance(self) -> f64 {
        match self {
            TraceQuantity::MassFlow => 0.01,
            TraceQuantity::Temperature => 0.01,
            TraceQuantity::HumidityRatio => 0.000_01,
        }
    }

    /// Two values closer than this are treated as the same value when
    /// looking for oscillation.
    pub fn oscillation_tolerance(self) -> f64 {
        match self {
            TraceQuantity::MassFlow => 1.0e-7,
            TraceQuantity::Temperature => 1.0e-6,
            TraceQuantity::HumidityRatio => 1.0e-8,
        }
    }

    /// Least-squares slope (per pass) above which a trend is reported.
    pub fn slope_tolerance(self) -> f64 {
        match self {
            TraceQuantity::MassFlow => 0.001,
            TraceQuantity::Temperature => 0.001,
            TraceQuantity::HumidityRatio => 0.000_01,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TraceQuantity::MassFlow => "mass flow",
            TraceQuantity::Temperature => "temperature",
            TraceQuantity::HumidityRatio => "humidity ratio",
        }
    }
}

/// Which side of a loop interface a value was taken on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterfaceSide {
    Demand,
    Supply,
}

/// Where a traced value was measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceLocation {
    AirLoop { air_loop: AirLoopId, side: InterfaceSide },
    ZoneInlet { zone: ZoneId, node: NodeId },
    PlantLoop { plant_loop: PlantLoopId, side: InterfaceSide },
}

impl fmt::Display for TraceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceLocation::AirLoop { air_loop, side } => {
                write!(f, "air loop {air_loop} {side:?} side")
            }
            TraceLocation::ZoneInlet { zone, node } => {
                write!(f, "zone {zone} inlet node {node}")
            }
            TraceLocation::PlantLoop { plant_loop, side } => {
                write!(f, "plant loop {plant_loop} {side:?} side")
            }
        }
    }
}

type TraceKey = (TraceLocation, TraceQuantity);

// ── TraceHistory ──────────────────────────────────────────────────────────────

/// The last [`TRACE_DEPTH`] values of one quantity, newest first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceHistory {
    values: [f64; TRACE_DEPTH],
    len:    usize,
}

impl Default for TraceHistory {
    fn default() -> Self {
        Self { values: [0.0; TRACE_DEPTH], len: 0 }
    }
}

impl TraceHistory {
    /// Push `value` as the newest entry, dropping the oldest when full.
    pub fn push(&mut self, value: f64) {
        self.values.copy_within(0..TRACE_DEPTH - 1, 1);
        self.values[0] = value;
        self.len = (self.len + 1).min(TRACE_DEPTH);
    }

    /// Recorded values, newest first.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values[..self.len]
    }

    #[inline]
    pub fn latest(&self) -> Option<f64> {
        self.values().first().copied()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// One traced location and quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceEntry {
    pub location: TraceLocation,
    pub quantity: TraceQuantity,
    pub history:  TraceHistory,
}

// ── ConvergenceTrace ──────────────────────────────────────────────────────────

/// Histories for every location recorded since the last [`clear`][Self::clear],
/// in first-recorded order.
#[derive(Debug, Clone, Default)]
pub struct ConvergenceTrace {
    index:   TraceIndex,
    entries: Vec<TraceEntry>,
}

impl ConvergenceTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the history of `quantity` at `location`.
    pub fn record(&mut self, location: TraceLocation, quantity: TraceQuantity, value: f64) {
        let entries = &mut self.entries;
        let slot = *self.index.entry((location, quantity)).or_insert_with(|| {
            entries.push(TraceEntry { location, quantity, history: TraceHistory::default() });
            entries.len() - 1
        });
        self.entries[slot].history.push(value);
    }

    /// Record mass flow, temperature and humidity ratio at `location`.
    pub fn record_state(&mut self, location: TraceLocation, mass_flow: f64, temp: f64, hum_rat: f64) {
        self.record(location, TraceQuantity::MassFlow, mass_flow);
        self.record(location, TraceQuantity::Temperature, temp);
        self.record(location, TraceQuantity::HumidityRatio, hum_rat);
    }

    pub fn get(&self, location: TraceLocation, quantity: TraceQuantity) -> Option<&TraceHistory> {
        self.index.get(&(location, quantity)).map(|&i| &self.entries[i].history)
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.entries.clear();
    }
}
