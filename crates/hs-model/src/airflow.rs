//! Inter-zone mixing, infiltration, and per-zone mass-conservation records.

use hs_core::{InfiltrationId, ZoneId};

/// Air moved from one zone to another by a mixing object.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MixingLink {
    pub from:        ZoneId,
    pub to:          ZoneId,
    /// Flow requested by the mixing object [kg/s].
    pub design_flow: f64,
    /// Current flow, possibly rescaled by the mass balance [kg/s].
    pub flow:        f64,
}

impl MixingLink {
    pub fn new(from: ZoneId, to: ZoneId, design_flow: f64) -> Self {
        Self { from, to, design_flow, flow: design_flow }
    }
}

/// An infiltration object whose flow the mass balance may adjust.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Infiltration {
    pub zone:        ZoneId,
    /// Flow from the infiltration model before adjustment [kg/s].
    pub design_flow: f64,
    /// Current flow [kg/s].
    pub mass_flow:   f64,
}

impl Infiltration {
    pub fn new(zone: ZoneId, design_flow: f64) -> Self {
        Self { zone, design_flow, mass_flow: design_flow }
    }
}

/// Per-zone flow terms of the mass balance, kept for reporting.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MassConservation {
    pub in_flow:            f64,
    pub exhaust_flow:       f64,
    pub return_flow:        f64,
    /// Mixing flow entering this zone [kg/s].
    pub mixing_flow:        f64,
    /// Mixing flow this zone supplies to other zones [kg/s].
    pub mixing_source_flow: f64,
    pub infiltration_flow:  f64,
    /// Whether the infiltration term took part in this pass's balance.
    pub includes_infiltration: bool,
    /// The zone's adjustable infiltration object, if any.
    pub infiltration:       Option<InfiltrationId>,
    pub is_mixing_source:   bool,
    pub is_mixing_receiver: bool,
}

impl MassConservation {
    /// `inlet + mixing_in − exhaust − return − mixing_out` [kg/s].
    pub fn residual(&self) -> f64 {
        self.in_flow + self.mixing_flow - self.exhaust_flow - self.return_flow - self.mixing_source_flow
    }
}
