//! Per-zone equipment connection topology.

use hs_core::{AirLoopId, NodeId, ZoneId};

use crate::EquipmentList;

/// Inlet, exhaust and return connections of one zone.
///
/// Topology is fixed at build time.  `fixed_return_flow` and
/// `excess_zone_exh` are recomputed by every mass-balance call;
/// `flow_error` is a one-shot warning latch cleared at environment start.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneEquipConfig {
    pub zone:                    ZoneId,
    /// `false` for zones without any zone equipment connections.
    pub is_controlled:           bool,
    pub equipment:               EquipmentList,

    pub inlet_nodes:             Vec<NodeId>,
    /// Air loop feeding each inlet (`AirLoopId::INVALID` for zonal equipment).
    pub inlet_air_loops:         Vec<AirLoopId>,
    pub exhaust_nodes:           Vec<NodeId>,
    pub return_nodes:            Vec<NodeId>,
    /// Air loop each return node drains to (`INVALID` if none).
    pub return_air_loops:        Vec<AirLoopId>,
    /// Position in `inlet_nodes` of the inlet on the same air loop.
    pub return_inlet:            Vec<Option<usize>>,
    /// Nodes whose summed flow sets the return flow (optional).
    pub return_basis_nodes:      Vec<NodeId>,
    /// Current value of the return-flow fraction schedule.
    pub return_flow_fraction:    f64,
    /// Exhaust flow balanced by a matching outdoor-air supply [kg/s].
    pub balanced_exhaust:        f64,

    pub fixed_return_flow:       Vec<bool>,
    /// Exhaust in excess of what the inlets can supply [kg/s].
    pub excess_zone_exh:         f64,
    /// Set once the unbalanced-flow warning has been issued for this zone.
    pub flow_error:              bool,
}

impl ZoneEquipConfig {
    /// An uncontrolled, unconnected configuration for `zone`.
    pub fn empty(zone: ZoneId) -> Self {
        Self {
            zone,
            return_flow_fraction: 1.0,
            ..Self::default()
        }
    }

    /// First air loop serving this zone, searching returns then inlets.
    pub fn primary_air_loop(&self) -> Option<AirLoopId> {
        self.return_air_loops
            .iter()
            .chain(self.inlet_air_loops.iter())
            .copied()
            .find(|l| l.is_valid())
    }
}
