//! Mutable state handed to one zone equipment call.

use hs_core::{NodeId, Psychrometrics, ZoneId};
use hs_model::NodeStore;

/// What a [`ZoneEquipment`][crate::ZoneEquipment] call may read and write.
///
/// Built by the zone equipment manager for each call.  Equipment writes its
/// outlet conditions and flows into `nodes`; everything else is read-only.
pub struct EquipContext<'a> {
    /// The node arena.  Equipment owns its outlet nodes for the duration of
    /// the call.
    pub nodes:           &'a mut NodeStore,

    /// Zone being served.
    pub zone:            ZoneId,

    /// The zone's air node (read it for entering-air conditions).
    pub zone_air_node:   NodeId,

    /// `true` on the first pass of the convergence solver.
    pub first_iteration: bool,

    /// Length of the current system sub-step [s].
    pub sys_step_secs:   f64,

    pub psychro:         &'a dyn Psychrometrics,
}

impl<'a> EquipContext<'a> {
    #[inline]
    pub fn new(
        nodes:           &'a mut NodeStore,
        zone:            ZoneId,
        zone_air_node:   NodeId,
        first_iteration: bool,
        sys_step_secs:   f64,
        psychro:         &'a dyn Psychrometrics,
    ) -> Self {
        Self { nodes, zone, zone_air_node, first_iteration, sys_step_secs, psychro }
    }
}
