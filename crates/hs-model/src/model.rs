//! `HvacModel` — owner of every arena.

use hs_core::{AirLoopId, MixingId, STD_BARO_PRESS, ZoneId};

use crate::{
    AirLoopFlow, Infiltration, MassConservation, MixingLink, NodeStore, Zone, ZoneDemand,
    ZoneEquipConfig,
};

/// All model state the HVAC core reads and writes.
///
/// Zone-parallel arrays (`zones`, `equip_configs`, `conservation`,
/// `demands`) always have the same length.  Build one with
/// [`HvacModelBuilder`][crate::HvacModelBuilder].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HvacModel {
    pub nodes:              NodeStore,
    pub zones:              Vec<Zone>,
    pub equip_configs:      Vec<ZoneEquipConfig>,
    pub conservation:       Vec<MassConservation>,
    pub demands:            Vec<ZoneDemand>,
    pub air_loops:          Vec<AirLoopFlow>,
    pub mixing:             Vec<MixingLink>,
    pub infiltration:       Vec<Infiltration>,
    /// Outdoor barometric pressure [Pa].
    pub outdoor_baro_press: f64,
}

impl HvacModel {
    pub(crate) fn empty() -> Self {
        Self {
            nodes:              NodeStore::new(),
            zones:              Vec::new(),
            equip_configs:      Vec::new(),
            conservation:       Vec::new(),
            demands:            Vec::new(),
            air_loops:          Vec::new(),
            mixing:             Vec::new(),
            infiltration:       Vec::new(),
            outdoor_baro_press: STD_BARO_PRESS,
        }
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// All zone ids in ordinal order.
    pub fn zone_ids(&self) -> impl Iterator<Item = ZoneId> + use<> {
        (0..self.zones.len() as u32).map(ZoneId)
    }

    pub fn air_loop_ids(&self) -> impl Iterator<Item = AirLoopId> + use<> {
        (0..self.air_loops.len() as u32).map(AirLoopId)
    }

    #[inline]
    pub fn zone(&self, id: ZoneId) -> &Zone {
        &self.zones[id.index()]
    }

    #[inline]
    pub fn equip_config(&self, id: ZoneId) -> &ZoneEquipConfig {
        &self.equip_configs[id.index()]
    }

    #[inline]
    pub fn demand(&self, id: ZoneId) -> &ZoneDemand {
        &self.demands[id.index()]
    }

    #[inline]
    pub fn air_loop(&self, id: AirLoopId) -> &AirLoopFlow {
        &self.air_loops[id.index()]
    }

    /// Mixing links delivering air into `zone`.
    pub fn mixing_into(&self, zone: ZoneId) -> impl Iterator<Item = (MixingId, &MixingLink)> {
        self.mixing
            .iter()
            .enumerate()
            .filter(move |(_, m)| m.to == zone)
            .map(|(i, m)| (MixingId(i as u32), m))
    }

    /// Total mixing flow entering `zone` [kg/s].
    pub fn mixing_flow_into(&self, zone: ZoneId) -> f64 {
        self.mixing_into(zone).map(|(_, m)| m.flow).sum()
    }

    /// Total mixing flow leaving `zone` [kg/s].
    pub fn mixing_flow_from(&self, zone: ZoneId) -> f64 {
        self.mixing.iter().filter(|m| m.from == zone).map(|m| m.flow).sum()
    }

    /// Reset per-environment state: one-shot warning latches, mixing and
    /// infiltration flows back to their design values.
    pub fn reset_environment(&mut self) {
        for cfg in &mut self.equip_configs {
            cfg.flow_error = false;
            cfg.excess_zone_exh = 0.0;
        }
        for loop_flow in &mut self.air_loops {
            loop_flow.flow_error = false;
            loop_flow.reset_accumulators();
        }
        for m in &mut self.mixing {
            m.flow = m.design_flow;
        }
        for inf in &mut self.infiltration {
            inf.mass_flow = inf.design_flow;
        }
        for zone in &mut self.zones {
            zone.clear_spill_loads();
        }
    }
}
