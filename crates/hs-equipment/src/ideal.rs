//! `IdealLoads` — a capacity-limited supply that meets its target exactly.
//!
//! Stands in for a real terminal unit in demos and tests.  It delivers
//! `clamp(target, -cooling_capacity, heating_capacity)` and writes a supply
//! node state consistent with that output at a fixed supply flow:
//!
//! ```text
//! T_supply = T_zone + Q / (m · cp)
//! ```

use hs_core::NodeId;

use crate::{
    AvailabilityStatus, EquipContext, EquipmentDemand, EquipmentError, EquipmentOutput,
    EquipmentResult, ZoneEquipment,
};

pub struct IdealLoads {
    name:             String,
    supply_node:      NodeId,
    /// Supply mass flow while running [kg/s].
    supply_flow:      f64,
    heating_capacity: f64,
    /// Positive magnitude [W].
    cooling_capacity: f64,
    availability:     AvailabilityStatus,
}

impl IdealLoads {
    pub fn new(
        name:             impl Into<String>,
        supply_node:      NodeId,
        supply_flow:      f64,
        heating_capacity: f64,
        cooling_capacity: f64,
    ) -> Self {
        Self {
            name: name.into(),
            supply_node,
            supply_flow,
            heating_capacity,
            cooling_capacity,
            availability: AvailabilityStatus::NoAction,
        }
    }

    pub fn set_availability(&mut self, status: AvailabilityStatus) {
        self.availability = status;
    }
}

impl ZoneEquipment for IdealLoads {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &str {
        "IdealLoads"
    }

    fn availability(&self) -> AvailabilityStatus {
        self.availability
    }

    fn init(&mut self, ctx: &mut EquipContext<'_>) -> EquipmentResult<()> {
        let fail = |reason: String| EquipmentError::Init {
            kind: "IdealLoads".into(),
            name: self.name.clone(),
            reason,
        };
        if self.supply_flow < 0.0 || self.heating_capacity < 0.0 || self.cooling_capacity < 0.0 {
            return Err(fail("flow and capacities must be non-negative".into()));
        }
        let node = ctx
            .nodes
            .get_mut(self.supply_node)
            .ok_or_else(|| fail(format!("supply node {} does not exist", self.supply_node)))?;
        node.mass_flow_max = self.supply_flow;
        Ok(())
    }

    fn simulate(&mut self, demand: &EquipmentDemand, ctx: &mut EquipContext<'_>) -> EquipmentOutput {
        let zone = &ctx.nodes[ctx.zone_air_node];
        let (t_zone, w_zone) = (zone.temp, zone.hum_rat);

        let q = if demand.dead_band_or_setback {
            0.0
        } else {
            demand.output_required.clamp(-self.cooling_capacity, self.heating_capacity)
        };
        let m = if q == 0.0 { 0.0 } else { self.supply_flow };
        let cp = ctx.psychro.specific_heat(w_zone);
        let t_supply = if m > 0.0 { t_zone + q / (m * cp) } else { t_zone };
        let h_supply = ctx.psychro.enthalpy(t_supply, w_zone);

        let node = &mut ctx.nodes[self.supply_node];
        node.mass_flow = m;
        node.mass_flow_max_avail = self.supply_flow;
        node.temp = t_supply;
        node.hum_rat = w_zone;
        node.enthalpy = h_supply;

        EquipmentOutput::new(q, 0.0)
    }
}
