//! `ZoneEquipmentManager` — one zone-equipment pass over every zone.
//!
//! # Pass
//!
//! ```text
//! for each zone with equipment connections:
//!     sim order      ← SimOrder::set(list, predicted load)
//!     distributor    ← init(); distribute() when thermostat-controlled
//!     for slot in sim order:
//!         ForceOff   → update(slot, 0, 0)
//!         otherwise  → init once, simulate(remaining), update(slot, delivered)
//! mass balance       ← MassBalanceEngine::balance (all zones at once)
//! return nodes       ← update_leaving_conditions
//! ```
//!
//! Thermostat-uncontrolled zones skip distribution; their equipment sees a
//! running subtraction of what the earlier equipment delivered.

use hs_airflow::{BalanceContext, BalanceOutcome, MassBalanceEngine, update_leaving_conditions};
use hs_core::{Psychrometrics, ZoneId};
use hs_equipment::{
    AvailabilityStatus, EquipContext, EquipmentDemand, Intent, Subsystem, ZoneEquipment,
};
use hs_loads::{LoadDistributor, SimOrder};
use hs_model::HvacModel;

use crate::SimResult;

/// Run-state for one zone-equipment pass.
pub struct ZonePass<'a> {
    pub psychro:         &'a dyn Psychrometrics,
    pub first_iteration: bool,
    pub sys_step_secs:   f64,
    pub warmup:          bool,
}

/// Owns the zone equipment models, indexed by zone and list position.
pub struct ZoneEquipmentManager {
    equipment:    Vec<Vec<Box<dyn ZoneEquipment>>>,
    orders:       Vec<SimOrder>,
    initialised:  Vec<Vec<bool>>,
    last_balance: BalanceOutcome,
}

impl ZoneEquipmentManager {
    /// `equipment[z][i]` must model entry `i` of zone `z`'s equipment list.
    pub fn new(equipment: Vec<Vec<Box<dyn ZoneEquipment>>>) -> Self {
        let orders = vec![SimOrder::default(); equipment.len()];
        let initialised = equipment.iter().map(|e| vec![false; e.len()]).collect();
        Self { equipment, orders, initialised, last_balance: BalanceOutcome::default() }
    }

    pub fn equipment(&self, zone: ZoneId) -> &[Box<dyn ZoneEquipment>] {
        self.equipment.get(zone.index()).map_or(&[], Vec::as_slice)
    }

    pub fn equipment_mut(&mut self, zone: ZoneId) -> Option<&mut Vec<Box<dyn ZoneEquipment>>> {
        self.equipment.get_mut(zone.index())
    }

    /// Sim order resolved by the most recent pass.
    pub fn order(&self, zone: ZoneId) -> Option<&SimOrder> {
        self.orders.get(zone.index())
    }

    /// Outcome of the mass balance run by the most recent pass.
    pub fn last_balance(&self) -> &BalanceOutcome {
        &self.last_balance
    }

    /// Simulate every zone's equipment, balance zone air flows and update
    /// return nodes.  Returns the intents raised along the way.
    pub fn simulate(
        &mut self,
        model:        &mut HvacModel,
        mass_balance: &mut MassBalanceEngine,
        pass:         &ZonePass<'_>,
    ) -> SimResult<Vec<Intent>> {
        let mut intents = Vec::new();
        for zone in model.zone_ids() {
            self.simulate_zone(model, zone, pass, &mut intents)?;
        }

        let outcome = mass_balance.balance(
            model,
            &BalanceContext {
                psychro:              pass.psychro,
                first_hvac_iteration: pass.first_iteration,
                warmup:               pass.warmup,
            },
        )?;
        if outcome.hvac_resim_forced {
            intents.push(Intent::Resimulate(Subsystem::AirLoops));
        }
        update_leaving_conditions(model, pass.psychro);
        self.last_balance = outcome;
        Ok(intents)
    }

    fn simulate_zone(
        &mut self,
        model:   &mut HvacModel,
        zone:    ZoneId,
        pass:    &ZonePass<'_>,
        intents: &mut Vec<Intent>,
    ) -> SimResult<()> {
        let z = zone.index();
        // Disjoint borrows of the arenas this pass touches.
        let HvacModel { nodes, zones, equip_configs, demands, .. } = model;
        let cfg = &mut equip_configs[z];
        let Some(models) = self.equipment.get_mut(z) else {
            return Ok(());
        };
        if !cfg.is_controlled || models.is_empty() {
            return Ok(());
        }
        let zone_data = &zones[z];
        let controlled = zone_data.is_thermostat_controlled();

        let order = &mut self.orders[z];
        order.set(&cfg.equipment, demands[z].energy.total);
        let order = &*order;

        let mut dist = LoadDistributor::new(
            &mut cfg.equipment,
            order,
            &mut demands[z],
            zone_data.thermostat,
            pass.first_iteration,
        );
        dist.init();
        if controlled {
            dist.distribute()?;
        }

        let initialised = &mut self.initialised[z];
        for (slot, &pos) in order.positions().iter().enumerate() {
            let slot_arg = controlled.then_some(slot);
            let equipment = &mut models[pos];
            if equipment.availability() == AvailabilityStatus::ForceOff {
                dist.update(slot_arg, 0.0, 0.0)?;
                continue;
            }

            let mut ctx = EquipContext::new(
                nodes,
                zone,
                zone_data.air_node,
                pass.first_iteration,
                pass.sys_step_secs,
                pass.psychro,
            );
            if !initialised[pos] {
                equipment.init(&mut ctx)?;
                initialised[pos] = true;
            }
            let demand = EquipmentDemand::from_zone(dist.demand());
            let output = equipment.simulate(&demand, &mut ctx);
            intents.extend(output.intents);
            dist.update(slot_arg, output.sensible_w, output.latent_kg_s)?;
        }
        Ok(())
    }
}
