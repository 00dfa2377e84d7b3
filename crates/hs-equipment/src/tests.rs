//! Unit tests for hs-equipment.

use hs_core::{IdealGasPsychrometrics, NodeId, ZoneId};
use hs_model::{Node, NodeStore};

use crate::{
    AvailabilityStatus, EquipContext, EquipmentDemand, EquipmentOutput, IdealLoads, Intent,
    NoopEquipment, SimulationFlags, Subsystem, ZoneEquipment,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Node 0 is the zone air node, node 1 the supply node.
fn make_nodes() -> NodeStore {
    let mut nodes = NodeStore::new();
    nodes.add(Node::new("zone"));
    nodes.add(Node::new("supply"));
    nodes
}

fn heating(w: f64) -> EquipmentDemand {
    EquipmentDemand { output_required: w, output_to_heat_sp: w, output_to_cool_sp: w, ..Default::default() }
}

// ── Intents and flags ─────────────────────────────────────────────────────────

#[cfg(test)]
mod flag_tests {
    use super::*;

    #[test]
    fn apply_raises_named_flags_only() {
        let mut flags = SimulationFlags::default();
        flags.apply(&[Intent::Resimulate(Subsystem::PlantLoops)]);
        assert!(flags.plant_loops);
        assert!(!flags.air_loops);
        assert!(flags.any());
    }

    #[test]
    fn set_all_and_clear() {
        let mut flags = SimulationFlags::default();
        assert!(!flags.any());
        flags.set_all();
        assert!(Subsystem::ALL.iter().all(|&s| flags.get(s)));
        flags.clear();
        assert!(!flags.any());
    }

    #[test]
    fn set_targets_one_subsystem() {
        let mut flags = SimulationFlags::default();
        flags.set(Subsystem::ElecCircuits, true);
        assert_eq!(flags, SimulationFlags { elec_circuits: true, ..Default::default() });
    }
}

// ── Demand snapshot ───────────────────────────────────────────────────────────

#[cfg(test)]
mod demand_tests {
    use hs_model::ZoneDemand;

    use super::*;

    #[test]
    fn snapshot_reads_remaining_fields() {
        let mut zd = ZoneDemand::default();
        zd.energy.reset(800.0, 800.0, -200.0, 1);
        zd.energy.remaining = 300.0;
        zd.moisture.reset(1e-4, 1e-4, 0.0, 1);
        let d = EquipmentDemand::from_zone(&zd);
        assert_eq!(d.output_required, 300.0);
        assert_eq!(d.output_to_cool_sp, -200.0);
        assert_eq!(d.moisture_required, 1e-4);
    }
}

// ── Stub models ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod model_tests {
    use super::*;

    #[test]
    fn noop_delivers_nothing() {
        let mut nodes = make_nodes();
        let psy = IdealGasPsychrometrics;
        let mut ctx = EquipContext::new(&mut nodes, ZoneId(0), NodeId(0), true, 900.0, &psy);
        let mut eq = NoopEquipment::new("n");
        assert!(eq.init(&mut ctx).is_ok());
        assert_eq!(eq.simulate(&heating(500.0), &mut ctx), EquipmentOutput::default());
        assert_eq!(eq.availability(), AvailabilityStatus::NoAction);
    }

    #[test]
    fn ideal_loads_clamps_to_capacity() {
        let mut nodes = make_nodes();
        let psy = IdealGasPsychrometrics;
        let mut eq = IdealLoads::new("ideal", NodeId(1), 0.5, 1000.0, 2000.0);
        let mut ctx = EquipContext::new(&mut nodes, ZoneId(0), NodeId(0), false, 900.0, &psy);
        eq.init(&mut ctx).unwrap();

        assert_eq!(eq.simulate(&heating(400.0), &mut ctx).sensible_w, 400.0);
        assert_eq!(eq.simulate(&heating(5000.0), &mut ctx).sensible_w, 1000.0);
        assert_eq!(eq.simulate(&heating(-5000.0), &mut ctx).sensible_w, -2000.0);
    }

    #[test]
    fn ideal_loads_writes_supply_state() {
        let mut nodes = make_nodes();
        let psy = IdealGasPsychrometrics;
        let mut eq = IdealLoads::new("ideal", NodeId(1), 0.5, 1000.0, 1000.0);
        let mut ctx = EquipContext::new(&mut nodes, ZoneId(0), NodeId(0), false, 900.0, &psy);
        eq.simulate(&heating(500.0), &mut ctx);
        let supply = &nodes[NodeId(1)];
        assert_eq!(supply.mass_flow, 0.5);
        assert!(supply.temp > 20.0 && supply.temp < 22.0);
    }

    #[test]
    fn ideal_loads_idle_in_deadband() {
        let mut nodes = make_nodes();
        let psy = IdealGasPsychrometrics;
        let mut eq = IdealLoads::new("ideal", NodeId(1), 0.5, 1000.0, 1000.0);
        let mut ctx = EquipContext::new(&mut nodes, ZoneId(0), NodeId(0), false, 900.0, &psy);
        let d = EquipmentDemand { dead_band_or_setback: true, ..heating(500.0) };
        assert_eq!(eq.simulate(&d, &mut ctx).sensible_w, 0.0);
        assert_eq!(nodes[NodeId(1)].mass_flow, 0.0);
    }

    #[test]
    fn ideal_loads_init_rejects_missing_node() {
        let mut nodes = make_nodes();
        let psy = IdealGasPsychrometrics;
        let mut eq = IdealLoads::new("ideal", NodeId(7), 0.5, 1000.0, 1000.0);
        let mut ctx = EquipContext::new(&mut nodes, ZoneId(0), NodeId(0), true, 900.0, &psy);
        assert!(eq.init(&mut ctx).is_err());
    }

    #[test]
    fn custom_model_returns_intent() {
        struct Chatty;
        impl ZoneEquipment for Chatty {
            fn name(&self) -> &str {
                "chatty"
            }
            fn kind(&self) -> &str {
                "Test"
            }
            fn simulate(&mut self, _d: &EquipmentDemand, _ctx: &mut EquipContext<'_>) -> EquipmentOutput {
                EquipmentOutput::new(0.0, 0.0).with_intent(Intent::Resimulate(Subsystem::AirLoops))
            }
        }
        let mut nodes = make_nodes();
        let psy = IdealGasPsychrometrics;
        let mut ctx = EquipContext::new(&mut nodes, ZoneId(0), NodeId(0), true, 900.0, &psy);
        let out = Chatty.simulate(&heating(0.0), &mut ctx);
        assert_eq!(out.intents, vec![Intent::Resimulate(Subsystem::AirLoops)]);
    }
}
