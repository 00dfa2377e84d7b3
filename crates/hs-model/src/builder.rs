//! Fluent builder for an [`HvacModel`].
//!
//! # Usage
//!
//! ```rust
//! use hs_model::{EquipmentList, EquipmentListEntry, HvacModelBuilder, LoadDistScheme, ZoneSpec};
//!
//! let mut b = HvacModelBuilder::new();
//! let zone  = b.add_zone(ZoneSpec::new("Office"));
//! let inlet = b.add_node("Office Inlet");
//! let ret   = b.add_node("Office Return");
//! b.add_inlet(zone, inlet, None);
//! b.add_return(zone, ret, None);
//! b.equipment_list(
//!     zone,
//!     EquipmentList::new("Office Eq", LoadDistScheme::Sequential)
//!         .with_entry(EquipmentListEntry::new("IdealLoads", "Office Ideal", 1, 1)),
//! );
//! let model = b.build().unwrap();
//! assert_eq!(model.zone_count(), 1);
//! ```
//!
//! Connections are recorded as-is and validated together in
//! [`build`](HvacModelBuilder::build); any error there is fatal.

use std::collections::HashSet;

use hs_core::{AirLoopId, InfiltrationId, MixingId, NodeId, ZoneId};

use crate::{
    AirLoopFlow, EquipmentList, HvacModel, Infiltration, MassConservation, MixingLink,
    ModelError, ModelResult, Node, ThermostatType, Zone, ZoneDemand, ZoneEquipConfig,
};

/// Construction parameters for one zone.
#[derive(Debug, Clone)]
pub struct ZoneSpec {
    pub name:                  String,
    pub thermostat:            ThermostatType,
    pub multiplier:            u32,
    pub list_multiplier:       u32,
    pub no_heat_to_return_air: bool,
}

impl ZoneSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:                  name.into(),
            thermostat:            ThermostatType::DualSetpointWithDeadband,
            multiplier:            1,
            list_multiplier:       1,
            no_heat_to_return_air: false,
        }
    }

    pub fn thermostat(mut self, thermostat: ThermostatType) -> Self {
        self.thermostat = thermostat;
        self
    }

    pub fn multipliers(mut self, multiplier: u32, list_multiplier: u32) -> Self {
        self.multiplier = multiplier;
        self.list_multiplier = list_multiplier;
        self
    }

    pub fn no_heat_to_return_air(mut self, value: bool) -> Self {
        self.no_heat_to_return_air = value;
        self
    }
}

#[derive(Debug, Clone, Copy)]
enum Connection {
    Inlet   { zone: ZoneId, node: NodeId, air_loop: AirLoopId },
    Exhaust { zone: ZoneId, node: NodeId },
    Return  { zone: ZoneId, node: NodeId, air_loop: AirLoopId },
    Basis   { zone: ZoneId, node: NodeId },
}

impl Connection {
    fn zone(&self) -> ZoneId {
        match *self {
            Connection::Inlet { zone, .. }
            | Connection::Exhaust { zone, .. }
            | Connection::Return { zone, .. }
            | Connection::Basis { zone, .. } => zone,
        }
    }

    fn node(&self) -> NodeId {
        match *self {
            Connection::Inlet { node, .. }
            | Connection::Exhaust { node, .. }
            | Connection::Return { node, .. }
            | Connection::Basis { node, .. } => node,
        }
    }
}

/// Fluent builder for [`HvacModel`].
pub struct HvacModelBuilder {
    model:            HvacModel,
    connections:      Vec<Connection>,
    equipment:        Vec<(ZoneId, EquipmentList)>,
    balanced_exhaust: Vec<(ZoneId, f64)>,
}

impl Default for HvacModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HvacModelBuilder {
    pub fn new() -> Self {
        Self {
            model:            HvacModel::empty(),
            connections:      Vec::new(),
            equipment:        Vec::new(),
            balanced_exhaust: Vec::new(),
        }
    }

    /// Add a free-standing node (inlet, exhaust, return, loop interface).
    pub fn add_node(&mut self, name: impl Into<String>) -> NodeId {
        self.model.nodes.add(Node::new(name))
    }

    /// Add a zone and its zone air node.
    pub fn add_zone(&mut self, spec: ZoneSpec) -> ZoneId {
        let id = ZoneId(self.model.zones.len() as u32);
        let air_node = self.model.nodes.add(Node::new(format!("{} Air Node", spec.name)));
        let mut zone = Zone::new(spec.name, air_node);
        zone.thermostat = spec.thermostat;
        zone.multiplier = spec.multiplier;
        zone.list_multiplier = spec.list_multiplier;
        zone.no_heat_to_return_air = spec.no_heat_to_return_air;
        self.model.zones.push(zone);
        id
    }

    pub fn add_air_loop(&mut self, air_loop: AirLoopFlow) -> AirLoopId {
        let id = AirLoopId(self.model.air_loops.len() as u32);
        self.model.air_loops.push(air_loop);
        id
    }

    /// Connect a supply inlet, optionally fed by `air_loop`.
    pub fn add_inlet(&mut self, zone: ZoneId, node: NodeId, air_loop: Option<AirLoopId>) {
        let air_loop = air_loop.unwrap_or(AirLoopId::INVALID);
        self.connections.push(Connection::Inlet { zone, node, air_loop });
    }

    pub fn add_exhaust(&mut self, zone: ZoneId, node: NodeId) {
        self.connections.push(Connection::Exhaust { zone, node });
    }

    /// Connect a return node, optionally draining to `air_loop`.
    pub fn add_return(&mut self, zone: ZoneId, node: NodeId, air_loop: Option<AirLoopId>) {
        let air_loop = air_loop.unwrap_or(AirLoopId::INVALID);
        self.connections.push(Connection::Return { zone, node, air_loop });
    }

    /// Use `node`'s flow as (part of) the basis for the zone's return flow.
    pub fn add_return_basis_node(&mut self, zone: ZoneId, node: NodeId) {
        self.connections.push(Connection::Basis { zone, node });
    }

    pub fn balanced_exhaust(&mut self, zone: ZoneId, flow: f64) {
        self.balanced_exhaust.push((zone, flow));
    }

    pub fn equipment_list(&mut self, zone: ZoneId, list: EquipmentList) {
        self.equipment.push((zone, list));
    }

    pub fn add_mixing(&mut self, from: ZoneId, to: ZoneId, design_flow: f64) -> MixingId {
        let id = MixingId(self.model.mixing.len() as u32);
        self.model.mixing.push(MixingLink::new(from, to, design_flow));
        id
    }

    pub fn add_infiltration(&mut self, zone: ZoneId, design_flow: f64) -> InfiltrationId {
        let id = InfiltrationId(self.model.infiltration.len() as u32);
        self.model.infiltration.push(Infiltration::new(zone, design_flow));
        id
    }

    /// Direct access to the model under construction (initial node states,
    /// return gains, air-loop parameters, …).
    pub fn model_mut(&mut self) -> &mut HvacModel {
        &mut self.model
    }

    /// Validate every connection and return the finished model.
    pub fn build(self) -> ModelResult<HvacModel> {
        let HvacModelBuilder { mut model, connections, equipment, balanced_exhaust } = self;
        let zone_count = model.zones.len();

        model.equip_configs = (0..zone_count as u32).map(|z| ZoneEquipConfig::empty(ZoneId(z))).collect();
        model.conservation = vec![MassConservation::default(); zone_count];
        model.demands = vec![ZoneDemand::default(); zone_count];

        // ── Connections ──────────────────────────────────────────────────
        let mut seen: HashSet<(ZoneId, NodeId)> = HashSet::new();
        for conn in &connections {
            let zone = conn.zone();
            let node = conn.node();
            if zone.index() >= zone_count {
                return Err(ModelError::UnknownZone(zone));
            }
            if !model.nodes.contains(node) {
                return Err(ModelError::UnknownNode(node));
            }
            let basis = matches!(conn, Connection::Basis { .. });
            if !basis && !seen.insert((zone, node)) {
                return Err(ModelError::DuplicateConnection { zone, node });
            }

            let cfg = &mut model.equip_configs[zone.index()];
            cfg.is_controlled = true;
            match *conn {
                Connection::Inlet { node, air_loop, .. } => {
                    check_air_loop(&model.air_loops, air_loop)?;
                    cfg.inlet_nodes.push(node);
                    cfg.inlet_air_loops.push(air_loop);
                }
                Connection::Exhaust { node, .. } => cfg.exhaust_nodes.push(node),
                Connection::Return { node, air_loop, .. } => {
                    check_air_loop(&model.air_loops, air_loop)?;
                    cfg.return_nodes.push(node);
                    cfg.return_air_loops.push(air_loop);
                }
                Connection::Basis { node, .. } => cfg.return_basis_nodes.push(node),
            }
        }

        // ── Return topology ──────────────────────────────────────────────
        for cfg in &mut model.equip_configs {
            let zone = cfg.zone;
            if !cfg.return_basis_nodes.is_empty() && cfg.return_nodes.is_empty() {
                return Err(ModelError::ReturnTopology {
                    zone,
                    reason: "return-flow basis nodes without any return node".into(),
                });
            }
            cfg.return_inlet = cfg
                .return_air_loops
                .iter()
                .map(|&l| {
                    if l.is_valid() {
                        cfg.inlet_air_loops.iter().position(|&il| il == l)
                    } else {
                        None
                    }
                })
                .collect();
            if cfg.return_nodes.len() > 1 && cfg.return_basis_nodes.is_empty() {
                for (i, &l) in cfg.return_air_loops.iter().enumerate() {
                    if l.is_valid() && cfg.return_inlet[i].is_none() {
                        return Err(ModelError::ReturnTopology {
                            zone,
                            reason: format!(
                                "return node {} on {} has no inlet on the same air loop",
                                cfg.return_nodes[i], l
                            ),
                        });
                    }
                }
            }
            cfg.fixed_return_flow = vec![false; cfg.return_nodes.len()];
        }

        // ── Equipment lists ──────────────────────────────────────────────
        for (zone, list) in equipment {
            if zone.index() >= zone_count {
                return Err(ModelError::UnknownZone(zone));
            }
            for entry in &list.entries {
                let ok = |f: f64| (0.0..=1.0).contains(&f);
                if !ok(entry.sequential_heating_fraction) || !ok(entry.sequential_cooling_fraction) {
                    return Err(ModelError::EquipmentList {
                        zone,
                        list:   list.name.clone(),
                        reason: format!("`{}` has a sequential fraction outside [0, 1]", entry.name),
                    });
                }
            }
            let cfg = &mut model.equip_configs[zone.index()];
            if !cfg.equipment.is_empty() {
                return Err(ModelError::EquipmentList {
                    zone,
                    list:   list.name.clone(),
                    reason: "zone already has an equipment list".into(),
                });
            }
            cfg.is_controlled = true;
            cfg.equipment = list;
        }

        for (zone, flow) in balanced_exhaust {
            if zone.index() >= zone_count {
                return Err(ModelError::UnknownZone(zone));
            }
            model.equip_configs[zone.index()].balanced_exhaust = flow;
        }

        // ── Mixing and infiltration ──────────────────────────────────────
        for m in &model.mixing {
            for z in [m.from, m.to] {
                if z.index() >= zone_count {
                    return Err(ModelError::UnknownZone(z));
                }
            }
            if m.from == m.to {
                return Err(ModelError::SelfMixing(m.from));
            }
            model.conservation[m.from.index()].is_mixing_source = true;
            model.conservation[m.to.index()].is_mixing_receiver = true;
        }
        for (i, inf) in model.infiltration.iter().enumerate() {
            if inf.zone.index() >= zone_count {
                return Err(ModelError::UnknownZone(inf.zone));
            }
            let mc = &mut model.conservation[inf.zone.index()];
            if mc.infiltration.is_none() {
                mc.infiltration = Some(InfiltrationId(i as u32));
            }
        }
        for (z, mc) in model.conservation.iter_mut().enumerate() {
            let zone = ZoneId(z as u32);
            mc.mixing_flow = model.mixing.iter().filter(|m| m.to == zone).map(|m| m.flow).sum();
            mc.mixing_source_flow = model.mixing.iter().filter(|m| m.from == zone).map(|m| m.flow).sum();
        }

        for (z, cfg) in model.equip_configs.iter().enumerate() {
            let slots = cfg.equipment.len();
            let demand = &mut model.demands[z];
            demand.energy.reset(0.0, 0.0, 0.0, slots);
            demand.moisture.reset(0.0, 0.0, 0.0, slots);
        }

        Ok(model)
    }
}

fn check_air_loop(loops: &[AirLoopFlow], id: AirLoopId) -> ModelResult<()> {
    if id.is_valid() && id.index() >= loops.len() {
        return Err(ModelError::UnknownAirLoop(id));
    }
    Ok(())
}
