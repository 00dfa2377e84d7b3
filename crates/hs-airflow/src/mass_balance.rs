//! `MassBalanceEngine` — reconciles zone inlet, exhaust, return, mixing and
//! infiltration flows.
//!
//! # Algorithm (one call)
//!
//! ```text
//! repeat (≤ max_iterations, only repeats with enforcement):
//!     reset air-loop return accumulators
//!     for zone in order (mixing receivers first):
//!         inlet, exhaust      ← node flows
//!         mixing_in           ← cached (iteration 0) or max(0, ret + exh − in + mixing_out)
//!         target return       ← in + mixing_in − mixing_out − (exh − balanced exhaust)
//!         return node flows   ← calc_zone_return_flows(target)
//!         infiltration        ← residual (Adjust / Add)
//!         air-loop zone_ret_flow += return node flows
//!     stop when building mixing flow changes by < tolerance
//! per air loop: ratio = max(0, ret − excess exhaust) / ret, applied to its return nodes
//! ```
//!
//! Without enforcement mixing does not enter the return target and a
//! negative target becomes *excess exhaust*, charged to the zone's first air
//! loop and taken out of that loop's zone returns by the final ratio.

use hs_core::{Psychrometrics, STD_RHO_AIR, ZoneId};
use hs_model::{HvacModel, MassConservation};

use crate::{
    AirflowError, AirflowResult, InfiltrationTreatment, InfiltrationZones, MassBalanceConfig,
    calc_zone_return_flows, mixing,
};

/// Net zone outflow below which no imbalance is reported [kg/s].
pub const SMALL_MASS_FLOW: f64 = 0.001;

/// Volumetric imbalance below which no warning is issued [m³/s].
pub const SMALL_AIR_VOL_FLOW: f64 = 0.001;

/// Run-state flags the balance needs from the caller.
pub struct BalanceContext<'a> {
    pub psychro:              &'a dyn Psychrometrics,
    pub first_hvac_iteration: bool,
    /// Warm-up days suppress imbalance warnings.
    pub warmup:               bool,
}

/// Result of one [`MassBalanceEngine::balance`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalanceOutcome {
    /// Outer-loop passes used.
    pub iterations:           u32,
    pub converged:            bool,
    /// Sum of mixing flow into all zones after the last pass [kg/s].
    pub building_mixing_flow: f64,
    /// Enforcement did not settle; the air side should be simulated again.
    pub hvac_resim_forced:    bool,
    /// Zones that received their (one-shot) imbalance warning in this call.
    pub newly_unbalanced:     Vec<ZoneId>,
}

/// Return-side flows of one air loop, for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AirLoopReturn {
    pub zone_ret_flow:        f64,
    pub sys_ret_flow:         f64,
    pub excess_zone_exh_flow: f64,
    pub zone_ret_flow_ratio:  f64,
}

/// Per-zone and per-air-loop mass-balance terms after a balance call.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MassBalanceSnapshot {
    pub iterations:           u32,
    pub converged:            bool,
    pub building_mixing_flow: f64,
    /// Indexed by `ZoneId`.
    pub zones:                Vec<MassConservation>,
    /// Indexed by `AirLoopId`.
    pub air_loops:            Vec<AirLoopReturn>,
}

impl MassBalanceSnapshot {
    pub fn capture(model: &HvacModel, outcome: &BalanceOutcome) -> Self {
        Self {
            iterations:           outcome.iterations,
            converged:            outcome.converged,
            building_mixing_flow: outcome.building_mixing_flow,
            zones:                model.conservation.clone(),
            air_loops:            model
                .air_loops
                .iter()
                .map(|l| AirLoopReturn {
                    zone_ret_flow:        l.zone_ret_flow,
                    sys_ret_flow:         l.sys_ret_flow,
                    excess_zone_exh_flow: l.excess_zone_exh_flow,
                    zone_ret_flow_ratio:  l.zone_ret_flow_ratio,
                })
                .collect(),
        }
    }
}

pub struct MassBalanceEngine {
    config:     MassBalanceConfig,
    /// Zone processing order, rebuilt when the zone count changes.
    zone_order: Vec<ZoneId>,
}

impl MassBalanceEngine {
    pub fn new(config: MassBalanceConfig) -> AirflowResult<Self> {
        config.validate()?;
        Ok(Self { config, zone_order: Vec::new() })
    }

    pub fn config(&self) -> &MassBalanceConfig {
        &self.config
    }

    /// Zones in processing order.
    pub fn zone_order(&self) -> &[ZoneId] {
        &self.zone_order
    }

    /// Balance every zone of `model` against the current inlet and exhaust
    /// node flows.
    pub fn balance(
        &mut self,
        model: &mut HvacModel,
        ctx:   &BalanceContext<'_>,
    ) -> AirflowResult<BalanceOutcome> {
        check_finite(model)?;
        self.refresh_order(model);

        let mut outcome = BalanceOutcome::default();
        let mut previous = 0.0;
        loop {
            for air_loop in &mut model.air_loops {
                air_loop.reset_accumulators();
            }
            let mut building = 0.0;
            for i in 0..self.zone_order.len() {
                let zone = self.zone_order[i];
                building += self.balance_zone(model, zone, outcome.iterations, ctx, &mut outcome);
            }
            outcome.iterations += 1;
            outcome.building_mixing_flow = building;

            if !self.config.enforce || (building - previous).abs() < self.config.tolerance {
                outcome.converged = true;
                break;
            }
            if outcome.iterations >= self.config.max_iterations {
                break;
            }
            previous = building;
        }
        outcome.hvac_resim_forced = self.config.enforce && !outcome.converged;

        self.apply_return_ratios(model, ctx);
        Ok(outcome)
    }

    /// One zone of one outer pass.  Returns the zone's mixing inflow.
    fn balance_zone(
        &self,
        model:     &mut HvacModel,
        zone:      ZoneId,
        iteration: u32,
        ctx:       &BalanceContext<'_>,
        outcome:   &mut BalanceOutcome,
    ) -> f64 {
        let z = zone.index();
        let cfg = self.config;
        let HvacModel {
            nodes,
            zones,
            equip_configs,
            conservation,
            air_loops,
            mixing: links,
            infiltration,
            outdoor_baro_press,
            ..
        } = model;

        let equip = &mut equip_configs[z];
        let in_flow = nodes.total_mass_flow(&equip.inlet_nodes);
        let exh_flow = nodes.total_mass_flow(&equip.exhaust_nodes);

        // ── Mixing ───────────────────────────────────────────────────────
        if cfg.enforce && conservation[z].is_mixing_receiver {
            let mc = &conservation[z];
            let wanted = if iteration == 0 || !cfg.balance_mixing {
                mixing::zone_flows(links, zone).0
            } else {
                (mc.return_flow + exh_flow - in_flow + mc.mixing_source_flow).max(0.0)
            };
            mixing::set_receiving_flow(links, zone, wanted);
            mixing::refresh_sources(links, conservation, zone);
        }
        let (mixing_in, mixing_out) = mixing::zone_flows(links, zone);

        // ── Return target ────────────────────────────────────────────────
        let net_mixing = if cfg.enforce { mixing_in - mixing_out } else { 0.0 };
        let mut target = in_flow + net_mixing - (exh_flow - equip.balanced_exhaust);
        equip.excess_zone_exh = 0.0;
        if target < 0.0 {
            if !cfg.enforce {
                equip.excess_zone_exh = -target;
                if let Some(l) = equip.primary_air_loop() {
                    air_loops[l.index()].excess_zone_exh_flow += -target;
                }
            }
            target = 0.0;
        }

        let ret_flow = calc_zone_return_flows(equip, nodes, air_loops, target, cfg.enforce);

        // ── Infiltration ─────────────────────────────────────────────────
        let mc = &mut conservation[z];
        mc.in_flow = in_flow;
        mc.exhaust_flow = exh_flow;
        mc.return_flow = ret_flow;
        mc.mixing_flow = mixing_in;
        mc.mixing_source_flow = mixing_out;
        mc.infiltration_flow = zones[z].infiltration_mass_flow;
        mc.includes_infiltration = false;

        let zone_applies = match cfg.infiltration_zones {
            InfiltrationZones::AllZones => true,
            InfiltrationZones::MixingSourceZonesOnly => mc.is_mixing_source,
        };
        if cfg.enforce && zone_applies {
            if let Some(id) = mc.infiltration {
                let residual = (ret_flow + exh_flow + mixing_out - in_flow - mixing_in).max(0.0);
                let inf = &mut infiltration[id.index()];
                match cfg.infiltration {
                    InfiltrationTreatment::None => {}
                    InfiltrationTreatment::Adjust => inf.mass_flow = residual,
                    InfiltrationTreatment::Add => inf.mass_flow = inf.design_flow + residual,
                }
                if cfg.infiltration != InfiltrationTreatment::None {
                    mc.infiltration_flow = inf.mass_flow;
                    mc.includes_infiltration = true;
                }
            }
        }

        // ── Air-loop accumulation ────────────────────────────────────────
        for (i, &node) in equip.return_nodes.iter().enumerate() {
            let l = equip.return_air_loops[i];
            if l.is_valid() {
                air_loops[l.index()].zone_ret_flow += nodes[node].mass_flow;
            }
        }

        // ── Imbalance check ──────────────────────────────────────────────
        if !cfg.enforce && !ctx.warmup && !ctx.first_hvac_iteration && !equip.flow_error {
            let zn = &zones[z];
            let incoming = zn.infiltration_mass_flow + zn.ventilation_mass_flow + mixing_in;
            let net_out = (exh_flow - equip.balanced_exhaust) + ret_flow - in_flow - incoming;
            if net_out > SMALL_MASS_FLOW {
                let air = &nodes[zn.air_node];
                let rho = ctx.psychro.density(*outdoor_baro_press, air.temp, air.hum_rat);
                let vol = net_out / rho;
                if vol > SMALL_AIR_VOL_FLOW {
                    log::warn!(
                        "zone `{}`: exhaust exceeds supply plus infiltration, ventilation and mixing by \
                         {net_out:.4} kg/s ({vol:.4} m³/s at zone density, {:.4} m³/s at standard \
                         density); the imbalance is not made up by any modelled airflow",
                        zn.name,
                        net_out / STD_RHO_AIR,
                    );
                    equip.flow_error = true;
                    outcome.newly_unbalanced.push(zone);
                }
            }
        }

        mixing_in
    }

    /// Take excess exhaust out of each air loop's zone returns and settle the
    /// loop's system return flow.
    fn apply_return_ratios(&self, model: &mut HvacModel, ctx: &BalanceContext<'_>) {
        let HvacModel { nodes, equip_configs, conservation, air_loops, .. } = model;

        for air_loop in air_loops.iter_mut() {
            let ret = air_loop.zone_ret_flow;
            let excess = air_loop.excess_zone_exh_flow;
            air_loop.zone_ret_flow_ratio = if ret > 0.0 { (ret - excess).max(0.0) / ret } else { 1.0 };

            if excess > ret + SMALL_MASS_FLOW && !ctx.warmup && !ctx.first_hvac_iteration && !air_loop.flow_error {
                log::warn!(
                    "air loop `{}`: excess zone exhaust {excess:.4} kg/s exceeds zone return flow {ret:.4} kg/s",
                    air_loop.name,
                );
                air_loop.flow_error = true;
            }
        }

        for (equip, mc) in equip_configs.iter().zip(conservation.iter_mut()) {
            let mut changed = false;
            for (i, &node) in equip.return_nodes.iter().enumerate() {
                let l = equip.return_air_loops[i];
                if !l.is_valid() {
                    continue;
                }
                let ratio = air_loops[l.index()].zone_ret_flow_ratio;
                if ratio != 1.0 {
                    let node = &mut nodes[node];
                    node.mass_flow *= ratio;
                    node.mass_flow_max_avail = node.mass_flow;
                    changed = true;
                }
            }
            if changed {
                mc.return_flow = nodes.total_mass_flow(&equip.return_nodes);
            }
        }

        for air_loop in air_loops.iter_mut() {
            air_loop.zone_ret_flow *= air_loop.zone_ret_flow_ratio;
            air_loop.sys_ret_flow = air_loop.zone_ret_flow - air_loop.recirc_flow + air_loop.leak_flow;
        }
    }

    fn refresh_order(&mut self, model: &HvacModel) {
        if self.zone_order.len() == model.zone_count() {
            return;
        }
        let receivers = model.zone_ids().filter(|z| model.conservation[z.index()].is_mixing_receiver);
        let others = model.zone_ids().filter(|z| !model.conservation[z.index()].is_mixing_receiver);
        self.zone_order = receivers.chain(others).collect();
    }
}

fn check_finite(model: &HvacModel) -> AirflowResult<()> {
    for equip in &model.equip_configs {
        for &node in equip.inlet_nodes.iter().chain(&equip.exhaust_nodes) {
            let flow = model.nodes[node].mass_flow;
            if !flow.is_finite() {
                return Err(AirflowError::NonFiniteFlow { node, flow });
            }
        }
    }
    Ok(())
}
