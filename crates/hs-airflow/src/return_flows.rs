//! Return-node flows for one zone.
//!
//! # Per-node rule
//!
//! | Case                                             | Flow                                              |
//! |--------------------------------------------------|---------------------------------------------------|
//! | air loop without outdoor air, matching inlet     | matching inlet flow (*fixed*)                     |
//! | single node, no basis nodes                      | `target × schedule fraction × design return frac` |
//! | basis nodes                                      | `Σ basis flow × schedule fraction`, shared        |
//! | several nodes, no basis nodes                    | `inlet flow × design return frac × schedule frac` |
//!
//! Afterwards the non-fixed nodes are rescaled: with enforcement so the zone
//! total equals the target exactly, without it only when the total exceeds
//! the (schedule-adjusted) target, by `1 − excess / Σ non-fixed`.

use hs_model::{AirLoopFlow, NodeStore, ZoneEquipConfig};

/// Set the zone's return-node flows and return their sum [kg/s].
///
/// `target` is the standard return flow for the zone, already clamped at
/// zero.  Updates `cfg.fixed_return_flow` and writes `mass_flow` (and
/// `mass_flow_max_avail`) on every return node.
pub fn calc_zone_return_flows(
    cfg:       &mut ZoneEquipConfig,
    nodes:     &mut NodeStore,
    air_loops: &[AirLoopFlow],
    target:    f64,
    enforce:   bool,
) -> f64 {
    let n = cfg.return_nodes.len();
    if n == 0 {
        return 0.0;
    }
    cfg.fixed_return_flow.clear();
    cfg.fixed_return_flow.resize(n, false);

    let frac = cfg.return_flow_fraction;
    let has_basis = !cfg.return_basis_nodes.is_empty();
    let mut flows = vec![0.0; n];
    let mut inlet_flows = vec![0.0; n];

    for i in 0..n {
        let air_loop = cfg.return_air_loops[i];
        let air_loop = air_loop.is_valid().then(|| &air_loops[air_loop.index()]);
        let inlet = cfg.return_inlet[i].map(|k| nodes[cfg.inlet_nodes[k]].mass_flow);
        inlet_flows[i] = inlet.unwrap_or(0.0);
        let des = air_loop.map_or(1.0, |l| l.des_return_frac);

        match (air_loop, inlet) {
            (Some(l), Some(inlet)) if l.has_fixed_returns() => {
                flows[i] = inlet;
                cfg.fixed_return_flow[i] = true;
            }
            _ if has_basis => {}
            _ if n == 1 => flows[i] = target * frac * des,
            (_, inlet) => flows[i] = inlet.unwrap_or(0.0) * des * frac,
        }
    }

    if has_basis {
        let basis = nodes.total_mass_flow(&cfg.return_basis_nodes) * frac;
        share(&mut flows, &cfg.fixed_return_flow, &inlet_flows, basis);
    }

    let fixed_total: f64 = (0..n).filter(|&i| cfg.fixed_return_flow[i]).map(|i| flows[i]).sum();
    let var_total: f64 = (0..n).filter(|&i| !cfg.fixed_return_flow[i]).map(|i| flows[i]).sum();

    if enforce {
        let needed = (target - fixed_total).max(0.0);
        let weights = flows.clone();
        share(&mut flows, &cfg.fixed_return_flow, &weights, needed);
    } else if var_total > 0.0 {
        let excess = fixed_total + var_total - target * frac;
        if excess > 0.0 {
            let ratio = (1.0 - excess / var_total).max(0.0);
            for i in (0..n).filter(|&i| !cfg.fixed_return_flow[i]) {
                flows[i] *= ratio;
            }
        }
    }

    for (i, &node) in cfg.return_nodes.iter().enumerate() {
        let node = &mut nodes[node];
        node.mass_flow = flows[i];
        node.mass_flow_max_avail = flows[i];
    }
    flows.iter().sum()
}

/// Spread `total` over the non-fixed entries of `flows` in proportion to
/// `weights`, equally when the weights sum to zero.
fn share(flows: &mut [f64], fixed: &[bool], weights: &[f64], total: f64) {
    let free: Vec<usize> = (0..flows.len()).filter(|&i| !fixed[i]).collect();
    if free.is_empty() {
        return;
    }
    let weight: f64 = free.iter().map(|&i| weights[i]).sum();
    for &i in &free {
        flows[i] = if weight > 0.0 { total * weights[i] / weight } else { total / free.len() as f64 };
    }
}
