//! Return-node leaving conditions.
//!
//! Air leaving a zone through a return node is zone air, warmed (or cooled)
//! by whatever the return path picks up on the way:
//!
//! ```text
//! T_ret = blend(zone air, airflow-window gap air) + Q_ret / (m · cp)
//! W_ret = W_zone + latent / (h_fg · m)
//! ```
//!
//! Heat that cannot be carried by the return air (no return flow, window gap
//! flow in excess of the return flow, or a temperature outside
//! [`MIN_RETURN_TEMP`, `MAX_RETURN_TEMP`]) is spilled into the zone as
//! `sys_dep_zone_load_w`; latent gains with no return flow go to
//! `latent_gain_except_people_w`.

use hs_core::Psychrometrics;
use hs_model::HvacModel;

/// Lowest return-air temperature accepted [°C].
pub const MIN_RETURN_TEMP: f64 = -30.0;

/// Highest return-air temperature accepted [°C].
pub const MAX_RETURN_TEMP: f64 = 60.0;

/// Write temperature, humidity ratio, enthalpy and pressure on every return
/// node of every controlled zone.
pub fn update_leaving_conditions(model: &mut HvacModel, psychro: &dyn Psychrometrics) {
    let HvacModel { nodes, zones, equip_configs, .. } = model;

    for (zone, equip) in zones.iter_mut().zip(equip_configs.iter()) {
        zone.clear_spill_loads();
        if !equip.is_controlled {
            continue;
        }
        let air = &nodes[zone.air_node];
        let (t_zone, w_zone, p_zone) = (air.temp, air.hum_rat, air.press);
        let cp = psychro.specific_heat(w_zone);
        let mult = zone.total_multiplier();

        let (win_flow, win_heat) = zone
            .airflow_windows
            .iter()
            .fold((0.0, 0.0), |(m, mt), w| (m + w.mass_flow, mt + w.mass_flow * w.outlet_temp));
        let win_temp = if win_flow > 0.0 { win_heat / win_flow } else { t_zone };

        for (i, &ret_node) in equip.return_nodes.iter().enumerate() {
            let (q_ret, latent_w) = zone.return_gains_for(ret_node);
            let m = nodes[ret_node].mass_flow / mult;
            // Window gap air only reaches the first return node.
            let gap_flow = if i == 0 { win_flow } else { 0.0 };

            let mut t_ret = t_zone;
            if !zone.no_heat_to_return_air && m > 0.0 {
                if gap_flow > 0.0 {
                    if m >= gap_flow {
                        t_ret = (gap_flow * win_temp + (m - gap_flow) * t_zone) / m;
                    } else {
                        t_ret = win_temp;
                        zone.sys_dep_zone_load_w += (gap_flow - m) * cp * (win_temp - t_zone);
                    }
                }
                t_ret += q_ret / (m * cp);
                if t_ret > MAX_RETURN_TEMP {
                    zone.sys_dep_zone_load_w += cp * m * (t_ret - MAX_RETURN_TEMP);
                    t_ret = MAX_RETURN_TEMP;
                } else if t_ret < MIN_RETURN_TEMP {
                    zone.sys_dep_zone_load_w += cp * m * (t_ret - MIN_RETURN_TEMP);
                    t_ret = MIN_RETURN_TEMP;
                }
            } else {
                if gap_flow > 0.0 {
                    zone.sys_dep_zone_load_w += gap_flow * cp * (win_temp - t_zone);
                }
                zone.sys_dep_zone_load_w += q_ret;
            }

            let w_ret = if m > 0.0 {
                let h_fg = psychro.vapor_enthalpy(w_zone, t_ret);
                w_zone + latent_w / (h_fg * m)
            } else {
                zone.latent_gain_except_people_w += latent_w;
                w_zone
            };

            let node = &mut nodes[ret_node];
            node.temp = t_ret;
            node.hum_rat = w_ret;
            node.enthalpy = psychro.enthalpy(t_ret, w_ret);
            node.press = p_zone;
        }
    }
}
