//! Lumped-capacitance zone air model.
//!
//! Each zone is one thermal mass exchanging heat with the outdoors through a
//! UA value, receiving internal gains and the supply air of its equipment:
//!
//! ```text
//! C · dT/dt = UA · (T_out − T) + gains + Σ m · cp · (T_supply − T)
//! ```

use hs_core::{IdealGasPsychrometrics, Psychrometrics, SubStep};
use hs_model::HvacModel;
use hs_sim::ZoneAirModel;

/// Thermal properties of one zone.
#[derive(Debug, Clone, Copy)]
pub struct ZoneMass {
    /// Air and furnishing capacitance [J/K].
    pub capacitance: f64,
    /// Envelope conductance [W/K].
    pub ua:          f64,
    /// Internal gains while occupied [W].
    pub gains:       f64,
    pub heat_sp:     f64,
    pub cool_sp:     f64,
}

pub struct LumpedZones {
    zones:       Vec<ZoneMass>,
    temps:       Vec<f64>,
    saved_temps: Vec<f64>,
    /// Zone steps completed, for the outdoor temperature profile.
    steps:       u64,
    saved_steps: u64,
    psychro:     IdealGasPsychrometrics,
}

impl LumpedZones {
    pub fn new(zones: Vec<ZoneMass>, initial_temp: f64) -> Self {
        let n = zones.len();
        Self {
            zones,
            temps: vec![initial_temp; n],
            saved_temps: vec![initial_temp; n],
            steps: 0,
            saved_steps: 0,
            psychro: IdealGasPsychrometrics,
        }
    }

    pub fn temps(&self) -> &[f64] {
        &self.temps
    }

    /// Winter design day: 2 °C at 05:00, 10 °C at 17:00 (15-minute steps).
    pub fn outdoor_temp(&self) -> f64 {
        let hour = (self.steps % 96) as f64 / 4.0;
        6.0 - 4.0 * ((hour - 5.0) * std::f64::consts::PI / 12.0).cos()
    }

    fn occupied(&self) -> bool {
        let hour = (self.steps % 96) / 4;
        (8..18).contains(&hour)
    }

    /// Heat the zone needs [W] to sit at `sp` at the end of a step of `dt`.
    fn load_to(&self, z: usize, sp: f64, dt: f64, gains: f64) -> f64 {
        let m = &self.zones[z];
        let t = self.temps[z];
        m.capacitance * (sp - t) / dt - m.ua * (self.outdoor_temp() - t) - gains
    }
}

impl ZoneAirModel for LumpedZones {
    fn predict(&mut self, model: &mut HvacModel, step: &SubStep) {
        if step.index == 0 {
            self.saved_temps.clone_from(&self.temps);
            self.saved_steps = self.steps;
        }
        let dt = step.duration_secs;
        for (z, demand) in model.demands.iter_mut().enumerate() {
            let gains = if self.occupied() { self.zones[z].gains } else { 0.0 };
            let to_heat = self.load_to(z, self.zones[z].heat_sp, dt, gains);
            let to_cool = self.load_to(z, self.zones[z].cool_sp, dt, gains);
            let e = &mut demand.energy;
            e.to_lower_sp = to_heat;
            e.to_upper_sp = to_cool;
            e.total = if to_heat > 0.0 {
                to_heat
            } else if to_cool < 0.0 {
                to_cool
            } else {
                0.0
            };
        }
    }

    fn correct(&mut self, model: &mut HvacModel, step: &SubStep) -> f64 {
        let dt = step.duration_secs;
        let t_out = self.outdoor_temp();
        let occupied = self.occupied();
        let mut largest = 0.0_f64;

        for (z, cfg) in model.equip_configs.iter().enumerate() {
            let air_node = model.zones[z].air_node;
            let t = self.temps[z];
            let w = model.nodes[air_node].hum_rat;
            let cp = self.psychro.specific_heat(w);
            let q_sys: f64 = cfg
                .inlet_nodes
                .iter()
                .map(|&n| {
                    let node = &model.nodes[n];
                    node.mass_flow * cp * (node.temp - t)
                })
                .sum();

            let m = &self.zones[z];
            let gains = if occupied { m.gains } else { 0.0 };
            let q_spill = model.zones[z].sys_dep_zone_load_w;
            let t_new = t + dt / m.capacitance * (m.ua * (t_out - t) + gains + q_sys + q_spill);
            largest = largest.max((t_new - t).abs());
            self.temps[z] = t_new;
            model.nodes[air_node].temp = t_new;
        }
        if step.is_last() {
            self.steps += 1;
        }
        largest
    }

    fn revert(&mut self, model: &mut HvacModel) {
        self.temps.clone_from(&self.saved_temps);
        self.steps = self.saved_steps;
        for (zone, &t) in model.zones.iter().zip(&self.temps) {
            model.nodes[zone.air_node].temp = t;
        }
    }
}
