//! office — two-zone winter design day for the HVAC coordination core.
//!
//! An open office served by one ideal unit and a conference room served by
//! two units sharing the load uniformly.  A lumped-capacitance zone model
//! drives the predictor/corrector; a central plant tallies the heat the
//! zone units draw.  Output goes to `output/office/`.

mod zone_air;

use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use hs_core::{IdealGasPsychrometrics, Psychrometrics};
use hs_equipment::{IdealLoads, Intent};
use hs_model::{
    EquipmentList, EquipmentListEntry, HvacModel, HvacModelBuilder, LoadDistScheme, ZoneSpec,
};
use hs_output::{CsvWriter, HvacOutputObserver};
use hs_sim::{HvacConfig, HvacSystems, SimBuilder, SystemContext};

use zone_air::{LumpedZones, ZoneMass};

// ── Constants ─────────────────────────────────────────────────────────────────

const ZONE_STEP_SECS: f64 = 900.0; // 15-minute zone steps
const SIM_DAYS:       u64 = 2;
const INITIAL_TEMP:   f64 = 16.0;

// ── Central plant ─────────────────────────────────────────────────────────────

/// Sums the heating and cooling the zone units draw from a central plant.
#[derive(Default)]
struct CentralPlant {
    heating_j:  f64,
    cooling_j:  f64,
    plant_runs: u64,
}

impl CentralPlant {
    fn zone_supply_w(model: &HvacModel) -> (f64, f64) {
        let psychro = IdealGasPsychrometrics;
        let mut heating = 0.0;
        let mut cooling = 0.0;
        for (zone, cfg) in model.zones.iter().zip(&model.equip_configs) {
            let t_zone = model.nodes[zone.air_node].temp;
            for &n in &cfg.inlet_nodes {
                let node = &model.nodes[n];
                let q = node.mass_flow * psychro.specific_heat(node.hum_rat) * (node.temp - t_zone);
                if q > 0.0 {
                    heating += q;
                } else {
                    cooling -= q;
                }
            }
        }
        (heating, cooling)
    }
}

impl HvacSystems for CentralPlant {
    fn simulate_air_loops(&mut self, _model: &mut HvacModel, _ctx: &SystemContext) -> Vec<Intent> {
        Vec::new()
    }

    fn simulate_plant_loops(&mut self, model: &mut HvacModel, ctx: &SystemContext) -> Vec<Intent> {
        self.plant_runs += 1;
        // The last plant call of a sub-step sets the sub-step's energy.
        let (heating, cooling) = Self::zone_supply_w(model);
        self.heating_j = heating * ctx.sys_step_secs;
        self.cooling_j = cooling * ctx.sys_step_secs;
        Vec::new()
    }
}

// ── Model ─────────────────────────────────────────────────────────────────────

fn build() -> Result<hs_sim::HvacSim<CentralPlant, LumpedZones>> {
    let mut b = HvacModelBuilder::new();

    let office = b.add_zone(ZoneSpec::new("Open Office"));
    let office_supply = b.add_node("Open Office Supply");
    let office_return = b.add_node("Open Office Return");
    b.add_inlet(office, office_supply, None);
    b.add_return(office, office_return, None);
    b.equipment_list(
        office,
        EquipmentList::new("Open Office Equipment", LoadDistScheme::Sequential)
            .with_entry(EquipmentListEntry::new("IdealLoads", "Open Office Unit", 1, 1)),
    );

    let conf = b.add_zone(ZoneSpec::new("Conference"));
    let conf_a = b.add_node("Conference Supply A");
    let conf_b = b.add_node("Conference Supply B");
    let conf_return = b.add_node("Conference Return");
    b.add_inlet(conf, conf_a, None);
    b.add_inlet(conf, conf_b, None);
    b.add_return(conf, conf_return, None);
    b.equipment_list(
        conf,
        EquipmentList::new("Conference Equipment", LoadDistScheme::Uniform)
            .with_entry(EquipmentListEntry::new("IdealLoads", "Conference Unit A", 1, 1))
            .with_entry(EquipmentListEntry::new("IdealLoads", "Conference Unit B", 2, 2)),
    );

    let model = b.build()?;

    let zone_air = LumpedZones::new(
        vec![
            ZoneMass { capacitance: 4.0e6, ua: 250.0, gains: 3_000.0, heat_sp: 21.0, cool_sp: 24.0 },
            ZoneMass { capacitance: 1.2e6, ua: 90.0, gains: 2_500.0, heat_sp: 21.0, cool_sp: 24.0 },
        ],
        INITIAL_TEMP,
    );

    let mut config = HvacConfig::default();
    config.timestep.zone_step_secs = ZONE_STEP_SECS;

    let sim = SimBuilder::new(config, model, CentralPlant::default(), zone_air)
        .equipment(office, Box::new(IdealLoads::new("Open Office Unit", office_supply, 0.8, 12_000.0, 8_000.0)))
        .equipment(conf, Box::new(IdealLoads::new("Conference Unit A", conf_a, 0.3, 3_000.0, 3_000.0)))
        .equipment(conf, Box::new(IdealLoads::new("Conference Unit B", conf_b, 0.3, 3_000.0, 3_000.0)))
        .build()?;
    Ok(sim)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== office — HVAC coordination core ===");
    println!("Zones: 2  |  Days: {SIM_DAYS}  |  Zone step: {ZONE_STEP_SECS} s");
    println!();

    let mut sim = build()?;

    std::fs::create_dir_all("output/office")?;
    let mut obs = HvacOutputObserver::new(CsvWriter::new(Path::new("output/office"))?);

    let steps_per_day = (86_400.0 / ZONE_STEP_SECS) as u64;
    let t0 = Instant::now();

    // One warm-up day, then the reported run.
    sim.context.warmup = true;
    sim.context.kickoff = true;
    sim.run_zone_steps(1, &mut obs)?;
    sim.context.kickoff = false;
    sim.run_zone_steps(steps_per_day - 1, &mut obs)?;
    sim.context.warmup = false;
    sim.end_environment(&mut obs);

    let mut heating_kwh = 0.0;
    let mut cooling_kwh = 0.0;
    let mut split_steps = 0;
    let mut non_converged = 0;
    for _ in 0..SIM_DAYS * steps_per_day {
        let report = sim.run_zone_step(&mut obs)?;
        if report.sub_steps == 0 {
            break;
        }
        if report.sub_steps > 1 {
            split_steps += 1;
        }
        if !report.all_converged() {
            non_converged += 1;
        }
        heating_kwh += sim.systems.heating_j * report.sub_steps as f64 / 3.6e6;
        cooling_kwh += sim.systems.cooling_j * report.sub_steps as f64 / 3.6e6;
    }
    let summary = sim.end_environment(&mut obs);
    obs.finish()?;
    let elapsed = t0.elapsed();

    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  zone steps split into sub-steps : {split_steps}");
    println!("  zone steps not converged        : {non_converged}");
    println!("  non-converged solves (summary)  : {}", summary.non_converged_solves);
    println!("  plant calls                     : {}", sim.systems.plant_runs);
    println!("  approximate heating delivered   : {heating_kwh:.1} kWh");
    println!("  approximate cooling delivered   : {cooling_kwh:.1} kWh");
    println!();

    println!("{:<14} {:>10}", "Zone", "Final °C");
    println!("{}", "-".repeat(25));
    for (zone, t) in sim.model.zones.iter().zip(sim.zone_air.temps()) {
        println!("{:<14} {:>10.2}", zone.name, t);
    }

    Ok(())
}
