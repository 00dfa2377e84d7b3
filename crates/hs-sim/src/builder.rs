//! Fluent builder for constructing an [`HvacSim`].

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use hs_airflow::MassBalanceEngine;
use hs_core::{IdealGasPsychrometrics, Psychrometrics, ZoneId};
use hs_equipment::ZoneEquipment;
use hs_model::HvacModel;

use crate::{
    ConvergenceSolver, HvacConfig, HvacSim, HvacSystems, OverrideHook, SimError, SimResult,
    SolverContext, TimestepController, ZoneAirModel, ZoneEquipmentManager,
};

/// Fluent builder for [`HvacSim<S, Z>`].
///
/// # Required inputs
///
/// - [`HvacConfig`] — solver limits, timestep, mass balance, diagnostics
/// - [`HvacModel`] — from [`hs_model::HvacModelBuilder`]
/// - `S: HvacSystems` — air loops, non-zone equipment, plant, electric
/// - `Z: ZoneAirModel` — the zone heat balance
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                               |
/// |------------------------|---------------------------------------|
/// | `.equipment(zone, m)`  | no zone equipment models              |
/// | `.hook(h)`             | no override hooks                     |
/// | `.psychrometrics(p)`   | [`IdealGasPsychrometrics`]            |
/// | `.stop_signal(flag)`   | a fresh flag owned by the sim         |
///
/// Equipment models are registered per zone in equipment-list order; the
/// count and names must match each zone's list.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(HvacConfig::default(), model, NoSystems, zone_air)
///     .equipment(office, Box::new(IdealLoads::new("Office Ideal Loads", supply, 0.5, 5e3, 5e3)))
///     .build()?;
/// sim.run_zone_steps(96, &mut NoopObserver)?;
/// ```
pub struct SimBuilder<S: HvacSystems, Z: ZoneAirModel> {
    config:    HvacConfig,
    model:     HvacModel,
    systems:   S,
    zone_air:  Z,
    equipment: Vec<(ZoneId, Box<dyn ZoneEquipment>)>,
    hooks:     Vec<Box<dyn OverrideHook>>,
    psychro:   Option<Box<dyn Psychrometrics>>,
    stop:      Option<Arc<AtomicBool>>,
}

impl<S: HvacSystems, Z: ZoneAirModel> SimBuilder<S, Z> {
    pub fn new(config: HvacConfig, model: HvacModel, systems: S, zone_air: Z) -> Self {
        Self {
            config,
            model,
            systems,
            zone_air,
            equipment: Vec::new(),
            hooks:     Vec::new(),
            psychro:   None,
            stop:      None,
        }
    }

    /// Register the model for the next entry of `zone`'s equipment list.
    pub fn equipment(mut self, zone: ZoneId, model: Box<dyn ZoneEquipment>) -> Self {
        self.equipment.push((zone, model));
        self
    }

    pub fn hook(mut self, hook: Box<dyn OverrideHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn psychrometrics(mut self, psychro: Box<dyn Psychrometrics>) -> Self {
        self.psychro = Some(psychro);
        self
    }

    /// Share an externally owned stop flag.
    pub fn stop_signal(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Validate the configuration and the equipment registration, and return
    /// a ready-to-run [`HvacSim`].
    pub fn build(self) -> SimResult<HvacSim<S, Z>> {
        self.config.validate()?;

        // ── Group equipment models by zone ────────────────────────────────
        let zone_count = self.model.zone_count();
        let mut per_zone: Vec<Vec<Box<dyn ZoneEquipment>>> =
            (0..zone_count).map(|_| Vec::new()).collect();
        for (zone, equipment) in self.equipment {
            let Some(slot) = per_zone.get_mut(zone.index()) else {
                return Err(SimError::Config(format!(
                    "equipment `{}` registered for unknown zone {zone}",
                    equipment.name()
                )));
            };
            slot.push(equipment);
        }

        // ── Check them against the equipment lists ────────────────────────
        for (zone, models) in self.model.zone_ids().zip(&per_zone) {
            let list = &self.model.equip_config(zone).equipment;
            if list.len() != models.len() {
                return Err(SimError::EquipmentCountMismatch {
                    zone,
                    expected: list.len(),
                    got:      models.len(),
                });
            }
            for (entry, model) in list.entries.iter().zip(models) {
                if entry.name != model.name() {
                    return Err(SimError::EquipmentNameMismatch {
                        zone,
                        expected: entry.name.clone(),
                        got:      model.name().to_owned(),
                    });
                }
            }
        }

        let mass_balance = MassBalanceEngine::new(self.config.mass_balance)?;
        let mut context = SolverContext::new();
        if let Some(stop) = self.stop {
            context = context.with_stop_signal(stop);
        }

        Ok(HvacSim {
            solver:         ConvergenceSolver::new(
                self.config.solver.clone(),
                self.config.diagnostics.clone(),
            ),
            controller:     TimestepController::new(self.config.timestep.clone()),
            config:         self.config,
            model:          self.model,
            systems:        self.systems,
            zone_air:       self.zone_air,
            zone_equipment: ZoneEquipmentManager::new(per_zone),
            mass_balance,
            hooks:          self.hooks,
            context,
            psychro:        self.psychro.unwrap_or_else(|| Box::new(IdealGasPsychrometrics)),
        })
    }
}
