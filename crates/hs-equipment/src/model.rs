//! The `ZoneEquipment` trait — the extension point for physical models.

use hs_model::ZoneDemand;

use crate::{EquipContext, EquipmentResult, Intent};

/// Availability-manager verdict for one piece of equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AvailabilityStatus {
    /// No manager opinion; the equipment follows its own schedule.
    #[default]
    NoAction,
    /// The equipment must not run this sub-step.
    ForceOff,
    /// The equipment must run (night cycle).
    CycleOn,
}

/// The share of the zone demand assigned to one piece of equipment.
///
/// Snapshot of the zone's `remaining*` fields taken right before the call,
/// so a model cannot observe other equipment's targets.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EquipmentDemand {
    /// Sensible output to deliver [W] (positive = heating).
    pub output_required:      f64,
    pub output_to_heat_sp:    f64,
    pub output_to_cool_sp:    f64,
    /// Moisture to deliver [kg/s] (positive = humidify).
    pub moisture_required:    f64,
    pub moisture_to_hum_sp:   f64,
    pub moisture_to_dehum_sp: f64,
    pub dead_band_or_setback: bool,
}

impl EquipmentDemand {
    pub fn from_zone(demand: &ZoneDemand) -> Self {
        Self {
            output_required:      demand.energy.remaining,
            output_to_heat_sp:    demand.energy.remaining_to_lower_sp,
            output_to_cool_sp:    demand.energy.remaining_to_upper_sp,
            moisture_required:    demand.moisture.remaining,
            moisture_to_hum_sp:   demand.moisture.remaining_to_lower_sp,
            moisture_to_dehum_sp: demand.moisture.remaining_to_upper_sp,
            dead_band_or_setback: demand.dead_band_or_setback,
        }
    }
}

/// What one equipment call delivered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EquipmentOutput {
    /// Sensible output delivered to the zone [W].
    pub sensible_w:  f64,
    /// Moisture delivered to the zone [kg/s].
    pub latent_kg_s: f64,
    /// Subsystems that must re-run because of this call.
    pub intents:     Vec<Intent>,
}

impl EquipmentOutput {
    pub fn new(sensible_w: f64, latent_kg_s: f64) -> Self {
        Self { sensible_w, latent_kg_s, intents: Vec::new() }
    }

    pub fn with_intent(mut self, intent: Intent) -> Self {
        self.intents.push(intent);
        self
    }
}

/// Pluggable zone equipment.
///
/// # Required methods
///
/// [`name`][Self::name], [`kind`][Self::kind] and
/// [`simulate`][Self::simulate].  `init` and `availability` default to
/// "nothing to do" and `NoAction`.
///
/// # Call protocol
///
/// `init` is called once, lazily, right before the first `simulate`.  After
/// that `simulate` runs once per zone-equipment pass whenever the equipment
/// holds a sim-order slot, unless availability is `ForceOff`.
///
/// # Example
///
/// ```rust,ignore
/// struct Baseboard { cap: f64 }
///
/// impl ZoneEquipment for Baseboard {
///     fn name(&self) -> &str { "BB-1" }
///     fn kind(&self) -> &str { "Baseboard" }
///     fn simulate(&mut self, d: &EquipmentDemand, _ctx: &mut EquipContext<'_>) -> EquipmentOutput {
///         EquipmentOutput::new(d.output_required.clamp(0.0, self.cap), 0.0)
///     }
/// }
/// ```
pub trait ZoneEquipment: 'static {
    fn name(&self) -> &str;

    /// Type label used in messages.
    fn kind(&self) -> &str;

    /// Current availability-manager verdict.
    ///
    /// Default: [`AvailabilityStatus::NoAction`].
    fn availability(&self) -> AvailabilityStatus {
        AvailabilityStatus::NoAction
    }

    /// One-time input processing and sizing.
    ///
    /// Default: nothing to do.
    fn init(&mut self, _ctx: &mut EquipContext<'_>) -> EquipmentResult<()> {
        Ok(())
    }

    /// Run the model against `demand` for the current sub-step.
    fn simulate(&mut self, demand: &EquipmentDemand, ctx: &mut EquipContext<'_>) -> EquipmentOutput;
}
