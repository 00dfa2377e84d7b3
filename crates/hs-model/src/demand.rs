//! Zone load demand records.
//!
//! Energy [W] and moisture [kg/s] demands share one shape.  For energy the
//! *lower* setpoint is the heating setpoint and the *upper* one the cooling
//! setpoint; for moisture they are the humidifying and dehumidifying
//! setpoints.  Positive values mean the zone needs heat (or moisture) added.

/// One demand channel (sensible or latent) of a zone.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DemandRecord {
    /// Output required to reach the active setpoint (from the predictor).
    pub total:                 f64,
    /// Output required to reach the lower setpoint.
    pub to_lower_sp:           f64,
    /// Output required to reach the upper setpoint.
    pub to_upper_sp:           f64,

    /// What the equipment about to run is asked to meet.
    pub remaining:             f64,
    pub remaining_to_lower_sp: f64,
    pub remaining_to_upper_sp: f64,

    /// Running subtraction of delivered output, independent of the scheme.
    pub unadj_remaining:       f64,
    pub unadj_to_lower_sp:     f64,
    pub unadj_to_upper_sp:     f64,

    /// Target per sim-order slot.
    pub sequenced:             Vec<f64>,
    pub sequenced_to_lower_sp: Vec<f64>,
    pub sequenced_to_upper_sp: Vec<f64>,
}

impl DemandRecord {
    /// Re-initialise from predictor output, sizing the per-slot arrays to
    /// `slots` and filling them with the full demand.
    pub fn reset(&mut self, total: f64, to_lower_sp: f64, to_upper_sp: f64, slots: usize) {
        self.total = total;
        self.to_lower_sp = to_lower_sp;
        self.to_upper_sp = to_upper_sp;

        self.remaining = total;
        self.remaining_to_lower_sp = to_lower_sp;
        self.remaining_to_upper_sp = to_upper_sp;

        self.unadj_remaining = total;
        self.unadj_to_lower_sp = to_lower_sp;
        self.unadj_to_upper_sp = to_upper_sp;

        for v in [&mut self.sequenced, &mut self.sequenced_to_lower_sp, &mut self.sequenced_to_upper_sp] {
            v.clear();
        }
        self.sequenced.resize(slots, total);
        self.sequenced_to_lower_sp.resize(slots, to_lower_sp);
        self.sequenced_to_upper_sp.resize(slots, to_upper_sp);
    }

    /// Copy slot `slot`'s targets into the `remaining*` fields.
    pub fn load_slot(&mut self, slot: usize) {
        if slot < self.sequenced.len() {
            self.remaining = self.sequenced[slot];
            self.remaining_to_lower_sp = self.sequenced_to_lower_sp[slot];
            self.remaining_to_upper_sp = self.sequenced_to_upper_sp[slot];
        }
    }

    /// Copy the unadjusted running remainder into the `remaining*` fields.
    pub fn load_unadjusted(&mut self) {
        self.remaining = self.unadj_remaining;
        self.remaining_to_lower_sp = self.unadj_to_lower_sp;
        self.remaining_to_upper_sp = self.unadj_to_upper_sp;
    }

    /// Subtract `delivered` from the unadjusted remainder.
    pub fn subtract_unadjusted(&mut self, delivered: f64) {
        self.unadj_remaining -= delivered;
        self.unadj_to_lower_sp -= delivered;
        self.unadj_to_upper_sp -= delivered;
    }

    /// Subtract `delivered` from the remaining fields directly.
    pub fn subtract_remaining(&mut self, delivered: f64) {
        self.remaining -= delivered;
        self.remaining_to_lower_sp -= delivered;
        self.remaining_to_upper_sp -= delivered;
    }
}

/// Sensible and latent demand of one zone for the current sub-step.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneDemand {
    /// Sensible demand [W].
    pub energy:               DemandRecord,
    /// Latent demand [kg/s].
    pub moisture:             DemandRecord,
    /// Zone temperature is in the thermostat deadband or in setback.
    pub dead_band_or_setback: bool,
}
