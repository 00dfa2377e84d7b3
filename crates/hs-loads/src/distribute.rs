//! `LoadDistributor` — per-slot load targets for one zone.
//!
//! # Schemes
//!
//! | Scheme                 | Target for slot *i* (eligible entries only)                   |
//! |------------------------|---------------------------------------------------------------|
//! | `Sequential`           | `outstanding × fraction(i)`, refreshed as each slot runs      |
//! | `Uniform`              | `total / n_eligible`                                          |
//! | `UniformPlr`           | `capacity(i) × total / Σ capacity`                            |
//! | `SequentialUniformPlr` | as `UniformPlr`, over the fewest entries whose capacity covers the load |
//!
//! An entry is eligible when its priority for the active mode is non-zero;
//! ineligible entries always get zero.  The active mode is heating when the
//! sensible total is non-negative.
//!
//! On the first HVAC iteration the two PLR schemes hand every eligible
//! entry the full load instead, and [`LoadDistributor::update`] records what
//! each one delivered as its capacity for the later passes.
//!
//! # Advancing `remaining`
//!
//! ```text
//! Sequential     remaining(i+1) = unadj_remaining × fraction(i+1)
//! other schemes  remaining(i+1) = sequenced[i+1]
//! last slot      remaining      = unadj_remaining
//! ```
//!
//! `unadj_remaining` is the total minus everything delivered so far, so a
//! sequential slot only sees what the units before it left over.  Zones run
//! without a sim order (`slot = None`) use the plain running subtraction.

use hs_model::{EquipmentList, LoadDistScheme, ThermostatType, ZoneDemand};

use crate::{LoadError, LoadResult, SimOrder, dead_band_or_setback};

/// `(total, to_lower_sp, to_upper_sp)` for one slot.
type SlotTargets = (f64, f64, f64);

const ZERO: SlotTargets = (0.0, 0.0, 0.0);

/// Borrowed view of one zone's list, order and demand for a distribution
/// cycle.
pub struct LoadDistributor<'a> {
    list:            &'a mut EquipmentList,
    order:           &'a SimOrder,
    demand:          &'a mut ZoneDemand,
    thermostat:      ThermostatType,
    first_iteration: bool,
}

impl<'a> LoadDistributor<'a> {
    pub fn new(
        list:            &'a mut EquipmentList,
        order:           &'a SimOrder,
        demand:          &'a mut ZoneDemand,
        thermostat:      ThermostatType,
        first_iteration: bool,
    ) -> Self {
        Self { list, order, demand, thermostat, first_iteration }
    }

    /// The zone demand as currently distributed.
    #[inline]
    pub fn demand(&self) -> &ZoneDemand {
        self.demand
    }

    /// Reset `remaining*`, `unadj_*` and the slot arrays from the predicted
    /// totals already stored in the demand record.
    pub fn init(&mut self) {
        let slots = self.order.len();
        let e = &mut self.demand.energy;
        e.reset(e.total, e.to_lower_sp, e.to_upper_sp, slots);
        let m = &mut self.demand.moisture;
        m.reset(m.total, m.to_lower_sp, m.to_upper_sp, slots);
        self.refresh_dead_band();
    }

    /// Fill the per-slot targets for the list's scheme and load slot 0.
    pub fn distribute(&mut self) -> LoadResult<()> {
        let n = self.order.len();
        for found in [self.demand.energy.sequenced.len(), self.demand.moisture.sequenced.len()] {
            if found != n {
                return Err(LoadError::SlotCountMismatch { expected: n, found });
            }
        }
        if n == 0 {
            self.refresh_dead_band();
            return Ok(());
        }

        let heating = self.demand.energy.total >= 0.0;
        match self.list.scheme {
            LoadDistScheme::Sequential => self.split_sequential(heating),
            LoadDistScheme::Uniform => self.split_uniform(heating),
            _ if self.first_iteration => self.split_full(heating),
            LoadDistScheme::UniformPlr => self.split_plr(heating, false),
            LoadDistScheme::SequentialUniformPlr => self.split_plr(heating, true),
        }

        self.demand.energy.load_slot(0);
        self.demand.moisture.load_slot(0);
        self.refresh_dead_band();
        Ok(())
    }

    /// Account for `sensible` [W] and `latent` [kg/s] delivered by the
    /// equipment in `slot` and advance `remaining*`.
    ///
    /// `slot = None` is the uncontrolled path: the delivered output is simply
    /// subtracted from what remains.
    pub fn update(&mut self, slot: Option<usize>, sensible: f64, latent: f64) -> LoadResult<()> {
        let Some(slot) = slot else {
            self.demand.energy.subtract_remaining(sensible);
            self.demand.energy.subtract_unadjusted(sensible);
            self.demand.moisture.subtract_remaining(latent);
            self.demand.moisture.subtract_unadjusted(latent);
            self.refresh_dead_band();
            return Ok(());
        };

        let n = self.order.len();
        let pos = self
            .order
            .position(slot)
            .ok_or(LoadError::SlotOutOfRange { slot, len: n })?;

        self.demand.energy.subtract_unadjusted(sensible);
        self.demand.moisture.subtract_unadjusted(latent);

        let heating = self.demand.energy.total >= 0.0;
        if self.first_iteration && self.list.scheme.discovers_capacity() {
            let entry = &mut self.list.entries[pos];
            if heating {
                entry.heating_capacity = sensible;
            } else {
                entry.cooling_capacity = sensible;
            }
        }

        if slot + 1 < n {
            if self.list.scheme == LoadDistScheme::Sequential {
                let (e, m) = (self.energy_unadjusted(), self.moisture_unadjusted());
                self.set_sequential_slot(slot + 1, heating, e, m);
            }
            self.demand.energy.load_slot(slot + 1);
            self.demand.moisture.load_slot(slot + 1);
        } else {
            self.demand.energy.load_unadjusted();
            self.demand.moisture.load_unadjusted();
        }
        self.refresh_dead_band();
        Ok(())
    }

    // ── Schemes ───────────────────────────────────────────────────────────

    /// Slots after the first hold provisional targets until `update`
    /// rescales them from what is still outstanding.
    fn split_sequential(&mut self, heating: bool) {
        let (e, m) = (self.energy_totals(), self.moisture_totals());
        for slot in 0..self.order.len() {
            self.set_sequential_slot(slot, heating, e, m);
        }
    }

    /// `base × fraction` for one slot, zero when the entry sits out this mode.
    fn set_sequential_slot(&mut self, slot: usize, heating: bool, e: SlotTargets, m: SlotTargets) {
        let entry = &self.list.entries[self.order.positions()[slot]];
        if !entry.is_eligible(heating) {
            self.set_slot(slot, ZERO, ZERO);
            return;
        }
        let f = entry.sequential_fraction(heating);
        let fh = entry.sequential_fraction(true);
        let fc = entry.sequential_fraction(false);
        self.set_slot(slot, (e.0 * f, e.1 * fh, e.2 * fc), (m.0 * f, m.1 * fh, m.2 * fc));
    }

    fn split_full(&mut self, heating: bool) {
        let (e, m) = (self.energy_totals(), self.moisture_totals());
        for slot in 0..self.order.len() {
            if self.eligible(slot, heating) {
                self.set_slot(slot, e, m);
            } else {
                self.set_slot(slot, ZERO, ZERO);
            }
        }
    }

    fn split_uniform(&mut self, heating: bool) {
        let eligible: Vec<usize> =
            (0..self.order.len()).filter(|&s| self.eligible(s, heating)).collect();
        self.split_equally(&eligible);
    }

    /// Common part-load ratio over the eligible entries, or over the leading
    /// eligible entries whose capacity first covers the load when `cutoff`.
    fn split_plr(&mut self, heating: bool, cutoff: bool) {
        let total = self.demand.energy.total;
        let eligible: Vec<usize> =
            (0..self.order.len()).filter(|&s| self.eligible(s, heating)).collect();

        let mut running: Vec<usize> = Vec::with_capacity(eligible.len());
        let mut capacity = 0.0;
        for &slot in &eligible {
            running.push(slot);
            capacity += self.capacity(slot, heating);
            if cutoff && capacity.abs() >= total.abs() {
                break;
            }
        }

        if capacity == 0.0 {
            log::debug!(
                "equipment list `{}`: no recorded capacity, splitting load equally",
                self.list.name
            );
            self.split_equally(&eligible);
            return;
        }

        let plr = total / capacity;
        let (e, m) = (self.energy_totals(), self.moisture_totals());
        for slot in 0..self.order.len() {
            if !running.contains(&slot) {
                self.set_slot(slot, ZERO, ZERO);
                continue;
            }
            let share = self.capacity(slot, heating) / capacity;
            let target = e.0 * share;
            let moist = if total != 0.0 { target / total } else { plr };
            self.set_slot(
                slot,
                (target, e.1 * share, e.2 * share),
                (m.0 * moist, m.1 * moist, m.2 * moist),
            );
        }
    }

    fn split_equally(&mut self, eligible: &[usize]) {
        let (e, m) = (self.energy_totals(), self.moisture_totals());
        let k = if eligible.is_empty() { 0.0 } else { 1.0 / eligible.len() as f64 };
        for slot in 0..self.order.len() {
            if eligible.contains(&slot) {
                self.set_slot(slot, (e.0 * k, e.1 * k, e.2 * k), (m.0 * k, m.1 * k, m.2 * k));
            } else {
                self.set_slot(slot, ZERO, ZERO);
            }
        }
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn eligible(&self, slot: usize, heating: bool) -> bool {
        self.list.entries[self.order.positions()[slot]].is_eligible(heating)
    }

    fn capacity(&self, slot: usize, heating: bool) -> f64 {
        self.list.entries[self.order.positions()[slot]].capacity(heating)
    }

    fn energy_totals(&self) -> SlotTargets {
        let e = &self.demand.energy;
        (e.total, e.to_lower_sp, e.to_upper_sp)
    }

    fn moisture_totals(&self) -> SlotTargets {
        let m = &self.demand.moisture;
        (m.total, m.to_lower_sp, m.to_upper_sp)
    }

    fn energy_unadjusted(&self) -> SlotTargets {
        let e = &self.demand.energy;
        (e.unadj_remaining, e.unadj_to_lower_sp, e.unadj_to_upper_sp)
    }

    fn moisture_unadjusted(&self) -> SlotTargets {
        let m = &self.demand.moisture;
        (m.unadj_remaining, m.unadj_to_lower_sp, m.unadj_to_upper_sp)
    }

    fn set_slot(&mut self, slot: usize, e: SlotTargets, m: SlotTargets) {
        let energy = &mut self.demand.energy;
        energy.sequenced[slot] = e.0;
        energy.sequenced_to_lower_sp[slot] = e.1;
        energy.sequenced_to_upper_sp[slot] = e.2;
        let moisture = &mut self.demand.moisture;
        moisture.sequenced[slot] = m.0;
        moisture.sequenced_to_lower_sp[slot] = m.1;
        moisture.sequenced_to_upper_sp[slot] = m.2;
    }

    fn refresh_dead_band(&mut self) {
        self.demand.dead_band_or_setback = dead_band_or_setback(self.thermostat, &self.demand.energy);
    }
}
