//! `SimOrder` — the order in which a zone's equipment runs.

use hs_model::EquipmentList;

/// Equipment-list positions sorted by priority for the active mode.
///
/// Heating priorities are used when the zone load is non-negative, cooling
/// priorities otherwise.  The sort is stable, so entries with equal priority
/// keep their list order; entries whose priority for the active mode is 0
/// run last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimOrder {
    positions: Vec<usize>,
    heating:   bool,
}

impl SimOrder {
    pub fn resolve(list: &EquipmentList, total_load: f64) -> Self {
        let mut order = Self::default();
        order.set(list, total_load);
        order
    }

    /// Recompute in place, reusing the allocation.
    pub fn set(&mut self, list: &EquipmentList, total_load: f64) {
        self.heating = total_load >= 0.0;
        self.positions.clear();
        self.positions.extend(0..list.len());
        let heating = self.heating;
        self.positions.sort_by_key(|&p| match list.entries[p].priority(heating) {
            0 => u32::MAX,
            prio => prio,
        });
    }

    /// List position of the equipment in `slot`.
    #[inline]
    pub fn position(&self, slot: usize) -> Option<usize> {
        self.positions.get(slot).copied()
    }

    /// `true` when heating priorities decided the order.
    #[inline]
    pub fn heating(&self) -> bool {
        self.heating
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
