//! Re-simulation intents and the solver's subsystem flags.

/// The five subsystem groups the convergence solver dispatches, in the order
/// it dispatches them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subsystem {
    AirLoops,
    ZoneEquipment,
    NonZoneEquipment,
    PlantLoops,
    ElecCircuits,
}

impl Subsystem {
    /// Dispatch order within one pass.
    pub const ALL: [Subsystem; 5] = [
        Subsystem::AirLoops,
        Subsystem::ZoneEquipment,
        Subsystem::NonZoneEquipment,
        Subsystem::PlantLoops,
        Subsystem::ElecCircuits,
    ];
}

/// A request produced by a subsystem call.
///
/// Intents are collected by the caller and applied to the
/// [`SimulationFlags`] once the call has returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// The named subsystem must run again because a boundary condition it
    /// reads has changed.
    Resimulate(Subsystem),
}

/// "Needs another pass" flags, one per subsystem.
///
/// A convergence pass terminates only when every flag is clear (or the
/// iteration cap is hit).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationFlags {
    pub air_loops:          bool,
    pub zone_equipment:     bool,
    pub non_zone_equipment: bool,
    pub plant_loops:        bool,
    pub elec_circuits:      bool,
}

impl SimulationFlags {
    #[inline]
    pub fn get(&self, s: Subsystem) -> bool {
        match s {
            Subsystem::AirLoops => self.air_loops,
            Subsystem::ZoneEquipment => self.zone_equipment,
            Subsystem::NonZoneEquipment => self.non_zone_equipment,
            Subsystem::PlantLoops => self.plant_loops,
            Subsystem::ElecCircuits => self.elec_circuits,
        }
    }

    #[inline]
    pub fn set(&mut self, s: Subsystem, value: bool) {
        let flag = match s {
            Subsystem::AirLoops => &mut self.air_loops,
            Subsystem::ZoneEquipment => &mut self.zone_equipment,
            Subsystem::NonZoneEquipment => &mut self.non_zone_equipment,
            Subsystem::PlantLoops => &mut self.plant_loops,
            Subsystem::ElecCircuits => &mut self.elec_circuits,
        };
        *flag = value;
    }

    /// Raise the flags named by `intents`.
    pub fn apply<'a>(&mut self, intents: impl IntoIterator<Item = &'a Intent>) {
        for intent in intents {
            match *intent {
                Intent::Resimulate(s) => self.set(s, true),
            }
        }
    }

    #[inline]
    pub fn any(&self) -> bool {
        self.air_loops
            || self.zone_equipment
            || self.non_zone_equipment
            || self.plant_loops
            || self.elec_circuits
    }

    pub fn set_all(&mut self) {
        *self = Self {
            air_loops:          true,
            zone_equipment:     true,
            non_zone_equipment: true,
            plant_loops:        true,
            elec_circuits:      true,
        };
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
