//! Zone equipment lists and load-distribution schemes.

/// How a zone's load is shared among the entries of its equipment list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadDistScheme {
    /// Each entry gets `total × its sequential fraction`, in priority order.
    #[default]
    Sequential,
    /// Every eligible entry gets an equal share.
    Uniform,
    /// Every eligible entry runs at one common part-load ratio.
    UniformPlr,
    /// Only as many entries as needed (in priority order) run, at one
    /// common part-load ratio.
    SequentialUniformPlr,
}

impl LoadDistScheme {
    /// PLR schemes learn each entry's capacity from a full-load first pass.
    #[inline]
    pub fn discovers_capacity(self) -> bool {
        matches!(self, Self::UniformPlr | Self::SequentialUniformPlr)
    }
}

/// Metadata for one piece of zone equipment.
///
/// The physical model itself is a `ZoneEquipment` trait object held by the
/// zone equipment manager at the same list position.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipmentListEntry {
    /// Equipment type label (for messages only).
    pub kind:                        String,
    pub name:                        String,
    /// 1 = first to run when heating; 0 = never used for heating.
    pub heating_priority:            u32,
    /// 1 = first to run when cooling; 0 = never used for cooling.
    pub cooling_priority:            u32,
    /// Share of the heating load under `Sequential`.
    pub sequential_heating_fraction: f64,
    /// Share of the cooling load under `Sequential`.
    pub sequential_cooling_fraction: f64,
    /// Last delivered heating output [W] recorded on a first HVAC iteration.
    /// Only meaningful under the PLR schemes.
    pub heating_capacity:            f64,
    /// Last delivered cooling output [W] (negative) recorded on a first HVAC
    /// iteration.  Only meaningful under the PLR schemes.
    pub cooling_capacity:            f64,
}

impl EquipmentListEntry {
    /// An entry with the given priorities, full sequential fractions and no
    /// known capacity.
    pub fn new(
        kind:             impl Into<String>,
        name:             impl Into<String>,
        heating_priority: u32,
        cooling_priority: u32,
    ) -> Self {
        Self {
            kind:                        kind.into(),
            name:                        name.into(),
            heating_priority,
            cooling_priority,
            sequential_heating_fraction: 1.0,
            sequential_cooling_fraction: 1.0,
            heating_capacity:            0.0,
            cooling_capacity:            0.0,
        }
    }

    pub fn with_fractions(mut self, heating: f64, cooling: f64) -> Self {
        self.sequential_heating_fraction = heating;
        self.sequential_cooling_fraction = cooling;
        self
    }

    pub fn with_capacities(mut self, heating: f64, cooling: f64) -> Self {
        self.heating_capacity = heating;
        self.cooling_capacity = cooling;
        self
    }

    /// Priority used in the given mode (`heating = true` for a non-negative load).
    #[inline]
    pub fn priority(&self, heating: bool) -> u32 {
        if heating { self.heating_priority } else { self.cooling_priority }
    }

    /// Whether the entry takes part in the given mode.
    #[inline]
    pub fn is_eligible(&self, heating: bool) -> bool {
        self.priority(heating) > 0
    }

    #[inline]
    pub fn sequential_fraction(&self, heating: bool) -> f64 {
        if heating { self.sequential_heating_fraction } else { self.sequential_cooling_fraction }
    }

    #[inline]
    pub fn capacity(&self, heating: bool) -> f64 {
        if heating { self.heating_capacity } else { self.cooling_capacity }
    }
}

/// The ordered equipment serving one zone.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipmentList {
    pub name:    String,
    pub scheme:  LoadDistScheme,
    pub entries: Vec<EquipmentListEntry>,
}

impl EquipmentList {
    pub fn new(name: impl Into<String>, scheme: LoadDistScheme) -> Self {
        Self { name: name.into(), scheme, entries: Vec::new() }
    }

    pub fn with_entry(mut self, entry: EquipmentListEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
