//! A no-op zone equipment model — never delivers anything.

use crate::{EquipContext, EquipmentDemand, EquipmentOutput, ZoneEquipment};

/// A [`ZoneEquipment`] that always reports zero output.
///
/// Useful as a placeholder in tests and for list entries whose physical model
/// is not part of the run.
pub struct NoopEquipment {
    name: String,
}

impl NoopEquipment {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ZoneEquipment for NoopEquipment {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &str {
        "Noop"
    }

    fn simulate(&mut self, _demand: &EquipmentDemand, _ctx: &mut EquipContext<'_>) -> EquipmentOutput {
        EquipmentOutput::default()
    }
}
