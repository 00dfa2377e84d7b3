//! Mass-balance options.

use crate::{AirflowError, AirflowResult};

/// What the balance does with a zone's infiltration object when
/// enforcement is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InfiltrationTreatment {
    /// Leave infiltration alone.
    #[default]
    None,
    /// Overwrite the infiltration flow with whatever closes the balance.
    Adjust,
    /// Add whatever closes the balance on top of the modelled infiltration.
    Add,
}

/// Which zones take part in infiltration reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InfiltrationZones {
    /// Only zones that supply mixing air to other zones.
    #[default]
    MixingSourceZonesOnly,
    AllZones,
}

/// Options for [`MassBalanceEngine`][crate::MassBalanceEngine].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MassBalanceConfig {
    /// Force every zone's return flow to close its balance exactly.
    pub enforce:            bool,
    /// Rescale mixing links so receiving zones balance (needs `enforce`).
    pub balance_mixing:     bool,
    pub infiltration:       InfiltrationTreatment,
    pub infiltration_zones: InfiltrationZones,
    /// Outer-loop cap.
    pub max_iterations:     u32,
    /// Change in building-wide mixing flow that counts as settled [kg/s].
    pub tolerance:          f64,
}

impl Default for MassBalanceConfig {
    fn default() -> Self {
        Self {
            enforce:            false,
            balance_mixing:     false,
            infiltration:       InfiltrationTreatment::None,
            infiltration_zones: InfiltrationZones::MixingSourceZonesOnly,
            max_iterations:     25,
            tolerance:          1.0e-5,
        }
    }
}

impl MassBalanceConfig {
    /// Enforcement with mixing balancing and infiltration adjustment in every
    /// zone.
    pub fn enforced() -> Self {
        Self {
            enforce:            true,
            balance_mixing:     true,
            infiltration:       InfiltrationTreatment::Adjust,
            infiltration_zones: InfiltrationZones::AllZones,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> AirflowResult<()> {
        if self.max_iterations == 0 {
            return Err(AirflowError::Config("max_iterations must be at least 1".into()));
        }
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(AirflowError::Config(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}
