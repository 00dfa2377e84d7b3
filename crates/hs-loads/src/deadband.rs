//! Deadband / setback state.

use hs_model::{DemandRecord, ThermostatType};

/// Whether the zone sits in its thermostat deadband (or in setback) given the
/// setpoint-relative remaining loads.
///
/// | Thermostat                    | Condition                                     |
/// |-------------------------------|-----------------------------------------------|
/// | `SingleHeating`               | heat-SP remaining < 0                         |
/// | `SingleCooling`               | cool-SP remaining > 0                         |
/// | `SingleHeatCool`, dual        | heat-SP remaining < 0 and cool-SP remaining > 0 |
/// | `Uncontrolled`                | never                                         |
pub fn dead_band_or_setback(thermostat: ThermostatType, energy: &DemandRecord) -> bool {
    let heat = energy.remaining_to_lower_sp;
    let cool = energy.remaining_to_upper_sp;
    match thermostat {
        ThermostatType::Uncontrolled => false,
        ThermostatType::SingleHeating => heat < 0.0,
        ThermostatType::SingleCooling => cool > 0.0,
        ThermostatType::SingleHeatCool | ThermostatType::DualSetpointWithDeadband => {
            heat < 0.0 && cool > 0.0
        }
    }
}
