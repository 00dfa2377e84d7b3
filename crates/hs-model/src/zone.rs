//! Thermal zones.

use hs_core::NodeId;

/// How the zone thermostat is configured.  Determines how the deadband /
/// setback state is derived from the setpoint-relative remaining loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ThermostatType {
    #[default]
    Uncontrolled,
    SingleHeating,
    SingleCooling,
    SingleHeatCool,
    DualSetpointWithDeadband,
}

/// Convective and latent gains picked up by air on its way to one return
/// node (lights, under-case refrigeration returns).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReturnAirGain {
    pub return_node:  NodeId,
    /// Sensible gain [W] (negative for refrigeration case credits).
    pub convective_w: f64,
    /// Latent gain [W].
    pub latent_w:     f64,
}

/// Air leaving an airflow window gap and routed to the return air.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AirflowWindowReturn {
    /// Gap air mass flow [kg/s].
    pub mass_flow:   f64,
    /// Gap outlet temperature [°C].
    pub outlet_temp: f64,
}

/// A controlled thermal volume.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Zone {
    pub name:                 String,
    pub multiplier:           u32,
    pub list_multiplier:      u32,
    /// Well-mixed zone air node.
    pub air_node:             NodeId,
    pub thermostat:           ThermostatType,
    /// Zonal-only and cycling-fan systems route return-path heat into the
    /// zone instead of the return node.
    pub no_heat_to_return_air: bool,

    pub return_gains:         Vec<ReturnAirGain>,
    pub airflow_windows:      Vec<AirflowWindowReturn>,

    /// Outdoor-air infiltration entering the zone [kg/s] (simple airflow).
    pub infiltration_mass_flow: f64,
    /// Zone ventilation entering the zone [kg/s] (simple airflow).
    pub ventilation_mass_flow:  f64,

    /// Sensible load [W] spilled into the zone by the leaving-conditions
    /// update; read by the zone heat balance corrector.
    pub sys_dep_zone_load_w:         f64,
    /// Latent gain [W] spilled into the zone when there is no return flow.
    pub latent_gain_except_people_w: f64,
}

impl Zone {
    pub fn new(name: impl Into<String>, air_node: NodeId) -> Self {
        Self {
            name:                        name.into(),
            multiplier:                  1,
            list_multiplier:             1,
            air_node,
            thermostat:                  ThermostatType::Uncontrolled,
            no_heat_to_return_air:       false,
            return_gains:                Vec::new(),
            airflow_windows:             Vec::new(),
            infiltration_mass_flow:      0.0,
            ventilation_mass_flow:       0.0,
            sys_dep_zone_load_w:         0.0,
            latent_gain_except_people_w: 0.0,
        }
    }

    /// Combined scale factor for aggregated reporting.
    #[inline]
    pub fn total_multiplier(&self) -> f64 {
        (self.multiplier.max(1) * self.list_multiplier.max(1)) as f64
    }

    #[inline]
    pub fn is_thermostat_controlled(&self) -> bool {
        self.thermostat != ThermostatType::Uncontrolled
    }

    /// Convective and latent return gains routed to `node`.
    pub fn return_gains_for(&self, node: NodeId) -> (f64, f64) {
        self.return_gains
            .iter()
            .filter(|g| g.return_node == node)
            .fold((0.0, 0.0), |(q, l), g| (q + g.convective_w, l + g.latent_w))
    }

    /// Clear the loads written by the previous leaving-conditions update.
    pub fn clear_spill_loads(&mut self) {
        self.sys_dep_zone_load_w = 0.0;
        self.latent_gain_except_people_w = 0.0;
    }
}
