//! Psychrometric property contract.
//!
//! Property evaluation belongs to an external collaborator; the core only
//! needs a handful of pure functions of state.  [`IdealGasPsychrometrics`]
//! implements them with the usual moist-air correlations and is good enough
//! for the demos and tests.

/// Standard barometric pressure at sea level [Pa].
pub const STD_BARO_PRESS: f64 = 101_325.0;

/// Dry-air density at standard pressure and 20 °C [kg/m³].
pub const STD_RHO_AIR: f64 = 1.2041;

/// Pure functions of moist-air state used by the mass balance and the
/// leaving-conditions update.
pub trait Psychrometrics {
    /// Moist-air density [kg/m³] at pressure `pb` [Pa], dry-bulb `tdb` [°C]
    /// and humidity ratio `w` [kg/kg].
    fn density(&self, pb: f64, tdb: f64, w: f64) -> f64;

    /// Moist-air specific heat [J/kg·K].
    fn specific_heat(&self, w: f64) -> f64;

    /// Moist-air enthalpy [J/kg].
    fn enthalpy(&self, tdb: f64, w: f64) -> f64;

    /// Enthalpy of water vapour at `tdb` [J/kg], used as the heat of
    /// vaporisation for latent gains.
    fn vapor_enthalpy(&self, w: f64, tdb: f64) -> f64;

    /// Humidity ratio [kg/kg] at dew point `tdp` [°C] and pressure `pb` [Pa].
    fn humidity_ratio_from_dewpoint(&self, tdp: f64, pb: f64) -> f64;
}

/// Ideal-gas moist-air correlations.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdealGasPsychrometrics;

impl IdealGasPsychrometrics {
    /// Saturation vapour pressure over water [Pa] (Magnus form).
    fn saturation_pressure(t: f64) -> f64 {
        611.2 * ((17.62 * t) / (243.12 + t)).exp()
    }
}

impl Psychrometrics for IdealGasPsychrometrics {
    fn density(&self, pb: f64, tdb: f64, w: f64) -> f64 {
        let w = w.max(1.0e-5);
        pb / (287.042 * (tdb + 273.15) * (1.0 + 1.607_768_7 * w))
    }

    fn specific_heat(&self, w: f64) -> f64 {
        let w = w.max(1.0e-5);
        1.004_84e3 + w * 1.858_95e3
    }

    fn enthalpy(&self, tdb: f64, w: f64) -> f64 {
        let w = w.max(1.0e-5);
        1.004_84e3 * tdb + w * (2.500_94e6 + 1.858_95e3 * tdb)
    }

    fn vapor_enthalpy(&self, _w: f64, tdb: f64) -> f64 {
        2.500_94e6 + 1.858_95e3 * tdb
    }

    fn humidity_ratio_from_dewpoint(&self, tdp: f64, pb: f64) -> f64 {
        let pw = Self::saturation_pressure(tdp).min(0.99 * pb);
        0.621_945 * pw / (pb - pw)
    }
}
