//! Per air-loop flow aggregates.

/// Flow bookkeeping for one primary air loop.
///
/// `zone_ret_flow`, `excess_zone_exh_flow`, `zone_ret_flow_ratio` and
/// `sys_ret_flow` are recomputed by every mass-balance pass.  `recirc_flow`,
/// `leak_flow`, the outdoor-air fields and `supply_flow` are written by the
/// air-loop models.  `flow_error` persists across sub-steps within an
/// environment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AirLoopFlow {
    pub name:                 String,
    /// Total supply flow delivered by the loop [kg/s].
    pub supply_flow:          f64,
    /// Sum of zone return node flows on this loop [kg/s].
    pub zone_ret_flow:        f64,
    /// Flow entering the loop return path: zone return − recirc + leak [kg/s].
    pub sys_ret_flow:         f64,
    /// Flow recirculated inside terminal units [kg/s].
    pub recirc_flow:          f64,
    /// Supply duct leakage returning to the plenum [kg/s].
    pub leak_flow:            f64,
    pub oa_flow:              f64,
    pub oa_frac:              f64,
    /// Maximum outdoor air the loop's outdoor-air system can deliver [kg/s].
    pub max_out_air:          f64,
    pub oa_system_exists:     bool,
    /// Design return / supply ratio.
    pub des_return_frac:      f64,
    /// Zone exhaust in excess of zone inlets, charged to this loop [kg/s].
    pub excess_zone_exh_flow: f64,
    /// Factor applied to zone return nodes to absorb excess exhaust.
    pub zone_ret_flow_ratio:  f64,
    /// Set once the excess-exhaust warning has been issued for this loop.
    pub flow_error:           bool,
}

impl AirLoopFlow {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:                 name.into(),
            supply_flow:          0.0,
            zone_ret_flow:        0.0,
            sys_ret_flow:         0.0,
            recirc_flow:          0.0,
            leak_flow:            0.0,
            oa_flow:              0.0,
            oa_frac:              0.0,
            max_out_air:          0.0,
            oa_system_exists:     false,
            des_return_frac:      1.0,
            excess_zone_exh_flow: 0.0,
            zone_ret_flow_ratio:  1.0,
            flow_error:           false,
        }
    }

    /// Return nodes on this loop follow their matching inlet when there is
    /// no outdoor-air system to make up a difference.
    #[inline]
    pub fn has_fixed_returns(&self) -> bool {
        !self.oa_system_exists || self.max_out_air == 0.0
    }

    /// Clear the accumulators rebuilt by each mass-balance pass.
    pub fn reset_accumulators(&mut self) {
        self.zone_ret_flow = 0.0;
        self.excess_zone_exh_flow = 0.0;
        self.zone_ret_flow_ratio = 1.0;
    }
}
