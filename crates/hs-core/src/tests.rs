//! Unit tests for hs-core.

use crate::{
    AirLoopId, HvacClock, IdealGasPsychrometrics, NodeId, Psychrometrics, SubStep,
    TimestepConfig, ZoneId, STD_BARO_PRESS, STD_RHO_AIR,
};

// ── Typed ids ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod id_tests {
    use super::*;

    #[test]
    fn default_is_invalid() {
        assert_eq!(ZoneId::default(), ZoneId::INVALID);
        assert!(!NodeId::default().is_valid());
        assert!(AirLoopId(0).is_valid());
    }

    #[test]
    fn index_and_display() {
        assert_eq!(NodeId(7).index(), 7);
        assert_eq!(ZoneId(3).to_string(), "ZoneId(3)");
        let n: usize = AirLoopId(4).into();
        assert_eq!(n, 4);
    }

    #[test]
    fn try_from_usize() {
        assert_eq!(ZoneId::try_from(5usize).unwrap(), ZoneId(5));
        assert!(ZoneId::try_from(usize::MAX).is_err());
    }
}

// ── Timestep model ────────────────────────────────────────────────────────────

#[cfg(test)]
mod time_tests {
    use super::*;

    #[test]
    fn within_tolerance_is_one_step() {
        let cfg = TimestepConfig::default();
        assert_eq!(cfg.sub_step_count(0.0), 1);
        assert_eq!(cfg.sub_step_count(0.3), 1);
        assert_eq!(cfg.sub_step_count(f64::NAN), 1);
    }

    #[test]
    fn count_is_ceiling_of_ratio() {
        let cfg = TimestepConfig::default();
        // 0.7 / 0.3 = 2.33 -> 3
        assert_eq!(cfg.sub_step_count(0.7), 3);
        assert_eq!(cfg.sub_step_count(1.2), 4);
    }

    #[test]
    fn count_is_clamped() {
        let cfg = TimestepConfig { max_sys_steps: 5, ..TimestepConfig::default() };
        assert_eq!(cfg.sub_step_count(100.0), 5);

        // 900 s / 300 s minimum -> at most 3 sub-steps.
        let cfg = TimestepConfig { min_sys_step_secs: 300.0, ..TimestepConfig::default() };
        assert_eq!(cfg.sub_step_count(100.0), 3);
    }

    #[test]
    fn split_covers_zone_step() {
        let steps: Vec<SubStep> = SubStep::split(900.0, 3).collect();
        assert_eq!(steps.len(), 3);
        let total: f64 = steps.iter().map(|s| s.duration_secs).sum();
        assert!((total - 900.0).abs() < 1e-9);
        let weights: f64 = steps.iter().map(|s| s.fraction_of_zone_step()).sum();
        assert!((weights - 1.0).abs() < 1e-12);
        assert!(steps[2].is_last());
        assert!(!steps[0].is_last());
    }

    #[test]
    fn whole_step_weight_is_one() {
        let s = SubStep::whole(600.0);
        assert_eq!(s.count, 1);
        assert_eq!(s.fraction_of_zone_step(), 1.0);
    }

    #[test]
    fn clock_tracks_elapsed() {
        let mut clock = HvacClock::new();
        for step in SubStep::split(900.0, 2) {
            clock.begin_sub_step(&step);
            clock.end_sub_step(&step);
        }
        assert!((clock.sys_time_elapsed_secs - 900.0).abs() < 1e-9);
        clock.advance_zone_step();
        assert_eq!(clock.zone_step, 1);
        assert_eq!(clock.sys_time_elapsed_secs, 0.0);
        clock.reset();
        assert_eq!(clock.zone_step, 0);
    }
}

// ── Psychrometrics ────────────────────────────────────────────────────────────

#[cfg(test)]
mod psychro_tests {
    use super::*;

    #[test]
    fn density_near_standard() {
        let p = IdealGasPsychrometrics;
        let rho = p.density(STD_BARO_PRESS, 20.0, 0.0);
        assert!((rho - STD_RHO_AIR).abs() < 0.01, "rho = {rho}");
    }

    #[test]
    fn enthalpy_increases_with_moisture() {
        let p = IdealGasPsychrometrics;
        assert!(p.enthalpy(20.0, 0.010) > p.enthalpy(20.0, 0.005));
    }

    #[test]
    fn dewpoint_round_trip_is_plausible() {
        let p = IdealGasPsychrometrics;
        // Dew point 10 °C at sea level is roughly 7.6 g/kg.
        let w = p.humidity_ratio_from_dewpoint(10.0, STD_BARO_PRESS);
        assert!((w - 0.0076).abs() < 0.0003, "w = {w}");
    }
}
