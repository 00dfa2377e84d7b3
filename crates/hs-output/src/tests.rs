//! Integration tests for hs-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{EnvironmentRow, FindingRow, SubStepRow, ZoneAverageRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn headers(path: std::path::PathBuf) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    fn records(path: std::path::PathBuf) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }

    fn sub_step_row(zone_step: u64, sub_step: u32) -> SubStepRow {
        SubStepRow {
            environment:   0,
            zone_step,
            sub_step,
            sub_steps:     4,
            start_secs:    225.0 * sub_step as f64,
            duration_secs: 225.0,
            iterations:    3,
            converged:     true,
            interrupted:   false,
        }
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        for file in [
            "sub_steps.csv",
            "zone_averages.csv",
            "zone_mass_balance.csv",
            "convergence_findings.csv",
            "environments.csv",
        ] {
            assert!(dir.path().join(file).exists(), "{file} missing");
        }
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        assert_eq!(
            headers(dir.path().join("zone_averages.csv")),
            ["environment", "zone_step", "zone", "mean_temp", "mean_hum_rat"]
        );
        assert_eq!(
            headers(dir.path().join("environments.csv")),
            ["environment", "non_converged_solves", "suppressed_warnings", "air_iteration_caps"]
        );
    }

    #[test]
    fn csv_sub_step_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        for i in 0..4 {
            w.write_sub_step(&sub_step_row(7, i)).unwrap();
        }
        w.finish().unwrap();

        let rows = records(dir.path().join("sub_steps.csv"));
        assert_eq!(rows.len(), 4);
        assert_eq!(&rows[2][1], "7");   // zone_step
        assert_eq!(&rows[2][2], "2");   // sub_step
        assert_eq!(&rows[2][4], "450"); // start_secs
        assert_eq!(&rows[2][7], "1");   // converged
    }

    #[test]
    fn csv_finding_without_slope_leaves_it_empty() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_finding(&FindingRow {
            environment: 0,
            zone_step:   3,
            sub_step:    0,
            location:    "air loop AirLoopId(0) Supply side".into(),
            quantity:    "mass flow",
            kind:        "oscillating",
            latest:      1.5,
            slope:       None,
        })
        .unwrap();
        w.finish().unwrap();

        let rows = records(dir.path().join("convergence_findings.csv"));
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][5], "oscillating");
        assert_eq!(&rows[0][7], "");
    }

    #[test]
    fn csv_environment_row() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_environment(&EnvironmentRow {
            environment:          1,
            non_converged_solves: 17,
            suppressed_warnings:  2,
            air_iteration_caps:   0,
        })
        .unwrap();
        w.finish().unwrap();

        let rows = records(dir.path().join("environments.csv"));
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][1], "17");
        assert_eq!(&rows[0][2], "2");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_empty_batches_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let none: &[ZoneAverageRow] = &[];
        w.write_zone_averages(none).unwrap();
        w.write_mass_balance(&[]).unwrap();
    }
}

// ── Observer tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use tempfile::TempDir;

    use hs_core::SubStep;
    use hs_equipment::IdealLoads;
    use hs_model::{EquipmentList, EquipmentListEntry, HvacModel, HvacModelBuilder, LoadDistScheme, ZoneSpec};
    use hs_sim::{HvacConfig, NoSystems, SimBuilder, ZoneAirModel};

    use crate::csv::CsvWriter;
    use crate::observer::HvacOutputObserver;
    use crate::row::{EnvironmentRow, FindingRow, SubStepRow, ZoneAverageRow, ZoneMassBalanceRow};
    use crate::writer::OutputWriter;
    use crate::{OutputError, OutputResult};

    /// Fixed heating load; the zone never moves.
    struct SteadyZone;

    impl ZoneAirModel for SteadyZone {
        fn predict(&mut self, model: &mut HvacModel, _step: &SubStep) {
            for d in &mut model.demands {
                d.energy.total = 2000.0;
                d.energy.to_lower_sp = 2000.0;
                d.energy.to_upper_sp = 2000.0;
            }
        }

        fn correct(&mut self, _model: &mut HvacModel, _step: &SubStep) -> f64 {
            0.0
        }

        fn revert(&mut self, _model: &mut HvacModel) {}
    }

    /// Writer whose sub-step writes always fail.
    #[derive(Default)]
    struct Failing {
        sub_step_calls: usize,
        finished:       bool,
    }

    impl OutputWriter for Failing {
        fn write_sub_step(&mut self, _row: &SubStepRow) -> OutputResult<()> {
            self.sub_step_calls += 1;
            Err(OutputError::Io(std::io::Error::other(format!("write {}", self.sub_step_calls))))
        }
        fn write_zone_averages(&mut self, _rows: &[ZoneAverageRow]) -> OutputResult<()> { Ok(()) }
        fn write_mass_balance(&mut self, _rows: &[ZoneMassBalanceRow]) -> OutputResult<()> { Ok(()) }
        fn write_finding(&mut self, _row: &FindingRow) -> OutputResult<()> { Ok(()) }
        fn write_environment(&mut self, _row: &EnvironmentRow) -> OutputResult<()> { Ok(()) }
        fn finish(&mut self) -> OutputResult<()> {
            self.finished = true;
            Ok(())
        }
    }

    fn office_sim() -> hs_sim::HvacSim<NoSystems, SteadyZone> {
        let mut b = HvacModelBuilder::new();
        let zone = b.add_zone(ZoneSpec::new("Office"));
        let supply = b.add_node("Office Supply");
        let ret = b.add_node("Office Return");
        b.add_inlet(zone, supply, None);
        b.add_return(zone, ret, None);
        b.equipment_list(
            zone,
            EquipmentList::new("Office Equipment", LoadDistScheme::Sequential)
                .with_entry(EquipmentListEntry::new("IdealLoads", "Office Ideal", 1, 1)),
        );
        let model = b.build().unwrap();

        SimBuilder::new(HvacConfig::default(), model, NoSystems, SteadyZone)
            .equipment(zone, Box::new(IdealLoads::new("Office Ideal", supply, 0.4, 5000.0, 5000.0)))
            .build()
            .unwrap()
    }

    fn records(dir: &TempDir, file: &str) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(dir.path().join(file)).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn integration_csv() {
        let mut sim = office_sim();
        let dir = tempfile::tempdir().expect("create temp dir");
        let mut obs = HvacOutputObserver::new(CsvWriter::new(dir.path()).unwrap());

        assert_eq!(sim.run_zone_steps(3, &mut obs).unwrap(), 3);
        sim.end_environment(&mut obs);
        sim.run_zone_steps(1, &mut obs).unwrap();
        sim.end_environment(&mut obs);
        obs.finish().expect("no write errors expected");

        let sub_steps = records(&dir, "sub_steps.csv");
        assert_eq!(sub_steps.len(), 4, "one sub-step per zone step");
        assert_eq!(&sub_steps[3][0], "1"); // second environment
        assert_eq!(&sub_steps[3][1], "0"); // clock restarted

        let averages = records(&dir, "zone_averages.csv");
        assert_eq!(averages.len(), 4);
        assert_eq!(averages[0][3].parse::<f64>().unwrap(), 20.0);

        let balance = records(&dir, "zone_mass_balance.csv");
        assert_eq!(balance.len(), 4);
        let in_flow: f64 = balance[0][4].parse().unwrap();
        let return_flow: f64 = balance[0][6].parse().unwrap();
        assert!((in_flow - 0.4).abs() < 1e-9);
        assert!((return_flow - 0.4).abs() < 1e-9);

        assert!(records(&dir, "convergence_findings.csv").is_empty());
        let envs = records(&dir, "environments.csv");
        assert_eq!(envs.len(), 2);
        assert_eq!(&envs[1][0], "1");
    }

    #[test]
    fn first_error_is_kept() {
        let mut sim = office_sim();
        let mut obs = HvacOutputObserver::new(Failing::default());
        sim.run_zone_steps(2, &mut obs).unwrap();

        let err = obs.finish().unwrap_err();
        assert_eq!(err.to_string(), "I/O error: write 1");
        assert!(obs.take_error().is_none());

        let writer = obs.into_writer();
        assert_eq!(writer.sub_step_calls, 2);
        assert!(writer.finished);
    }
}
