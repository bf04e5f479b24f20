pub mod service;

#[cfg(test)]
mod tests {
    use crate::service::route;
    use fixture_e2e::{
        fixture_test, run_against, run_fixture_test, E2eConfiguration, Error, FixtureFailure,
        FixtureReport, Handler, ResponseField, TestServer,
    };
    use serde_json::json;
    use std::path::Path;

    fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn configure_fixtures(config: &mut E2eConfiguration) {
        init_logging();
        config.set_ignore_fields(vec!["id"]);
    }

    fn configure_concurrent_fixtures(config: &mut E2eConfiguration) {
        configure_fixtures(config);
        config.set_concurrency(4).unwrap();
    }

    #[fixture_test("testdata", configure_fixtures)]
    fn service_matches_fixtures() -> impl Handler {
        route
    }

    #[fixture_test("testdata", configure_concurrent_fixtures)]
    fn service_matches_fixtures_concurrently() -> impl Handler {
        route
    }

    #[fixture_test("testdata/get")]
    fn get_fixture_matches_without_exclusions() -> impl Handler {
        route
    }

    fn failing_report() -> Vec<FixtureReport> {
        init_logging();
        let server = TestServer::start(route).unwrap();
        let mut config = E2eConfiguration::new("testdata_failing");
        config.set_ignore_fields(vec!["id"]);

        run_against(&server.base_url(), &config).unwrap().reports
    }

    fn report_for<'a>(reports: &'a [FixtureReport], name: &str) -> &'a FixtureReport {
        reports
            .iter()
            .find(|report| report.pair.request_path.file_name().unwrap() == name)
            .unwrap()
    }

    fn mismatched_fields(report: &FixtureReport) -> Vec<ResponseField> {
        match report.failure() {
            Some(FixtureFailure::Mismatch(differences)) => {
                differences.iter().map(|difference| difference.field).collect()
            }
            other => panic!("expected a mismatch, got {:?}", other),
        }
    }

    #[test]
    fn every_failing_fixture_is_reported_in_order() {
        let reports = failing_report();

        let names: Vec<_> = reports
            .iter()
            .map(|report| report.pair.request_path.file_name().unwrap().to_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "a_status_req.json",
                "b_head_req.json",
                "c_orphan_req.json",
                "d_get_req.json",
                "e_message_req.json",
                "f_plain_req.json",
            ]
        );
    }

    #[test]
    fn status_code_mismatch_reports_status_code_only() {
        let reports = failing_report();
        let report = report_for(&reports, "a_status_req.json");

        assert_eq!(mismatched_fields(report), vec![ResponseField::StatusCode]);
    }

    #[test]
    fn unsupported_method_does_not_stop_the_run() {
        let reports = failing_report();

        assert!(matches!(
            report_for(&reports, "b_head_req.json").failure(),
            Some(FixtureFailure::Execution(Error::UnsupportedMethod(method))) if method == "HEAD"
        ));
        assert!(report_for(&reports, "d_get_req.json").is_success());
    }

    #[test]
    fn missing_expected_fixture_names_the_derived_path() {
        let reports = failing_report();
        let report = report_for(&reports, "c_orphan_req.json");

        match report.failure() {
            Some(FixtureFailure::Load(Error::FixtureUnreadable(path, _))) => {
                assert_eq!(path, Path::new("testdata_failing/c_orphan_res.json"))
            }
            other => panic!("expected a load error, got {:?}", other),
        }
        assert!(report
            .to_string()
            .contains("testdata_failing/c_orphan_res.json"));
    }

    #[test]
    fn declared_message_is_compared() {
        let reports = failing_report();
        let report = report_for(&reports, "e_message_req.json");

        assert_eq!(mismatched_fields(report), vec![ResponseField::Message]);
    }

    #[test]
    fn plain_text_body_is_compared_as_a_string() {
        let reports = failing_report();
        let report = report_for(&reports, "f_plain_req.json");

        match report.failure() {
            Some(FixtureFailure::Mismatch(differences)) => {
                assert_eq!(differences.len(), 2);
                assert_eq!(differences[1].field, ResponseField::Data);
                assert_eq!(
                    differences[1].differences[0].actual,
                    Some(json!("invalid id abc\n"))
                );
            }
            other => panic!("expected a mismatch, got {:?}", other),
        }
    }

    #[test]
    #[should_panic(expected = "5 of 6 fixtures failed")]
    fn failing_fixtures_fail_the_test() {
        init_logging();
        let mut config = E2eConfiguration::new("testdata_failing");
        config.set_ignore_fields(vec!["id"]);

        run_fixture_test(route, config);
    }

    #[test]
    #[should_panic(expected = "Couldn't traverse fixture root")]
    fn missing_fixture_root_aborts() {
        run_fixture_test(route, E2eConfiguration::new("no_such_directory"));
    }
}
