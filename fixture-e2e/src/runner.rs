use crate::{
    data::{CanonicalResponse, FixturePair, RequestFixture},
    differ::{self, ExclusionSet, FieldDifference},
    e2e_configuration::E2eConfiguration,
    error::Error,
    fixture_locator,
    http_client::HttpClient,
    request_executor,
    test_server::{Handler, TestServer},
};
use futures::{stream, StreamExt};
use std::{fmt::Display, path::Path};
use tokio::runtime::{Handle, Runtime};
use tracing::{debug, info, warn};

#[derive(Debug)]
pub enum FixtureFailure {
    /// A fixture file is missing, unreadable or doesn't match its schema.
    Load(Error),
    /// The request couldn't be made or the response couldn't be normalized.
    Execution(Error),
    Mismatch(Vec<FieldDifference>),
}

impl Display for FixtureFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FixtureFailure::Load(e) => write!(f, "load error: {}", e),
            FixtureFailure::Execution(e) => write!(f, "execution error: {}", e),
            FixtureFailure::Mismatch(differences) => {
                write!(f, "response mismatch")?;
                for difference in differences {
                    write!(f, "\n{}", difference)?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug)]
pub struct FixtureReport {
    pub pair: FixturePair,
    pub outcome: Result<(), FixtureFailure>,
}

impl FixtureReport {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn failure(&self) -> Option<&FixtureFailure> {
        self.outcome.as_ref().err()
    }
}

impl Display for FixtureReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.outcome {
            Ok(()) => write!(f, "{}: ok", self.pair.request_path.display()),
            Err(failure) => write!(f, "{}: {}", self.pair.request_path.display(), failure),
        }
    }
}

/// Reports for every discovered fixture, in discovery order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub reports: Vec<FixtureReport>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.reports.iter().all(FixtureReport::is_success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &FixtureReport> {
        self.reports.iter().filter(|report| !report.is_success())
    }
}

impl Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} of {} fixtures failed",
            self.failures().count(),
            self.reports.len()
        )?;

        for failure in self.failures() {
            write!(f, "\n\n{}", failure)?;
        }

        Ok(())
    }
}

/// Evaluates one fixture pair. Nothing escapes: every problem ends up in the report.
pub async fn evaluate_fixture(
    http_client: &(dyn HttpClient + Send + Sync),
    base_url: &str,
    request_path: &Path,
    exclusions: &ExclusionSet,
) -> FixtureReport {
    let pair = fixture_locator::fixture_pair(request_path);
    let outcome = compare_fixture(http_client, base_url, &pair, exclusions).await;

    FixtureReport { pair, outcome }
}

async fn compare_fixture(
    http_client: &(dyn HttpClient + Send + Sync),
    base_url: &str,
    pair: &FixturePair,
    exclusions: &ExclusionSet,
) -> Result<(), FixtureFailure> {
    let request = RequestFixture::load(&pair.request_path).map_err(FixtureFailure::Load)?;
    let expected = CanonicalResponse::load(&pair.response_path).map_err(FixtureFailure::Load)?;

    let actual = request_executor::execute(http_client, base_url, &request)
        .await
        .map_err(FixtureFailure::Execution)?;

    let differences = differ::diff_responses(&expected, &actual, exclusions);
    if differences.is_empty() {
        Ok(())
    } else {
        Err(FixtureFailure::Mismatch(differences))
    }
}

/// Runs every fixture under the configured root against `base_url`.
///
/// Only a fixture root that can't be traversed is returned as an error, and in that case no
/// fixture runs.
pub async fn run_fixtures(
    configuration: &E2eConfiguration,
    base_url: &str,
) -> Result<RunReport, Error> {
    let request_paths = fixture_locator::find_request_fixtures(configuration.fixture_root())?;
    info!(
        root = %configuration.fixture_root().display(),
        fixtures = request_paths.len(),
        "running fixtures"
    );

    let http_client = configuration.http_client();
    let exclusions = configuration.ignore_fields();

    let reports: Vec<FixtureReport> = stream::iter(request_paths.iter())
        .map(|request_path| {
            debug!(fixture = %request_path.display(), "evaluating fixture");
            evaluate_fixture(http_client.as_ref(), base_url, request_path, exclusions)
        })
        .buffered(configuration.concurrency())
        .collect()
        .await;

    for report in reports.iter().filter(|report| !report.is_success()) {
        warn!(fixture = %report.pair.request_path.display(), "{}", report);
    }

    let report = RunReport { reports };
    info!(
        failed = report.failures().count(),
        total = report.reports.len(),
        "fixture run finished"
    );

    Ok(report)
}

/// Blocking variant of [`run_fixtures`] for callers without a runtime.
///
/// Fails with [`Error::NestedRuntime`] when called from inside a tokio runtime; async callers
/// should await [`run_fixtures`] directly.
pub fn run_against(
    base_url: &str,
    configuration: &E2eConfiguration,
) -> Result<RunReport, Error> {
    if Handle::try_current().is_ok() {
        return Err(Error::NestedRuntime);
    }

    Runtime::new()?.block_on(run_fixtures(configuration, base_url))
}

/// Serves `handler` on an ephemeral local port and runs every fixture against it, failing the
/// calling test with every fixture failure.
pub fn run_fixture_test<H: Handler>(handler: H, configuration: E2eConfiguration) {
    let server = match TestServer::start(handler) {
        Ok(server) => server,
        Err(e) => panic!("Fixture E2E Error: {}", e),
    };

    let report = match run_against(&server.base_url(), &configuration) {
        Ok(report) => report,
        Err(e) => panic!("Fixture E2E Error: {}", e),
    };
    drop(server);

    if !report.is_success() {
        panic!("{}", report);
    }
}
