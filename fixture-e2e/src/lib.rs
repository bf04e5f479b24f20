mod data;
mod differ;
mod e2e_configuration;
mod error;
mod fixture_locator;
mod http_client;
mod normalizer;
mod request_executor;
mod runner;
mod test_server;

pub use data::{CanonicalResponse, FixturePair, Method, RequestData, RequestFixture, ResponseData};
pub use differ::{
    diff_responses, diff_values, ExclusionSet, FieldDifference, ResponseField, ValueDifference,
};
pub use e2e_configuration::E2eConfiguration;
pub use error::Error;
pub use fixture_locator::{
    find_request_fixtures, fixture_pair, paired_response_path, REQUEST_MARKER, RESPONSE_MARKER,
};
pub use fixture_e2e_codegen::fixture_test;
pub use http_client::{HttpClient, HyperHttpClient};
pub use normalizer::{normalize, normalize_body};
pub use request_executor::{build_request_data, execute};
pub use runner::{
    evaluate_fixture, run_against, run_fixture_test, run_fixtures, FixtureFailure, FixtureReport,
    RunReport,
};
pub use test_server::{Handler, TestServer};
