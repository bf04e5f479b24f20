use hyper::http;
use std::{fmt::Display, io, path::PathBuf, string::FromUtf8Error};

#[derive(Debug)]
pub enum Error {
    FixtureRootUnreadable(PathBuf, walkdir::Error),
    FixtureUnreadable(PathBuf, io::Error),
    InvalidFixture(PathBuf, serde_json::Error),
    UnsupportedMethod(String),
    InvalidRequestBody(serde_json::Error),
    InvalidResponseBody(serde_json::Error),
    NonUtf8ResponseBody(FromUtf8Error),
    NestedRuntime,
    InvalidConcurrency,
    ServerStartFailed(String),
    IoError(io::Error),
    HyperError(hyper::Error),
    HttpError(http::Error),
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::FixtureRootUnreadable(path, e) => {
                write!(f, "Couldn't traverse fixture root {}: {}", path.display(), e)
            }
            Error::FixtureUnreadable(path, e) => {
                write!(f, "Couldn't read fixture {}: {}", path.display(), e)
            }
            Error::InvalidFixture(path, e) => {
                write!(f, "Fixture {} is not valid: {}", path.display(), e)
            }
            Error::UnsupportedMethod(method) => write!(f, "Unsupported method \"{}\"", method),
            Error::InvalidRequestBody(e) => write!(f, "Couldn't serialize request data: {}", e),
            Error::InvalidResponseBody(e) => {
                write!(f, "Response body looks like a JSON object but isn't: {}", e)
            }
            Error::NonUtf8ResponseBody(e) => {
                write!(f, "Plain-text response body isn't valid UTF-8: {}", e)
            }
            Error::NestedRuntime => write!(
                f,
                "Fixtures can't be run synchronously from inside an async runtime, use run_fixtures instead"
            ),
            Error::InvalidConcurrency => write!(f, "Concurrency should be at least 1"),
            Error::ServerStartFailed(reason) => {
                write!(f, "Couldn't start the test server: {}", reason)
            }
            Error::IoError(e) => write!(f, "IoError: {}", e),
            Error::HyperError(e) => write!(f, "Hyper error: {}", e),
            Error::HttpError(e) => write!(f, "Http Error: {}", e),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::IoError(e)
    }
}

impl From<hyper::Error> for Error {
    fn from(e: hyper::Error) -> Self {
        Error::HyperError(e)
    }
}

impl From<http::Error> for Error {
    fn from(e: http::Error) -> Self {
        Error::HttpError(e)
    }
}
