use crate::error::Error;
use serde::Deserialize;
use serde_json::Value;
use std::{fmt::Display, fs, path::Path, path::PathBuf, str::FromStr};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            other => Err(Error::UnsupportedMethod(other.into())),
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request fixture as it's written on disk.
///
/// The method stays a plain string here so that an unknown method is reported when the fixture
/// is executed rather than when it's parsed.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestFixture {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub data: Value,
}

impl RequestFixture {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        load_json(path.as_ref())
    }

    pub fn method(&self) -> Result<Method, Error> {
        self.method.parse()
    }
}

/// The normalized `(message, statusCode, data)` triple. Expected fixtures deserialize straight
/// into it and live responses are converted into it by the normalizer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CanonicalResponse {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    #[serde(default)]
    pub data: Value,
}

impl CanonicalResponse {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        load_json(path.as_ref())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FixturePair {
    pub request_path: PathBuf,
    pub response_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct RequestData {
    pub method: Method,
    pub path: String,
    pub body: Option<Vec<u8>>,
}

#[derive(Debug, Clone)]
pub struct ResponseData {
    pub status_code: u16,
    pub status_text: String,
    pub body: Vec<u8>,
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let contents = fs::read(path).map_err(|e| Error::FixtureUnreadable(path.into(), e))?;

    serde_json::from_slice(&contents).map_err(|e| Error::InvalidFixture(path.into(), e))
}
