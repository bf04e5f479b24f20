use crate::{data::FixturePair, error::Error};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const REQUEST_MARKER: &str = "req";
pub const RESPONSE_MARKER: &str = "res";

lazy_static! {
    static ref REQUEST_FIXTURE_REGEX: Regex = Regex::new(r"req.*\.json$").unwrap();
}

/// Recursively collects every request fixture under `root`, sorted by file name at each level so
/// that repeated runs see the same order.
pub fn find_request_fixtures<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>, Error> {
    let root = root.as_ref();
    let mut matches = Vec::new();

    for entry in WalkDir::new(root).sort_by(|a, b| a.file_name().cmp(b.file_name())) {
        let entry = entry.map_err(|e| Error::FixtureRootUnreadable(root.into(), e))?;

        if !entry.file_type().is_file() {
            continue;
        }

        if REQUEST_FIXTURE_REGEX.is_match(&entry.file_name().to_string_lossy()) {
            matches.push(entry.into_path());
        }
    }

    Ok(matches)
}

/// Derives the expected-response path by swapping the first request marker in the whole path.
/// Nothing is looked up on disk.
pub fn paired_response_path<P: AsRef<Path>>(request_path: P) -> PathBuf {
    request_path
        .as_ref()
        .to_string_lossy()
        .replacen(REQUEST_MARKER, RESPONSE_MARKER, 1)
        .into()
}

pub fn fixture_pair<P: AsRef<Path>>(request_path: P) -> FixturePair {
    FixturePair {
        request_path: request_path.as_ref().into(),
        response_path: paired_response_path(request_path),
    }
}
