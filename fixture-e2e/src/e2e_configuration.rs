use crate::{
    differ::ExclusionSet,
    error::Error,
    http_client::{HttpClient, HyperHttpClient},
};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

#[derive(Debug, Clone)]
pub struct E2eConfiguration {
    fixture_root: PathBuf,
    ignore_fields: ExclusionSet,
    concurrency: usize,
    http_client: Option<Arc<dyn HttpClient + Send + Sync>>,
}

impl E2eConfiguration {
    pub fn new<P: Into<PathBuf>>(fixture_root: P) -> Self {
        Self {
            fixture_root: fixture_root.into(),
            ignore_fields: ExclusionSet::default(),
            concurrency: 1,
            http_client: None,
        }
    }

    pub fn fixture_root(&self) -> &Path {
        &self.fixture_root
    }

    pub fn set_ignore_fields<S: Into<String>, I: IntoIterator<Item = S>>(&mut self, fields: I) {
        self.ignore_fields = ExclusionSet::new(fields);
    }

    pub fn ignore_fields(&self) -> &ExclusionSet {
        &self.ignore_fields
    }

    /// Number of fixtures evaluated at the same time. Reports keep discovery order either way.
    pub fn set_concurrency(&mut self, concurrency: usize) -> Result<(), Error> {
        if concurrency == 0 {
            return Err(Error::InvalidConcurrency);
        }

        self.concurrency = concurrency;
        Ok(())
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn http_client(&self) -> Arc<dyn HttpClient + Send + Sync> {
        self.http_client
            .clone()
            .unwrap_or_else(|| Arc::new(HyperHttpClient::new()))
    }

    pub fn set_http_client(&mut self, http_client: Arc<dyn HttpClient + Send + Sync>) {
        self.http_client = Some(http_client);
    }
}
