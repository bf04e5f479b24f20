use crate::{
    data::{CanonicalResponse, Method, RequestData, RequestFixture},
    error::Error,
    http_client::HttpClient,
    normalizer,
};
use tracing::debug;

/// Turns a request fixture into the request that goes over the wire.
///
/// GET never carries a body. Every other method sends `data` as JSON, and a missing `data`
/// becomes the literal `null`.
pub fn build_request_data(fixture: &RequestFixture) -> Result<RequestData, Error> {
    let method = fixture.method()?;

    let body = match method {
        Method::Get => None,
        Method::Post | Method::Put | Method::Patch | Method::Delete => {
            Some(serde_json::to_vec(&fixture.data).map_err(Error::InvalidRequestBody)?)
        }
    };

    Ok(RequestData {
        method,
        path: fixture.path.clone(),
        body,
    })
}

pub async fn execute(
    http_client: &(dyn HttpClient + Send + Sync),
    base_url: &str,
    fixture: &RequestFixture,
) -> Result<CanonicalResponse, Error> {
    let request_data = build_request_data(fixture)?;
    debug!(method = %request_data.method, path = %request_data.path, "issuing fixture request");

    let response_data = http_client.make_request(base_url, &request_data).await?;

    normalizer::normalize(&response_data)
}
