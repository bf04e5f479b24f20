use crate::{
    data::{RequestData, ResponseData},
    error::Error,
    normalizer,
};
use async_trait::async_trait;
use hyper::{body, client::HttpConnector, ext::ReasonPhrase, header, Body, Client, Request};
use hyper_tls::HttpsConnector;
use std::fmt::Debug;

#[async_trait]
pub trait HttpClient: Debug {
    async fn make_request(
        &self,
        base_url: &str,
        request_data: &RequestData,
    ) -> Result<ResponseData, Error>;
}

/// Default client. One instance, and therefore one connection pool, serves a whole run.
#[derive(Debug, Clone)]
pub struct HyperHttpClient {
    client: Client<HttpsConnector<HttpConnector>>,
}

impl HyperHttpClient {
    pub fn new() -> Self {
        Self {
            client: Client::builder().build(HttpsConnector::new()),
        }
    }
}

#[async_trait]
impl HttpClient for HyperHttpClient {
    async fn make_request(
        &self,
        base_url: &str,
        request_data: &RequestData,
    ) -> Result<ResponseData, Error> {
        let url = format!("{}{}", base_url, request_data.path);
        let mut request_builder = Request::builder()
            .uri(url.as_str())
            .method(request_data.method.as_str());

        let body = match &request_data.body {
            Some(body) => {
                request_builder = request_builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(body.clone())
            }
            None => Body::empty(),
        };

        let request: Request<Body> = request_builder.body(body)?;
        let response = self.client.request(request).await?;

        let status = response.status();
        // hyper only records the phrase when it isn't the canonical one
        let status_text = normalizer::status_text(
            status,
            response
                .extensions()
                .get::<ReasonPhrase>()
                .map(ReasonPhrase::as_bytes),
        );
        let body = body::to_bytes(response.into_body()).await?;

        Ok(ResponseData {
            status_code: status.as_u16(),
            status_text,
            body: body.to_vec(),
        })
    }
}

impl Default for HyperHttpClient {
    fn default() -> Self {
        Self::new()
    }
}
