use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    StatusCode,
};
use url::Url;

use crate::errors::RpcError;

pub const ACCEPT_BOTH: &str = "application/json, text/event-stream";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// A reply whose status and headers have arrived but whose body is not yet read.
#[async_trait]
pub trait HttpReply: Send {
    fn status(&self) -> StatusCode;

    fn content_type(&self) -> Option<&str>;

    async fn text(self: Box<Self>) -> Result<String, RpcError>;
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POSTs a JSON body to `endpoint` with the dual-mode `Accept` header.
    async fn post_json(&self, endpoint: &Url, body: Vec<u8>)
        -> Result<Box<dyn HttpReply>, RpcError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration, extra_headers: HeaderMap) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(extra_headers)
            .build()
            .map_err(|err| RpcError::configuration(format!("failed to build http client: {err}")))?;

        Ok(Self { http, timeout })
    }

    fn map_error(&self, err: reqwest::Error) -> RpcError {
        if err.is_timeout() {
            return RpcError::timeout(self.timeout);
        }
        RpcError::Transport {
            status: err.status().map(|status| status.as_u16()),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(
        &self,
        endpoint: &Url,
        body: Vec<u8>,
    ) -> Result<Box<dyn HttpReply>, RpcError> {
        let response = self
            .http
            .post(endpoint.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))
            .header(ACCEPT, HeaderValue::from_static(ACCEPT_BOTH))
            .body(body)
            .send()
            .await
            .map_err(|err| self.map_error(err))?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        Ok(Box::new(ReqwestReply {
            response,
            content_type,
            timeout: self.timeout,
        }))
    }
}

struct ReqwestReply {
    response: reqwest::Response,
    content_type: Option<String>,
    timeout: Duration,
}

#[async_trait]
impl HttpReply for ReqwestReply {
    fn status(&self) -> StatusCode {
        self.response.status()
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    async fn text(self: Box<Self>) -> Result<String, RpcError> {
        let timeout = self.timeout;
        self.response.text().await.map_err(|err| {
            if err.is_timeout() {
                RpcError::timeout(timeout)
            } else if err.is_decode() {
                RpcError::decode(format!("failed to read response body: {err}"))
            } else {
                RpcError::transport(format!("failed to read response body: {err}"))
            }
        })
    }
}
