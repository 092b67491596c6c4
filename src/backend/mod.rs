//! HTTP accessors for the simulation backend.
//!
//! Both clients are single request/response calls with no retry and no
//! caching. Recovery policy belongs to the caller.

mod commands;
mod error;
#[cfg(test)]
pub(crate) mod fake;
mod telemetry;

pub use commands::CommandClient;
pub use error::ClientError;
pub use telemetry::TelemetryClient;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::config::BackendConfig;

/// Shared connection pool and base path for the backend API.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: Client,
    api_base: String,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }
}

/// Reads the body of a response, turning non-success statuses into errors.
async fn read_body(response: Response) -> Result<String, ClientError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(ClientError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ClientError> {
    serde_json::from_str(body).map_err(|e| ClientError::MalformedResponse(e.to_string()))
}
