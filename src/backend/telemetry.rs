use log::debug;

use super::{decode, read_body, ClientError, HttpBackend};
use crate::telemetry::{RecentTelemetry, TelemetrySet, TelemetrySource};

const RECENT_PATH: &str = "telemetry/recent/";

/// Fetches the most recent telemetry set from the backend.
#[derive(Debug, Clone)]
pub struct TelemetryClient {
    backend: HttpBackend,
}

impl TelemetryClient {
    pub fn new(backend: HttpBackend) -> Self {
        Self { backend }
    }

    pub async fn fetch_latest(&self) -> Result<TelemetrySet, ClientError> {
        let url = self.backend.url(RECENT_PATH);
        let response = self.backend.http.get(&url).send().await?;
        let body = read_body(response).await?;
        let recent: RecentTelemetry = decode(&body)?;
        let telemetry = recent.telemetry.unwrap_or_default();
        debug!("Fetched {} snapshots from {}", telemetry.len(), url);
        Ok(telemetry)
    }
}

impl TelemetrySource for TelemetryClient {
    async fn fetch_latest(&self) -> Result<TelemetrySet, ClientError> {
        TelemetryClient::fetch_latest(self).await
    }
}
