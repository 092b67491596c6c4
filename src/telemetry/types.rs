use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// One satellite's state at one simulated instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TelemetrySnapshot {
    #[serde(rename = "satellite", alias = "satelliteId")]
    pub satellite_id: String,
    /// Simulation time, not wall-clock.
    #[serde(
        rename = "timestamp",
        alias = "timestampUtc",
        deserialize_with = "deserialize_timestamp"
    )]
    pub timestamp_utc: DateTime<Utc>,
    #[serde(rename = "latitude", alias = "latitudeDeg")]
    pub latitude_deg: f64,
    #[serde(rename = "longitude", alias = "longitudeDeg")]
    pub longitude_deg: f64,
    #[serde(rename = "altitude", alias = "altitudeKm", default)]
    pub altitude_km: Option<f64>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub extra: Option<serde_json::Value>,
}

/// RFC 3339 timestamps keep their offset; timestamps written without one are
/// taken as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(stamp) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(stamp.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp {:?}: {}", raw, e)))
}

/// Snapshots as returned by one fetch. Order carries no meaning.
pub type TelemetrySet = Vec<TelemetrySnapshot>;

#[derive(Debug, Deserialize)]
pub(crate) struct RecentTelemetry {
    #[serde(default)]
    pub telemetry: Option<TelemetrySet>,
}

/// A telemetry set accepted by the poll loop.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Publication {
    /// Increases by one with every publication.
    pub sequence: u64,
    pub received_at: DateTime<Utc>,
    #[schema(value_type = Vec<TelemetrySnapshot>)]
    pub telemetry: Arc<TelemetrySet>,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct PollStatus {
    pub running: bool,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub consecutive_failures: u32,
    pub publications: u64,
}
