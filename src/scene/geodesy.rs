use serde::Serialize;
use utoipa::ToSchema;

use crate::telemetry::TelemetrySnapshot;

// WGS-84 constants
const WGS84_A_M: f64 = 6_378_137.0;
const WGS84_E2: f64 = 0.006_694_379_990_14;

/// Earth-fixed Cartesian position in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Cartesian3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Cartesian3 {
    /// Converts geodetic coordinates on the WGS-84 ellipsoid to ECEF.
    pub fn from_degrees(longitude_deg: f64, latitude_deg: f64, height_m: f64) -> Self {
        let lat = latitude_deg.to_radians();
        let lon = longitude_deg.to_radians();
        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let n = WGS84_A_M / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        Self {
            x: (n + height_m) * cos_lat * lon.cos(),
            y: (n + height_m) * cos_lat * lon.sin(),
            z: (n * (1.0 - WGS84_E2) + height_m) * sin_lat,
        }
    }
}

/// Scene position of a snapshot. Altitude is kilometres on the wire, absent means zero.
pub fn snapshot_position(snapshot: &TelemetrySnapshot) -> Cartesian3 {
    let height_m = snapshot.altitude_km.unwrap_or(0.0) * 1000.0;
    Cartesian3::from_degrees(snapshot.longitude_deg, snapshot.latitude_deg, height_m)
}
