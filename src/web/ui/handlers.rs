use axum::{extract::State, response::IntoResponse};

use crate::scene::lock_scene;
use crate::telemetry::PollStatus;
use crate::web::state::AppState;

use super::templates::{DashboardTemplate, EntityRow, TelemetryRow};

pub async fn dashboard(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.telemetry.status();
    let telemetry: Vec<TelemetryRow> = state
        .telemetry
        .latest()
        .map(|publication| {
            publication
                .telemetry
                .iter()
                .map(|s| TelemetryRow {
                    satellite: s.satellite_id.clone(),
                    timestamp: s.timestamp_utc.to_rfc3339(),
                    latitude: format!("{:.4}", s.latitude_deg),
                    longitude: format!("{:.4}", s.longitude_deg),
                    altitude: s
                        .altitude_km
                        .map(|a| format!("{:.1} km", a))
                        .unwrap_or_else(|| "-".to_string()),
                })
                .collect()
        })
        .unwrap_or_default();

    let entities: Vec<EntityRow> = lock_scene(&state.scene)
        .entities()
        .into_iter()
        .map(|e| EntityRow {
            id: e.id,
            x_km: format!("{:.1}", e.position.x / 1000.0),
            y_km: format!("{:.1}", e.position.y / 1000.0),
            z_km: format!("{:.1}", e.position.z / 1000.0),
            color: e.style.color.to_hex(),
        })
        .collect();

    DashboardTemplate {
        poll_summary: summarize(&status),
        telemetry,
        entities,
        in_flight: state.dispatcher.is_in_flight(),
    }
}

fn summarize(status: &PollStatus) -> String {
    let health = match (&status.last_success, &status.last_error) {
        (_, Some(err)) => format!(
            "{} consecutive failures, last: {}",
            status.consecutive_failures, err
        ),
        (Some(at), None) => format!("ok, last update {}", at.format("%H:%M:%S")),
        (None, None) => "waiting for first telemetry".to_string(),
    };
    let state = if status.running { "polling" } else { "stopped" };
    format!("{} ({} publications), {}", state, status.publications, health)
}
