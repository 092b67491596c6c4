use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::telemetry::{PollStatus, Publication};
use crate::web::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct TelemetryResponse {
    pub status: PollStatus,
    pub latest: Option<Publication>,
}

#[utoipa::path(
    get,
    path = "/api/telemetry",
    responses(
        (status = 200, description = "Latest published telemetry and poll health", body = TelemetryResponse)
    ),
    tag = "telemetry"
)]
pub async fn latest(State(state): State<AppState>) -> Json<TelemetryResponse> {
    Json(TelemetryResponse {
        status: state.telemetry.status(),
        latest: state.telemetry.latest(),
    })
}
