use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::command::{AcceptedCommand, Command, CommandKind, ControlPanel};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

/// A control press: which button, plus the form as the operator left it.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ControlRequest {
    pub kind: CommandKind,
    #[serde(default)]
    pub start_time: String,
    #[serde(default = "default_rate")]
    pub step_size_seconds: f64,
    #[serde(default = "default_rate")]
    pub replay_speed: f64,
}

fn default_rate() -> f64 {
    1.0
}

impl From<ControlRequest> for ControlPanel {
    fn from(request: ControlRequest) -> Self {
        ControlPanel {
            start_time: request.start_time,
            step_size_seconds: request.step_size_seconds,
            replay_speed: request.replay_speed,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DispatchStateResponse {
    pub in_flight: bool,
}

#[utoipa::path(
    post,
    path = "/api/commands",
    request_body = Command,
    responses(
        (status = 200, description = "Command accepted by the backend", body = AcceptedCommand),
        (status = 409, description = "Another command is in flight", body = ErrorResponse),
        (status = 502, description = "Backend rejected or could not be reached", body = ErrorResponse)
    ),
    tag = "commands"
)]
pub async fn dispatch(
    State(state): State<AppState>,
    Json(command): Json<Command>,
) -> ApiResult<Json<AcceptedCommand>> {
    let accepted = state.dispatcher.submit(command).await?;
    Ok(Json(accepted))
}

#[utoipa::path(
    post,
    path = "/api/controls",
    request_body = ControlRequest,
    responses(
        (status = 200, description = "Command accepted by the backend", body = AcceptedCommand),
        (status = 400, description = "The press has nothing to send", body = ErrorResponse),
        (status = 409, description = "Another command is in flight", body = ErrorResponse),
        (status = 502, description = "Backend rejected or could not be reached", body = ErrorResponse)
    ),
    tag = "commands"
)]
pub async fn press_control(
    State(state): State<AppState>,
    Json(request): Json<ControlRequest>,
) -> ApiResult<Json<AcceptedCommand>> {
    let kind = request.kind;
    let command = ControlPanel::from(request)
        .command_for(kind)
        .ok_or(ApiError::Validation("start_time_required"))?;
    let accepted = state.dispatcher.submit(command).await?;
    Ok(Json(accepted))
}

#[utoipa::path(
    get,
    path = "/api/commands/state",
    responses(
        (status = 200, description = "Whether a command is in flight", body = DispatchStateResponse)
    ),
    tag = "commands"
)]
pub async fn dispatch_state(State(state): State<AppState>) -> Json<DispatchStateResponse> {
    Json(DispatchStateResponse {
        in_flight: state.dispatcher.state().is_in_flight(),
    })
}
