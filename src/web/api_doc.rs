use utoipa::OpenApi;

use super::api::commands::{ControlRequest, DispatchStateResponse};
use super::api::error::ErrorResponse;
use super::api::scene::SceneResponse;
use super::api::telemetry::TelemetryResponse;
use crate::command::{AcceptedCommand, Command, CommandKind, CommandParams};
use crate::scene::{Cartesian3, Entity, MarkerStyle, Rgba};
use crate::telemetry::{PollStatus, Publication, TelemetrySnapshot};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::telemetry::latest,
        super::api::scene::entities,
        super::api::commands::dispatch,
        super::api::commands::press_control,
        super::api::commands::dispatch_state,
    ),
    components(
        schemas(
            TelemetryResponse,
            TelemetrySnapshot,
            Publication,
            PollStatus,
            SceneResponse,
            Entity,
            Cartesian3,
            MarkerStyle,
            Rgba,
            Command,
            CommandKind,
            CommandParams,
            AcceptedCommand,
            ControlRequest,
            DispatchStateResponse,
            ErrorResponse,
        )
    ),
    info(
        title = "Satellite Dashboard API",
        description = "Live telemetry, scene state and simulation control",
        version = "0.1.0"
    ),
    tags(
        (name = "telemetry", description = "Polled telemetry"),
        (name = "scene", description = "Globe entities"),
        (name = "commands", description = "Simulation control")
    )
)]
pub struct ApiDoc;
