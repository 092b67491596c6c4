use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::scene::{lock_scene, Entity};
use crate::web::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct SceneResponse {
    pub torn_down: bool,
    pub entities: Vec<Entity>,
}

#[utoipa::path(
    get,
    path = "/api/scene",
    responses(
        (status = 200, description = "Entities currently in the scene", body = SceneResponse)
    ),
    tag = "scene"
)]
pub async fn entities(State(state): State<AppState>) -> Json<SceneResponse> {
    let scene = lock_scene(&state.scene);
    Json(SceneResponse {
        torn_down: scene.is_torn_down(),
        entities: scene.entities(),
    })
}
