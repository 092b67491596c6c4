use std::sync::Arc;

use crate::backend::CommandClient;
use crate::command::CommandDispatcher;
use crate::scene::SharedScene;
use crate::telemetry::TelemetryView;

#[derive(Clone)]
pub struct AppState {
    pub telemetry: TelemetryView,
    pub scene: SharedScene,
    pub dispatcher: Arc<CommandDispatcher<CommandClient>>,
}
