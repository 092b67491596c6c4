use super::types::{Command, CommandKind, CommandParams};

/// Operator form state behind the simulation controls.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPanel {
    /// Raw text of the start-time field; empty means unset.
    pub start_time: String,
    pub step_size_seconds: f64,
    pub replay_speed: f64,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            start_time: String::new(),
            step_size_seconds: 1.0,
            replay_speed: 1.0,
        }
    }
}

impl ControlPanel {
    fn start_time(&self) -> Option<String> {
        let trimmed = self.start_time.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// Builds the command a control press would send, or `None` when the press
    /// has nothing to send (setting an empty start time).
    pub fn command_for(&self, kind: CommandKind) -> Option<Command> {
        let parameters = match kind {
            // Transport controls carry the whole form.
            CommandKind::Start | CommandKind::Pause | CommandKind::Stop => CommandParams {
                start_time: self.start_time(),
                step_size_seconds: Some(self.step_size_seconds),
                replay_speed: Some(self.replay_speed),
            },
            CommandKind::SetStartTime => CommandParams {
                start_time: Some(self.start_time()?),
                ..CommandParams::default()
            },
            CommandKind::SetStepSize => CommandParams {
                step_size_seconds: Some(self.step_size_seconds),
                ..CommandParams::default()
            },
            CommandKind::SetReplaySpeed => CommandParams {
                replay_speed: Some(self.replay_speed),
                ..CommandParams::default()
            },
        };
        Some(Command::new(kind, parameters))
    }
}
