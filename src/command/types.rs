use chrono::DateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    ToSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum CommandKind {
    Start,
    Pause,
    Stop,
    SetStartTime,
    SetStepSize,
    SetReplaySpeed,
}

impl CommandKind {
    /// Parameter keys the backend reads for this kind.
    pub fn accepted_keys(&self) -> &'static [&'static str] {
        match self {
            CommandKind::Start | CommandKind::Pause | CommandKind::Stop => {
                &["start_time", "step_size_seconds", "replay_speed"]
            }
            CommandKind::SetStartTime => &["start_time"],
            CommandKind::SetStepSize => &["step_size_seconds"],
            CommandKind::SetReplaySpeed => &["replay_speed"],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CommandParams {
    /// ISO-8601 simulation start instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_size_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replay_speed: Option<f64>,
}

impl CommandParams {
    fn present_keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.start_time.is_some() {
            keys.push("start_time");
        }
        if self.step_size_seconds.is_some() {
            keys.push("step_size_seconds");
        }
        if self.replay_speed.is_some() {
            keys.push("replay_speed");
        }
        keys
    }
}

/// A control command. Serializes flat: `{"command": kind, ...parameters}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Command {
    pub command: CommandKind,
    #[serde(flatten)]
    pub parameters: CommandParams,
}

impl Command {
    pub fn new(command: CommandKind, parameters: CommandParams) -> Self {
        Self {
            command,
            parameters,
        }
    }

    /// Problems the backend is likely to reject. Nothing here blocks submission.
    pub fn advisories(&self) -> Vec<String> {
        let mut advisories = Vec::new();
        let params = &self.parameters;

        if self.command == CommandKind::SetStartTime && params.start_time.is_none() {
            advisories.push("set_start_time without a start_time".to_string());
        }
        if let Some(start_time) = &params.start_time {
            if DateTime::parse_from_rfc3339(start_time.trim()).is_err() {
                advisories.push(format!("start_time {:?} is not ISO-8601", start_time));
            }
        }
        if self.command == CommandKind::SetStepSize && params.step_size_seconds.is_none() {
            advisories.push("set_step_size without step_size_seconds".to_string());
        }
        if self.command == CommandKind::SetReplaySpeed && params.replay_speed.is_none() {
            advisories.push("set_replay_speed without replay_speed".to_string());
        }
        if let Some(step) = params.step_size_seconds {
            if !(step > 0.0) {
                advisories.push(format!("step_size_seconds must be positive, got {}", step));
            }
        }
        if let Some(speed) = params.replay_speed {
            if !(speed > 0.0) {
                advisories.push(format!("replay_speed must be positive, got {}", speed));
            }
        }

        let accepted = self.command.accepted_keys();
        for key in params.present_keys() {
            if !accepted.contains(&key) {
                advisories.push(format!("{} is ignored by {}", key, self.command));
            }
        }
        advisories
    }
}

/// The backend's record of an accepted command, passed back verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AcceptedCommand {
    pub id: i64,
    pub command: String,
    #[schema(value_type = Object)]
    pub parameters: serde_json::Map<String, serde_json::Value>,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_flat_and_omits_absent_parameters() {
        let command = Command::new(
            CommandKind::SetStepSize,
            CommandParams {
                step_size_seconds: Some(2.5),
                ..CommandParams::default()
            },
        );
        assert_eq!(
            serde_json::to_value(&command).unwrap(),
            json!({"command": "set_step_size", "step_size_seconds": 2.5})
        );
        assert_eq!(
            serde_json::to_value(Command::new(CommandKind::Pause, CommandParams::default())).unwrap(),
            json!({"command": "pause"})
        );
    }

    #[test]
    fn parses_flat_request_bodies() {
        let command: Command = serde_json::from_value(json!({
            "command": "start",
            "start_time": "2026-01-27T12:00:00Z",
            "replay_speed": 4.0
        }))
        .unwrap();
        assert_eq!(command.command, CommandKind::Start);
        assert_eq!(
            command.parameters.start_time.as_deref(),
            Some("2026-01-27T12:00:00Z")
        );
        assert_eq!(command.parameters.replay_speed, Some(4.0));
        assert_eq!(command.parameters.step_size_seconds, None);
    }

    #[test]
    fn kind_names_match_the_wire() {
        assert_eq!(CommandKind::SetReplaySpeed.to_string(), "set_replay_speed");
        assert_eq!(CommandKind::Start.as_ref(), "start");
    }

    #[test]
    fn advisories_flag_but_do_not_reject() {
        let bare = |kind| Command::new(kind, CommandParams::default());
        assert!(bare(CommandKind::Stop).advisories().is_empty());
        assert_eq!(bare(CommandKind::SetStartTime).advisories().len(), 1);

        let bad = Command::new(
            CommandKind::SetReplaySpeed,
            CommandParams {
                replay_speed: Some(0.0),
                step_size_seconds: Some(1.0),
                start_time: Some("yesterday".to_string()),
            },
        );
        let advisories = bad.advisories();
        assert!(advisories.iter().any(|a| a.contains("replay_speed must be positive")));
        assert!(advisories.iter().any(|a| a.contains("not ISO-8601")));
        assert!(advisories
            .iter()
            .any(|a| a.contains("step_size_seconds is ignored by set_replay_speed")));
    }

    #[test]
    fn accepted_command_keeps_backend_fields() {
        let body = json!({
            "id": 7,
            "command": "set_step_size",
            "parameters": {"step_size_seconds": 2},
            "created_at": "2026-01-27T12:00:01.123456+00:00"
        });
        let accepted: AcceptedCommand = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(serde_json::to_value(&accepted).unwrap(), body);
    }
}
