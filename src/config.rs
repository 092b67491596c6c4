use serde::{Deserialize, Deserializer};
use std::time::Duration;
use thiserror::Error;

use crate::scene::{MarkerStyle, Rgba};
use crate::telemetry::OverlapPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid marker color: {0}")]
    InvalidColor(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(
        default = "default_request_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub request_timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            request_timeout: default_request_timeout(),
        }
    }
}

fn default_api_base() -> String {
    "http://127.0.0.1:8000/api".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_interval", deserialize_with = "deserialize_duration")]
    pub interval: Duration,
    #[serde(default)]
    pub overlap: OverlapPolicy,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            overlap: OverlapPolicy::default(),
        }
    }
}

fn default_interval() -> Duration {
    Duration::from_secs(1)
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneConfig {
    #[serde(default = "default_pixel_size")]
    pub marker_pixel_size: u32,
    #[serde(default = "default_color")]
    pub marker_color: String,
    #[serde(default)]
    pub sweep_missing: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            marker_pixel_size: default_pixel_size(),
            marker_color: default_color(),
            sweep_missing: false,
        }
    }
}

impl SceneConfig {
    pub fn marker_style(&self) -> Result<MarkerStyle, ConfigError> {
        let color = Rgba::from_hex(&self.marker_color)
            .ok_or_else(|| ConfigError::InvalidColor(self.marker_color.clone()))?;
        Ok(MarkerStyle {
            pixel_size: self.marker_pixel_size,
            color,
        })
    }
}

fn default_pixel_size() -> u32 {
    10
}

fn default_color() -> String {
    "#00FFFF".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    humantime::parse_duration(raw.trim()).map_err(serde::de::Error::custom)
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        // Fail on a bad color at load time rather than on first reconciliation.
        config.scene.marker_style()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.backend.api_base, "http://127.0.0.1:8000/api");
        assert_eq!(config.poll.interval, Duration::from_secs(1));
        assert_eq!(config.poll.overlap, OverlapPolicy::Allow);
        assert!(!config.scene.sweep_missing);
        assert_eq!(config.web.bind, "127.0.0.1:8080");

        let style = config.scene.marker_style().unwrap();
        assert_eq!(style.pixel_size, 10);
        assert_eq!(style.color, Rgba::new(0, 255, 255, 255));
    }

    #[test]
    fn parses_humantime_durations_and_policy() {
        let yaml = r#"
backend:
  api_base: "http://sim.local/api"
  request_timeout: "2s 500ms"
poll:
  interval: "250ms"
  overlap: skip
scene:
  sweep_missing: true
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.backend.api_base, "http://sim.local/api");
        assert_eq!(config.backend.request_timeout, Duration::from_millis(2500));
        assert_eq!(config.poll.interval, Duration::from_millis(250));
        assert_eq!(config.poll.overlap, OverlapPolicy::Skip);
        assert!(config.scene.sweep_missing);
    }

    #[test]
    fn rejects_bad_duration() {
        let yaml = "poll:\n  interval: \"soon\"\n";
        assert!(matches!(Config::from_yaml(yaml), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn rejects_bad_color() {
        let yaml = "scene:\n  marker_color: \"cyan\"\n";
        assert!(matches!(
            Config::from_yaml(yaml),
            Err(ConfigError::InvalidColor(_))
        ));
    }
}
