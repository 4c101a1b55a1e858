//! Application configuration.

use crate::error::{AppError, AppResult};
use etfmm_quoter::QuoterConfig;
use serde::{Deserialize, Serialize};

/// Path value meaning stdin/stdout.
pub const STDIO: &str = "-";

/// Replay input/output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// JSON-lines venue events. `-` or unset reads stdin.
    #[serde(default)]
    pub input: Option<String>,

    /// JSON-lines order commands. `-` or unset writes stdout.
    #[serde(default)]
    pub output: Option<String>,

    /// Capacity of the channel between the reader and the engine task.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_channel_capacity() -> usize {
    1024
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl ReplayConfig {
    /// Input path, or `None` for stdin.
    pub fn input_path(&self) -> Option<&str> {
        self.input.as_deref().filter(|p| *p != STDIO)
    }

    /// Output path, or `None` for stdout.
    pub fn output_path(&self) -> Option<&str> {
        self.output.as_deref().filter(|p| *p != STDIO)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Update Prometheus collectors while replaying.
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,

    /// Write the Prometheus text exposition here when the replay ends.
    #[serde(default)]
    pub metrics_output: Option<String>,
}

fn default_metrics_enabled() -> bool {
    true
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: default_metrics_enabled(),
            metrics_output: None,
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub quoter: QuoterConfig,

    #[serde(default)]
    pub replay: ReplayConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        self.quoter.validate()?;
        if self.replay.channel_capacity == 0 {
            return Err(AppError::Config(
                "replay.channel_capacity must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Override replay paths from the command line.
    pub fn with_paths(mut self, input: Option<String>, output: Option<String>) -> Self {
        if input.is_some() {
            self.replay.input = input;
        }
        if output.is_some() {
            self.replay.output = output;
        }
        self
    }
}
