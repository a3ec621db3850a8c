use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CliConfig {
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
    pub release: ReleaseConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    pub socket_path: PathBuf,
    /// Do not log failed commands. Failures are still reported via exit code.
    pub suppress_errors: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            socket_path: std::env::temp_dir().join("sweeper-engine.sock"),
            suppress_errors: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    pub level: String,
    pub show_time: bool,
    pub show_target: bool,
    pub json: bool,
    pub redaction: RedactionConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            show_time: true,
            show_target: false,
            json: false,
            redaction: RedactionConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RedactionConfig {
    pub enabled: bool,
    pub patterns: Vec<RedactionPattern>,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            patterns: vec![RedactionPattern {
                name: "home".to_string(),
                regex: r"/home/[^/\s]+".to_string(),
                placeholder: "/home/<user>".to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedactionPattern {
    pub name: String,
    pub regex: String,
    pub placeholder: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReleaseConfig {
    pub owner: String,
    pub repo: String,
    pub timeout_ms: u64,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            owner: "sweeper-app".to_string(),
            repo: "sweeper".to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// Load configuration relative to the working directory.
pub fn load_config() -> Result<CliConfig, ConfigError> {
    load_from(Path::new("."))
}

fn load_from(dir: &Path) -> Result<CliConfig, ConfigError> {
    let builder = Config::builder()
        // Shared defaults
        .add_source(File::from(dir.join("sweepctl.yaml")).required(false))
        // Local override
        .add_source(File::from(dir.join(".sweepctl.yaml")).required(false))
        // Nested env vars like SWEEPCTL__ENGINE__SOCKET_PATH=/run/sweeper.sock
        .add_source(Environment::with_prefix("SWEEPCTL").separator("__"));

    builder.build()?.try_deserialize()
}
