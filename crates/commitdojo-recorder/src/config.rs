//! commitdojo configuration and recorder factory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use commitdojo_core::traits::AttemptRecorder;

use crate::http::HttpRecorder;
use crate::jsonl::JsonlRecorder;
use crate::mock::NullRecorder;

/// Where attempt records are sent.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RecorderConfig {
    /// Records are dropped.
    #[default]
    None,
    /// Records are appended to a JSON Lines file.
    Jsonl { path: PathBuf },
    /// Records are POSTed to `{base_url}/attempts`.
    Http {
        base_url: String,
        #[serde(default)]
        api_key: Option<String>,
    },
}

impl std::fmt::Debug for RecorderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecorderConfig::None => f.write_str("None"),
            RecorderConfig::Jsonl { path } => f.debug_struct("Jsonl").field("path", path).finish(),
            RecorderConfig::Http { base_url, api_key } => f
                .debug_struct("Http")
                .field("base_url", base_url)
                .field("api_key", &api_key.as_ref().map(|_| "***"))
                .finish(),
        }
    }
}

/// Top-level commitdojo configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DojoConfig {
    /// Directory searched for exercise sets.
    #[serde(default = "default_exercises_dir")]
    pub exercises_dir: PathBuf,
    /// Output directory for session reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Name attached to attempt records and reports.
    #[serde(default)]
    pub learner: Option<String>,
    /// Deadline for a single record delivery in milliseconds.
    #[serde(default = "default_recorder_timeout")]
    pub recorder_timeout_ms: u64,
    /// Attempt recorder.
    #[serde(default)]
    pub recorder: RecorderConfig,
}

fn default_exercises_dir() -> PathBuf {
    PathBuf::from("./exercises")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./commitdojo-results")
}
fn default_recorder_timeout() -> u64 {
    2000
}

impl Default for DojoConfig {
    fn default() -> Self {
        Self {
            exercises_dir: default_exercises_dir(),
            output_dir: default_output_dir(),
            learner: None,
            recorder_timeout_ms: default_recorder_timeout(),
            recorder: RecorderConfig::None,
        }
    }
}

impl DojoConfig {
    pub fn recorder_timeout(&self) -> Duration {
        Duration::from_millis(self.recorder_timeout_ms)
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Resolve env vars in a recorder config.
fn resolve_recorder_config(config: &RecorderConfig) -> RecorderConfig {
    match config {
        RecorderConfig::None => RecorderConfig::None,
        RecorderConfig::Jsonl { path } => RecorderConfig::Jsonl {
            path: PathBuf::from(resolve_env_vars(&path.to_string_lossy())),
        },
        RecorderConfig::Http { base_url, api_key } => RecorderConfig::Http {
            base_url: resolve_env_vars(base_url),
            api_key: api_key
                .as_ref()
                .map(|k| resolve_env_vars(k))
                .filter(|k| !k.is_empty()),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `commitdojo.toml` in the current directory
/// 2. `~/.config/commitdojo/config.toml`
///
/// Environment variable overrides: `COMMITDOJO_RECORDER_URL`, `COMMITDOJO_RECORDER_KEY`.
pub fn load_config() -> Result<DojoConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<DojoConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("commitdojo.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => DojoConfig::default(),
    };

    // Apply env var overrides
    if let Ok(url) = std::env::var("COMMITDOJO_RECORDER_URL") {
        let api_key = match &config.recorder {
            RecorderConfig::Http { api_key, .. } => api_key.clone(),
            _ => None,
        };
        config.recorder = RecorderConfig::Http {
            base_url: url,
            api_key,
        };
    }

    if let Ok(key) = std::env::var("COMMITDOJO_RECORDER_KEY") {
        if let RecorderConfig::Http { api_key, .. } = &mut config.recorder {
            *api_key = Some(key);
        }
    }

    config.recorder = resolve_recorder_config(&config.recorder);

    Ok(config)
}

/// Parse configuration TOML without touching the environment.
pub fn parse_config_str(content: &str) -> Result<DojoConfig> {
    Ok(toml::from_str::<DojoConfig>(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("commitdojo"))
}

/// Create a recorder instance from its configuration.
pub fn create_recorder(
    config: &RecorderConfig,
    timeout: Duration,
) -> Result<Box<dyn AttemptRecorder>> {
    match config {
        RecorderConfig::None => Ok(Box::new(NullRecorder)),
        RecorderConfig::Jsonl { path } => Ok(Box::new(JsonlRecorder::new(path.clone()))),
        RecorderConfig::Http { base_url, api_key } => {
            anyhow::ensure!(
                base_url.starts_with("http://") || base_url.starts_with("https://"),
                "recorder base_url must be an http(s) URL, got '{base_url}'"
            );
            Ok(Box::new(HttpRecorder::new(
                base_url,
                api_key.clone(),
                timeout,
            )?))
        }
    }
}
