use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use outline_core::Timings;
use outline_engine::{Vocabulary, MIN_TIMER_DELAY};
use outline_logging::{outline_info, outline_warn};
use serde::{Deserialize, Serialize};

use super::logging::LogDestination;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Timer delays in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingsConfig {
    pub initial_scan_ms: u64,
    pub debounce_ms: u64,
    pub fallback_ms: u64,
    pub empty_check_ms: u64,
    pub keep_alive_ms: u64,
    pub highlight_ms: u64,
}

impl Default for TimingsConfig {
    fn default() -> Self {
        let timings = Timings::default();
        Self {
            initial_scan_ms: millis(timings.initial_scan),
            debounce_ms: millis(timings.debounce),
            fallback_ms: millis(timings.fallback),
            empty_check_ms: millis(timings.empty_check),
            keep_alive_ms: millis(timings.keep_alive),
            highlight_ms: millis(timings.highlight),
        }
    }
}

impl TimingsConfig {
    pub fn to_timings(self) -> Timings {
        Timings {
            initial_scan: Duration::from_millis(self.initial_scan_ms),
            debounce: Duration::from_millis(self.debounce_ms),
            fallback: periodic("fallback_ms", self.fallback_ms),
            empty_check: periodic("empty_check_ms", self.empty_check_ms),
            keep_alive: periodic("keep_alive_ms", self.keep_alive_ms),
            highlight: Duration::from_millis(self.highlight_ms),
        }
    }
}

/// Timers that re-arm themselves need a non-zero period.
fn periodic(name: &str, value_ms: u64) -> Duration {
    let delay = Duration::from_millis(value_ms);
    if delay < MIN_TIMER_DELAY {
        outline_warn!(
            "{} = {} is too short for a repeating timer; using {:?}",
            name,
            value_ms,
            MIN_TIMER_DELAY
        );
        return MIN_TIMER_DELAY;
    }
    delay
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub timings: TimingsConfig,
    pub extra_ui_keywords: Vec<String>,
    pub extra_user_classes: Vec<String>,
    /// Site-specific transcript containers, probed before the built-in list.
    pub extra_container_selectors: Vec<String>,
    pub log: Option<LogDestination>,
}

impl AppConfig {
    pub fn vocabulary(&self) -> Vocabulary {
        let mut vocabulary = Vocabulary::default();
        vocabulary
            .ui_keywords
            .extend(self.extra_ui_keywords.iter().cloned());
        vocabulary
            .user_classes
            .extend(self.extra_user_classes.iter().cloned());
        let builtin = std::mem::take(&mut vocabulary.container_selectors);
        vocabulary.container_selectors = self
            .extra_container_selectors
            .iter()
            .cloned()
            .chain(builtin)
            .collect();
        vocabulary
    }
}

pub fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the config at `path`. A missing file means defaults; a broken one
/// is reported and also falls back to defaults.
pub fn load_config(path: Option<&Path>) -> AppConfig {
    let Some(path) = path else {
        return AppConfig::default();
    };
    match read_config(path) {
        Ok(config) => {
            outline_info!("Loaded config from {:?}", path);
            config
        }
        Err(ConfigError::Read { source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            outline_info!("No config at {:?}; using defaults", path);
            AppConfig::default()
        }
        Err(err) => {
            outline_warn!("{}: {}; using defaults", err, error_detail(&err));
            AppConfig::default()
        }
    }
}

fn error_detail(err: &ConfigError) -> String {
    match err {
        ConfigError::Read { source, .. } => source.to_string(),
        ConfigError::Parse { source, .. } => source.to_string(),
    }
}
