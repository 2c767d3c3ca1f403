//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Signal detector tuning
    #[serde(default)]
    pub detectors: DetectorConfig,

    /// Host-side session handling
    #[serde(default)]
    pub session: SessionConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Signal detector tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Trimmed user messages shorter than this are never flagged off-topic
    #[serde(default = "default_off_topic_min_chars")]
    pub off_topic_min_chars: usize,

    /// Maximum length (in characters) of an objection excerpt kept in memory
    #[serde(default = "default_objection_excerpt_chars")]
    pub objection_excerpt_chars: usize,
}

fn default_off_topic_min_chars() -> usize {
    20
}

fn default_objection_excerpt_chars() -> usize {
    120
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            off_topic_min_chars: default_off_topic_min_chars(),
            objection_excerpt_chars: default_objection_excerpt_chars(),
        }
    }
}

/// Session lifetime thresholds used by the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Inactivity after which a session is evicted as abandoned
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// Inactivity after which a new message counts as re-engagement
    #[serde(default = "default_reengage_after_secs")]
    pub reengage_after_secs: u64,

    /// Maximum number of live sessions held by the host
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// How often the background task looks for idle sessions
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

fn default_idle_timeout_secs() -> u64 {
    1800 // 30 minutes
}

fn default_reengage_after_secs() -> u64 {
    300 // 5 minutes
}

fn default_max_sessions() -> usize {
    1000
}

fn default_cleanup_interval_secs() -> u64 {
    60
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout_secs(),
            reengage_after_secs: default_reengage_after_secs(),
            max_sessions: default_max_sessions(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON log lines
    #[serde(default)]
    pub log_json: bool,

    /// Port for the Prometheus scrape endpoint; metrics are only recorded
    /// in-process when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_port: None,
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_detectors()?;
        self.validate_session()?;
        self.validate_observability()?;
        Ok(())
    }

    fn validate_detectors(&self) -> Result<(), ConfigError> {
        let detectors = &self.detectors;

        if !(1..=500).contains(&detectors.off_topic_min_chars) {
            return Err(ConfigError::InvalidValue {
                field: "detectors.off_topic_min_chars".to_string(),
                message: format!(
                    "Must be between 1 and 500, got {}",
                    detectors.off_topic_min_chars
                ),
            });
        }

        if !(16..=1000).contains(&detectors.objection_excerpt_chars) {
            return Err(ConfigError::InvalidValue {
                field: "detectors.objection_excerpt_chars".to_string(),
                message: format!(
                    "Must be between 16 and 1000, got {}",
                    detectors.objection_excerpt_chars
                ),
            });
        }

        Ok(())
    }

    fn validate_session(&self) -> Result<(), ConfigError> {
        let session = &self.session;

        if session.idle_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.idle_timeout_secs".to_string(),
                message: "Must be greater than zero".to_string(),
            });
        }

        if session.max_sessions == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.max_sessions".to_string(),
                message: "Must be greater than zero".to_string(),
            });
        }

        if session.cleanup_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.cleanup_interval_secs".to_string(),
                message: "Must be greater than zero".to_string(),
            });
        }

        if session.reengage_after_secs >= session.idle_timeout_secs {
            return Err(ConfigError::InvalidValue {
                field: "session.reengage_after_secs".to_string(),
                message: format!(
                    "Must be below idle_timeout_secs ({}), got {}",
                    session.idle_timeout_secs, session.reengage_after_secs
                ),
            });
        }

        Ok(())
    }

    fn validate_observability(&self) -> Result<(), ConfigError> {
        let level = self.observability.log_level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "observability.log_level".to_string(),
                message: format!("Unknown level '{}'", self.observability.log_level),
            });
        }
        Ok(())
    }
}

/// Load settings from `config/` in the working directory and the environment
///
/// Priority: env vars (`ONBOARDING__SECTION__KEY`) > `config/{env}` >
/// `config/default` > built-in defaults.
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// Load settings from a specific config directory
pub fn load_settings_from(dir: &Path, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    // Load default config
    builder = builder.add_source(File::from(dir.join("default")).required(false));

    // Load environment-specific config
    if let Some(env_name) = env {
        builder = builder.add_source(File::from(dir.join(env_name)).required(false));
    }

    // Load from environment variables
    builder = builder.add_source(
        Environment::with_prefix("ONBOARDING")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;
    tracing::debug!(?settings, "Settings loaded");

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.detectors.off_topic_min_chars, 20);
        assert_eq!(settings.detectors.objection_excerpt_chars, 120);
        assert_eq!(settings.session.idle_timeout_secs, 1800);
        assert_eq!(settings.session.max_sessions, 1000);
        assert!(settings.observability.metrics_port.is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_detector_validation() {
        let mut settings = Settings::default();
        settings.detectors.off_topic_min_chars = 0;
        assert!(settings.validate().is_err());

        settings.detectors.off_topic_min_chars = 10;
        settings.detectors.objection_excerpt_chars = 4;
        assert!(settings.validate().is_err());

        settings.detectors.objection_excerpt_chars = 64;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_reengage_must_precede_timeout() {
        let mut settings = Settings::default();
        settings.session.reengage_after_secs = settings.session.idle_timeout_secs;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("session.reengage_after_secs"));
    }

    #[test]
    fn test_session_limits_validation() {
        let mut settings = Settings::default();
        settings.session.max_sessions = 0;
        assert!(settings.validate().is_err());

        settings.session.max_sessions = 10;
        settings.session.cleanup_interval_secs = 0;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("session.cleanup_interval_secs"));
    }

    #[test]
    fn test_log_level_validation() {
        let mut settings = Settings::default();
        settings.observability.log_level = "loud".to_string();
        assert!(settings.validate().is_err());
        settings.observability.log_level = "DEBUG".to_string();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.yaml"),
            "detectors:\n  off_topic_min_chars: 32\nobservability:\n  log_json: true\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("staging.yaml"),
            "session:\n  idle_timeout_secs: 600\n  reengage_after_secs: 120\n",
        )
        .unwrap();

        let settings = load_settings_from(dir.path(), Some("staging")).unwrap();
        assert_eq!(settings.detectors.off_topic_min_chars, 32);
        assert_eq!(settings.detectors.objection_excerpt_chars, 120);
        assert_eq!(settings.session.idle_timeout_secs, 600);
        assert_eq!(settings.session.reengage_after_secs, 120);
        assert!(settings.observability.log_json);
    }

    #[test]
    fn test_missing_directory_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(&dir.path().join("absent"), None).unwrap();
        assert_eq!(settings.session.reengage_after_secs, 300);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.yaml"),
            "session:\n  idle_timeout_secs: 60\n  reengage_after_secs: 90\n",
        )
        .unwrap();
        assert!(matches!(
            load_settings_from(dir.path(), None),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
