use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const REMOTE_BACKENDS: &[&str] = &["file", "firestore"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    #[serde(default = "default_feedback_delay_ms")]
    pub feedback_delay_ms: u64,
    #[serde(default = "default_capture_grace_ms")]
    pub capture_grace_ms: u64,
    /// Speech-to-text command and arguments. Every stdout line is one finalized chunk.
    #[serde(default)]
    pub speech_command: Vec<String>,
    #[serde(default)]
    pub catalog_path: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default = "default_remote_backend")]
    pub remote_backend: String,
    #[serde(default)]
    pub firestore_project: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_question_count() -> usize {
    10
}
fn default_feedback_delay_ms() -> u64 {
    2000
}
fn default_capture_grace_ms() -> u64 {
    500
}
fn default_remote_backend() -> String {
    "file".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            question_count: default_question_count(),
            feedback_delay_ms: default_feedback_delay_ms(),
            capture_grace_ms: default_capture_grace_ms(),
            speech_command: Vec::new(),
            catalog_path: None,
            user_id: None,
            id_token: None,
            remote_backend: default_remote_backend(),
            firestore_project: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("voice2career")
            .join("config.toml")
    }

    /// Clamp numeric settings and reset values that no longer name a known option.
    pub fn normalize(&mut self) {
        self.question_count = self.question_count.clamp(1, 50);
        if !REMOTE_BACKENDS.contains(&self.remote_backend.as_str()) {
            self.remote_backend = default_remote_backend();
        }
        // An empty string in the file means "signed out".
        if self.user_id.as_deref().is_some_and(|id| id.trim().is_empty()) {
            self.user_id = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.question_count, 10);
        assert_eq!(config.feedback_delay_ms, 2000);
        assert_eq!(config.capture_grace_ms, 500);
        assert!(config.speech_command.is_empty());
        assert_eq!(config.remote_backend, "file");
        assert!(config.user_id.is_none());
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
theme = "terminal-default"
user_id = "u-42"
speech_command = ["whisper-stream", "--stdout"]
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme, "terminal-default");
        assert_eq!(config.user_id.as_deref(), Some("u-42"));
        assert_eq!(config.speech_command, vec!["whisper-stream", "--stdout"]);
        assert_eq!(config.question_count, 10);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = Config::default();
        config.firestore_project = Some("demo".to_string());
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.firestore_project.as_deref(), Some("demo"));
        assert_eq!(deserialized.capture_grace_ms, config.capture_grace_ms);
    }

    #[test]
    fn test_normalize_clamps_question_count() {
        let mut config = Config::default();
        config.question_count = 0;
        config.normalize();
        assert_eq!(config.question_count, 1);

        config.question_count = 500;
        config.normalize();
        assert_eq!(config.question_count, 50);
    }

    #[test]
    fn test_normalize_unknown_backend_resets() {
        let mut config = Config::default();
        config.remote_backend = "mongo".to_string();
        config.normalize();
        assert_eq!(config.remote_backend, "file");
    }

    #[test]
    fn test_normalize_blank_user_is_signed_out() {
        let mut config = Config::default();
        config.user_id = Some("   ".to_string());
        config.normalize();
        assert!(config.user_id.is_none());
    }
}
