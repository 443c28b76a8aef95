//! Motash configuration system.
//!
//! Everything is read once from `~/.motash/config.toml` into [`MotashConfig`];
//! missing keys fall back to the documented defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{MotashError, Result};
use crate::report::DEFAULT_REPORT_FORMAT;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "MOTASH_CONFIG";

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MotashConfig {
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub environment: EnvironmentConfig,
    #[serde(default)]
    pub state: StateConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

impl MotashConfig {
    /// Load config from `MOTASH_CONFIG` or the default path, or defaults if absent.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV)
            .map(|p| PathBuf::from(shellexpand::tilde(&p).to_string()))
            .unwrap_or_else(|_| Self::default_path());
        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MotashError::Config(format!("Failed to read config: {e}")))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| MotashError::Config(format!("Failed to parse config: {e}")))
    }

    /// Save config to the given path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| MotashError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the Motash home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".motash")
    }
}

/// Audit rules. Keys keep the names used by existing Motash deployments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuditConfig {
    /// Check tasks directly in the scheduler's root folder.
    #[serde(default)]
    pub check_root_tasks: bool,
    /// Case-insensitive regex matched against top-level folder names.
    #[serde(default)]
    pub root_folder_pattern: String,
    /// Line template for text reports.
    #[serde(default = "default_report_format")]
    pub report_format: String,
}

fn default_report_format() -> String { DEFAULT_REPORT_FORMAT.into() }

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            check_root_tasks: false,
            root_folder_pattern: String::new(),
            report_format: default_report_format(),
        }
    }
}

/// Where task data comes from.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SourceConfig {
    /// JSON export of the scheduler folder tree.
    #[serde(default)]
    pub snapshot_path: Option<String>,
}

/// Host precondition checks.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EnvironmentConfig {
    /// Treat OS version and scheduler service checks as passed.
    #[serde(default)]
    pub skip_host_checks: bool,
}

/// Watermark persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    #[serde(default = "default_state_path")]
    pub path: String,
}

fn default_state_path() -> String { "~/.motash/state.json".into() }

impl Default for StateConfig {
    fn default() -> Self {
        Self { path: default_state_path() }
    }
}

impl StateConfig {
    pub fn expanded_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.path).to_string())
    }
}

/// Declared notifiers. A section that is present and enabled registers one notifier.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NotifyConfig {
    #[serde(default)]
    pub log: Option<LogNotifyConfig>,
    #[serde(default)]
    pub webhook: Option<WebhookNotifyConfig>,
    #[serde(default)]
    pub telegram: Option<TelegramNotifyConfig>,
    #[serde(default)]
    pub discord: Option<DiscordNotifyConfig>,
    #[serde(default)]
    pub email: Option<EmailNotifyConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogNotifyConfig {
    #[serde(default = "bool_true")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookNotifyConfig {
    #[serde(default = "bool_true")]
    pub enabled: bool,
    pub url: String,
    #[serde(default)]
    pub headers: Vec<(String, String)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramNotifyConfig {
    #[serde(default = "bool_true")]
    pub enabled: bool,
    pub bot_token: String,
    /// Falls back to `MOTASH_NOTIFY_TELEGRAM_CHAT_ID` when empty.
    #[serde(default)]
    pub chat_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordNotifyConfig {
    #[serde(default = "bool_true")]
    pub enabled: bool,
    pub webhook_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailNotifyConfig {
    #[serde(default = "bool_true")]
    pub enabled: bool,
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub from: String,
    pub to: Vec<String>,
}

fn bool_true() -> bool { true }
fn default_smtp_port() -> u16 { 587 }
