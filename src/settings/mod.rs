//! Settings for reality-link
//!
//! Values come from built-in defaults, then an optional TOML file, then the
//! environment. Command line flags are applied last by the binary.

use std::path::Path;

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::crypto::x25519::DEFAULT_XRAY_BIN;
use crate::relay::scp::{DEFAULT_REMOTE_CONFIG_PATH, DEFAULT_SSH_USER};
use crate::relay::telegram::DEFAULT_API_BASE;
use crate::utils::system::get_env;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings file {path}: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

fn default_name() -> String {
    "reality-443".to_string()
}

fn default_fingerprint() -> String {
    "chrome".to_string()
}

fn default_png() -> String {
    "vless.png".to_string()
}

fn default_out_dir() -> String {
    "generated".to_string()
}

fn default_remote_config_path() -> String {
    DEFAULT_REMOTE_CONFIG_PATH.to_string()
}

fn default_ssh_user() -> String {
    DEFAULT_SSH_USER.to_string()
}

fn default_xray_bin() -> String {
    DEFAULT_XRAY_BIN.to_string()
}

fn default_telegram_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Link remark, placed in the URI fragment
    #[serde(default = "default_name")]
    pub name: String,
    /// uTLS fingerprint (`fp=`)
    #[serde(default = "default_fingerprint")]
    pub fingerprint: String,
    /// PNG path for the `qr` command
    #[serde(default = "default_png")]
    pub out: String,
    /// Output directory for the `generate` command
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
    /// PNG file name inside `out_dir`
    #[serde(default = "default_png")]
    pub out_png: String,
    #[serde(default = "default_remote_config_path")]
    pub remote_config_path: String,
    #[serde(default = "default_ssh_user")]
    pub ssh_user: String,
    #[serde(default = "default_xray_bin")]
    pub xray_bin: String,
    #[serde(default = "default_telegram_api_base")]
    pub telegram_api_base: String,
    #[serde(default)]
    pub telegram_bot_token: String,
    #[serde(default)]
    pub telegram_chat_id: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            name: default_name(),
            fingerprint: default_fingerprint(),
            out: default_png(),
            out_dir: default_out_dir(),
            out_png: default_png(),
            remote_config_path: default_remote_config_path(),
            ssh_user: default_ssh_user(),
            xray_bin: default_xray_bin(),
            telegram_api_base: default_telegram_api_base(),
            telegram_bot_token: String::new(),
            telegram_chat_id: String::new(),
        }
    }
}

impl Settings {
    pub fn load_from_content(content: &str, origin: &str) -> Result<Self, SettingsError> {
        toml::from_str(content).map_err(|source| SettingsError::Toml {
            path: origin.to_string(),
            source,
        })
    }

    pub fn load_from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        debug!("Loaded settings from {}", path.display());
        Self::load_from_content(&content, &path.display().to_string())
    }

    /// Defaults, overlaid with `path` when given, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut settings = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Settings::default(),
        };
        settings.apply_env_with(get_env);
        Ok(settings)
    }

    /// Apply `XRAY_BIN`, `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID`; empty
    /// values leave the setting alone.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> String,
    {
        let targets = [
            ("XRAY_BIN", &mut self.xray_bin),
            ("TELEGRAM_BOT_TOKEN", &mut self.telegram_bot_token),
            ("TELEGRAM_CHAT_ID", &mut self.telegram_chat_id),
        ];
        for (var, target) in targets {
            let value = lookup(var);
            if !value.is_empty() {
                *target = value;
            }
        }
    }

    /// Telegram delivery is enabled only with both a token and a chat id
    pub fn telegram_enabled(&self) -> bool {
        !self.telegram_bot_token.is_empty() && !self.telegram_chat_id.is_empty()
    }
}
