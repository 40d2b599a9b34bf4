use std::env;

use serde::{Deserialize, Serialize};

use self::api::ApiConfig;
use self::capture::CaptureConfig;
use self::hotkeys::HotkeyProfile;
use self::notification::NotificationConfig;
use self::ui::UiConfig;

pub mod api;
pub mod capture;
pub mod hotkeys;
pub mod notification;
pub mod ui;

fn default_hotkey_poll_ms() -> u64 {
    50
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("No hotkey profiles configured")]
    NoProfiles,

    #[error("Profile '{profile}' uses unknown provider '{provider}'")]
    UnknownProvider { profile: String, provider: String },

    #[error("Profile '{0}' has an empty hotkey")]
    EmptyHotkey(String),

    #[error("JPEG quality must be within 1..=100, got {0}")]
    InvalidJpegQuality(u8),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default = "hotkeys::default_profiles")]
    pub hotkeys: Vec<HotkeyProfile>,
    pub notification: NotificationConfig,
    pub capture: CaptureConfig,
    pub ui: UiConfig,

    /// Hotkey listener poll interval
    #[serde(default = "default_hotkey_poll_ms")]
    pub hotkey_poll_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            hotkeys: hotkeys::default_profiles(),
            notification: NotificationConfig::default(),
            capture: CaptureConfig::default(),
            ui: UiConfig::default(),
            hotkey_poll_ms: default_hotkey_poll_ms(),
        }
    }
}

impl Config {
    /// Pull secrets and tunables from the environment
    pub fn apply_env(&mut self) {
        self.api.apply_env();

        if let Some(poll) = env::var("HOTKEY_POLL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.hotkey_poll_ms = poll;
        }
    }

    /// Provider name a profile resolves to
    pub fn provider_for<'a>(&'a self, profile: &'a HotkeyProfile) -> &'a str {
        profile
            .provider
            .as_deref()
            .unwrap_or(&self.api.default_provider)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hotkeys.is_empty() {
            return Err(ConfigError::NoProfiles);
        }

        if self.capture.jpeg_quality == 0 || self.capture.jpeg_quality > 100 {
            return Err(ConfigError::InvalidJpegQuality(self.capture.jpeg_quality));
        }

        for profile in &self.hotkeys {
            if profile.hotkey.trim().is_empty() {
                return Err(ConfigError::EmptyHotkey(profile.name.clone()));
            }

            let provider = self.provider_for(profile);
            if self.api.provider(provider).is_none() {
                return Err(ConfigError::UnknownProvider {
                    profile: profile.name.clone(),
                    provider: provider.to_string(),
                });
            }
        }

        Ok(())
    }
}
