use std::env;

use serde::{Deserialize, Serialize};

fn default_provider_name() -> String {
    "openrouter".to_string()
}

fn default_api_url() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}

fn default_api_key_env() -> String {
    "OPENROUTER_API_KEY".to_string()
}

fn default_max_tokens() -> u32 {
    32768
}

fn default_timeout_seconds() -> u64 {
    120
}

fn default_referer() -> String {
    "http://localhost".to_string()
}

fn default_app_title() -> String {
    "Screenshot Assistant".to_string()
}

/// One OpenAI-compatible chat completions endpoint
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_name")]
    pub name: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Literal key; left empty to read it from `api_key_env`
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            api_url: default_api_url(),
            api_key: String::new(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl ProviderConfig {
    /// Fill an empty key from the provider's environment variable
    pub fn resolve_key_from_env(&mut self) {
        if self.api_key.is_empty()
            && !self.api_key_env.is_empty()
            && let Ok(key) = env::var(&self.api_key_env)
        {
            self.api_key = key;
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub providers: Vec<ProviderConfig>,
    #[serde(default = "default_provider_name")]
    pub default_provider: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Sent as `HTTP-Referer`
    #[serde(default = "default_referer")]
    pub referer: String,
    /// Sent as `X-Title`
    #[serde(default = "default_app_title")]
    pub app_title: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            providers: vec![ProviderConfig::default()],
            default_provider: default_provider_name(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_timeout_seconds(),
            referer: default_referer(),
            app_title: default_app_title(),
        }
    }
}

impl ApiConfig {
    pub fn provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.name == name)
    }

    pub fn apply_env(&mut self) {
        for provider in &mut self.providers {
            provider.resolve_key_from_env();
        }

        if let Some(timeout) = env::var("GLIMPSE_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.timeout_seconds = timeout;
        }

        if let Some(max_tokens) = env::var("GLIMPSE_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.max_tokens = max_tokens;
        }
    }
}
