use serde::{Deserialize, Serialize};

fn default_max_toast_chars() -> usize {
    100
}

fn default_max_toast_lines() -> usize {
    4
}

fn default_max_line_length() -> usize {
    25
}

fn default_max_attempts() -> u32 {
    20
}

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_app_name() -> String {
    "Glimpse".to_string()
}

/// Thresholds deciding between a toast and the scrollable popup
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct NotificationConfig {
    #[serde(default = "default_max_toast_chars")]
    pub max_toast_chars: usize,
    #[serde(default = "default_max_toast_lines")]
    pub max_toast_lines: usize,
    /// Characters per toast line before it is assumed to wrap
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
    /// Toast delivery attempts before falling back to the popup
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            max_toast_chars: default_max_toast_chars(),
            max_toast_lines: default_max_toast_lines(),
            max_line_length: default_max_line_length(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            app_name: default_app_name(),
        }
    }
}
