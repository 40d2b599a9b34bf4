use serde::{Deserialize, Serialize};

fn default_popup_width() -> u32 {
    700
}

fn default_popup_height() -> u32 {
    500
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    #[serde(default = "default_popup_width")]
    pub popup_width: u32,
    #[serde(default = "default_popup_height")]
    pub popup_height: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            popup_width: default_popup_width(),
            popup_height: default_popup_height(),
        }
    }
}
