use serde::{Deserialize, Serialize};

/// What a single hotkey does once the region is selected
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HotkeyProfile {
    /// Accelerator string such as `ctrl+shift+1`
    pub hotkey: String,
    /// Shown as the mode label on the selection overlay
    pub name: String,
    pub prompt: String,
    pub model: String,
    /// Provider name; `None` uses `api.default_provider`
    #[serde(default)]
    pub provider: Option<String>,
    /// Ask for highlight boxes after the crop
    #[serde(default)]
    pub draw_box: bool,
    /// Stream the reply into a live popup
    #[serde(default)]
    pub stream: bool,
}

pub fn default_profiles() -> Vec<HotkeyProfile> {
    vec![
        HotkeyProfile {
            hotkey: "ctrl+shift+1".to_string(),
            name: "Answer question".to_string(),
            prompt: "Answer the question in the image. Think briefly, then give the user the \
                     final answer wrapped in a single pair of square brackets []."
                .to_string(),
            model: "google/gemini-2.5-flash".to_string(),
            provider: None,
            draw_box: false,
            stream: false,
        },
        HotkeyProfile {
            hotkey: "ctrl+shift+2".to_string(),
            name: "Answer wordplay question".to_string(),
            prompt: "Think about and answer the wordplay or homophone question in the image. \
                     Think briefly and end your reply with the final answer wrapped in a \
                     single pair of square brackets []."
                .to_string(),
            model: "google/gemini-2.5-flash".to_string(),
            provider: None,
            draw_box: false,
            stream: false,
        },
        HotkeyProfile {
            hotkey: "ctrl+shift+3".to_string(),
            name: "Transcribe and translate".to_string(),
            prompt: "Extract all text in the selected area of this image and translate it into \
                     English. For comics, follow the reading order. First give the original \
                     text wrapped in parentheses (), then the whole translation wrapped in a \
                     single pair of square brackets [], even when there are several passages."
                .to_string(),
            model: "openai/gpt-4.1-mini".to_string(),
            provider: None,
            draw_box: false,
            stream: true,
        },
        HotkeyProfile {
            hotkey: "ctrl+shift+4".to_string(),
            name: "Explain highlighted part".to_string(),
            prompt: "Describe the content of the image concisely. If it shows a name, term or \
                     idiom, explain it. If a part of the image is highlighted with a red box, \
                     explain that part. Wrap the result in a single pair of square brackets []."
                .to_string(),
            model: "openai/gpt-4.1-mini".to_string(),
            provider: None,
            draw_box: true,
            stream: false,
        },
    ]
}
