use serde::{Deserialize, Serialize};

fn default_all_monitors() -> bool {
    true
}

fn default_jpeg_quality() -> u8 {
    85
}

fn default_highlight_color() -> [u8; 3] {
    [255, 0, 0]
}

fn default_highlight_thickness() -> u32 {
    3
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CaptureConfig {
    /// Stitch every monitor into one virtual desktop image
    #[serde(default = "default_all_monitors")]
    pub all_monitors: bool,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    /// RGB outline color for highlight boxes
    #[serde(default = "default_highlight_color")]
    pub highlight_color: [u8; 3],
    #[serde(default = "default_highlight_thickness")]
    pub highlight_thickness: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            all_monitors: default_all_monitors(),
            jpeg_quality: default_jpeg_quality(),
            highlight_color: default_highlight_color(),
            highlight_thickness: default_highlight_thickness(),
        }
    }
}
