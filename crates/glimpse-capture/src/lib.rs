mod capture;
mod encode;
mod hotkey;

pub use capture::{
    Capture, DesktopCapture, MonitorLayout, ScreenSource, capture_origin, capture_primary_screen,
    capture_virtual_desktop, list_monitors, virtual_bounds,
};
pub use encode::{HighlightStyle, crop, crop_and_encode, draw_highlights, encode_jpeg, to_data_url};
pub use hotkey::{HotkeyBindings, HotkeyManager, parse_hotkeys};
