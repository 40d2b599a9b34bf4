/// Capability to pull a freshly shown window in front of whatever had focus
/// when the hotkey fired. Implemented by the UI layer per platform.
pub trait Foreground {
    /// Returns whether the window ended up focused
    fn bring_to_front(&self) -> bool;
}
