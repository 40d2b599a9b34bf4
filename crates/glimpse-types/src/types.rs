/// Events flowing into the app's main loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A registered hotkey fired; `profile` indexes `Config::hotkeys`
    HotkeyPressed { profile: usize },
    Shutdown,
}

/// One step of a streaming model reply.
///
/// `Text` always carries the whole reply received so far, not a delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamUpdate {
    Text(String),
    Failed(String),
    Done,
}

impl StreamUpdate {
    /// True for the two variants that end a stream
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamUpdate::Failed(_) | StreamUpdate::Done)
    }
}
