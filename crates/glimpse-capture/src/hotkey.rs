use std::time::Duration;

use anyhow::{Context, Result};
use global_hotkey::{
    GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState,
    hotkey::HotKey,
};

/// Parse accelerator strings such as `ctrl+shift+1`, rejecting duplicates
pub fn parse_hotkeys<'a>(accelerators: impl IntoIterator<Item = &'a str>) -> Result<Vec<HotKey>> {
    let mut parsed: Vec<HotKey> = Vec::new();

    for accelerator in accelerators {
        let hotkey: HotKey = accelerator
            .parse()
            .with_context(|| format!("Invalid hotkey '{accelerator}'"))?;

        anyhow::ensure!(
            !parsed.iter().any(|h| h.id() == hotkey.id()),
            "Hotkey '{accelerator}' is bound to more than one profile"
        );
        parsed.push(hotkey);
    }

    Ok(parsed)
}

/// Hotkey ids mapped to profile indices. Cheap to clone and `Send`, so a
/// listener thread can match events while the manager stays put.
#[derive(Debug, Clone, Default)]
pub struct HotkeyBindings {
    ids: Vec<u32>,
}

impl HotkeyBindings {
    pub fn from_hotkeys(hotkeys: &[HotKey]) -> Self {
        Self {
            ids: hotkeys.iter().map(HotKey::id).collect(),
        }
    }

    /// Profile index bound to a hotkey id
    pub fn profile_for(&self, id: u32) -> Option<usize> {
        self.ids.iter().position(|&bound| bound == id)
    }

    /// Profile whose hotkey was pressed, if any event is pending (non-blocking)
    pub fn poll(&self) -> Option<usize> {
        let receiver = GlobalHotKeyEvent::receiver();
        while let Ok(event) = receiver.try_recv() {
            if let Some(profile) = self.match_event(&event) {
                return Some(profile);
            }
        }
        None
    }

    /// Like [`poll`](Self::poll) but waits up to `timeout` for an event
    pub fn wait_timeout(&self, timeout: Duration) -> Option<usize> {
        let receiver = GlobalHotKeyEvent::receiver();
        let event = receiver.recv_timeout(timeout).ok()?;
        self.match_event(&event).or_else(|| self.poll())
    }

    fn match_event(&self, event: &GlobalHotKeyEvent) -> Option<usize> {
        if event.state != HotKeyState::Pressed {
            return None;
        }
        let profile = self.profile_for(event.id);
        if profile.is_none() {
            tracing::debug!("Ignoring event for unknown hotkey id {}", event.id);
        }
        profile
    }
}

/// Owns the registered global hotkeys, one per profile.
///
/// Must be created on the thread that runs the platform event loop.
pub struct HotkeyManager {
    manager: GlobalHotKeyManager,
    hotkeys: Vec<HotKey>,
}

impl HotkeyManager {
    /// Register one hotkey per accelerator; the position is the profile index
    pub fn new<'a>(accelerators: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let hotkeys = parse_hotkeys(accelerators)?;
        let manager = GlobalHotKeyManager::new().context("Failed to create hotkey manager")?;

        manager
            .register_all(&hotkeys)
            .context("Failed to register hotkeys")?;
        tracing::info!("Registered {} hotkey(s)", hotkeys.len());

        Ok(Self { manager, hotkeys })
    }

    pub fn bindings(&self) -> HotkeyBindings {
        HotkeyBindings::from_hotkeys(&self.hotkeys)
    }
}

impl Drop for HotkeyManager {
    fn drop(&mut self) {
        let _ = self.manager.unregister_all(&self.hotkeys);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use global_hotkey::hotkey::{Code, Modifiers};

    #[test]
    fn test_parse_default_style_hotkeys() {
        let hotkeys = parse_hotkeys(["ctrl+shift+1", "ctrl+shift+2", "alt+F9"]).unwrap();
        assert_eq!(hotkeys.len(), 3);
        assert_eq!(
            hotkeys[0],
            HotKey::new(Some(Modifiers::CONTROL | Modifiers::SHIFT), Code::Digit1)
        );
        assert_eq!(hotkeys[2], HotKey::new(Some(Modifiers::ALT), Code::F9));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_hotkeys(["ctrl+shift+"]).is_err());
        assert!(parse_hotkeys(["not a hotkey"]).is_err());
    }

    #[test]
    fn test_parse_rejects_duplicates() {
        let err = parse_hotkeys(["ctrl+shift+1", "shift+ctrl+1"]).unwrap_err();
        assert!(err.to_string().contains("more than one profile"));
    }

    #[test]
    fn test_profile_lookup_by_id() {
        let hotkeys = parse_hotkeys(["ctrl+shift+1", "ctrl+shift+2"]).unwrap();
        let bindings = HotkeyBindings::from_hotkeys(&hotkeys);
        assert_eq!(bindings.profile_for(hotkeys[1].id()), Some(1));
        assert_eq!(bindings.profile_for(0xdead_beef), None);
    }
}
