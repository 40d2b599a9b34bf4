use glimpse_core::Foreground;

/// Native side of a slint window, able to steal focus from the app that was
/// active when the hotkey fired
pub struct NativeWindow<'a>(pub &'a slint::Window);

#[cfg(windows)]
impl Foreground for NativeWindow<'_> {
    fn bring_to_front(&self) -> bool {
        use raw_window_handle::{HasWindowHandle, RawWindowHandle};
        use windows::Win32::Foundation::HWND;
        use windows::Win32::UI::WindowsAndMessaging::{
            BringWindowToTop, SW_SHOW, SetForegroundWindow, ShowWindow,
        };

        let handle = self.0.window_handle();
        let Ok(handle) = handle.window_handle() else {
            return false;
        };
        let RawWindowHandle::Win32(win32) = handle.as_raw() else {
            return false;
        };
        let hwnd = HWND(win32.hwnd.get() as *mut core::ffi::c_void);

        unsafe {
            let _ = ShowWindow(hwnd, SW_SHOW);
            let _ = BringWindowToTop(hwnd);
            SetForegroundWindow(hwnd).as_bool()
        }
    }
}

#[cfg(not(windows))]
impl Foreground for NativeWindow<'_> {
    fn bring_to_front(&self) -> bool {
        // Window managers here raise newly shown windows themselves
        self.0.is_visible()
    }
}

/// Raise a window and log when the platform refuses
pub(crate) fn raise(window: &slint::Window, what: &str) {
    if !NativeWindow(window).bring_to_front() {
        tracing::debug!("Could not bring {what} to the foreground");
    }
}
