//! Notification-area icon

use std::mem;

use windows::Win32::Foundation::HWND;
use windows::Win32::UI::Shell::{
    NIF_ICON, NIF_MESSAGE, NIF_TIP, NIM_ADD, NIM_DELETE, NOTIFYICONDATAW, Shell_NotifyIconW,
};
use windows::Win32::UI::WindowsAndMessaging::{IDI_APPLICATION, LoadIconW};

use super::WM_TRAYICON;

const TRAY_ICON_ID: u32 = 1;
const TOOLTIP: &str = "Battery HUD";

/// Tray icon registered on the HUD window, removed on drop
pub struct TrayIcon {
    hwnd: HWND,
}

impl TrayIcon {
    pub fn add(hwnd: HWND) -> Option<Self> {
        let mut nid = notify_data(hwnd);
        nid.uFlags = NIF_ICON | NIF_MESSAGE | NIF_TIP;
        nid.uCallbackMessage = WM_TRAYICON;
        nid.hIcon = unsafe { LoadIconW(None, IDI_APPLICATION) }.unwrap_or_default();
        for (dst, src) in nid
            .szTip
            .iter_mut()
            .take(nid.szTip.len() - 1)
            .zip(TOOLTIP.encode_utf16())
        {
            *dst = src;
        }

        if !unsafe { Shell_NotifyIconW(NIM_ADD, &nid) }.as_bool() {
            return None;
        }
        tracing::debug!("tray icon added");
        Some(Self { hwnd })
    }
}

impl Drop for TrayIcon {
    fn drop(&mut self) {
        let nid = notify_data(self.hwnd);
        unsafe {
            let _ = Shell_NotifyIconW(NIM_DELETE, &nid);
        }
    }
}

fn notify_data(hwnd: HWND) -> NOTIFYICONDATAW {
    NOTIFYICONDATAW {
        cbSize: mem::size_of::<NOTIFYICONDATAW>() as u32,
        hWnd: hwnd,
        uID: TRAY_ICON_ID,
        ..Default::default()
    }
}
