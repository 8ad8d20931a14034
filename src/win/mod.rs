//! Windows application glue
//!
//! Owns the message loop. The HUD window procedure forwards the messages
//! the app cares about over a channel; after each dispatched message the
//! channel is drained in batches, each batch coalesced and handed to
//! `App::handle`.

mod shell;
mod tray;

use std::path::PathBuf;
use std::sync::mpsc::Receiver;

use battery_hud_core::{BatteryReader, SettingsStore, SystemBattery};
use battery_hud_overlay::platform::windows::{
    HUD_TIMER_ID, LayeredWindow, WM_HUD_POWER_CHANGED, WindowMessage, WindowTimer, wide_string,
};
use battery_hud_overlay::{HudController, OverlayConfig, OverlayPlatform, TickSource};
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, FindWindowW, GetMessageW, MB_ICONINFORMATION, MB_OK, MSG, MessageBoxW,
    TranslateMessage, WM_APP, WM_RBUTTONUP, WM_TIMER,
};
use windows::core::{PCWSTR, w};

use crate::app::{App, AppEvent, Shell, coalesce_events};
use crate::error::InitError;

pub use shell::WinShell;
pub use tray::TrayIcon;

/// Callback message of the tray icon
pub const WM_TRAYICON: u32 = WM_APP + 1;

/// Run the application until the user exits
pub fn run() -> Result<(), InitError> {
    let config = OverlayConfig::default();
    ensure_single_instance(&config.class_name)?;

    let settings = open_settings();

    let (window, messages) = LayeredWindow::create(&config)?;
    let hwnd = window.hwnd();
    let hud = HudController::new(window, WindowTimer::new(hwnd));

    let tray = TrayIcon::add(hwnd);
    if tray.is_none() {
        tracing::warn!("tray icon unavailable, the HUD still reacts to power changes");
    }

    let mut app = App::new(hud, SystemBattery, settings, WinShell::new(hwnd));
    tracing::info!("battery HUD running");

    message_loop(&mut app, &messages);

    // Remove the tray icon while the window still exists
    drop(tray);
    tracing::info!("battery HUD stopped");
    Ok(())
}

fn open_settings() -> SettingsStore {
    match SettingsStore::open_default() {
        Ok(store) => store,
        Err(e) => {
            let fallback = PathBuf::from("battery-hud-settings.toml");
            tracing::warn!(error = %e, path = ?fallback, "no per-user config dir");
            SettingsStore::at(fallback)
        }
    }
}

/// Show a message and fail if another instance owns the window class
fn ensure_single_instance(class_name: &str) -> Result<(), InitError> {
    let class = wide_string(class_name);
    let existing = unsafe { FindWindowW(PCWSTR(class.as_ptr()), PCWSTR::null()) };
    if existing.is_ok_and(|hwnd| !hwnd.is_invalid()) {
        tracing::info!("another instance is running");
        unsafe {
            MessageBoxW(
                HWND::default(),
                w!("Battery HUD is already running."),
                w!("Battery HUD"),
                MB_OK | MB_ICONINFORMATION,
            );
        }
        return Err(InitError::AlreadyRunning);
    }
    Ok(())
}

fn message_loop<P, T, B, S>(app: &mut App<P, T, B, S>, messages: &Receiver<WindowMessage>)
where
    P: OverlayPlatform,
    T: TickSource,
    B: BatteryReader,
    S: Shell,
{
    let mut msg = MSG::default();
    loop {
        // 0 = WM_QUIT, -1 = error
        let ret = unsafe { GetMessageW(&mut msg, HWND::default(), 0, 0) };
        if ret.0 <= 0 {
            break;
        }
        unsafe {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }

        // Handling an event can run a modal loop that queues more messages
        loop {
            let batch = coalesce_events(messages.try_iter().filter_map(route));
            if batch.is_empty() {
                break;
            }
            for event in batch {
                app.handle(event);
            }
        }
    }
}

/// Map a forwarded window message to an app event
fn route(message: WindowMessage) -> Option<AppEvent> {
    match message.msg {
        WM_TIMER if message.wparam == HUD_TIMER_ID => Some(AppEvent::Tick),
        WM_HUD_POWER_CHANGED => Some(AppEvent::PowerStatusChanged),
        WM_TRAYICON if message.lparam as u32 == WM_RBUTTONUP => Some(AppEvent::TrayMenuRequested),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(msg: u32, wparam: usize, lparam: isize) -> WindowMessage {
        WindowMessage {
            msg,
            wparam,
            lparam,
        }
    }

    #[test]
    fn routes_known_messages() {
        assert_eq!(route(message(WM_TIMER, HUD_TIMER_ID, 0)), Some(AppEvent::Tick));
        assert_eq!(
            route(message(WM_HUD_POWER_CHANGED, 0, 0)),
            Some(AppEvent::PowerStatusChanged)
        );
        assert_eq!(
            route(message(WM_TRAYICON, 0, WM_RBUTTONUP as isize)),
            Some(AppEvent::TrayMenuRequested)
        );
    }

    #[test]
    fn ignores_other_messages() {
        assert_eq!(route(message(WM_TIMER, 7, 0)), None);
        // WM_POWERBROADCAST itself never reaches the channel
        assert_eq!(route(message(0x0218, 0x000A, 0)), None);
        assert_eq!(route(message(WM_TRAYICON, 0, 0x0201)), None);
    }
}
