//! Win32 implementation of the app's side effects

use std::mem;

use battery_hud_core::Color;
use windows::Win32::Foundation::{COLORREF, HWND, POINT};
use windows::Win32::Media::Audio::{PlaySoundW, SND_ALIAS, SND_ASYNC};
use windows::Win32::UI::Controls::Dialogs::{
    CC_FULLOPEN, CC_RGBINIT, CHOOSECOLORW, ChooseColorW,
};
use windows::Win32::UI::WindowsAndMessaging::{
    AppendMenuW, CreatePopupMenu, DestroyMenu, GetCursorPos, HMENU, MENU_ITEM_FLAGS, MF_CHECKED,
    MF_SEPARATOR, MF_STRING, MF_UNCHECKED, PostQuitMessage, SetForegroundWindow, TPM_BOTTOMALIGN,
    TPM_LEFTALIGN, TPM_NONOTIFY, TPM_RETURNCMD, TrackPopupMenu,
};
use windows::core::{PCWSTR, w};

use crate::app::{AppEvent, MenuChecks, Shell};

const IDM_TEST: usize = 1001;
const IDM_COLOR_CHARGE: usize = 1002;
const IDM_COLOR_DISCHARGE: usize = 1003;
const IDM_RESET: usize = 1004;
const IDM_TOGGLE_UNPLUG: usize = 1005;
const IDM_TOGGLE_SOUND: usize = 1006;
const IDM_EXIT: usize = 1007;

pub struct WinShell {
    hwnd: HWND,
    /// Custom color slots of the color dialog, kept for the session
    custom_colors: [COLORREF; 16],
}

impl WinShell {
    pub fn new(hwnd: HWND) -> Self {
        Self {
            hwnd,
            custom_colors: [COLORREF(0); 16],
        }
    }

    fn build_menu(&self, checks: MenuChecks) -> windows::core::Result<HMENU> {
        let check = |on: bool| if on { MF_CHECKED } else { MF_UNCHECKED };
        let items: [(MENU_ITEM_FLAGS, usize, PCWSTR); 9] = [
            (MF_STRING, IDM_TEST, w!("Test animation")),
            (MF_STRING, IDM_COLOR_CHARGE, w!("Charge color...")),
            (MF_STRING, IDM_COLOR_DISCHARGE, w!("Discharge color...")),
            (MF_STRING, IDM_RESET, w!("Reset colors")),
            (MF_SEPARATOR, 0, PCWSTR::null()),
            (
                MF_STRING | check(checks.show_on_unplug),
                IDM_TOGGLE_UNPLUG,
                w!("Show on unplug"),
            ),
            (
                MF_STRING | check(checks.play_sound),
                IDM_TOGGLE_SOUND,
                w!("Play sound"),
            ),
            (MF_SEPARATOR, 0, PCWSTR::null()),
            (MF_STRING, IDM_EXIT, w!("Exit")),
        ];

        unsafe {
            let menu = CreatePopupMenu()?;
            for (flags, id, label) in items {
                if let Err(e) = AppendMenuW(menu, flags, id, label) {
                    let _ = DestroyMenu(menu);
                    return Err(e);
                }
            }
            Ok(menu)
        }
    }
}

impl Shell for WinShell {
    fn show_menu(&mut self, checks: MenuChecks) -> Option<AppEvent> {
        let menu = match self.build_menu(checks) {
            Ok(menu) => menu,
            Err(e) => {
                tracing::warn!(error = %e, "failed to build tray menu");
                return None;
            }
        };

        let cmd = unsafe {
            let mut pt = POINT::default();
            let _ = GetCursorPos(&mut pt);
            // Required for the menu to close when clicking elsewhere
            let _ = SetForegroundWindow(self.hwnd);
            let cmd = TrackPopupMenu(
                menu,
                TPM_BOTTOMALIGN | TPM_LEFTALIGN | TPM_RETURNCMD | TPM_NONOTIFY,
                pt.x,
                pt.y,
                0,
                self.hwnd,
                None,
            );
            let _ = DestroyMenu(menu);
            cmd
        };

        menu_event(cmd.0 as usize)
    }

    fn choose_color(&mut self, initial: Color) -> Option<Color> {
        let mut cc = CHOOSECOLORW {
            lStructSize: mem::size_of::<CHOOSECOLORW>() as u32,
            hwndOwner: self.hwnd,
            rgbResult: to_colorref(initial),
            lpCustColors: self.custom_colors.as_mut_ptr(),
            Flags: CC_FULLOPEN | CC_RGBINIT,
            ..Default::default()
        };

        if unsafe { ChooseColorW(&mut cc) }.as_bool() {
            Some(from_colorref(cc.rgbResult))
        } else {
            None
        }
    }

    fn play_notification(&mut self, charging: bool) {
        let alias = if charging {
            w!("SystemNotification")
        } else {
            w!("SystemExclamation")
        };
        if !unsafe { PlaySoundW(alias, None, SND_ALIAS | SND_ASYNC) }.as_bool() {
            tracing::debug!(charging, "notification sound failed");
        }
    }

    fn quit(&mut self) {
        unsafe { PostQuitMessage(0) };
    }
}

fn menu_event(id: usize) -> Option<AppEvent> {
    match id {
        IDM_TEST => Some(AppEvent::ManualTest),
        IDM_COLOR_CHARGE => Some(AppEvent::PickChargeColor),
        IDM_COLOR_DISCHARGE => Some(AppEvent::PickDischargeColor),
        IDM_RESET => Some(AppEvent::ResetColors),
        IDM_TOGGLE_UNPLUG => Some(AppEvent::ToggleShowOnUnplug),
        IDM_TOGGLE_SOUND => Some(AppEvent::TogglePlaySound),
        IDM_EXIT => Some(AppEvent::Exit),
        _ => None,
    }
}

/// `0x00BBGGRR`
fn to_colorref(color: Color) -> COLORREF {
    COLORREF(color[0] as u32 | (color[1] as u32) << 8 | (color[2] as u32) << 16)
}

/// Picked colors are always opaque
fn from_colorref(c: COLORREF) -> Color {
    [
        (c.0 & 0xFF) as u8,
        ((c.0 >> 8) & 0xFF) as u8,
        ((c.0 >> 16) & 0xFF) as u8,
        255,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colorref_is_bgr() {
        assert_eq!(to_colorref([0x12, 0x34, 0x56, 0x80]).0, 0x0056_3412);
        assert_eq!(from_colorref(COLORREF(0x0056_3412)), [0x12, 0x34, 0x56, 0xFF]);
    }

    #[test]
    fn dismissed_menu_yields_nothing() {
        assert_eq!(menu_event(0), None);
        assert_eq!(menu_event(IDM_EXIT), Some(AppEvent::Exit));
    }
}
