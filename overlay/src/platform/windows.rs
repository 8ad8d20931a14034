//! Windows platform implementation for the HUD surface
//!
//! Uses a layered, topmost, click-through tool window updated through
//! `UpdateLayeredWindow` for per-pixel alpha. The window procedure never
//! touches application state: messages of interest are forwarded over a
//! channel and routed by the owner of the message loop.

use std::mem;
use std::ptr;
use std::sync::mpsc::{self, Receiver, Sender};

use windows::Win32::Foundation::{COLORREF, HWND, LPARAM, LRESULT, POINT, SIZE, WPARAM};
use windows::Win32::Graphics::Gdi::{
    BI_RGB, BITMAPINFO, BITMAPINFOHEADER, BLENDFUNCTION, CreateCompatibleDC, CreateDIBSection,
    DIB_RGB_COLORS, DeleteDC, DeleteObject, GetDC, HBITMAP, HDC, HGDIOBJ, ReleaseDC, SelectObject,
    SetDIBits,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, GWLP_USERDATA, GetSystemMetrics,
    GetWindowLongPtrW, InSendMessage, KillTimer, PostMessageW, PostQuitMessage, RegisterClassExW,
    SM_CXSCREEN, SM_CYSCREEN, SW_SHOWNOACTIVATE, SetTimer, SetWindowLongPtrW, ShowWindow, ULW_ALPHA, UpdateLayeredWindow,
    WM_APP, WM_DESTROY, WM_ERASEBKGND, WM_POWERBROADCAST, WM_TIMER, WNDCLASSEXW, WS_EX_LAYERED,
    WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW, WS_EX_TOPMOST, WS_EX_TRANSPARENT, WS_POPUP,
};
use windows::core::PCWSTR;

use super::{OverlayConfig, OverlayPlatform, PlatformError, centered_origin};
use crate::driver::TickSource;

/// Timer id used for the animation tick
pub const HUD_TIMER_ID: usize = 1;

/// Posted to the HUD window when the system reports a power status change
pub const WM_HUD_POWER_CHANGED: u32 = WM_APP + 2;

const PBT_APMPOWERSTATUSCHANGE: usize = 0x000A;

/// How the window procedure passes a message on to the message loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delivery {
    /// Push onto the channel; the loop drains it after dispatch returns
    Forward,
    /// Post to the window so `GetMessageW` returns and the loop drains
    Post(WindowMessage),
    Ignore,
}

/// Sent messages are handled inside `GetMessageW` without it returning, so
/// anything the loop must see is re-posted instead of queued.
fn delivery(msg: u32, wparam: usize, lparam: isize, sent: bool) -> Delivery {
    match msg {
        WM_POWERBROADCAST if wparam == PBT_APMPOWERSTATUSCHANGE => Delivery::Post(WindowMessage {
            msg: WM_HUD_POWER_CHANGED,
            wparam: 0,
            lparam: 0,
        }),
        WM_TIMER => Delivery::Forward,
        _ if (WM_APP..0xC000).contains(&msg) => {
            if sent {
                Delivery::Post(WindowMessage {
                    msg,
                    wparam,
                    lparam,
                })
            } else {
                Delivery::Forward
            }
        }
        _ => Delivery::Ignore,
    }
}

/// A window message forwarded out of the window procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowMessage {
    pub msg: u32,
    pub wparam: usize,
    pub lparam: isize,
}

/// Layered overlay window
///
/// Not `Send`: the HWND and its message queue belong to the creating thread.
pub struct LayeredWindow {
    hwnd: HWND,
    hdc_mem: HDC,
    bitmap: HBITMAP,
    old_bitmap: HGDIOBJ,
    width: u32,
    height: u32,
    pixel_data: Vec<u8>,
    bgra_buffer: Vec<u8>, // Pre-allocated buffer for RGBA->BGRA conversion
    sender: *mut Sender<WindowMessage>,
}

impl LayeredWindow {
    /// Create the window and return it with the receiving end of its
    /// message channel.
    pub fn create(
        config: &OverlayConfig,
    ) -> Result<(Self, Receiver<WindowMessage>), PlatformError> {
        Self::register_class(&config.class_name)?;

        let hwnd = unsafe {
            let class_name = wide_string(&config.class_name);
            let window_name = wide_string(&config.title);
            let hinstance = GetModuleHandleW(None)
                .map_err(|e| PlatformError::WindowCreation(format!("GetModuleHandleW failed: {}", e)))?;

            let mut ex_style = WS_EX_LAYERED | WS_EX_TOPMOST | WS_EX_TOOLWINDOW | WS_EX_NOACTIVATE;
            if config.click_through {
                ex_style |= WS_EX_TRANSPARENT;
            }

            let (x, y) = screen_origin(config.width, config.height);
            CreateWindowExW(
                ex_style,
                PCWSTR(class_name.as_ptr()),
                PCWSTR(window_name.as_ptr()),
                WS_POPUP,
                x,
                y,
                config.width as i32,
                config.height as i32,
                None,
                None,
                hinstance,
                None,
            )
            .map_err(|e| PlatformError::WindowCreation(format!("CreateWindowExW failed: {}", e)))?
        };

        let (tx, rx) = mpsc::channel();
        let sender = Box::into_raw(Box::new(tx));
        unsafe {
            SetWindowLongPtrW(hwnd, GWLP_USERDATA, sender as isize);
        }

        let size = (config.width * config.height * 4) as usize;
        let mut window = Self {
            hwnd,
            hdc_mem: HDC::default(),
            bitmap: HBITMAP::default(),
            old_bitmap: HGDIOBJ::default(),
            width: config.width,
            height: config.height,
            pixel_data: vec![0u8; size],
            bgra_buffer: vec![0u8; size],
            sender,
        };
        window.create_dib_section()?;

        unsafe {
            let _ = ShowWindow(hwnd, SW_SHOWNOACTIVATE);
        }
        tracing::info!(hwnd = ?hwnd, width = config.width, height = config.height, "HUD window created");

        Ok((window, rx))
    }

    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }

    fn register_class(class_name: &str) -> Result<(), PlatformError> {
        unsafe {
            let class_name = wide_string(class_name);
            let hinstance = GetModuleHandleW(None).map_err(|e| {
                PlatformError::ClassRegistration(format!("GetModuleHandleW failed: {}", e))
            })?;

            let wc = WNDCLASSEXW {
                cbSize: mem::size_of::<WNDCLASSEXW>() as u32,
                lpfnWndProc: Some(window_proc),
                hInstance: hinstance.into(),
                lpszClassName: PCWSTR(class_name.as_ptr()),
                ..Default::default()
            };

            if RegisterClassExW(&wc) == 0 {
                let err = std::io::Error::last_os_error();
                // ERROR_CLASS_ALREADY_EXISTS
                if err.raw_os_error() != Some(1410) {
                    return Err(PlatformError::ClassRegistration(format!(
                        "RegisterClassExW failed: {}",
                        err
                    )));
                }
            }
        }
        Ok(())
    }

    fn bitmap_info(&self) -> BITMAPINFO {
        BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: self.width as i32,
                biHeight: -(self.height as i32), // Top-down DIB
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn create_dib_section(&mut self) -> Result<(), PlatformError> {
        unsafe {
            let hdc_screen = GetDC(HWND::default());
            if hdc_screen.is_invalid() {
                return Err(PlatformError::Surface("GetDC failed".to_string()));
            }

            self.hdc_mem = CreateCompatibleDC(hdc_screen);
            if self.hdc_mem.is_invalid() {
                ReleaseDC(HWND::default(), hdc_screen);
                return Err(PlatformError::Surface(
                    "CreateCompatibleDC failed".to_string(),
                ));
            }

            let bmi = self.bitmap_info();
            let mut bits: *mut std::ffi::c_void = ptr::null_mut();
            let result = CreateDIBSection(hdc_screen, &bmi, DIB_RGB_COLORS, &mut bits, None, 0);
            ReleaseDC(HWND::default(), hdc_screen);

            self.bitmap = result
                .map_err(|e| PlatformError::Surface(format!("CreateDIBSection failed: {}", e)))?;
            self.old_bitmap = SelectObject(self.hdc_mem, self.bitmap);
        }
        Ok(())
    }
}

impl OverlayPlatform for LayeredWindow {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel_buffer(&mut self) -> Option<&mut [u8]> {
        if self.bitmap.is_invalid() {
            return None;
        }
        Some(&mut self.pixel_data)
    }

    fn present(&mut self, alpha: u8) -> Result<(), PlatformError> {
        if self.hdc_mem.is_invalid() || self.bitmap.is_invalid() {
            return Err(PlatformError::Surface("no memory DC".to_string()));
        }

        for (src, dst) in self
            .pixel_data
            .chunks_exact(4)
            .zip(self.bgra_buffer.chunks_exact_mut(4))
        {
            dst[0] = src[2]; // B
            dst[1] = src[1]; // G
            dst[2] = src[0]; // R
            dst[3] = src[3]; // A
        }

        unsafe {
            let hdc_screen = GetDC(HWND::default());
            if hdc_screen.is_invalid() {
                return Err(PlatformError::Surface("GetDC failed".to_string()));
            }

            let bmi = self.bitmap_info();
            let copied = SetDIBits(
                self.hdc_mem,
                self.bitmap,
                0,
                self.height,
                self.bgra_buffer.as_ptr() as *const _,
                &bmi,
                DIB_RGB_COLORS,
            );
            if copied == 0 {
                ReleaseDC(HWND::default(), hdc_screen);
                return Err(PlatformError::Surface("SetDIBits failed".to_string()));
            }

            let (x, y) = screen_origin(self.width, self.height);
            let pt_src = POINT { x: 0, y: 0 };
            let pt_dst = POINT { x, y };
            let size = SIZE {
                cx: self.width as i32,
                cy: self.height as i32,
            };
            let blend = BLENDFUNCTION {
                BlendOp: 0, // AC_SRC_OVER
                BlendFlags: 0,
                SourceConstantAlpha: alpha,
                AlphaFormat: 1, // AC_SRC_ALPHA
            };

            let result = UpdateLayeredWindow(
                self.hwnd,
                hdc_screen,
                Some(&pt_dst),
                Some(&size),
                self.hdc_mem,
                Some(&pt_src),
                COLORREF(0),
                Some(&blend),
                ULW_ALPHA,
            );
            ReleaseDC(HWND::default(), hdc_screen);

            result.map_err(|e| PlatformError::Present(e.to_string()))
        }
    }
}

impl Drop for LayeredWindow {
    fn drop(&mut self) {
        tracing::debug!(hwnd = ?self.hwnd, "destroying HUD window");
        unsafe {
            if !self.hdc_mem.is_invalid() {
                if !self.old_bitmap.is_invalid() {
                    SelectObject(self.hdc_mem, self.old_bitmap);
                }
                if !self.bitmap.is_invalid() {
                    let _ = DeleteObject(self.bitmap);
                }
                let _ = DeleteDC(self.hdc_mem);
            }
            if !self.hwnd.is_invalid() {
                SetWindowLongPtrW(self.hwnd, GWLP_USERDATA, 0);
                let _ = DestroyWindow(self.hwnd);
            }
            if !self.sender.is_null() {
                drop(Box::from_raw(self.sender));
            }
        }
    }
}

/// Animation tick backed by `SetTimer` on the HUD window
///
/// Ticks arrive as `WM_TIMER` with `wparam == HUD_TIMER_ID`.
pub struct WindowTimer {
    hwnd: HWND,
    running: bool,
}

impl WindowTimer {
    pub fn new(hwnd: HWND) -> Self {
        Self {
            hwnd,
            running: false,
        }
    }
}

impl TickSource for WindowTimer {
    fn start(&mut self) {
        if self.running {
            return;
        }
        let interval = battery_hud_core::TICK_INTERVAL.as_millis() as u32;
        let id = unsafe { SetTimer(self.hwnd, HUD_TIMER_ID, interval, None) };
        if id == 0 {
            tracing::warn!(error = %std::io::Error::last_os_error(), "SetTimer failed");
            return;
        }
        self.running = true;
    }

    fn stop(&mut self) {
        if !self.running {
            return;
        }
        if let Err(e) = unsafe { KillTimer(self.hwnd, HUD_TIMER_ID) } {
            tracing::debug!(error = %e, "KillTimer failed");
        }
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

/// Window procedure for the HUD window
unsafe extern "system" fn window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    unsafe {
        let action = delivery(msg, wparam.0, lparam.0, InSendMessage().as_bool());
        match action {
            Delivery::Forward => {
                let sender = GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *const Sender<WindowMessage>;
                if let Some(sender) = sender.as_ref() {
                    let _ = sender.send(WindowMessage {
                        msg,
                        wparam: wparam.0,
                        lparam: lparam.0,
                    });
                }
            }
            Delivery::Post(posted) => {
                let posted_wparam = WPARAM(posted.wparam);
                let posted_lparam = LPARAM(posted.lparam);
                if let Err(e) = PostMessageW(hwnd, posted.msg, posted_wparam, posted_lparam) {
                    tracing::warn!(error = %e, msg = posted.msg, "failed to post window message");
                }
            }
            Delivery::Ignore => {}
        }

        match msg {
            WM_POWERBROADCAST => LRESULT(1),
            WM_TIMER => LRESULT(0),
            WM_ERASEBKGND => LRESULT(1), // Don't erase background
            WM_DESTROY => {
                PostQuitMessage(0);
                LRESULT(0)
            }
            _ if action != Delivery::Ignore => LRESULT(0),
            _ => DefWindowProcW(hwnd, msg, wparam, lparam),
        }
    }
}

/// Top-left position that centers the window on the primary display
fn screen_origin(width: u32, height: u32) -> (i32, i32) {
    let (screen_w, screen_h) = unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };
    centered_origin(screen_w, screen_h, width, height)
}

/// Convert a &str to a null-terminated wide string
pub fn wide_string(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WM_TRAY_CALLBACK: u32 = WM_APP + 1;

    #[test]
    fn power_change_is_posted_as_app_message() {
        let expected = Delivery::Post(WindowMessage {
            msg: WM_HUD_POWER_CHANGED,
            wparam: 0,
            lparam: 0,
        });
        assert_eq!(delivery(WM_POWERBROADCAST, PBT_APMPOWERSTATUSCHANGE, 0, true), expected);
        assert_eq!(delivery(WM_POWERBROADCAST, PBT_APMPOWERSTATUSCHANGE, 0, false), expected);
        // PBT_APMRESUMEAUTOMATIC
        assert_eq!(delivery(WM_POWERBROADCAST, 0x12, 0, true), Delivery::Ignore);
    }

    #[test]
    fn sent_app_messages_are_reposted() {
        assert_eq!(
            delivery(WM_TRAY_CALLBACK, 1, 0x0205, true),
            Delivery::Post(WindowMessage {
                msg: WM_TRAY_CALLBACK,
                wparam: 1,
                lparam: 0x0205,
            })
        );
        assert_eq!(delivery(WM_TRAY_CALLBACK, 1, 0x0205, false), Delivery::Forward);
        // The re-posted power message comes back through the posted path
        assert_eq!(delivery(WM_HUD_POWER_CHANGED, 0, 0, false), Delivery::Forward);
    }

    #[test]
    fn timer_is_forwarded_and_others_ignored() {
        assert_eq!(delivery(WM_TIMER, HUD_TIMER_ID, 0, false), Delivery::Forward);
        assert_eq!(delivery(WM_ERASEBKGND, 0, 0, false), Delivery::Ignore);
    }
}
