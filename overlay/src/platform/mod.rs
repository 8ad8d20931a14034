//! Platform abstraction for the HUD surface
//!
//! A surface owns an RGBA pixel buffer of fixed size and knows how to put it
//! on screen with a global opacity. The badge renderer draws into the buffer
//! and never talks to the OS directly.

pub mod headless;

#[cfg(target_os = "windows")]
pub mod windows;

/// Configuration for creating the overlay surface
#[derive(Debug, Clone)]
pub struct OverlayConfig {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Window class name, also used for single-instance detection
    pub class_name: String,
    /// Window title (never shown, the window has no caption)
    pub title: String,
    /// Whether clicks pass through the overlay
    pub click_through: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            width: battery_hud_core::HUD_SIZE,
            height: battery_hud_core::HUD_SIZE,
            class_name: "BatteryHUDClass".to_string(),
            title: "Battery HUD".to_string(),
            click_through: true,
        }
    }
}

/// Errors that can occur in platform operations
#[derive(Debug)]
pub enum PlatformError {
    /// Window class could not be registered
    ClassRegistration(String),
    /// Window creation failed
    WindowCreation(String),
    /// Pixel buffer or device context unavailable for this frame
    Surface(String),
    /// Pushing the frame to the screen failed
    Present(String),
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformError::ClassRegistration(s) => write!(f, "Class registration failed: {}", s),
            PlatformError::WindowCreation(s) => write!(f, "Window creation failed: {}", s),
            PlatformError::Surface(s) => write!(f, "Surface error: {}", s),
            PlatformError::Present(s) => write!(f, "Present failed: {}", s),
        }
    }
}

impl std::error::Error for PlatformError {}

impl PlatformError {
    /// Whether the error only affects the current frame
    pub fn is_transient(&self) -> bool {
        matches!(self, PlatformError::Surface(_) | PlatformError::Present(_))
    }
}

/// Trait that all surface backends must implement
pub trait OverlayPlatform {
    /// Get the width of the surface
    fn width(&self) -> u32;

    /// Get the height of the surface
    fn height(&self) -> u32;

    /// Get mutable access to the pixel buffer (premultiplied RGBA)
    /// Returns None if buffer is not ready
    fn pixel_buffer(&mut self) -> Option<&mut [u8]>;

    /// Put the current pixel buffer on screen, multiplied by `alpha`
    fn present(&mut self, alpha: u8) -> Result<(), PlatformError>;
}

/// Top-left origin that centers a `width` x `height` box on a screen
pub fn centered_origin(screen_width: i32, screen_height: i32, width: u32, height: u32) -> (i32, i32) {
    (
        (screen_width - width as i32) / 2,
        (screen_height - height as i32) / 2,
    )
}

#[cfg(target_os = "windows")]
pub use windows::LayeredWindow as NativeOverlay;
