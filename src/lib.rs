//! Battery HUD application
//!
//! Shows an animated battery badge in the middle of the screen whenever the
//! charger is plugged in (and optionally unplugged), controlled from a tray
//! icon.

pub mod app;
pub mod error;
pub mod logging;

#[cfg(target_os = "windows")]
pub mod win;

pub use app::{App, AppEvent, MenuChecks, Shell};
pub use error::InitError;

/// Run the application until the user exits
#[cfg(target_os = "windows")]
pub fn run() -> Result<(), InitError> {
    win::run()
}

/// Run the application until the user exits
#[cfg(not(target_os = "windows"))]
pub fn run() -> Result<(), InitError> {
    Err(InitError::UnsupportedPlatform)
}
