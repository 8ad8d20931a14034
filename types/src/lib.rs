//! Shared configuration types for Battery HUD
//!
//! This crate contains the serializable settings shared between the
//! animation core (battery-hud-core) and the application shell.

use serde::{Deserialize, Serialize};

/// RGBA color, one byte per channel
pub type Color = [u8; 4];

// ─────────────────────────────────────────────────────────────────────────────
// Named Colors
// ─────────────────────────────────────────────────────────────────────────────

pub mod hud_colors {
    use super::Color;

    pub const ALERT_RED: Color = [255, 50, 50, 255]; // Charging below threshold
    pub const CHARGE_GREEN: Color = [0, 230, 120, 255];
    pub const DISCHARGE_AMBER: Color = [255, 150, 50, 255];
    pub const WHITE: Color = [255, 255, 255, 255];
}

// ─────────────────────────────────────────────────────────────────────────────
// App Settings
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences edited from the tray menu.
///
/// The animation core only reads these; the settings store owns mutation
/// and persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Theme color used while charging when `use_custom_charge_color` is set
    pub charge_color: Color,
    /// Theme color used on battery when `use_custom_discharge_color` is set
    pub discharge_color: Color,
    pub use_custom_charge_color: bool,
    pub use_custom_discharge_color: bool,
    /// Also animate when the charger is unplugged
    pub show_on_unplug: bool,
    /// Play a system sound on charger plug/unplug
    pub play_sound: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            charge_color: hud_colors::CHARGE_GREEN,
            discharge_color: hud_colors::DISCHARGE_AMBER,
            use_custom_charge_color: false,
            use_custom_discharge_color: false,
            show_on_unplug: false,
            play_sound: false,
        }
    }
}
