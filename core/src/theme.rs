//! Theme color selection
//!
//! The theme color is resolved once when an animation starts and stays fixed
//! for that run, even if settings change while it is on screen.

use battery_hud_types::{AppSettings, Color, hud_colors};

/// Charging below this percentage shows the alert color
pub const LOW_BATTERY_THRESHOLD: u8 = 20;

/// Pick the badge color for a battery reading.
///
/// User overrides win over the built-in palette; the low-battery alert only
/// applies while charging.
pub fn resolve_theme_color(percent: u8, charging: bool, settings: &AppSettings) -> Color {
    if charging {
        if settings.use_custom_charge_color {
            settings.charge_color
        } else if percent < LOW_BATTERY_THRESHOLD {
            hud_colors::ALERT_RED
        } else {
            hud_colors::CHARGE_GREEN
        }
    } else if settings.use_custom_discharge_color {
        settings.discharge_color
    } else {
        hud_colors::DISCHARGE_AMBER
    }
}
