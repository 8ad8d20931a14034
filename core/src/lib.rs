//! Battery HUD core
//!
//! Platform-independent pieces of the HUD: the animation state machine,
//! easing math, theme color policy, trigger dispatch, the battery reader
//! seam and settings persistence. Rendering and windowing live in
//! `battery-hud-overlay`.

pub mod battery;
pub mod dispatch;
pub mod error;
pub mod math;
pub mod settings;
pub mod state;
pub mod theme;

#[cfg(test)]
mod state_tests;

pub use battery::{BatteryReader, BatteryStatus, SystemBattery};
pub use dispatch::{StartRequest, TriggerDispatch};
pub use error::{ConfigError, QueryError};
pub use settings::SettingsStore;
pub use state::{
    ANIM_FRAMES, FADEOUT_FRAMES, HOLD_FRAMES, HUD_SIZE, HudState, Phase, TICK_INTERVAL,
    TickOutcome,
};
pub use theme::{LOW_BATTERY_THRESHOLD, resolve_theme_color};

// Re-export shared types for convenience
pub use battery_hud_types::{AppSettings, Color, hud_colors};
