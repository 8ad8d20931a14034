//! HUD animation state machine
//!
//! ```text
//! Idle ──start──▶ Entering ──ANIM_FRAMES──▶ Holding ──HOLD_FRAMES──▶ FadingOut ──▶ Idle
//!                    ▲                                                    │
//!                    └──────────────── start (restart) ◀──────────────────┘
//! ```
//!
//! Progress is counted in ticks, not wall-clock time: a slow host stretches
//! the animation instead of skipping frames.

use std::time::Duration;

use battery_hud_types::{AppSettings, Color, hud_colors};

use crate::theme::resolve_theme_color;

/// Edge length of the square overlay, in pixels
pub const HUD_SIZE: u32 = 350;
/// Ticks spent in the entrance easing
pub const ANIM_FRAMES: u32 = 30;
/// Ticks the badge stays at full size before fading
pub const HOLD_FRAMES: u32 = 120;
/// Ticks spent fading out
pub const FADEOUT_FRAMES: u32 = 20;
/// Interval of the animation tick (~60 Hz)
pub const TICK_INTERVAL: Duration = Duration::from_millis(16);

/// Logical animation phase, derived from the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Entering,
    Holding,
    FadingOut,
}

/// Result of advancing the state machine by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Animation still running, render this frame
    Continue,
    /// Fade-out completed on this tick; state is back to Idle
    Finished,
    /// Tick arrived while nothing was visible
    Inactive,
}

/// Mutable animation state, one instance per process
#[derive(Debug, Clone)]
pub struct HudState {
    visible: bool,
    anim_frame: u32,
    /// Counts up to HOLD_FRAMES while holding, then down from
    /// FADEOUT_FRAMES to zero while fading out.
    hold_frame: u32,
    fading_out: bool,
    battery_percent: u8,
    theme_color: Color,
    charging: bool,
}

impl Default for HudState {
    fn default() -> Self {
        Self::new()
    }
}

impl HudState {
    pub fn new() -> Self {
        Self {
            visible: false,
            anim_frame: 0,
            hold_frame: 0,
            fading_out: false,
            battery_percent: 0,
            theme_color: hud_colors::CHARGE_GREEN,
            charging: false,
        }
    }

    /// Begin (or restart) the animation for a battery reading.
    ///
    /// A restart discards all progress of the running animation.
    pub fn start_animation(&mut self, percent: u8, charging: bool, settings: &AppSettings) {
        self.battery_percent = percent.min(100);
        self.charging = charging;
        self.theme_color = resolve_theme_color(self.battery_percent, charging, settings);

        self.visible = true;
        self.fading_out = false;
        self.anim_frame = 0;
        self.hold_frame = 0;

        tracing::debug!(
            percent = self.battery_percent,
            charging,
            color = ?self.theme_color,
            "HUD animation started"
        );
    }

    /// Return to Idle and hide the badge
    pub fn reset(&mut self) {
        self.visible = false;
        self.anim_frame = 0;
        self.hold_frame = 0;
        self.fading_out = false;
    }

    /// Advance the animation by one tick
    pub fn tick(&mut self) -> TickOutcome {
        if !self.visible {
            return TickOutcome::Inactive;
        }

        if !self.fading_out {
            if self.anim_frame < ANIM_FRAMES {
                self.anim_frame += 1;
            } else {
                self.hold_frame += 1;
                if self.hold_frame > HOLD_FRAMES {
                    self.fading_out = true;
                    self.hold_frame = FADEOUT_FRAMES;
                }
            }
            return TickOutcome::Continue;
        }

        self.hold_frame = self.hold_frame.saturating_sub(1);
        if self.hold_frame == 0 {
            self.reset();
            tracing::debug!("HUD animation finished");
            return TickOutcome::Finished;
        }
        TickOutcome::Continue
    }

    pub fn phase(&self) -> Phase {
        if !self.visible {
            Phase::Idle
        } else if self.fading_out {
            Phase::FadingOut
        } else if self.anim_frame < ANIM_FRAMES {
            Phase::Entering
        } else {
            Phase::Holding
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_fading_out(&self) -> bool {
        self.fading_out
    }

    pub fn anim_frame(&self) -> u32 {
        self.anim_frame
    }

    /// Hold counter while holding, remaining fade ticks while fading out
    pub fn hold_frame(&self) -> u32 {
        self.hold_frame
    }

    pub fn battery_percent(&self) -> u8 {
        self.battery_percent
    }

    pub fn theme_color(&self) -> Color {
        self.theme_color
    }

    pub fn is_charging(&self) -> bool {
        self.charging
    }
}
