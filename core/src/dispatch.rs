//! Trigger dispatch
//!
//! Decides whether an external event (manual test, power-state change)
//! should (re)start the HUD animation. The caller performs the start; this
//! module only holds the charging-edge memory and the policy.

use battery_hud_types::AppSettings;

use crate::battery::{BatteryReader, BatteryStatus};

/// A request to start the animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartRequest {
    pub percent: u8,
    pub charging: bool,
    /// Play the plug/unplug notification sound before starting
    pub play_sound: bool,
}

/// Remembers the last observed charging state between notifications
#[derive(Debug, Clone, Default)]
pub struct TriggerDispatch {
    last_charging: bool,
}

impl TriggerDispatch {
    /// Seed the charging edge from an initial reading (if one was available)
    pub fn new(initial: Option<BatteryStatus>) -> Self {
        Self {
            last_charging: initial.is_some_and(|s| s.on_ac_power),
        }
    }

    pub fn last_charging(&self) -> bool {
        self.last_charging
    }

    /// Manual "test animation": always starts from the current reading.
    ///
    /// Returns `None` if the battery cannot be queried.
    pub fn manual<R: BatteryReader + ?Sized>(&self, reader: &R) -> Option<StartRequest> {
        match reader.query() {
            Ok(status) => Some(StartRequest {
                percent: status.percent,
                charging: status.on_ac_power,
                play_sound: false,
            }),
            Err(e) => {
                tracing::debug!(error = %e, "manual trigger skipped");
                None
            }
        }
    }

    /// Power-state change notification.
    ///
    /// Ignored entirely while the HUD is visible. Otherwise the battery is
    /// re-queried and the animation starts on a charging edge.
    pub fn power_status_changed<R: BatteryReader + ?Sized>(
        &mut self,
        hud_visible: bool,
        reader: &R,
        settings: &AppSettings,
    ) -> Option<StartRequest> {
        if hud_visible {
            return None;
        }
        match reader.query() {
            Ok(status) => self.on_power_status(status, settings),
            Err(e) => {
                tracing::debug!(error = %e, "power notification skipped");
                None
            }
        }
    }

    /// Apply a fresh reading to the charging-edge policy
    pub fn on_power_status(
        &mut self,
        status: BatteryStatus,
        settings: &AppSettings,
    ) -> Option<StartRequest> {
        let changed = status.on_ac_power != self.last_charging;
        self.last_charging = status.on_ac_power;

        if !changed {
            return None;
        }
        if !status.on_ac_power && !settings.show_on_unplug {
            tracing::debug!("charger unplugged, unplug animation disabled");
            return None;
        }

        tracing::info!(
            percent = status.percent,
            charging = status.on_ac_power,
            "charging state changed"
        );
        Some(StartRequest {
            percent: status.percent,
            charging: status.on_ac_power,
            play_sound: settings.play_sound,
        })
    }
}
