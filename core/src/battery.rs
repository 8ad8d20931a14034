//! Battery status reader
//!
//! The power subsystem is queried synchronously on manual triggers and on
//! every power-state change notification.

use crate::error::QueryError;

/// A single battery reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryStatus {
    /// Charge level, 0-100
    pub percent: u8,
    /// Running on AC power (treated as "charging")
    pub on_ac_power: bool,
}

impl BatteryStatus {
    /// AC line status value reported when the charger is connected
    const AC_ONLINE: u8 = 1;

    /// Build a reading from raw power-status fields.
    ///
    /// Out-of-range percentages (including the "unknown" value 255) are
    /// clamped to 100.
    pub fn from_raw(percent: u8, ac_line_status: u8) -> Self {
        Self {
            percent: percent.min(100),
            on_ac_power: ac_line_status == Self::AC_ONLINE,
        }
    }
}

/// Source of battery readings
pub trait BatteryReader {
    fn query(&self) -> Result<BatteryStatus, QueryError>;
}

/// Reads the battery through the operating system
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBattery;

#[cfg(target_os = "windows")]
impl BatteryReader for SystemBattery {
    fn query(&self) -> Result<BatteryStatus, QueryError> {
        use windows::Win32::System::Power::{GetSystemPowerStatus, SYSTEM_POWER_STATUS};

        let mut status = SYSTEM_POWER_STATUS::default();
        unsafe { GetSystemPowerStatus(&mut status) }
            .map_err(|e| QueryError::Unavailable(e.to_string()))?;

        Ok(BatteryStatus::from_raw(
            status.BatteryLifePercent,
            status.ACLineStatus,
        ))
    }
}

#[cfg(not(target_os = "windows"))]
impl BatteryReader for SystemBattery {
    fn query(&self) -> Result<BatteryStatus, QueryError> {
        Err(QueryError::Unsupported)
    }
}
