//! Startup errors

use battery_hud_overlay::PlatformError;
use thiserror::Error;

/// Failures that prevent the application from starting
#[derive(Debug, Error)]
pub enum InitError {
    /// Another instance already owns the HUD window class
    #[error("battery HUD is already running")]
    AlreadyRunning,

    #[error("battery HUD requires Windows")]
    UnsupportedPlatform,

    #[error("failed to create the HUD window: {0}")]
    Platform(#[from] PlatformError),
}

impl InitError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            InitError::AlreadyRunning => 0,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_instance_exits_cleanly() {
        assert_eq!(InitError::AlreadyRunning.exit_code(), 0);
        assert_eq!(InitError::UnsupportedPlatform.exit_code(), 1);
        let err = InitError::from(PlatformError::WindowCreation("boom".to_string()));
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("boom"));
    }
}
