// Prevents an extra console window on Windows in release
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::process::ExitCode;

use battery_hud::{InitError, logging};

fn main() -> ExitCode {
    let _log_guard = logging::init();

    match battery_hud::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(InitError::AlreadyRunning) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "startup failed");
            ExitCode::from(e.exit_code())
        }
    }
}
