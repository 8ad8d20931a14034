//! Battery HUD overlay
//!
//! Software rendering and on-screen presentation of the battery badge.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    driver                           │
//! │      HudController, TickSource, IntervalTicker      │
//! │        (state + renderer + surface + ticks)         │
//! ├─────────────────────────────────────────────────────┤
//! │                    badge                            │
//! │             HudRenderer, FrameParams                │
//! │         (glow, ring gauge, percentage text)         │
//! ├─────────────────────────────────────────────────────┤
//! │                    renderer                         │
//! │            tiny-skia + cosmic-text                  │
//! │              (drawing primitives)                   │
//! ├─────────────────────────────────────────────────────┤
//! │                    platform/                        │
//! │         windows (layered window), headless          │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod badge;
pub mod colors;
pub mod driver;
pub mod platform;
pub mod renderer;

// Re-export commonly used types
pub use badge::{FrameParams, HudRenderer};
pub use driver::{HudController, IntervalTicker, TickSource};
pub use platform::headless::HeadlessSurface;
pub use platform::{OverlayConfig, OverlayPlatform, PlatformError};
pub use renderer::Renderer;

#[cfg(target_os = "windows")]
pub use platform::NativeOverlay;
