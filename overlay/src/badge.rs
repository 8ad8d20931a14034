//! HUD badge: glow, ring gauge and percentage text
//!
//! The badge is drawn in a 350x350 design space and scaled about its center
//! by the entrance/exit animation.

use battery_hud_core::math::{alpha_from_factor, ease_out_back, progress};
use battery_hud_core::{ANIM_FRAMES, Color, FADEOUT_FRAMES, HUD_SIZE, HudState, hud_colors};
use tiny_skia::Transform;

use crate::colors;
use crate::platform::{OverlayPlatform, PlatformError};
use crate::renderer::Renderer;

/// Ring stroke width
const RING_WIDTH: f32 = 10.0;
/// Inset of the ring from the badge edge
const RING_MARGIN: f32 = 60.0;
/// Ring starts at twelve o'clock
const RING_START_DEG: f32 = -90.0;
/// Percentage text size at scale 1
const FONT_SIZE: f32 = 50.0;
/// How far the badge shrinks over the fade-out
const FADE_SHRINK: f32 = 0.1;

/// Everything needed to draw one frame, derived from the HUD state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    /// Scale about the badge center
    pub scale: f32,
    /// Opacity of this frame
    pub alpha: u8,
    pub percent: u8,
    pub color: Color,
}

impl FrameParams {
    /// Frame parameters for the current state, `None` when idle
    pub fn from_state(state: &HudState) -> Option<Self> {
        if !state.is_visible() {
            return None;
        }

        let p = progress(state.anim_frame(), ANIM_FRAMES);
        let (scale, alpha_factor) = if state.is_fading_out() {
            let fade_p = progress(state.hold_frame(), FADEOUT_FRAMES);
            (1.0 - (1.0 - fade_p) * FADE_SHRINK, fade_p)
        } else {
            let alpha_factor = if p > 0.5 { 1.0 } else { p * 2.0 };
            (ease_out_back(p), alpha_factor)
        };

        Some(Self {
            scale,
            alpha: alpha_from_factor(alpha_factor),
            percent: state.battery_percent(),
            color: state.theme_color(),
        })
    }

    /// Centered scale transform for the badge
    pub fn transform(&self) -> Transform {
        let center = HUD_SIZE as f32 / 2.0;
        Transform::from_translate(center, center)
            .pre_scale(self.scale, self.scale)
            .pre_translate(-center, -center)
    }

    /// Ring sweep in degrees
    pub fn sweep_degrees(&self) -> f32 {
        360.0 * self.percent as f32 / 100.0
    }
}

/// Draws the HUD badge onto a surface
pub struct HudRenderer {
    renderer: Renderer,
}

impl HudRenderer {
    pub fn new() -> Self {
        Self {
            renderer: Renderer::new(),
        }
    }

    /// Draw and present one frame for `state`.
    ///
    /// An idle state presents a fully transparent frame so the surface
    /// clears.
    pub fn render<P: OverlayPlatform + ?Sized>(
        &mut self,
        state: &HudState,
        surface: &mut P,
    ) -> Result<(), PlatformError> {
        let width = surface.width();
        let height = surface.height();
        let frame = FrameParams::from_state(state);

        let Some(buffer) = surface.pixel_buffer() else {
            return Err(PlatformError::Surface("pixel buffer unavailable".to_string()));
        };
        self.renderer.clear(buffer, width, height, colors::transparent());

        let Some(frame) = frame else {
            return surface.present(0);
        };
        if frame.scale > 0.0 {
            self.draw_badge(buffer, width, height, &frame);
        }

        surface.present(frame.alpha)
    }

    fn draw_badge(&mut self, buffer: &mut [u8], width: u32, height: u32, frame: &FrameParams) {
        let size = HUD_SIZE as f32;
        let center = size / 2.0;
        let transform = frame.transform();

        self.renderer.fill_radial_glow(
            buffer,
            width,
            height,
            center,
            center,
            center,
            colors::with_alpha(frame.color, frame.alpha / 4),
            colors::with_alpha(frame.color, 0),
            transform,
        );

        self.renderer.stroke_arc(
            buffer,
            width,
            height,
            center,
            center,
            center - RING_MARGIN,
            RING_START_DEG,
            frame.sweep_degrees(),
            RING_WIDTH,
            colors::with_alpha(frame.color, frame.alpha),
            transform,
        );

        let font_size = FONT_SIZE * frame.scale;
        if font_size >= 1.0 {
            let text = format!("{}%", frame.percent);
            let (cx, cy) = transform_point(&transform, center, center);
            self.renderer.draw_text_centered(
                buffer,
                width,
                height,
                &text,
                cx,
                cy,
                font_size,
                colors::with_alpha(hud_colors::WHITE, frame.alpha),
            );
        }
    }
}

impl Default for HudRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn transform_point(ts: &Transform, x: f32, y: f32) -> (f32, f32) {
    (
        ts.sx * x + ts.kx * y + ts.tx,
        ts.ky * x + ts.sy * y + ts.ty,
    )
}
