//! Color helpers bridging `battery_hud_types::Color` and tiny-skia

use battery_hud_types::Color as Rgba;
use tiny_skia::Color;

#[inline]
pub fn transparent() -> Color {
    Color::from_rgba8(0, 0, 0, 0)
}

#[inline]
pub fn white() -> Color {
    Color::from_rgba8(255, 255, 255, 255)
}

/// Convert a stored RGBA color
#[inline]
pub fn to_skia(color: Rgba) -> Color {
    Color::from_rgba8(color[0], color[1], color[2], color[3])
}

/// The RGB of `color` with its alpha replaced by `alpha`
#[inline]
pub fn with_alpha(color: Rgba, alpha: u8) -> Color {
    Color::from_rgba8(color[0], color[1], color[2], alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_is_replaced_not_multiplied() {
        let c = with_alpha([255, 150, 50, 128], 64);
        assert_eq!(c.to_color_u8().alpha(), 64);
        assert_eq!(c.to_color_u8().red(), 255);
    }
}
