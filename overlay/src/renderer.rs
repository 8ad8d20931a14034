//! Software renderer using tiny-skia and cosmic-text
//!
//! Provides the drawing primitives the HUD badge is made of. All rendering
//! is done on the CPU into a premultiplied RGBA pixel buffer.
use std::f32::consts::FRAC_PI_2;

use cosmic_text::{Attrs, Buffer, Family, FontSystem, LayoutGlyph, Metrics, Shaping, SwashCache, Weight};
use tiny_skia::{
    Color, ColorU8, FillRule, GradientStop, LineCap, LineJoin, Paint, Path, PathBuilder, PixmapMut,
    Point, RadialGradient, SpreadMode, Stroke, Transform,
};

/// Distance from the vertical center of digits to their baseline, as a
/// fraction of the font size
const BASELINE_OFFSET: f32 = 0.36;

/// Most recently shaped label.
///
/// The badge shows one label at a time and only its size changes while
/// animating, so a single entry covers every hold frame.
struct ShapedText {
    text: String,
    /// Font size in tenths of a pixel
    size_key: u32,
    glyphs: Vec<LayoutGlyph>,
    width: f32,
}

impl ShapedText {
    fn matches(&self, text: &str, size_key: u32) -> bool {
        self.size_key == size_key && self.text == text
    }
}

/// A software renderer for overlay content
pub struct Renderer {
    font_system: FontSystem,
    swash_cache: SwashCache,
    shaped: Option<ShapedText>,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
            shaped: None,
        }
    }

    /// Take the shaped glyphs for `text`, reshaping unless the last label
    /// matches. Hand them back through `self.shaped` when done.
    fn take_shaped(&mut self, text: &str, font_size: f32) -> ShapedText {
        let size_key = (font_size * 10.0).round() as u32;
        if let Some(shaped) = self.shaped.take().filter(|s| s.matches(text, size_key)) {
            return shaped;
        }

        let metrics = Metrics::new(font_size, font_size * 1.2);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        let attrs = Attrs::new().family(Family::SansSerif).weight(Weight::BOLD);
        buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(&mut self.font_system, false);

        let (glyphs, width) = buffer.layout_runs().fold(
            (Vec::new(), 0.0f32),
            |(mut glyphs, width), run| {
                glyphs.extend_from_slice(run.glyphs);
                (glyphs, width.max(run.line_w))
            },
        );

        ShapedText {
            text: text.to_string(),
            size_key,
            glyphs,
            width,
        }
    }

    /// Clear a pixel buffer with a color
    pub fn clear(&self, buffer: &mut [u8], width: u32, height: u32, color: Color) {
        if let Some(mut pixmap) = PixmapMut::from_bytes(buffer, width, height) {
            pixmap.fill(color);
        }
    }

    /// Fill a circle with a radial gradient from `inner` at the center to
    /// `outer` at the rim
    pub fn fill_radial_glow(
        &self,
        buffer: &mut [u8],
        width: u32,
        height: u32,
        cx: f32,
        cy: f32,
        radius: f32,
        inner: Color,
        outer: Color,
        transform: Transform,
    ) {
        let Some(mut pixmap) = PixmapMut::from_bytes(buffer, width, height) else {
            return;
        };
        let Some(path) = PathBuilder::from_circle(cx, cy, radius) else {
            return;
        };
        let center = Point::from_xy(cx, cy);
        let Some(shader) = RadialGradient::new(
            center,
            center,
            radius,
            vec![GradientStop::new(0.0, inner), GradientStop::new(1.0, outer)],
            SpreadMode::Pad,
            Transform::identity(),
        ) else {
            return;
        };

        let mut paint = Paint::default();
        paint.shader = shader;
        paint.anti_alias = true;

        pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
    }

    /// Stroke a circular arc with round caps.
    ///
    /// Angles are in degrees, 0° pointing right and positive sweeping
    /// clockwise on screen. Nothing is drawn for an empty sweep.
    pub fn stroke_arc(
        &self,
        buffer: &mut [u8],
        width: u32,
        height: u32,
        cx: f32,
        cy: f32,
        radius: f32,
        start_deg: f32,
        sweep_deg: f32,
        stroke_width: f32,
        color: Color,
        transform: Transform,
    ) {
        let Some(mut pixmap) = PixmapMut::from_bytes(buffer, width, height) else {
            return;
        };
        let Some(path) = arc_path(cx, cy, radius, start_deg, sweep_deg) else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;

        let stroke = Stroke {
            width: stroke_width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };

        pixmap.stroke_path(&path, &paint, &stroke, transform, None);
    }

    /// Draw bold text centered on (cx, cy)
    pub fn draw_text_centered(
        &mut self,
        buffer: &mut [u8],
        buf_width: u32,
        buf_height: u32,
        text: &str,
        cx: f32,
        cy: f32,
        font_size: f32,
        color: Color,
    ) {
        let shaped = self.take_shaped(text, font_size);
        if let Some(mut pixmap) = PixmapMut::from_bytes(buffer, buf_width, buf_height) {
            let origin = (cx - shaped.width / 2.0, cy + font_size * BASELINE_OFFSET);
            self.draw_glyphs(&mut pixmap, &shaped.glyphs, origin, color.to_color_u8());
        }
        self.shaped = Some(shaped);
    }

    /// Rasterize glyphs with their baseline starting at `origin`
    fn draw_glyphs(
        &mut self,
        pixmap: &mut PixmapMut,
        glyphs: &[LayoutGlyph],
        origin: (f32, f32),
        color: ColorU8,
    ) {
        for glyph in glyphs {
            let physical = glyph.physical(origin, 1.0);
            let Some(image) = self
                .swash_cache
                .get_image(&mut self.font_system, physical.cache_key)
            else {
                continue;
            };
            let placement = &image.placement;
            blit_mask(
                pixmap,
                &image.data,
                placement.width,
                placement.height,
                physical.x + placement.left,
                physical.y - placement.top,
                color,
            );
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a circular arc out of cubic segments of at most 90° each
fn arc_path(cx: f32, cy: f32, r: f32, start_deg: f32, sweep_deg: f32) -> Option<Path> {
    if r <= 0.0 || sweep_deg.abs() <= f32::EPSILON {
        return None;
    }

    let sweep = sweep_deg.clamp(-360.0, 360.0).to_radians();
    let segments = (sweep.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
    let step = sweep / segments as f32;
    // Control point distance for a unit-circle cubic approximation
    let k = 4.0 / 3.0 * (step / 4.0).tan();

    let mut angle = start_deg.to_radians();
    let mut pb = PathBuilder::new();
    pb.move_to(cx + r * angle.cos(), cy + r * angle.sin());

    for _ in 0..segments {
        let next = angle + step;
        let (s0, c0) = angle.sin_cos();
        let (s1, c1) = next.sin_cos();
        pb.cubic_to(
            cx + r * (c0 - k * s0),
            cy + r * (s0 + k * c0),
            cx + r * (c1 + k * s1),
            cy + r * (s1 - k * c1),
            cx + r * c1,
            cy + r * s1,
        );
        angle = next;
    }

    pb.finish()
}

/// Source-over a coverage mask in `color` onto premultiplied pixels, with
/// the mask's top-left corner at (left, top)
fn blit_mask(
    pixmap: &mut PixmapMut,
    mask: &[u8],
    mask_width: u32,
    mask_height: u32,
    left: i32,
    top: i32,
    color: ColorU8,
) {
    let (width, height) = (pixmap.width() as i32, pixmap.height() as i32);
    let xs = left.max(0)..(left + mask_width as i32).min(width);
    let ys = top.max(0)..(top + mask_height as i32).min(height);
    if xs.is_empty() || ys.is_empty() {
        return;
    }

    let rgb = [color.red(), color.green(), color.blue()];
    let data = pixmap.data_mut();
    for y in ys {
        let mask_row = (y - top) as usize * mask_width as usize;
        let dst_row = y as usize * width as usize;
        for x in xs.clone() {
            let Some(&coverage) = mask.get(mask_row + (x - left) as usize) else {
                break;
            };
            if coverage == 0 {
                continue;
            }
            let a = mul_255(coverage, color.alpha());
            let start = (dst_row + x as usize) * 4;
            let Some(px) = data.get_mut(start..start + 4) else {
                continue;
            };
            for (dst, src) in px.iter_mut().zip(rgb) {
                *dst = mul_255(src, a).saturating_add(mul_255(*dst, 255 - a));
            }
            px[3] = a.saturating_add(mul_255(px[3], 255 - a));
        }
    }
}

/// `a * b / 255`, rounded
fn mul_255(a: u8, b: u8) -> u8 {
    ((a as u32 * b as u32 + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: u32 = 100;

    fn alpha_at(buffer: &[u8], x: u32, y: u32) -> u8 {
        buffer[((y * SIZE + x) * 4 + 3) as usize]
    }

    #[test]
    fn empty_sweep_has_no_path() {
        assert!(arc_path(50.0, 50.0, 40.0, -90.0, 0.0).is_none());
        assert!(arc_path(50.0, 50.0, 0.0, -90.0, 90.0).is_none());
    }

    #[test]
    fn full_circle_arc_stays_on_radius() {
        let path = arc_path(50.0, 50.0, 40.0, -90.0, 360.0).unwrap();
        let bounds = path.bounds();
        assert!((bounds.left() - 10.0).abs() < 0.5);
        assert!((bounds.right() - 90.0).abs() < 0.5);
        assert!((bounds.top() - 10.0).abs() < 0.5);
        assert!((bounds.bottom() - 90.0).abs() < 0.5);
    }

    #[test]
    fn quarter_arc_runs_clockwise_from_top() {
        let renderer = Renderer::new();
        let mut buffer = vec![0u8; (SIZE * SIZE * 4) as usize];
        renderer.stroke_arc(
            &mut buffer,
            SIZE,
            SIZE,
            50.0,
            50.0,
            40.0,
            -90.0,
            90.0,
            6.0,
            Color::from_rgba8(255, 0, 0, 255),
            Transform::identity(),
        );
        // Top and right are covered, bottom and left are not
        assert!(alpha_at(&buffer, 50, 10) > 200);
        assert!(alpha_at(&buffer, 90, 50) > 200);
        assert_eq!(alpha_at(&buffer, 50, 90), 0);
        assert_eq!(alpha_at(&buffer, 10, 50), 0);
    }

    #[test]
    fn mask_is_clipped_to_pixmap() {
        let mut buffer = vec![0u8; (SIZE * SIZE * 4) as usize];
        let mut pixmap = PixmapMut::from_bytes(&mut buffer, SIZE, SIZE).unwrap();
        let mask = [255u8; 16];
        let white = ColorU8::from_rgba(255, 255, 255, 255);
        blit_mask(&mut pixmap, &mask, 4, 4, -2, SIZE as i32 - 2, white);
        blit_mask(&mut pixmap, &mask, 4, 4, SIZE as i32, 0, white);

        assert_eq!(alpha_at(&buffer, 0, SIZE - 1), 255);
        assert_eq!(alpha_at(&buffer, 1, SIZE - 2), 255);
        assert_eq!(alpha_at(&buffer, 2, SIZE - 1), 0);
        assert_eq!(alpha_at(&buffer, SIZE - 1, 0), 0);
    }

    #[test]
    fn mask_blends_over_existing_pixels() {
        let mut buffer = vec![0u8; (SIZE * SIZE * 4) as usize];
        let mut pixmap = PixmapMut::from_bytes(&mut buffer, SIZE, SIZE).unwrap();
        pixmap.fill(Color::from_rgba8(0, 0, 255, 255));
        blit_mask(&mut pixmap, &[128], 1, 1, 5, 5, ColorU8::from_rgba(255, 0, 0, 255));

        let i = ((5 * SIZE + 5) * 4) as usize;
        assert_eq!(&buffer[i..i + 4], &[128, 0, 127, 255]);
        // Neighbours untouched
        assert_eq!(&buffer[i + 4..i + 8], &[0, 0, 255, 255]);
    }

    #[test]
    fn shaped_label_is_reused_at_same_size() {
        let mut renderer = Renderer::new();
        let mut buffer = vec![0u8; (SIZE * SIZE * 4) as usize];
        let white = Color::from_rgba8(255, 255, 255, 255);

        renderer.draw_text_centered(&mut buffer, SIZE, SIZE, "42%", 50.0, 50.0, 20.0, white);
        assert!(renderer.shaped.as_ref().is_some_and(|s| s.matches("42%", 200)));

        renderer.draw_text_centered(&mut buffer, SIZE, SIZE, "42%", 50.0, 50.0, 12.5, white);
        let shaped = renderer.shaped.as_ref().unwrap();
        assert!(shaped.matches("42%", 125));
        assert!(!shaped.matches("43%", 125));
    }

    #[test]
    fn glow_fades_towards_rim() {
        let renderer = Renderer::new();
        let mut buffer = vec![0u8; (SIZE * SIZE * 4) as usize];
        renderer.fill_radial_glow(
            &mut buffer,
            SIZE,
            SIZE,
            50.0,
            50.0,
            50.0,
            Color::from_rgba8(0, 230, 120, 200),
            Color::from_rgba8(0, 230, 120, 0),
            Transform::identity(),
        );
        let center = alpha_at(&buffer, 50, 50);
        let mid = alpha_at(&buffer, 75, 50);
        assert!(center > 150);
        assert!(mid < center);
        assert_eq!(alpha_at(&buffer, 0, 0), 0);
    }
}
