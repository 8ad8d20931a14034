//! In-memory surface
//!
//! Used on hosts without a layered-window implementation and in tests.
//! Presenting copies the working buffer so callers can inspect exactly what
//! would have reached the screen.

use super::{OverlayConfig, OverlayPlatform, PlatformError};

pub struct HeadlessSurface {
    width: u32,
    height: u32,
    pixel_data: Vec<u8>,
    presented: Vec<u8>,
    last_alpha: Option<u8>,
    present_count: usize,
    fail_presents: bool,
}

impl HeadlessSurface {
    pub fn new(config: &OverlayConfig) -> Self {
        let size = (config.width * config.height * 4) as usize;
        Self {
            width: config.width,
            height: config.height,
            pixel_data: vec![0u8; size],
            presented: vec![0u8; size],
            last_alpha: None,
            present_count: 0,
            fail_presents: false,
        }
    }

    /// Make every following `present` fail (exercises the skip-frame path)
    pub fn set_fail_presents(&mut self, fail: bool) {
        self.fail_presents = fail;
    }

    /// Global alpha of the last successful present
    pub fn last_alpha(&self) -> Option<u8> {
        self.last_alpha
    }

    pub fn present_count(&self) -> usize {
        self.present_count
    }

    /// The last presented frame
    pub fn presented(&self) -> &[u8] {
        &self.presented
    }

    /// RGBA of a presented pixel (before the global alpha is applied)
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        self.presented
            .get(i..i + 4)
            .and_then(|p| p.try_into().ok())
    }
}

impl OverlayPlatform for HeadlessSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel_buffer(&mut self) -> Option<&mut [u8]> {
        Some(&mut self.pixel_data)
    }

    fn present(&mut self, alpha: u8) -> Result<(), PlatformError> {
        if self.fail_presents {
            return Err(PlatformError::Present("headless present disabled".to_string()));
        }
        self.presented.copy_from_slice(&self.pixel_data);
        self.last_alpha = Some(alpha);
        self.present_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_snapshots_buffer() {
        let mut surface = HeadlessSurface::new(&OverlayConfig::default());
        if let Some(buf) = surface.pixel_buffer() {
            buf[..4].copy_from_slice(&[1, 2, 3, 4]);
        }
        assert_eq!(surface.pixel(0, 0), Some([0, 0, 0, 0]));

        surface.present(200).unwrap();
        assert_eq!(surface.pixel(0, 0), Some([1, 2, 3, 4]));
        assert_eq!(surface.last_alpha(), Some(200));
        assert_eq!(surface.present_count(), 1);
    }

    #[test]
    fn failing_present_keeps_previous_frame() {
        let mut surface = HeadlessSurface::new(&OverlayConfig::default());
        surface.set_fail_presents(true);
        assert!(surface.present(255).is_err());
        assert_eq!(surface.present_count(), 0);
        assert_eq!(surface.last_alpha(), None);
    }

    #[test]
    fn out_of_bounds_pixel_is_none() {
        let surface = HeadlessSurface::new(&OverlayConfig::default());
        assert_eq!(surface.pixel(350, 0), None);
    }
}
