//! RGB565 Framebuffer
//!
//! Bounds-checked in-RAM image of the 240×240 panel. Used as the draw
//! target on the host and for off-screen composition.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use super::Color;
use crate::{LCD_HEIGHT, LCD_WIDTH};

const PIXELS: usize = (LCD_WIDTH as usize) * (LCD_HEIGHT as usize);

/// Framebuffer for the 240×240 RGB565 panel
pub struct Framebuffer {
    buffer: [u16; PIXELS],
}

impl Framebuffer {
    /// Create a new framebuffer initialized to black
    pub const fn new() -> Self {
        Self { buffer: [0; PIXELS] }
    }

    #[inline]
    fn index(x: u16, y: u16) -> Option<usize> {
        if x < LCD_WIDTH && y < LCD_HEIGHT {
            Some((y as usize) * (LCD_WIDTH as usize) + (x as usize))
        } else {
            None
        }
    }

    /// Get pixel at coordinates
    pub fn get_pixel(&self, x: u16, y: u16) -> Option<Color> {
        Self::index(x, y).map(|idx| Color(self.buffer[idx]))
    }

    /// Set pixel at coordinates (bounds-checked)
    ///
    /// Returns false if coordinates are out of bounds.
    pub fn set_pixel(&mut self, x: u16, y: u16, color: Color) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.buffer[idx] = color.0;
                true
            }
            None => false,
        }
    }

    /// Fill the whole framebuffer with a solid color
    pub fn fill(&mut self, color: Color) {
        self.buffer.fill(color.0);
    }

    /// Fill a rectangle (bounds-checked)
    pub fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, color: Color) -> bool {
        if x as u32 + w as u32 > LCD_WIDTH as u32 || y as u32 + h as u32 > LCD_HEIGHT as u32 {
            return false;
        }

        for row in y..(y + h) {
            let start = (row as usize) * (LCD_WIDTH as usize) + (x as usize);
            self.buffer[start..start + w as usize].fill(color.0);
        }
        true
    }

    /// Raw RGB565 words, row-major
    pub fn as_slice(&self) -> &[u16] {
        &self.buffer
    }

    /// Row-major RGB888 pixels
    pub fn to_rgb888(&self) -> impl Iterator<Item = (u8, u8, u8)> + '_ {
        self.buffer.iter().map(|&raw| Color(raw).to_rgb888())
    }

    /// Number of pixels currently holding `color`
    pub fn count(&self, color: Color) -> usize {
        self.buffer.iter().filter(|&&raw| raw == color.0).count()
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(LCD_WIDTH as u32, LCD_HEIGHT as u32)
    }
}

/// Off-screen pixels are dropped.
impl DrawTarget for Framebuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (u16::try_from(point.x), u16::try_from(point.y)) {
                self.set_pixel(x, y, color.into());
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color.into());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_bounds() {
        let mut fb = Framebuffer::new();
        assert!(fb.set_pixel(239, 239, Color::RED));
        assert!(!fb.set_pixel(240, 0, Color::RED));
        assert!(!fb.set_pixel(0, 240, Color::RED));
        assert_eq!(fb.get_pixel(239, 239), Some(Color::RED));
        assert_eq!(fb.get_pixel(240, 239), None);
    }

    #[test]
    fn test_fill_rect() {
        let mut fb = Framebuffer::new();
        assert!(fb.fill_rect(10, 10, 5, 4, Color::BLUE));
        assert_eq!(fb.count(Color::BLUE), 20);
        assert_eq!(fb.get_pixel(14, 13), Some(Color::BLUE));
        assert_eq!(fb.get_pixel(15, 13), Some(Color::BLACK));

        // Leaves the screen: nothing drawn
        assert!(!fb.fill_rect(230, 0, 20, 1, Color::RED));
        assert_eq!(fb.count(Color::RED), 0);
    }

    #[test]
    fn test_raw_words_are_row_major() {
        let mut fb = Framebuffer::new();
        fb.set_pixel(3, 0, Color::GREEN);
        fb.set_pixel(0, 2, Color::BLUE);

        let raw = fb.as_slice();
        assert_eq!(raw.len(), 240 * 240);
        assert_eq!(raw[3], 0x07E0);
        assert_eq!(raw[2 * 240], 0x001F);
        assert_eq!(raw.iter().filter(|&&w| w != 0).count(), 2);
    }

    #[test]
    fn test_draw_target_clips() {
        let mut fb = Framebuffer::new();
        let pixels = [
            Pixel(Point::new(-1, 5), Rgb565::from(Color::RED)),
            Pixel(Point::new(5, 300), Rgb565::from(Color::RED)),
            Pixel(Point::new(5, 5), Rgb565::from(Color::RED)),
        ];
        fb.draw_iter(pixels).unwrap();
        assert_eq!(fb.count(Color::RED), 1);

        fb.clear(Rgb565::from(Color::WHITE)).unwrap();
        assert_eq!(fb.count(Color::WHITE), 240 * 240);
    }
}
