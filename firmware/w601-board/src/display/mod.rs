//! LCD interface and drivers
//!
//! [`Lcd`] is the drawing surface the demo programs call into. [`Screen`]
//! implements it on top of any RGB565 draw target: the in-RAM
//! [`Framebuffer`] or the [`St7789`] panel controller.

pub mod font;
pub mod framebuffer;
pub mod screen;
pub mod st7789;

pub use framebuffer::Framebuffer;
pub use screen::Screen;
pub use st7789::St7789;

use core::convert::Infallible;
use core::fmt;

use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::{IntoStorage, Rgb565};

/// RGB565 color (16-bit: 5 red, 6 green, 5 blue)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u16);

impl Color {
    pub const BLACK: Self = Self(0x0000);
    pub const WHITE: Self = Self(0xFFFF);
    pub const RED: Self = Self(0xF800);
    pub const GREEN: Self = Self(0x07E0);
    pub const BLUE: Self = Self(0x001F);
    pub const GRAY: Self = Self(0x8430);
    pub const YELLOW: Self = Self(0xFFE0);
    pub const CYAN: Self = Self(0x7FFF);
    pub const MAGENTA: Self = Self(0xF81F);
    pub const BROWN: Self = Self(0xBC40);

    /// Create RGB565 from RGB888 components
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let r5 = (r >> 3) as u16;
        let g6 = (g >> 2) as u16;
        let b5 = (b >> 3) as u16;
        Self((r5 << 11) | (g6 << 5) | b5)
    }

    /// Expand to RGB888, replicating high bits into the low ones
    pub const fn to_rgb888(self) -> (u8, u8, u8) {
        let r5 = ((self.0 >> 11) & 0x1F) as u8;
        let g6 = ((self.0 >> 5) & 0x3F) as u8;
        let b5 = (self.0 & 0x1F) as u8;
        ((r5 << 3) | (r5 >> 2), (g6 << 2) | (g6 >> 4), (b5 << 3) | (b5 >> 2))
    }
}

impl From<Color> for Rgb565 {
    fn from(color: Color) -> Self {
        Rgb565::from(RawU16::new(color.0))
    }
}

impl From<Rgb565> for Color {
    fn from(color: Rgb565) -> Self {
        Color(color.into_storage())
    }
}

/// Text size in pixels; a glyph cell is `px / 2` wide and `px` tall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontSize {
    Px16,
    Px24,
    Px32,
}

impl FontSize {
    /// Cell height in pixels
    pub const fn px(self) -> u16 {
        match self {
            FontSize::Px16 => 16,
            FontSize::Px24 => 24,
            FontSize::Px32 => 32,
        }
    }

    /// Horizontal advance per character
    pub const fn cell_width(self) -> u16 {
        self.px() / 2
    }
}

impl TryFrom<u8> for FontSize {
    type Error = DisplayError;

    fn try_from(px: u8) -> Result<Self, Self::Error> {
        match px {
            16 => Ok(FontSize::Px16),
            24 => Ok(FontSize::Px24),
            32 => Ok(FontSize::Px32),
            other => Err(DisplayError::UnsupportedFontSize(other)),
        }
    }
}

/// Display errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    NotInitialized,
    /// The panel bus or draw target rejected a transfer
    Bus,
    /// The backlight pin could not be driven
    Backlight,
    InvalidCoordinates,
    UnsupportedFontSize(u8),
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::NotInitialized => write!(f, "display not initialized"),
            DisplayError::Bus => write!(f, "display bus transfer failed"),
            DisplayError::Backlight => write!(f, "backlight pin write failed"),
            DisplayError::InvalidCoordinates => write!(f, "coordinates outside the display"),
            DisplayError::UnsupportedFontSize(px) => write!(f, "unsupported font size {}", px),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DisplayError {}

impl From<Infallible> for DisplayError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// LCD drawing surface
///
/// Lines, outlines and glyphs use the fore color; text cells are filled
/// with the back color first.
pub trait Lcd {
    type Error;

    fn set_backlight(&mut self, on: bool) -> Result<(), Self::Error>;

    /// Fill the whole screen
    fn fill(&mut self, color: Color) -> Result<(), Self::Error>;

    fn set_pixel(&mut self, x: u16, y: u16, color: Color) -> Result<(), Self::Error>;

    /// Draw `text` with its top-left cell corner at `(x, y)`
    fn draw_text(&mut self, text: &str, x: u16, y: u16, size: FontSize) -> Result<(), Self::Error>;

    fn draw_line(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), Self::Error>;

    /// Rectangle outline with inclusive corners
    fn draw_rectangle(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), Self::Error>;

    fn draw_circle(&mut self, cx: u16, cy: u16, radius: u16) -> Result<(), Self::Error>;

    /// Set the pen colors used by text and outlines
    fn set_color(&mut self, back: Color, fore: Color) -> Result<(), Self::Error>;
}
