//! Glyph sources for the three text sizes
//!
//! The board driver draws ASCII in 8×16, 12×24 and 16×32 cells. Glyphs
//! come from the embedded-graphics mono fonts, integer-scaled into the
//! cell and centered vertically.

use embedded_graphics::mono_font::ascii::{FONT_6X12, FONT_8X13};
use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::FontSize;

/// How a [`FontSize`] maps onto a mono font
#[derive(Clone, Copy)]
pub struct GlyphStyle {
    pub font: &'static MonoFont<'static>,
    pub scale: u32,
    /// Rows between the top of the cell and the top of the glyph
    pub y_offset: i32,
}

pub fn glyph_style(size: FontSize) -> GlyphStyle {
    let (font, scale): (&'static MonoFont<'static>, u32) = match size {
        FontSize::Px16 => (&FONT_8X13, 1),
        FontSize::Px24 => (&FONT_6X12, 2),
        FontSize::Px32 => (&FONT_8X13, 2),
    };
    let glyph_height = font.character_size.height * scale;
    let y_offset = (size.px() as i32 - glyph_height as i32) / 2;
    GlyphStyle { font, scale, y_offset }
}

/// Draw target adapter: each pixel becomes a `scale`×`scale` block at
/// `origin + p * scale` on the inner target.
pub struct Scaled<'a, D> {
    inner: &'a mut D,
    origin: Point,
    scale: u32,
}

impl<'a, D> Scaled<'a, D> {
    pub fn new(inner: &'a mut D, origin: Point, scale: u32) -> Self {
        Self {
            inner,
            origin,
            scale: scale.max(1),
        }
    }
}

impl<D: DrawTarget> Dimensions for Scaled<'_, D> {
    fn bounding_box(&self) -> Rectangle {
        let inner = self.inner.bounding_box();
        Rectangle::new(
            (inner.top_left - self.origin) / self.scale as i32,
            inner.size / self.scale,
        )
    }
}

impl<D: DrawTarget> DrawTarget for Scaled<'_, D> {
    type Color = D::Color;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let block = Size::new_equal(self.scale);
        for Pixel(point, color) in pixels {
            let top_left = self.origin + point * self.scale as i32;
            self.inner.fill_solid(&Rectangle::new(top_left, block), color)?;
        }
        Ok(())
    }
}
