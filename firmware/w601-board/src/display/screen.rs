//! Generic LCD on top of an RGB565 draw target
//!
//! Validates coordinates against the target size, then rasterizes with
//! embedded-graphics primitives. Nothing is drawn for a rejected call.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use embedded_hal::digital::{OutputPin, PinState};
use log::{debug, trace};

use super::font::{glyph_style, Scaled};
use super::{Color, DisplayError, FontSize, Lcd};

/// LCD handle: draw target plus backlight pin and pen colors
pub struct Screen<D, BL> {
    target: D,
    backlight: BL,
    backlight_on: bool,
    back: Color,
    fore: Color,
}

impl<D, BL> Screen<D, BL>
where
    D: DrawTarget<Color = Rgb565> + OriginDimensions,
    D::Error: Into<DisplayError>,
    BL: OutputPin,
{
    /// Wrap a draw target; pens default to black on white
    pub fn new(target: D, backlight: BL) -> Self {
        Self {
            target,
            backlight,
            backlight_on: false,
            back: Color::WHITE,
            fore: Color::BLACK,
        }
    }

    pub fn target(&self) -> &D {
        &self.target
    }

    pub fn backlight_on(&self) -> bool {
        self.backlight_on
    }

    /// Current `(back, fore)` pen colors
    pub fn colors(&self) -> (Color, Color) {
        (self.back, self.fore)
    }

    fn check_point(&self, x: u16, y: u16) -> Result<Point, DisplayError> {
        let size = self.target.size();
        if (x as u32) < size.width && (y as u32) < size.height {
            Ok(Point::new(x as i32, y as i32))
        } else {
            Err(DisplayError::InvalidCoordinates)
        }
    }

    fn stroke(&self) -> PrimitiveStyle<Rgb565> {
        PrimitiveStyle::with_stroke(self.fore.into(), 1)
    }

    fn render<T>(&mut self, item: &T) -> Result<(), DisplayError>
    where
        T: Drawable<Color = Rgb565>,
    {
        item.draw(&mut self.target)
            .map_err(Into::<DisplayError>::into)?;
        Ok(())
    }
}

impl<D, BL> Lcd for Screen<D, BL>
where
    D: DrawTarget<Color = Rgb565> + OriginDimensions,
    D::Error: Into<DisplayError>,
    BL: OutputPin,
{
    type Error = DisplayError;

    fn set_backlight(&mut self, on: bool) -> Result<(), DisplayError> {
        debug!("backlight {}", if on { "on" } else { "off" });
        self.backlight
            .set_state(PinState::from(on))
            .map_err(|_| DisplayError::Backlight)?;
        self.backlight_on = on;
        Ok(())
    }

    fn fill(&mut self, color: Color) -> Result<(), DisplayError> {
        trace!("fill {:#06x}", color.0);
        self.target.clear(color.into()).map_err(Into::into)
    }

    fn set_pixel(&mut self, x: u16, y: u16, color: Color) -> Result<(), DisplayError> {
        trace!("pixel ({}, {}) {:#06x}", x, y, color.0);
        let point = self.check_point(x, y)?;
        self.render(&Pixel(point, color.into()))
    }

    fn draw_text(&mut self, text: &str, x: u16, y: u16, size: FontSize) -> Result<(), DisplayError> {
        trace!("text {:?} at ({}, {}) size {}", text, x, y, size.px());
        let origin = self.check_point(x, y)?;
        let glyph = glyph_style(size);
        let cell = Size::new(size.cell_width() as u32, size.px() as u32);
        let right_edge = self.target.size().width as i32;
        let style = MonoTextStyle::new(glyph.font, Rgb565::from(self.fore));
        let back = Rgb565::from(self.back);

        let mut cursor = origin;
        let mut utf8 = [0u8; 4];
        for ch in text.chars() {
            // Glyphs crossing the right edge are clipped
            if cursor.x + cell.width as i32 > right_edge {
                break;
            }
            self.target
                .fill_solid(&Rectangle::new(cursor, cell), back)
                .map_err(Into::<DisplayError>::into)?;

            let mut scaled = Scaled::new(
                &mut self.target,
                cursor + Point::new(0, glyph.y_offset),
                glyph.scale,
            );
            Text::with_baseline(ch.encode_utf8(&mut utf8), Point::zero(), style, Baseline::Top)
                .draw(&mut scaled)
                .map_err(Into::<DisplayError>::into)?;

            cursor.x += cell.width as i32;
        }
        Ok(())
    }

    fn draw_line(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), DisplayError> {
        trace!("line ({}, {}) -> ({}, {})", x0, y0, x1, y1);
        let start = self.check_point(x0, y0)?;
        let end = self.check_point(x1, y1)?;
        let line = Line::new(start, end).into_styled(self.stroke());
        self.render(&line)
    }

    fn draw_rectangle(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), DisplayError> {
        trace!("rectangle ({}, {}) -> ({}, {})", x0, y0, x1, y1);
        let a = self.check_point(x0, y0)?;
        let b = self.check_point(x1, y1)?;
        let rect = Rectangle::with_corners(a, b).into_styled(self.stroke());
        self.render(&rect)
    }

    fn draw_circle(&mut self, cx: u16, cy: u16, radius: u16) -> Result<(), DisplayError> {
        trace!("circle ({}, {}) r {}", cx, cy, radius);
        // The whole outline must be on-screen
        let left = cx.checked_sub(radius).ok_or(DisplayError::InvalidCoordinates)?;
        let top = cy.checked_sub(radius).ok_or(DisplayError::InvalidCoordinates)?;
        let right = cx.checked_add(radius).ok_or(DisplayError::InvalidCoordinates)?;
        let bottom = cy.checked_add(radius).ok_or(DisplayError::InvalidCoordinates)?;
        self.check_point(left, top)?;
        self.check_point(right, bottom)?;

        let center = Point::new(cx as i32, cy as i32);
        let circle = Circle::with_center(center, 2 * radius as u32 + 1).into_styled(self.stroke());
        self.render(&circle)
    }

    fn set_color(&mut self, back: Color, fore: Color) -> Result<(), DisplayError> {
        debug!("pens back {:#06x} fore {:#06x}", back.0, fore.0);
        self.back = back;
        self.fore = fore;
        Ok(())
    }
}
