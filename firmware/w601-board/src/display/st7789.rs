//! ST7789 LCD Controller Driver
//!
//! SPI driver for the ST7789 TFT controller on the W601 IoT board's
//! 240×240 panel. Commands go out with DC low, parameters and pixel data
//! with DC high; pixels are big-endian RGB565.

use embedded_graphics::pixelcolor::{IntoStorage, Rgb565};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;
use log::debug;

use super::DisplayError;
use crate::{LCD_HEIGHT, LCD_WIDTH};

/// ST7789 commands
mod cmd {
    pub const SWRESET: u8 = 0x01;
    pub const SLPOUT: u8 = 0x11;
    pub const NORON: u8 = 0x13;
    pub const INVON: u8 = 0x21;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A; // Column address set
    pub const RASET: u8 = 0x2B; // Row address set
    pub const RAMWR: u8 = 0x2C; // Memory write
    pub const MADCTL: u8 = 0x36; // Memory access control
    pub const COLMOD: u8 = 0x3A; // Pixel format
}

/// 16 bits per pixel, 65K colors
const COLMOD_RGB565: u8 = 0x55;

/// Pixels buffered per SPI write
const CHUNK_PIXELS: usize = 32;

/// ST7789 driver
pub struct St7789<SPI, DC, RST> {
    spi: SPI,
    dc: DC,
    rst: RST,
    width: u16,
    height: u16,
    initialized: bool,
}

impl<SPI, DC, RST> St7789<SPI, DC, RST>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
{
    /// Create a driver for the board's 240×240 panel
    pub fn new(spi: SPI, dc: DC, rst: RST) -> Self {
        Self {
            spi,
            dc,
            rst,
            width: LCD_WIDTH,
            height: LCD_HEIGHT,
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Hardware reset and power-up sequence
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), DisplayError> {
        self.rst.set_low().map_err(|_| DisplayError::Bus)?;
        delay.delay_ms(10);
        self.rst.set_high().map_err(|_| DisplayError::Bus)?;
        delay.delay_ms(120);

        self.command(cmd::SWRESET, &[])?;
        delay.delay_ms(150);
        self.command(cmd::SLPOUT, &[])?;
        delay.delay_ms(120);

        self.command(cmd::COLMOD, &[COLMOD_RGB565])?;
        self.command(cmd::MADCTL, &[0x00])?;
        self.command(cmd::INVON, &[])?;
        self.command(cmd::NORON, &[])?;
        self.command(cmd::DISPON, &[])?;

        self.initialized = true;
        debug!("st7789 initialized {}x{}", self.width, self.height);
        Ok(())
    }

    fn command(&mut self, command: u8, params: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::Bus)?;
        self.spi.write(&[command]).map_err(|_| DisplayError::Bus)?;
        if !params.is_empty() {
            self.dc.set_high().map_err(|_| DisplayError::Bus)?;
            self.spi.write(params).map_err(|_| DisplayError::Bus)?;
        }
        Ok(())
    }

    /// Set the drawing window (inclusive) and start a memory write
    pub fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), DisplayError> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }
        if x0 > x1 || x1 >= self.width || y0 > y1 || y1 >= self.height {
            return Err(DisplayError::InvalidCoordinates);
        }

        let [x0h, x0l] = x0.to_be_bytes();
        let [x1h, x1l] = x1.to_be_bytes();
        let [y0h, y0l] = y0.to_be_bytes();
        let [y1h, y1l] = y1.to_be_bytes();
        self.command(cmd::CASET, &[x0h, x0l, x1h, x1l])?;
        self.command(cmd::RASET, &[y0h, y0l, y1h, y1l])?;
        self.command(cmd::RAMWR, &[])
    }

    /// Stream RGB565 words into the current window
    pub fn write_pixels<I>(&mut self, pixels: I) -> Result<(), DisplayError>
    where
        I: IntoIterator<Item = u16>,
    {
        self.dc.set_high().map_err(|_| DisplayError::Bus)?;

        let mut chunk = [0u8; CHUNK_PIXELS * 2];
        let mut len = 0;
        for pixel in pixels {
            chunk[len..len + 2].copy_from_slice(&pixel.to_be_bytes());
            len += 2;
            if len == chunk.len() {
                self.spi.write(&chunk).map_err(|_| DisplayError::Bus)?;
                len = 0;
            }
        }
        if len > 0 {
            self.spi.write(&chunk[..len]).map_err(|_| DisplayError::Bus)?;
        }
        Ok(())
    }
}

impl<SPI, DC, RST> OriginDimensions for St7789<SPI, DC, RST> {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl<SPI, DC, RST> DrawTarget for St7789<SPI, DC, RST>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
{
    type Color = Rgb565;
    type Error = DisplayError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (u16::try_from(point.x), u16::try_from(point.y)) {
                if x < self.width && y < self.height {
                    self.set_window(x, y, x, y)?;
                    self.write_pixels(core::iter::once(color.into_storage()))?;
                }
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };

        self.set_window(
            area.top_left.x as u16,
            area.top_left.y as u16,
            bottom_right.x as u16,
            bottom_right.y as u16,
        )?;
        let count = (area.size.width * area.size.height) as usize;
        self.write_pixels(core::iter::repeat(color.into_storage()).take(count))
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill_solid(&self.bounding_box(), color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{Color, FontSize, Lcd, Screen};
    use crate::hal::{Gpio, PinMode};
    use crate::pins;
    use crate::sim::{SimClock, SimDelay, SimGpio};
    use core::cell::{Cell, RefCell};
    use core::convert::Infallible;
    use embedded_hal::spi::{ErrorType as SpiErrorType, Operation};
    use std::rc::Rc;
    use std::vec::Vec;

    /// A byte transfer as seen on the wire
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Frame {
        Command(u8),
        Data(Vec<u8>),
    }

    #[derive(Clone, Default)]
    struct Wire {
        dc_high: Rc<Cell<bool>>,
        frames: Rc<RefCell<Vec<Frame>>>,
    }

    struct TestSpi(Wire);

    impl SpiErrorType for TestSpi {
        type Error = Infallible;
    }

    impl SpiDevice for TestSpi {
        fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
            for op in operations.iter() {
                if let Operation::Write(bytes) = op {
                    let mut frames = self.0.frames.borrow_mut();
                    if self.0.dc_high.get() {
                        // Consecutive data writes belong to one transfer
                        if let Some(Frame::Data(data)) = frames.last_mut() {
                            data.extend_from_slice(bytes);
                            continue;
                        }
                        frames.push(Frame::Data(bytes.to_vec()));
                    } else {
                        for &b in bytes.iter() {
                            frames.push(Frame::Command(b));
                        }
                    }
                }
            }
            Ok(())
        }
    }

    struct TestPin(Rc<Cell<bool>>);

    impl embedded_hal::digital::ErrorType for TestPin {
        type Error = Infallible;
    }

    impl OutputPin for TestPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.set(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.set(true);
            Ok(())
        }
    }

    fn driver() -> (St7789<TestSpi, TestPin, TestPin>, Wire, SimClock) {
        let wire = Wire::default();
        let dc = TestPin(wire.dc_high.clone());
        let rst = TestPin(Rc::new(Cell::new(false)));
        let clock = SimClock::new();
        let mut lcd = St7789::new(TestSpi(wire.clone()), dc, rst);
        let mut delay = SimDelay::new(clock.clone());
        lcd.init(&mut delay).unwrap();
        (lcd, wire, clock)
    }

    #[test]
    fn test_init_sequence() {
        let (lcd, wire, clock) = driver();
        assert!(lcd.is_initialized());
        assert_eq!(
            *wire.frames.borrow(),
            [
                Frame::Command(cmd::SWRESET),
                Frame::Command(cmd::SLPOUT),
                Frame::Command(cmd::COLMOD),
                Frame::Data(std::vec![COLMOD_RGB565]),
                Frame::Command(cmd::MADCTL),
                Frame::Data(std::vec![0x00]),
                Frame::Command(cmd::INVON),
                Frame::Command(cmd::NORON),
                Frame::Command(cmd::DISPON),
            ]
        );
        assert_eq!(clock.now_ms(), 10 + 120 + 150 + 120);
    }

    #[test]
    fn test_draw_requires_init() {
        let wire = Wire::default();
        let mut lcd = St7789::new(
            TestSpi(wire.clone()),
            TestPin(wire.dc_high.clone()),
            TestPin(Rc::new(Cell::new(false))),
        );
        assert_eq!(lcd.set_window(0, 0, 1, 1), Err(DisplayError::NotInitialized));
        assert_eq!(
            lcd.clear(Rgb565::from(crate::Color::RED)),
            Err(DisplayError::NotInitialized)
        );
        assert!(wire.frames.borrow().is_empty());
    }

    #[test]
    fn test_pixel_framing() {
        let (mut lcd, wire, _clock) = driver();
        wire.frames.borrow_mut().clear();

        Pixel(Point::new(50, 300), Rgb565::from(crate::Color::BLUE))
            .draw(&mut lcd)
            .unwrap();
        assert!(wire.frames.borrow().is_empty());

        Pixel(Point::new(50, 200), Rgb565::from(crate::Color::BLUE))
            .draw(&mut lcd)
            .unwrap();
        assert_eq!(
            *wire.frames.borrow(),
            [
                Frame::Command(cmd::CASET),
                Frame::Data(std::vec![0, 50, 0, 50]),
                Frame::Command(cmd::RASET),
                Frame::Data(std::vec![0, 200, 0, 200]),
                Frame::Command(cmd::RAMWR),
                Frame::Data(std::vec![0x00, 0x1F]),
            ]
        );
    }

    #[test]
    fn test_clear_streams_whole_panel() {
        let (mut lcd, wire, _clock) = driver();
        wire.frames.borrow_mut().clear();

        lcd.clear(Rgb565::from(crate::Color::RED)).unwrap();
        let frames = wire.frames.borrow();
        assert_eq!(frames[1], Frame::Data(std::vec![0, 0, 0, 239]));
        assert_eq!(frames[3], Frame::Data(std::vec![0, 0, 0, 239]));
        match &frames[5] {
            Frame::Data(data) => {
                assert_eq!(data.len(), 240 * 240 * 2);
                assert!(data.chunks(2).all(|px| px == [0xF8, 0x00]));
            }
            other => panic!("expected pixel data, got {:?}", other),
        }
    }

    /// `((x0, x1), (y0, y1), pixel bytes)` of one memory write
    type Window = ((u16, u16), (u16, u16), Vec<u8>);

    fn span(bytes: &[u8]) -> (u16, u16) {
        (
            u16::from_be_bytes([bytes[0], bytes[1]]),
            u16::from_be_bytes([bytes[2], bytes[3]]),
        )
    }

    fn windows(frames: &[Frame]) -> Vec<Window> {
        let mut out = Vec::new();
        let mut i = 0;
        while i < frames.len() {
            if let [Frame::Command(cmd::CASET), Frame::Data(x), Frame::Command(cmd::RASET), Frame::Data(y), Frame::Command(cmd::RAMWR), Frame::Data(px), ..] =
                &frames[i..]
            {
                out.push((span(x), span(y), px.clone()));
                i += 6;
            } else {
                i += 1;
            }
        }
        out
    }

    #[test]
    fn test_screen_draws_through_panel() {
        let (panel, wire, _clock) = driver();
        let mut gpio = SimGpio::new(SimClock::new());
        let backlight = gpio.output(pins::LCD_BACKLIGHT, PinMode::OutputPushPull).unwrap();
        let mut screen = Screen::new(panel, backlight);
        wire.frames.borrow_mut().clear();

        screen.set_backlight(true).unwrap();
        assert!(wire.frames.borrow().is_empty());

        screen.fill(Color::RED).unwrap();
        let fill = windows(&wire.frames.borrow());
        assert_eq!(fill.len(), 1);
        assert_eq!((fill[0].0, fill[0].1), ((0, 239), (0, 239)));
        assert_eq!(fill[0].2.len(), 240 * 240 * 2);

        wire.frames.borrow_mut().clear();
        screen.draw_text("hello RT-Thread", 0, 48, FontSize::Px32).unwrap();
        let text = windows(&wire.frames.borrow());

        // First cell background, white
        assert_eq!((text[0].0, text[0].1), ((0, 15), (48, 79)));
        assert!(text[0].2.chunks(2).all(|px| px == [0xFF, 0xFF]));

        let cells: Vec<&Window> = text.iter().filter(|w| w.2.len() == 16 * 32 * 2).collect();
        assert_eq!(cells.len(), 15);
        assert_eq!(cells[14].0, (224, 239));

        // Glyph pixels land as 2x2 black blocks inside the 26 px glyph band
        let blocks: Vec<&Window> = text.iter().filter(|w| w.2.len() == 2 * 2 * 2).collect();
        assert!(!blocks.is_empty());
        for (x, y, px) in blocks {
            assert_eq!((x.1 - x.0, y.1 - y.0), (1, 1));
            assert!(y.0 >= 51 && y.1 <= 76, "{:?}", y);
            assert!(px.iter().all(|&b| b == 0));
        }

        wire.frames.borrow_mut().clear();
        screen.draw_circle(150, 150, 80).unwrap();
        let circle = windows(&wire.frames.borrow());
        assert!(!circle.is_empty());
        for (x, y, px) in &circle {
            assert!(x.0 >= 70 && x.1 <= 230 && y.0 >= 70 && y.1 <= 230);
            assert!(px.iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn test_window_bounds() {
        let (mut lcd, _wire, _clock) = driver();
        assert_eq!(lcd.set_window(0, 0, 240, 10), Err(DisplayError::InvalidCoordinates));
        assert_eq!(lcd.set_window(10, 0, 5, 10), Err(DisplayError::InvalidCoordinates));
        assert!(lcd.set_window(0, 0, 239, 239).is_ok());
    }
}
