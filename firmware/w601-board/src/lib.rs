//! W601 IoT Board Support
//!
//! Board-level HAL surface used by the demo programs: GPIO pin handles,
//! the LCD drawing interface, and the drivers behind it.
//!
//! # Architecture
//!
//! ```text
//!  Demo programs (blink, lcd)
//!        │                 │
//!        ▼                 ▼
//! ┌─────────────┐   ┌─────────────┐
//! │ Gpio /      │   │  Lcd        │
//! │ OutputPin   │   │  (Screen)   │
//! └──────┬──────┘   └──────┬──────┘
//!        │          ┌──────┴──────┐
//!        │          ▼             ▼
//!        │   ┌─────────────┐ ┌─────────────┐
//!        │   │ Framebuffer │ │  ST7789     │
//!        │   │ (RAM)       │ │  (SPI)      │
//!        │   └─────────────┘ └──────┬──────┘
//!        ▼                          ▼
//!            W601 GPIO / SPI peripherals
//! ```
//!
//! With the `std` feature the [`sim`] module provides a host-side board:
//! a simulated millisecond clock, recording pins and a recording LCD.

#![no_std]

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod display;
pub mod hal;

#[cfg(any(test, feature = "std"))]
pub mod sim;

// Re-export main types
pub use display::{Color, DisplayError, FontSize, Framebuffer, Lcd, Screen, St7789};
pub use hal::{Gpio, GpioError, Level, PinId, PinMode};

/// LCD panel width in pixels
pub const LCD_WIDTH: u16 = 240;
/// LCD panel height in pixels
pub const LCD_HEIGHT: u16 = 240;

/// Named pins on the W601 IoT board
pub mod pins {
    use crate::hal::PinId;

    /// Red user LED
    pub const LED_RED: PinId = PinId::new("led_red", 38);
    /// LCD backlight enable
    pub const LCD_BACKLIGHT: PinId = PinId::new("lcd_bl", 39);
}
