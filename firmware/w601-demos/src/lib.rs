//! # W601 IoT Board Demo Programs
//!
//! Two programs written against the board HAL:
//!
//! - [`blink`]: toggles the red LED every 500 ms, forever.
//! - [`lcd`]: walks the LCD through backlight, fills, a pixel, text at three
//!   sizes, a line, a rectangle and a circle, then returns.
//!
//! Both are generic over the HAL traits, so the same code drives the board
//! or the host simulator in `w601_board::sim`.

#![no_std]

#[cfg(test)]
extern crate std;

pub mod blink;
pub mod lcd;

pub use blink::{BlinkConfig, BlinkError};
