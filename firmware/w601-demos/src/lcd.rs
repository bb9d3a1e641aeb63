//! LCD drawing demo
//!
//! Exercises every drawing primitive once (the line twice) and returns.
//! The first failing call ends the demo with that call's error.

use log::info;
use w601_board::display::{Color, FontSize, Lcd};

pub const GREETING: &str = "hello RT-Thread";

pub fn run<L: Lcd>(lcd: &mut L) -> Result<(), L::Error> {
    info!("lcd demo start");

    lcd.set_backlight(false)?;
    lcd.set_backlight(true)?;

    lcd.fill(Color::BLACK)?;
    lcd.fill(Color::RED)?;
    lcd.fill(Color::GRAY)?;
    lcd.fill(Color::WHITE)?;

    lcd.set_pixel(50, 50, Color::BLUE)?;

    lcd.draw_text(GREETING, 0, 0, FontSize::Px16)?;
    lcd.draw_text(GREETING, 0, 16, FontSize::Px24)?;
    lcd.draw_text(GREETING, 0, 48, FontSize::Px32)?;

    lcd.draw_line(0, 50, 239, 50)?;
    lcd.draw_line(0, 50, 239, 50)?;

    lcd.draw_rectangle(100, 100, 200, 200)?;
    lcd.draw_circle(150, 150, 80)?;

    info!("lcd demo done");
    Ok(())
}
