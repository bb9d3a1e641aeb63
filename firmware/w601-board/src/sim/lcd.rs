//! Recording LCD

use std::string::{String, ToString};
use std::vec::Vec;

use log::trace;

use super::SimError;
use crate::display::{Color, FontSize, Lcd};

/// One LCD call, as issued by the program
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LcdCall {
    Backlight(bool),
    Fill(Color),
    Pixel { x: u16, y: u16, color: Color },
    Text { text: String, x: u16, y: u16, size: FontSize },
    Line { x0: u16, y0: u16, x1: u16, y1: u16 },
    Rectangle { x0: u16, y0: u16, x1: u16, y1: u16 },
    Circle { cx: u16, cy: u16, radius: u16 },
    SetColor { back: Color, fore: Color },
}

impl LcdCall {
    /// Inclusive `(min_x, min_y, max_x, max_y)` of the pixels the call may
    /// touch; `None` for calls without coordinates.
    pub fn extent(&self) -> Option<(i32, i32, i32, i32)> {
        let span = |a: u16, b: u16| (a.min(b) as i32, a.max(b) as i32);
        match *self {
            LcdCall::Pixel { x, y, .. } => Some((x as i32, y as i32, x as i32, y as i32)),
            LcdCall::Text { ref text, x, y, size } => {
                let width = text.chars().count() as i32 * size.cell_width() as i32;
                Some((
                    x as i32,
                    y as i32,
                    x as i32 + width.max(1) - 1,
                    y as i32 + size.px() as i32 - 1,
                ))
            }
            LcdCall::Line { x0, y0, x1, y1 } | LcdCall::Rectangle { x0, y0, x1, y1 } => {
                let (min_x, max_x) = span(x0, x1);
                let (min_y, max_y) = span(y0, y1);
                Some((min_x, min_y, max_x, max_y))
            }
            LcdCall::Circle { cx, cy, radius } => {
                let (cx, cy, r) = (cx as i32, cy as i32, radius as i32);
                Some((cx - r, cy - r, cx + r, cy + r))
            }
            LcdCall::Backlight(_) | LcdCall::Fill(_) | LcdCall::SetColor { .. } => None,
        }
    }
}

/// LCD that records calls instead of drawing
#[derive(Debug, Default)]
pub struct RecordingLcd {
    calls: Vec<LcdCall>,
    fail_at: Option<usize>,
}

impl RecordingLcd {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `index`-th call (0-based) fail with [`SimError::Injected`]
    pub fn failing_at(index: usize) -> Self {
        Self {
            calls: Vec::new(),
            fail_at: Some(index),
        }
    }

    pub fn calls(&self) -> &[LcdCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<LcdCall> {
        core::mem::take(&mut self.calls)
    }

    fn record(&mut self, call: LcdCall) -> Result<(), SimError> {
        let index = self.calls.len();
        if self.fail_at == Some(index) {
            return Err(SimError::Injected { call: index });
        }
        trace!("lcd call {}: {:?}", index, call);
        self.calls.push(call);
        Ok(())
    }
}

impl Lcd for RecordingLcd {
    type Error = SimError;

    fn set_backlight(&mut self, on: bool) -> Result<(), SimError> {
        self.record(LcdCall::Backlight(on))
    }

    fn fill(&mut self, color: Color) -> Result<(), SimError> {
        self.record(LcdCall::Fill(color))
    }

    fn set_pixel(&mut self, x: u16, y: u16, color: Color) -> Result<(), SimError> {
        self.record(LcdCall::Pixel { x, y, color })
    }

    fn draw_text(&mut self, text: &str, x: u16, y: u16, size: FontSize) -> Result<(), SimError> {
        self.record(LcdCall::Text {
            text: text.to_string(),
            x,
            y,
            size,
        })
    }

    fn draw_line(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), SimError> {
        self.record(LcdCall::Line { x0, y0, x1, y1 })
    }

    fn draw_rectangle(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), SimError> {
        self.record(LcdCall::Rectangle { x0, y0, x1, y1 })
    }

    fn draw_circle(&mut self, cx: u16, cy: u16, radius: u16) -> Result<(), SimError> {
        self.record(LcdCall::Circle { cx, cy, radius })
    }

    fn set_color(&mut self, back: Color, fore: Color) -> Result<(), SimError> {
        self.record(LcdCall::SetColor { back, fore })
    }
}
