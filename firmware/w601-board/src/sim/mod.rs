//! Host-side board simulator
//!
//! Stands in for the W601 peripherals when the demos run on a PC or under
//! test: time is a shared counter advanced by delays, pin writes and LCD
//! calls are recorded. A clock deadline turns every later HAL call into
//! [`SimError::Halted`], which is how a never-ending program is stopped.

mod clock;
mod gpio;
mod lcd;

pub use clock::{SimClock, SimDelay};
pub use gpio::{PinEvent, SimGpio, SimPin};
pub use lcd::{LcdCall, RecordingLcd};

use core::fmt;

use embedded_hal::digital::ErrorKind;

/// Simulated HAL failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    /// The clock reached its deadline
    Halted { at_ms: u64 },
    /// Failure injected at the given call index
    Injected { call: usize },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Halted { at_ms } => write!(f, "simulation halted at {} ms", at_ms),
            SimError::Injected { call } => write!(f, "injected failure at call {}", call),
        }
    }
}

impl std::error::Error for SimError {}

impl embedded_hal::digital::Error for SimError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}
