//! GPIO pin handles
//!
//! A pin is named by a board-specific `(name, number)` pair and must be
//! configured as an output before it is written.
//!
//! | Mode              | Direction | Drive                 |
//! |-------------------|-----------|-----------------------|
//! | `Input`           | In        | floating              |
//! | `InputPullUp`     | In        | weak pull-up          |
//! | `InputPullDown`   | In        | weak pull-down        |
//! | `OutputPushPull`  | Out       | sources and sinks     |
//! | `OutputOpenDrain` | Out       | sinks only            |

use core::fmt;
use core::ops::Not;

use embedded_hal::digital::{OutputPin, PinState};

/// Board pin identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PinId {
    /// Board label, e.g. `"led_red"`
    pub name: &'static str,
    /// Pin number in the board's numbering
    pub number: u8,
}

impl PinId {
    pub const fn new(name: &'static str, number: u8) -> Self {
        Self { name, number }
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.number)
    }
}

/// Pin mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    Input,
    InputPullUp,
    InputPullDown,
    OutputPushPull,
    OutputOpenDrain,
}

impl PinMode {
    /// Whether this mode drives the line
    pub const fn is_output(self) -> bool {
        matches!(self, PinMode::OutputPushPull | PinMode::OutputOpenDrain)
    }
}

/// Logical pin level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Low = 0,
    High = 1,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Any non-zero value is high, matching `pin.value(x)` on the board.
impl From<u8> for Level {
    fn from(value: u8) -> Self {
        Level::from(value != 0)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level as u8
    }
}

impl From<Level> for PinState {
    fn from(level: Level) -> Self {
        match level {
            Level::Low => PinState::Low,
            Level::High => PinState::High,
        }
    }
}

impl Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// GPIO errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioError {
    /// An input mode was requested where an output is required
    NotAnOutput,
    /// The pin does not exist or is claimed by another peripheral
    Unavailable(u8),
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpioError::NotAnOutput => write!(f, "pin mode is not an output mode"),
            GpioError::Unavailable(n) => write!(f, "pin {} is unavailable", n),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GpioError {}

/// Pin controller: hands out configured output handles
pub trait Gpio {
    type Output: OutputPin;

    /// Configure `pin` in an output `mode` and return its handle
    fn output(&mut self, pin: PinId, mode: PinMode) -> Result<Self::Output, GpioError>;
}

/// Drive `pin` to `level`
#[inline]
pub fn write_level<P: OutputPin>(pin: &mut P, level: Level) -> Result<(), P::Error> {
    pin.set_state(level.into())
}
