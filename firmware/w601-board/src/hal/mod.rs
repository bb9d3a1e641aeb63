//! Hardware Abstraction Layer for the W601
//!
//! Pin identification and configuration. Writes and delays go through the
//! `embedded-hal` traits so any chip HAL (or the simulator) can sit below.

pub mod gpio;

pub use gpio::{write_level, Gpio, GpioError, Level, PinId, PinMode};
