//! LED blink
//!
//! Configure the red LED as a push-pull output, then forever: drive it low,
//! wait half a period, drive it high, wait half a period. The loop only
//! ends when the HAL reports a failure.

use core::convert::Infallible;
use core::fmt;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::ErrorType;
use log::info;
use w601_board::hal::{write_level, Gpio, GpioError, Level, PinId, PinMode};
use w601_board::pins;

/// Default time each level is held
pub const HALF_PERIOD_MS: u32 = 500;

/// Which pin to blink and how fast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkConfig {
    pub pin: PinId,
    /// Hold time per level; 0 is treated as 1 ms
    pub half_period_ms: u32,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            pin: pins::LED_RED,
            half_period_ms: HALF_PERIOD_MS,
        }
    }
}

/// Blink failures, all fatal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkError<E> {
    /// The LED pin could not be configured
    Gpio(GpioError),
    /// A level write failed
    Pin(E),
}

impl<E: fmt::Display> fmt::Display for BlinkError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlinkError::Gpio(e) => write!(f, "led pin setup failed: {}", e),
            BlinkError::Pin(e) => write!(f, "led write failed: {}", e),
        }
    }
}

/// Error type of the pins handed out by `G`
pub type PinError<G> = <<G as Gpio>::Output as ErrorType>::Error;

/// Blink the board's red LED with the default half period
pub fn run<G, D>(gpio: &mut G, delay: &mut D) -> Result<Infallible, BlinkError<PinError<G>>>
where
    G: Gpio,
    D: DelayNs,
{
    run_with(&BlinkConfig::default(), gpio, delay)
}

pub fn run_with<G, D>(
    config: &BlinkConfig,
    gpio: &mut G,
    delay: &mut D,
) -> Result<Infallible, BlinkError<PinError<G>>>
where
    G: Gpio,
    D: DelayNs,
{
    let mut led = gpio
        .output(config.pin, PinMode::OutputPushPull)
        .map_err(BlinkError::Gpio)?;
    let half_period_ms = config.half_period_ms.max(1);
    info!("blinking {} every {} ms", config.pin, half_period_ms);

    loop {
        for level in [Level::Low, Level::High] {
            write_level(&mut led, level).map_err(BlinkError::Pin)?;
            delay.delay_ms(half_period_ms);
        }
    }
}

/// Count completed low→high→low cycles in a sequence of written levels
pub fn count_cycles<I>(levels: I) -> usize
where
    I: IntoIterator<Item = Level>,
{
    #[derive(Clone, Copy)]
    enum Phase {
        Start,
        Low,
        High,
    }

    let mut cycles = 0;
    let mut phase = Phase::Start;
    for level in levels {
        phase = match (phase, level) {
            (Phase::Start, Level::Low) => Phase::Low,
            (Phase::Low, Level::High) => Phase::High,
            (Phase::High, Level::Low) => {
                cycles += 1;
                Phase::Low
            }
            (phase, _) => phase,
        };
    }
    cycles
}
