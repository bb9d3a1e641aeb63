//! Recording GPIO

use core::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::digital::{ErrorType, OutputPin};
use log::trace;

use super::{SimClock, SimError};
use crate::hal::{Gpio, GpioError, Level, PinId, PinMode};

/// One recorded pin write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinEvent {
    pub at_ms: u64,
    pub pin: PinId,
    pub level: Level,
}

type EventLog = Rc<RefCell<Vec<PinEvent>>>;

/// Simulated pin controller
pub struct SimGpio {
    clock: SimClock,
    events: EventLog,
    configured: Vec<(PinId, PinMode)>,
    unavailable: Vec<u8>,
}

impl SimGpio {
    pub fn new(clock: SimClock) -> Self {
        Self {
            clock,
            events: Rc::default(),
            configured: Vec::new(),
            unavailable: Vec::new(),
        }
    }

    /// Make configuring pin `number` fail, as a missing pin would.
    /// A pin already handed out fails the same way.
    pub fn mark_unavailable(&mut self, number: u8) {
        self.unavailable.push(number);
    }

    /// All writes so far, across every pin handed out
    pub fn events(&self) -> Vec<PinEvent> {
        self.events.borrow().clone()
    }

    /// Writes to one pin
    pub fn events_for(&self, pin: PinId) -> Vec<PinEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.pin == pin)
            .copied()
            .collect()
    }

    pub fn configured(&self) -> &[(PinId, PinMode)] {
        &self.configured
    }
}

impl Gpio for SimGpio {
    type Output = SimPin;

    fn output(&mut self, pin: PinId, mode: PinMode) -> Result<SimPin, GpioError> {
        if !mode.is_output() {
            return Err(GpioError::NotAnOutput);
        }
        let claimed = self.configured.iter().any(|(p, _)| p.number == pin.number);
        if claimed || self.unavailable.contains(&pin.number) {
            return Err(GpioError::Unavailable(pin.number));
        }

        trace!("configure {} as {:?}", pin, mode);
        self.configured.push((pin, mode));
        Ok(SimPin {
            id: pin,
            clock: self.clock.clone(),
            events: self.events.clone(),
            level: None,
        })
    }
}

/// Simulated output pin
pub struct SimPin {
    id: PinId,
    clock: SimClock,
    events: EventLog,
    level: Option<Level>,
}

impl SimPin {
    /// Last written level, `None` before the first write
    pub fn level(&self) -> Option<Level> {
        self.level
    }

    fn write(&mut self, level: Level) -> Result<(), SimError> {
        self.clock.check()?;
        let at_ms = self.clock.now_ms();
        trace!("{} ms: {} <- {}", at_ms, self.id, level);
        self.level = Some(level);
        self.events.borrow_mut().push(PinEvent {
            at_ms,
            pin: self.id,
            level,
        });
        Ok(())
    }
}

impl ErrorType for SimPin {
    type Error = SimError;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), SimError> {
        self.write(Level::Low)
    }

    fn set_high(&mut self) -> Result<(), SimError> {
        self.write(Level::High)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::write_level;
    use crate::pins;

    #[test]
    fn test_output_requires_output_mode() {
        let mut gpio = SimGpio::new(SimClock::new());
        assert!(matches!(
            gpio.output(pins::LED_RED, PinMode::Input),
            Err(GpioError::NotAnOutput)
        ));
        assert!(gpio.output(pins::LED_RED, PinMode::OutputPushPull).is_ok());
        assert_eq!(gpio.configured(), [(pins::LED_RED, PinMode::OutputPushPull)]);
    }

    #[test]
    fn test_unavailable_pin() {
        let mut gpio = SimGpio::new(SimClock::new());
        gpio.mark_unavailable(38);
        assert!(matches!(
            gpio.output(pins::LED_RED, PinMode::OutputPushPull),
            Err(GpioError::Unavailable(38))
        ));
    }

    #[test]
    fn test_pin_handed_out_once() {
        let mut gpio = SimGpio::new(SimClock::new());
        assert!(gpio.output(pins::LED_RED, PinMode::OutputPushPull).is_ok());
        assert!(matches!(
            gpio.output(PinId::new("alias", 38), PinMode::OutputOpenDrain),
            Err(GpioError::Unavailable(38))
        ));
        assert!(gpio.output(pins::LCD_BACKLIGHT, PinMode::OutputPushPull).is_ok());
        assert_eq!(gpio.configured().len(), 2);
    }

    #[test]
    fn test_writes_are_timestamped() {
        let clock = SimClock::new();
        let mut gpio = SimGpio::new(clock.clone());
        let mut led = gpio.output(pins::LED_RED, PinMode::OutputPushPull).unwrap();

        write_level(&mut led, Level::Low).unwrap();
        clock.advance_ms(500);
        write_level(&mut led, Level::from(1u8)).unwrap();

        assert_eq!(led.level(), Some(Level::High));
        assert_eq!(
            gpio.events_for(pins::LED_RED),
            [
                PinEvent { at_ms: 0, pin: pins::LED_RED, level: Level::Low },
                PinEvent { at_ms: 500, pin: pins::LED_RED, level: Level::High },
            ]
        );
    }

    #[test]
    fn test_writes_fail_after_deadline() {
        let clock = SimClock::with_deadline(100);
        let mut gpio = SimGpio::new(clock.clone());
        let mut led = gpio.output(pins::LED_RED, PinMode::OutputPushPull).unwrap();
        clock.advance_ms(100);
        assert_eq!(led.set_high(), Err(SimError::Halted { at_ms: 100 }));
        assert!(gpio.events().is_empty());
    }
}
