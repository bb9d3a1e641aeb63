//! Simulated time

use core::cell::Cell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;

use super::SimError;

const NS_PER_MS: u64 = 1_000_000;

#[derive(Debug, Default)]
struct ClockState {
    now_ns: Cell<u64>,
    deadline_ms: Cell<Option<u64>>,
}

/// Shared millisecond clock; clones observe the same time
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    state: Rc<ClockState>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock that halts the simulation once `deadline_ms` is reached
    pub fn with_deadline(deadline_ms: u64) -> Self {
        let clock = Self::new();
        clock.set_deadline(Some(deadline_ms));
        clock
    }

    pub fn set_deadline(&self, deadline_ms: Option<u64>) {
        self.state.deadline_ms.set(deadline_ms);
    }

    pub fn now_ms(&self) -> u64 {
        self.state.now_ns.get() / NS_PER_MS
    }

    pub fn advance_ns(&self, ns: u64) {
        let now = self.state.now_ns.get();
        self.state.now_ns.set(now.saturating_add(ns));
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance_ns(ms.saturating_mul(NS_PER_MS));
    }

    /// `Err(Halted)` once the deadline has been reached
    pub fn check(&self) -> Result<(), SimError> {
        match self.state.deadline_ms.get() {
            Some(deadline) if self.now_ms() >= deadline => Err(SimError::Halted {
                at_ms: self.now_ms(),
            }),
            _ => Ok(()),
        }
    }
}

/// Delay that advances a [`SimClock`] instead of sleeping
#[derive(Debug, Clone)]
pub struct SimDelay {
    clock: SimClock,
}

impl SimDelay {
    pub fn new(clock: SimClock) -> Self {
        Self { clock }
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.clock.advance_ns(ns as u64);
    }

    fn delay_us(&mut self, us: u32) {
        self.clock.advance_ns(us as u64 * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.clock.advance_ms(ms as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_advances_shared_clock() {
        let clock = SimClock::new();
        let mut delay = SimDelay::new(clock.clone());
        delay.delay_ms(500);
        delay.delay_us(1_500);
        assert_eq!(clock.now_ms(), 501);
    }

    #[test]
    fn test_deadline_halts() {
        let clock = SimClock::with_deadline(1000);
        clock.advance_ms(999);
        assert!(clock.check().is_ok());
        clock.advance_ms(1);
        assert_eq!(clock.check(), Err(SimError::Halted { at_ms: 1000 }));
    }
}
