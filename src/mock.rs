//! Mock pins and delay for testing chains without hardware.
//!
//! All mocks handed out by one [`MockChain`] share a single event log, so a
//! test can reconstruct the exact waveform a driver produced: which words
//! were clocked in, how often the latch fired, and what happened to the
//! ~enable line.
//!
//! ```rust
//! use a6281::{A6281, Packet};
//! use a6281::mock::MockChain;
//!
//! let chain = MockChain::new();
//! let mut driver = A6281::new(
//!     chain.data(), chain.clock(), chain.latch(), chain.delay(), 1, true,
//! )?;
//!
//! let packet = Packet::pwm(1, 2, 3);
//! driver.send_packet(packet)?;
//!
//! assert_eq!(chain.clocked_words(), [packet.raw()]);
//! assert_eq!(chain.latch_pulses(), 1);
//! # Ok::<(), a6281::Error<core::convert::Infallible>>(())
//! ```

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Which chain line a [`MockPin`] stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinRole {
    /// The serial data line.
    Data,
    /// The serial clock line.
    Clock,
    /// The latch line.
    Latch,
    /// The active-low ~enable line.
    Enable,
}

/// One recorded hardware interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A level written to one of the lines.
    Write {
        /// The line written to.
        role: PinRole,
        /// The level it was driven to.
        high: bool,
    },
    /// A busy-wait requested from the delay provider.
    Delay {
        /// Nanoseconds waited.
        ns: u32,
    },
}

/// Factory for mock pins and delay sharing one event log.
#[derive(Debug, Default)]
pub struct MockChain {
    log: Rc<RefCell<Vec<Event>>>,
}

impl MockChain {
    /// Create a factory with an empty event log.
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock pin standing in for the data line.
    pub fn data(&self) -> MockPin {
        self.pin(PinRole::Data)
    }

    /// A mock pin standing in for the clock line.
    pub fn clock(&self) -> MockPin {
        self.pin(PinRole::Clock)
    }

    /// A mock pin standing in for the latch line.
    pub fn latch(&self) -> MockPin {
        self.pin(PinRole::Latch)
    }

    /// A mock pin standing in for the ~enable line.
    pub fn enable(&self) -> MockPin {
        self.pin(PinRole::Enable)
    }

    /// A mock delay provider recording requested waits.
    pub fn delay(&self) -> MockDelay {
        MockDelay {
            log: Rc::clone(&self.log),
        }
    }

    fn pin(&self, role: PinRole) -> MockPin {
        MockPin {
            role,
            log: Rc::clone(&self.log),
        }
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Inspectors
    ////////////////////////////////////////////////////////////////////////////////

    /// Everything recorded so far, in order.
    pub fn events(&self) -> Vec<Event> {
        self.log.borrow().clone()
    }

    /// Forget everything recorded so far.
    ///
    /// Useful to isolate the phase of a test under scrutiny, e.g. dropping
    /// the setup traffic before asserting on a restore.
    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }

    /// The 32-bit words a chain on these pins would have shifted in.
    ///
    /// Replays the log the way the chips sample the bus: the data level is
    /// captured on each rising clock edge, 32 samples to a word, first
    /// sample in the most significant bit. Trailing incomplete words are
    /// dropped.
    pub fn clocked_words(&self) -> Vec<u32> {
        let mut words = Vec::new();
        let mut word = 0u32;
        let mut bits = 0;
        let mut data_high = false;
        for event in self.log.borrow().iter() {
            match *event {
                Event::Write {
                    role: PinRole::Data,
                    high,
                } => data_high = high,
                Event::Write {
                    role: PinRole::Clock,
                    high: true,
                } => {
                    word = word << 1 | u32::from(data_high);
                    bits += 1;
                    if bits == 32 {
                        words.push(word);
                        word = 0;
                        bits = 0;
                    }
                }
                _ => {}
            }
        }
        words
    }

    /// How many times the latch line was driven high.
    pub fn latch_pulses(&self) -> usize {
        self.writes_to(PinRole::Latch)
            .iter()
            .filter(|&&high| high)
            .count()
    }

    /// The sequence of levels written to one line.
    pub fn writes_to(&self, role: PinRole) -> Vec<bool> {
        self.log
            .borrow()
            .iter()
            .filter_map(|event| match *event {
                Event::Write { role: r, high } if r == role => Some(high),
                _ => None,
            })
            .collect()
    }
}

/// Recording stand-in for one GPIO output line.
///
/// Implements [`OutputPin`] infallibly and appends every write to the
/// owning [`MockChain`]'s log.
#[derive(Debug)]
pub struct MockPin {
    role: PinRole,
    log: Rc<RefCell<Vec<Event>>>,
}

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(Event::Write {
            role: self.role,
            high: false,
        });
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(Event::Write {
            role: self.role,
            high: true,
        });
        Ok(())
    }
}

/// Recording stand-in for the busy-wait delay provider.
///
/// Waits for no actual time; every request is appended to the owning
/// [`MockChain`]'s log.
#[derive(Debug)]
pub struct MockDelay {
    log: Rc<RefCell<Vec<Event>>>,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Event::Delay { ns });
    }
}
