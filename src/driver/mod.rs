use embedded_hal::digital::OutputPin;

use crate::error::Error;
use crate::state::ChainState;

mod send;
mod state;

/// Microseconds the clock line is held at each level while shifting a bit.
///
/// The A6281 needs far less; this is a comfortable margin that still keeps a
/// full 32-bit packet under 1.5 ms.
pub const CLOCK_PULSE_US: u32 = 20;

/// Microseconds the latch line is held high to apply an update cycle.
pub const LATCH_PULSE_US: u32 = 30;

/// Placeholder type for the ~enable line when it is not wired.
///
/// Implements [`OutputPin`] as a no-op so that a three-pin chain (the
/// [`A6281::new`] constructor) and a four-pin chain share one driver type.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEnable;

impl embedded_hal::digital::ErrorType for NoEnable {
    type Error = core::convert::Infallible;
}

impl OutputPin for NoEnable {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Driver for a daisy chain of A6281s.
///
/// # Quick start
///
/// Create the driver with [`A6281::new`] (data, clock and latch lines) or
/// [`A6281::with_enable`] (those three plus the active-low ~enable line),
/// passing pins already configured as outputs by your HAL, a delay provider,
/// the number of chips in the chain, and whether sends should auto-update.
///
/// Packets are clocked down the chain inside an *update cycle* and take
/// effect together when the cycle ends with a single latch pulse:
///
/// ```rust
/// use a6281::{A6281, Packet};
/// use a6281::mock::MockChain;
///
/// let chain = MockChain::new();
/// let mut driver = A6281::new(
///     chain.data(), chain.clock(), chain.latch(), chain.delay(), 2, false,
/// )?;
///
/// driver.begin_update();
/// driver.send_packet(Packet::pwm(0, 0, 1023))?;
/// driver.send_packet(Packet::pwm(1023, 0, 0))?;
/// assert_eq!(driver.end_update()?, 2);
/// # Ok::<(), a6281::Error<core::convert::Infallible>>(())
/// ```
///
/// With auto-update on, every single-packet send is wrapped in its own
/// cycle; [`A6281::send_packets`] still latches exactly once for the whole
/// batch.
///
/// # Chain physics
///
/// Each chip holds one 32-bit register and passes overflow to the next chip
/// down, so a packet's final position depends on how many packets follow it:
/// the *last* packet of a cycle lands on the chip nearest the controller.
/// The chips cannot be read back; see [`A6281::set_state_tracking`] for the
/// driver-side mirror of the chain contents.
#[derive(Debug)]
pub struct A6281<Data, Clk, Latch, En, D> {
    data: Data,
    clock: Clk,
    latch: Latch,
    enable: Option<En>,
    delay: D,
    length: u16,
    auto_update: bool,
    sent: u16,
    tracking: bool,
    state: Option<ChainState>,
}

impl<Data, Clk, Latch, D> A6281<Data, Clk, Latch, NoEnable, D>
where
    Data: OutputPin,
    Clk: OutputPin<Error = Data::Error>,
    Latch: OutputPin<Error = Data::Error>,
{
    /// Create a driver for a chain without a ~enable line.
    ///
    /// `length` is the number of chips wired data-out to data-in. The pins
    /// must already be configured as outputs; the clock and latch lines are
    /// driven low here so the first send starts from a known wire state.
    ///
    /// # Errors
    ///
    /// Propagates the pin error if the initial line levels cannot be set.
    pub fn new(
        data: Data,
        clock: Clk,
        latch: Latch,
        delay: D,
        length: u16,
        auto_update: bool,
    ) -> Result<Self, Error<Data::Error>> {
        let mut driver = Self {
            data,
            clock,
            latch,
            enable: None,
            delay,
            length,
            auto_update,
            sent: 0,
            tracking: false,
            state: None,
        };
        driver.clock.set_low()?;
        driver.latch.set_low()?;
        Ok(driver)
    }
}

impl<Data, Clk, Latch, En, D> A6281<Data, Clk, Latch, En, D>
where
    Data: OutputPin,
    Clk: OutputPin<Error = Data::Error>,
    Latch: OutputPin<Error = Data::Error>,
    En: OutputPin<Error = Data::Error>,
{
    /// Create a driver for a chain whose ~enable line is wired to a pin.
    ///
    /// As with [`A6281::new`], the clock and latch lines are driven low.
    /// The ~enable line is also driven low, activating the chips' outputs;
    /// use [`A6281::set_enabled`] to suspend them later.
    ///
    /// # Errors
    ///
    /// Propagates the pin error if the initial line levels cannot be set.
    pub fn with_enable(
        data: Data,
        clock: Clk,
        latch: Latch,
        enable: En,
        delay: D,
        length: u16,
        auto_update: bool,
    ) -> Result<Self, Error<Data::Error>> {
        let mut driver = Self {
            data,
            clock,
            latch,
            enable: Some(enable),
            delay,
            length,
            auto_update,
            sent: 0,
            tracking: false,
            state: None,
        };
        driver.clock.set_low()?;
        driver.latch.set_low()?;
        if let Some(pin) = driver.enable.as_mut() {
            pin.set_low()?;
        }
        Ok(driver)
    }
}

impl<Data, Clk, Latch, En, D> A6281<Data, Clk, Latch, En, D> {
    ////////////////////////////////////////////////////////////////////////////////
    // Chain configuration
    ////////////////////////////////////////////////////////////////////////////////

    /// The number of chips in the chain.
    pub fn chain_length(&self) -> u16 {
        self.length
    }

    /// Whether sends currently take effect immediately.
    pub fn auto_update(&self) -> bool {
        self.auto_update
    }

    /// Turn auto-update on or off.
    ///
    /// With auto-update on, every single-packet send is wrapped in an
    /// implicit update cycle and latches immediately. Simple, but updating a
    /// whole chain one send at a time becomes visible as flicker; turn it
    /// off and use explicit [`A6281::begin_update`]/[`A6281::end_update`]
    /// cycles (or [`A6281::send_packets`]) when that matters.
    pub fn set_auto_update(&mut self, auto_update: bool) {
        self.auto_update = auto_update;
    }

    /// Take the driver apart again.
    ///
    /// Returns the pins (the ~enable pin only if one was configured) and the
    /// delay provider, so they can be reused or reconfigured.
    pub fn release(self) -> (Data, Clk, Latch, Option<En>, D) {
        (self.data, self.clock, self.latch, self.enable, self.delay)
    }
}

impl<Data, Clk, Latch, En, D> A6281<Data, Clk, Latch, En, D>
where
    En: OutputPin,
{
    /// Activate or suspend the chips' outputs over the ~enable line.
    ///
    /// The line is inverted: driven low to activate, high to suspend. Does
    /// nothing if the driver was built without a ~enable line.
    ///
    /// # Errors
    ///
    /// Propagates the ~enable pin's own error type, which is independent of
    /// the three wire lines.
    pub fn set_enabled(&mut self, active: bool) -> Result<(), En::Error> {
        match self.enable.as_mut() {
            Some(pin) if active => pin.set_low(),
            Some(pin) => pin.set_high(),
            None => Ok(()),
        }
    }
}
