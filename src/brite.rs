//! Red/green/blue naming over the anonymous channel triple, for
//! ShiftBrite, MegaBrite and other A6281 boards wired as RGB modules.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::driver::{A6281, NoEnable};
use crate::error::Error;
use crate::packet::{ClockMode, Packet};

/// A chain of *Brite RGB modules.
///
/// This is a thin naming layer over [`A6281`]: on the usual board layouts
/// channel 0 drives the green LED, channel 1 red and channel 2 blue, and
/// this type spells that mapping out so sketches can talk about colors. The
/// chain behavior (update cycles, shifting, latching, state tracking) is
/// entirely the wrapped driver's, reachable through [`BriteChain::driver`]
/// and [`BriteChain::driver_mut`].
///
/// ```rust
/// use a6281::{BriteChain, Packet};
/// use a6281::mock::MockChain;
///
/// let chain = MockChain::new();
/// let mut brites = BriteChain::new(
///     chain.data(), chain.clock(), chain.latch(), chain.delay(), 3, false,
/// )?;
///
/// brites.begin_update();
/// brites.send_color(0, 0, Packet::PWM_MAX)?; // max blue, ends up furthest
/// brites.send_color(0, Packet::PWM_MAX, 0)?; // max green
/// brites.send_color(Packet::PWM_MAX, 0, 0)?; // max red, nearest chip
/// brites.end_update()?;
/// # Ok::<(), a6281::Error<core::convert::Infallible>>(())
/// ```
#[derive(Debug)]
pub struct BriteChain<Data, Clk, Latch, En, D> {
    driver: A6281<Data, Clk, Latch, En, D>,
}

impl<Data, Clk, Latch, D> BriteChain<Data, Clk, Latch, NoEnable, D>
where
    Data: OutputPin,
    Clk: OutputPin<Error = Data::Error>,
    Latch: OutputPin<Error = Data::Error>,
{
    /// Create a driver for a chain of *Brites without a ~enable line.
    ///
    /// See [`A6281::new`].
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
        A6281::new(data, clock, latch, delay, length, auto_update).map(Self::from)
    }
}

impl<Data, Clk, Latch, En, D> BriteChain<Data, Clk, Latch, En, D>
where
    Data: OutputPin,
    Clk: OutputPin<Error = Data::Error>,
    Latch: OutputPin<Error = Data::Error>,
    En: OutputPin<Error = Data::Error>,
{
    /// Create a driver for a chain of *Brites with a wired ~enable line.
    ///
    /// See [`A6281::with_enable`].
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
        A6281::with_enable(data, clock, latch, enable, delay, length, auto_update).map(Self::from)
    }
}

impl<Data, Clk, Latch, En, D> BriteChain<Data, Clk, Latch, En, D> {
    /// Largest color channel value, 10 bits.
    pub const COLOR_MAX: u16 = Packet::PWM_MAX;

    /// Borrow the wrapped chain driver.
    pub fn driver(&self) -> &A6281<Data, Clk, Latch, En, D> {
        &self.driver
    }

    /// Mutably borrow the wrapped chain driver, e.g. for state tracking.
    pub fn driver_mut(&mut self) -> &mut A6281<Data, Clk, Latch, En, D> {
        &mut self.driver
    }

    /// Unwrap into the chain driver.
    pub fn into_inner(self) -> A6281<Data, Clk, Latch, En, D> {
        self.driver
    }

    /// Build a color packet without sending it.
    ///
    /// Values are truncated to 10 bits, see [`Packet::pwm`].
    pub fn color_packet(&self, red: u16, green: u16, blue: u16) -> Packet {
        Packet::pwm(green, red, blue)
    }

    /// Build a command packet without sending it.
    ///
    /// Dot corrections trim each color's current; values are truncated to
    /// 7 bits, see [`Packet::correction`].
    pub fn command_packet(
        &self,
        red_correct: u8,
        green_correct: u8,
        blue_correct: u8,
        mode: ClockMode,
    ) -> Packet {
        Packet::correction(green_correct, red_correct, blue_correct, mode)
    }

    /// Whether sends currently take effect immediately.
    pub fn auto_update(&self) -> bool {
        self.driver.auto_update()
    }

    /// Turn auto-update on or off. See [`A6281::set_auto_update`].
    pub fn set_auto_update(&mut self, auto_update: bool) {
        self.driver.set_auto_update(auto_update);
    }
}

impl<Data, Clk, Latch, En, D> BriteChain<Data, Clk, Latch, En, D>
where
    Data: OutputPin,
    Clk: OutputPin<Error = Data::Error>,
    Latch: OutputPin<Error = Data::Error>,
    D: DelayNs,
{
    /// Open an update cycle. See [`A6281::begin_update`].
    pub fn begin_update(&mut self) {
        self.driver.begin_update();
    }

    /// Close an update cycle, latching if anything was sent.
    /// See [`A6281::end_update`].
    ///
    /// # Errors
    ///
    /// Propagates the pin error if the latch pulse cannot be driven.
    pub fn end_update(&mut self) -> Result<u16, Error<Data::Error>> {
        self.driver.end_update()
    }

    /// Build a color packet and send it to the head of the chain.
    ///
    /// # Errors
    ///
    /// As for [`A6281::send_packet`].
    pub fn send_color(
        &mut self,
        red: u16,
        green: u16,
        blue: u16,
    ) -> Result<(), Error<Data::Error>> {
        self.driver.send_pwm_values(green, red, blue)
    }

    /// Build a command packet and send it to the head of the chain.
    ///
    /// # Errors
    ///
    /// As for [`A6281::send_packet`].
    pub fn send_color_correction(
        &mut self,
        red_correct: u8,
        green_correct: u8,
        blue_correct: u8,
        mode: ClockMode,
    ) -> Result<(), Error<Data::Error>> {
        self.driver
            .send_correction(green_correct, red_correct, blue_correct, mode)
    }

    /// Send a prebuilt packet to the head of the chain.
    /// See [`A6281::send_packet`].
    ///
    /// # Errors
    ///
    /// As for [`A6281::send_packet`].
    pub fn send_packet(&mut self, packet: Packet) -> Result<(), Error<Data::Error>> {
        self.driver.send_packet(packet)
    }

    /// Broadcast one packet to every module in the chain.
    /// See [`A6281::send_packet_to_all`].
    ///
    /// # Errors
    ///
    /// As for [`A6281::send_packet`].
    pub fn send_packet_to_all(&mut self, packet: Packet) -> Result<(), Error<Data::Error>> {
        self.driver.send_packet_to_all(packet)
    }
}

impl<Data, Clk, Latch, En, D> BriteChain<Data, Clk, Latch, En, D>
where
    En: OutputPin,
{
    /// Activate or suspend the modules' outputs. See [`A6281::set_enabled`].
    ///
    /// # Errors
    ///
    /// Propagates the ~enable pin's own error type.
    pub fn set_enabled(&mut self, active: bool) -> Result<(), En::Error> {
        self.driver.set_enabled(active)
    }
}

impl<Data, Clk, Latch, En, D> From<A6281<Data, Clk, Latch, En, D>>
    for BriteChain<Data, Clk, Latch, En, D>
{
    fn from(driver: A6281<Data, Clk, Latch, En, D>) -> Self {
        Self { driver }
    }
}
