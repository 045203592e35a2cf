use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use super::{A6281, CLOCK_PULSE_US, LATCH_PULSE_US};
use crate::error::Error;
use crate::packet::{ClockMode, Packet};

impl<Data, Clk, Latch, En, D> A6281<Data, Clk, Latch, En, D>
where
    Data: OutputPin,
    Clk: OutputPin<Error = Data::Error>,
    Latch: OutputPin<Error = Data::Error>,
    D: DelayNs,
{
    ////////////////////////////////////////////////////////////////////////////////
    // Update cycle
    ////////////////////////////////////////////////////////////////////////////////

    /// Open an update cycle.
    ///
    /// Packets sent until the matching [`A6281::end_update`] are shifted
    /// down the chain but not applied; the chips keep displaying their old
    /// values until the cycle ends. Resets the cycle's sent counter.
    pub fn begin_update(&mut self) {
        self.sent = 0;
    }

    /// Close an update cycle, returning how many packets it sent.
    ///
    /// If at least one packet was sent, the latch line is pulsed once and
    /// every chip adopts its currently shifted-in register simultaneously.
    /// The counter itself is not cleared until the next
    /// [`A6281::begin_update`].
    ///
    /// # Errors
    ///
    /// Propagates the pin error if the latch pulse cannot be driven.
    pub fn end_update(&mut self) -> Result<u16, Error<Data::Error>> {
        if self.sent > 0 {
            self.latch()?;
        }
        Ok(self.sent)
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Sending packets
    ////////////////////////////////////////////////////////////////////////////////

    /// Send one packet to the head of the chain.
    ///
    /// Everything previously sent moves one chip further out. With
    /// auto-update on, the send is wrapped in its own update cycle and
    /// latches immediately.
    ///
    /// # Errors
    ///
    /// Propagates the pin error if a line write fails partway; the chain is
    /// then left mid-shift and the caller should resend before latching.
    pub fn send_packet(&mut self, packet: Packet) -> Result<(), Error<Data::Error>> {
        self.send_packet_repeated(packet, 1)
    }

    /// Send the same packet `repeat` times in a row.
    ///
    /// Each repetition loads one more chip, so `repeat` equal to the chain
    /// length broadcasts the value to the whole chain (which is exactly what
    /// [`A6281::send_packet_to_all`] does). A single update cycle wraps all
    /// repetitions when auto-update is on.
    ///
    /// # Errors
    ///
    /// As for [`A6281::send_packet`].
    pub fn send_packet_repeated(
        &mut self,
        packet: Packet,
        repeat: u16,
    ) -> Result<(), Error<Data::Error>> {
        if self.auto_update {
            self.begin_update();
        }
        for _ in 0..repeat {
            self.transmit_packet(packet)?;
            self.sent = self.sent.saturating_add(1);
            if self.tracking {
                if let Some(state) = self.state.as_mut() {
                    state.record(packet);
                }
            }
        }
        if self.auto_update {
            self.end_update()?;
        }
        Ok(())
    }

    /// Send an ordered sequence of packets, one per chip position.
    ///
    /// Packets are sent first-to-last, and the shift physics put the *first*
    /// packet of the slice on the chip furthest down the chain once the
    /// whole slice has gone out. Order the slice nearest-chip-first.
    ///
    /// With auto-update on, it is suspended for the duration of the batch
    /// and a single latch is issued at the end, so the whole batch becomes
    /// visible at once. With auto-update off, the batch simply accumulates
    /// into whatever update cycle is open.
    ///
    /// # Errors
    ///
    /// As for [`A6281::send_packet`]. Auto-update is restored either way.
    pub fn send_packets(&mut self, packets: &[Packet]) -> Result<(), Error<Data::Error>> {
        let resume = self.auto_update;
        self.auto_update = false;
        if resume {
            self.begin_update();
        }
        let mut result = self.send_each(packets.iter().copied());
        if resume && result.is_ok() {
            result = self.end_update().map(|_| ());
        }
        self.auto_update = resume;
        result
    }

    /// Broadcast one packet to every chip in the chain.
    pub fn send_packet_to_all(&mut self, packet: Packet) -> Result<(), Error<Data::Error>> {
        self.send_packet_repeated(packet, self.length)
    }

    /// Build a PWM packet and send it to the head of the chain.
    ///
    /// Channel values are truncated to 10 bits, see [`Packet::pwm`].
    pub fn send_pwm_values(
        &mut self,
        ch0: u16,
        ch1: u16,
        ch2: u16,
    ) -> Result<(), Error<Data::Error>> {
        self.send_packet(Packet::pwm(ch0, ch1, ch2))
    }

    /// Build a correction packet and send it to the head of the chain.
    ///
    /// Dot corrections are truncated to 7 bits, see [`Packet::correction`].
    pub fn send_correction(
        &mut self,
        c0: u8,
        c1: u8,
        c2: u8,
        mode: ClockMode,
    ) -> Result<(), Error<Data::Error>> {
        self.send_packet(Packet::correction(c0, c1, c2, mode))
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Wire primitives
    ////////////////////////////////////////////////////////////////////////////////

    pub(super) fn send_each(
        &mut self,
        packets: impl Iterator<Item = Packet>,
    ) -> Result<(), Error<Data::Error>> {
        for packet in packets {
            self.send_packet(packet)?;
        }
        Ok(())
    }

    /// Shift all 32 bits of one packet into the chain, MSB first.
    ///
    /// For each bit: drive the data line, pulse the clock high then low,
    /// holding each clock level for [`CLOCK_PULSE_US`].
    fn transmit_packet(&mut self, packet: Packet) -> Result<(), Error<Data::Error>> {
        let word = packet.raw();
        for bit in (0..32).rev() {
            if word >> bit & 1 == 1 {
                self.data.set_high()?;
            } else {
                self.data.set_low()?;
            }
            self.clock.set_high()?;
            self.delay.delay_us(CLOCK_PULSE_US);
            self.clock.set_low()?;
            self.delay.delay_us(CLOCK_PULSE_US);
        }
        Ok(())
    }

    /// Pulse the latch line so the chips adopt their shifted-in registers.
    fn latch(&mut self) -> Result<(), Error<Data::Error>> {
        self.latch.set_high()?;
        self.delay.delay_us(LATCH_PULSE_US);
        self.latch.set_low()?;
        Ok(())
    }
}
