use alloc::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use super::A6281;
use crate::error::Error;
use crate::packet::Packet;
use crate::state::ChainState;

impl<Data, Clk, Latch, En, D> A6281<Data, Clk, Latch, En, D> {
    ////////////////////////////////////////////////////////////////////////////////
    // Chain state tracking
    ////////////////////////////////////////////////////////////////////////////////

    /// Turn chain state tracking on or off, returning the resulting state.
    ///
    /// The chain itself is write-only, and every send physically shifts the
    /// previous contents one chip further out. With tracking on, the driver
    /// mirrors each sent packet in a ring buffer sized to the chain, which
    /// is what [`A6281::get_state`], [`A6281::save_state`] and
    /// [`A6281::restore_state`] read.
    ///
    /// The buffer is allocated the first time tracking is enabled and kept
    /// thereafter: re-enabling is a no-op and disabling pauses recording
    /// without discarding what was mirrored. If the buffer cannot be
    /// allocated (or the chain length is zero), tracking stays disabled and
    /// `false` is returned; everything else keeps working without tracking.
    pub fn set_state_tracking(&mut self, enabled: bool) -> bool {
        if enabled && self.state.is_none() && self.length > 0 {
            self.state = ChainState::with_length(self.length).ok();
        }
        self.tracking = enabled && self.state.is_some();
        self.tracking
    }

    /// Whether sends are currently mirrored into the state buffer.
    pub fn state_tracking(&self) -> bool {
        self.tracking
    }

    /// The packet held by the chip `index` hops from the controller.
    ///
    /// Returns `None` if `index` is beyond the chain or tracking is
    /// disabled. Until a full chain's worth of packets has been sent, far
    /// positions report the zeroed initial slots; those chips still hold
    /// whatever state they had before tracking began, which the driver has
    /// no way to observe.
    pub fn get_state(&self, index: u16) -> Option<Packet> {
        if !self.tracking {
            return None;
        }
        self.state.as_ref()?.get(index)
    }

    /// Snapshot the mirrored chain contents, nearest chip first.
    ///
    /// Returns an empty sequence if no packet has been mirrored yet (or
    /// tracking was never enabled). The snapshot reflects everything
    /// recorded so far even while tracking is paused.
    pub fn save_state(&self) -> Vec<Packet> {
        match self.state.as_ref() {
            Some(state) => state.save(),
            None => Vec::new(),
        }
    }
}

impl<Data, Clk, Latch, En, D> A6281<Data, Clk, Latch, En, D>
where
    Data: OutputPin,
    Clk: OutputPin<Error = Data::Error>,
    Latch: OutputPin<Error = Data::Error>,
    D: DelayNs,
{
    /// Resend a saved snapshot so the chain holds those values again.
    ///
    /// `saved` must be in the nearest-chip-first order produced by
    /// [`A6281::save_state`]. Because data can only be pushed in at the
    /// head, the sequence is transmitted in reverse (far-end value first)
    /// inside one suspended-auto-update cycle, then latched once.
    ///
    /// With tracking on, the resent packets are mirrored as they go out, so
    /// a [`A6281::save_state`] immediately after a restore returns the same
    /// sequence.
    ///
    /// # Errors
    ///
    /// [`Error::StateLengthMismatch`] if the sequence length is not the
    /// chain length; nothing is sent in that case. Pin errors propagate as
    /// for [`A6281::send_packet`]. Auto-update is restored either way.
    pub fn restore_state(&mut self, saved: &[Packet]) -> Result<(), Error<Data::Error>> {
        if saved.len() != usize::from(self.length) {
            return Err(Error::StateLengthMismatch {
                expected: usize::from(self.length),
                provided: saved.len(),
            });
        }
        let resume = self.auto_update;
        self.auto_update = false;
        self.begin_update();
        let mut result = self.send_each(saved.iter().rev().copied());
        if result.is_ok() {
            result = self.end_update().map(|_| ());
        }
        self.auto_update = resume;
        result
    }
}
