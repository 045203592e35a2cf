//! Ring buffer mirroring the physical contents of the chain.
//!
//! Every packet clocked into the chain pushes the previous packets one chip
//! further along, and whatever falls off the far end is unrecoverable (the
//! chips cannot be read back). Mirroring each send in a ring buffer keeps a
//! replayable record: the slot at the head is the most recent packet (the
//! chip nearest the controller), and the slot `k` steps after the head is
//! the chip `k` hops out.

use alloc::collections::TryReserveError;
use alloc::vec::Vec;

use crate::Packet;

/// Mirror of the chain contents, one slot per chip.
///
/// The head index starts one past the end of the buffer. That sentinel is
/// how "no packet has been recorded yet" is represented: the buffer is only
/// meaningful once the first send moves the head in bounds.
#[derive(Debug)]
pub(crate) struct ChainState {
    slots: Vec<Packet>,
    head: usize,
}

impl ChainState {
    /// Allocate a mirror for a chain of `length` chips, all slots zeroed.
    ///
    /// Allocation is explicit and fallible so that enabling tracking on a
    /// constrained target can be refused instead of aborting.
    pub(crate) fn with_length(length: u16) -> Result<Self, TryReserveError> {
        let length = usize::from(length);
        let mut slots = Vec::new();
        slots.try_reserve_exact(length)?;
        slots.resize(length, Packet::default());
        Ok(Self {
            slots,
            head: length,
        })
    }

    /// Record one packet entering the chain head.
    ///
    /// Moves the head back one slot (wrapping at the start of the buffer)
    /// and stores the packet there, matching the physical shift: everything
    /// previously recorded is now one chip further out.
    pub(crate) fn record(&mut self, packet: Packet) {
        if self.head == 0 {
            self.head = self.slots.len() - 1;
        } else {
            self.head -= 1;
        }
        self.slots[self.head] = packet;
    }

    /// The packet held by the chip `index` hops from the controller.
    ///
    /// `None` for positions beyond the chain. Until `length` packets have
    /// been recorded, far slots still hold their initial zeros; the chips
    /// there have pre-existing state this mirror cannot know.
    pub(crate) fn get(&self, index: u16) -> Option<Packet> {
        let index = usize::from(index);
        if index >= self.slots.len() {
            return None;
        }
        Some(self.slots[(self.head + index) % self.slots.len()])
    }

    /// The chain contents in controller-to-far-end order.
    ///
    /// Empty while the head is still at its sentinel, i.e. nothing has been
    /// recorded since tracking began.
    pub(crate) fn save(&self) -> Vec<Packet> {
        if self.head >= self.slots.len() {
            return Vec::new();
        }
        (0..self.slots.len())
            .map(|k| self.slots[(self.head + k) % self.slots.len()])
            .collect()
    }
}
