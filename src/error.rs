/// Problems while driving the chain.
///
/// `E` is the error type of the GPIO pins carrying the data, clock and latch
/// lines. On most microcontroller HALs this is [`core::convert::Infallible`]
/// and the pin variant can never be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// A write to one of the chain's GPIO lines failed.
    Pin(E),
    /// [`restore_state`] was given a sequence whose length does not match
    /// the chain.
    ///
    /// A saved state is only meaningful for the chain length it was taken
    /// from; replaying a mis-sized sequence would leave chips holding
    /// unrelated values, so the call is rejected before anything is sent.
    ///
    /// [`restore_state`]: crate::A6281::restore_state
    StateLengthMismatch {
        /// The configured chain length.
        expected: usize,
        /// The length of the sequence passed in.
        provided: usize,
    },
}

#[doc(hidden)]
impl<E> From<E> for Error<E> {
    fn from(value: E) -> Self {
        Self::Pin(value)
    }
}
