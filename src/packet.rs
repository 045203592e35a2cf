//! The 32-bit data packet shifted into each A6281 register.

use bit_field::BitField;

/// Bit positions within the 32-bit word, counted from bit 0 (LSB).
///
/// One word carries either three 10-bit PWM values or the dot-correction and
/// command fields, selected by the mode flag. The positions are fixed by the
/// A6281 datasheet's input register format; the wire sends bit 31 first.
mod bits {
    use core::ops::RangeInclusive;

    /// PWM channel 0 (green on *Brite boards).
    pub(super) const PWM_0: RangeInclusive<usize> = 0..=9;
    /// PWM channel 1 (red on *Brite boards).
    pub(super) const PWM_1: RangeInclusive<usize> = 10..=19;
    /// PWM channel 2 (blue on *Brite boards).
    pub(super) const PWM_2: RangeInclusive<usize> = 20..=29;

    /// Dot correction for channel 0.
    pub(super) const CORRECT_0: RangeInclusive<usize> = 0..=6;
    /// PWM clock mode selector.
    pub(super) const CLOCK_MODE: RangeInclusive<usize> = 7..=8;
    /// Dot correction for channel 1. Bit 9 and bits 17..=19 are unused.
    pub(super) const CORRECT_1: RangeInclusive<usize> = 10..=16;
    /// Dot correction for channel 2. Bit 27 is unused.
    pub(super) const CORRECT_2: RangeInclusive<usize> = 20..=26;
    /// Analog test bits, only meaningful in the chip's hardware test modes.
    /// Always built as zero.
    pub(super) const ATB_0: usize = 28;
    /// Second analog test bit.
    pub(super) const ATB_1: usize = 29;

    /// Mode flag: clear for a PWM packet, set for a correction packet.
    /// Bit 31 is unused and always zero.
    pub(super) const MODE: usize = 30;
}

/// One 32-bit A6281 register value.
///
/// A packet is immutable once built: construct it with [`Packet::pwm`] or
/// [`Packet::correction`] and pass it around by value. The inner `u32` is
/// the only representation that goes on the wire (most significant bit
/// first); every field accessor is a view over it.
///
/// ```rust
/// use a6281::{Packet, PacketMode};
///
/// let packet = Packet::pwm(100, 200, 300);
/// assert_eq!(packet.mode(), PacketMode::Pwm);
/// assert_eq!(packet.pwm_channels(), [100, 200, 300]);
/// ```
///
/// # Datasheet
///
/// See the Input Register Data Format table in the A6281 datasheet for the
/// field positions reproduced in this module.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Packet(u32);

impl Packet {
    /// Largest PWM channel value (10 bits).
    pub const PWM_MAX: u16 = 1023;
    /// Largest dot-correction value (7 bits).
    pub const CORRECTION_MAX: u8 = 127;

    /// Build a PWM packet from three channel values.
    ///
    /// Inputs must be in `0..=1023`; larger values are silently truncated
    /// to their low 10 bits rather than reported as an error.
    pub fn pwm(ch0: u16, ch1: u16, ch2: u16) -> Self {
        let mut value = 0u32;
        value.set_bits(bits::PWM_0, u32::from(ch0 & Self::PWM_MAX));
        value.set_bits(bits::PWM_1, u32::from(ch1 & Self::PWM_MAX));
        value.set_bits(bits::PWM_2, u32::from(ch2 & Self::PWM_MAX));
        // Mode flag left clear: PWM interpretation.
        Self(value)
    }

    /// Build a correction/command packet from three dot-correction values
    /// and a clock mode.
    ///
    /// Dot corrections must be in `0..=127`; larger values are silently
    /// truncated to their low 7 bits. The analog test bits are always zero.
    pub fn correction(c0: u8, c1: u8, c2: u8, mode: ClockMode) -> Self {
        let mut value = 0u32;
        value.set_bits(bits::CORRECT_0, u32::from(c0 & Self::CORRECTION_MAX));
        value.set_bits(bits::CORRECT_1, u32::from(c1 & Self::CORRECTION_MAX));
        value.set_bits(bits::CORRECT_2, u32::from(c2 & Self::CORRECTION_MAX));
        value.set_bits(bits::CLOCK_MODE, u32::from(u8::from(mode)));
        value.set_bit(bits::MODE, true);
        Self(value)
    }

    /// The wire representation. Transmitted most significant bit first.
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Rebuild a packet from its wire representation.
    ///
    /// Useful for replaying chain state that was persisted (for example
    /// across a power cycle) as raw words from [`Packet::raw`].
    pub fn from_raw(value: u32) -> Self {
        Self(value)
    }

    /// Which of the two interpretations this packet carries.
    pub fn mode(self) -> PacketMode {
        if self.0.get_bit(bits::MODE) {
            PacketMode::Correction
        } else {
            PacketMode::Pwm
        }
    }

    /// The three PWM channel values.
    ///
    /// Only meaningful when [`Packet::mode`] is [`PacketMode::Pwm`]; for a
    /// correction packet this reads the same bits under the wrong view.
    pub fn pwm_channels(self) -> [u16; 3] {
        [
            self.0.get_bits(bits::PWM_0) as u16,
            self.0.get_bits(bits::PWM_1) as u16,
            self.0.get_bits(bits::PWM_2) as u16,
        ]
    }

    /// The three dot-correction values.
    ///
    /// Only meaningful when [`Packet::mode`] is [`PacketMode::Correction`].
    pub fn dot_corrections(self) -> [u8; 3] {
        [
            self.0.get_bits(bits::CORRECT_0) as u8,
            self.0.get_bits(bits::CORRECT_1) as u8,
            self.0.get_bits(bits::CORRECT_2) as u8,
        ]
    }

    /// The PWM clock mode carried by a correction packet.
    ///
    /// Only meaningful when [`Packet::mode`] is [`PacketMode::Correction`].
    pub fn clock_mode(self) -> ClockMode {
        ClockMode::from(self.0.get_bits(bits::CLOCK_MODE) as u8)
    }

    /// Whether either analog test bit is set.
    ///
    /// The test bits engage the chip's hardware test modes and are never set
    /// by the packet builders; this reports them for packets rebuilt from
    /// raw words.
    pub fn analog_test_bits(self) -> (bool, bool) {
        (self.0.get_bit(bits::ATB_0), self.0.get_bit(bits::ATB_1))
    }
}

#[doc(hidden)]
impl From<Packet> for u32 {
    fn from(value: Packet) -> Self {
        value.raw()
    }
}

#[doc(hidden)]
impl From<u32> for Packet {
    fn from(value: u32) -> Self {
        Self::from_raw(value)
    }
}

/// The interpretation selected by a packet's mode flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketMode {
    /// Three 10-bit PWM channel values.
    Pwm,
    /// Dot-correction values, clock mode and test bits.
    Correction,
}

/// PWM oscillator selection carried by a correction packet.
///
/// The A6281 derives its PWM counter clock either from the internal
/// oscillator (at one of three frequencies) or from the external clock
/// input. The chip powers up in the 800 kHz internal mode.
///
/// # Datasheet
///
/// See the clock mode bits in the A6281 datasheet's Input Register Data
/// Format table for the bit patterns.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockMode {
    /// 800 kHz internal oscillator (power-on default).
    #[default]
    Internal800kHz,
    /// External clock input.
    External,
    /// 400 kHz internal oscillator.
    Internal400kHz,
    /// 200 kHz internal oscillator.
    Internal200kHz,
}

#[doc(hidden)]
impl From<u8> for ClockMode {
    fn from(value: u8) -> Self {
        assert!(value <= 0b11, "Invalid bit pattern for clock mode.");
        match value {
            0b00 => Self::Internal800kHz,
            0b01 => Self::External,
            0b10 => Self::Internal400kHz,
            0b11 => Self::Internal200kHz,
            _ => unreachable!("Precondition assert covers > 3."),
        }
    }
}

#[doc(hidden)]
impl From<ClockMode> for u8 {
    fn from(value: ClockMode) -> Self {
        match value {
            ClockMode::Internal800kHz => 0b00,
            ClockMode::External => 0b01,
            ClockMode::Internal400kHz => 0b10,
            ClockMode::Internal200kHz => 0b11,
        }
    }
}
