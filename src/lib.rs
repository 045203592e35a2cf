#![doc = include_str!("../README.md")]
#![no_std]
#![deny(missing_docs)]
#![deny(unsafe_code)]

extern crate alloc;

mod brite;
mod driver;
mod error;
pub mod mock;
mod packet;
mod state;

pub use brite::BriteChain;
pub use driver::{A6281, CLOCK_PULSE_US, LATCH_PULSE_US, NoEnable};
pub use error::Error;
pub use packet::{ClockMode, Packet, PacketMode};
