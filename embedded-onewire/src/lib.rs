#![no_std]
#![deny(missing_docs)]
//! # embedded-onewire
//! A no-std, transaction-level abstraction of a 1-Wire bus master.
//!
//! The [OneWire] trait defines the three operations a device driver needs from a bus master:
//! resetting the bus, writing a block of bytes (optionally followed by a strong pull-up) and
//! reading a block of bytes. It also provides the ROM addressing preamble, [OneWire::address],
//! that has to precede every function command.
//!
//! [OneWireCrc] implements the Dallas/Maxim CRC-8 used to protect ROM codes and scratchpads.

pub mod consts;
mod error;
mod traits;
mod utils;
pub use error::OneWireError;
pub use traits::{OneWire, OneWireStatus};
pub use utils::{OneWireCrc, family_code, rom_crc_valid};

/// Error type for 1-Wire operations.
pub type OneWireResult<T, E> = Result<T, OneWireError<E>>;
