#![no_std]
#![deny(missing_docs)]

/*! # DS2484
 *
 * Driver for the Analog Devices DS2484 I2C to 1-Wire bridge. [`Ds2484`] implements
 * the [`OneWire`] trait, so any 1-Wire device driver built on `embedded-onewire`
 * can run on top of it.
 */

pub use embedded_onewire::{OneWire, OneWireError, OneWireResult};
mod error;
mod onewire;
mod registers;
mod traits;

pub use error::Ds2484Error;
pub use registers::{DS2484_ADDR, DeviceConfiguration, DeviceStatus, Ds2484, Ds2484Builder};
pub use traits::{Addressing, Interact};

/// Results of DS2484-specific function calls.
pub type Ds2484Result<T, E> = Result<T, Ds2484Error<E>>;

#[cfg(test)]
mod tests;
