use crate::{Ds2484, Ds2484Result};
use embedded_hal::i2c::{I2c, SevenBitAddress};

/// Pointer code selecting a register for reading.
pub trait Addressing {
    /// Pointer address for reading from the DS2484.
    const READ_PTR: u8;
}

/// Trait for reading registers of the DS2484 I2C 1-Wire master.
pub trait Interact: Addressing + Sized {
    /// Decode the register from the byte read back.
    fn from_register(value: u8) -> Self;

    /// Read the register value from the DS2484.
    fn read<I: I2c<SevenBitAddress>, D>(dev: &mut Ds2484<I, D>) -> Ds2484Result<Self, I::Error> {
        let mut buf = [0; 1];
        dev.i2c
            .write_read(dev.addr, &[crate::registers::READ_PTR_CMD, Self::READ_PTR], &mut buf)?;
        Ok(Self::from_register(buf[0]))
    }
}
