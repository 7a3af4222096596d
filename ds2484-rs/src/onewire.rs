use crate::{
    Ds2484, Ds2484Error,
    registers::{DeviceStatus, READ_PTR_CMD},
};
use embedded_hal::{
    delay::DelayNs,
    i2c::{I2c, SevenBitAddress},
};
use embedded_onewire::{OneWire, OneWireError, OneWireResult};

pub(crate) const ONEWIRE_RESET_CMD: u8 = 0xb4;
pub(crate) const ONEWIRE_WRITE_BYTE: u8 = 0xa5;
pub(crate) const ONEWIRE_READ_BYTE: u8 = 0x96;
pub(crate) const ONEWIRE_READ_DATA_PTR: u8 = 0xe1;

impl<I2C: I2c<SevenBitAddress>, D: DelayNs> OneWire for Ds2484<I2C, D> {
    type Status = DeviceStatus;

    type BusError = Ds2484Error<I2C::Error>;

    fn reset(&mut self) -> OneWireResult<Self::Status, Self::BusError> {
        if !self.configured {
            return Err(OneWireError::BusUninitialized);
        }
        self.onewire_wait()?;
        self.i2c
            .write(self.addr, &[ONEWIRE_RESET_CMD])
            .map_err(Ds2484Error::from)?;
        let status = self.onewire_wait()?;
        if status.short_detect() {
            Err(OneWireError::ShortCircuit)
        } else if !status.presence_pulse_detect() {
            Err(OneWireError::NoDevicePresent)
        } else {
            Ok(status)
        }
    }

    fn write_bytes(
        &mut self,
        bytes: &[u8],
        strong_pullup: bool,
    ) -> OneWireResult<(), Self::BusError> {
        if !self.configured {
            return Err(OneWireError::BusUninitialized);
        }
        let last = bytes.len().saturating_sub(1);
        for (i, &byte) in bytes.iter().enumerate() {
            if strong_pullup && i == last {
                // SPU applies to the next 1-Wire write only
                self.write_config(self.config.with_strong_pullup(true))?;
            }
            self.onewire_wait()?;
            self.i2c
                .write(self.addr, &[ONEWIRE_WRITE_BYTE, byte])
                .map_err(Ds2484Error::from)?;
        }
        // The device clears SPU on its own when the strong pullup ends
        self.config.set_strong_pullup(false);
        Ok(())
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> OneWireResult<(), Self::BusError> {
        if !self.configured {
            return Err(OneWireError::BusUninitialized);
        }
        for byte in buf.iter_mut() {
            self.onewire_wait()?;
            self.i2c
                .write(self.addr, &[ONEWIRE_READ_BYTE])
                .map_err(Ds2484Error::from)?;
            self.onewire_wait()?;
            let mut val = [0; 1];
            self.i2c
                .write_read(self.addr, &[READ_PTR_CMD, ONEWIRE_READ_DATA_PTR], &mut val)
                .map_err(Ds2484Error::from)?;
            *byte = val[0];
        }
        Ok(())
    }
}
