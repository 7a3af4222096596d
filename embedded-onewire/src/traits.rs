use crate::{
    OneWireError, OneWireResult,
    consts::{ONEWIRE_MATCH_ROM_CMD, ONEWIRE_SKIP_ROM_CMD},
};

/// Status reported by a bus master after a reset pulse.
pub trait OneWireStatus {
    /// Whether at least one device answered the reset with a presence pulse.
    fn presence(&self) -> bool;
    /// Whether a short circuit was detected on the line during the reset.
    fn shortcircuit(&self) -> bool;
}

/// Trait for 1-Wire communication.
///
/// This trait defines the transaction-level operations a bus master offers: resetting the
/// bus, writing a block of bytes and reading a block of bytes. The electrical signalling
/// is entirely the implementor's concern.
pub trait OneWire {
    /// The status type returned by the reset operation.
    /// This type must implement the [OneWireStatus] trait.
    type Status: OneWireStatus;
    /// The error type returned by the operations of this trait.
    /// This type is used to indicate errors in the underlying hardware or communication.
    type BusError;

    /// Resets the 1-Wire bus and returns the status of the bus.
    ///
    /// # Errors
    /// Implementations return [`OneWireError::NoDevicePresent`] if no presence pulse was
    /// detected and [`OneWireError::ShortCircuit`] if the line is held low.
    fn reset(&mut self) -> OneWireResult<Self::Status, Self::BusError>;

    /// Writes a block of bytes to the 1-Wire bus.
    ///
    /// # Arguments
    /// * `bytes` - The bytes to write, in transmission order.
    /// * `strong_pullup` - Keep the line actively driven high after the last byte so that
    ///   parasite-powered devices can draw the current they need for a conversion or an
    ///   EEPROM copy. The pull-up is released by the next bus activity.
    ///
    /// # Errors
    /// This method returns an error if the write operation fails.
    fn write_bytes(&mut self, bytes: &[u8], strong_pullup: bool)
    -> OneWireResult<(), Self::BusError>;

    /// Reads `buf.len()` bytes from the 1-Wire bus.
    ///
    /// # Errors
    /// This method returns an error if the read operation fails.
    fn read_bytes(&mut self, buf: &mut [u8]) -> OneWireResult<(), Self::BusError>;

    /// Resets the bus and fails unless a device answered on a healthy line.
    ///
    /// # Errors
    /// Besides errors from [`OneWire::reset`], returns [`OneWireError::ShortCircuit`] or
    /// [`OneWireError::NoDevicePresent`] when the returned status reports either condition.
    fn reset_checked(&mut self) -> OneWireResult<Self::Status, Self::BusError> {
        let status = self.reset()?;
        if status.shortcircuit() {
            return Err(OneWireError::ShortCircuit);
        }
        if !status.presence() {
            return Err(OneWireError::NoDevicePresent);
        }
        Ok(status)
    }

    /// Addresses devices on the 1-Wire bus.
    /// Every function command must be preceded by this method to address devices on the bus.
    /// Note: A [`OneWire::read_bytes`] call will return garbage data if this method is called
    /// without specifying a ROM address on a bus with multiple devices.
    ///
    /// # Arguments
    /// * `rom` - The ROM address of the device to address. Pass [`None`] to skip ROM addressing and address all devices on the bus.
    ///
    /// # Errors
    /// A failed reset is returned as is, and nothing is written to the bus.
    fn address(&mut self, rom: Option<u64>) -> OneWireResult<(), Self::BusError> {
        self.reset_checked()?;
        match rom {
            Some(rom) => {
                let mut buf = [ONEWIRE_MATCH_ROM_CMD; 9];
                buf[1..].copy_from_slice(&rom.to_le_bytes());
                self.write_bytes(&buf, false)
            }
            None => self.write_bytes(&[ONEWIRE_SKIP_ROM_CMD], false),
        }
    }
}
