use core::fmt;

/// One wire communication error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OneWireError<E> {
    /// Encapsulates the error type from the underlying hardware.
    Other(E),
    /// Indicates that no device answered the reset pulse with a presence pulse.
    NoDevicePresent,
    /// Indicates that a short circuit was detected on the bus.
    ShortCircuit,
    /// The bus master has not been configured since its last device reset.
    BusUninitialized,
    /// Computed CRC of a data block read from a device is invalid.
    InvalidCrc,
    /// Computed CRC of the ROM is invalid.
    InvalidRomCrc,
}

impl<E> From<E> for OneWireError<E> {
    fn from(other: E) -> Self {
        Self::Other(other)
    }
}

impl<E: fmt::Debug> fmt::Display for OneWireError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other(e) => write!(f, "bus transport error: {e:?}"),
            Self::NoDevicePresent => f.write_str("no device present on the 1-Wire bus"),
            Self::ShortCircuit => f.write_str("short circuit detected on the 1-Wire bus"),
            Self::BusUninitialized => f.write_str("1-Wire bus master is not configured"),
            Self::InvalidCrc => f.write_str("data CRC mismatch"),
            Self::InvalidRomCrc => f.write_str("ROM CRC mismatch"),
        }
    }
}
