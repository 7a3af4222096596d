use core::fmt;
use embedded_onewire::OneWireError;

/// The handle has not been through a successful [`Ds18b20::init`](crate::Ds18b20::init).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotInitialized;

impl fmt::Display for NotInitialized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DS18B20 handle is not initialized")
    }
}

/// DS18B20 driver errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ds18b20Error<E> {
    /// The operation requires a prior successful initialization. Nothing was sent on the bus.
    NotInitialized,
    /// Errors reported by the 1-Wire bus master, passed through unchanged.
    OneWire(OneWireError<E>),
}

impl<E> From<OneWireError<E>> for Ds18b20Error<E> {
    fn from(value: OneWireError<E>) -> Self {
        Self::OneWire(value)
    }
}

impl<E> From<NotInitialized> for Ds18b20Error<E> {
    fn from(_: NotInitialized) -> Self {
        Self::NotInitialized
    }
}

impl<E: fmt::Debug> fmt::Display for Ds18b20Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => fmt::Display::fmt(&NotInitialized, f),
            Self::OneWire(e) => fmt::Display::fmt(e, f),
        }
    }
}
