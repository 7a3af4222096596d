#![no_std]
#![deny(missing_docs)]

/*! # DS18B20
 *
 * A driver for the DS18B20 1-Wire digital thermometer, generic over any bus
 * master implementing [`OneWire`].
 *
 * The handle never owns the bus: every operation borrows it, so several handles
 * can share one bus master. The driver never sleeps either. After
 * [`Ds18b20::start_conversion`] the caller waits at least
 * [`Ds18b20::conversion_period_ms`] before calling [`Ds18b20::read_temperature`].
 */

#[macro_use]
mod fmt;
mod error;
mod registers;

pub use embedded_onewire::{OneWire, OneWireError, OneWireResult};
pub use error::{Ds18b20Error, NotInitialized};
pub use registers::{Configuration, Resolution, Scratchpad, Temperature};

use embedded_onewire::{OneWireCrc, consts::ONEWIRE_SKIP_ROM_CMD};

/// Results of DS18B20-specific function calls.
pub type Ds18b20Result<T, E> = Result<T, Ds18b20Error<E>>;

/// 1-Wire family code of the DS18B20.
pub const FAMILY_CODE: u8 = 0x28;

/// Longest conversion time over all resolutions, in milliseconds.
pub const MAX_CONVERSION_TIME_MS: u16 = 750;

const DS18B20_START_CONV: u8 = 0x44;
const DS18B20_COPY_SCRATCH: u8 = 0x48;
const DS18B20_WRITE_SCRATCH: u8 = 0x4e;
const DS18B20_RECALL_EEPROM: u8 = 0xb8;
const DS18B20_READ_SCRATCH: u8 = 0xbe;

/// Full scratchpad length including the CRC byte.
const SCRATCHPAD_LEN: usize = 9;

/// Builder for a [`Ds18b20`] handle.
#[derive(Debug, Default)]
pub struct Ds18b20Builder {
    rom: u64,
    addressing: bool,
    crc: bool,
}

impl Ds18b20Builder {
    /// ROM code of the device. Only used once addressing is enabled.
    pub fn with_rom(mut self, rom: u64) -> Self {
        self.rom = rom;
        self
    }

    /// Address the device by its ROM code instead of skipping ROM selection.
    pub fn with_addressing(mut self, enable: bool) -> Self {
        self.addressing = enable;
        self
    }

    /// Read the whole scratchpad and check its CRC on every read. The ROM code is
    /// checked as well before it is used for addressing.
    pub fn with_crc(mut self, enable: bool) -> Self {
        self.crc = enable;
        self
    }

    /// Build an uninitialized handle. Call [`Ds18b20::init`] before anything else.
    pub fn build(self) -> Ds18b20 {
        Ds18b20 {
            rom: self.rom,
            use_rom: self.addressing,
            crc: self.crc,
            scratchpad: Scratchpad::default(),
            conversion_period: MAX_CONVERSION_TIME_MS,
            initialized: false,
        }
    }
}

/// A DS18B20 temperature sensor.
///
/// Mirrors the alarm thresholds and the configuration register of the device.
/// Without addressing the handle talks to every device on the bus at once, which
/// is only sound for reads when a single device is attached.
#[derive(Debug, Clone)]
pub struct Ds18b20 {
    rom: u64,
    use_rom: bool,
    crc: bool,
    scratchpad: Scratchpad,
    conversion_period: u16,
    initialized: bool,
}

impl Ds18b20 {
    /// Create an uninitialized handle for the device with the given ROM code.
    ///
    /// The ROM code is ignored until addressing is enabled.
    pub fn new(rom: u64) -> Self {
        Ds18b20Builder::default().with_rom(rom).build()
    }

    /// Initialize the handle by reading the scratchpad of the device.
    ///
    /// On failure the handle stays uninitialized.
    pub fn init<O: OneWire>(&mut self, bus: &mut O) -> Ds18b20Result<(), O::BusError> {
        self.initialized = false;
        self.preamble(bus)?;
        self.read_scratchpad(bus)?;
        self.initialized = true;
        debug!(
            "DS18B20 {:016x} initialized: {} bit, alarms [{}, {}]",
            self.rom,
            self.scratchpad.config.resolution().bits(),
            self.scratchpad.t_low,
            self.scratchpad.t_high
        );
        Ok(())
    }

    /// Whether [`Ds18b20::init`] has succeeded on this handle.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// ROM code of the device.
    pub fn rom(&self) -> u64 {
        self.rom
    }

    /// Enable or disable addressing the device by its ROM code.
    ///
    /// The ROM code is sent as given. In CRC mode a ROM with a bad CRC is rejected
    /// by the next bus operation with [`OneWireError::InvalidRomCrc`].
    pub fn set_addressing(&mut self, enable: bool) -> Result<(), NotInitialized> {
        self.ensure_init()?;
        self.use_rom = enable;
        Ok(())
    }

    /// Whether the device is addressed by its ROM code.
    pub fn addressing(&self) -> bool {
        self.use_rom
    }

    /// Cached scratchpad, as last read from or written to the device.
    pub fn scratchpad(&self) -> Result<Scratchpad, NotInitialized> {
        self.ensure_init()?;
        Ok(self.scratchpad)
    }

    /// Time in milliseconds a conversion takes at the current resolution.
    pub fn conversion_period_ms(&self) -> Result<u16, NotInitialized> {
        self.ensure_init()?;
        Ok(self.conversion_period)
    }

    /// Start a temperature conversion on this device.
    ///
    /// The bus is left in strong pull-up for parasite-powered devices. Returns
    /// immediately; the result is valid after [`Ds18b20::conversion_period_ms`].
    pub fn start_conversion<O: OneWire>(&self, bus: &mut O) -> Ds18b20Result<(), O::BusError> {
        self.ensure_init()?;
        self.preamble(bus)?;
        bus.write_bytes(&[DS18B20_START_CONV], true)?;
        trace!("DS18B20 {:016x}: conversion started", self.rom);
        Ok(())
    }

    /// Start a temperature conversion on every device on the bus, regardless of
    /// the addressing mode of this handle.
    pub fn start_conversion_all<O: OneWire>(
        &self,
        bus: &mut O,
    ) -> Ds18b20Result<(), O::BusError> {
        self.ensure_init()?;
        bus.reset_checked()?;
        bus.write_bytes(&[ONEWIRE_SKIP_ROM_CMD, DS18B20_START_CONV], true)?;
        trace!("DS18B20: conversion started on all devices");
        Ok(())
    }

    /// Read the raw result of the last conversion.
    pub fn read_raw_temperature<O: OneWire>(
        &self,
        bus: &mut O,
    ) -> Ds18b20Result<i16, O::BusError> {
        self.ensure_init()?;
        self.preamble(bus)?;
        bus.write_bytes(&[DS18B20_READ_SCRATCH], false)?;
        let raw = if self.crc {
            let buf = Self::read_checked(bus)?;
            i16::from_le_bytes([buf[0], buf[1]])
        } else {
            let mut buf = [0; 2];
            bus.read_bytes(&mut buf)?;
            i16::from_le_bytes(buf)
        };
        trace!("DS18B20 {:016x}: raw reading {:#06x}", self.rom, raw);
        Ok(raw)
    }

    /// Read the result of the last conversion, scaled by the cached resolution.
    ///
    /// The value is only meaningful once the conversion period has elapsed since
    /// the last [`Ds18b20::start_conversion`].
    pub fn read_temperature<O: OneWire>(
        &self,
        bus: &mut O,
    ) -> Ds18b20Result<Temperature, O::BusError> {
        let raw = self.read_raw_temperature(bus)?;
        Ok(Temperature::from_num(raw) * self.scratchpad.config.resolution().scale())
    }

    /// Cached conversion resolution.
    pub fn resolution(&self) -> Result<Resolution, NotInitialized> {
        self.ensure_init()?;
        Ok(self.scratchpad.config.resolution())
    }

    /// Set the conversion resolution.
    ///
    /// The alarm thresholds are written back unchanged alongside. The cache holds
    /// the new resolution even if the write fails.
    pub fn set_resolution<O: OneWire>(
        &mut self,
        bus: &mut O,
        resolution: Resolution,
    ) -> Ds18b20Result<(), O::BusError> {
        self.ensure_init()?;
        self.scratchpad.config.set_resolution(resolution);
        self.update_conversion_period();
        self.preamble(bus)?;
        self.write_scratchpad(bus)
    }

    /// Cached alarm thresholds `(low, high)` in °C.
    pub fn alarm_range(&self) -> Result<(f32, f32), NotInitialized> {
        self.ensure_init()?;
        Ok((self.scratchpad.t_low as f32, self.scratchpad.t_high as f32))
    }

    /// Set the alarm thresholds.
    ///
    /// The device stores whole degrees: values are truncated toward zero and
    /// saturate at the `i8` range. The configuration register is written back
    /// unchanged alongside.
    pub fn set_alarm_range<O: OneWire>(
        &mut self,
        bus: &mut O,
        min: f32,
        max: f32,
    ) -> Ds18b20Result<(), O::BusError> {
        self.ensure_init()?;
        self.scratchpad.t_low = min as i8;
        self.scratchpad.t_high = max as i8;
        self.preamble(bus)?;
        self.write_scratchpad(bus)
    }

    /// Copy the alarm thresholds and configuration into the device EEPROM.
    pub fn save_config<O: OneWire>(&self, bus: &mut O) -> Ds18b20Result<(), O::BusError> {
        self.ensure_init()?;
        self.preamble(bus)?;
        bus.write_bytes(&[DS18B20_COPY_SCRATCH], true)?;
        debug!("DS18B20 {:016x}: configuration saved", self.rom);
        Ok(())
    }

    /// Reload the alarm thresholds and configuration from the device EEPROM and
    /// resynchronize the cache.
    pub fn restore_config<O: OneWire>(&mut self, bus: &mut O) -> Ds18b20Result<(), O::BusError> {
        self.ensure_init()?;
        self.preamble(bus)?;
        bus.write_bytes(&[DS18B20_RECALL_EEPROM], false)?;
        self.read_scratchpad(bus)?;
        debug!("DS18B20 {:016x}: configuration restored", self.rom);
        Ok(())
    }

    fn ensure_init(&self) -> Result<(), NotInitialized> {
        if self.initialized {
            Ok(())
        } else {
            Err(NotInitialized)
        }
    }

    fn update_conversion_period(&mut self) {
        self.conversion_period = self.scratchpad.config.resolution().conversion_time_ms();
    }

    /// Reset the bus and select this device, or every device when addressing is off.
    fn preamble<O: OneWire>(&self, bus: &mut O) -> OneWireResult<(), O::BusError> {
        if self.use_rom {
            if self.crc && !embedded_onewire::rom_crc_valid(self.rom) {
                return Err(OneWireError::InvalidRomCrc);
            }
            bus.address(Some(self.rom))
        } else {
            bus.address(None)
        }
    }

    /// Read the full scratchpad and validate its CRC.
    fn read_checked<O: OneWire>(
        bus: &mut O,
    ) -> OneWireResult<[u8; SCRATCHPAD_LEN], O::BusError> {
        let mut buf = [0; SCRATCHPAD_LEN];
        bus.read_bytes(&mut buf)?;
        if OneWireCrc::validate(&buf) {
            Ok(buf)
        } else {
            Err(OneWireError::InvalidCrc)
        }
    }

    fn read_scratchpad<O: OneWire>(&mut self, bus: &mut O) -> Ds18b20Result<(), O::BusError> {
        bus.write_bytes(&[DS18B20_READ_SCRATCH], false)?;
        let mut bytes = [0; 3];
        if self.crc {
            let buf = Self::read_checked(bus)?;
            bytes.copy_from_slice(&buf[Scratchpad::OFFSET..Scratchpad::OFFSET + 3]);
        } else {
            let mut buf = [0; 5];
            bus.read_bytes(&mut buf)?;
            bytes.copy_from_slice(&buf[Scratchpad::OFFSET..]);
        }
        self.scratchpad = Scratchpad::from_bytes(bytes);
        self.update_conversion_period();
        Ok(())
    }

    fn write_scratchpad<O: OneWire>(&self, bus: &mut O) -> Ds18b20Result<(), O::BusError> {
        let [t_low, t_high, config] = self.scratchpad.to_bytes();
        bus.write_bytes(&[DS18B20_WRITE_SCRATCH, t_low, t_high, config], false)?;
        Ok(())
    }
}
