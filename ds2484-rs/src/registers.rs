use crate::{Ds2484Error, Ds2484Result, traits::{Addressing, Interact}};
use bitfield_struct::bitfield;
use embedded_hal::{
    delay::DelayNs,
    i2c::{I2c, SevenBitAddress},
};
use embedded_onewire::OneWireStatus;

pub(crate) const READ_PTR_CMD: u8 = 0xe1; // Set the read pointer
pub(crate) const DEVICE_STATUS_PTR: u8 = 0xf0; // Device status register
pub(crate) const DEVICE_RST_CMD: u8 = 0xf0; // Reset the device
pub(crate) const WRITE_CONFIG_CMD: u8 = 0xd2; // Write device configuration

/// Default 7-bit I2C address of the DS2484.
pub const DS2484_ADDR: u8 = 0x18;

/// A DS2484 I2C to 1-Wire bridge device.
///
/// Takes ownership of an I2C bus (implementing [`I2c`](embedded_hal::i2c::I2c) trait)
/// and a timer object implementing the [`DelayNs`](embedded_hal::delay::DelayNs) trait.
pub struct Ds2484<I, D> {
    pub(crate) i2c: I,
    pub(crate) addr: u8,
    pub(crate) delay: D,
    pub(crate) retries: u8,
    pub(crate) config: DeviceConfiguration,
    pub(crate) configured: bool, // Cleared by a device reset until the configuration is written
}

/// Builder for creating a [`Ds2484`] instance with custom configuration.
pub struct Ds2484Builder {
    pub(crate) retries: u8,
    pub(crate) config: DeviceConfiguration,
}

impl Default for Ds2484Builder {
    fn default() -> Self {
        Ds2484Builder {
            retries: 100,
            config: DeviceConfiguration::new().with_active_pullup(true),
        }
    }
}

impl Ds2484Builder {
    /// Sets the retry count for the device.
    ///
    /// The retry count is used to determine how long
    /// the host waits before operations on the 1-Wire
    /// or I2C bus time out.
    pub fn with_retries(mut self, retries: u8) -> Self {
        self.retries = retries;
        self
    }

    /// Sets the device configuration.
    pub fn with_config(mut self, config: DeviceConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Builds a new `Ds2484` instance with the specified configuration.
    ///
    /// Resets the device and writes the configuration.
    pub fn build<I: I2c<SevenBitAddress>, D: DelayNs>(
        self,
        i2c: I,
        delay: D,
    ) -> Ds2484Result<Ds2484<I, D>, I::Error> {
        let mut dev = Ds2484 {
            i2c,
            addr: DS2484_ADDR,
            delay,
            retries: self.retries,
            config: self.config,
            configured: false,
        };
        dev.device_reset()?;
        dev.write_config(self.config)?;
        Ok(dev)
    }
}

impl<I: I2c<SevenBitAddress>, D: DelayNs> Ds2484<I, D> {
    /// Get the status of the device.
    pub fn get_status(&mut self) -> Ds2484Result<DeviceStatus, I::Error> {
        DeviceStatus::read(self)
    }

    /// Current device configuration.
    pub fn config(&self) -> DeviceConfiguration {
        self.config
    }

    /// Reset the device.
    ///
    /// Performs a global reset of device state machine logic. Terminates any ongoing 1-Wire
    /// communication. The device configuration has to be written again afterwards.
    pub fn device_reset(&mut self) -> Ds2484Result<DeviceStatus, I::Error> {
        self.i2c.write(self.addr, &[DEVICE_RST_CMD])?;
        self.configured = false;
        // The device reset leaves the read pointer on the status register
        let mut tries = 0;
        loop {
            let status = self.read_status_byte()?;
            if status.device_reset() {
                return Ok(status);
            }
            if tries >= self.retries {
                return Err(Ds2484Error::RetriesExceeded);
            }
            tries += 1;
            self.delay.delay_ms(1);
        }
    }

    /// Write the device configuration.
    ///
    /// The upper nibble of the transmitted byte is the complement of the lower
    /// nibble, which the device checks before accepting it.
    pub fn write_config(&mut self, config: DeviceConfiguration) -> Ds2484Result<(), I::Error> {
        self.onewire_wait()?;
        let mut readback = [0; 1];
        self.i2c
            .write_read(self.addr, &[WRITE_CONFIG_CMD, config.to_register()], &mut readback)?;
        self.config = DeviceConfiguration::from_register(readback[0]);
        self.configured = true;
        Ok(())
    }

    /// Wait until the 1-Wire line is idle and return the last status.
    pub(crate) fn onewire_wait(&mut self) -> Ds2484Result<DeviceStatus, I::Error> {
        self.i2c
            .write(self.addr, &[READ_PTR_CMD, DEVICE_STATUS_PTR])?;
        let mut tries = 0;
        loop {
            let status = self.read_status_byte()?;
            if !status.onewire_busy() {
                return Ok(status);
            }
            if tries >= self.retries {
                return Err(Ds2484Error::RetriesExceeded);
            }
            tries += 1;
            self.delay.delay_ms(1);
        }
    }

    fn read_status_byte(&mut self) -> Ds2484Result<DeviceStatus, I::Error> {
        let mut buf = [0; 1];
        self.i2c.read(self.addr, &mut buf)?;
        Ok(DeviceStatus::from_bits(buf[0]))
    }
}

/// Status register for DS2484.
///
/// The read-only Status register reports bit-type data from the 1-Wire side,
/// the 1-Wire busy status, and the device reset status. All 1-Wire communication
/// commands and the Device Reset command position the read pointer at this register.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
pub struct DeviceStatus {
    /// 1-Wire busy. Set while a 1-Wire command is executing.
    pub onewire_busy: bool,
    /// Presence pulse detected during the last 1-Wire Reset.
    pub presence_pulse_detect: bool,
    /// Short detected on the line during the last 1-Wire Reset.
    pub short_detect: bool,
    /// Logic level of the 1-Wire line, sampled on every status read.
    pub logic_level: bool,
    /// The device has gone through an internal reset and needs its configuration written.
    pub device_reset: bool,
    /// Single bit result.
    pub single_bit_result: bool,
    /// Triplet second bit.
    pub triplet_second_bit: bool,
    /// Branch direction taken.
    pub branch_dir_taken: bool,
}

impl OneWireStatus for DeviceStatus {
    fn presence(&self) -> bool {
        self.presence_pulse_detect()
    }

    fn shortcircuit(&self) -> bool {
        self.short_detect()
    }
}

impl Addressing for DeviceStatus {
    const READ_PTR: u8 = DEVICE_STATUS_PTR;
}

impl Interact for DeviceStatus {
    fn from_register(value: u8) -> Self {
        Self::from_bits(value)
    }
}

/// Device configuration register of the DS2484.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
pub struct DeviceConfiguration {
    /// Active pullup. Recommended for all but the shortest buses.
    pub active_pullup: bool,
    /// Power down the 1-Wire port.
    pub power_down_1wire: bool,
    /// Strong pullup after the next 1-Wire write. Cleared by the device once the
    /// strong pullup ends.
    pub strong_pullup: bool,
    /// 1-Wire overdrive speed.
    pub onewire_speed: bool,
    #[bits(4)]
    _complement: u8,
}

impl DeviceConfiguration {
    /// Byte sent with the Write Device Configuration command.
    pub(crate) fn to_register(self) -> u8 {
        let cfg = self.into_bits() & 0x0f;
        cfg | (!cfg << 4)
    }
}

impl Addressing for DeviceConfiguration {
    const READ_PTR: u8 = 0xc3;
}

impl Interact for DeviceConfiguration {
    fn from_register(value: u8) -> Self {
        Self::from_bits(value & 0x0f)
    }
}
