use bitfield_struct::bitfield;
use fixed::types::I16F16;

/// Temperature in degrees Celsius.
///
/// Every DS18B20 reading is a 16-bit count scaled by a power of two, so the
/// fixed-point value is exact. Use [`to_num`](I16F16::to_num) for a float.
pub type Temperature = I16F16;

/// Worst-case conversion time in milliseconds, indexed by resolution code.
const CONVERSION_TIME_MS: [u16; 4] = [94, 188, 375, 750];

/// Measurement resolution, bits 5-6 of the configuration register.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resolution {
    /// 9-bit, 0.5 °C per LSB.
    Resolution9bit = 0,
    /// 10-bit, 0.25 °C per LSB.
    Resolution10bit = 1,
    /// 11-bit, 0.125 °C per LSB.
    Resolution11bit = 2,
    /// 12-bit, 0.0625 °C per LSB. Power-on default.
    #[default]
    Resolution12bit = 3,
}

impl Resolution {
    /// Decode a resolution from the two configuration bits.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Self::Resolution9bit,
            1 => Self::Resolution10bit,
            2 => Self::Resolution11bit,
            _ => Self::Resolution12bit,
        }
    }

    /// The two configuration bits of this resolution.
    pub const fn into_bits(self) -> u8 {
        self as u8
    }

    /// Number of significant bits in a reading.
    pub const fn bits(&self) -> u8 {
        9 + *self as u8
    }

    /// Worst-case time the device needs to complete a conversion, in milliseconds.
    pub const fn conversion_time_ms(&self) -> u16 {
        CONVERSION_TIME_MS[*self as usize]
    }

    /// Worst-case conversion time in microseconds, suitable for
    /// [`DelayNs::delay_us`](https://docs.rs/embedded-hal/latest/embedded_hal/delay/trait.DelayNs.html#method.delay_us).
    pub const fn conversion_time_us(&self) -> u32 {
        self.conversion_time_ms() as u32 * 1000
    }

    /// Degrees Celsius represented by one LSB of a raw reading.
    pub fn scale(&self) -> Temperature {
        // 2^-1 for 9-bit down to 2^-4 for 12-bit
        Temperature::from_bits(1 << (15 - *self as u32))
    }
}

impl TryFrom<u8> for Resolution {
    type Error = u8;

    /// Convert a bit count (9 to 12) into a [`Resolution`].
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            9..=12 => Ok(Self::from_bits(value - 9)),
            _ => Err(value),
        }
    }
}

/// The DS18B20 configuration register.
///
/// Only the resolution bits are writable; the device reads the low five bits
/// back as ones and the top bit as zero.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
pub struct Configuration {
    #[bits(5, default = 0x1f)]
    _reserved_low: u8,
    /// Conversion resolution.
    #[bits(2, default = Resolution::Resolution12bit)]
    pub resolution: Resolution,
    #[bits(1)]
    _reserved_high: u8,
}

/// Host-side mirror of the writable part of the scratchpad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Scratchpad {
    /// Low alarm threshold in °C.
    pub t_low: i8,
    /// High alarm threshold in °C.
    pub t_high: i8,
    /// Configuration register.
    pub config: Configuration,
}

impl Scratchpad {
    /// Offset of the alarm and configuration bytes in a scratchpad read.
    pub(crate) const OFFSET: usize = 2;

    pub(crate) fn from_bytes(bytes: [u8; 3]) -> Self {
        Self {
            t_low: bytes[0] as i8,
            t_high: bytes[1] as i8,
            config: Configuration::from_bits(bytes[2]),
        }
    }

    /// Bytes in write-scratchpad order: low alarm, high alarm, configuration.
    pub(crate) fn to_bytes(self) -> [u8; 3] {
        [self.t_low as u8, self.t_high as u8, self.config.into_bits()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_lives_in_bits_5_and_6() {
        let cfg = Configuration::new().with_resolution(Resolution::Resolution9bit);
        assert_eq!(cfg.into_bits(), 0x1f);
        let cfg = cfg.with_resolution(Resolution::Resolution11bit);
        assert_eq!(cfg.into_bits(), 0x5f);
        assert_eq!(Configuration::new().into_bits(), 0x7f);
        assert_eq!(
            Configuration::from_bits(0x3f).resolution(),
            Resolution::Resolution10bit
        );
    }

    #[test]
    fn changing_resolution_keeps_other_bits() {
        let mut cfg = Configuration::from_bits(0x80 | 0x60 | 0x05);
        cfg.set_resolution(Resolution::Resolution9bit);
        assert_eq!(cfg.into_bits(), 0x85);
    }

    #[test]
    fn timing_and_scale_tables() {
        use Resolution::*;
        let expected = [
            (Resolution9bit, 9, 94, 0.5),
            (Resolution10bit, 10, 188, 0.25),
            (Resolution11bit, 11, 375, 0.125),
            (Resolution12bit, 12, 750, 0.0625),
        ];
        for (res, bits, ms, scale) in expected {
            assert_eq!(res.bits(), bits);
            assert_eq!(Resolution::try_from(bits), Ok(res));
            assert_eq!(res.conversion_time_ms(), ms);
            assert_eq!(res.conversion_time_us(), ms as u32 * 1000);
            assert_eq!(res.scale().to_num::<f32>(), scale);
        }
        assert_eq!(Resolution::try_from(8), Err(8));
        assert_eq!(Resolution::try_from(13), Err(13));
    }

    #[test]
    fn scratchpad_byte_order() {
        let pad = Scratchpad::from_bytes([0xf6, 0x55, 0x3f]);
        assert_eq!(pad.t_low, -10);
        assert_eq!(pad.t_high, 85);
        assert_eq!(pad.config.resolution(), Resolution::Resolution10bit);
        assert_eq!(pad.to_bytes(), [0xf6, 0x55, 0x3f]);
    }
}
