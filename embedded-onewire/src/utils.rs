#[derive(Debug, Default, Clone, Copy)]
/// Calculate CRC-8 used in 1-Wire communications.
///
/// The polynomial is `x^8 + x^5 + x^4 + 1`, processed least significant bit
/// first (`0x8c` reflected form). It protects both ROM codes and device
/// scratchpads.
pub struct OneWireCrc(u8);

#[cfg(feature = "crc-table")]
const CRC_TABLE: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = crc_bitwise(0, i as u8);
        i += 1;
    }
    table
};

const fn crc_bitwise(crc: u8, byte: u8) -> u8 {
    let mut crc = crc ^ byte;
    let mut bit = 0;
    while bit < 8 {
        if crc & 0x1 == 0x1 {
            crc = (crc >> 1) ^ 0x8c;
        } else {
            crc >>= 1;
        }
        bit += 1;
    }
    crc
}

impl OneWireCrc {
    /// Get the current CRC value
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Update the CRC with the incoming byte.
    pub fn update(&mut self, byte: u8) {
        #[cfg(feature = "crc-table")]
        {
            self.0 = CRC_TABLE[(self.0 ^ byte) as usize];
        }
        #[cfg(not(feature = "crc-table"))]
        {
            self.0 = crc_bitwise(self.0, byte);
        }
    }

    /// Compute the CRC of a sequence of bytes.
    pub fn compute(sequence: &[u8]) -> u8 {
        let mut crc = OneWireCrc(0);
        for &byte in sequence.iter() {
            crc.update(byte);
        }
        crc.0
    }

    /// Validate a sequence of bytes where the last byte is the 1-Wire CRC of
    /// the previous bytes.
    pub fn validate(sequence: &[u8]) -> bool {
        // Feeding the CRC byte itself through the register yields zero
        !sequence.is_empty() && Self::compute(sequence) == 0x0
    }
}

/// Family code of a ROM, held in its least significant byte.
pub fn family_code(rom: u64) -> u8 {
    rom.to_le_bytes()[0]
}

/// Check the CRC byte (most significant byte) of a 64-bit ROM code.
pub fn rom_crc_valid(rom: u64) -> bool {
    OneWireCrc::validate(&rom.to_le_bytes())
}
