//! ROM command constants for 1-Wire communication.

/// Command to match a specific ROM address in 1-Wire communication.
///
/// Followed by the 64-bit ROM code, least significant byte first. Only
/// the device whose ROM matches responds to the subsequent function command.
pub const ONEWIRE_MATCH_ROM_CMD: u8 = 0x55;

/// Command to skip ROM addressing in 1-Wire communication.
///
/// Every device on the bus listens to the following function command.
/// Reads after this command are only meaningful on a single-drop bus.
pub const ONEWIRE_SKIP_ROM_CMD: u8 = 0xcc;
