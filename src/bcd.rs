//! Packed binary-coded-decimal helpers.
//!
//! Every time and alarm register of the PCF85063A stores its value as two
//! BCD digits, tens in the high nibble and units in the low nibble. Flag bits
//! that share a register with a BCD value must be masked off before calling
//! [`decode`].

/// Decodes a packed BCD byte into its binary value.
///
/// Each nibble is taken at face value, so a corrupt register (e.g. `0x6A`)
/// decodes to an out-of-range number instead of failing. Range checks belong
/// to the caller.
pub const fn decode(bcd: u8) -> u8 {
    (bcd >> 4) * 10 + (bcd & 0x0F)
}

/// Encodes a value in `0..=99` as a packed BCD byte.
///
/// Values above 99 are not representable; callers validate first.
pub const fn encode(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}
