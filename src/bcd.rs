//! Binary-coded decimal packing used by the time registers.

/// Packs `n` one decimal digit per nibble, least significant digit in the
/// lowest nibble. `to_bcd(47) == 0x47`.
pub fn to_bcd(n: u32) -> u64 {
    let mut n = n;
    let mut packed = 0u64;
    let mut shift = 0;
    loop {
        packed |= u64::from(n % 10) << shift;
        n /= 10;
        shift += 4;
        if n == 0 {
            break;
        }
    }
    packed
}

/// Decodes up to four packed nibbles.
///
/// Each nibble is masked out before it is weighted, so stray high bits in a
/// raw register byte never leak into a neighbouring digit. Nibbles above 9
/// are not rejected.
pub fn from_bcd(packed: u16) -> u16 {
    (packed & 0x000f)
        + ((packed & 0x00f0) >> 4) * 10
        + ((packed & 0x0f00) >> 8) * 100
        + ((packed & 0xf000) >> 12) * 1000
}

/// Single register byte form of [`to_bcd`]. Only the two low digits survive.
pub(crate) fn to_bcd_u8(n: u8) -> u8 {
    (to_bcd(u32::from(n)) & 0xff) as u8
}
