//! # CRC8 Checksum
//!
//! CRC-8/DVB-S2 over the length, type and payload bytes of a bridge frame.
//! The bridge firmware computes the same checksum and drops frames that do
//! not match.
//!
//! **Polynomial**: 0xD5 (x^8 + x^7 + x^6 + x^4 + x^2 + 1)
//! **Initial Value**: 0x00

/// CRC-8/DVB-S2 polynomial
const CRC8_POLY: u8 = 0xD5;

/// Lookup table, one entry per byte value
const CRC8_TABLE: [u8; 256] = build_table();

/// Runs the bitwise CRC step for a single byte.
const fn crc8_byte(mut crc: u8) -> u8 {
    let mut bit = 0;
    while bit < 8 {
        crc = if crc & 0x80 != 0 {
            (crc << 1) ^ CRC8_POLY
        } else {
            crc << 1
        };
        bit += 1;
    }
    crc
}

const fn build_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = crc8_byte(i as u8);
        i += 1;
    }
    table
}

/// Computes the frame checksum.
///
/// # Examples
///
/// ```
/// use pad_mapper::report::crc::crc8;
///
/// assert_eq!(crc8(&[]), 0x00);
/// assert_ne!(crc8(&[0x0E, 0x01]), crc8(&[0x0E, 0x02]));
/// ```
#[must_use]
pub fn crc8(data: &[u8]) -> u8 {
    data.iter()
        .fold(0u8, |crc, &byte| CRC8_TABLE[(crc ^ byte) as usize])
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Table-free reference implementation.
    fn crc8_bitwise(data: &[u8]) -> u8 {
        data.iter().fold(0u8, |crc, &byte| crc8_byte(crc ^ byte))
    }

    #[test]
    fn test_crc8_empty() {
        assert_eq!(crc8(&[]), 0x00);
    }

    #[test]
    fn test_crc8_zero_byte() {
        assert_eq!(crc8(&[0x00]), 0x00);
    }

    #[test]
    fn test_crc8_known_value() {
        // CRC-8/DVB-S2 check value for "123456789"
        assert_eq!(crc8(b"123456789"), 0xBC);
    }

    #[test]
    fn test_table_matches_bitwise() {
        let samples: [&[u8]; 5] = [
            &[0x01, 0x02, 0x03],
            &[0xFF, 0xFE, 0xFD],
            &[0x0E, 0x01, 0x00, 0x10],
            &[0x00; 14],
            &[0xFF; 10],
        ];

        for data in samples {
            assert_eq!(crc8(data), crc8_bitwise(data), "CRC mismatch for data: {:?}", data);
        }
    }

    #[test]
    fn test_crc8_changes_with_data() {
        assert_ne!(crc8(&[0x0E, 0x01, 0x00, 0x04]), crc8(&[0x0E, 0x01, 0x00, 0x05]));
    }
}
