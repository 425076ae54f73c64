//! Table-driven CRC-8 engine
//!
//! Polynomial 0x07 (x^8 + x^2 + x + 1), initial value 0, no reflection,
//! no final XOR. The last byte of every wire frame carries this checksum
//! computed over the header and payload bytes that precede it.

/// CRC-8 generator polynomial.
pub const CRC8_POLY: u8 = 0x07;

/// Precomputed lookup table, one entry per input byte value.
pub const CRC8_TABLE: [u8; 256] = build_table();

const fn build_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u8;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ CRC8_POLY
            } else {
                crc << 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Compute the CRC-8 of `data`.
///
/// Total over any input length; an empty slice yields 0.
pub fn crc8(data: &[u8]) -> u8 {
    let mut acc = 0u8;
    for &byte in data {
        acc = CRC8_TABLE[(acc ^ byte) as usize];
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(crc8(&[]), 0);
    }

    #[test]
    fn known_vectors() {
        // Standard CRC-8/SMBUS check value for "123456789".
        assert_eq!(crc8(b"123456789"), 0xF4);
        assert_eq!(crc8(&[0x00]), 0x00);
        assert_eq!(crc8(&[0x01]), 0x07);
        assert_eq!(crc8(&[0xFF]), 0xF3);
    }

    #[test]
    fn table_matches_bitwise_reference() {
        for i in 0..=255u8 {
            let mut crc = i;
            for _ in 0..8 {
                crc = if crc & 0x80 != 0 {
                    (crc << 1) ^ CRC8_POLY
                } else {
                    crc << 1
                };
            }
            assert_eq!(CRC8_TABLE[i as usize], crc);
        }
    }

    #[quickcheck]
    fn appending_checksum_zeroes_the_crc(data: Vec<u8>) -> bool {
        let mut framed = data.clone();
        framed.push(crc8(&data));
        crc8(&framed) == 0
    }

    #[test]
    fn sensitive_to_single_byte_flips() {
        let base = [0xAAu8, 0x55, 0x12, 0x34, 0x56];
        let reference = crc8(&base);
        for i in 0..base.len() {
            for bit in 0..8 {
                let mut flipped = base;
                flipped[i] ^= 1 << bit;
                assert_ne!(
                    crc8(&flipped),
                    reference,
                    "flip of byte {i} bit {bit} went undetected"
                );
            }
        }
    }
}
