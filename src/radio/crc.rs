//! CRC calculation for radio frames.
//!
//! CRC-16/CCITT-FALSE (polynomial 0x1021, initial value 0xFFFF), stored
//! little-endian in the last two bytes of every frame.

const CRC_POLYNOMIAL: u16 = 0x1021;

const CRC_INITIAL: u16 = 0xFFFF;

/// Calculate the CRC-16 of `data`.
///
/// # Arguments
///
/// * `data` - The frame bytes to checksum, without the CRC trailer
///
/// # Returns
///
/// The 16-bit CRC value
///
/// # Example
///
/// ```
/// use twin_thermo::radio::calculate_crc;
///
/// // Standard CCITT-FALSE check value.
/// assert_eq!(calculate_crc(b"123456789"), 0x29B1);
/// ```
pub fn calculate_crc(data: &[u8]) -> u16 {
    let mut crc = CRC_INITIAL;

    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ CRC_POLYNOMIAL;
            } else {
                crc <<= 1;
            }
        }
    }

    crc
}

/// Split a frame into its body and trailing CRC, if the CRC matches.
///
/// # Arguments
///
/// * `frame` - A complete frame, CRC trailer included
///
/// # Returns
///
/// The body without the trailer, or `Err((expected, actual))` on a
/// mismatch. Frames shorter than three bytes yield `Err((0, 0))`.
pub fn split_verified(frame: &[u8]) -> Result<&[u8], (u16, u16)> {
    if frame.len() < 3 {
        return Err((0, 0));
    }

    let body_len = frame.len() - 2;
    let expected = calculate_crc(&frame[..body_len]);
    let actual = u16::from_le_bytes([frame[body_len], frame[body_len + 1]]);

    if expected == actual {
        Ok(&frame[..body_len])
    } else {
        Err((expected, actual))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc_empty() {
        assert_eq!(calculate_crc(&[]), CRC_INITIAL);
    }

    #[test]
    fn test_crc_check_value() {
        assert_eq!(calculate_crc(b"123456789"), 0x29B1);
    }

    #[test]
    fn test_crc_different_data() {
        assert_ne!(calculate_crc(&[0x01, 0x02, 0x03]), calculate_crc(&[0x01, 0x02, 0x04]));
    }

    #[test]
    fn test_split_verified() {
        let body = [0x02, 0x19, 0x00];
        let mut frame = body.to_vec();
        frame.extend_from_slice(&calculate_crc(&body).to_le_bytes());

        assert_eq!(split_verified(&frame), Ok(&body[..]));

        let last = frame.len() - 1;
        frame[last] ^= 0xFF;
        assert!(split_verified(&frame).is_err());
    }

    #[test]
    fn test_split_too_short() {
        assert_eq!(split_verified(&[0x02, 0x19]), Err((0, 0)));
    }
}
