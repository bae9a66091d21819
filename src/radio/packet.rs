//! Radio frame encoding and decoding.
//!
//! Frame format (little-endian):
//! PacketType(1) + Group(1) + Serial(4) + Flags(1) + Value(8) + NameLen(1) + Name + CRC(2)

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Error, Result};
use crate::radio::crc::{calculate_crc, split_verified};

/// Longest name a frame can carry.
pub const MAX_NAME_LEN: usize = 16;

/// Bytes before the name.
const HEADER_SIZE: usize = 16;

/// Flag bit set when the frame carries a value.
const FLAG_VALUE_PRESENT: u8 = 0x01;

/// Frame kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketType {
    /// A named numeric value.
    NamedValue = 0x02,
}

impl PacketType {
    /// Create from raw byte value.
    pub fn from_raw(value: u8) -> Option<Self> {
        match value {
            0x02 => Some(Self::NamedValue),
            _ => None,
        }
    }

    /// Convert to raw byte value.
    pub fn to_raw(&self) -> u8 {
        *self as u8
    }
}

/// A decoded radio value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RadioMessage {
    /// Group the frame was sent on.
    pub group: u8,
    /// Serial number of the sending node.
    pub serial: u32,
    /// Value name.
    pub name: String,
    /// The value, if the frame carried one.
    pub value: Option<f64>,
}

impl RadioMessage {
    /// Create a message carrying a value.
    pub fn new(group: u8, serial: u32, name: impl Into<String>, value: f64) -> Self {
        Self {
            group,
            serial,
            name: name.into(),
            value: Some(value),
        }
    }

    /// Create a message with no value.
    pub fn without_value(group: u8, serial: u32, name: impl Into<String>) -> Self {
        Self {
            group,
            serial,
            name: name.into(),
            value: None,
        }
    }

    /// Check if the value is zero or missing.
    pub fn is_empty_value(&self) -> bool {
        self.value.map_or(true, |v| v == 0.0)
    }

    /// Encode into a frame.
    ///
    /// # Returns
    ///
    /// The header, value, name and CRC trailer, or
    /// [`Error::InvalidParameter`] when the name exceeds [`MAX_NAME_LEN`]
    /// bytes.
    pub fn encode(&self) -> Result<Bytes> {
        let name = self.name.as_bytes();
        if name.len() > MAX_NAME_LEN {
            return Err(Error::InvalidParameter {
                name: "name".to_string(),
                value: self.name.clone(),
            });
        }

        let mut buf = BytesMut::with_capacity(HEADER_SIZE + name.len() + 2);
        buf.put_u8(PacketType::NamedValue.to_raw());
        buf.put_u8(self.group);
        buf.put_u32_le(self.serial);
        match self.value {
            Some(value) => {
                buf.put_u8(FLAG_VALUE_PRESENT);
                buf.put_f64_le(value);
            }
            None => {
                buf.put_u8(0);
                buf.put_f64_le(0.0);
            }
        }
        buf.put_u8(name.len() as u8);
        buf.put_slice(name);

        let crc = calculate_crc(&buf);
        buf.put_u16_le(crc);

        Ok(buf.freeze())
    }

    /// Decode a frame.
    ///
    /// # Arguments
    ///
    /// * `frame` - Raw bytes as received, CRC trailer included
    ///
    /// # Returns
    ///
    /// The message, or an error if the frame is truncated, has the wrong
    /// header or fails its CRC.
    pub fn decode(frame: &[u8]) -> Result<Self> {
        if frame.len() < HEADER_SIZE + 2 {
            return Err(Error::InvalidData {
                context: format!("Frame too short: {} bytes", frame.len()),
            });
        }

        let mut body = split_verified(frame)
            .map_err(|(expected, actual)| Error::CrcMismatch { expected, actual })?;

        let raw_type = body.get_u8();
        if PacketType::from_raw(raw_type).is_none() {
            return Err(Error::InvalidData {
                context: format!("Unknown packet type: {:#04x}", raw_type),
            });
        }

        let group = body.get_u8();
        let serial = body.get_u32_le();
        let flags = body.get_u8();
        let raw_value = body.get_f64_le();
        let name_len = body.get_u8() as usize;

        if name_len > MAX_NAME_LEN || name_len != body.remaining() {
            return Err(Error::InvalidData {
                context: format!(
                    "Name length {} does not match {} remaining bytes",
                    name_len,
                    body.remaining()
                ),
            });
        }

        let name = std::str::from_utf8(body)
            .map_err(|e| Error::InvalidData {
                context: format!("Name is not UTF-8: {}", e),
            })?
            .to_string();

        let value = (flags & FLAG_VALUE_PRESENT != 0).then_some(raw_value);

        Ok(Self {
            group,
            serial,
            name,
            value,
        })
    }
}
