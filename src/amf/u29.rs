// src/amf/u29.rs
//! U29: the 1-4 byte variable-length integer of the AMF3 format.
//!
//! Unlike the fixed-width primitives, the most significant group comes
//! first. The first three bytes carry 7 bits each with `0x80` as the
//! continuation flag; a fourth byte carries 8 bits and ends the value.

use crate::buffer::ByteArray;
use crate::error::{BufferError, Result};

/// Largest value a U29 can carry
pub const U29_MAX: u32 = 0x1FFF_FFFF;

/// Encoded U29 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct U29Bytes {
    buf: [u8; 4],
    len: usize,
}

impl std::ops::Deref for U29Bytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

/// Encodes `value` as a U29.
///
/// # Errors
///
/// Returns [`BufferError::Range`] if `value` exceeds [`U29_MAX`].
///
/// ```
/// use amfbuf::amf::encode_u29;
///
/// assert_eq!(&*encode_u29(0x7F).unwrap(), &[0x7F]);
/// assert_eq!(&*encode_u29(0x80).unwrap(), &[0x81, 0x00]);
/// ```
pub fn encode_u29(value: u32) -> Result<U29Bytes> {
    let (buf, len) = match value {
        0..=0x7F => ([value as u8, 0, 0, 0], 1),
        0x80..=0x3FFF => ([(value >> 7) as u8 | 0x80, (value & 0x7F) as u8, 0, 0], 2),
        0x4000..=0x1F_FFFF => (
            [
                (value >> 14) as u8 | 0x80,
                ((value >> 7) & 0x7F) as u8 | 0x80,
                (value & 0x7F) as u8,
                0,
            ],
            3,
        ),
        0x20_0000..=U29_MAX => (
            [
                (value >> 22) as u8 | 0x80,
                ((value >> 15) & 0x7F) as u8 | 0x80,
                ((value >> 8) & 0x7F) as u8 | 0x80,
                (value & 0xFF) as u8,
            ],
            4,
        ),
        _ => {
            return Err(BufferError::range(format!(
                "{:#x} does not fit a U29",
                value
            )));
        }
    };
    Ok(U29Bytes { buf, len })
}

/// Decodes a U29 from the start of `bytes`.
///
/// Returns the value and the number of bytes consumed.
///
/// # Errors
///
/// Returns [`BufferError::EndOfBuffer`] if `bytes` ends inside the value.
pub fn decode_u29(bytes: &[u8]) -> Result<(u32, usize)> {
    let mut value = 0u32;
    for i in 0..3 {
        let b = *bytes.get(i).ok_or(BufferError::EndOfBuffer)?;
        value = (value << 7) | (b & 0x7F) as u32;
        if b & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    let last = *bytes.get(3).ok_or(BufferError::EndOfBuffer)?;
    Ok(((value << 8) | last as u32, 4))
}

/// Interprets a U29 as a signed 29-bit integer.
///
/// Bit 28 is the sign and is extended into bits 29-31.
///
/// ```
/// use amfbuf::amf::{decode_u29, sign_extend_i29};
///
/// let (raw, _) = decode_u29(&[0xFF, 0xFF, 0xFF, 0xFF]).unwrap();
/// assert_eq!(sign_extend_i29(raw), -1);
/// ```
#[inline]
pub fn sign_extend_i29(value: u32) -> i32 {
    if value & 0x1000_0000 != 0 {
        (value | 0xE000_0000) as i32
    } else {
        value as i32
    }
}

impl ByteArray {
    /// Writes `value` as a U29 at the cursor.
    pub fn write_u29(&mut self, value: u32) -> Result<()> {
        let encoded = encode_u29(value)?;
        self.put(&encoded)
    }

    /// Reads a U29 at the cursor.
    ///
    /// On a truncated value the position is left unchanged.
    pub fn read_u29(&mut self) -> Result<u32> {
        let remaining = self.as_slice().get(self.pos..).unwrap_or(&[]);
        let (value, used) = decode_u29(remaining)?;
        self.pos += used;
        Ok(value)
    }

    /// Reads a U29 at the cursor as a signed 29-bit integer.
    pub fn read_i29(&mut self) -> Result<i32> {
        self.read_u29().map(sign_extend_i29)
    }
}
