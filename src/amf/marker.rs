// src/amf/marker.rs
//! AMF3 type markers and the object encoding selector.
//!
//! Marker values are shared with the deserializer and must not change.

use crate::error::BufferError;

/// `undefined`
pub const UNDEFINED_MARKER: u8 = 0x00;
/// `null`
pub const NULL_MARKER: u8 = 0x01;
/// `false`
pub const FALSE_MARKER: u8 = 0x02;
/// `true`
pub const TRUE_MARKER: u8 = 0x03;
/// 29-bit signed integer
pub const INTEGER_MARKER: u8 = 0x04;
/// IEEE 754 double, big-endian
pub const DOUBLE_MARKER: u8 = 0x05;
/// String via the string table
pub const STRING_MARKER: u8 = 0x06;
/// Legacy XML document
pub const XML_DOC_MARKER: u8 = 0x07;
/// Date
pub const DATE_MARKER: u8 = 0x08;
/// Array
pub const ARRAY_MARKER: u8 = 0x09;
/// Typed or dynamic object
pub const OBJECT_MARKER: u8 = 0x0A;
/// XML via the object table
pub const XML_MARKER: u8 = 0x0B;
/// Nested byte array via the object table
pub const BYTE_ARRAY_MARKER: u8 = 0x0C;
/// `Vector.<int>`
pub const VECTOR_INT_MARKER: u8 = 0x0D;
/// `Vector.<uint>`
pub const VECTOR_UINT_MARKER: u8 = 0x0E;
/// `Vector.<Number>`
pub const VECTOR_DOUBLE_MARKER: u8 = 0x0F;
/// `Vector.<Object>`
pub const VECTOR_OBJECT_MARKER: u8 = 0x10;
/// Dictionary
pub const DICTIONARY_MARKER: u8 = 0x11;

/// Object serialization wire format.
///
/// Only [`ObjectEncoding::Amf3`] is implemented; serializing under
/// [`ObjectEncoding::Amf0`] is a logged no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ObjectEncoding {
    /// Legacy format
    Amf0 = 0,
    /// Current format
    #[default]
    Amf3 = 3,
}

impl TryFrom<u32> for ObjectEncoding {
    type Error = BufferError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ObjectEncoding::Amf0),
            3 => Ok(ObjectEncoding::Amf3),
            other => Err(BufferError::InvalidData(format!(
                "invalid object encoding {}",
                other
            ))),
        }
    }
}

impl From<ObjectEncoding> for u32 {
    fn from(encoding: ObjectEncoding) -> Self {
        encoding as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_values() {
        assert_eq!(ObjectEncoding::try_from(3).unwrap(), ObjectEncoding::Amf3);
        assert_eq!(u32::from(ObjectEncoding::Amf0), 0);
        assert!(matches!(
            ObjectEncoding::try_from(1),
            Err(BufferError::InvalidData(_))
        ));
    }
}
