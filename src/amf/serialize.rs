// src/amf/serialize.rs
//! Value serialization in the AMF3 format.
//!
//! [`AmfSerialize`] is the seam to the host object model: each value writes
//! its own marker and payload, using the session tables for anything that
//! can be sent by reference. This module implements it for scalars, strings,
//! XML text and byte arrays.

use super::marker::{
    BYTE_ARRAY_MARKER, DOUBLE_MARKER, FALSE_MARKER, INTEGER_MARKER, NULL_MARKER, ObjectEncoding,
    STRING_MARKER, TRUE_MARKER, UNDEFINED_MARKER, XML_MARKER,
};
use super::session::{ObjectId, SerializationSession};
use crate::buffer::{ByteArray, Endian};
use crate::config::ByteArrayConfig;
use crate::error::Result;
use crate::shared::SharedByteArray;

const I29_MIN: i32 = -(1 << 28);
const I29_MAX: i32 = (1 << 28) - 1;

/// A value that can write itself in the AMF3 format.
pub trait AmfSerialize {
    /// Writes the marker and payload of `self` at the cursor of `out`.
    fn serialize_amf(&self, out: &mut ByteArray, session: &mut SerializationSession) -> Result<()>;
}

impl<T: AmfSerialize + ?Sized> AmfSerialize for &T {
    fn serialize_amf(&self, out: &mut ByteArray, session: &mut SerializationSession) -> Result<()> {
        (**self).serialize_amf(out, session)
    }
}

/// The host runtime's `undefined` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Undefined;

impl AmfSerialize for Undefined {
    fn serialize_amf(&self, out: &mut ByteArray, _: &mut SerializationSession) -> Result<()> {
        out.put(&[UNDEFINED_MARKER])
    }
}

/// `None` is written as `null`.
impl<T: AmfSerialize> AmfSerialize for Option<T> {
    fn serialize_amf(&self, out: &mut ByteArray, session: &mut SerializationSession) -> Result<()> {
        match self {
            Some(value) => value.serialize_amf(out, session),
            None => out.put(&[NULL_MARKER]),
        }
    }
}

impl AmfSerialize for bool {
    fn serialize_amf(&self, out: &mut ByteArray, _: &mut SerializationSession) -> Result<()> {
        out.put(&[if *self { TRUE_MARKER } else { FALSE_MARKER }])
    }
}

/// Integers outside the signed 29-bit range are written as doubles.
impl AmfSerialize for i32 {
    fn serialize_amf(&self, out: &mut ByteArray, session: &mut SerializationSession) -> Result<()> {
        if (I29_MIN..=I29_MAX).contains(self) {
            out.put(&[INTEGER_MARKER])?;
            out.write_u29(*self as u32 & 0x1FFF_FFFF)
        } else {
            (*self as f64).serialize_amf(out, session)
        }
    }
}

impl AmfSerialize for u32 {
    fn serialize_amf(&self, out: &mut ByteArray, session: &mut SerializationSession) -> Result<()> {
        if *self <= I29_MAX as u32 {
            (*self as i32).serialize_amf(out, session)
        } else {
            (*self as f64).serialize_amf(out, session)
        }
    }
}

/// Doubles are always big-endian, whatever the array's byte order.
impl AmfSerialize for f64 {
    fn serialize_amf(&self, out: &mut ByteArray, _: &mut SerializationSession) -> Result<()> {
        let mut bytes = [0u8; 9];
        bytes[0] = DOUBLE_MARKER;
        bytes[1..].copy_from_slice(&self.to_be_bytes());
        out.put(&bytes)
    }
}

impl AmfSerialize for str {
    fn serialize_amf(&self, out: &mut ByteArray, session: &mut SerializationSession) -> Result<()> {
        out.put(&[STRING_MARKER])?;
        out.write_string_ref(session, self)
    }
}

impl AmfSerialize for String {
    fn serialize_amf(&self, out: &mut ByteArray, session: &mut SerializationSession) -> Result<()> {
        self.as_str().serialize_amf(out, session)
    }
}

/// Serialized XML text with the identity of the XML value it came from.
///
/// XML goes through the object table, so the same XML value written twice
/// in one pass is sent once.
#[derive(Debug)]
pub struct XmlText {
    id: ObjectId,
    text: String,
}

impl XmlText {
    /// Wraps `text` under a fresh identity.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: ObjectId::next(),
            text: text.into(),
        }
    }

    /// Identity used by the object table.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// The XML source.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl AmfSerialize for XmlText {
    fn serialize_amf(&self, out: &mut ByteArray, session: &mut SerializationSession) -> Result<()> {
        out.put(&[XML_MARKER])?;
        out.write_object_ref(session, self.id, self.text.as_bytes())
    }
}

fn serialize_byte_array(
    out: &mut ByteArray,
    session: &mut SerializationSession,
    id: ObjectId,
    content: &[u8],
) -> Result<()> {
    out.put(&[BYTE_ARRAY_MARKER])?;
    out.write_object_ref(session, id, content)
}

impl AmfSerialize for ByteArray {
    fn serialize_amf(&self, out: &mut ByteArray, session: &mut SerializationSession) -> Result<()> {
        serialize_byte_array(out, session, self.id(), self.as_slice())
    }
}

/// Locks the array for the duration of the copy.
///
/// Serializing a handle while its lock is held by the caller deadlocks;
/// [`SharedByteArray::write_object`] serializes before taking its own lock.
impl AmfSerialize for SharedByteArray {
    fn serialize_amf(&self, out: &mut ByteArray, session: &mut SerializationSession) -> Result<()> {
        let inner = self.lock();
        serialize_byte_array(out, session, inner.id(), inner.as_slice())
    }
}

/// Returns `true`, with a warning, when `encoding` has no serializer.
pub(crate) fn is_legacy_noop(encoding: ObjectEncoding) -> bool {
    if encoding == ObjectEncoding::Amf0 {
        log::warn!("ByteArray.writeObject: AMF0 serialization is not implemented");
        return true;
    }
    false
}

/// Serializes `value` into a fresh array with its own session.
///
/// The AMF3 stream does not depend on where it lands, so the caller copies
/// it into the destination only once serialization has succeeded.
pub(crate) fn serialize_detached<T: AmfSerialize + ?Sized>(
    value: &T,
    endian: Endian,
) -> Result<ByteArray> {
    let mut scratch = ByteArray::with_config(ByteArrayConfig {
        endian,
        object_encoding: ObjectEncoding::Amf3,
        shareable: false,
    });
    let mut session = SerializationSession::new();
    value.serialize_amf(&mut scratch, &mut session)?;
    Ok(scratch)
}

impl ByteArray {
    /// Serializes `value` at the cursor and returns the number of bytes written.
    ///
    /// Each call uses fresh reference tables. Under
    /// [`ObjectEncoding::Amf0`] nothing is written and 0 is returned: the
    /// legacy format is not implemented. If serialization fails the array is
    /// not modified.
    ///
    /// ```
    /// use amfbuf::ByteArray;
    /// # use amfbuf::BufferError;
    ///
    /// let mut ba = ByteArray::new();
    /// assert_eq!(ba.write_object(&7)?, 2);
    /// assert_eq!(ba.as_slice(), &[0x04, 0x07]);
    /// # Ok::<(), BufferError>(())
    /// ```
    pub fn write_object<T: AmfSerialize + ?Sized>(&mut self, value: &T) -> Result<usize> {
        if is_legacy_noop(self.object_encoding) {
            return Ok(0);
        }
        let encoded = serialize_detached(value, self.endian)?;
        self.put(encoded.as_slice())?;
        Ok(encoded.len())
    }
}
