// src/config.rs
//! Construction-time configuration for byte arrays.
//!
//! The process-wide default object encoding is read once, when a
//! [`ByteArrayConfig`] is created; arrays never poll it afterwards.

use crate::amf::ObjectEncoding;
use crate::buffer::Endian;
use crossbeam::atomic::AtomicCell;

static DEFAULT_OBJECT_ENCODING: AtomicCell<ObjectEncoding> = AtomicCell::new(ObjectEncoding::Amf3);

/// Returns the object encoding new byte arrays start with.
pub fn default_object_encoding() -> ObjectEncoding {
    DEFAULT_OBJECT_ENCODING.load()
}

/// Changes the object encoding picked up by configs created from now on.
pub fn set_default_object_encoding(encoding: ObjectEncoding) {
    DEFAULT_OBJECT_ENCODING.store(encoding);
}

/// Configuration for a new [`ByteArray`](crate::ByteArray).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteArrayConfig {
    /// Byte order for multi-byte primitives
    pub endian: Endian,
    /// Wire format targeted by object serialization
    pub object_encoding: ObjectEncoding,
    /// Whether the array is meant to be shared between threads
    pub shareable: bool,
}

impl Default for ByteArrayConfig {
    fn default() -> Self {
        Self {
            endian: Endian::Big,
            object_encoding: default_object_encoding(),
            shareable: false,
        }
    }
}

impl ByteArrayConfig {
    /// Default configuration with little-endian primitives.
    pub fn little_endian() -> Self {
        Self {
            endian: Endian::Little,
            ..Self::default()
        }
    }

    /// Default configuration marked shareable.
    pub fn shared() -> Self {
        Self {
            shareable: true,
            ..Self::default()
        }
    }
}
