// src/lib.rs
//! # AMF Byte Array Library
//!
//! A growable byte array with a read/write cursor, modelled on the
//! `ByteArray` of Flash-style runtimes.
//!
//! Features:
//! - Big- or little-endian primitives (8/16/32-bit integers, floats, doubles)
//! - Length-prefixed and raw UTF-8 strings with byte order mark handling
//! - AMF3 object serialization with per-call string and object reference tables
//! - In-place zlib compression and decompression
//! - Array-style splicing and indexed byte access
//! - Compare-and-swap on content and length, linearized through [`SharedByteArray`]
//! - Secure memory zeroing of released storage using the `zeroize` crate
//!
//! ```
//! use amfbuf::prelude::*;
//!
//! let mut ba = ByteArray::new();
//! ba.write_utf("hello")?;
//! ba.write_object("hello")?;
//! ba.compress()?;
//! ba.uncompress()?;
//! ba.set_position(0);
//! assert_eq!(ba.read_utf()?, "hello");
//! # Ok::<(), BufferError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod amf;
pub mod buffer;
pub mod config;
pub mod error;
pub mod shared;

// Re-export main types
pub use buffer::{BA_CHUNK_SIZE, BA_MAX_SIZE, ByteArray, Endian, MAX_UTF_LEN};
pub use config::{ByteArrayConfig, default_object_encoding, set_default_object_encoding};
pub use error::{BufferError, Result, ResultExt};
pub use shared::SharedByteArray;

/// Commonly used imports.
pub mod prelude {
    pub use crate::amf::{AmfSerialize, ObjectEncoding, SerializationSession};
    pub use crate::buffer::{ByteArray, Endian};
    pub use crate::config::ByteArrayConfig;
    pub use crate::error::{BufferError, Result, ResultExt};
    pub use crate::shared::SharedByteArray;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_basic_byte_array() {
        let mut ba = ByteArray::new();
        ba.write_unsigned_int(42).unwrap();
        ba.write_byte(0xFF).unwrap();

        ba.set_position(0);
        assert_eq!(ba.read_unsigned_int().unwrap(), 42);
        assert_eq!(ba.read_unsigned_byte().unwrap(), 0xFF);
    }

    #[test]
    fn test_little_endian_config() {
        let mut ba = ByteArray::with_config(ByteArrayConfig::little_endian());
        ba.write_short(0x0102).unwrap();
        assert_eq!(ba.as_slice(), &[0x02, 0x01]);
    }

    #[test]
    fn test_shared_config_is_descriptive() {
        let ba = ByteArray::with_config(ByteArrayConfig::shared());
        assert!(ba.is_shareable());
    }

    #[test]
    fn test_mixed_content_round_trip() {
        let mut ba = ByteArray::new();
        ba.write_double(0.5).unwrap();
        ba.write_utf("name").unwrap();
        ba.write_boolean(true).unwrap();
        ba.write_object(&12).unwrap();

        ba.set_position(0);
        assert_eq!(ba.read_double().unwrap(), 0.5);
        assert_eq!(ba.read_utf().unwrap(), "name");
        assert!(ba.read_boolean().unwrap());
        assert_eq!(ba.read_unsigned_byte().unwrap(), crate::amf::marker::INTEGER_MARKER);
        assert_eq!(ba.read_i29().unwrap(), 12);
        assert_eq!(ba.bytes_available(), 0);
    }
}
