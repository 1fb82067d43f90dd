// src/buffer/mod.rs
//! Growable byte array and its primitive codecs

pub mod core;
pub(crate) mod array;
pub(crate) mod atomic;
pub(crate) mod compress;
pub mod endian;
pub(crate) mod index;
pub(crate) mod ops;

pub use self::core::{BA_CHUNK_SIZE, BA_MAX_SIZE, ByteArray};
pub use endian::Endian;
pub use ops::MAX_UTF_LEN;
