// src/buffer/endian.rs
//! Byte order selection for multi-byte primitives.
//!
//! The codec is stateless: [`Endian::to_wire_u32`] converts a native value into
//! the representation whose native bytes are the wire bytes, and
//! [`Endian::from_wire_u32`] undoes it. Both are used symmetrically by every
//! fixed-width read and write.

use crate::error::BufferError;
use std::fmt;
use std::str::FromStr;

/// Byte order used for multi-byte primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endian {
    /// Most significant byte first (the default)
    #[default]
    Big,
    /// Least significant byte first
    Little,
}

macro_rules! wire_codec {
    ($($ty:ty => $to:ident, $from:ident;)*) => {
        impl Endian {
            $(
                #[doc = concat!("Converts a native `", stringify!($ty), "` into wire order.")]
                #[inline(always)]
                pub fn $to(self, value: $ty) -> $ty {
                    match self {
                        Endian::Big => value.to_be(),
                        Endian::Little => value.to_le(),
                    }
                }

                #[doc = concat!("Converts a wire-order `", stringify!($ty), "` into a native value.")]
                #[inline(always)]
                pub fn $from(self, value: $ty) -> $ty {
                    match self {
                        Endian::Big => <$ty>::from_be(value),
                        Endian::Little => <$ty>::from_le(value),
                    }
                }
            )*
        }
    };
}

wire_codec! {
    u16 => to_wire_u16, from_wire_u16;
    u32 => to_wire_u32, from_wire_u32;
    u64 => to_wire_u64, from_wire_u64;
}

impl Endian {
    /// Name used by the host runtime for big-endian order.
    pub const BIG_ENDIAN: &'static str = "bigEndian";
    /// Name used by the host runtime for little-endian order.
    pub const LITTLE_ENDIAN: &'static str = "littleEndian";

    /// Returns the host-facing name of this byte order.
    pub fn as_str(self) -> &'static str {
        match self {
            Endian::Big => Self::BIG_ENDIAN,
            Endian::Little => Self::LITTLE_ENDIAN,
        }
    }
}

impl fmt::Display for Endian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Endian {
    type Err = BufferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::BIG_ENDIAN => Ok(Endian::Big),
            Self::LITTLE_ENDIAN => Ok(Endian::Little),
            other => Err(BufferError::InvalidData(format!(
                "invalid endian value '{}'",
                other
            ))),
        }
    }
}
