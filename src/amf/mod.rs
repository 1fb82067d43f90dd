// src/amf/mod.rs
//! AMF3 serialization support
//!
//! - [`u29`]: the variable-length integer used for lengths and references
//! - [`session`]: per-call string, object and trait reference tables
//! - [`serialize`]: the [`AmfSerialize`] trait and the value writers
//! - [`marker`]: type markers and [`ObjectEncoding`]
//!
//! ```
//! use amfbuf::amf::{decode_u29, encode_u29};
//!
//! let bytes = encode_u29(300).unwrap();
//! assert_eq!(&*bytes, &[0x82, 0x2C]);
//! assert_eq!(decode_u29(&bytes).unwrap(), (300, 2));
//! ```

pub mod marker;
pub mod serialize;
pub mod session;
pub mod u29;

pub use marker::ObjectEncoding;
pub use serialize::{AmfSerialize, Undefined, XmlText};
pub use session::{MAX_INLINE_PAYLOAD, ObjectId, SerializationSession, TableEntry, TraitId};
pub use u29::{U29_MAX, U29Bytes, decode_u29, encode_u29, sign_extend_i29};
