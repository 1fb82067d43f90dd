// src/amf/session.rs
//! Reference tables for one serialization pass.
//!
//! AMF3 sends a value in full the first time it appears and as a table index
//! afterwards. Strings are keyed by content; objects and traits by an
//! identity token. Indices are assigned in first-seen order. A session is
//! created per top-level [`write_object`](crate::ByteArray::write_object)
//! call and never stored on the array.

use super::u29::encode_u29;
use crate::buffer::ByteArray;
use crate::error::{BufferError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Payloads must stay below this many bytes to fit a U29 header
pub const MAX_INLINE_PAYLOAD: usize = 1 << 28;

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_TRAIT_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a composite value (byte array, XML, host object).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Allocates a process-unique identity.
    pub fn next() -> Self {
        Self(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Stable identity of a class/shape descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TraitId(u64);

impl TraitId {
    /// Allocates a process-unique identity.
    pub fn next() -> Self {
        Self(NEXT_TRAIT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Outcome of a table lookup-or-insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableEntry {
    /// Seen before in this session; encode as a reference to this index
    Reference(u32),
    /// First occurrence; it now owns this index and must be encoded in full
    Inline(u32),
}

/// String, object and trait reference tables of one serialization pass.
#[derive(Debug, Default)]
pub struct SerializationSession {
    strings: HashMap<String, u32>,
    objects: HashMap<ObjectId, u32>,
    traits: HashMap<TraitId, u32>,
}

impl SerializationSession {
    /// Creates empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of a previously written string.
    pub fn string_index(&self, s: &str) -> Option<u32> {
        self.strings.get(s).copied()
    }

    /// Index of a previously written object.
    pub fn object_index(&self, id: ObjectId) -> Option<u32> {
        self.objects.get(&id).copied()
    }

    /// Index of a previously written trait descriptor.
    pub fn trait_index(&self, id: TraitId) -> Option<u32> {
        self.traits.get(&id).copied()
    }

    /// Number of strings in the table.
    pub fn string_count(&self) -> usize {
        self.strings.len()
    }

    /// Number of objects in the table.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Number of traits in the table.
    pub fn trait_count(&self) -> usize {
        self.traits.len()
    }

    /// Assigns the next object index to `id`.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Internal`] if `id` is already in the table: a
    /// value seen before must be written as a reference.
    pub fn register_object(&mut self, id: ObjectId) -> Result<u32> {
        insert_new(&mut self.objects, id, "object")
    }

    /// Assigns the next trait index to `id`.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Internal`] if `id` is already in the table.
    pub fn register_trait(&mut self, id: TraitId) -> Result<u32> {
        insert_new(&mut self.traits, id, "trait")
    }

    /// Looks up `id` in the trait table, registering it when absent.
    ///
    /// Host traversals use this to decide between a traits reference and a
    /// full class descriptor.
    pub fn trait_reference(&mut self, id: TraitId) -> Result<TableEntry> {
        match self.trait_index(id) {
            Some(index) => Ok(TableEntry::Reference(index)),
            None => self.register_trait(id).map(TableEntry::Inline),
        }
    }

    /// Looks up `id` in the object table, registering it when absent.
    pub fn object_reference(&mut self, id: ObjectId) -> Result<TableEntry> {
        match self.object_index(id) {
            Some(index) => Ok(TableEntry::Reference(index)),
            None => self.register_object(id).map(TableEntry::Inline),
        }
    }

    fn register_string(&mut self, s: &str) {
        if !s.is_empty() && !self.strings.contains_key(s) {
            let index = self.strings.len() as u32;
            self.strings.insert(s.to_owned(), index);
        }
    }
}

fn insert_new<K: std::hash::Hash + Eq>(
    table: &mut HashMap<K, u32>,
    key: K,
    kind: &str,
) -> Result<u32> {
    if table.contains_key(&key) {
        return Err(BufferError::Internal(format!(
            "{} registered twice in one serialization",
            kind
        )));
    }
    let index = table.len() as u32;
    table.insert(key, index);
    Ok(index)
}

/// Checks that an inline payload fits the U29 length header.
fn check_payload(len: usize) -> Result<()> {
    if len >= MAX_INLINE_PAYLOAD {
        return Err(BufferError::range(format!(
            "payload of {} bytes exceeds the U29 length limit",
            len
        )));
    }
    Ok(())
}

impl ByteArray {
    /// Writes a string through the session's string table.
    ///
    /// A string seen before becomes `U29(index << 1)`; otherwise
    /// `U29(len << 1 | 1)` and the UTF-8 bytes follow. The empty string is
    /// always written inline and never enters the table.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Range`] if the string is `2^28` bytes or longer.
    ///
    /// ```
    /// use amfbuf::ByteArray;
    /// use amfbuf::amf::SerializationSession;
    /// # use amfbuf::BufferError;
    ///
    /// let mut ba = ByteArray::new();
    /// let mut session = SerializationSession::new();
    /// ba.write_string_ref(&mut session, "ab")?;
    /// ba.write_string_ref(&mut session, "ab")?;
    /// assert_eq!(ba.as_slice(), &[0x05, b'a', b'b', 0x00]);
    /// # Ok::<(), BufferError>(())
    /// ```
    pub fn write_string_ref(&mut self, session: &mut SerializationSession, s: &str) -> Result<()> {
        check_payload(s.len())?;
        if let Some(index) = session.string_index(s) {
            return self.write_u29(index << 1);
        }
        self.write_inline(s.as_bytes())?;
        session.register_string(s);
        Ok(())
    }

    /// Writes a composite payload through the session's object table.
    ///
    /// An object seen before becomes `U29(index << 1)`; otherwise
    /// `U29(len << 1 | 1)` followed by `payload`, and `id` takes the next
    /// object index. Used for nested byte arrays and XML text.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Range`] if `payload` is `2^28` bytes or longer.
    pub fn write_object_ref(
        &mut self,
        session: &mut SerializationSession,
        id: ObjectId,
        payload: &[u8],
    ) -> Result<()> {
        if let Some(index) = session.object_index(id) {
            return self.write_u29(index << 1);
        }
        check_payload(payload.len())?;
        self.write_inline(payload)?;
        session.register_object(id)?;
        Ok(())
    }

    /// Writes `U29(len << 1 | 1)` and the payload as one reservation.
    fn write_inline(&mut self, payload: &[u8]) -> Result<()> {
        let header = encode_u29(((payload.len() as u32) << 1) | 1)?;
        self.reserve_at_cursor(header.len() + payload.len())?;
        self.put(&header)?;
        self.put(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_reference_after_first_use() {
        let mut ba = ByteArray::new();
        let mut session = SerializationSession::new();
        ba.write_string_ref(&mut session, "hello").unwrap();
        let first = ba.len();
        ba.write_string_ref(&mut session, "hello").unwrap();
        assert_eq!(first, 6);
        assert_eq!(ba.len() - first, 1);
        assert_eq!(ba.as_slice()[first], 0x00);
    }

    #[test]
    fn test_indices_follow_first_seen_order() {
        let mut ba = ByteArray::new();
        let mut session = SerializationSession::new();
        for s in ["a", "b", "a", "c", "b"] {
            ba.write_string_ref(&mut session, s).unwrap();
        }
        assert_eq!(session.string_index("a"), Some(0));
        assert_eq!(session.string_index("b"), Some(1));
        assert_eq!(session.string_index("c"), Some(2));
        assert_eq!(
            ba.as_slice(),
            &[0x03, b'a', 0x03, b'b', 0x00, 0x03, b'c', 0x02]
        );
    }

    #[test]
    fn test_empty_string_never_referenced() {
        let mut ba = ByteArray::new();
        let mut session = SerializationSession::new();
        ba.write_string_ref(&mut session, "").unwrap();
        ba.write_string_ref(&mut session, "").unwrap();
        assert_eq!(ba.as_slice(), &[0x01, 0x01]);
        assert_eq!(session.string_count(), 0);
    }

    #[test]
    fn test_object_table() {
        let mut ba = ByteArray::new();
        let mut session = SerializationSession::new();
        let (a, b) = (ObjectId::next(), ObjectId::next());
        ba.write_object_ref(&mut session, a, b"xy").unwrap();
        ba.write_object_ref(&mut session, b, b"").unwrap();
        ba.write_object_ref(&mut session, a, b"xy").unwrap();
        ba.write_object_ref(&mut session, b, b"").unwrap();
        assert_eq!(ba.as_slice(), &[0x05, b'x', b'y', 0x01, 0x00, 0x02]);
        assert_eq!(session.object_count(), 2);
    }

    #[test]
    fn test_double_registration_is_internal_fault() {
        let mut session = SerializationSession::new();
        let id = ObjectId::next();
        assert_eq!(session.register_object(id).unwrap(), 0);
        let err = session.register_object(id).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_trait_reference() {
        let mut session = SerializationSession::new();
        let (t1, t2) = (TraitId::next(), TraitId::next());
        assert_eq!(session.trait_reference(t1).unwrap(), TableEntry::Inline(0));
        assert_eq!(session.trait_reference(t2).unwrap(), TableEntry::Inline(1));
        assert_eq!(session.trait_reference(t1).unwrap(), TableEntry::Reference(0));
        assert_eq!(session.trait_count(), 2);
        assert_eq!(session.trait_index(t2), Some(1));
    }

    #[test]
    fn test_object_reference_lookup_or_insert() {
        let mut session = SerializationSession::new();
        let id = ObjectId::next();
        assert_eq!(session.object_reference(id).unwrap(), TableEntry::Inline(0));
        assert_eq!(session.object_reference(id).unwrap(), TableEntry::Reference(0));
    }

    #[test]
    fn test_payload_limit() {
        assert!(matches!(
            check_payload(MAX_INLINE_PAYLOAD),
            Err(BufferError::Range(_))
        ));
        assert!(check_payload(MAX_INLINE_PAYLOAD - 1).is_ok());
    }
}
