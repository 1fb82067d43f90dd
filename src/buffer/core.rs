// src/buffer/core.rs
//! Core byte array structure and storage management
//!
//! This module provides the fundamental [`ByteArray`] type: an exclusively
//! owned growable region with a logical length and a cursor. Storage is
//! allocated lazily, sized exactly on first allocation and grown in
//! [`BA_CHUNK_SIZE`] steps afterwards. Released storage is wiped with
//! [`zeroize`] before it is freed.

use super::endian::Endian;
use crate::amf::{ObjectEncoding, ObjectId};
use crate::config::ByteArrayConfig;
use crate::error::{BufferError, Result};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Maximum logical length of a byte array (1 GiB)
pub const BA_MAX_SIZE: usize = 0x4000_0000;
/// Growth increment used once storage exists
pub const BA_CHUNK_SIZE: usize = 4096;

/// A growable byte array with cursor-based binary I/O.
///
/// Three sizes are tracked separately:
///
/// - **capacity**: bytes currently allocated (`0` means no storage at all)
/// - **length**: bytes visible to readers, never above capacity
/// - **position**: offset of the next read or write
///
/// # Examples
///
/// ```
/// use amfbuf::ByteArray;
/// # use amfbuf::BufferError;
///
/// let mut ba = ByteArray::new();
/// ba.write_int(42)?;
/// ba.write_utf("hello")?;
/// assert_eq!(ba.len(), 11);
///
/// ba.set_position(0);
/// assert_eq!(ba.read_int()?, 42);
/// assert_eq!(ba.read_utf()?, "hello");
/// # Ok::<(), BufferError>(())
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ByteArray {
    /// Allocated storage; `data.len()` is the capacity (securely erased on drop)
    pub(crate) data: Vec<u8>,
    /// Logical length
    pub(crate) len: usize,
    /// Current read/write position
    pub(crate) pos: usize,
    #[zeroize(skip)]
    pub(crate) endian: Endian,
    #[zeroize(skip)]
    pub(crate) object_encoding: ObjectEncoding,
    #[zeroize(skip)]
    pub(crate) shareable: bool,
    #[zeroize(skip)]
    pub(crate) id: ObjectId,
}

impl Default for ByteArray {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ByteArray {
    /// Copies content and settings; the clone is a distinct object with its
    /// own identity.
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            len: self.len,
            pos: self.pos,
            endian: self.endian,
            object_encoding: self.object_encoding,
            shareable: self.shareable,
            id: ObjectId::next(),
        }
    }
}

impl std::fmt::Debug for ByteArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteArray")
            .field("len", &self.len)
            .field("capacity", &self.data.len())
            .field("position", &self.pos)
            .field("endian", &self.endian)
            .field("object_encoding", &self.object_encoding)
            .field("shareable", &self.shareable)
            .finish()
    }
}

impl ByteArray {
    /// Creates an empty byte array with the default configuration.
    ///
    /// No memory is allocated until the first write.
    ///
    /// ```
    /// use amfbuf::ByteArray;
    ///
    /// let ba = ByteArray::new();
    /// assert_eq!(ba.capacity(), 0);
    /// assert!(ba.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_config(ByteArrayConfig::default())
    }

    /// Creates an empty byte array with an explicit configuration.
    pub fn with_config(config: ByteArrayConfig) -> Self {
        Self {
            data: Vec::new(),
            len: 0,
            pos: 0,
            endian: config.endian,
            object_encoding: config.object_encoding,
            shareable: config.shareable,
            id: ObjectId::next(),
        }
    }

    /// Creates a byte array that takes ownership of `data`.
    ///
    /// Length and capacity are both `data.len()`, the position is 0.
    ///
    /// # Panics
    ///
    /// Panics if `data` is longer than [`BA_MAX_SIZE`].
    pub fn from_vec(data: Vec<u8>) -> Self {
        assert!(
            data.len() <= BA_MAX_SIZE,
            "ByteArray size {} exceeds maximum {}",
            data.len(),
            BA_MAX_SIZE
        );
        let mut ba = Self::new();
        ba.len = data.len();
        ba.data = data;
        ba
    }

    /// Identity token used by the object reference table.
    #[inline(always)]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Bytes currently allocated.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Logical length.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the logical length is 0.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current read/write position.
    #[inline(always)]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Moves the cursor.
    ///
    /// Any value is accepted: reads past the length fail with
    /// [`BufferError::EndOfBuffer`], writes zero-fill the gap.
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Number of bytes between the cursor and the logical end.
    ///
    /// ```
    /// use amfbuf::ByteArray;
    /// # use amfbuf::BufferError;
    ///
    /// let mut ba = ByteArray::new();
    /// ba.write_int(1)?;
    /// ba.write_int(2)?;
    /// ba.set_position(0);
    /// assert_eq!(ba.bytes_available(), 8);
    /// ba.read_int()?;
    /// assert_eq!(ba.bytes_available(), 4);
    /// # Ok::<(), BufferError>(())
    /// ```
    #[inline(always)]
    pub fn bytes_available(&self) -> usize {
        self.len.saturating_sub(self.pos)
    }

    /// Byte order used by multi-byte primitives.
    #[inline(always)]
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Changes the byte order for subsequent operations.
    #[inline]
    pub fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    /// Wire format targeted by [`write_object`](Self::write_object).
    #[inline(always)]
    pub fn object_encoding(&self) -> ObjectEncoding {
        self.object_encoding
    }

    /// Changes the wire format for subsequent serializations.
    #[inline]
    pub fn set_object_encoding(&mut self, encoding: ObjectEncoding) {
        self.object_encoding = encoding;
    }

    /// Whether the array is marked for sharing between threads.
    #[inline(always)]
    pub fn is_shareable(&self) -> bool {
        self.shareable
    }

    /// Marks the array as shareable (or not).
    ///
    /// Locking itself is provided by [`SharedByteArray`](crate::SharedByteArray);
    /// see [`into_shared`](Self::into_shared).
    #[inline]
    pub fn set_shareable(&mut self, shareable: bool) {
        self.shareable = shareable;
    }

    /// Makes room for `size` bytes and returns the first `size` bytes of storage.
    ///
    /// - Without storage, exactly `size` bytes are allocated.
    /// - With `allow_resize`, storage grows in [`BA_CHUNK_SIZE`] steps until it
    ///   holds `size` bytes and the length becomes at least `size`.
    /// - Without `allow_resize`, `size` must already fit the capacity.
    ///
    /// Bytes between the old length and `size` are zero-filled.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::ResourceExhausted`] if `size` exceeds [`BA_MAX_SIZE`].
    ///
    /// # Panics
    ///
    /// Panics if `allow_resize` is false and `size` exceeds the capacity.
    ///
    /// ```
    /// use amfbuf::ByteArray;
    /// # use amfbuf::BufferError;
    ///
    /// let mut ba = ByteArray::new();
    /// ba.ensure_capacity(4000, true)?;
    /// assert_eq!(ba.capacity(), 4000);
    /// ba.ensure_capacity(4001, true)?;
    /// assert_eq!(ba.capacity(), 8096);
    /// # Ok::<(), BufferError>(())
    /// ```
    pub fn ensure_capacity(&mut self, size: usize, allow_resize: bool) -> Result<&mut [u8]> {
        if size > BA_MAX_SIZE {
            return Err(BufferError::ResourceExhausted(size));
        }

        let prev_len = self.len;
        if self.data.is_empty() {
            if size > 0 {
                self.data = vec![0; size];
                self.len = size;
            }
        } else if !allow_resize {
            assert!(
                size <= self.data.len(),
                "ensure_capacity: {} exceeds capacity {} with resizing disabled",
                size,
                self.data.len()
            );
        } else {
            if self.data.len() < size {
                let mut real_len = self.data.len();
                while real_len < size {
                    real_len += BA_CHUNK_SIZE;
                }
                self.data.resize(real_len, 0);
            }
            if self.len < size {
                self.len = size;
            }
        }

        if allow_resize && prev_len < size {
            self.data[prev_len..size].fill(0);
        }
        Ok(&mut self.data[..size])
    }

    /// Sets the logical length.
    ///
    /// Growing zero-fills the new bytes; setting 0 releases the storage. The
    /// cursor is clamped to `len - 1` (or 0) when it ends up past the new length.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::ResourceExhausted`] if `len` exceeds [`BA_MAX_SIZE`].
    ///
    /// ```
    /// use amfbuf::ByteArray;
    /// # use amfbuf::BufferError;
    ///
    /// let mut ba = ByteArray::new();
    /// ba.write_slice(b"abcdef")?;
    /// ba.set_length(3)?;
    /// assert_eq!(ba.position(), 2);
    /// assert_eq!(ba.as_slice(), b"abc");
    /// # Ok::<(), BufferError>(())
    /// ```
    pub fn set_length(&mut self, len: usize) -> Result<()> {
        if len > 0 {
            self.ensure_capacity(len, true)?;
        } else {
            self.release();
        }
        self.len = len;
        self.clamp_position();
        Ok(())
    }

    /// Releases the storage and resets length and position.
    ///
    /// The released bytes are securely zeroed first.
    ///
    /// ```
    /// use amfbuf::ByteArray;
    /// # use amfbuf::BufferError;
    ///
    /// let mut ba = ByteArray::new();
    /// ba.write_slice(b"secret")?;
    /// ba.clear();
    /// assert_eq!(ba.capacity(), 0);
    /// assert_eq!(ba.position(), 0);
    /// # Ok::<(), BufferError>(())
    /// ```
    pub fn clear(&mut self) {
        self.release();
        self.len = 0;
        self.pos = 0;
    }

    /// Replaces the storage wholesale.
    ///
    /// Capacity and length become `data.len()` and the position is reset to 0.
    /// Storage above [`BA_MAX_SIZE`] is refused and the array left as it was.
    pub(crate) fn acquire(&mut self, data: Vec<u8>) -> Result<()> {
        if data.len() > BA_MAX_SIZE {
            return Err(BufferError::ResourceExhausted(data.len()));
        }
        self.data.zeroize();
        self.len = data.len();
        self.data = data;
        self.pos = 0;
        Ok(())
    }

    /// Returns the logical content.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Returns the logical content mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data[..self.len]
    }

    /// Copies the logical content into a new `Vec`.
    pub fn to_vec(&self) -> Vec<u8> {
        self.as_slice().to_vec()
    }

    fn release(&mut self) {
        self.data.zeroize();
        self.data = Vec::new();
    }

    pub(crate) fn clamp_position(&mut self) {
        if self.pos > self.len {
            self.pos = self.len.saturating_sub(1);
        }
    }

    /// Checks that `count` bytes can be read at the cursor.
    #[inline(always)]
    pub(crate) fn check_readable(&self, count: usize) -> Result<()> {
        match self.pos.checked_add(count) {
            Some(end) if end <= self.len => Ok(()),
            _ => Err(BufferError::EndOfBuffer),
        }
    }

    /// Makes room for `count` bytes at the cursor and returns them.
    ///
    /// The cursor is not moved.
    #[inline]
    pub(crate) fn reserve_at_cursor(&mut self, count: usize) -> Result<&mut [u8]> {
        let pos = self.pos;
        let end = pos
            .checked_add(count)
            .ok_or(BufferError::ResourceExhausted(usize::MAX))?;
        let storage = self.ensure_capacity(end, true)?;
        Ok(&mut storage[pos..end])
    }
}

impl AsRef<[u8]> for ByteArray {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl From<Vec<u8>> for ByteArray {
    fn from(data: Vec<u8>) -> Self {
        Self::from_vec(data)
    }
}

impl From<&[u8]> for ByteArray {
    fn from(data: &[u8]) -> Self {
        Self::from_vec(data.to_vec())
    }
}
