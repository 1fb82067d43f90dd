// src/buffer/array.rs
//! Array-style operations (push/pop/shift/unshift) and front/back splicing

use super::core::ByteArray;
use crate::error::Result;

impl ByteArray {
    /// Appends the low byte of each value past the logical end.
    ///
    /// Returns the new length. The cursor is not moved.
    ///
    /// ```
    /// use amfbuf::ByteArray;
    /// # use amfbuf::BufferError;
    ///
    /// let mut ba = ByteArray::from_vec(vec![1]);
    /// assert_eq!(ba.push(&[2, 0x103, -1])?, 4);
    /// assert_eq!(ba.as_slice(), &[1, 2, 3, 0xFF]);
    /// # Ok::<(), BufferError>(())
    /// ```
    pub fn push(&mut self, values: &[i32]) -> Result<usize> {
        let old_len = self.len;
        let storage = self.ensure_capacity(old_len + values.len(), true)?;
        for (slot, value) in storage[old_len..].iter_mut().zip(values) {
            *slot = *value as u8;
        }
        Ok(self.len)
    }

    /// Inserts the low byte of each value at the front, in order.
    ///
    /// Returns the new length. The cursor is not moved.
    pub fn unshift(&mut self, values: &[i32]) -> Result<usize> {
        let old_len = self.len;
        let count = values.len();
        let storage = self.ensure_capacity(old_len + count, true)?;
        storage.copy_within(0..old_len, count);
        for (slot, value) in storage[..count].iter_mut().zip(values) {
            *slot = *value as u8;
        }
        Ok(self.len)
    }

    /// Reads the byte at the cursor, then drops the first byte of the array.
    ///
    /// The cursor advances past the byte read and is then clamped to the
    /// shorter length. Returns `None` and changes nothing when the cursor is
    /// at or past the end, which includes the empty array.
    ///
    /// ```
    /// use amfbuf::ByteArray;
    ///
    /// let mut ba = ByteArray::from_vec(vec![10, 20, 30]);
    /// ba.set_position(1);
    /// assert_eq!(ba.shift(), Some(20));
    /// assert_eq!(ba.as_slice(), &[20, 30]);
    /// assert_eq!(ba.position(), 2);
    /// ```
    pub fn shift(&mut self) -> Option<u8> {
        let value = self.read_unsigned_byte().ok()?;
        self.data.copy_within(1..self.len, 0);
        self.len -= 1;
        self.clamp_position();
        Some(value)
    }

    /// Same as [`shift`](Self::shift).
    pub fn pop(&mut self) -> Option<u8> {
        self.shift()
    }

    /// Appends `bytes` at the logical end without moving the cursor.
    pub fn append(&mut self, bytes: &[u8]) -> Result<()> {
        let old_len = self.len;
        self.ensure_capacity(old_len + bytes.len(), true)?[old_len..].copy_from_slice(bytes);
        Ok(())
    }

    /// Drops up to `count` leading bytes.
    ///
    /// The cursor moves back by the same amount, stopping at 0.
    pub fn remove_front_bytes(&mut self, count: usize) {
        let count = count.min(self.len);
        self.data.copy_within(count..self.len, 0);
        self.len -= count;
        self.pos = self.pos.saturating_sub(count);
    }
}
