// src/buffer/index.rs
//! Indexed access to individual bytes.

use super::core::{BA_MAX_SIZE, ByteArray};
use crate::error::{BufferError, Result};

impl ByteArray {
    /// Returns the byte at `index`, or `None` past the logical end.
    #[inline]
    pub fn get(&self, index: usize) -> Option<u8> {
        self.as_slice().get(index).copied()
    }

    /// Returns `true` if `index` is below the logical length.
    #[inline]
    pub fn has_index(&self, index: usize) -> bool {
        index < self.len
    }

    /// Stores the low 8 bits of `value` at `index`.
    ///
    /// Writing past the end grows the array and zero-fills the gap. The
    /// cursor is not moved.
    ///
    /// ```
    /// use amfbuf::ByteArray;
    /// # use amfbuf::BufferError;
    ///
    /// let mut ba = ByteArray::new();
    /// ba.set(3, 0x1FF)?;
    /// assert_eq!(ba.as_slice(), &[0, 0, 0, 0xFF]);
    /// assert_eq!(ba.get(3), Some(255));
    /// assert_eq!(ba.get(4), None);
    /// # Ok::<(), BufferError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::ResourceExhausted`] if `index` is at or beyond
    /// [`BA_MAX_SIZE`].
    pub fn set(&mut self, index: usize, value: u32) -> Result<()> {
        if index >= BA_MAX_SIZE {
            return Err(BufferError::ResourceExhausted(index.saturating_add(1)));
        }
        if index >= self.len {
            self.ensure_capacity(index + 1, true)?;
        }
        self.data[index] = value as u8;
        Ok(())
    }
}
