// src/buffer/atomic.rs
//! Compare-and-swap on array content and length.
//!
//! On an owned [`ByteArray`] these run under the exclusive borrow; through a
//! [`SharedByteArray`](crate::SharedByteArray) they run under its lock, which
//! linearizes concurrent attempts.

use super::core::ByteArray;
use crate::error::{BufferError, Result};

impl ByteArray {
    /// Replaces the 32-bit word at `index` with `new` if it equals `expected`.
    ///
    /// The word is interpreted in the array's current byte order. Returns the
    /// value found before the call.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Range`] if `index` is negative, not a multiple
    /// of 4, or the word does not lie inside the logical length.
    ///
    /// ```
    /// use amfbuf::ByteArray;
    /// # use amfbuf::BufferError;
    ///
    /// let mut ba = ByteArray::new();
    /// ba.write_int(5)?;
    /// assert_eq!(ba.compare_and_swap_int_at(0, 5, 9)?, 5);
    /// assert_eq!(ba.compare_and_swap_int_at(0, 5, 1)?, 9);
    /// ba.set_position(0);
    /// assert_eq!(ba.read_int()?, 9);
    /// # Ok::<(), BufferError>(())
    /// ```
    pub fn compare_and_swap_int_at(&mut self, index: i32, expected: i32, new: i32) -> Result<i32> {
        if index < 0 || index % 4 != 0 {
            return Err(BufferError::range(format!(
                "index {} is not a non-negative multiple of 4",
                index
            )));
        }
        let start = index as usize;
        if start + 4 > self.len {
            return Err(BufferError::range(format!(
                "index {} is outside a {}-byte array",
                index, self.len
            )));
        }

        let word = &mut self.data[start..start + 4];
        let mut raw = [0u8; 4];
        raw.copy_from_slice(word);
        let current = self.endian.from_wire_u32(u32::from_ne_bytes(raw)) as i32;
        if current == expected {
            word.copy_from_slice(&self.endian.to_wire_u32(new as u32).to_ne_bytes());
        }
        Ok(current)
    }

    /// Sets the length to `new` if it currently equals `expected`.
    ///
    /// Returns the length found before the call.
    pub fn compare_and_swap_length(&mut self, expected: usize, new: usize) -> Result<usize> {
        let current = self.len;
        if current == expected {
            self.set_length(new)?;
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Endian;

    #[test]
    fn test_cas_int_rejects_bad_index() {
        let mut ba = ByteArray::from_vec(vec![0; 8]);
        assert!(matches!(ba.compare_and_swap_int_at(-4, 0, 1), Err(BufferError::Range(_))));
        assert!(matches!(ba.compare_and_swap_int_at(2, 0, 1), Err(BufferError::Range(_))));
        assert!(matches!(ba.compare_and_swap_int_at(8, 0, 1), Err(BufferError::Range(_))));
        assert_eq!(ba.compare_and_swap_int_at(4, 0, 1).unwrap(), 0);
        assert_eq!(ba.as_slice(), &[0, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_cas_int_little_endian() {
        let mut ba = ByteArray::from_vec(vec![0; 4]);
        ba.set_endian(Endian::Little);
        ba.compare_and_swap_int_at(0, 0, 0x0102_0304).unwrap();
        assert_eq!(ba.as_slice(), &[4, 3, 2, 1]);
    }

    #[test]
    fn test_cas_length() {
        let mut ba = ByteArray::from_vec(vec![1; 10]);
        assert_eq!(ba.compare_and_swap_length(5, 20).unwrap(), 10);
        assert_eq!(ba.len(), 10);
        assert_eq!(ba.compare_and_swap_length(10, 4).unwrap(), 10);
        assert_eq!(ba.len(), 4);
        assert_eq!(ba.compare_and_swap_length(4, 0).unwrap(), 4);
        assert_eq!(ba.capacity(), 0);
    }
}
