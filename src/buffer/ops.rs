// src/buffer/ops.rs
//! Primitive read/write operations
//!
//! Every read checks the logical length before touching the cursor, so a
//! failed read leaves the array unchanged. Every write first makes room for
//! `position + width` bytes, zero-filling any gap.

use super::core::ByteArray;
use crate::error::{BufferError, Result};

/// Maximum byte length of a 16-bit length-prefixed string
pub const MAX_UTF_LEN: usize = u16::MAX as usize;

/// UTF-8 byte order mark skipped by text reads
pub(crate) const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

impl ByteArray {
    #[inline]
    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.check_readable(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    #[inline]
    pub(crate) fn put(&mut self, bytes: &[u8]) -> Result<()> {
        self.reserve_at_cursor(bytes.len())?.copy_from_slice(bytes);
        self.pos += bytes.len();
        Ok(())
    }

    #[inline]
    fn read_u16_wire(&mut self) -> Result<u16> {
        let raw = u16::from_ne_bytes(self.take_array()?);
        Ok(self.endian.from_wire_u16(raw))
    }

    #[inline]
    fn read_u32_wire(&mut self) -> Result<u32> {
        let raw = u32::from_ne_bytes(self.take_array()?);
        Ok(self.endian.from_wire_u32(raw))
    }

    #[inline]
    fn read_u64_wire(&mut self) -> Result<u64> {
        let raw = u64::from_ne_bytes(self.take_array()?);
        Ok(self.endian.from_wire_u64(raw))
    }

    #[inline]
    fn write_u16_wire(&mut self, val: u16) -> Result<()> {
        let bytes = self.endian.to_wire_u16(val).to_ne_bytes();
        self.put(&bytes)
    }

    #[inline]
    fn write_u32_wire(&mut self, val: u32) -> Result<()> {
        let bytes = self.endian.to_wire_u32(val).to_ne_bytes();
        self.put(&bytes)
    }

    #[inline]
    fn write_u64_wire(&mut self, val: u64) -> Result<()> {
        let bytes = self.endian.to_wire_u64(val).to_ne_bytes();
        self.put(&bytes)
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Reads a boolean (0 = false, non-zero = true).
    #[inline]
    pub fn read_boolean(&mut self) -> Result<bool> {
        Ok(self.read_unsigned_byte()? != 0)
    }

    /// Reads a signed byte.
    #[inline]
    pub fn read_byte(&mut self) -> Result<i8> {
        Ok(self.read_unsigned_byte()? as i8)
    }

    /// Reads an unsigned byte.
    #[inline]
    pub fn read_unsigned_byte(&mut self) -> Result<u8> {
        let [b] = self.take_array::<1>()?;
        Ok(b)
    }

    /// Reads a signed 16-bit integer.
    #[inline]
    pub fn read_short(&mut self) -> Result<i16> {
        Ok(self.read_u16_wire()? as i16)
    }

    /// Reads an unsigned 16-bit integer.
    #[inline]
    pub fn read_unsigned_short(&mut self) -> Result<u16> {
        self.read_u16_wire()
    }

    /// Reads a signed 32-bit integer.
    #[inline]
    pub fn read_int(&mut self) -> Result<i32> {
        Ok(self.read_u32_wire()? as i32)
    }

    /// Reads an unsigned 32-bit integer.
    #[inline]
    pub fn read_unsigned_int(&mut self) -> Result<u32> {
        self.read_u32_wire()
    }

    /// Reads an IEEE 754 single-precision float.
    #[inline]
    pub fn read_float(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32_wire()?))
    }

    /// Reads an IEEE 754 double-precision float.
    #[inline]
    pub fn read_double(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64_wire()?))
    }

    /// Reads `count` raw bytes as a slice (zero-copy).
    #[inline]
    pub fn read_slice(&mut self, count: usize) -> Result<&[u8]> {
        self.check_readable(count)?;
        let start = self.pos;
        self.pos += count;
        Ok(&self.data[start..start + count])
    }

    /// Reads a string prefixed by its 16-bit byte length.
    ///
    /// A leading UTF-8 byte order mark is skipped and not counted in the result.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::EndOfBuffer`] if the prefix or the payload is
    /// incomplete; the position is left unchanged.
    pub fn read_utf(&mut self) -> Result<String> {
        let start = self.pos;
        let length = self.read_unsigned_short()? as usize;
        if let Err(e) = self.check_readable(length) {
            self.pos = start;
            return Err(e);
        }
        Ok(self.read_text(length, true))
    }

    /// Reads `length` bytes as text, skipping a leading byte order mark.
    ///
    /// ```
    /// use amfbuf::ByteArray;
    /// # use amfbuf::BufferError;
    ///
    /// let mut ba = ByteArray::from_vec(vec![0xEF, 0xBB, 0xBF, b'h', b'i']);
    /// assert_eq!(ba.read_utf_bytes(5)?, "hi");
    /// # Ok::<(), BufferError>(())
    /// ```
    pub fn read_utf_bytes(&mut self, length: usize) -> Result<String> {
        self.check_readable(length)?;
        Ok(self.read_text(length, true))
    }

    /// Reads `length` bytes of text in `charset`.
    ///
    /// Charset conversion is not implemented: the bytes are decoded as UTF-8
    /// whatever `charset` names.
    pub fn read_multi_byte(&mut self, length: usize, charset: &str) -> Result<String> {
        self.check_readable(length)?;
        if !is_utf8_charset(charset) {
            log::warn!(
                "ByteArray.readMultiByte: conversion from '{}' is not implemented, decoding as UTF-8",
                charset
            );
        }
        Ok(self.read_text(length, false))
    }

    /// Decodes `length` readable bytes at the cursor. Callers check bounds.
    fn read_text(&mut self, mut length: usize, skip_bom: bool) -> String {
        if skip_bom
            && length >= UTF8_BOM.len()
            && self.len > self.pos + UTF8_BOM.len()
            && self.data[self.pos..self.pos + UTF8_BOM.len()] == UTF8_BOM
        {
            self.pos += UTF8_BOM.len();
            length -= UTF8_BOM.len();
        }
        let text = String::from_utf8_lossy(&self.data[self.pos..self.pos + length]).into_owned();
        self.pos += length;
        text
    }

    /// Copies bytes from the cursor into `dest` starting at `dest[offset]`.
    ///
    /// A `length` of 0 copies everything from the cursor to the end. `dest`
    /// grows as needed; its position is not changed.
    ///
    /// # Errors
    ///
    /// - [`BufferError::EndOfBuffer`] if fewer than `length` bytes are readable
    /// - [`BufferError::Range`] if `offset + length` does not fit 32 bits
    pub fn read_bytes(&mut self, dest: &mut ByteArray, offset: usize, length: usize) -> Result<()> {
        let length = if length == 0 {
            self.bytes_available()
        } else {
            length
        };
        self.check_readable(length)?;
        let end = offset
            .checked_add(length)
            .filter(|end| *end <= u32::MAX as usize)
            .ok_or_else(|| BufferError::range("length+offset"))?;

        let target = dest.ensure_capacity(end, true)?;
        target[offset..end].copy_from_slice(&self.data[self.pos..self.pos + length]);
        self.pos += length;
        Ok(())
    }

    /// Returns the whole content as text, skipping a leading byte order mark.
    ///
    /// The cursor is not used or moved.
    pub fn to_text(&self) -> String {
        let content = self.as_slice();
        let start = if content.len() > UTF8_BOM.len() && content.starts_with(&UTF8_BOM) {
            UTF8_BOM.len()
        } else {
            0
        };
        String::from_utf8_lossy(&content[start..]).into_owned()
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Writes a boolean as one byte (1 or 0).
    #[inline]
    pub fn write_boolean(&mut self, val: bool) -> Result<()> {
        self.put(&[val as u8])
    }

    /// Writes the low 8 bits of `val`.
    #[inline]
    pub fn write_byte(&mut self, val: i32) -> Result<()> {
        self.put(&[val as u8])
    }

    /// Writes the low 16 bits of `val`.
    #[inline]
    pub fn write_short(&mut self, val: i32) -> Result<()> {
        self.write_u16_wire(val as u16)
    }

    /// Writes a signed 32-bit integer.
    #[inline]
    pub fn write_int(&mut self, val: i32) -> Result<()> {
        self.write_u32_wire(val as u32)
    }

    /// Writes an unsigned 32-bit integer.
    #[inline]
    pub fn write_unsigned_int(&mut self, val: u32) -> Result<()> {
        self.write_u32_wire(val)
    }

    /// Writes an IEEE 754 single-precision float.
    #[inline]
    pub fn write_float(&mut self, val: f32) -> Result<()> {
        self.write_u32_wire(val.to_bits())
    }

    /// Writes an IEEE 754 double-precision float.
    #[inline]
    pub fn write_double(&mut self, val: f64) -> Result<()> {
        self.write_u64_wire(val.to_bits())
    }

    /// Writes raw bytes at the cursor.
    #[inline]
    pub fn write_slice(&mut self, bytes: &[u8]) -> Result<()> {
        self.put(bytes)
    }

    /// Writes a string prefixed by its 16-bit byte length.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Range`] if the string is longer than
    /// [`MAX_UTF_LEN`] bytes.
    pub fn write_utf(&mut self, s: &str) -> Result<()> {
        let bytes = s.as_bytes();
        if bytes.len() > MAX_UTF_LEN {
            return Err(BufferError::range(format!(
                "string of {} bytes does not fit a 16-bit length",
                bytes.len()
            )));
        }
        self.reserve_at_cursor(2 + bytes.len())?;
        self.write_u16_wire(bytes.len() as u16)?;
        self.put(bytes)
    }

    /// Writes the UTF-8 bytes of `s` without a length prefix.
    #[inline]
    pub fn write_utf_bytes(&mut self, s: &str) -> Result<()> {
        self.put(s.as_bytes())
    }

    /// Writes `s` in `charset`.
    ///
    /// Charset conversion is not implemented: the UTF-8 bytes are written
    /// whatever `charset` names.
    pub fn write_multi_byte(&mut self, s: &str, charset: &str) -> Result<()> {
        if !is_utf8_charset(charset) {
            log::warn!(
                "ByteArray.writeMultiByte: conversion to '{}' is not implemented, writing UTF-8",
                charset
            );
        }
        self.put(s.as_bytes())
    }

    /// Copies `src[offset..offset + length]` to the cursor.
    ///
    /// A `length` of 0 copies everything from `offset` to the end of `src`.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::EndOfBuffer`] if the window is not inside `src`.
    pub fn write_bytes(&mut self, src: &ByteArray, offset: usize, length: usize) -> Result<()> {
        let src = src.as_slice();
        let window = source_window(src.len(), offset, length)?;
        self.put(&src[window])
    }
}

/// Resolves the source window of a bulk write.
pub(crate) fn source_window(
    src_len: usize,
    offset: usize,
    length: usize,
) -> Result<std::ops::Range<usize>> {
    if offset > src_len {
        return Err(BufferError::EndOfBuffer);
    }
    let length = if length == 0 { src_len - offset } else { length };
    match offset.checked_add(length) {
        Some(end) if end <= src_len => Ok(offset..end),
        _ => Err(BufferError::EndOfBuffer),
    }
}

fn is_utf8_charset(charset: &str) -> bool {
    charset.eq_ignore_ascii_case("utf-8") || charset.eq_ignore_ascii_case("utf8")
}
