// src/buffer/compress.rs
//! Whole-array zlib compression.
//!
//! Both directions read the logical content and replace the storage with the
//! result. On failure the array is left exactly as it was.

use super::core::{BA_MAX_SIZE, ByteArray};
use crate::error::{BufferError, Result};
use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

/// Worst-case zlib output size for `len` input bytes (zlib's `compressBound`).
pub(crate) fn compress_bound(len: usize) -> usize {
    len + (len >> 12) + (len >> 14) + (len >> 25) + 13
}

/// Deflates `input` into a zlib stream of at most `max_len` bytes.
pub(crate) fn deflate_bounded(input: &[u8], max_len: usize) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(compress_bound(input.len()));
    let mut codec = Compress::new(Compression::default(), true);
    let status = codec
        .compress_vec(input, &mut out, FlushCompress::Finish)
        .map_err(|e| BufferError::Internal(format!("zlib compress failed: {}", e)))?;
    if status != Status::StreamEnd {
        return Err(BufferError::Internal(format!(
            "zlib compress did not finish ({:?})",
            status
        )));
    }
    if out.len() > max_len {
        return Err(BufferError::ResourceExhausted(out.len()));
    }
    Ok(out)
}

/// Inflates a complete zlib stream, failing once it exceeds `max_len` bytes.
///
/// The output starts at three times the input size and grows by the input
/// size whenever it fills up.
pub(crate) fn inflate_bounded(input: &[u8], max_len: usize) -> Result<Vec<u8>> {
    // One byte of headroom tells "exactly max_len" from "more than max_len".
    let limit = max_len.saturating_add(1);
    let step = input.len();
    let mut out = vec![0u8; step.saturating_mul(3).min(limit)];
    let mut codec = Decompress::new(true);
    loop {
        let consumed = codec.total_in() as usize;
        let produced = codec.total_out() as usize;
        let status = codec
            .decompress(&input[consumed..], &mut out[produced..], FlushDecompress::None)
            .map_err(|e| BufferError::InvalidData(format!("not valid compressed data: {}", e)))?;

        let produced_now = codec.total_out() as usize;
        if produced_now > max_len {
            return Err(BufferError::ResourceExhausted(produced_now));
        }
        if status == Status::StreamEnd {
            break;
        }
        if produced_now == out.len() {
            let grown = out.len().saturating_add(step).min(limit);
            out.resize(grown, 0);
        } else if produced_now == produced && codec.total_in() as usize == consumed {
            return Err(BufferError::InvalidData(
                "not valid compressed data: truncated stream".into(),
            ));
        }
    }

    out.truncate(codec.total_out() as usize);
    Ok(out)
}

impl ByteArray {
    /// Compresses the content in zlib format.
    ///
    /// The compressed bytes become the new content and the position moves to
    /// the end. Does nothing on an empty array.
    ///
    /// # Errors
    ///
    /// - [`BufferError::ResourceExhausted`] if the compressed stream would
    ///   exceed [`BA_MAX_SIZE`]; the array is not modified
    /// - [`BufferError::Internal`] if the codec fails
    pub fn compress(&mut self) -> Result<()> {
        if self.len == 0 {
            return Ok(());
        }

        let out = deflate_bounded(self.as_slice(), BA_MAX_SIZE)?;
        log::debug!("compressed {} bytes into {}", self.len, out.len());
        let new_len = out.len();
        self.acquire(out)?;
        self.pos = new_len;
        Ok(())
    }

    /// Inflates zlib-format content in place and rewinds the position.
    ///
    /// Does nothing on an empty array.
    ///
    /// # Errors
    ///
    /// - [`BufferError::InvalidData`] if the content is not a complete zlib
    ///   stream
    /// - [`BufferError::ResourceExhausted`] if the inflated content would
    ///   exceed [`BA_MAX_SIZE`]
    ///
    /// The array is not modified on error.
    pub fn uncompress(&mut self) -> Result<()> {
        if self.len == 0 {
            return Ok(());
        }

        let out = inflate_bounded(self.as_slice(), BA_MAX_SIZE)?;
        log::debug!("uncompressed {} bytes into {}", self.len, out.len());
        self.acquire(out)
    }

    /// Alias of [`compress`](Self::compress).
    #[inline]
    pub fn deflate(&mut self) -> Result<()> {
        self.compress()
    }

    /// Alias of [`uncompress`](Self::uncompress).
    #[inline]
    pub fn inflate(&mut self) -> Result<()> {
        self.uncompress()
    }
}
