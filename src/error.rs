// src/error.rs
//! Error types for byte array operations with conversion support

use std::fmt;

/// Errors that can occur during byte array operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read beyond the logical length
    EndOfBuffer,
    /// A parameter is outside the limits of the operation or wire format
    Range(String),
    /// Requested size exceeds [`BA_MAX_SIZE`](crate::buffer::BA_MAX_SIZE)
    ResourceExhausted(usize),
    /// Malformed input (compressed stream, enum value, ...)
    InvalidData(String),
    /// Internal consistency fault; the operation cannot be retried meaningfully
    Internal(String),
}

impl BufferError {
    /// Returns `true` for faults the caller cannot recover from.
    ///
    /// ```
    /// use amfbuf::BufferError;
    ///
    /// assert!(BufferError::Internal("codec".into()).is_fatal());
    /// assert!(!BufferError::EndOfBuffer.is_fatal());
    /// ```
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Internal(_))
    }

    pub(crate) fn range(msg: impl Into<String>) -> Self {
        Self::Range(msg.into())
    }
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndOfBuffer => write!(f, "End of buffer was encountered"),
            Self::Range(msg) => write!(f, "Parameter out of range: {}", msg),
            Self::ResourceExhausted(size) => {
                write!(f, "Requested size {} exceeds the byte array limit", size)
            }
            Self::InvalidData(msg) => write!(f, "Invalid data: {}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for BufferError {}

// ============================================================================
// ERROR CONVERSION
// ============================================================================

/// Convert BufferError to std::io::Error
impl From<BufferError> for std::io::Error {
    fn from(err: BufferError) -> Self {
        use std::io::ErrorKind;
        match err {
            BufferError::EndOfBuffer => std::io::Error::new(ErrorKind::UnexpectedEof, err),
            BufferError::InvalidData(_) => std::io::Error::new(ErrorKind::InvalidData, err),
            BufferError::ResourceExhausted(_) => std::io::Error::new(ErrorKind::OutOfMemory, err),
            _ => std::io::Error::other(err),
        }
    }
}

/// Convert BufferError to anyhow::Error
#[cfg(feature = "anyhow")]
impl From<BufferError> for anyhow::Error {
    fn from(err: BufferError) -> Self {
        anyhow::anyhow!("{}", err)
    }
}

/// Allow using ? with anyhow::Error
#[cfg(feature = "anyhow")]
impl From<anyhow::Error> for BufferError {
    fn from(err: anyhow::Error) -> Self {
        BufferError::Internal(err.to_string())
    }
}

// ============================================================================
// RESULT TYPE ALIASES
// ============================================================================

/// Result type alias for byte array operations
pub type Result<T> = std::result::Result<T, BufferError>;

/// Extension trait for converting Results between different error types
pub trait ResultExt<T> {
    /// Convert to anyhow::Result
    #[cfg(feature = "anyhow")]
    fn into_anyhow(self) -> anyhow::Result<T>;

    /// Convert to io::Result
    fn into_io(self) -> std::io::Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    #[cfg(feature = "anyhow")]
    fn into_anyhow(self) -> anyhow::Result<T> {
        self.map_err(|e| e.into())
    }

    fn into_io(self) -> std::io::Result<T> {
        self.map_err(|e| e.into())
    }
}

// ============================================================================
// HELPER MACROS FOR ERROR HANDLING
// ============================================================================

/// Converts the error of a byte array operation into another error type.
///
/// The one-argument form targets `std::io::Error`; pass the target type
/// explicitly for error types with overlapping `From` impls such as `anyhow::Error`.
///
/// # Example
/// ```
/// use amfbuf::prelude::*;
/// use amfbuf::buffer_op;
///
/// fn handler() -> std::io::Result<u32> {
///     let mut ba = ByteArray::new();
///     ba.write_unsigned_int(42).map_err(std::io::Error::from)?;
///     ba.set_position(0);
///     buffer_op!(ba.read_unsigned_int())
/// }
/// assert_eq!(handler().unwrap(), 42);
/// ```
#[macro_export]
macro_rules! buffer_op {
    ($expr:expr, $target:ty) => {
        $expr.map_err(|e: $crate::BufferError| -> $target { e.into() })
    };
    ($expr:expr) => {
        $expr.map_err(|e: $crate::BufferError| -> std::io::Error { e.into() })
    };
}

/// Try a byte array operation with automatic error conversion
#[macro_export]
macro_rules! buffer_try {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(e) => return Err(e.into()),
        }
    };
}
