// src/shared.rs
//! Byte arrays shared between threads.
//!
//! A [`ByteArray`] is exclusively owned and needs no locking. To share one,
//! convert it with [`ByteArray::into_shared`]: every operation on the
//! resulting [`SharedByteArray`] runs under its mutex, so concurrent calls
//! are linearized and the lock is released on every exit path, errors
//! included. Operations that touch two shared arrays take both locks in
//! identity order.

use crate::amf::serialize::{is_legacy_noop, serialize_detached};
use crate::amf::{AmfSerialize, ObjectEncoding, ObjectId};
use crate::buffer::{ByteArray, Endian};
use crate::error::Result;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// A cloneable, thread-safe handle to a [`ByteArray`].
///
/// Clones refer to the same array.
///
/// ```
/// use amfbuf::ByteArray;
/// # use amfbuf::BufferError;
///
/// let shared = ByteArray::new().into_shared();
/// let other = shared.clone();
/// std::thread::spawn(move || other.write_int(7)).join().unwrap()?;
/// shared.set_position(0);
/// assert_eq!(shared.read_int()?, 7);
/// # Ok::<(), BufferError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SharedByteArray {
    inner: Arc<Mutex<ByteArray>>,
    id: ObjectId,
}

/// Generates methods that forward to [`ByteArray`] under the lock.
macro_rules! locked {
    ($(fn $name:ident(&self $(, $arg:ident: $ty:ty)*) -> $ret:ty;)*) => {
        $(
            #[doc = concat!("Runs [`ByteArray::", stringify!($name), "`] under the lock.")]
            #[inline]
            pub fn $name(&self $(, $arg: $ty)*) -> $ret {
                self.inner.lock().$name($($arg),*)
            }
        )*
    };
}

impl SharedByteArray {
    /// Creates an empty shared array with the default configuration.
    pub fn new() -> Self {
        ByteArray::new().into_shared()
    }

    /// Identity of the underlying array, shared by all clones.
    #[inline]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Returns `true` if both handles refer to the same array.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Locks the array for a sequence of operations.
    ///
    /// Calling another method of this handle (or a clone) while the guard is
    /// alive deadlocks, and so does serializing the handle into the guarded
    /// array.
    pub fn lock(&self) -> MutexGuard<'_, ByteArray> {
        self.inner.lock()
    }

    /// Locks the array if no other thread holds it.
    pub fn try_lock(&self) -> Option<MutexGuard<'_, ByteArray>> {
        self.inner.try_lock()
    }

    /// Returns the array if this is the last handle.
    ///
    /// # Errors
    ///
    /// Gives the handle back if other clones are alive.
    pub fn try_unwrap(self) -> std::result::Result<ByteArray, Self> {
        let id = self.id;
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner, id })
    }

    locked! {
        fn len(&self) -> usize;
        fn is_empty(&self) -> bool;
        fn capacity(&self) -> usize;
        fn position(&self) -> usize;
        fn set_position(&self, pos: usize) -> ();
        fn bytes_available(&self) -> usize;
        fn endian(&self) -> Endian;
        fn set_endian(&self, endian: Endian) -> ();
        fn object_encoding(&self) -> ObjectEncoding;
        fn set_object_encoding(&self, encoding: ObjectEncoding) -> ();
        fn set_length(&self, len: usize) -> Result<()>;
        fn clear(&self) -> ();
        fn to_vec(&self) -> Vec<u8>;
        fn to_text(&self) -> String;

        fn read_boolean(&self) -> Result<bool>;
        fn read_byte(&self) -> Result<i8>;
        fn read_unsigned_byte(&self) -> Result<u8>;
        fn read_short(&self) -> Result<i16>;
        fn read_unsigned_short(&self) -> Result<u16>;
        fn read_int(&self) -> Result<i32>;
        fn read_unsigned_int(&self) -> Result<u32>;
        fn read_float(&self) -> Result<f32>;
        fn read_double(&self) -> Result<f64>;
        fn read_utf(&self) -> Result<String>;
        fn read_utf_bytes(&self, length: usize) -> Result<String>;
        fn read_multi_byte(&self, length: usize, charset: &str) -> Result<String>;
        fn read_u29(&self) -> Result<u32>;
        fn read_i29(&self) -> Result<i32>;

        fn write_boolean(&self, val: bool) -> Result<()>;
        fn write_byte(&self, val: i32) -> Result<()>;
        fn write_short(&self, val: i32) -> Result<()>;
        fn write_int(&self, val: i32) -> Result<()>;
        fn write_unsigned_int(&self, val: u32) -> Result<()>;
        fn write_float(&self, val: f32) -> Result<()>;
        fn write_double(&self, val: f64) -> Result<()>;
        fn write_slice(&self, bytes: &[u8]) -> Result<()>;
        fn write_utf(&self, s: &str) -> Result<()>;
        fn write_utf_bytes(&self, s: &str) -> Result<()>;
        fn write_multi_byte(&self, s: &str, charset: &str) -> Result<()>;
        fn write_u29(&self, value: u32) -> Result<()>;

        fn compress(&self) -> Result<()>;
        fn uncompress(&self) -> Result<()>;
        fn deflate(&self) -> Result<()>;
        fn inflate(&self) -> Result<()>;

        fn get(&self, index: usize) -> Option<u8>;
        fn has_index(&self, index: usize) -> bool;
        fn set(&self, index: usize, value: u32) -> Result<()>;

        fn push(&self, values: &[i32]) -> Result<usize>;
        fn unshift(&self, values: &[i32]) -> Result<usize>;
        fn shift(&self) -> Option<u8>;
        fn pop(&self) -> Option<u8>;
        fn append(&self, bytes: &[u8]) -> Result<()>;
        fn remove_front_bytes(&self, count: usize) -> ();

        fn compare_and_swap_int_at(&self, index: i32, expected: i32, new: i32) -> Result<i32>;
        fn compare_and_swap_length(&self, expected: usize, new: usize) -> Result<usize>;
    }

    /// Serializes `value` and writes it at the cursor.
    ///
    /// `value` is serialized before this array is locked, so no other lock
    /// is ever held together with this one. `value` may be this array itself.
    /// If serialization fails the array is not modified.
    pub fn write_object<T: AmfSerialize + ?Sized>(&self, value: &T) -> Result<usize> {
        let (endian, encoding) = {
            let inner = self.lock();
            (inner.endian(), inner.object_encoding())
        };
        if is_legacy_noop(encoding) {
            return Ok(0);
        }
        let encoded = serialize_detached(value, endian)?;
        self.lock().put(encoded.as_slice())?;
        Ok(encoded.len())
    }

    /// Runs [`ByteArray::read_bytes`] with both arrays locked.
    ///
    /// `dest` may be a handle to this array.
    pub fn read_bytes(&self, dest: &SharedByteArray, offset: usize, length: usize) -> Result<()> {
        if self.ptr_eq(dest) {
            let mut guard = self.lock();
            let mut source = guard.clone();
            source.read_bytes(&mut guard, offset, length)?;
            guard.set_position(source.position());
            return Ok(());
        }
        let (mut source, mut target) = lock_pair(self, dest);
        source.read_bytes(&mut target, offset, length)
    }

    /// Runs [`ByteArray::write_bytes`] with both arrays locked.
    ///
    /// `src` may be a handle to this array.
    pub fn write_bytes(&self, src: &SharedByteArray, offset: usize, length: usize) -> Result<()> {
        if self.ptr_eq(src) {
            let mut guard = self.lock();
            let source = guard.clone();
            return guard.write_bytes(&source, offset, length);
        }
        let (mut target, source) = lock_pair(self, src);
        target.write_bytes(&source, offset, length)
    }
}

/// Locks two distinct arrays, lower identity first.
fn lock_pair<'a>(
    a: &'a SharedByteArray,
    b: &'a SharedByteArray,
) -> (MutexGuard<'a, ByteArray>, MutexGuard<'a, ByteArray>) {
    if a.id < b.id {
        let first = a.lock();
        (first, b.lock())
    } else {
        let second = b.lock();
        (a.lock(), second)
    }
}

impl Default for SharedByteArray {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ByteArray> for SharedByteArray {
    fn from(ba: ByteArray) -> Self {
        ba.into_shared()
    }
}

impl ByteArray {
    /// Moves the array behind a lock so it can be used from several threads.
    ///
    /// The array is marked shareable.
    pub fn into_shared(mut self) -> SharedByteArray {
        self.shareable = true;
        SharedByteArray {
            id: self.id,
            inner: Arc::new(Mutex::new(self)),
        }
    }
}
