// tests/default_encoding.rs
//! The process-wide default object encoding lives in its own test binary so
//! no other test observes the temporary change.

use amfbuf::prelude::*;
use amfbuf::{default_object_encoding, set_default_object_encoding};

#[test]
fn test_default_encoding_is_read_at_construction() {
    assert_eq!(default_object_encoding(), ObjectEncoding::Amf3);
    let mut before = ByteArray::new();

    set_default_object_encoding(ObjectEncoding::Amf0);
    let mut after = ByteArray::new();
    set_default_object_encoding(ObjectEncoding::Amf3);

    assert_eq!(before.object_encoding(), ObjectEncoding::Amf3);
    assert_eq!(after.object_encoding(), ObjectEncoding::Amf0);

    // Legacy encoding is a documented no-op.
    assert_eq!(after.write_object(&"skipped").unwrap(), 0);
    assert!(after.is_empty());
    assert_eq!(before.write_object(&"kept").unwrap(), 6);
}
