// tests/integration_tests.rs
//! Integration tests for the byte array

use amfbuf::amf::{SerializationSession, XmlText, marker};
use amfbuf::prelude::*;
use amfbuf::{BA_CHUNK_SIZE, BA_MAX_SIZE};
use std::time::Duration;

#[test]
fn test_bom_stripped_from_utf_bytes() {
    let mut ba = ByteArray::new();
    ba.write_slice(&[0xEF, 0xBB, 0xBF, b'h', b'i']).unwrap();

    ba.set_position(0);
    assert_eq!(ba.read_utf_bytes(5).unwrap(), "hi");
    assert_eq!(ba.bytes_available(), 0);
}

#[test]
fn test_message_framing() {
    // Simulate a framed message: id | flags | name | payload length | payload
    let mut frame = ByteArray::new();
    let payload = b"binary payload";

    frame.write_unsigned_int(0xCAFE_0001).unwrap();
    frame.write_byte(0b101).unwrap();
    frame.write_utf("login").unwrap();
    frame.write_short(payload.len() as i32).unwrap();
    frame.write_slice(payload).unwrap();

    frame.set_position(0);
    assert_eq!(frame.read_unsigned_int().unwrap(), 0xCAFE_0001);
    assert_eq!(frame.read_unsigned_byte().unwrap(), 0b101);
    assert_eq!(frame.read_utf().unwrap(), "login");
    let len = frame.read_unsigned_short().unwrap() as usize;
    assert_eq!(frame.read_slice(len).unwrap(), payload);
    assert_eq!(frame.bytes_available(), 0);
}

#[test]
fn test_growth_policy() {
    let mut ba = ByteArray::new();
    ba.write_slice(&[7; 4000]).unwrap();
    assert_eq!(ba.capacity(), 4000);

    ba.write_byte(1).unwrap();
    assert_eq!(ba.capacity(), 4000 + BA_CHUNK_SIZE);
    assert_eq!(ba.len(), 4001);
    assert_eq!(ba.get(3999), Some(7));
}

#[test]
fn test_length_ceiling() {
    let mut ba = ByteArray::new();
    assert_eq!(
        ba.set_length(BA_MAX_SIZE + 1),
        Err(BufferError::ResourceExhausted(BA_MAX_SIZE + 1))
    );
    ba.set_position(BA_MAX_SIZE);
    assert!(matches!(
        ba.write_byte(0),
        Err(BufferError::ResourceExhausted(_))
    ));
    assert!(ba.is_empty());
}

#[test]
fn test_string_reference_is_smaller() {
    let mut ba = ByteArray::new();
    let mut session = SerializationSession::new();

    ba.write_string_ref(&mut session, "repeated").unwrap();
    let inline = ba.len();
    ba.write_string_ref(&mut session, "repeated").unwrap();
    let reference = ba.len() - inline;

    assert_eq!(inline, 9);
    assert!(reference < inline);
}

#[test]
fn test_empty_string_always_inline() {
    let mut ba = ByteArray::new();
    let mut session = SerializationSession::new();
    ba.write_string_ref(&mut session, "").unwrap();
    ba.write_string_ref(&mut session, "").unwrap();
    assert_eq!(ba.as_slice(), &[0x01, 0x01]);
}

/// A host-side record serialized as a sequence of fields.
struct Record<'a> {
    name: &'a str,
    tags: [&'a str; 2],
    blob: &'a ByteArray,
    xml: &'a XmlText,
}

impl AmfSerialize for Record<'_> {
    fn serialize_amf(&self, out: &mut ByteArray, session: &mut SerializationSession) -> Result<()> {
        self.name.serialize_amf(out, session)?;
        for tag in self.tags {
            tag.serialize_amf(out, session)?;
        }
        self.blob.serialize_amf(out, session)?;
        self.blob.serialize_amf(out, session)?;
        self.xml.serialize_amf(out, session)
    }
}

#[test]
fn test_record_uses_reference_tables() {
    let blob = ByteArray::from_vec(vec![0xAA, 0xBB]);
    let xml = XmlText::new("<x/>");
    let record = Record {
        name: "id",
        tags: ["id", "tag"],
        blob: &blob,
        xml: &xml,
    };

    let mut ba = ByteArray::new();
    let written = ba.write_object(&record).unwrap();
    #[rustfmt::skip]
    let expected: &[u8] = &[
        marker::STRING_MARKER, 0x05, b'i', b'd',
        marker::STRING_MARKER, 0x00,
        marker::STRING_MARKER, 0x07, b't', b'a', b'g',
        marker::BYTE_ARRAY_MARKER, 0x05, 0xAA, 0xBB,
        marker::BYTE_ARRAY_MARKER, 0x00,
        marker::XML_MARKER, 0x09, b'<', b'x', b'/', b'>',
    ];
    assert_eq!(ba.as_slice(), expected);
    assert_eq!(written, expected.len());
}

#[test]
fn test_compress_round_trip_mixed_content() {
    let mut ba = ByteArray::new();
    for i in 0..500 {
        ba.write_int(i).unwrap();
        ba.write_utf("payload").unwrap();
    }
    let original = ba.to_vec();

    ba.compress().unwrap();
    assert_ne!(ba.to_vec(), original);
    ba.uncompress().unwrap();

    assert_eq!(ba.to_vec(), original);
    assert_eq!(ba.read_int().unwrap(), 0);
    assert_eq!(ba.read_utf().unwrap(), "payload");
}

#[test]
fn test_uncompress_rejects_plain_data() {
    let mut ba = ByteArray::new();
    ba.write_utf("not compressed").unwrap();
    assert!(matches!(ba.uncompress(), Err(BufferError::InvalidData(_))));
}

#[test]
fn test_array_operations_compose() {
    let mut ba = ByteArray::from_vec(vec![3, 4]);
    ba.unshift(&[1, 2]).unwrap();
    ba.push(&[5, 0x106]).unwrap();
    assert_eq!(ba.as_slice(), &[1, 2, 3, 4, 5, 6]);

    assert_eq!(ba.shift(), Some(1));
    assert_eq!(ba.pop(), Some(3));
    ba.remove_front_bytes(2);
    assert_eq!(ba.as_slice(), &[5, 6]);
    ba.append(&[7]).unwrap();
    assert!(ba.has_index(2));
    assert!(!ba.has_index(3));
}

#[test]
fn test_endian_switch_mid_stream() {
    let mut ba = ByteArray::new();
    ba.write_unsigned_int(0x0102_0304).unwrap();
    ba.set_endian("littleEndian".parse().unwrap());
    ba.write_unsigned_int(0x0102_0304).unwrap();
    assert_eq!(ba.as_slice(), &[1, 2, 3, 4, 4, 3, 2, 1]);

    ba.set_position(0);
    assert_eq!(ba.read_unsigned_int().unwrap(), 0x0403_0201);
    assert_eq!(ba.endian().to_string(), "littleEndian");
}

#[test]
fn test_shared_length_cas_under_contention() {
    let shared = SharedByteArray::new();

    crossbeam::thread::scope(|s| {
        for _ in 0..8 {
            let ba = shared.clone();
            s.spawn(move |_| {
                for _ in 0..100 {
                    loop {
                        let seen = ba.len();
                        if ba.compare_and_swap_length(seen, seen + 1).unwrap() == seen {
                            break;
                        }
                    }
                }
            });
        }
    })
    .unwrap();

    assert_eq!(shared.len(), 800);
}

#[test]
fn test_shared_writers_are_linearized() {
    let shared = SharedByteArray::new();

    crossbeam::thread::scope(|s| {
        for t in 0..4u8 {
            let ba = shared.clone();
            s.spawn(move |_| {
                for _ in 0..200 {
                    ba.push(&[t as i32]).unwrap();
                }
            });
        }
    })
    .unwrap();

    let ba = shared.try_unwrap().unwrap();
    assert_eq!(ba.len(), 800);
    for t in 0..4u8 {
        assert_eq!(ba.as_slice().iter().filter(|b| **b == t).count(), 200);
    }
}

#[test]
fn test_shared_copy_both_directions() {
    let a = ByteArray::from_vec(b"left".to_vec()).into_shared();
    let b = ByteArray::from_vec(b"right".to_vec()).into_shared();

    crossbeam::thread::scope(|s| {
        let (a1, b1) = (a.clone(), b.clone());
        s.spawn(move |_| {
            for _ in 0..100 {
                a1.set_position(0);
                a1.read_bytes(&b1, 5, 4).unwrap();
            }
        });
        let (a2, b2) = (a.clone(), b.clone());
        s.spawn(move |_| {
            for _ in 0..100 {
                b2.set_position(0);
                b2.read_bytes(&a2, 4, 5).unwrap();
            }
        });
    })
    .unwrap();

    assert_eq!(a.len(), 9);
    assert_eq!(b.len(), 9);
}

#[test]
fn test_cross_serialization_between_shared_arrays() {
    let x = ByteArray::from_vec(vec![1; 8]).into_shared();
    let y = ByteArray::from_vec(vec![2; 8]).into_shared();
    let (done_tx, done_rx) = crossbeam::channel::unbounded();

    for (into, from) in [(x.clone(), y.clone()), (y.clone(), x.clone())] {
        let done = done_tx.clone();
        std::thread::spawn(move || {
            for _ in 0..200 {
                into.clear();
                into.write_object(&from).unwrap();
            }
            done.send(()).unwrap();
        });
    }

    for _ in 0..2 {
        done_rx
            .recv_timeout(Duration::from_secs(20))
            .expect("opposite-direction serialization did not finish");
    }
    assert_eq!(x.get(0), Some(marker::BYTE_ARRAY_MARKER));
    assert_eq!(y.get(0), Some(marker::BYTE_ARRAY_MARKER));
}

#[test]
fn test_failed_shared_serialization_keeps_content() {
    struct Oversized;

    impl AmfSerialize for Oversized {
        fn serialize_amf(&self, out: &mut ByteArray, _: &mut SerializationSession) -> Result<()> {
            out.write_byte(marker::STRING_MARKER as i32)?;
            out.write_u29(0x2000_0000)
        }
    }

    let shared = ByteArray::from_vec(b"abcdef".to_vec()).into_shared();
    shared.set_position(2);
    assert!(matches!(
        shared.write_object(&Oversized),
        Err(BufferError::Range(_))
    ));
    assert_eq!(shared.to_vec(), b"abcdef");
    assert_eq!(shared.position(), 2);
}

#[test]
fn test_io_error_conversion() {
    let mut ba = ByteArray::new();
    let err = ba.read_double().into_io().unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
}
