// demos/basic_usage.rs
//! Basic usage example of the byte array

use amfbuf::amf::XmlText;
use amfbuf::prelude::*;

fn main() -> Result<()> {
    println!("=== Basic ByteArray Usage ===\n");

    // 1. Write primitives in the default (big-endian) order
    let mut ba = ByteArray::new();

    ba.write_unsigned_int(12345)?;
    ba.write_utf("Hello, World!")?;
    ba.write_byte(0xFF)?;

    println!("Length: {}", ba.len());
    println!("Position: {}", ba.position());

    // Read the data back
    ba.set_position(0);
    let num = ba.read_unsigned_int()?;
    let text = ba.read_utf()?;
    let byte = ba.read_unsigned_byte()?;

    println!("Read u32: {}", num);
    println!("Read utf: {:?}", text);
    println!("Read byte: 0x{:02X}", byte);

    println!("\n=== Byte Order ===\n");

    let mut le = ByteArray::with_config(ByteArrayConfig::little_endian());
    le.write_short(0x0102)?;
    println!("{} short 0x0102: {:02X?}", le.endian(), le.as_slice());

    println!("\n=== AMF3 Serialization ===\n");

    let mut out = ByteArray::new();
    let written = out.write_object("repeated")?;
    println!("String value: {} bytes", written);

    let nested = ByteArray::from_vec(vec![1, 2, 3]);
    out.write_object(&nested)?;
    out.write_object(&XmlText::new("<greeting/>"))?;
    out.write_object(&-42)?;
    out.write_object(&3.5f64)?;
    println!("Serialized stream: {:02X?}", out.as_slice());

    println!("\n=== Compression ===\n");

    let mut data = ByteArray::from_vec(b"abcabcabc".repeat(100));
    let original = data.len();
    data.compress()?;
    println!("Compressed {} bytes to {}", original, data.len());
    data.uncompress()?;
    println!("Uncompressed back to {} bytes", data.len());

    println!("\n=== Shared Array ===\n");

    let shared = ByteArray::from_vec(vec![0; 4]).into_shared();
    crossbeam::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|_| {
                for _ in 0..100 {
                    loop {
                        let seen = shared.len();
                        if shared.compare_and_swap_length(seen, seen + 1) == Ok(seen) {
                            break;
                        }
                    }
                }
            });
        }
    })
    .map_err(|_| BufferError::Internal("worker thread panicked".into()))?;
    println!("Length after concurrent growth: {}", shared.len());

    Ok(())
}
