//! Basic usage example for packwire
//!
//! Run with: cargo run --example basic_usage

use packwire::*;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
struct Quote {
    bid: i64,
    ask: i64,
    level: u8,
}

flat_record!(Quote { bid: i64, ask: i64, level: u8 });

#[derive(Debug, Clone, PartialEq)]
struct Snapshot {
    symbol: String,
    quotes: Vec<Quote>,
    tags: BTreeMap<u16, String>,
}

record!(Snapshot {
    symbol: String,
    quotes: Vec<Quote>,
    tags: BTreeMap<u16, String>,
});

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect::<Vec<_>>().join(" ")
}

fn main() -> Result<()> {
    println!("Packwire Basic Usage Example");
    println!("============================");

    // Example 1: scalars on a cursor
    println!("\n1. Cursor with fixed-width scalars:");
    {
        let mut cursor = Cursor::new();
        cursor.put(&12345u32).put(&-7i16).put(&true).put(&2.5f64);
        println!("  Encoded {} bytes: {}", cursor.len(), hex(cursor.as_slice()));

        let seq: u32 = cursor.get()?;
        let delta: i16 = cursor.get()?;
        let live: bool = cursor.get()?;
        let ratio: f64 = cursor.get()?;
        println!("  Decoded: seq={}, delta={}, live={}, ratio={}", seq, delta, live, ratio);
    }

    // Example 2: compaction
    println!("\n2. Compacted integers:");
    {
        let ops = Options::default() | Options::COMPACTED;
        for value in [0u64, 15, 16, 4_294_967_296, u64::MAX] {
            let bytes = to_vec(&value, ops)?;
            println!("  {:>20} -> {} bytes: {}", value, bytes.len(), hex(&bytes));
        }
    }

    // Example 3: records nested in containers
    println!("\n3. Records and containers:");
    let snapshot = Snapshot {
        symbol: String::from("BTC/USD"),
        quotes: (1..=3)
            .map(|level| Quote {
                bid: 100_000_000 - i64::from(level) * 10_000,
                ask: 100_000_000 + i64::from(level) * 10_000,
                level,
            })
            .collect(),
        tags: [(1, String::from("spot")), (7, String::from("l2"))].into_iter().collect(),
    };
    {
        for (name, ops) in [
            ("fixed", Options::default()),
            ("compacted", Options::default() | Options::COMPACTED),
        ] {
            let bytes = to_vec(&snapshot, ops)?;
            let decoded: Snapshot = from_bytes(&bytes, ops)?;
            println!("  {:<10} {} bytes, roundtrip ok: {}", name, bytes.len(), decoded == snapshot);
        }
    }

    // Example 4: framed output with checksum
    println!("\n4. Framed session:");
    {
        let ops = Options::BINARY | Options::COMPACTED;
        let mut encoder = Encoder::new(ops)?;
        encoder.put(&snapshot).put("end of batch");
        let frame = encoder.finish()?;

        let header = FrameHeader::decode(&frame)?;
        println!(
            "  Frame: {} bytes, magic={:#06x}, ver={}, flags={:#04x}, body={}",
            frame.len(),
            header.magic,
            header.ver,
            header.flags,
            header.len
        );

        let mut decoder = Decoder::open(&frame, ops)?;
        let first: Snapshot = decoder.get()?;
        let trailer: String = decoder.get()?;
        decoder.finish()?;
        println!("  Decoded {} quotes, trailer={:?}", first.quotes.len(), trailer);

        let mut corrupt = frame.clone();
        let last = corrupt.len() - 1;
        corrupt[last] ^= 0xFF;
        println!("  Corrupted frame: {:?}", Decoder::open(&corrupt, ops).err());
    }

    // Example 5: poisoning
    println!("\n5. Failure handling:");
    {
        let mut cursor = Cursor::from_slice(&[1, 2, 3], Options::default());
        let mut wide = 0u64;
        let mut small = 0u8;
        cursor.get_into(&mut wide).get_into(&mut small);
        println!(
            "  poisoned={}, position={:#x}, cause={:?}",
            cursor.is_poisoned(),
            cursor.position(),
            cursor.check().err()
        );
    }

    println!("\nAll examples completed successfully!");
    Ok(())
}
