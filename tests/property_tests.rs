//! Property-based round-trip tests

use packwire::compact;
use packwire::*;
use proptest::prelude::*;
use std::collections::BTreeMap;

fn any_options() -> impl Strategy<Value = Options> {
    (any::<bool>(), any::<bool>()).prop_map(|(compacted, framed)| {
        let mut ops = Options::BINARY;
        if compacted {
            ops = ops | Options::COMPACTED;
        }
        if !framed {
            ops = ops | Options::NO_HEADER;
        }
        ops
    })
}

proptest! {
    #[test]
    fn prop_compact_u64_roundtrip(value in any::<u64>()) {
        let (buf, len) = compact::encode_u64(value);
        prop_assert!((1..=compact::MAX_COMPACT_U64_SIZE).contains(&len));
        prop_assert_eq!(compact::decode_u64(&buf[..len]), Ok((value, len)));
    }

    #[test]
    fn prop_compact_u32_roundtrip(value in any::<u32>()) {
        let (buf, len) = compact::encode_u32(value);
        prop_assert!((1..=compact::MAX_COMPACT_U32_SIZE).contains(&len));
        prop_assert_eq!(compact::decode_u32(&buf[..len]), Ok((value, len)));
    }

    #[test]
    fn prop_scalars_roundtrip(
        ops in any_options(),
        a in any::<i32>(),
        b in any::<u64>(),
        c in any::<i64>(),
        d in any::<f64>(),
        e in any::<u16>(),
        f in any::<bool>(),
        g in any::<char>()
    ) {
        let value = (a, b, c, d.to_bits(), e, f, g);
        let bytes = to_vec(&value, ops).unwrap();
        prop_assert_eq!(from_bytes::<(i32, u64, i64, u64, u16, bool, char)>(&bytes, ops), Ok(value));
    }

    #[test]
    fn prop_containers_roundtrip(
        ops in any_options(),
        words in prop::collection::vec("[a-z]{1,12}", 0..16),
        map in prop::collection::btree_map(any::<u32>(), any::<i16>(), 0..32),
        nums in prop::collection::vec(any::<u64>(), 0..64)
    ) {
        let value = (words, map, nums);
        let bytes = to_vec(&value, ops).unwrap();
        let decoded = from_bytes::<(Vec<String>, BTreeMap<u32, i16>, Vec<u64>)>(&bytes, ops);
        prop_assert_eq!(decoded, Ok(value));
    }

    #[test]
    fn prop_fast_path_matches_elements(nums in prop::collection::vec(any::<i32>(), 0..64)) {
        let mut block = Cursor::new();
        block.put(&nums);

        let mut manual = Cursor::new();
        manual.put(&(nums.len() as u64));
        for n in &nums {
            manual.put(n);
        }
        prop_assert_eq!(block.as_slice(), manual.as_slice());
    }

    #[test]
    fn prop_truncation_never_panics(
        ops in any_options(),
        nums in prop::collection::vec(any::<u64>(), 1..16),
        cut in any::<prop::sample::Index>()
    ) {
        let bytes = to_vec(&nums, ops).unwrap();
        let cut = cut.index(bytes.len());
        prop_assert!(from_bytes::<Vec<u64>>(&bytes[..cut], ops).is_err());
    }

    #[test]
    fn prop_garbage_never_panics(ops in any_options(), bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let _ = from_bytes::<(Vec<String>, BTreeMap<u32, Vec<u8>>)>(&bytes, ops);
    }
}
