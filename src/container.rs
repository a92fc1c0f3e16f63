//! Sequence, associative and product-type encodings
//!
//! Variable-size containers write their element count as a `u64` (fixed or
//! compacted, following the cursor options) and then every element in
//! iteration order. Fixed-size arrays and tuples carry no prefix.
//!
//! When compaction is off and the element type has a flat layout, `Vec`,
//! slices, `VecDeque` and arrays write the whole run as one block and read it
//! back with a single bounds check. The bytes are identical to the
//! element-by-element path.

use alloc::collections::{BTreeMap, BTreeSet, BinaryHeap, LinkedList, VecDeque};
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::buffer::{ByteSequence, Cursor};
use crate::codec::{flat_repeat, flat_sum, flat_width, Category, Decode, Encode, Shape};
use crate::error::{Error, Result};
use crate::MAX_FRAME_SIZE;

/// Write a container element count
#[inline]
fn put_count<B: ByteSequence>(cursor: &mut Cursor<B>, count: usize) {
    (count as u64).encode(cursor);
}

/// Read a container element count
///
/// Poisons with `UnexpectedEof` when `count` elements of at least `min_len`
/// bytes each cannot fit in what is left, so no allocation is sized from a
/// corrupt prefix. Elements that may encode to nothing are capped at
/// `MAX_FRAME_SIZE` and poison with `Overflow` above it.
fn get_count<B: ByteSequence>(cursor: &mut Cursor<B>, min_len: usize) -> Result<usize> {
    let raw = u64::decode(cursor)?;
    let count = usize::try_from(raw).map_err(|_| cursor.fail(Error::Overflow))?;
    if min_len == 0 && count > MAX_FRAME_SIZE {
        return Err(cursor.fail(Error::Overflow));
    }
    match count.checked_mul(min_len) {
        Some(need) if need <= cursor.remaining() => Ok(count),
        _ => Err(cursor.fail(Error::UnexpectedEof)),
    }
}

/// Append every element of a slice, as one block when the layout allows
fn encode_elements<T: Encode, B: ByteSequence>(items: &[T], cursor: &mut Cursor<B>) {
    match flat_width::<T, B>(cursor) {
        Some(width) if width > 0 => {
            let mut block = vec![0u8; width * items.len()];
            for (item, dst) in items.iter().zip(block.chunks_exact_mut(width)) {
                item.encode_flat(dst);
            }
            cursor.append(&block);
        }
        _ => {
            for item in items {
                item.encode(cursor);
            }
        }
    }
}

/// Read `count` elements, as one block when the layout allows
fn decode_elements<T: Decode, B: ByteSequence>(
    cursor: &mut Cursor<B>,
    count: usize,
) -> Result<Vec<T>> {
    match flat_width::<T, B>(cursor) {
        Some(width) if width > 0 => {
            let total = width
                .checked_mul(count)
                .ok_or_else(|| cursor.fail(Error::Overflow))?;
            let decoded = {
                let block = cursor.take(total)?;
                block
                    .chunks_exact(width)
                    .map(T::decode_flat)
                    .collect::<Result<Vec<T>>>()
            };
            decoded.map_err(|err| cursor.fail(err))
        }
        _ => {
            let mut out = Vec::with_capacity(count);
            for _ in 0..count {
                out.push(T::decode(cursor)?);
            }
            Ok(out)
        }
    }
}

// Strings

impl Shape for str {
    const CATEGORY: Category = Category::Container;
}

impl Encode for str {
    #[inline]
    fn encode<B: ByteSequence>(&self, cursor: &mut Cursor<B>) {
        put_count(cursor, self.len());
        cursor.append(self.as_bytes());
    }
}

impl Shape for String {
    const CATEGORY: Category = Category::Container;
}

impl Encode for String {
    #[inline]
    fn encode<B: ByteSequence>(&self, cursor: &mut Cursor<B>) {
        self.as_str().encode(cursor);
    }
}

impl Decode for String {
    fn decode<B: ByteSequence>(cursor: &mut Cursor<B>) -> Result<Self> {
        let count = get_count(cursor, 1)?;
        if count == 0 {
            return Err(cursor.fail(Error::EmptyString));
        }
        let bytes = cursor.take(count)?.to_vec();
        String::from_utf8(bytes).map_err(|_| cursor.fail(Error::InvalidUtf8))
    }
}

// Contiguous sequences

impl<T: Shape> Shape for [T] {
    const CATEGORY: Category = Category::Container;
}

impl<T: Encode> Encode for [T] {
    #[inline]
    fn encode<B: ByteSequence>(&self, cursor: &mut Cursor<B>) {
        put_count(cursor, self.len());
        encode_elements(self, cursor);
    }
}

impl<T: Shape> Shape for Vec<T> {
    const CATEGORY: Category = Category::Container;
}

impl<T: Encode> Encode for Vec<T> {
    #[inline]
    fn encode<B: ByteSequence>(&self, cursor: &mut Cursor<B>) {
        self.as_slice().encode(cursor);
    }
}

impl<T: Decode> Decode for Vec<T> {
    #[inline]
    fn decode<B: ByteSequence>(cursor: &mut Cursor<B>) -> Result<Self> {
        let count = get_count(cursor, T::MIN_LEN)?;
        decode_elements(cursor, count)
    }
}

impl<T: Shape, const N: usize> Shape for [T; N] {
    const CATEGORY: Category = Category::Container;
    const FLAT_WIDTH: Option<usize> = flat_repeat(T::FLAT_WIDTH, N);
    const MIN_LEN: usize = T::MIN_LEN * N;
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    #[inline]
    fn encode<B: ByteSequence>(&self, cursor: &mut Cursor<B>) {
        encode_elements(self.as_slice(), cursor);
    }

    fn encode_flat(&self, dst: &mut [u8]) {
        let width = T::FLAT_WIDTH.unwrap_or(0);
        if width == 0 {
            return;
        }
        for (item, chunk) in self.iter().zip(dst.chunks_exact_mut(width)) {
            item.encode_flat(chunk);
        }
    }
}

impl<T: Decode, const N: usize> Decode for [T; N] {
    fn decode<B: ByteSequence>(cursor: &mut Cursor<B>) -> Result<Self> {
        let items = decode_elements::<T, B>(cursor, N)?;
        items
            .try_into()
            .map_err(|_| cursor.fail(Error::UnexpectedEof))
    }

    fn decode_flat(src: &[u8]) -> Result<Self> {
        let width = T::FLAT_WIDTH.unwrap_or(0);
        let items = if width == 0 {
            (0..N)
                .map(|_| T::decode_flat(&[]))
                .collect::<Result<Vec<T>>>()?
        } else {
            src.chunks_exact(width)
                .map(T::decode_flat)
                .collect::<Result<Vec<T>>>()?
        };
        items.try_into().map_err(|_| Error::UnexpectedEof)
    }
}

impl<T: Shape> Shape for VecDeque<T> {
    const CATEGORY: Category = Category::Container;
}

impl<T: Encode> Encode for VecDeque<T> {
    #[inline]
    fn encode<B: ByteSequence>(&self, cursor: &mut Cursor<B>) {
        put_count(cursor, self.len());
        let (front, back) = self.as_slices();
        encode_elements(front, cursor);
        encode_elements(back, cursor);
    }
}

impl<T: Decode> Decode for VecDeque<T> {
    #[inline]
    fn decode<B: ByteSequence>(cursor: &mut Cursor<B>) -> Result<Self> {
        let count = get_count(cursor, T::MIN_LEN)?;
        decode_elements(cursor, count).map(VecDeque::from)
    }
}

// Linked and heap-ordered sequences

impl<T: Shape> Shape for LinkedList<T> {
    const CATEGORY: Category = Category::Container;
}

impl<T: Encode> Encode for LinkedList<T> {
    fn encode<B: ByteSequence>(&self, cursor: &mut Cursor<B>) {
        put_count(cursor, self.len());
        for item in self {
            item.encode(cursor);
        }
    }
}

impl<T: Decode> Decode for LinkedList<T> {
    fn decode<B: ByteSequence>(cursor: &mut Cursor<B>) -> Result<Self> {
        let count = get_count(cursor, T::MIN_LEN)?;
        let mut out = LinkedList::new();
        for _ in 0..count {
            out.push_back(T::decode(cursor)?);
        }
        Ok(out)
    }
}

impl<T: Shape> Shape for BinaryHeap<T> {
    const CATEGORY: Category = Category::Container;
}

impl<T: Encode> Encode for BinaryHeap<T> {
    fn encode<B: ByteSequence>(&self, cursor: &mut Cursor<B>) {
        put_count(cursor, self.len());
        for item in self.iter() {
            item.encode(cursor);
        }
    }
}

impl<T: Decode + Ord> Decode for BinaryHeap<T> {
    fn decode<B: ByteSequence>(cursor: &mut Cursor<B>) -> Result<Self> {
        let count = get_count(cursor, T::MIN_LEN)?;
        let mut out = BinaryHeap::with_capacity(count);
        for _ in 0..count {
            out.push(T::decode(cursor)?);
        }
        Ok(out)
    }
}

// Associative containers

impl<T: Shape> Shape for BTreeSet<T> {
    const CATEGORY: Category = Category::Container;
}

impl<T: Encode> Encode for BTreeSet<T> {
    fn encode<B: ByteSequence>(&self, cursor: &mut Cursor<B>) {
        put_count(cursor, self.len());
        for item in self {
            item.encode(cursor);
        }
    }
}

impl<T: Decode + Ord> Decode for BTreeSet<T> {
    fn decode<B: ByteSequence>(cursor: &mut Cursor<B>) -> Result<Self> {
        let count = get_count(cursor, T::MIN_LEN)?;
        let mut out = BTreeSet::new();
        for _ in 0..count {
            out.insert(T::decode(cursor)?);
        }
        Ok(out)
    }
}

impl<K: Shape, V: Shape> Shape for BTreeMap<K, V> {
    const CATEGORY: Category = Category::Container;
}

impl<K: Encode, V: Encode> Encode for BTreeMap<K, V> {
    fn encode<B: ByteSequence>(&self, cursor: &mut Cursor<B>) {
        put_count(cursor, self.len());
        for (key, value) in self {
            key.encode(cursor);
            value.encode(cursor);
        }
    }
}

impl<K: Decode + Ord, V: Decode> Decode for BTreeMap<K, V> {
    fn decode<B: ByteSequence>(cursor: &mut Cursor<B>) -> Result<Self> {
        let count = get_count(cursor, K::MIN_LEN.saturating_add(V::MIN_LEN))?;
        let mut out = BTreeMap::new();
        for _ in 0..count {
            let key = K::decode(cursor)?;
            let value = V::decode(cursor)?;
            out.insert(key, value);
        }
        Ok(out)
    }
}

#[cfg(feature = "std")]
mod hashed {
    use core::hash::{BuildHasher, Hash};
    use std::collections::{HashMap, HashSet};

    use super::{get_count, put_count};
    use crate::buffer::{ByteSequence, Cursor};
    use crate::codec::{Category, Decode, Encode, Shape};
    use crate::error::Result;

    impl<T: Shape, S> Shape for HashSet<T, S> {
        const CATEGORY: Category = Category::Container;
    }

    impl<T: Encode, S> Encode for HashSet<T, S> {
        fn encode<B: ByteSequence>(&self, cursor: &mut Cursor<B>) {
            put_count(cursor, self.len());
            for item in self {
                item.encode(cursor);
            }
        }
    }

    impl<T, S> Decode for HashSet<T, S>
    where
        T: Decode + Eq + Hash,
        S: BuildHasher + Default,
    {
        fn decode<B: ByteSequence>(cursor: &mut Cursor<B>) -> Result<Self> {
            let count = get_count(cursor, T::MIN_LEN)?;
            let mut out = HashSet::with_capacity_and_hasher(count, S::default());
            for _ in 0..count {
                out.insert(T::decode(cursor)?);
            }
            Ok(out)
        }
    }

    impl<K: Shape, V: Shape, S> Shape for HashMap<K, V, S> {
        const CATEGORY: Category = Category::Container;
    }

    impl<K: Encode, V: Encode, S> Encode for HashMap<K, V, S> {
        fn encode<B: ByteSequence>(&self, cursor: &mut Cursor<B>) {
            put_count(cursor, self.len());
            for (key, value) in self {
                key.encode(cursor);
                value.encode(cursor);
            }
        }
    }

    impl<K, V, S> Decode for HashMap<K, V, S>
    where
        K: Decode + Eq + Hash,
        V: Decode,
        S: BuildHasher + Default,
    {
        fn decode<B: ByteSequence>(cursor: &mut Cursor<B>) -> Result<Self> {
            let count = get_count(cursor, K::MIN_LEN.saturating_add(V::MIN_LEN))?;
            let mut out = HashMap::with_capacity_and_hasher(count, S::default());
            for _ in 0..count {
                let key = K::decode(cursor)?;
                let value = V::decode(cursor)?;
                out.insert(key, value);
            }
            Ok(out)
        }
    }
}

// Tuples

macro_rules! impl_tuple {
    ($($name:ident $var:ident),+) => {
        impl<$($name: Shape),+> Shape for ($($name,)+) {
            const CATEGORY: Category = Category::Container;
            const FLAT_WIDTH: Option<usize> = flat_sum(&[$($name::FLAT_WIDTH),+]);
            const MIN_LEN: usize = 0 $(+ $name::MIN_LEN)+;
        }

        impl<$($name: Encode),+> Encode for ($($name,)+) {
            #[inline]
            fn encode<Buf: ByteSequence>(&self, cursor: &mut Cursor<Buf>) {
                let ($($var,)+) = self;
                $($var.encode(cursor);)+
            }

            #[allow(unused_assignments)]
            fn encode_flat(&self, dst: &mut [u8]) {
                let ($($var,)+) = self;
                let mut at = 0;
                $(
                    let width = $name::FLAT_WIDTH.unwrap_or(0);
                    $var.encode_flat(&mut dst[at..at + width]);
                    at += width;
                )+
            }
        }

        impl<$($name: Decode),+> Decode for ($($name,)+) {
            #[inline]
            fn decode<Buf: ByteSequence>(cursor: &mut Cursor<Buf>) -> Result<Self> {
                Ok(($($name::decode(cursor)?,)+))
            }

            #[allow(unused_assignments)]
            fn decode_flat(src: &[u8]) -> Result<Self> {
                let mut at = 0;
                $(
                    let width = $name::FLAT_WIDTH.unwrap_or(0);
                    let $var = $name::decode_flat(&src[at..at + width])?;
                    at += width;
                )+
                Ok(($($var,)+))
            }
        }
    };
}

impl_tuple!(A a);
impl_tuple!(A a, B b);
impl_tuple!(A a, B b, C c);
impl_tuple!(A a, B b, C c, D d);
impl_tuple!(A a, B b, C c, D d, E e);
impl_tuple!(A a, B b, C c, D d, E e, F f);
impl_tuple!(A a, B b, C c, D d, E e, F f, G g);
impl_tuple!(A a, B b, C c, D d, E e, F f, G g, H h);
impl_tuple!(A a, B b, C c, D d, E e, F f, G g, H h, I i);
impl_tuple!(A a, B b, C c, D d, E e, F f, G g, H h, I i, J j);
impl_tuple!(A a, B b, C c, D d, E e, F f, G g, H h, I i, J j, K k);
impl_tuple!(A a, B b, C c, D d, E e, F f, G g, H h, I i, J j, K k, L l);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;

    fn compacted() -> Options {
        Options::default() | Options::COMPACTED
    }

    fn roundtrip<T>(value: &T, options: Options) -> T
    where
        T: Encode + Decode,
    {
        let mut cursor = Cursor::with_options(options);
        cursor.put(value);
        let decoded = cursor.get::<T>().unwrap();
        assert!(cursor.is_at_end());
        decoded
    }

    #[test]
    fn test_sequence_roundtrip() {
        for ops in [Options::default(), compacted()] {
            let v: Vec<u32> = (0..100).map(|i| i * 7919).collect();
            assert_eq!(roundtrip(&v, ops), v);

            let d: VecDeque<i16> = [-3, 0, 9].into_iter().collect();
            assert_eq!(roundtrip(&d, ops), d);

            let l: LinkedList<u64> = [1, 1 << 40, u64::MAX].into_iter().collect();
            assert_eq!(roundtrip(&l, ops), l);

            let a = [1.5f64, -0.25, 1e300];
            assert_eq!(roundtrip(&a, ops), a);

            let s = String::from("héllo wörld");
            assert_eq!(roundtrip(&s, ops), s);
        }
    }

    #[test]
    fn test_binary_heap_multiset() {
        let heap: BinaryHeap<i32> = [5, -1, 5, 12, 0].into_iter().collect();
        let decoded = roundtrip(&heap, compacted());
        assert_eq!(decoded.into_sorted_vec(), heap.into_sorted_vec());
    }

    #[test]
    fn test_associative_roundtrip() {
        let mut map = BTreeMap::new();
        map.insert(3u32, String::from("three"));
        map.insert(1u32, String::from("one"));
        assert_eq!(roundtrip(&map, Options::default()), map);

        let set: BTreeSet<i64> = [-9, 4, 100].into_iter().collect();
        assert_eq!(roundtrip(&set, compacted()), set);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_hashed_roundtrip() {
        use std::collections::{HashMap, HashSet};

        let map: HashMap<String, Vec<u8>> = [
            (String::from("a"), vec![1, 2]),
            (String::from("b"), vec![3]),
        ]
        .into_iter()
        .collect();
        assert_eq!(roundtrip(&map, Options::default()), map);

        let set: HashSet<u32> = (0..50).collect();
        assert_eq!(roundtrip(&set, compacted()), set);
    }

    #[test]
    fn test_empty_vec_is_prefix_only() {
        let mut cursor = Cursor::with_options(compacted());
        cursor.put(&Vec::<i32>::new()).put(&7u8);
        assert_eq!(cursor.as_slice(), &[0x00, 7]);

        assert!(cursor.get::<Vec<i32>>().unwrap().is_empty());
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.get::<u8>().unwrap(), 7);

        let mut fixed = Cursor::new();
        fixed.put(&Vec::<i32>::new());
        assert_eq!(fixed.len(), 8);
    }

    #[test]
    fn test_empty_string_poisons() {
        let mut cursor = Cursor::new();
        cursor.put("");
        assert_eq!(cursor.len(), 8);

        assert_eq!(cursor.get::<String>(), Err(Error::EmptyString));
        assert!(cursor.is_poisoned());
        assert_eq!(cursor.check(), Err(Error::EmptyString));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut cursor = Cursor::with_options(compacted());
        cursor.put(&2u64).append(&[0xC3, 0x28]);

        assert_eq!(cursor.get::<String>(), Err(Error::InvalidUtf8));
        assert!(cursor.is_poisoned());
    }

    #[test]
    fn test_fast_path_matches_element_path() {
        let v: Vec<u32> = vec![1, 0xDEAD_BEEF, 42, 7];

        let mut block = Cursor::new();
        block.put(&v);

        let mut manual = Cursor::new();
        manual.put(&(v.len() as u64));
        for item in &v {
            manual.put(item);
        }
        assert_eq!(block.as_slice(), manual.as_slice());

        let pairs: Vec<(u8, f32)> = vec![(1, 0.5), (2, -8.0)];
        let mut block = Cursor::new();
        block.put(&pairs);

        let mut manual = Cursor::new();
        manual.put(&2u64);
        for (a, b) in &pairs {
            manual.put(a).put(b);
        }
        assert_eq!(block.as_slice(), manual.as_slice());
        assert_eq!(block.get::<Vec<(u8, f32)>>().unwrap(), pairs);
    }

    #[test]
    fn test_array_has_no_prefix() {
        let mut cursor = Cursor::new();
        cursor.put(&[7u16, 8, 9]);
        assert_eq!(cursor.len(), 6);
        assert_eq!(cursor.get::<[u16; 3]>().unwrap(), [7, 8, 9]);

        let mut cursor = Cursor::with_options(compacted());
        cursor.put(&[0u32; 4]);
        assert_eq!(cursor.as_slice(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_tuple_layout() {
        let mut cursor = Cursor::new();
        cursor.put(&(1u8, 2u16, String::from("x")));
        assert_eq!(cursor.len(), 1 + 2 + 8 + 1);

        let (a, b, c) = cursor.get::<(u8, u16, String)>().unwrap();
        assert_eq!((a, b, c.as_str()), (1, 2, "x"));
    }

    #[test]
    fn test_nested_containers() {
        let nested: Vec<Vec<String>> = vec![
            vec![String::from("a"), String::from("bc")],
            vec![],
            vec![String::from("def")],
        ];
        assert_eq!(roundtrip(&nested, compacted()), nested);

        let grid = [[1u8, 2], [3, 4]];
        assert_eq!(roundtrip(&grid, Options::default()), grid);
    }

    #[test]
    fn test_oversized_count_poisons_before_allocating() {
        let mut cursor = Cursor::new();
        cursor.put(&u64::MAX).append(&[1, 2, 3]);

        assert_eq!(cursor.get::<Vec<u32>>(), Err(Error::UnexpectedEof));
        assert!(cursor.is_poisoned());

        let mut cursor = Cursor::new();
        cursor.put(&1_000u64).append(&[0; 16]);
        assert_eq!(cursor.get::<Vec<u64>>(), Err(Error::UnexpectedEof));
    }

    #[test]
    fn test_truncated_sequences() {
        let v: Vec<u64> = vec![10, 20, 30];
        for ops in [Options::default(), compacted()] {
            let mut full = Cursor::with_options(ops);
            full.put(&v);
            let bytes = full.into_inner();

            for cut in 0..bytes.len() {
                let mut cursor = Cursor::from_slice(&bytes[..cut], ops);
                assert!(cursor.get::<Vec<u64>>().is_err());
                assert!(cursor.is_poisoned());
            }
        }
    }

    #[test]
    fn test_invalid_flat_element_poisons() {
        let mut cursor = Cursor::new();
        cursor.put(&3u64).append(&[1, 0, 2]);

        assert_eq!(cursor.get::<Vec<bool>>(), Err(Error::InvalidBool));
        assert!(cursor.is_poisoned());
    }

    #[test]
    fn test_zero_width_arrays_inside_flat_types() {
        let v: Vec<(u8, [[u8; 0]; 2])> = vec![(7, [[], []]), (9, [[], []])];
        assert_eq!(roundtrip(&v, Options::default()), v);
        assert_eq!(roundtrip(&v, compacted()), v);

        let mut block = Cursor::new();
        block.put(&v);

        let mut manual = Cursor::new();
        manual.put(&2u64).put(&7u8).put(&9u8);
        assert_eq!(block.as_slice(), manual.as_slice());
    }

    #[test]
    fn test_zero_length_elements_cap_count() {
        for ops in [Options::default(), compacted()] {
            let mut cursor = Cursor::with_options(ops);
            cursor.put(&u64::MAX);
            assert_eq!(cursor.get::<BTreeSet<[u8; 0]>>(), Err(Error::Overflow));
            assert!(cursor.is_poisoned());

            let mut cursor = Cursor::with_options(ops);
            cursor.put(&(MAX_FRAME_SIZE as u64 + 1));
            assert_eq!(cursor.get::<LinkedList<[u16; 0]>>(), Err(Error::Overflow));
        }

        let mut cursor = Cursor::new();
        cursor.put(&3u64);
        assert_eq!(cursor.get::<Vec<[u32; 0]>>().unwrap().len(), 3);
        assert!(cursor.is_at_end());
    }
}
