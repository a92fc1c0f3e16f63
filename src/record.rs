//! User-defined records
//!
//! A record lists its fields once, in a fixed order, and the composite codec
//! walks that list: every field goes through the normal dispatch, so fields
//! can be scalars, containers or other records. No names or tags reach the
//! wire; reordering the list changes the format.
//!
//! [`record!`](crate::record!) registers the fields of an existing struct.
//! [`flat_record!`](crate::flat_record!) does the same for structs whose
//! fields all have a flat layout, and additionally copies the whole record as
//! one raw block when compaction is off.
//!
//! ```rust
//! use packwire::{record, Cursor};
//!
//! #[derive(Debug, PartialEq)]
//! struct Order {
//!     id: u64,
//!     symbol: String,
//!     legs: Vec<u32>,
//! }
//!
//! record!(Order { id: u64, symbol: String, legs: Vec<u32> });
//!
//! let order = Order { id: 7, symbol: "ABC".into(), legs: vec![1, 2] };
//! let mut cursor = Cursor::new();
//! cursor.put(&order);
//! assert_eq!(cursor.get::<Order>()?, order);
//! # Ok::<(), packwire::Error>(())
//! ```

use alloc::vec;

use crate::buffer::{ByteSequence, Cursor};
use crate::codec::{flat_width, Decode, Encode};
use crate::error::Result;

/// Ordered field registration for a composite type
pub trait Record: Sized {
    /// Registered field names, in wire order
    const FIELDS: &'static [&'static str];

    /// Smallest encoded size of all fields together
    const MIN_LEN: usize = 1;

    /// Encode every registered field in order
    fn encode_fields<B: ByteSequence>(&self, cursor: &mut Cursor<B>);

    /// Decode every registered field in order and build the record
    fn decode_fields<B: ByteSequence>(cursor: &mut Cursor<B>) -> Result<Self>;
}

/// Encode a flat record, as one raw block when compaction is off
pub fn encode_flat_record<T, B>(value: &T, cursor: &mut Cursor<B>)
where
    T: Record + Encode,
    B: ByteSequence,
{
    match flat_width::<T, B>(cursor) {
        Some(width) => {
            let mut block = vec![0u8; width];
            value.encode_flat(&mut block);
            cursor.append(&block);
        }
        None => value.encode_fields(cursor),
    }
}

/// Decode a flat record, from one raw block when compaction is off
pub fn decode_flat_record<T, B>(cursor: &mut Cursor<B>) -> Result<T>
where
    T: Record + Decode,
    B: ByteSequence,
{
    match flat_width::<T, B>(cursor) {
        Some(width) => {
            let decoded = {
                let block = cursor.take(width)?;
                T::decode_flat(block)
            };
            decoded.map_err(|err| cursor.fail(err))
        }
        None => T::decode_fields(cursor),
    }
}

/// Implement `Shape`, `Encode` and `Decode` for a type from its [`Record`] impl
///
/// Use this with a hand-written [`Record`] impl; [`record!`](crate::record!)
/// calls it for you.
#[macro_export]
macro_rules! record_codec {
    ($ty:ty) => {
        impl $crate::codec::Shape for $ty {
            const CATEGORY: $crate::codec::Category = $crate::codec::Category::Composite;
            const MIN_LEN: usize = <$ty as $crate::record::Record>::MIN_LEN;
        }

        impl $crate::codec::Encode for $ty {
            #[inline]
            fn encode<B: $crate::buffer::ByteSequence>(&self, cursor: &mut $crate::buffer::Cursor<B>) {
                $crate::record::Record::encode_fields(self, cursor)
            }
        }

        impl $crate::codec::Decode for $ty {
            #[inline]
            fn decode<B: $crate::buffer::ByteSequence>(
                cursor: &mut $crate::buffer::Cursor<B>,
            ) -> $crate::error::Result<Self> {
                <$ty as $crate::record::Record>::decode_fields(cursor)
            }
        }
    };
}

/// Register the fields of a struct, in wire order
///
/// ```rust
/// # use packwire::record;
/// struct Point { x: i32, y: i32 }
/// record!(Point { x: i32, y: i32 });
/// ```
#[macro_export]
macro_rules! record {
    ($ty:ident { $($field:ident : $fty:ty),* $(,)? }) => {
        impl $crate::record::Record for $ty {
            const FIELDS: &'static [&'static str] = &[$(stringify!($field)),*];
            const MIN_LEN: usize = 0 $(+ <$fty as $crate::codec::Shape>::MIN_LEN)*;

            #[allow(unused_variables)]
            fn encode_fields<B: $crate::buffer::ByteSequence>(&self, cursor: &mut $crate::buffer::Cursor<B>) {
                $($crate::codec::Encode::encode(&self.$field, cursor);)*
            }

            #[allow(unused_variables)]
            fn decode_fields<B: $crate::buffer::ByteSequence>(
                cursor: &mut $crate::buffer::Cursor<B>,
            ) -> $crate::error::Result<Self> {
                Ok(Self {
                    $($field: <$fty as $crate::codec::Decode>::decode(cursor)?,)*
                })
            }
        }

        $crate::record_codec!($ty);
    };
}

/// Register the fields of a struct whose fields all have a flat layout
///
/// Without compaction the record is written as the packed native bytes of
/// its fields, in registration order, as a single block. With compaction it
/// falls back to the field-by-field encoding. A field without a flat layout
/// is a compile error.
#[macro_export]
macro_rules! flat_record {
    ($ty:ident { $($field:ident : $fty:ty),+ $(,)? }) => {
        const _: () = assert!(
            $crate::codec::flat_sum(&[$(<$fty as $crate::codec::Shape>::FLAT_WIDTH),+]).is_some(),
            concat!(stringify!($ty), " has a field without a flat layout")
        );

        impl $crate::record::Record for $ty {
            const FIELDS: &'static [&'static str] = &[$(stringify!($field)),+];
            const MIN_LEN: usize = 0 $(+ <$fty as $crate::codec::Shape>::MIN_LEN)+;

            fn encode_fields<B: $crate::buffer::ByteSequence>(&self, cursor: &mut $crate::buffer::Cursor<B>) {
                $($crate::codec::Encode::encode(&self.$field, cursor);)+
            }

            fn decode_fields<B: $crate::buffer::ByteSequence>(
                cursor: &mut $crate::buffer::Cursor<B>,
            ) -> $crate::error::Result<Self> {
                Ok(Self {
                    $($field: <$fty as $crate::codec::Decode>::decode(cursor)?,)+
                })
            }
        }

        impl $crate::codec::Shape for $ty {
            const CATEGORY: $crate::codec::Category = $crate::codec::Category::Composite;
            const FLAT_WIDTH: Option<usize> =
                $crate::codec::flat_sum(&[$(<$fty as $crate::codec::Shape>::FLAT_WIDTH),+]);
            const MIN_LEN: usize = <$ty as $crate::record::Record>::MIN_LEN;
        }

        impl $crate::codec::Encode for $ty {
            #[inline]
            fn encode<B: $crate::buffer::ByteSequence>(&self, cursor: &mut $crate::buffer::Cursor<B>) {
                $crate::record::encode_flat_record(self, cursor)
            }

            #[allow(unused_assignments)]
            fn encode_flat(&self, dst: &mut [u8]) {
                let mut at = 0;
                $(
                    let width = <$fty as $crate::codec::Shape>::FLAT_WIDTH.unwrap_or(0);
                    $crate::codec::Encode::encode_flat(&self.$field, &mut dst[at..at + width]);
                    at += width;
                )+
            }
        }

        impl $crate::codec::Decode for $ty {
            #[inline]
            fn decode<B: $crate::buffer::ByteSequence>(
                cursor: &mut $crate::buffer::Cursor<B>,
            ) -> $crate::error::Result<Self> {
                $crate::record::decode_flat_record(cursor)
            }

            #[allow(unused_assignments)]
            fn decode_flat(src: &[u8]) -> $crate::error::Result<Self> {
                let mut at = 0;
                $(
                    let width = <$fty as $crate::codec::Shape>::FLAT_WIDTH.unwrap_or(0);
                    let $field = <$fty as $crate::codec::Decode>::decode_flat(&src[at..at + width])?;
                    at += width;
                )+
                Ok(Self { $($field),+ })
            }
        }
    };
}
