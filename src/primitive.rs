//! Scalar encodings
//!
//! Fixed-width scalars are written in native width and native byte order.
//! With [`Options::COMPACTED`](crate::Options::COMPACTED), 32 and 64-bit
//! integers (and `usize`/`isize`/`char`, which travel as one of those) switch
//! to the nibble-prefixed form from [`compact`](crate::compact). One and two
//! byte integers, `bool`, floats and 128-bit integers are never compacted.

use core::mem::size_of;

use crate::buffer::{ByteSequence, Cursor};
use crate::codec::{Category, Decode, Encode, Shape};
use crate::compact;
use crate::error::{Error, Result};

macro_rules! impl_fixed {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Shape for $ty {
                const CATEGORY: Category = Category::Primitive;
                const FLAT_WIDTH: Option<usize> = Some(size_of::<$ty>());
                const MIN_LEN: usize = size_of::<$ty>();
            }

            impl Encode for $ty {
                #[inline]
                fn encode<B: ByteSequence>(&self, cursor: &mut Cursor<B>) {
                    cursor.append(&self.to_ne_bytes());
                }

                #[inline]
                fn encode_flat(&self, dst: &mut [u8]) {
                    dst.copy_from_slice(&self.to_ne_bytes());
                }
            }

            impl Decode for $ty {
                #[inline]
                fn decode<B: ByteSequence>(cursor: &mut Cursor<B>) -> Result<Self> {
                    Ok(<$ty>::from_ne_bytes(cursor.take_array()?))
                }

                #[inline]
                fn decode_flat(src: &[u8]) -> Result<Self> {
                    let mut raw = [0u8; size_of::<$ty>()];
                    raw.copy_from_slice(src);
                    Ok(<$ty>::from_ne_bytes(raw))
                }
            }
        )*
    };
}

impl_fixed!(u8, i8, u16, i16, f32, f64, u128, i128);

/// Read a compacted wire integer, poisoning the cursor on failure
#[inline]
fn take_compact<B, W>(
    cursor: &mut Cursor<B>,
    decode: fn(&[u8]) -> Result<(W, usize)>,
) -> Result<W>
where
    B: ByteSequence,
{
    cursor.check_readable()?;
    match decode(cursor.current()) {
        Ok((value, used)) => {
            cursor.advance(used);
            Ok(value)
        }
        Err(err) => Err(cursor.fail(err)),
    }
}

macro_rules! impl_compacted {
    ($($ty:ty => $wire:ty, $encode:path, $decode:path, $from_wire:expr;)*) => {
        $(
            impl Shape for $ty {
                const CATEGORY: Category = Category::Primitive;
                const FLAT_WIDTH: Option<usize> = Some(size_of::<$wire>());
            }

            impl Encode for $ty {
                #[inline]
                fn encode<B: ByteSequence>(&self, cursor: &mut Cursor<B>) {
                    let wire = *self as $wire;
                    if cursor.is_compacted() {
                        let (buf, len) = $encode(wire);
                        cursor.append(&buf[..len]);
                    } else {
                        cursor.append(&wire.to_ne_bytes());
                    }
                }

                #[inline]
                fn encode_flat(&self, dst: &mut [u8]) {
                    dst.copy_from_slice(&(*self as $wire).to_ne_bytes());
                }
            }

            impl Decode for $ty {
                #[inline]
                fn decode<B: ByteSequence>(cursor: &mut Cursor<B>) -> Result<Self> {
                    let wire = if cursor.is_compacted() {
                        take_compact(cursor, $decode)?
                    } else {
                        <$wire>::from_ne_bytes(cursor.take_array()?)
                    };
                    let from_wire: fn($wire) -> Result<$ty> = $from_wire;
                    from_wire(wire).map_err(|err| cursor.fail(err))
                }

                #[inline]
                fn decode_flat(src: &[u8]) -> Result<Self> {
                    let mut raw = [0u8; size_of::<$wire>()];
                    raw.copy_from_slice(src);
                    let from_wire: fn($wire) -> Result<$ty> = $from_wire;
                    from_wire(<$wire>::from_ne_bytes(raw))
                }
            }
        )*
    };
}

impl_compacted! {
    u32 => u32, compact::encode_u32, compact::decode_u32, Ok;
    i32 => u32, compact::encode_u32, compact::decode_u32, |w| Ok(w as i32);
    u64 => u64, compact::encode_u64, compact::decode_u64, Ok;
    i64 => u64, compact::encode_u64, compact::decode_u64, |w| Ok(w as i64);
    usize => u64, compact::encode_u64, compact::decode_u64,
        |w| usize::try_from(w).map_err(|_| Error::Overflow);
    isize => u64, compact::encode_u64, compact::decode_u64,
        |w| isize::try_from(w as i64).map_err(|_| Error::Overflow);
}

impl Shape for bool {
    const CATEGORY: Category = Category::Primitive;
    const FLAT_WIDTH: Option<usize> = Some(1);
}

impl Encode for bool {
    #[inline]
    fn encode<B: ByteSequence>(&self, cursor: &mut Cursor<B>) {
        cursor.append(&[u8::from(*self)]);
    }

    #[inline]
    fn encode_flat(&self, dst: &mut [u8]) {
        dst[0] = u8::from(*self);
    }
}

impl Decode for bool {
    #[inline]
    fn decode<B: ByteSequence>(cursor: &mut Cursor<B>) -> Result<Self> {
        let [byte] = cursor.take_array::<1>()?;
        bool_from_byte(byte).map_err(|err| cursor.fail(err))
    }

    #[inline]
    fn decode_flat(src: &[u8]) -> Result<Self> {
        bool_from_byte(src[0])
    }
}

#[inline]
fn bool_from_byte(byte: u8) -> Result<bool> {
    match byte {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(Error::InvalidBool),
    }
}

impl Shape for char {
    const CATEGORY: Category = Category::Primitive;
    const FLAT_WIDTH: Option<usize> = Some(4);
}

impl Encode for char {
    #[inline]
    fn encode<B: ByteSequence>(&self, cursor: &mut Cursor<B>) {
        u32::from(*self).encode(cursor);
    }

    #[inline]
    fn encode_flat(&self, dst: &mut [u8]) {
        u32::from(*self).encode_flat(dst);
    }
}

impl Decode for char {
    #[inline]
    fn decode<B: ByteSequence>(cursor: &mut Cursor<B>) -> Result<Self> {
        let scalar = u32::decode(cursor)?;
        char::from_u32(scalar).ok_or_else(|| cursor.fail(Error::InvalidChar))
    }

    #[inline]
    fn decode_flat(src: &[u8]) -> Result<Self> {
        char::from_u32(u32::decode_flat(src)?).ok_or(Error::InvalidChar)
    }
}
