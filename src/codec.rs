//! Codec traits and type-category routing
//!
//! Every serializable type implements [`Shape`] plus [`Encode`] and/or
//! [`Decode`]. Trait resolution picks the codec at compile time: scalars use
//! the primitive codec, collections and tuples the container codec, and
//! registered records the composite codec. Containers and records recurse
//! through the same traits for each element or field, so nesting works to
//! any depth. A type with no impl is a compile error, never a runtime path.

use crate::buffer::{ByteSequence, Cursor};
use crate::error::{Error, Result};

/// Which codec family handles a type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Arithmetic scalar (bool, integers, floats, char)
    Primitive,
    /// Sequence, associative collection, tuple or fixed-size array
    Container,
    /// User-defined record
    Composite,
}

/// Static shape information shared by the encoder and decoder
pub trait Shape {
    /// Codec family this type is routed to
    const CATEGORY: Category;

    /// Width of the fixed-layout byte image, if the type has one
    ///
    /// `Some(width)` means the fixed-width encoding is always exactly `width`
    /// bytes and can be written or read as one block. Types with indirection
    /// (strings, collections) leave this `None`.
    const FLAT_WIDTH: Option<usize> = None;

    /// Smallest number of bytes any encoding of this type occupies
    const MIN_LEN: usize = 1;
}

/// Types that can be appended to a cursor
pub trait Encode: Shape {
    /// Append the encoding of `self`
    fn encode<B: ByteSequence>(&self, cursor: &mut Cursor<B>);

    /// Write the fixed-width image into `dst`
    ///
    /// Only called when [`Shape::FLAT_WIDTH`] is `Some(dst.len())`.
    #[inline]
    fn encode_flat(&self, dst: &mut [u8]) {
        let _ = dst;
    }
}

/// Types that can be read back from a cursor
pub trait Decode: Shape + Sized {
    /// Read the next value, poisoning the cursor on failure
    fn decode<B: ByteSequence>(cursor: &mut Cursor<B>) -> Result<Self>;

    /// Rebuild a value from its fixed-width image
    ///
    /// Only called when [`Shape::FLAT_WIDTH`] is `Some(src.len())`.
    #[inline]
    fn decode_flat(src: &[u8]) -> Result<Self> {
        let _ = src;
        Err(Error::UnexpectedEof)
    }
}

/// Sum of flat widths, `None` if any part is not flat
pub const fn flat_sum(parts: &[Option<usize>]) -> Option<usize> {
    let mut total = 0;
    let mut i = 0;
    while i < parts.len() {
        match parts[i] {
            Some(width) => total += width,
            None => return None,
        }
        i += 1;
    }
    Some(total)
}

/// Flat width of `count` repetitions of a part
pub const fn flat_repeat(part: Option<usize>, count: usize) -> Option<usize> {
    match part {
        Some(width) => Some(width * count),
        None => None,
    }
}

/// Flat width to use on this cursor, `None` when compaction is on
#[inline]
pub(crate) fn flat_width<T: Shape + ?Sized, B: ByteSequence>(cursor: &Cursor<B>) -> Option<usize> {
    if cursor.is_compacted() {
        return None;
    }
    T::FLAT_WIDTH
}

impl<T: Shape + ?Sized> Shape for &T {
    const CATEGORY: Category = T::CATEGORY;
    const FLAT_WIDTH: Option<usize> = T::FLAT_WIDTH;
    const MIN_LEN: usize = T::MIN_LEN;
}

impl<T: Encode + ?Sized> Encode for &T {
    #[inline]
    fn encode<B: ByteSequence>(&self, cursor: &mut Cursor<B>) {
        (**self).encode(cursor)
    }

    #[inline]
    fn encode_flat(&self, dst: &mut [u8]) {
        (**self).encode_flat(dst)
    }
}

impl<T: Shape + ?Sized> Shape for alloc::boxed::Box<T> {
    const CATEGORY: Category = T::CATEGORY;
    const FLAT_WIDTH: Option<usize> = None;
    const MIN_LEN: usize = T::MIN_LEN;
}

impl<T: Encode + ?Sized> Encode for alloc::boxed::Box<T> {
    #[inline]
    fn encode<B: ByteSequence>(&self, cursor: &mut Cursor<B>) {
        (**self).encode(cursor)
    }
}

impl<T: Decode> Decode for alloc::boxed::Box<T> {
    #[inline]
    fn decode<B: ByteSequence>(cursor: &mut Cursor<B>) -> Result<Self> {
        T::decode(cursor).map(alloc::boxed::Box::new)
    }
}
