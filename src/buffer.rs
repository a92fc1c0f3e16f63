//! Byte sequences and the read/write cursor over them
//!
//! A [`Cursor`] appends encoded bytes to its backing [`ByteSequence`] and
//! reads them back from a separate read offset. The first failed read poisons
//! the cursor: the offset jumps to [`POISONED`] and every later read returns
//! an error without touching the buffer, so a caller can chain many reads and
//! check the outcome once.

use alloc::borrow::Cow;
use alloc::vec::Vec;

use crate::codec::{Decode, Encode};
use crate::error::{Error, Result};
use crate::options::Options;

/// Read offset of a poisoned cursor
pub const POISONED: usize = usize::MAX;

/// Growable, appendable, randomly readable byte storage
pub trait ByteSequence {
    /// Append raw bytes at the end
    fn append(&mut self, bytes: &[u8]);

    /// All bytes written so far
    fn data(&self) -> &[u8];

    /// Number of bytes written so far
    #[inline]
    fn len(&self) -> usize {
        self.data().len()
    }

    /// Returns true if nothing has been written
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all bytes, keeping any allocation
    fn clear(&mut self);
}

impl ByteSequence for Vec<u8> {
    #[inline]
    fn append(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }

    #[inline]
    fn data(&self) -> &[u8] {
        self.as_slice()
    }

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn clear(&mut self) {
        Vec::clear(self);
    }
}

impl<B: ByteSequence + ?Sized> ByteSequence for &mut B {
    #[inline]
    fn append(&mut self, bytes: &[u8]) {
        (**self).append(bytes);
    }

    #[inline]
    fn data(&self) -> &[u8] {
        (**self).data()
    }

    #[inline]
    fn len(&self) -> usize {
        (**self).len()
    }

    #[inline]
    fn clear(&mut self) {
        (**self).clear();
    }
}

/// Borrowed input is read in place; the first append copies it
impl ByteSequence for Cow<'_, [u8]> {
    #[inline]
    fn append(&mut self, bytes: &[u8]) {
        self.to_mut().extend_from_slice(bytes);
    }

    #[inline]
    fn data(&self) -> &[u8] {
        self
    }

    fn clear(&mut self) {
        match self {
            Cow::Borrowed(_) => *self = Cow::Borrowed(&[]),
            Cow::Owned(buf) => buf.clear(),
        }
    }
}

/// Encode/decode cursor over a byte sequence
#[derive(Debug, Clone)]
pub struct Cursor<B = Vec<u8>> {
    buf: B,
    offset: usize,
    options: Options,
    fault: Option<Error>,
}

impl Cursor<Vec<u8>> {
    /// Create an empty cursor with default options
    #[inline]
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// Create an empty cursor with the given options
    #[inline]
    pub fn with_options(options: Options) -> Self {
        Self::from_sequence(Vec::new(), options)
    }

    /// Create a cursor that reads a copy of `bytes`
    #[inline]
    pub fn from_slice(bytes: &[u8], options: Options) -> Self {
        Self::from_sequence(bytes.to_vec(), options)
    }
}

impl<'a> Cursor<Cow<'a, [u8]>> {
    /// Create a cursor that reads `bytes` without copying them
    #[inline]
    pub fn borrowed(bytes: &'a [u8], options: Options) -> Self {
        Self::from_sequence(Cow::Borrowed(bytes), options)
    }
}

impl Default for Cursor<Vec<u8>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ByteSequence> Cursor<B> {
    /// Wrap an existing byte sequence, reading from its start
    #[inline]
    pub fn from_sequence(buf: B, options: Options) -> Self {
        Self {
            buf,
            offset: 0,
            options,
            fault: None,
        }
    }

    /// Options this cursor was built with
    #[inline]
    pub fn options(&self) -> Options {
        self.options
    }

    /// Integers wider than two bytes are compacted
    #[inline]
    pub fn is_compacted(&self) -> bool {
        self.options.is_compacted()
    }

    /// Append raw bytes; never fails
    #[inline]
    pub fn append(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.append(bytes);
        self
    }

    /// Encode a value and append it
    #[inline]
    pub fn put<T: Encode + ?Sized>(&mut self, value: &T) -> &mut Self {
        value.encode(self);
        self
    }

    /// Decode the next value
    #[inline]
    pub fn get<T: Decode>(&mut self) -> Result<T> {
        self.check_readable()?;
        T::decode(self)
    }

    /// Decode the next value into `slot`, leaving it untouched on failure
    ///
    /// Chainable; inspect the outcome with [`check`](Self::check).
    #[inline]
    pub fn get_into<T: Decode>(&mut self, slot: &mut T) -> &mut Self {
        if let Ok(value) = self.get::<T>() {
            *slot = value;
        }
        self
    }

    /// Get a slice of everything written so far
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        self.buf.data()
    }

    /// Total number of bytes written
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if nothing has been written
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Current read offset, [`POISONED`] after a failure
    #[inline]
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Unread bytes starting at the read offset
    #[inline]
    pub fn current(&self) -> &[u8] {
        if self.is_poisoned() {
            return &[];
        }
        &self.buf.data()[self.offset..]
    }

    /// Get remaining unread bytes
    #[inline]
    pub fn remaining(&self) -> usize {
        if self.is_poisoned() {
            return 0;
        }
        self.buf.len() - self.offset
    }

    /// Check if every written byte has been read
    #[inline]
    pub fn is_at_end(&self) -> bool {
        !self.is_poisoned() && self.offset >= self.buf.len()
    }

    /// Mark the cursor as failed, remembering the first cause
    #[inline]
    pub fn poison(&mut self, cause: Error) {
        self.offset = POISONED;
        if self.fault.is_none() {
            self.fault = Some(cause);
        }
    }

    /// Check whether a previous read failed
    #[inline]
    pub fn is_poisoned(&self) -> bool {
        self.offset == POISONED
    }

    /// The error that poisoned this cursor, if any
    #[inline]
    pub fn error(&self) -> Option<Error> {
        self.fault
    }

    /// Single success query for a chain of reads
    #[inline]
    pub fn check(&self) -> Result<()> {
        match self.fault {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Fail fast on a poisoned cursor
    #[inline]
    pub fn check_readable(&self) -> Result<()> {
        if self.is_poisoned() {
            return Err(Error::Poisoned);
        }
        Ok(())
    }

    /// Record `err` as the poison cause and hand it back
    #[inline]
    pub fn fail(&mut self, err: Error) -> Error {
        if err != Error::Poisoned {
            self.poison(err);
        }
        err
    }

    /// Read `n` bytes and advance, poisoning on underrun
    #[inline]
    pub fn take(&mut self, n: usize) -> Result<&[u8]> {
        self.check_readable()?;
        if self.remaining() < n {
            return Err(self.fail(Error::UnexpectedEof));
        }
        let start = self.offset;
        self.offset += n;
        Ok(&self.buf.data()[start..start + n])
    }

    /// Read exactly `N` bytes into an array
    #[inline]
    pub fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Advance the read offset by `n` bytes already validated by the caller
    #[inline]
    pub(crate) fn advance(&mut self, n: usize) {
        debug_assert!(n <= self.remaining());
        self.offset += n;
    }

    /// Clear the buffer and rewind for a new session
    #[inline]
    pub fn reset(&mut self) {
        self.buf.clear();
        self.offset = 0;
        self.fault = None;
    }

    /// Give back the backing byte sequence
    #[inline]
    pub fn into_inner(self) -> B {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_operations() {
        let mut cursor = Cursor::new();
        cursor.append(&[1, 2, 3, 4, 5, 6, 7, 8]);

        assert_eq!(cursor.len(), 8);
        assert_eq!(cursor.remaining(), 8);
        assert!(!cursor.is_at_end());

        assert_eq!(cursor.take(2).unwrap(), &[1, 2]);
        assert_eq!(cursor.remaining(), 6);
        assert_eq!(cursor.current(), &[3, 4, 5, 6, 7, 8]);

        assert_eq!(cursor.take_array::<6>().unwrap(), [3, 4, 5, 6, 7, 8]);
        assert!(cursor.is_at_end());
        assert!(cursor.check().is_ok());
    }

    #[test]
    fn test_underrun_poisons() {
        let mut cursor = Cursor::from_slice(&[1, 2, 3], Options::default());

        assert_eq!(cursor.take(4), Err(Error::UnexpectedEof));
        assert!(cursor.is_poisoned());
        assert_eq!(cursor.position(), POISONED);
        assert_eq!(cursor.remaining(), 0);
        assert!(cursor.current().is_empty());

        // later reads are no-ops, the first cause is kept
        assert_eq!(cursor.take(1), Err(Error::Poisoned));
        assert_eq!(cursor.check(), Err(Error::UnexpectedEof));
    }

    #[test]
    fn test_poison_idempotent() {
        let mut cursor = Cursor::new();
        cursor.poison(Error::InvalidLengthControl);
        cursor.poison(Error::UnexpectedEof);

        assert!(cursor.is_poisoned());
        assert_eq!(cursor.error(), Some(Error::InvalidLengthControl));
    }

    #[test]
    fn test_append_while_poisoned() {
        let mut cursor = Cursor::new();
        cursor.poison(Error::UnexpectedEof);
        cursor.append(&[9, 9]);

        assert_eq!(cursor.len(), 2);
        assert!(cursor.is_poisoned());
        assert_eq!(cursor.take(1), Err(Error::Poisoned));
    }

    #[test]
    fn test_reset_starts_new_session() {
        let mut cursor = Cursor::new();
        cursor.append(&[1]);
        let _ = cursor.take(2);
        assert!(cursor.is_poisoned());

        cursor.reset();
        assert!(!cursor.is_poisoned());
        assert!(cursor.is_empty());
        assert_eq!(cursor.check(), Ok(()));

        cursor.append(&[7]);
        assert_eq!(cursor.take(1).unwrap(), &[7]);
    }

    #[test]
    fn test_borrowed_reads_in_place() {
        let bytes = [5u8, 6, 7];
        let mut cursor = Cursor::borrowed(&bytes, Options::default());
        assert_eq!(cursor.get::<u8>().unwrap(), 5);
        assert_eq!(cursor.current(), &[6, 7]);
        assert!(matches!(cursor.into_inner(), Cow::Borrowed(_)));

        let mut cursor = Cursor::borrowed(&bytes, Options::default());
        cursor.append(&[8]);
        assert_eq!(cursor.as_slice(), &[5, 6, 7, 8]);
        assert!(matches!(cursor.into_inner(), Cow::Owned(_)));

        let mut cursor = Cursor::borrowed(&bytes, Options::default());
        cursor.reset();
        assert!(cursor.is_empty());
        assert!(matches!(cursor.into_inner(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_into_inner() {
        let mut cursor = Cursor::new();
        cursor.append(b"abc");
        let buf: Vec<u8> = cursor.into_inner();
        assert_eq!(buf, b"abc");
    }
}
