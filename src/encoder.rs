//! Encoding sessions and one-shot encoding
//!
//! An [`Encoder`] collects the body in a [`Cursor`] and, unless the options
//! carry [`Options::NO_HEADER`], wraps it in a frame on [`Encoder::finish`].

use alloc::vec::Vec;

use crate::buffer::{ByteSequence, Cursor};
use crate::codec::Encode;
use crate::crc32c::Crc32c;
use crate::error::{Error, Result};
use crate::frame::FrameHeader;
#[cfg(feature = "lz4")]
use crate::frame::FrameFlags;
use crate::options::Options;
use crate::MAX_FRAME_SIZE;

/// Multi-value encoding session
#[derive(Debug, Clone)]
pub struct Encoder {
    cursor: Cursor,
    #[cfg(feature = "lz4")]
    compress: bool,
}

impl Encoder {
    /// Start a session, rejecting options without a binary wire format
    #[inline]
    pub fn new(options: Options) -> Result<Self> {
        if !options.is_supported() {
            return Err(Error::UnsupportedOptions);
        }
        Ok(Self {
            cursor: Cursor::with_options(options),
            #[cfg(feature = "lz4")]
            compress: false,
        })
    }

    /// LZ4-compress the body when it is framed
    #[cfg(feature = "lz4")]
    #[inline]
    pub fn compressed(mut self) -> Self {
        self.compress = true;
        self
    }

    /// Options this session was started with
    #[inline]
    pub fn options(&self) -> Options {
        self.cursor.options()
    }

    /// Encode a value and append it to the body
    #[inline]
    pub fn put<T: Encode + ?Sized>(&mut self, value: &T) -> &mut Self {
        self.cursor.put(value);
        self
    }

    /// Body bytes written so far
    #[inline]
    pub fn body(&self) -> &[u8] {
        self.cursor.as_slice()
    }

    /// Body length in bytes
    #[inline]
    pub fn body_len(&self) -> usize {
        self.cursor.len()
    }

    /// Drop the body written so far
    #[inline]
    pub fn reset(&mut self) {
        self.cursor.reset();
    }

    /// Finish the session and return the output bytes
    ///
    /// With `NO_HEADER` this is the bare body. Otherwise the body is framed
    /// with a header and a trailing CRC32C.
    pub fn finish(self) -> Result<Vec<u8>> {
        let options = self.cursor.options();
        let body = self.cursor.into_inner();
        if !options.has_header() {
            return Ok(body);
        }

        let mut header = FrameHeader::for_options(options, 0);

        #[cfg(feature = "lz4")]
        let body = if self.compress {
            header.set_flag(FrameFlags::COMPRESSED);
            lz4_flex::block::compress_prepend_size(&body)
        } else {
            body
        };

        header.len = u32::try_from(body.len()).map_err(|_| Error::Overflow)?;
        if header.total_size() > MAX_FRAME_SIZE {
            return Err(Error::Overflow);
        }
        Ok(seal(&header, &body))
    }
}

/// Lay out header, body and checksum
fn seal(header: &FrameHeader, body: &[u8]) -> Vec<u8> {
    let head = header.encode();
    let crc = Crc32c::new().update(&head).update(body).finish();

    let mut frame = Vec::with_capacity(header.total_size());
    frame.extend_from_slice(&head);
    frame.extend_from_slice(body);
    frame.extend_from_slice(&crc.to_le_bytes());
    frame
}

/// Encode a single value into a new buffer
pub fn to_vec<T: Encode + ?Sized>(value: &T, options: Options) -> Result<Vec<u8>> {
    let mut encoder = Encoder::new(options)?;
    encoder.put(value);
    encoder.finish()
}

/// Append the encoding of a value to an existing byte sequence
///
/// Only unframed output (`NO_HEADER`) can be appended. Returns the number of
/// bytes written.
pub fn encode_into<T, B>(value: &T, sink: &mut B, options: Options) -> Result<usize>
where
    T: Encode + ?Sized,
    B: ByteSequence + ?Sized,
{
    if !options.is_supported() || options.has_header() {
        return Err(Error::UnsupportedOptions);
    }
    let before = sink.len();
    let mut cursor = Cursor::from_sequence(&mut *sink, options);
    cursor.put(value);
    Ok(cursor.len() - before)
}

/// Body size of a value under `options`, without any frame
pub fn encoded_len<T: Encode + ?Sized>(value: &T, options: Options) -> usize {
    let mut cursor = Cursor::with_options(options);
    cursor.put(value);
    cursor.len()
}
