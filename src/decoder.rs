//! Decoding sessions and one-shot decoding
//!
//! [`Decoder::open`] validates the frame (when the options expect one) and
//! exposes the body through a [`Cursor`]. Frame problems are reported before
//! any value is read. Unframed and uncompressed bodies are read in place.

use alloc::borrow::Cow;
use alloc::vec::Vec;

use crate::buffer::Cursor;
use crate::codec::Decode;
use crate::crc32c;
use crate::error::{Error, Result};
use crate::frame::{FrameFlags, FrameHeader};
use crate::options::Options;

/// Multi-value decoding session
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    cursor: Cursor<Cow<'a, [u8]>>,
    header: Option<FrameHeader>,
}

impl<'a> Decoder<'a> {
    /// Open `bytes` for reading under `options`
    ///
    /// Framed input must be exactly one frame: magic, version, flags, length
    /// and checksum are all checked, and the compaction flag must match
    /// `options`.
    pub fn open(bytes: &'a [u8], options: Options) -> Result<Self> {
        if !options.is_supported() {
            return Err(Error::UnsupportedOptions);
        }
        if !options.has_header() {
            return Ok(Self {
                cursor: Cursor::borrowed(bytes, options),
                header: None,
            });
        }

        let (header, body) = open_frame(bytes, options).map_err(reject)?;

        #[cfg(feature = "tracing")]
        tracing::trace!(len = header.len, flags = header.flags, "opened frame");

        Ok(Self {
            cursor: Cursor::from_sequence(body, options),
            header: Some(header),
        })
    }

    /// Header of the opened frame, `None` for unframed input
    #[inline]
    pub fn header(&self) -> Option<FrameHeader> {
        self.header
    }

    /// Options this session was opened with
    #[inline]
    pub fn options(&self) -> Options {
        self.cursor.options()
    }

    /// Decode the next value from the body
    #[inline]
    pub fn get<T: Decode>(&mut self) -> Result<T> {
        self.cursor.get()
    }

    /// Decode the next value into `slot`; chainable
    #[inline]
    pub fn get_into<T: Decode>(&mut self, slot: &mut T) -> &mut Self {
        self.cursor.get_into(slot);
        self
    }

    /// Unread body bytes
    #[inline]
    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    /// End the session, requiring every body byte to have been read
    ///
    /// Reports the first read failure if any read failed.
    pub fn finish(self) -> Result<()> {
        self.cursor.check()?;
        if !self.cursor.is_at_end() {
            return Err(Error::TrailingBytes);
        }
        Ok(())
    }
}

fn open_frame(bytes: &[u8], options: Options) -> Result<(FrameHeader, Cow<'_, [u8]>)> {
    let header = FrameHeader::decode(bytes)?;
    let total = header.total_size();
    if bytes.len() < total {
        return Err(Error::UnexpectedEof);
    }
    if bytes.len() > total {
        return Err(Error::TrailingBytes);
    }

    let crc_at = total - FrameHeader::CRC_SIZE;
    let stored = u32::from_le_bytes([
        bytes[crc_at],
        bytes[crc_at + 1],
        bytes[crc_at + 2],
        bytes[crc_at + 3],
    ]);
    if !crc32c::verify_crc32c(&bytes[..crc_at], stored) {
        return Err(Error::CrcMismatch);
    }

    header.check_options(options)?;

    let body = &bytes[FrameHeader::SIZE..crc_at];
    let body = if header.has_flag(FrameFlags::COMPRESSED) {
        Cow::Owned(decompress(body)?)
    } else {
        Cow::Borrowed(body)
    };
    Ok((header, body))
}

#[cfg(feature = "lz4")]
fn decompress(body: &[u8]) -> Result<Vec<u8>> {
    if body.len() < 4 {
        return Err(Error::Decompress);
    }
    let size = u32::from_le_bytes([body[0], body[1], body[2], body[3]]) as usize;
    if size > crate::MAX_FRAME_SIZE {
        return Err(Error::Overflow);
    }
    lz4_flex::block::decompress_size_prepended(body).map_err(|_| Error::Decompress)
}

#[cfg(not(feature = "lz4"))]
fn decompress(_body: &[u8]) -> Result<Vec<u8>> {
    Err(Error::FlagConflict)
}

#[inline]
fn reject(err: Error) -> Error {
    #[cfg(feature = "tracing")]
    tracing::debug!(error = %err, "rejected frame");
    err
}

/// Decode a single value that must span the whole input
pub fn from_bytes<T: Decode>(bytes: &[u8], options: Options) -> Result<T> {
    let mut decoder = Decoder::open(bytes, options)?;
    let value = decoder.get()?;
    decoder.finish()?;
    Ok(value)
}
