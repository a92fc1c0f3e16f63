//! Frame header for enveloped output
//!
//! ```text
//! +-----------+--------+----------+-----------+
//! | Magic u16 | Ver u8 | Flags u8 | Len u32   |
//! +-----------+--------+----------+-----------+
//! | Body (Len bytes)                          |
//! | CRC32C u32 over header + body             |
//! +-------------------------------------------+
//! ```

use crate::error::{Error, Result};
use crate::options::Options;
use crate::{FORMAT_VERSION, FRAME_MAGIC, MAX_FRAME_SIZE};

/// Frame header (8 bytes, little-endian)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Magic number (0xB1CA)
    pub magic: u16,
    /// Format version
    pub ver: u8,
    /// Frame flags
    pub flags: u8,
    /// Body length in bytes, as stored
    pub len: u32,
}

/// Frame flags bit definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameFlags;

impl FrameFlags {
    /// Body integers are compacted (bit 0)
    pub const COMPACTED: u8 = 0x01;

    /// Body is LZ4 compressed (bit 1)
    pub const COMPRESSED: u8 = 0x02;

    /// Reserved flags mask
    pub const RESERVED: u8 = 0xFC;
}

impl Default for FrameHeader {
    fn default() -> Self {
        Self::new(0)
    }
}

impl FrameHeader {
    /// Header size in bytes
    pub const SIZE: usize = 8;

    /// Trailing checksum size in bytes
    pub const CRC_SIZE: usize = 4;

    /// Create a header for a body of `len` bytes
    #[inline]
    pub fn new(len: u32) -> Self {
        Self {
            magic: FRAME_MAGIC,
            ver: FORMAT_VERSION,
            flags: 0,
            len,
        }
    }

    /// Create a header whose flags mirror `options`
    #[inline]
    pub fn for_options(options: Options, len: u32) -> Self {
        let mut header = Self::new(len);
        if options.is_compacted() {
            header.set_flag(FrameFlags::COMPACTED);
        }
        header
    }

    /// Set a flag bit
    #[inline]
    pub fn set_flag(&mut self, flag: u8) {
        self.flags |= flag;
    }

    /// Clear a flag bit
    #[inline]
    pub fn clear_flag(&mut self, flag: u8) {
        self.flags &= !flag;
    }

    /// Check if a flag bit is set
    #[inline]
    pub fn has_flag(&self, flag: u8) -> bool {
        self.flags & flag != 0
    }

    /// Check the header against what this build can read
    pub fn validate(&self) -> Result<()> {
        if self.magic != FRAME_MAGIC {
            return Err(Error::InvalidMagic);
        }
        if self.ver != FORMAT_VERSION {
            return Err(Error::UnsupportedVersion);
        }
        if self.flags & FrameFlags::RESERVED != 0 {
            return Err(Error::FlagConflict);
        }
        if cfg!(not(feature = "lz4")) && self.has_flag(FrameFlags::COMPRESSED) {
            return Err(Error::FlagConflict);
        }
        if self.total_size() > MAX_FRAME_SIZE {
            return Err(Error::Overflow);
        }
        Ok(())
    }

    /// Check that the compaction flag agrees with the reader's options
    #[inline]
    pub fn check_options(&self, options: Options) -> Result<()> {
        if self.has_flag(FrameFlags::COMPACTED) != options.is_compacted() {
            return Err(Error::FlagConflict);
        }
        Ok(())
    }

    /// Encode header to bytes (little-endian)
    #[inline]
    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0..2].copy_from_slice(&self.magic.to_le_bytes());
        buf[2] = self.ver;
        buf[3] = self.flags;
        buf[4..8].copy_from_slice(&self.len.to_le_bytes());
        buf
    }

    /// Decode and validate a header from the start of `buf`
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < Self::SIZE {
            return Err(Error::UnexpectedEof);
        }

        let header = Self {
            magic: u16::from_le_bytes([buf[0], buf[1]]),
            ver: buf[2],
            flags: buf[3],
            len: u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
        };

        header.validate()?;
        Ok(header)
    }

    /// Total frame size: header, body and checksum
    #[inline]
    pub fn total_size(&self) -> usize {
        Self::SIZE + self.len as usize + Self::CRC_SIZE
    }
}
