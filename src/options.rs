//! Serialization options bitmask
//!
//! Options are fixed when a [`Cursor`](crate::Cursor) is built and cannot be
//! changed afterwards. Only `BINARY`, `NO_HEADER` and `COMPACTED` have a wire
//! format; the other flags are reserved.

use core::ops::BitOr;

/// Set of serialization flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Options(u8);

impl Options {
    /// Raw binary output
    pub const BINARY: Options = Options(0x01);
    /// Hex string output (reserved)
    pub const HEX: Options = Options(0x02);
    /// JSON output (reserved)
    pub const JSON: Options = Options(0x04);
    /// Omit the frame header and checksum
    pub const NO_HEADER: Options = Options(0x08);
    /// Nibble-prefixed compaction of 32/64-bit integers
    pub const COMPACTED: Options = Options(0x10);
    /// Output to memory; implied unless `FILE` is set
    pub const MEM: Options = Options(0x20);
    /// Output to a file (reserved)
    pub const FILE: Options = Options(0x40);

    const RESERVED: u8 = Self::HEX.0 | Self::JSON.0 | Self::FILE.0;

    /// Build options from raw bits, applying the `MEM` default
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        if bits & Self::FILE.0 != 0 {
            Options(bits)
        } else {
            Options(bits | Self::MEM.0)
        }
    }

    /// Raw bits
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Combine two option sets
    #[inline]
    pub const fn with(self, other: Options) -> Self {
        Self::from_bits(self.0 | other.0)
    }

    /// Check whether every flag of `other` is set
    #[inline]
    pub const fn contains(self, other: Options) -> bool {
        self.0 & other.0 == other.0
    }

    /// Integers wider than two bytes use the compacted encoding
    #[inline]
    pub const fn is_compacted(self) -> bool {
        self.contains(Self::COMPACTED)
    }

    /// A frame header and checksum wrap the body
    #[inline]
    pub const fn has_header(self) -> bool {
        !self.contains(Self::NO_HEADER)
    }

    /// Validate that the flags describe an implemented wire format
    #[inline]
    pub const fn is_supported(self) -> bool {
        self.contains(Self::BINARY) && self.0 & Self::RESERVED == 0
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::from_bits(Self::BINARY.0 | Self::NO_HEADER.0)
    }
}

impl BitOr for Options {
    type Output = Options;

    fn bitor(self, rhs: Options) -> Options {
        self.with(rhs)
    }
}
