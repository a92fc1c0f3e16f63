//! Error types for the packwire codec

/// Errors that can occur while encoding or decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A decode step needed more bytes than remain in the cursor
    UnexpectedEof,
    /// Compacted integer carries a length control nibble wider than its type
    InvalidLengthControl,
    /// A string was decoded with a declared length of zero
    EmptyString,
    /// The cursor was already poisoned by an earlier failure
    Poisoned,
    /// Byte is neither 0 nor 1 where a bool was expected
    InvalidBool,
    /// Value is not a Unicode scalar value
    InvalidChar,
    /// String payload is not valid UTF-8
    InvalidUtf8,
    /// Decoded size does not fit the host, or exceeds a configured limit
    Overflow,
    /// Invalid magic number in frame header
    InvalidMagic,
    /// Unsupported format version
    UnsupportedVersion,
    /// Frame flags are reserved or disagree with the decoder options
    FlagConflict,
    /// CRC32C checksum mismatch
    CrcMismatch,
    /// Input left unread after the requested value was decoded
    TrailingBytes,
    /// Option combination has no implemented wire format
    UnsupportedOptions,
    /// Compressed body could not be decompressed
    Decompress,
}

impl Error {
    /// Returns a human-readable description of the error
    pub const fn description(&self) -> &'static str {
        match self {
            Error::UnexpectedEof => "unexpected end of input",
            Error::InvalidLengthControl => "invalid length control nibble",
            Error::EmptyString => "string with declared length zero",
            Error::Poisoned => "cursor poisoned by an earlier failure",
            Error::InvalidBool => "invalid bool byte",
            Error::InvalidChar => "invalid unicode scalar value",
            Error::InvalidUtf8 => "string is not valid UTF-8",
            Error::Overflow => "size overflow",
            Error::InvalidMagic => "invalid magic number in frame header",
            Error::UnsupportedVersion => "unsupported format version",
            Error::FlagConflict => "conflicting flags in frame header",
            Error::CrcMismatch => "CRC32C checksum verification failed",
            Error::TrailingBytes => "trailing bytes after decoded value",
            Error::UnsupportedOptions => "unsupported serialization options",
            Error::Decompress => "failed to decompress frame body",
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.description())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias for packwire operations
pub type Result<T> = core::result::Result<T, Error>;
