//! Packwire: generic binary serialization over an append-only byte cursor
//!
//! Values are written by a [`Cursor`] into a [`ByteSequence`] and read back
//! in the same order. Each type is routed at compile time to one of three
//! codecs: scalars to the primitive codec, collections and tuples to the
//! container codec, and registered records to the composite codec. Nesting
//! works to any depth.
//!
//! # Wire format
//!
//! - Scalars are written at native width and in native byte order.
//! - With [`Options::COMPACTED`], 32 and 64-bit integers use a nibble-prefixed
//!   little-endian form of 1 to 9 bytes.
//! - Variable-size containers write a `u64` element count, then the elements.
//! - Records write their registered fields in order, with no names or tags.
//! - Without [`Options::NO_HEADER`], the body is framed:
//!
//! ```text
//! +-----------+--------+----------+-----------+
//! | Magic u16 | Ver u8 | Flags u8 | Len u32   |
//! +-----------+--------+----------+-----------+
//! | Body (Len bytes)                          |
//! | CRC32C u32 (Castagnoli)                   |
//! +-------------------------------------------+
//! ```
//!
//! # Failure model
//!
//! The first failed read poisons the cursor. Every later read fails without
//! touching the buffer, so a chain of reads can be checked once with
//! [`Cursor::check`].
//!
//! # Example
//!
//! ```rust
//! use packwire::*;
//!
//! #[derive(Debug, PartialEq)]
//! struct Trade {
//!     seq: u32,
//!     price: i64,
//!     symbol: String,
//! }
//!
//! record!(Trade { seq: u32, price: i64, symbol: String });
//!
//! let trade = Trade { seq: 12345, price: 50_000_000, symbol: "AAPL".into() };
//! let ops = Options::BINARY | Options::COMPACTED;
//!
//! let bytes = to_vec(&trade, ops)?;
//! let decoded: Trade = from_bytes(&bytes, ops)?;
//! assert_eq!(decoded, trade);
//! # Ok::<(), packwire::Error>(())
//! ```

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod buffer;
pub mod codec;
pub mod compact;
pub mod container;
pub mod crc32c;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod frame;
pub mod options;
pub mod primitive;
pub mod record;

// Re-export main types
pub use buffer::{ByteSequence, Cursor, POISONED};
pub use codec::{Category, Decode, Encode, Shape};
pub use decoder::{from_bytes, Decoder};
pub use encoder::{encode_into, encoded_len, to_vec, Encoder};
pub use error::{Error, Result};
pub use frame::{FrameFlags, FrameHeader};
pub use options::Options;
pub use record::Record;

/// Magic number for frame identification
pub const FRAME_MAGIC: u16 = 0xB1CA;

/// Current wire format version
pub const FORMAT_VERSION: u8 = 1;

/// Minimum frame size (8 bytes header + 4 bytes crc32c)
pub const MIN_FRAME_SIZE: usize = 12;

/// Maximum frame size (16MB - safety limit)
pub const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;
