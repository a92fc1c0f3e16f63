//! CRC32C (Castagnoli) checksum over frame header and body
//!
//! Table-driven software implementation. [`Crc32c`] hashes incrementally so
//! the header and body can be covered without joining them first.

/// Reflected Castagnoli polynomial
const POLYNOMIAL: u32 = 0x82F6_3B78;

static TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ POLYNOMIAL
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Running CRC32C state
#[derive(Debug, Clone, Copy)]
pub struct Crc32c {
    state: u32,
}

impl Default for Crc32c {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc32c {
    /// Start a new checksum
    #[inline]
    pub const fn new() -> Self {
        Self { state: !0 }
    }

    /// Feed more bytes
    #[inline]
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        let mut crc = self.state;
        for &byte in data {
            crc = (crc >> 8) ^ TABLE[((crc ^ u32::from(byte)) & 0xFF) as usize];
        }
        self.state = crc;
        self
    }

    /// Checksum of everything fed so far
    #[inline]
    pub fn finish(&self) -> u32 {
        !self.state
    }
}

/// Compute the CRC32C of `data`
#[inline]
pub fn crc32c(data: &[u8]) -> u32 {
    Crc32c::new().update(data).finish()
}

/// Check `data` against an expected checksum
#[inline]
pub fn verify_crc32c(data: &[u8], expected: u32) -> bool {
    crc32c(data) == expected
}
