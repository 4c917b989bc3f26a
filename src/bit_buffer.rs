//! Growable bit sequence packed MSB-first into bytes.

use crate::error::{CompressError, Result};
use std::fmt;

/// Bits in order plus the count of meaningful ones; bytes past `len` are padding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitBuffer {
    bytes: Vec<u8>,
    len: usize,
}

impl BitBuffer {
    /// Empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty buffer with room for `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            len: 0,
        }
    }

    /// Wrap already-packed bytes holding `bit_len` meaningful bits.
    /// Trailing padding bits are cleared.
    pub fn from_packed(mut bytes: Vec<u8>, bit_len: usize) -> Result<Self> {
        let needed = bit_len.div_ceil(8);
        if bytes.len() < needed {
            return Err(CompressError::truncated(
                format!("{needed} bytes"),
                format!("{} bytes", bytes.len()),
            ));
        }
        bytes.truncate(needed);
        let tail = bit_len % 8;
        if tail != 0 {
            if let Some(last) = bytes.last_mut() {
                *last &= 0xFFu8 << (8 - tail);
            }
        }
        Ok(Self { bytes, len: bit_len })
    }

    /// Append one bit.
    pub fn push(&mut self, bit: bool) {
        let offset = self.len % 8;
        if offset == 0 {
            self.bytes.push(0);
        }
        if bit {
            if let Some(last) = self.bytes.last_mut() {
                *last |= 0x80 >> offset;
            }
        }
        self.len += 1;
    }

    /// Append every bit of `code` in order.
    pub fn extend_code(&mut self, code: &[bool]) {
        for &bit in code {
            self.push(bit);
        }
    }

    /// Bit at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some(self.bytes[index / 8] & (0x80 >> (index % 8)) != 0)
    }

    /// Meaningful bits in order, padding excluded.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| self.bytes[i / 8] & (0x80 >> (i % 8)) != 0)
    }

    /// Number of meaningful bits.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Packed bytes; the final byte is zero-padded.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for BitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_packs_msb_first() {
        let mut bits = BitBuffer::new();
        for bit in [true, false, true, true, false, false, false, false, true] {
            bits.push(bit);
        }
        assert_eq!(bits.len(), 9);
        assert_eq!(bits.as_bytes(), &[0b1011_0000, 0b1000_0000]);
        assert_eq!(bits.to_string(), "101100001");
        assert_eq!(bits.get(8), Some(true));
        assert_eq!(bits.get(9), None);
    }

    #[test]
    fn test_from_packed_clears_padding() {
        let bits = BitBuffer::from_packed(vec![0xFF, 0xFF], 10).unwrap();
        assert_eq!(bits.as_bytes(), &[0xFF, 0b1100_0000]);
        assert_eq!(bits.iter().filter(|&b| b).count(), 10);
    }

    #[test]
    fn test_from_packed_too_short() {
        let result = BitBuffer::from_packed(vec![0x00], 9);
        assert!(matches!(result, Err(CompressError::TruncatedStream { .. })));
    }

    #[test]
    fn test_extend_code() {
        let mut bits = BitBuffer::with_capacity(16);
        bits.extend_code(&[false, true]);
        bits.extend_code(&[true]);
        assert_eq!(bits.to_string(), "011");
        assert!(!bits.is_empty());
    }
}
