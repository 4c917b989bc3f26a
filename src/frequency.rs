//! Symbol frequency analysis over the 8-bit alphabet.

use crate::error::{CompressError, Result};

/// Number of distinct symbols in the alphabet.
pub const ALPHABET_SIZE: usize = 256;

/// Map a `char` onto its 8-bit symbol (Latin-1).
pub fn to_symbol(c: char) -> Result<u8> {
    u8::try_from(u32::from(c)).map_err(|_| CompressError::UnsupportedSymbol(c))
}

/// Inverse of [`to_symbol`].
pub fn from_symbol(symbol: u8) -> char {
    char::from(symbol)
}

/// Occurrence counts indexed by symbol value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
}

impl FrequencyTable {
    /// Count every symbol of `text`. Fails on empty text or on any
    /// character outside the 8-bit alphabet.
    pub fn count(text: &str) -> Result<Self> {
        let mut counts = [0u64; ALPHABET_SIZE];
        for c in text.chars() {
            counts[to_symbol(c)? as usize] += 1;
        }
        Self::from_counts(counts)
    }

    /// Count raw bytes, one symbol per byte. Fails on empty input.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut counts = [0u64; ALPHABET_SIZE];
        for &b in data {
            counts[b as usize] += 1;
        }
        Self::from_counts(counts)
    }

    fn from_counts(counts: [u64; ALPHABET_SIZE]) -> Result<Self> {
        if counts.iter().all(|&c| c == 0) {
            return Err(CompressError::EmptyInput);
        }
        let distinct = counts.iter().filter(|&&c| c > 0).count();
        tracing::trace!(distinct, "counted symbols");
        Ok(Self { counts })
    }

    /// Occurrences of `symbol`, zero if absent.
    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Present symbols with their counts, in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as u8, count))
    }

    /// Number of symbols with a non-zero count.
    pub fn distinct(&self) -> usize {
        self.iter().count()
    }

    /// Total symbols counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Shannon entropy in bits per symbol.
    pub fn entropy_bits(&self) -> f64 {
        let total = self.total() as f64;
        self.iter()
            .map(|(_, count)| {
                let p = count as f64 / total;
                -p * p.log2()
            })
            .sum()
    }
}
