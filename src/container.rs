//! Binary container holding a serialized tree and the packed payload.
//!
//! Layout, all integers big-endian:
//!
//! ```text
//! [u32] tree bit length
//! [..]  tree bits, preorder: 1 = internal, 0 = leaf followed by 8 symbol bits
//! [u32] payload bit length
//! [u32] symbol count
//! [..]  payload bits
//! ```
//!
//! Both bit sections are packed MSB-first and zero-padded to a whole byte.

use crate::bit_buffer::BitBuffer;
use crate::error::{CompressError, Result};
use crate::frequency::ALPHABET_SIZE;
use crate::tree::Node;
use crate::EncodedDocument;
use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use std::io::{self, Read, Write};

const SYMBOL_BITS: u32 = 8;

/// Bits taken by the preorder form of `root`.
pub fn tree_bit_len(root: &Node) -> usize {
    let leaves = root.leaf_count();
    leaves * (1 + SYMBOL_BITS as usize) + (leaves - 1)
}

/// Serialize `doc` into `writer`. Returns the number of bytes written.
pub fn write<W: Write>(writer: W, doc: &EncodedDocument) -> Result<usize> {
    let tree_bits = tree_bit_len(doc.tree());
    let tree_len = length_field(tree_bits)?;
    let data_len = length_field(doc.bits().len())?;
    let symbol_count = length_field(doc.symbol_count())?;

    let mut w = BitWriter::endian(writer, BigEndian);
    w.write(32, tree_len)?;
    write_tree(&mut w, doc.tree())?;
    w.byte_align()?;
    w.write(32, data_len)?;
    w.write(32, symbol_count)?;
    w.write_bytes(doc.bits().as_bytes())?;
    w.into_writer().flush()?;

    let written = 4 + tree_bits.div_ceil(8) + 8 + doc.bits().as_bytes().len();
    tracing::debug!(
        tree_bits,
        data_bits = doc.bits().len(),
        written,
        "wrote container"
    );
    Ok(written)
}

/// Parse a container from `reader`.
pub fn read<R: Read>(reader: R) -> Result<EncodedDocument> {
    let mut r = BitReader::endian(reader, BigEndian);
    let tree_len: u32 = r.read(32).map_err(eof("tree bit length"))?;
    if tree_len == 0 {
        return Err(CompressError::MalformedTree("tree section is empty".into()));
    }
    let tree = read_tree(&mut r, tree_len as usize)?;
    r.byte_align();

    let data_len: u32 = r.read(32).map_err(eof("payload bit length"))?;
    let symbol_count: u32 = r.read(32).map_err(eof("symbol count"))?;
    if symbol_count == 0 {
        return Err(CompressError::EmptyInput);
    }

    let byte_len = (data_len as usize).div_ceil(8);
    let mut data = Vec::new();
    r.into_reader()
        .take(byte_len as u64)
        .read_to_end(&mut data)?;
    let bits = BitBuffer::from_packed(data, data_len as usize)?;

    tracing::debug!(tree_len, data_len, symbol_count, "read container");
    Ok(EncodedDocument::from_parts(tree, bits, symbol_count as usize))
}

fn length_field(value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| CompressError::InputTooLarge {
        size: value,
        limit: u32::MAX as usize,
    })
}

fn eof(what: &'static str) -> impl Fn(io::Error) -> CompressError {
    move |err| {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            CompressError::truncated(what, "end of stream")
        } else {
            CompressError::IoError(err)
        }
    }
}

fn write_tree<W: BitWrite>(w: &mut W, root: &Node) -> io::Result<()> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        match node {
            Node::Leaf { symbol, .. } => {
                w.write_bit(false)?;
                w.write(SYMBOL_BITS, *symbol)?;
            }
            Node::Internal { left, right, .. } => {
                w.write_bit(true)?;
                stack.push(right);
                stack.push(left);
            }
        }
    }
    Ok(())
}

/// Rebuild a tree from exactly `bit_len` preorder bits. Leaves carry
/// weight 0 since weights are not stored.
fn read_tree<R: BitRead>(r: &mut R, bit_len: usize) -> Result<Node> {
    let mut consumed = 0usize;
    let mut seen = [false; ALPHABET_SIZE];
    // internal nodes still waiting for children; `Some` once the left one is done
    let mut pending: Vec<Option<Node>> = Vec::new();

    let root = 'parse: loop {
        let mut node = if take_bits(r, &mut consumed, bit_len, 1)? == 1 {
            // a full tree over 256 leaves is at most 255 levels deep
            if pending.len() >= ALPHABET_SIZE - 1 {
                return Err(CompressError::MalformedTree(
                    "tree deeper than the alphabet allows".into(),
                ));
            }
            pending.push(None);
            continue;
        } else {
            let symbol = take_bits(r, &mut consumed, bit_len, SYMBOL_BITS)? as u8;
            if std::mem::replace(&mut seen[symbol as usize], true) {
                return Err(CompressError::MalformedTree(format!(
                    "symbol {symbol:#04x} appears in more than one leaf"
                )));
            }
            Node::leaf(symbol, 0)
        };

        loop {
            match pending.pop() {
                None => break 'parse node,
                Some(None) => {
                    pending.push(Some(node));
                    break;
                }
                Some(Some(left)) => node = Node::internal(left, node),
            }
        }
    };

    if consumed != bit_len {
        return Err(CompressError::MalformedTree(format!(
            "tree ends after {consumed} of {bit_len} bits"
        )));
    }
    Ok(root)
}

fn take_bits<R: BitRead>(
    r: &mut R,
    consumed: &mut usize,
    bit_len: usize,
    bits: u32,
) -> Result<u32> {
    if *consumed + bits as usize > bit_len {
        return Err(CompressError::MalformedTree(format!(
            "tree needs more than the declared {bit_len} bits"
        )));
    }
    let value = r.read::<u32>(bits).map_err(eof("tree bits"))?;
    *consumed += bits as usize;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(text: &str) -> EncodedDocument {
        let doc = EncodedDocument::from_text(text).unwrap();
        let mut bytes = Vec::new();
        let written = write(&mut bytes, &doc).unwrap();
        assert_eq!(written, bytes.len());
        read(bytes.as_slice()).unwrap()
    }

    #[test]
    fn test_container_roundtrip() {
        let text = "Hello World";
        let restored = roundtrip(text);
        assert_eq!(restored.symbol_count(), 11);
        assert_eq!(restored.decode().unwrap(), text);
        assert_eq!(
            restored.code_table(),
            EncodedDocument::from_text(text).unwrap().code_table()
        );
    }

    #[test]
    fn test_layout_for_two_symbols() {
        // tree: 1 0'a' 0'b' -> 19 bits; payload "ab" -> 01
        let doc = EncodedDocument::from_text("ab").unwrap();
        let mut bytes = Vec::new();
        write(&mut bytes, &doc).unwrap();
        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            0, 0, 0, 19,
            0b1001_1000, 0b0100_1100, 0b0100_0000,
            0, 0, 0, 2,
            0, 0, 0, 2,
            0b0100_0000,
        ];
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_single_leaf_container() {
        let restored = roundtrip("zzzzz");
        assert!(restored.tree().is_leaf());
        assert_eq!(restored.decode().unwrap(), "zzzzz");
    }

    #[test]
    fn test_truncated_payload() {
        let doc = EncodedDocument::from_text("the quick brown fox").unwrap();
        let mut bytes = Vec::new();
        write(&mut bytes, &doc).unwrap();
        bytes.pop();
        let result = read(bytes.as_slice());
        assert!(matches!(result, Err(CompressError::TruncatedStream { .. })));
    }

    #[test]
    fn test_truncated_header() {
        let result = read(&[0u8, 0, 1][..]);
        assert!(matches!(result, Err(CompressError::TruncatedStream { .. })));
    }

    #[test]
    fn test_tree_length_mismatch() {
        let doc = EncodedDocument::from_text("abc").unwrap();
        let mut bytes = Vec::new();
        write(&mut bytes, &doc).unwrap();
        // claim one extra tree bit
        bytes[3] += 1;
        let result = read(bytes.as_slice());
        assert!(matches!(result, Err(CompressError::MalformedTree(_))));
    }

    #[test]
    fn test_duplicate_leaf_rejected() {
        // 1 0'a' 0'a'
        #[rustfmt::skip]
        let bytes = vec![
            0, 0, 0, 19,
            0b1001_1000, 0b0100_1100, 0b0010_0000,
            0, 0, 0, 1,
            0, 0, 0, 1,
            0,
        ];
        let result = read(bytes.as_slice());
        assert!(matches!(result, Err(CompressError::MalformedTree(_))));
    }

    #[test]
    fn test_zero_symbol_count_rejected() {
        let doc = EncodedDocument::from_text("ab").unwrap();
        let mut bytes = Vec::new();
        write(&mut bytes, &doc).unwrap();
        // tree length, 3 tree bytes and data length precede the count
        bytes[11..15].copy_from_slice(&[0, 0, 0, 0]);
        let result = read(bytes.as_slice());
        assert!(matches!(result, Err(CompressError::EmptyInput)));
    }

    #[test]
    fn test_empty_tree_rejected() {
        let bytes = vec![0u8; 12];
        let result = read(bytes.as_slice());
        assert!(matches!(result, Err(CompressError::MalformedTree(_))));
    }

    #[test]
    fn test_runaway_internal_markers() {
        let mut bytes = vec![0, 0, 1, 0];
        bytes.extend(std::iter::repeat(0xFF).take(32));
        let result = read(bytes.as_slice());
        assert!(matches!(result, Err(CompressError::MalformedTree(_))));
    }
}
