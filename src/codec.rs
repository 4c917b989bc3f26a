//! Bit-level encoding with a code table and decoding by tree walk.

use crate::bit_buffer::BitBuffer;
use crate::code_table::CodeTable;
use crate::error::{CompressError, Result};
use crate::frequency::{from_symbol, to_symbol};
use crate::tree::Node;

/// Encode `text` symbol by symbol.
pub fn encode(text: &str, codes: &CodeTable) -> Result<BitBuffer> {
    encode_counted(text, codes).map(|(bits, _)| bits)
}

/// Like [`encode`], also returning how many symbols were written.
pub fn encode_counted(text: &str, codes: &CodeTable) -> Result<(BitBuffer, usize)> {
    let mut bits = BitBuffer::with_capacity(text.len());
    let mut count = 0;
    for c in text.chars() {
        push_symbol(&mut bits, to_symbol(c)?, codes)?;
        count += 1;
    }
    Ok((bits, count))
}

/// Encode raw bytes, one symbol per byte.
pub fn encode_bytes(data: &[u8], codes: &CodeTable) -> Result<BitBuffer> {
    let mut bits = BitBuffer::with_capacity(data.len());
    for &symbol in data {
        push_symbol(&mut bits, symbol, codes)?;
    }
    Ok(bits)
}

fn push_symbol(bits: &mut BitBuffer, symbol: u8, codes: &CodeTable) -> Result<()> {
    let code = codes
        .get(symbol)
        .ok_or(CompressError::UnknownSymbol(symbol))?;
    bits.extend_code(code);
    Ok(())
}

/// Decode exactly `symbol_count` symbols from `bits`. Bits left over after
/// the last symbol are padding and are ignored.
pub fn decode(bits: &BitBuffer, root: &Node, symbol_count: usize) -> Result<String> {
    Ok(decode_bytes(bits, root, symbol_count)?
        .into_iter()
        .map(from_symbol)
        .collect())
}

/// Decode `symbol_count` raw bytes from `bits`.
pub fn decode_bytes(bits: &BitBuffer, root: &Node, symbol_count: usize) -> Result<Vec<u8>> {
    // every symbol costs at least one bit
    let mut output = Vec::with_capacity(symbol_count.min(bits.len()));
    let mut stream = bits.iter();
    while output.len() < symbol_count {
        match next_symbol(root, &mut stream)? {
            Some(symbol) => output.push(symbol),
            None => {
                return Err(CompressError::truncated(
                    format!("{symbol_count} symbols"),
                    format!("{} symbols from {} bits", output.len(), bits.len()),
                ))
            }
        }
    }
    Ok(output)
}

/// Walk from `root` to a leaf. `Ok(None)` means the stream ran out first.
fn next_symbol(root: &Node, stream: &mut impl Iterator<Item = bool>) -> Result<Option<u8>> {
    if let Node::Leaf { symbol, .. } = root {
        return match stream.next() {
            Some(false) => Ok(Some(*symbol)),
            Some(true) => Err(CompressError::MalformedTree(
                "bit 1 has no branch under a single-leaf tree".into(),
            )),
            None => Ok(None),
        };
    }

    let mut node = root;
    loop {
        match node {
            Node::Leaf { symbol, .. } => return Ok(Some(*symbol)),
            Node::Internal { left, right, .. } => {
                let Some(bit) = stream.next() else {
                    return Ok(None);
                };
                node = if bit { right } else { left };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;
    use crate::tree;

    fn setup(text: &str) -> (Node, CodeTable) {
        let root = tree::build(&FrequencyTable::count(text).unwrap()).unwrap();
        let codes = CodeTable::derive(&root);
        (root, codes)
    }

    #[test]
    fn test_hello_world_roundtrip() {
        let text = "Hello World";
        let (root, codes) = setup(text);
        let bits = encode(text, &codes).unwrap();
        assert!(bits.len() < text.len() * 8);
        assert_eq!(decode(&bits, &root, text.len()).unwrap(), text);
    }

    #[test]
    fn test_single_symbol_roundtrip() {
        let (root, codes) = setup("aaaa");
        let bits = encode("aaaa", &codes).unwrap();
        assert_eq!(bits.to_string(), "0000");
        assert_eq!(decode(&bits, &root, 4).unwrap(), "aaaa");
    }

    #[test]
    fn test_padding_not_decoded() {
        let text = "abcabc";
        let (root, codes) = setup(text);
        let bits = encode(text, &codes).unwrap();
        let byte_len = bits.as_bytes().len();
        let padded = BitBuffer::from_packed(bits.as_bytes().to_vec(), byte_len * 8).unwrap();
        assert_eq!(decode(&padded, &root, text.len()).unwrap(), text);
    }

    #[test]
    fn test_encode_counted_reports_symbols() {
        let text = "na\u{ef}ve";
        let (_, codes) = setup(text);
        let (bits, count) = encode_counted(text, &codes).unwrap();
        assert_eq!(count, 5);
        assert_eq!(bits, encode(text, &codes).unwrap());
    }

    #[test]
    fn test_unknown_symbol() {
        let (_, codes) = setup("abc");
        let result = encode("abd", &codes);
        assert!(matches!(result, Err(CompressError::UnknownSymbol(b'd'))));
    }

    #[test]
    fn test_truncated_bits() {
        let text = "mississippi";
        let (root, codes) = setup(text);
        let bits = encode(text, &codes).unwrap();
        let short: String = bits.to_string().chars().take(bits.len() - 3).collect();
        let mut cut = BitBuffer::new();
        cut.extend_code(&short.chars().map(|c| c == '1').collect::<Vec<_>>());
        let result = decode(&cut, &root, text.len());
        assert!(matches!(result, Err(CompressError::TruncatedStream { .. })));
    }

    #[test]
    fn test_single_leaf_rejects_one_bit() {
        let root = Node::leaf(b'q', 3);
        let mut bits = BitBuffer::new();
        bits.extend_code(&[false, true]);
        let result = decode_bytes(&bits, &root, 2);
        assert!(matches!(result, Err(CompressError::MalformedTree(_))));
    }

    #[test]
    fn test_latin1_text_roundtrip() {
        let text = "na\u{ef}ve caf\u{e9} \u{a9}";
        let (root, codes) = setup(text);
        let bits = encode(text, &codes).unwrap();
        assert_eq!(decode(&bits, &root, text.chars().count()).unwrap(), text);
    }
}
