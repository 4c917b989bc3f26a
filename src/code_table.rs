//! Symbol to prefix-free code mapping derived from a Huffman tree.

use crate::frequency::{FrequencyTable, ALPHABET_SIZE};
use crate::tree::Node;

/// Codes indexed by symbol value; `false` is a left branch, `true` a right one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: [Option<Vec<bool>>; ALPHABET_SIZE],
}

impl CodeTable {
    /// Walk `root` and record the path to every leaf. A tree that is a
    /// single leaf gets the one-bit code `0`.
    pub fn derive(root: &Node) -> Self {
        let mut table = Self {
            codes: std::array::from_fn(|_| None),
        };
        if let Node::Leaf { symbol, .. } = root {
            table.codes[*symbol as usize] = Some(vec![false]);
        } else {
            let mut prefix = Vec::new();
            table.collect(root, &mut prefix);
        }
        table
    }

    fn collect(&mut self, node: &Node, prefix: &mut Vec<bool>) {
        match node {
            Node::Leaf { symbol, .. } => {
                self.codes[*symbol as usize] = Some(prefix.clone());
            }
            Node::Internal { left, right, .. } => {
                prefix.push(false);
                self.collect(left, prefix);
                prefix.pop();
                prefix.push(true);
                self.collect(right, prefix);
                prefix.pop();
            }
        }
    }

    /// Code for `symbol`, or `None` if the tree has no such leaf.
    pub fn get(&self, symbol: u8) -> Option<&[bool]> {
        self.codes[symbol as usize].as_deref()
    }

    /// Entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &[bool])> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_deref().map(|c| (symbol as u8, c)))
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total payload bits needed to encode text with these frequencies.
    /// `None` if a counted symbol has no code.
    pub fn encoded_bits(&self, table: &FrequencyTable) -> Option<u64> {
        table
            .iter()
            .map(|(symbol, count)| self.get(symbol).map(|code| code.len() as u64 * count))
            .sum()
    }
}
