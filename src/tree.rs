//! Huffman tree nodes and construction.

use crate::error::Result;
use crate::frequency::FrequencyTable;
use crate::priority_queue::MinQueue;

/// A node of a full binary Huffman tree. Children are owned exclusively by
/// their parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        weight: u64,
        symbol: u8,
    },
    Internal {
        weight: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    /// Leaf for `symbol` with the given frequency.
    pub fn leaf(symbol: u8, weight: u64) -> Self {
        Node::Leaf { weight, symbol }
    }

    /// Join two subtrees; the weight is the sum of theirs.
    pub fn internal(left: Node, right: Node) -> Self {
        Node::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// The symbol of a leaf; `None` for internal nodes.
    pub fn symbol(&self) -> Option<u8> {
        match self {
            Node::Leaf { symbol, .. } => Some(*symbol),
            Node::Internal { .. } => None,
        }
    }

    /// Number of leaves below and including this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Length of the longest root-to-leaf path. A lone leaf has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// Build the Huffman tree for `table`.
///
/// Leaves are seeded in ascending symbol order and the queue breaks weight
/// ties by insertion order, so the shape depends only on the table. The
/// first node extracted in each round becomes the left child.
pub fn build(table: &FrequencyTable) -> Result<Node> {
    let mut queue = MinQueue::with_capacity(table.distinct());
    for (symbol, count) in table.iter() {
        queue.insert(count, Node::leaf(symbol, count));
    }

    while queue.len() > 1 {
        let (_, left) = queue.extract_min()?;
        let (_, right) = queue.extract_min()?;
        let joined = Node::internal(left, right);
        queue.insert(joined.weight(), joined);
    }

    let (_, root) = queue.extract_min()?;
    tracing::trace!(
        leaves = root.leaf_count(),
        depth = root.depth(),
        "built huffman tree"
    );
    Ok(root)
}
