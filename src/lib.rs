//! huffpack: lossless Huffman text compression.
//!
//! Text is counted into a [`FrequencyTable`], turned into a Huffman [`Node`]
//! tree, encoded through a [`CodeTable`] into a [`BitBuffer`], and stored in a
//! small binary container holding the tree, the payload and the symbol count.
//!
//! ```no_run
//! use huffpack::Compressor;
//!
//! let compressor = Compressor::default();
//! let output = compressor.compress("Hello World")?;
//! assert_eq!(compressor.decompress(&output.data)?, "Hello World");
//! # Ok::<(), huffpack::error::CompressError>(())
//! ```

pub mod bit_buffer;
pub mod code_table;
pub mod codec;
pub mod config;
pub mod container;
pub mod error;
pub mod file;
pub mod frequency;
pub mod priority_queue;
pub mod tree;

pub use crate::bit_buffer::BitBuffer;
pub use crate::code_table::CodeTable;
pub use crate::config::CompressionConfig;
pub use crate::error::{CompressError, Result};
pub use crate::frequency::FrequencyTable;
pub use crate::tree::Node;

use std::path::Path;

/// A tree, the payload bits it produced, and how many symbols they hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedDocument {
    tree: Node,
    bits: BitBuffer,
    symbol_count: usize,
}

impl EncodedDocument {
    /// Count, build and encode `text` in one step.
    pub fn from_text(text: &str) -> Result<Self> {
        let table = FrequencyTable::count(text)?;
        Self::with_table(&table, text)
    }

    /// Encode `text` using the tree built from `table`. The table must count
    /// exactly as many symbols as `text` holds.
    pub fn with_table(table: &FrequencyTable, text: &str) -> Result<Self> {
        let tree = tree::build(table)?;
        let (bits, encoded) = codec::encode_counted(text, &CodeTable::derive(&tree))?;
        if encoded as u64 != table.total() {
            return Err(CompressError::FrequencyMismatch {
                counted: table.total(),
                encoded: encoded as u64,
            });
        }
        Ok(Self::from_parts(tree, bits, encoded))
    }

    /// Encode raw bytes, one symbol per byte.
    pub fn from_raw(data: &[u8]) -> Result<Self> {
        let table = FrequencyTable::from_bytes(data)?;
        let tree = tree::build(&table)?;
        let bits = codec::encode_bytes(data, &CodeTable::derive(&tree))?;
        Ok(Self::from_parts(tree, bits, data.len()))
    }

    pub(crate) fn from_parts(tree: Node, bits: BitBuffer, symbol_count: usize) -> Self {
        Self {
            tree,
            bits,
            symbol_count,
        }
    }

    /// Recover the original text.
    pub fn decode(&self) -> Result<String> {
        codec::decode(&self.bits, &self.tree, self.symbol_count)
    }

    /// Recover the original symbols as bytes.
    pub fn decode_raw(&self) -> Result<Vec<u8>> {
        codec::decode_bytes(&self.bits, &self.tree, self.symbol_count)
    }

    pub fn tree(&self) -> &Node {
        &self.tree
    }

    pub fn bits(&self) -> &BitBuffer {
        &self.bits
    }

    pub fn symbol_count(&self) -> usize {
        self.symbol_count
    }

    /// Code table derived from this document's tree.
    pub fn code_table(&self) -> CodeTable {
        CodeTable::derive(&self.tree)
    }

    /// The payload as a string of `0` and `1`.
    pub fn encoding(&self) -> String {
        self.bits.to_string()
    }

    /// Serialize into the container format.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        container::write(&mut bytes, self)?;
        Ok(bytes)
    }

    /// Parse container bytes produced by [`EncodedDocument::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        container::read(bytes)
    }
}

/// Summary of one compression run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompressionReport {
    pub symbol_count: usize,
    pub distinct_symbols: usize,
    pub original_bytes: usize,
    pub original_bits: u64,
    pub encoded_bits: u64,
    pub tree_bits: u64,
    pub container_bytes: usize,
    pub ratio: f64,
    pub entropy_bits: f64,
}

impl CompressionReport {
    /// `original_bytes` is the size of the source as it was read, so the
    /// ratio compares container bytes against UTF-8 bytes.
    fn new(
        table: &FrequencyTable,
        doc: &EncodedDocument,
        original_bytes: usize,
        container_bytes: usize,
    ) -> Self {
        let symbol_count = doc.symbol_count();
        Self {
            symbol_count,
            distinct_symbols: table.distinct(),
            original_bytes,
            original_bits: symbol_count as u64 * 8,
            encoded_bits: doc.bits().len() as u64,
            tree_bits: container::tree_bit_len(doc.tree()) as u64,
            container_bytes,
            ratio: container_bytes as f64 / original_bytes as f64,
            entropy_bits: table.entropy_bits(),
        }
    }
}

/// Compressed container bytes plus the report describing them.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CompressedOutput {
    pub data: Vec<u8>,
    pub report: CompressionReport,
}

/// Entry point tying the codec to configuration and the file layer.
#[derive(Debug, Clone, Default)]
pub struct Compressor {
    config: CompressionConfig,
}

impl Compressor {
    /// Create a compressor with the given configuration.
    pub fn new(config: CompressionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    /// Encode `text` into a document, honouring the size limit and the
    /// optional round-trip check.
    pub fn encode(&self, text: &str) -> Result<EncodedDocument> {
        let (_, doc) = self.encode_with_table(text)?;
        Ok(doc)
    }

    fn encode_with_table(&self, text: &str) -> Result<(FrequencyTable, EncodedDocument)> {
        if text.len() > self.config.max_input_size {
            return Err(CompressError::InputTooLarge {
                size: text.len(),
                limit: self.config.max_input_size,
            });
        }
        let table = FrequencyTable::count(text)?;
        let doc = EncodedDocument::with_table(&table, text)?;

        if self.config.verify_roundtrip && doc.decode()? != text {
            return Err(CompressError::MalformedTree(
                "decoded text differs from the source".into(),
            ));
        }
        tracing::debug!(
            symbols = doc.symbol_count(),
            distinct = table.distinct(),
            encoded_bits = doc.bits().len(),
            "encoded text"
        );
        Ok((table, doc))
    }

    /// Encode `text` and serialize it into container bytes.
    pub fn compress(&self, text: &str) -> Result<CompressedOutput> {
        let (table, doc) = self.encode_with_table(text)?;
        let data = doc.to_bytes()?;
        let report = CompressionReport::new(&table, &doc, text.len(), data.len());
        tracing::debug!(
            container_bytes = data.len(),
            ratio = report.ratio,
            "compressed text"
        );
        Ok(CompressedOutput { data, report })
    }

    /// Parse container bytes and decode the text they hold.
    pub fn decompress(&self, data: &[u8]) -> Result<String> {
        let doc = container::read(data)?;
        self.decode(&doc)
    }

    fn decode(&self, doc: &EncodedDocument) -> Result<String> {
        if doc.symbol_count() > self.config.max_input_size {
            return Err(CompressError::InputTooLarge {
                size: doc.symbol_count(),
                limit: self.config.max_input_size,
            });
        }
        let text = doc.decode()?;
        tracing::debug!(symbols = doc.symbol_count(), "decoded text");
        Ok(text)
    }

    /// Compress the text file at `input` into a container at `output`.
    pub fn compress_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<CompressionReport> {
        let text = std::fs::read_to_string(input.as_ref())?;
        let (table, doc) = self.encode_with_table(&text)?;
        let written = file::write_document(output, &doc)?;
        Ok(CompressionReport::new(&table, &doc, text.len(), written))
    }

    /// Restore the text stored at `input` into `output`. Returns the number
    /// of symbols written.
    pub fn decompress_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<usize> {
        let doc = file::read_document(input)?;
        let text = self.decode(&doc)?;
        std::fs::write(output.as_ref(), text)?;
        Ok(doc.symbol_count())
    }
}
