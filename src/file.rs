//! Reading and writing containers on disk.
//!
//! Handles are owned by these functions and dropped on every return path.

use crate::container;
use crate::error::Result;
use crate::EncodedDocument;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Write `doc` to `path`, replacing any existing file. Returns bytes written.
pub fn write_document(path: impl AsRef<Path>, doc: &EncodedDocument) -> Result<usize> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let written = container::write(BufWriter::new(file), doc)?;
    tracing::debug!(path = %path.display(), written, "saved container");
    Ok(written)
}

/// Read the container stored at `path`.
pub fn read_document(path: impl AsRef<Path>) -> Result<EncodedDocument> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let doc = container::read(BufReader::new(file))?;
    tracing::debug!(
        path = %path.display(),
        symbols = doc.symbol_count(),
        "loaded container"
    );
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompressError;

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.huff");
        let doc = EncodedDocument::from_text("Hello World").unwrap();
        let written = write_document(&path, &doc).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len() as usize, written);
        assert_eq!(read_document(&path).unwrap().decode().unwrap(), "Hello World");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_document(dir.path().join("absent.huff"));
        assert!(matches!(result, Err(CompressError::IoError(_))));
    }
}
