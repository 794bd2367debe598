//! Filesystem access for table files.
//!
//! The aggregation stage only needs to ask whether a candidate file exists
//! and to read its bytes. [`FileSource`] captures that seam so conversions
//! can run against the local disk or an in-memory set of files.

use crate::constants::GZIP_SUFFIX;
use crate::{Error, Result};
use flate2::read::GzDecoder;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Source of table files addressed by path
pub trait FileSource {
    /// Whether a file exists at `path`
    fn exists(&self, path: &str) -> bool;

    /// Raw bytes stored at `path`
    fn read_bytes(&self, path: &str) -> Result<Vec<u8>>;

    /// File content as text, gunzipped when the name ends in `.gz`
    fn read_text(&self, path: &str) -> Result<String> {
        let bytes = self.read_bytes(path)?;
        let bytes = if path.ends_with(GZIP_SUFFIX) {
            gunzip(&bytes).map_err(|e| Error::io(format!("Failed to decompress {path}"), e))?
        } else {
            bytes
        };
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Files on the local disk
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSource for LocalFileSystem {
    fn exists(&self, path: &str) -> bool {
        Path::new(path).is_file()
    }

    fn read_bytes(&self, path: &str) -> Result<Vec<u8>> {
        std::fs::read(path).map_err(|e| Error::io(format!("Failed to read file {path}"), e))
    }
}

/// Files held in memory, keyed by path
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSource {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), content.into());
    }
}

impl FileSource for MemoryFileSource {
    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn read_bytes(&self, path: &str) -> Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| {
            Error::io(
                format!("Failed to read file {path}"),
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file in memory source"),
            )
        })
    }
}

fn gunzip(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(bytes);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}
