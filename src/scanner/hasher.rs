//! SHA-256 file hasher with streaming support.
//!
//! # Overview
//!
//! This module provides the [`Hasher`] struct for computing content
//! identities ([`FileIdentity`]) of files. The digest covers the whole byte
//! stream and is fed in fixed [`HASH_CHUNK_SIZE`] reads, so memory use stays
//! bounded by the chunk size regardless of file size.
//!
//! The byte length in an identity comes from a separate metadata query made
//! before hashing. A file modified between the two reads produces an
//! identity that matches neither its old nor its new content; that race is
//! not corrected.
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::scanner::Hasher;
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let identity = hasher.fingerprint(Path::new("photo.jpg")).unwrap();
//! println!("{} bytes, sha256 {}", identity.size, identity.digest);
//! ```

use std::fmt;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};

use super::HashError;

/// Read size for streaming hashing (1 MiB).
pub const HASH_CHUNK_SIZE: usize = 1024 * 1024;

/// Content identity of a file: byte length plus hex SHA-256 digest.
///
/// Two files are treated as the same content iff their identities are
/// equal. There is no byte-by-byte fallback after a digest match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FileIdentity {
    /// File size in bytes at the time of the size query
    pub size: u64,
    /// Lowercase hex SHA-256 of the full content (64 characters)
    pub digest: String,
}

impl FileIdentity {
    /// Create an identity from its parts.
    #[must_use]
    pub fn new(size: u64, digest: impl Into<String>) -> Self {
        Self {
            size,
            digest: digest.into(),
        }
    }
}

impl fmt::Display for FileIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.digest, self.size)
    }
}

/// Streaming content fingerprinter.
#[derive(Debug, Clone)]
pub struct Hasher {
    chunk_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher that reads in [`HASH_CHUNK_SIZE`] chunks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunk_size: HASH_CHUNK_SIZE,
        }
    }

    /// Override the read size. Zero is clamped to one byte.
    ///
    /// The digest does not depend on the chunk size.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Current read size in bytes.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Compute the content identity of a file.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] when the file cannot be stat'ed, opened, or read
    /// to the end (deleted after enumeration, permission denied, ...).
    pub fn fingerprint(&self, path: &Path) -> Result<FileIdentity, HashError> {
        let size = fs::metadata(path)
            .map_err(|e| HashError::from_io(path, e))?
            .len();
        let digest = self.full_hash(path)?;
        Ok(FileIdentity { size, digest })
    }

    /// Hex SHA-256 of the entire file content.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or a read fails
    /// mid-stream.
    pub fn full_hash(&self, path: &Path) -> Result<String, HashError> {
        let mut file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            let bytes_read = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(HashError::from_io(path, e)),
            };
            hasher.update(&buffer[..bytes_read]);
        }

        let digest = format!("{:x}", hasher.finalize());
        log::trace!("Hashed {}: {}", path.display(), digest);
        Ok(digest)
    }
}
