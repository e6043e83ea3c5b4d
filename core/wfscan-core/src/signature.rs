//! Container signature sniffing.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Leading bytes of a WOFF 1.0 container.
pub const WOFF_SIGNATURE: [u8; 4] = *b"wOFF";

/// Recognises WOFF containers by their first four bytes.
///
/// Comparison is byte-exact. `wOF2` containers are deliberately not matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureDetector {
    signature: [u8; 4],
}

impl Default for SignatureDetector {
    fn default() -> Self {
        Self {
            signature: WOFF_SIGNATURE,
        }
    }
}

impl SignatureDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matches(&self, bytes: &[u8]) -> bool {
        bytes.len() >= 4 && bytes[..4] == self.signature
    }

    /// Read at most four bytes of `path` and test them.
    pub fn matches_file(&self, path: &Path) -> io::Result<bool> {
        let mut head = Vec::with_capacity(4);
        File::open(path)?.take(4).read_to_end(&mut head)?;
        Ok(self.matches(&head))
    }
}
