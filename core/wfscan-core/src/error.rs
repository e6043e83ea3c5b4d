//! Error taxonomy for the scan pipeline.

use std::io;

use thiserror::Error;

use crate::tags::LayoutKind;

/// Everything that can go wrong while locating, unpacking or analysing a font.
///
/// Only [`ScanError::UnsupportedPlatform`] ever reaches the caller of a scan;
/// the remaining variants are contained to the file that produced them.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("no browser cache convention is known for platform `{0}`")]
    UnsupportedPlatform(String),

    #[error("container truncated: needed {needed} bytes at offset {offset}, found {found}")]
    TruncatedContainer {
        offset: usize,
        needed: usize,
        found: usize,
    },

    #[error("malformed WOFF container: {0}")]
    MalformedContainer(String),

    #[error("malformed {table} table: {detail}")]
    MalformedLayoutTable { table: LayoutKind, detail: String },

    #[error("name record {name_id} (platform {platform_id}, encoding {encoding_id}) unusable: {reason}")]
    NameResolutionFailed {
        name_id: u16,
        platform_id: u16,
        encoding_id: u16,
        reason: String,
    },

    #[error("font data could not be read: {0}")]
    FontRead(#[from] read_fonts::ReadError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ScanError {
    pub(crate) fn truncated(data: &[u8], offset: usize, needed: usize) -> Self {
        ScanError::TruncatedContainer {
            offset,
            needed,
            found: data.len().saturating_sub(offset).min(needed),
        }
    }
}
