//! Container classification and scratch-directory management around the codec.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;
use tempfile::TempDir;

use crate::error::ScanError;
use crate::woff::Decompressor;

/// sfnt version carried by containers wrapping TrueType outlines.
pub const TRUETYPE_SFNT_VERSION: [u8; 4] = [0x00, 0x01, 0x00, 0x00];

/// Outline flavor of the font inside a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Flavor {
    TrueType,
    PostScript,
}

impl Flavor {
    /// Classify from bytes 4..8 of the still-compressed container.
    pub fn classify(container: &[u8]) -> Result<Self, ScanError> {
        let version = container
            .get(4..8)
            .ok_or_else(|| ScanError::truncated(container, 4, 4))?;
        Ok(if version == TRUETYPE_SFNT_VERSION {
            Flavor::TrueType
        } else {
            Flavor::PostScript
        })
    }

    pub fn extension(self) -> &'static str {
        match self {
            Flavor::TrueType => "ttf",
            Flavor::PostScript => "otf",
        }
    }
}

/// Raw bytes of a file that passed signature detection.
#[derive(Debug, Clone)]
pub struct CompressedFontContainer {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

impl CompressedFontContainer {
    pub fn read(path: &Path) -> Result<Self, ScanError> {
        Ok(Self {
            path: path.to_path_buf(),
            bytes: fs::read(path)?,
        })
    }
}

/// An sfnt written to its own scratch directory.
///
/// The directory is removed when this value drops, unless it was retained.
#[derive(Debug)]
pub struct DecompressedFont {
    path: PathBuf,
    flavor: Flavor,
    _scratch: Option<TempDir>,
}

impl DecompressedFont {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    pub fn read(&self) -> Result<Vec<u8>, ScanError> {
        Ok(fs::read(&self.path)?)
    }
}

/// Decompress `container` into a fresh scratch directory.
pub fn unpack(
    container: &CompressedFontContainer,
    codec: &dyn Decompressor,
    keep_scratch: bool,
) -> Result<DecompressedFont, ScanError> {
    let flavor = Flavor::classify(&container.bytes)?;
    let sfnt = codec.decompress(&container.bytes)?;

    let scratch = tempfile::Builder::new().prefix("wfscan-").tempdir()?;
    let stem = container
        .path
        .file_name()
        .map(Path::new)
        .unwrap_or_else(|| Path::new("font"));
    let path = scratch.path().join(stem.with_extension(flavor.extension()));
    fs::write(&path, &sfnt)?;
    debug!(
        "decompressed {} -> {} ({flavor:?})",
        container.path.display(),
        path.display()
    );

    let scratch = if keep_scratch {
        let kept = scratch.keep();
        info!("keeping decompressed font in {}", kept.display());
        None
    } else {
        Some(scratch)
    };

    Ok(DecompressedFont {
        path,
        flavor,
        _scratch: scratch,
    })
}
