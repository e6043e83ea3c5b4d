//! Display-name resolution from the `name` table.

use log::debug;
use read_fonts::tables::name::MacRomanMapping;

use crate::error::ScanError;
use crate::font::FontTables;

/// Name ID of the full font name.
pub const FULL_FONT_NAME: u16 = 6;

/// Placeholder rendered when no candidate record decodes.
pub const UNNAMED: &str = "(unnamed)";

/// A (platform, encoding) pair whose records are decoded by a known rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameEncoding {
    /// Platform 1, encoding 0.
    MacRoman,
    /// Platform 3, encoding 1.
    WindowsUnicodeBmp,
}

impl NameEncoding {
    pub fn ids(self) -> (u16, u16) {
        match self {
            NameEncoding::MacRoman => (1, 0),
            NameEncoding::WindowsUnicodeBmp => (3, 1),
        }
    }

    fn decode(self, bytes: &[u8]) -> Result<String, String> {
        match self {
            NameEncoding::MacRoman => {
                Ok(bytes.iter().map(|&b| MacRomanMapping.decode(b)).collect())
            }
            // read-fonts substitutes U+FFFD for bad UTF-16, so it is validated here.
            NameEncoding::WindowsUnicodeBmp => {
                if bytes.len() % 2 != 0 {
                    return Err(format!("odd UTF-16 length {}", bytes.len()));
                }
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16(&units).map_err(|err| err.to_string())
            }
        }
    }
}

/// Candidates tried in order; the first that decodes wins.
pub const FULL_NAME_CANDIDATES: [NameEncoding; 2] =
    [NameEncoding::MacRoman, NameEncoding::WindowsUnicodeBmp];

/// Resolve the full font name, or `None` when every candidate fails.
pub fn resolve_full_name(font: &impl FontTables) -> Option<String> {
    FULL_NAME_CANDIDATES
        .iter()
        .find_map(|&encoding| match decode_candidate(font, FULL_FONT_NAME, encoding) {
            Ok(name) => Some(name),
            Err(err) => {
                debug!("{err}");
                None
            }
        })
}

fn decode_candidate(
    font: &impl FontTables,
    name_id: u16,
    encoding: NameEncoding,
) -> Result<String, ScanError> {
    let (platform_id, encoding_id) = encoding.ids();
    let failed = |reason: String| ScanError::NameResolutionFailed {
        name_id,
        platform_id,
        encoding_id,
        reason,
    };

    let bytes = font
        .name_bytes(name_id, platform_id, encoding_id)
        .ok_or_else(|| failed("no such record".into()))??;
    let decoded = encoding.decode(&bytes).map_err(failed)?;
    let trimmed = decoded.trim();
    if trimmed.is_empty() {
        return Err(failed("blank string".into()));
    }
    Ok(trimmed.to_string())
}
