//! OpenType tag helpers.

use std::fmt;

use read_fonts::types::Tag;
use serde::Serialize;

use crate::error::ScanError;

/// Synthetic language-system key used for a script's default language system.
pub const DEFAULT_LANG_SYS: Tag = Tag::new(b"dflt");

/// Build a tag from 1-4 printable ASCII characters, padding with spaces.
#[cfg(test)]
pub(crate) fn tag4(raw: &str) -> Option<Tag> {
    if raw.is_empty() || raw.len() > 4 {
        return None;
    }

    let mut buf = [b' '; 4];
    for (i, byte) in raw.as_bytes().iter().enumerate() {
        if !(0x20..=0x7E).contains(byte) {
            return None;
        }
        buf[i] = *byte;
    }

    Some(Tag::new(&buf))
}

/// Render a tag as the four characters it encodes.
pub fn tag_to_string(tag: Tag) -> String {
    String::from_utf8_lossy(&tag.to_be_bytes()).to_string()
}

/// The two layout tables whose features get reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LayoutKind {
    Gsub,
    Gpos,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 2] = [LayoutKind::Gsub, LayoutKind::Gpos];

    pub fn tag(self) -> Tag {
        match self {
            LayoutKind::Gsub => Tag::new(b"GSUB"),
            LayoutKind::Gpos => Tag::new(b"GPOS"),
        }
    }

    pub fn malformed(self, detail: impl Into<String>) -> ScanError {
        ScanError::MalformedLayoutTable {
            table: self,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LayoutKind::Gsub => "GSUB",
            LayoutKind::Gpos => "GPOS",
        })
    }
}
