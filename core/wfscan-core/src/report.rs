//! Per-font reports and their writers.

use std::io::{self, Write};
use std::path::PathBuf;

use serde::Serialize;

use crate::layout::LayoutReport;
use crate::names::UNNAMED;
use crate::tags::{tag_to_string, LayoutKind};
use crate::unpack::Flavor;

/// Everything learned about one decompressed font.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FontReport {
    pub source: PathBuf,
    pub name: Option<String>,
    pub flavor: Flavor,
    #[serde(rename = "GSUB", skip_serializing_if = "Option::is_none")]
    pub gsub: Option<LayoutReport>,
    #[serde(rename = "GPOS", skip_serializing_if = "Option::is_none")]
    pub gpos: Option<LayoutReport>,
}

impl FontReport {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED)
    }

    pub fn layout(&self, kind: LayoutKind) -> Option<&LayoutReport> {
        match kind {
            LayoutKind::Gsub => self.gsub.as_ref(),
            LayoutKind::Gpos => self.gpos.as_ref(),
        }
    }
}

/// Write the `[name]` / `  GSUB: ...` / `  GPOS: ...` listing.
///
/// Table lines appear only for tables that exist and have features. With
/// `by_script`, each table line is followed by `    <script>/<lang>: ...`.
pub fn write_text(reports: &[FontReport], by_script: bool, mut w: impl Write) -> io::Result<()> {
    for report in reports {
        writeln!(w, "[{}]", report.display_name())?;
        for kind in LayoutKind::ALL {
            let Some(layout) = report.layout(kind) else {
                continue;
            };
            if layout.features.is_empty() {
                continue;
            }
            writeln!(w, "  {kind}: {}", layout.features.joined())?;

            if by_script {
                for (script, langs) in &layout.by_script {
                    for (lang, set) in langs {
                        writeln!(
                            w,
                            "    {}/{}: {}",
                            tag_to_string(*script),
                            tag_to_string(*lang),
                            set.joined()
                        )?;
                    }
                }
            }
        }
    }
    Ok(())
}

/// Write reports as a prettified JSON array.
pub fn write_json_pretty(reports: &[FontReport], mut w: impl Write) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(&mut w, reports)?;
    w.write_all(b"\n").map_err(serde_json::Error::io)
}

/// Write reports as newline-delimited JSON.
pub fn write_ndjson(reports: &[FontReport], mut w: impl Write) -> serde_json::Result<()> {
    for report in reports {
        serde_json::to_writer(&mut w, report)?;
        w.write_all(b"\n").map_err(serde_json::Error::io)?;
    }
    Ok(())
}
