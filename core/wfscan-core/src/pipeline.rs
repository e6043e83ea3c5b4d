//! The scan: enumerate, filter, decompress, analyse.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use log::{debug, trace, warn};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::discovery::{CandidateDiscovery, CandidateFile, PathDiscovery};
use crate::error::ScanError;
use crate::font::LoadedFont;
use crate::layout::extract;
use crate::names::resolve_full_name;
use crate::recency::RecencyFilter;
use crate::report::FontReport;
use crate::signature::SignatureDetector;
use crate::tags::LayoutKind;
use crate::unpack::{unpack, CompressedFontContainer, DecompressedFont};
use crate::woff::{Decompressor, WoffDecompressor};

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub recency: RecencyFilter,
    pub keep_scratch: bool,
    pub follow_symlinks: bool,
    pub jobs: Option<usize>,
}

/// Where an admitted file dropped out of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Reading,
    Decompressing,
    Analyzing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Reading => "reading",
            Stage::Decompressing => "decompressing",
            Stage::Analyzing => "analyzing",
        })
    }
}

#[derive(Debug)]
pub struct Skip {
    pub path: PathBuf,
    pub stage: Stage,
    pub error: ScanError,
}

/// Result of one run. Reports are sorted by source path.
#[derive(Debug, Default)]
pub struct ScanSummary {
    pub examined: usize,
    pub reports: Vec<FontReport>,
    pub skipped: Vec<Skip>,
}

enum Outcome {
    Rejected,
    Report(FontReport),
    Skipped(Skip),
}

pub struct DiscoveryPipeline {
    options: ScanOptions,
    signature: SignatureDetector,
    codec: Arc<dyn Decompressor>,
}

impl DiscoveryPipeline {
    pub fn new(options: ScanOptions) -> Self {
        Self {
            options,
            signature: SignatureDetector::new(),
            codec: Arc::new(WoffDecompressor),
        }
    }

    pub fn with_decompressor(mut self, codec: impl Decompressor + 'static) -> Self {
        self.codec = Arc::new(codec);
        self
    }

    /// Scan every root. Per-file failures are logged and collected, never returned.
    pub fn scan(&self, roots: &[PathBuf]) -> Result<ScanSummary, ScanError> {
        let candidates = PathDiscovery::new(roots.iter().cloned())
            .follow_symlinks(self.options.follow_symlinks)
            .discover();
        debug!(
            "scanning {} candidate files under {} roots",
            candidates.len(),
            roots.len()
        );

        let now = SystemTime::now();
        let run = || -> Vec<Outcome> {
            candidates
                .par_iter()
                .map(|candidate| self.process(candidate, now))
                .collect()
        };

        let outcomes = if let Some(jobs) = self.options.jobs {
            let pool = ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build()
                .map_err(|err| ScanError::Io(std::io::Error::other(err)))?;
            pool.install(run)
        } else {
            run()
        };

        let mut summary = ScanSummary {
            examined: candidates.len(),
            ..ScanSummary::default()
        };
        for outcome in outcomes {
            match outcome {
                Outcome::Rejected => {}
                Outcome::Report(report) => summary.reports.push(report),
                Outcome::Skipped(skip) => summary.skipped.push(skip),
            }
        }
        summary.reports.sort_by(|a, b| a.source.cmp(&b.source));
        summary.skipped.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(summary)
    }

    fn process(&self, candidate: &CandidateFile, now: SystemTime) -> Outcome {
        if !self.options.recency.admits(candidate.modified, now) {
            trace!("stale: {}", candidate.path.display());
            return Outcome::Rejected;
        }
        match self.signature.matches_file(&candidate.path) {
            Ok(true) => {}
            Ok(false) => return Outcome::Rejected,
            Err(err) => return self.skip(&candidate.path, Stage::Reading, err.into()),
        }

        let container = match CompressedFontContainer::read(&candidate.path) {
            Ok(container) => container,
            Err(err) => return self.skip(&candidate.path, Stage::Reading, err),
        };
        let font = match unpack(&container, self.codec.as_ref(), self.options.keep_scratch) {
            Ok(font) => font,
            Err(err) => return self.skip(&candidate.path, Stage::Decompressing, err),
        };

        match analyze(&candidate.path, &font) {
            Ok(report) => Outcome::Report(report),
            Err(err) => self.skip(&candidate.path, Stage::Analyzing, err),
        }
    }

    fn skip(&self, path: &Path, stage: Stage, error: ScanError) -> Outcome {
        warn!("skipping {} while {stage}: {error}", path.display());
        Outcome::Skipped(Skip {
            path: path.to_path_buf(),
            stage,
            error,
        })
    }
}

/// Build the report for one decompressed font.
pub fn analyze(source: &Path, font: &DecompressedFont) -> Result<FontReport, ScanError> {
    let loaded = LoadedFont::load(font.path())?;
    let tables = loaded.tables()?;

    let name = resolve_full_name(&tables);
    if name.is_none() {
        debug!("no usable full name in {}", source.display());
    }

    Ok(FontReport {
        source: source.to_path_buf(),
        name,
        flavor: font.flavor(),
        gsub: extract(&tables, LayoutKind::Gsub)?,
        gpos: extract(&tables, LayoutKind::Gpos)?,
    })
}
