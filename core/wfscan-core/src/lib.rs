//! wfscan-core: which OpenType features do the web fonts a browser just loaded use?
//!
//! A scan walks browser cache directories, keeps files that were modified
//! within a short freshness window and start with the WOFF signature,
//! rebuilds the sfnt each one wraps, and reports the font's full name along
//! with every GSUB and GPOS feature tag reachable from its script and
//! language-system records.
//!
//! ## Stages
//!
//! - [`locate`]: browser cache roots per platform
//! - [`discovery`], [`recency`], [`signature`]: candidate selection
//! - [`woff`], [`unpack`]: WOFF 1.0 decoding into a scoped scratch directory
//! - [`font`], [`names`], [`layout`]: table access, name and feature extraction
//! - [`pipeline`], [`report`]: orchestration and output
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use wfscan_core::pipeline::{DiscoveryPipeline, ScanOptions};
//! use wfscan_core::report::write_text;
//!
//! let pipeline = DiscoveryPipeline::new(ScanOptions::default());
//! let summary = pipeline.scan(&[PathBuf::from("/tmp/browser-cache")])?;
//! write_text(&summary.reports, false, std::io::stdout().lock())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod discovery;
pub mod error;
pub mod font;
pub mod layout;
pub mod locate;
pub mod names;
pub mod pipeline;
pub mod recency;
pub mod report;
pub mod signature;
pub mod tags;
pub mod unpack;
pub mod woff;

pub use error::ScanError;
