//! Candidate enumeration under cache roots.

use std::path::PathBuf;
use std::time::SystemTime;

use log::{debug, warn};
use walkdir::WalkDir;

/// A regular file found under a root, with the metadata the filters need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
}

/// Enumerates candidate files from some backing store.
pub trait CandidateDiscovery {
    fn discover(&self) -> Vec<CandidateFile>;
}

/// Recursive filesystem walker over one or more roots.
///
/// Every regular file is a candidate; cache entries carry hashed names, so
/// nothing is filtered by extension. Unreadable entries are logged and skipped.
#[derive(Debug, Clone)]
pub struct PathDiscovery {
    roots: Vec<PathBuf>,
    follow_symlinks: bool,
}

impl PathDiscovery {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let roots = roots.into_iter().map(Into::into).collect();
        Self {
            roots,
            follow_symlinks: false,
        }
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }
}

impl CandidateDiscovery for PathDiscovery {
    fn discover(&self) -> Vec<CandidateFile> {
        let mut found = Vec::new();

        for root in &self.roots {
            if !root.exists() {
                warn!("root path does not exist: {}", root.display());
                continue;
            }

            for entry in WalkDir::new(root).follow_links(self.follow_symlinks) {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        warn!("skipping unreadable entry under {}: {err}", root.display());
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }

                match entry.metadata() {
                    Ok(meta) => found.push(CandidateFile {
                        path: entry.into_path(),
                        size: meta.len(),
                        modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
                    }),
                    Err(err) => debug!("no metadata for {}: {err}", entry.path().display()),
                }
            }
        }

        found
    }
}
