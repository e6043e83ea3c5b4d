//! Browser cache root discovery.

use std::collections::BTreeSet;
use std::env;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::error::ScanError;

/// Environment variable that replaces the platform cache conventions.
pub const CACHE_DIRS_ENV: &str = "WFSCAN_CACHE_DIRS";

/// Host operating system, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    Other(String),
}

impl Platform {
    pub fn current() -> Self {
        Self::from_os(env::consts::OS)
    }

    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => Platform::Windows,
            "macos" => Platform::MacOs,
            "linux" => Platform::Linux,
            other => Platform::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Windows => f.write_str("windows"),
            Platform::MacOs => f.write_str("macos"),
            Platform::Linux => f.write_str("linux"),
            Platform::Other(name) => f.write_str(name),
        }
    }
}

/// The handful of environment values the cache conventions depend on.
#[derive(Debug, Clone, Default)]
pub struct CacheEnv {
    pub home: Option<PathBuf>,
    pub local_app_data: Option<PathBuf>,
    pub override_dirs: Option<String>,
}

impl CacheEnv {
    pub fn from_process() -> Self {
        Self {
            home: env::var_os("HOME")
                .or_else(|| env::var_os("USERPROFILE"))
                .map(PathBuf::from),
            local_app_data: env::var_os("LOCALAPPDATA").map(PathBuf::from),
            override_dirs: env::var(CACHE_DIRS_ENV).ok(),
        }
    }
}

/// Where a browser keeps its cache on a given platform.
struct Convention {
    /// Cache directories used as-is.
    direct: Vec<PathBuf>,
    /// Profile trees searched for directories named like a cache.
    profile_bases: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct CacheLocator {
    platform: Platform,
    env: CacheEnv,
}

impl CacheLocator {
    pub fn new(platform: Platform, env: CacheEnv) -> Self {
        Self { platform, env }
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Existing cache roots for this platform, with nested roots collapsed.
    pub fn roots(&self) -> Result<BTreeSet<PathBuf>, ScanError> {
        if let Some(raw) = &self.env.override_dirs {
            let overrides: BTreeSet<PathBuf> = env::split_paths(raw)
                .filter(|p| !p.as_os_str().is_empty() && p.exists())
                .collect();
            if overrides.is_empty() {
                warn!("{CACHE_DIRS_ENV} is set but none of its paths exist");
            }
            return Ok(collapse_nested(overrides));
        }

        let convention = self.convention()?;
        let mut found: BTreeSet<PathBuf> = convention
            .direct
            .into_iter()
            .filter(|p| p.is_dir())
            .collect();

        for base in &convention.profile_bases {
            found.extend(find_cache_dirs(base));
        }

        if found.is_empty() {
            warn!("no browser cache directories found for {}", self.platform);
        }

        Ok(collapse_nested(found))
    }

    fn convention(&self) -> Result<Convention, ScanError> {
        let home = self.env.home.as_deref();
        let mut direct = Vec::new();
        let mut profile_bases = Vec::new();

        match &self.platform {
            Platform::Windows => {
                if let Some(local) = self.env.local_app_data.as_deref() {
                    direct.push(local.join(r"Google\Chrome\User Data\Default\Cache"));
                    profile_bases.push(local.join(r"Mozilla\Firefox\Profiles"));
                }
            }
            Platform::MacOs => {
                if let Some(home) = home {
                    let caches = home.join("Library/Caches");
                    direct.push(caches.join("Google/Chrome/Default/Cache"));
                    profile_bases.push(caches.join("Firefox/Profiles"));
                }
            }
            Platform::Linux => {
                if let Some(home) = home {
                    let caches = home.join(".cache");
                    direct.push(caches.join("google-chrome/Default/Cache"));
                    profile_bases.push(caches.join("mozilla/firefox"));
                }
            }
            Platform::Other(name) => return Err(ScanError::UnsupportedPlatform(name.clone())),
        }

        Ok(Convention {
            direct,
            profile_bases,
        })
    }
}

fn is_cache_name(name: &OsStr) -> bool {
    name.to_string_lossy().to_ascii_lowercase().contains("cache")
}

/// Directories under `base` whose own name mentions "cache"; matched trees are not descended.
fn find_cache_dirs(base: &Path) -> BTreeSet<PathBuf> {
    let mut found = BTreeSet::new();
    if !base.is_dir() {
        return found;
    }

    let mut walker = WalkDir::new(base).min_depth(1).into_iter();
    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!("skipping unreadable profile entry: {err}");
                continue;
            }
        };

        if entry.file_type().is_dir() && is_cache_name(entry.file_name()) {
            found.insert(entry.into_path());
            walker.skip_current_dir();
        }
    }

    found
}

fn collapse_nested(roots: BTreeSet<PathBuf>) -> BTreeSet<PathBuf> {
    let mut kept: BTreeSet<PathBuf> = BTreeSet::new();
    for root in roots {
        // Sorted order puts every ancestor before its descendants.
        if !kept.iter().any(|parent| root.starts_with(parent)) {
            kept.insert(root);
        }
    }
    kept
}
