//! Modification-time filter.

use std::time::{Duration, SystemTime};

/// Freshness window used when none is configured.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(180);

/// Admits files modified strictly less than `window` before `now`.
///
/// `window == None` admits everything, for scans of archived cache copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyFilter {
    window: Option<Duration>,
}

impl Default for RecencyFilter {
    fn default() -> Self {
        Self::within(DEFAULT_WINDOW)
    }
}

impl RecencyFilter {
    pub fn within(window: Duration) -> Self {
        Self {
            window: Some(window),
        }
    }

    pub fn always() -> Self {
        Self { window: None }
    }

    pub fn window(&self) -> Option<Duration> {
        self.window
    }

    pub fn admits(&self, modified: SystemTime, now: SystemTime) -> bool {
        let Some(window) = self.window else {
            return true;
        };

        match now.duration_since(modified) {
            Ok(elapsed) => elapsed < window,
            // Modified in the future: clock skew counts as recent.
            Err(_) => true,
        }
    }
}
