//! File format versions for levels and input scripts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// `major.minor.patch` version stamped into data files.
///
/// A reader accepts any file with its own major version. A file with a newer
/// minor version may carry fields the reader ignores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Incremented on breaking format changes
    pub major: u16,
    /// Incremented when optional fields are added
    pub minor: u16,
    /// Incremented for fixes that leave the format unchanged
    pub patch: u16,
}

impl SchemaVersion {
    /// Level file format written by this build.
    pub const LEVEL_FORMAT: Self = Self::new(1, 0, 0);

    /// Input script format written by this build.
    pub const INPUT_SCRIPT: Self = Self::new(1, 0, 0);

    /// Creates a version.
    #[must_use]
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// True if a reader at `self` can load data stamped `data`.
    #[must_use]
    pub const fn can_read(&self, data: &Self) -> bool {
        self.major == data.major
    }

    /// True if `data` is readable but was written by a newer minor format.
    #[must_use]
    pub const fn is_older_minor_than(&self, data: &Self) -> bool {
        self.can_read(data) && self.minor < data.minor
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::LEVEL_FORMAT
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
