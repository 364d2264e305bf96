//! Error types shared by the Geowalk crates.

use thiserror::Error;

/// A collision region could not be created.
///
/// Raised at world-setup time only. It rejects the one region and leaves the
/// rest of the session untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegionError {
    /// A polygon needs at least three vertices
    #[error("region needs at least 3 vertices, got {count}")]
    TooFewVertices {
        /// Number of vertices supplied
        count: usize,
    },

    /// A vertex coordinate was NaN or infinite
    #[error("vertex {index} has a non-finite coordinate")]
    NonFiniteVertex {
        /// Index of the offending vertex
        index: usize,
    },
}

/// Level definition errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LevelError {
    /// The level file was written by an incompatible format version
    #[error("unsupported level format {found}, expected {expected}")]
    UnsupportedVersion {
        /// Version this build reads
        expected: String,
        /// Version found in the file
        found: String,
    },

    /// The level could not be parsed
    #[error("failed to parse level: {0}")]
    Parse(String),

    /// The level could not be written out
    #[error("failed to serialize level: {0}")]
    Serialize(String),
}
