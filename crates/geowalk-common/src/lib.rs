//! # Geowalk Common
//!
//! Common types, utilities, and shared abstractions for Geowalk.
//!
//! This crate provides foundational types used across all Geowalk crates:
//! - Coordinate types (geographic, screen, viewport)
//! - ID types (RegionId)
//! - Version information for level and script formats
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;
pub mod ids;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::version::*;
}

pub use prelude::*;
