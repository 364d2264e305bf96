//! # Geowalk Engine
//!
//! Headless runner for Geowalk.
//!
//! This crate ties the gameplay core to files on disk:
//! - Config: viewport, tick rate and logging settings (TOML)
//! - Script: recorded `wasd` input sequences (RON)
//! - Sim: replays a script against a level and summarises the run

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod script;
pub mod sim;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::script::*;
    pub use crate::sim::*;
}

pub use prelude::*;
