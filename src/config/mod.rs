//! Configuration module for bakr
//!
//! This module provides configuration management including:
//! - Platform path resolution with an environment override
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::BakrPaths;
pub use settings::{DisposeMode, RestoreSettings, SearchSettings, Settings};
