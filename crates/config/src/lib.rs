//! Configuration management for hireboard.
//!
//! This crate handles loading, validating, and persisting the hireboard
//! configuration: which job board to open, who is looking at it, where
//! board data lives, and the tuning knobs for dragging and persistence.
//!
//! # Configuration Files
//!
//! Configuration is loaded from the first file found, in this order:
//!
//! 1. `./hireboard.json5` or `./hireboard.json`
//! 2. `~/.config/hireboard/config.json5` or `~/.config/hireboard/config.json`
//!
//! # Example Configuration
//!
//! ```json5
//! {
//!   job: "backend-engineer",
//!   recruiter: "grace",
//!   storage: "file",
//!   drag: { activation_distance: 2 },
//!   sync: { timeout_ms: 5000 },
//!   log: { level: "debug" },
//! }
//! ```

pub mod config;
pub mod error;
pub mod persistence;
pub mod sections;

pub use config::{Config, StorageKind};
pub use error::{ConfigError, Result};
pub use sections::{DragConfig, LogConfig, SyncConfig};
