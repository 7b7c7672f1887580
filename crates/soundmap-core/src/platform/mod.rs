//! Platform abstraction layer.
//!
//! All `#[cfg]` blocks for OS-specific behavior live here:
//! - `paths` - metadata search directories, notation executable lookup,
//!   preview output directory
//! - `process` - termination of spawned processes
//!
//! # Supported Platforms
//!
//! Linux, Windows and macOS. Other targets get empty search lists.

pub mod paths;
pub mod process;

pub use paths::{find_musescore_executable, metadata_search_dirs, preview_dir};
pub use process::terminate_child;
