//! SoundMap Core - Headless library for remapping MusicXML instrument sounds.
//!
//! This crate reads a MusicXML score, lists its instrument parts and lets a
//! caller pick a sound library, category and sound for each of them before
//! writing the chosen sound identifiers back into the file. It can be used
//! programmatically without any UI layer; `soundmap-cli` is a thin front-end
//! over [`SoundMapper`].
//!
//! # Example
//!
//! ```rust,ignore
//! use soundmap_core::SoundMapper;
//!
//! #[tokio::main]
//! async fn main() -> soundmap_core::Result<()> {
//!     let mapper = SoundMapper::builder().build().await?;
//!
//!     let parts = mapper.analyze("score.musicxml").await?;
//!     println!("Found {} parts", parts.len());
//!
//!     mapper.set_library("P1", "Orchestral Tools").await?;
//!     mapper.save().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod guesser;
pub mod platform;
pub mod preview;
pub mod score;
pub mod session;

mod api;

// Re-export commonly used types
pub use catalog::{
    DiscoveryReport, MergeReport, MetadataSchema, SoundCatalog, SoundCategory, SoundLibrary,
};
pub use error::{ErrorCategory, Result, SoundMapError};
pub use guesser::CategoryGuesser;
pub use preview::{PreviewHandle, PreviewLauncher, PreviewOutcome};
pub use score::{ApplyReport, PartRecord, ScoreDocument};
pub use session::{MappingEntry, MappingSession};

pub use api::SoundMapperBuilder;

use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use api::MapperState;

/// Main entry point for mapping the sounds of one score at a time.
///
/// Holds the catalog built at startup, the currently analyzed document with
/// its mapping session, and a one-line status text describing the last
/// operation. All methods take `&self`; state lives behind async locks.
pub struct SoundMapper {
    catalog: Arc<SoundCatalog>,
    discovery: DiscoveryReport,
    guesser: CategoryGuesser,
    preview: PreviewLauncher,
    state: Arc<RwLock<MapperState>>,
    /// Held for the duration of an `analyze` call.
    load_guard: Arc<Mutex<()>>,
}

impl SoundMapper {
    /// Create a builder for SoundMapper.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let mapper = SoundMapper::builder()
    ///     .with_discovery(false)
    ///     .with_search_paths(["/opt/muse"])
    ///     .build()
    ///     .await?;
    /// ```
    pub fn builder() -> SoundMapperBuilder {
        SoundMapperBuilder::new()
    }

    /// Create a SoundMapper with platform discovery and default settings.
    pub async fn new() -> Result<Self> {
        Self::builder().build().await
    }

    /// The sound catalog. Read-only after construction.
    pub fn catalog(&self) -> &SoundCatalog {
        &self.catalog
    }

    /// Metadata files merged (or rejected) while building the catalog.
    pub fn discovery_report(&self) -> &DiscoveryReport {
        &self.discovery
    }

    pub fn guesser(&self) -> &CategoryGuesser {
        &self.guesser
    }

    /// Current status line.
    pub async fn status(&self) -> String {
        self.state.read().await.status.clone()
    }

    async fn set_status(&self, status: impl Into<String>) {
        self.state.write().await.status = status.into();
    }
}
