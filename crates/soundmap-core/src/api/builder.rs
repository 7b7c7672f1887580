//! Builder for configuring SoundMapper initialization.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::api::state::MapperState;
use crate::catalog::{DiscoveryReport, SoundCatalog};
use crate::config::{PreviewConfig, StatusConfig};
use crate::error::{Result, SoundMapError};
use crate::guesser::CategoryGuesser;
use crate::platform;
use crate::preview::PreviewLauncher;
use crate::SoundMapper;

/// Builder for configuring SoundMapper initialization.
///
/// # Example
///
/// ```rust,ignore
/// use soundmap_core::SoundMapper;
///
/// let mapper = SoundMapper::builder()
///     .with_discovery(false)
///     .with_preview_delay(std::time::Duration::from_secs(5))
///     .build()
///     .await?;
/// ```
pub struct SoundMapperBuilder {
    discovery: bool,
    search_paths: Vec<PathBuf>,
    catalog: Option<SoundCatalog>,
    guesser: Option<CategoryGuesser>,
    preview: Option<PreviewLauncher>,
    preview_delay: Option<Duration>,
}

impl Default for SoundMapperBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SoundMapperBuilder {
    pub fn new() -> Self {
        Self {
            discovery: true,
            search_paths: Vec::new(),
            catalog: None,
            guesser: None,
            preview: None,
            preview_delay: None,
        }
    }

    /// Enable or disable scanning the platform's MuseScore directories for
    /// sound metadata.
    ///
    /// Default: `true`
    pub fn with_discovery(mut self, enable: bool) -> Self {
        self.discovery = enable;
        self
    }

    /// Extra directories probed for metadata after the platform list. They
    /// are probed even when platform discovery is disabled.
    pub fn with_search_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_paths.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Start from this catalog instead of the built-in defaults.
    pub fn with_catalog(mut self, catalog: SoundCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Use a custom keyword table for category guesses.
    pub fn with_guesser(mut self, guesser: CategoryGuesser) -> Self {
        self.guesser = Some(guesser);
        self
    }

    /// Use a preconfigured preview launcher.
    pub fn with_preview_launcher(mut self, launcher: PreviewLauncher) -> Self {
        self.preview = Some(launcher);
        self
    }

    /// How long a preview keeps MuseScore open.
    ///
    /// Default: 3 seconds
    pub fn with_preview_delay(mut self, delay: Duration) -> Self {
        self.preview_delay = Some(delay);
        self
    }

    /// Build the catalog and the SoundMapper.
    pub async fn build(self) -> Result<SoundMapper> {
        let mut search_dirs = if self.discovery {
            platform::metadata_search_dirs()
        } else {
            Vec::new()
        };
        search_dirs.extend(self.search_paths);

        let base = self.catalog.unwrap_or_else(SoundCatalog::build_default);
        let scanned = !search_dirs.is_empty();
        let (catalog, discovery) = if !scanned {
            (base, DiscoveryReport::default())
        } else {
            tokio::task::spawn_blocking(move || {
                let mut catalog = base;
                let report = catalog.discover_and_merge_in(&search_dirs);
                (catalog, report)
            })
            .await
            .map_err(|e| SoundMapError::Other(format!("Catalog discovery task failed: {}", e)))?
        };

        let status = match discovery.merged.last() {
            Some((path, _)) => format!("Sound libraries loaded from {}", path.display()),
            None if !scanned => StatusConfig::READY.to_string(),
            None => StatusConfig::DEFAULT_LIBRARIES.to_string(),
        };
        info!(
            "Catalog ready: {} libraries, {} sounds",
            catalog.libraries().len(),
            catalog.len()
        );

        let mut preview = match self.preview {
            Some(launcher) => launcher,
            None => PreviewLauncher::new().unwrap_or_else(|e| {
                warn!("{}; writing preview scores to the temp directory", e);
                PreviewLauncher::with_output_dir(
                    std::env::temp_dir().join(PreviewConfig::TEMP_DIR_NAME),
                )
            }),
        };
        if let Some(delay) = self.preview_delay {
            preview = preview.delay(delay);
        }

        Ok(SoundMapper {
            catalog: Arc::new(catalog),
            discovery,
            guesser: self.guesser.unwrap_or_default(),
            preview,
            state: Arc::new(RwLock::new(MapperState::new(status))),
            load_guard: Arc::new(Mutex::new(())),
        })
    }
}
