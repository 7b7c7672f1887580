//! Score analysis, selection and saving methods on SoundMapper.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::api::state::MapperState;
use crate::config::StatusConfig;
use crate::error::{Result, SoundMapError};
use crate::score::{ApplyReport, PartRecord, ScoreDocument};
use crate::session::{MappingEntry, MappingSession};
use crate::SoundMapper;

impl SoundMapper {
    // ========================================
    // Analysis
    // ========================================

    /// Load and analyze a score, replacing the current document and
    /// selections.
    ///
    /// Parsing runs on the blocking thread pool. A second call while one is
    /// in flight fails with [`SoundMapError::LoadInProgress`]. On failure the
    /// previous document and selections are kept.
    pub async fn analyze(&self, path: impl Into<PathBuf>) -> Result<Vec<PartRecord>> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(SoundMapError::Validation {
                field: "path".to_string(),
                message: "No score file selected".to_string(),
            });
        }

        let _guard = self
            .load_guard
            .try_lock()
            .map_err(|_| SoundMapError::LoadInProgress)?;

        self.set_status(StatusConfig::ANALYZING).await;

        let loaded = match ScoreDocument::load_async(&path).await {
            Ok(document) => MappingSession::from_document(&document, &self.catalog, &self.guesser)
                .map(|session| (document, session)),
            Err(e) => Err(e),
        };

        let mut state = self.state.write().await;
        match loaded {
            Ok((document, session)) => {
                let parts = session.parts().to_vec();
                info!("Analyzed {}: {} parts", path.display(), parts.len());
                state.status = format!("{} instruments found.", parts.len());
                state.document = Some(document);
                state.session = session;
                Ok(parts)
            }
            Err(e) => {
                warn!("Failed to analyze {}: {}", path.display(), e);
                state.status = StatusConfig::ANALYZE_FAILED.to_string();
                Err(e)
            }
        }
    }

    /// Part records of the analyzed score.
    pub async fn parts(&self) -> Vec<PartRecord> {
        self.state.read().await.session.parts().to_vec()
    }

    /// Current selections, one per part.
    pub async fn entries(&self) -> Vec<MappingEntry> {
        self.state.read().await.session.entries().to_vec()
    }

    /// Current selection for one part.
    pub async fn entry(&self, part_id: &str) -> Result<MappingEntry> {
        self.state
            .read()
            .await
            .session
            .entry(part_id)
            .cloned()
            .ok_or_else(|| SoundMapError::UnknownPart {
                part_id: part_id.to_string(),
            })
    }

    /// Path of the analyzed score.
    pub async fn document_path(&self) -> Option<PathBuf> {
        let state = self.state.read().await;
        state.document.as_ref().and_then(|d| d.path()).map(Path::to_path_buf)
    }

    // ========================================
    // Selection
    // ========================================

    /// Select a library for a part; its sound becomes the first sound of the
    /// new library and the current category.
    pub async fn set_library(&self, part_id: &str, library: &str) -> Result<MappingEntry> {
        let mut state = self.state.write().await;
        state
            .session
            .set_library(part_id, library, &self.catalog)
            .cloned()
    }

    /// Select a category for a part; its sound becomes the first sound of the
    /// current library and the new category.
    pub async fn set_category(&self, part_id: &str, category: &str) -> Result<MappingEntry> {
        let mut state = self.state.write().await;
        state
            .session
            .set_category(part_id, category, &self.catalog)
            .cloned()
    }

    /// Set a part's sound identifier verbatim.
    pub async fn set_sound(&self, part_id: &str, sound: &str) -> Result<MappingEntry> {
        let mut state = self.state.write().await;
        state.session.set_sound(part_id, sound).cloned()
    }

    // ========================================
    // Saving
    // ========================================

    /// Write the selections into the analyzed file.
    pub async fn save(&self) -> Result<ApplyReport> {
        let mut state = self.state.write().await;
        let path = state
            .document
            .as_ref()
            .and_then(|d| d.path())
            .map(Path::to_path_buf)
            .ok_or(SoundMapError::NoDocument)?;
        Self::write_document(&mut state, &path)
    }

    /// Write the selections into a new file. The analyzed path is kept for
    /// later [`save`](Self::save) calls.
    pub async fn save_as(&self, path: impl AsRef<Path>) -> Result<ApplyReport> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(SoundMapError::Validation {
                field: "path".to_string(),
                message: "No output file selected".to_string(),
            });
        }
        let mut state = self.state.write().await;
        Self::write_document(&mut state, path)
    }

    fn write_document(state: &mut MapperState, path: &Path) -> Result<ApplyReport> {
        let MapperState {
            document,
            session,
            status,
        } = state;
        let document = document.as_mut().ok_or(SoundMapError::NoDocument)?;

        let result = document
            .apply(session.entries())
            .and_then(|report| document.save(path).map(|()| report));

        *status = match &result {
            Ok(_) => StatusConfig::SAVED.to_string(),
            Err(e) => {
                warn!("Failed to save {}: {}", path.display(), e);
                StatusConfig::SAVE_FAILED.to_string()
            }
        };
        result
    }
}
