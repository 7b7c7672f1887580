//! Sound preview methods on SoundMapper.

use tracing::warn;

use crate::config::StatusConfig;
use crate::error::{Result, SoundMapError};
use crate::preview::{PreviewLauncher, PreviewOutcome};
use crate::SoundMapper;

impl SoundMapper {
    /// Audition a sound identifier in MuseScore.
    ///
    /// A missing MuseScore installation is reported as
    /// [`PreviewOutcome::ExecutableNotFound`], not as an error.
    pub async fn preview(&self, sound: &str) -> Result<PreviewOutcome> {
        if sound.trim().is_empty() {
            return Err(SoundMapError::Validation {
                field: "sound".to_string(),
                message: "No sound selected".to_string(),
            });
        }

        self.set_status(format!("Trying preview for {}...", sound)).await;

        match self.preview.launch(sound).await {
            Ok(outcome) => {
                let status = match &outcome {
                    PreviewOutcome::Launched(_) => format!("Playing preview for {}...", sound),
                    PreviewOutcome::ExecutableNotFound { .. } => {
                        StatusConfig::PREVIEW_NOT_FOUND.to_string()
                    }
                };
                self.set_status(status).await;
                Ok(outcome)
            }
            Err(e) => {
                warn!("Preview of {} failed: {}", sound, e);
                self.set_status(format!("Error playing preview: {}", e)).await;
                Err(e)
            }
        }
    }

    /// The launcher used by [`preview`](Self::preview).
    pub fn preview_launcher(&self) -> &PreviewLauncher {
        &self.preview
    }
}
