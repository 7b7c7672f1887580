//! Launching a notation application on a preview score.

use super::template::render_preview_score;
use crate::config::PreviewConfig;
use crate::error::{Result, SoundMapError};
use crate::platform;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Where the executable to launch comes from.
#[derive(Debug, Clone)]
enum ExecutableSource {
    /// Platform lookup at launch time.
    Platform,
    Fixed(PathBuf),
    /// Never launch; only write the score.
    Disabled,
}

/// Result of [`PreviewLauncher::launch`].
#[derive(Debug)]
pub enum PreviewOutcome {
    /// The application is running and will be terminated after the delay.
    Launched(PreviewHandle),
    /// No application found. The score was written and can be opened by hand.
    ExecutableNotFound { score_path: PathBuf },
}

impl PreviewOutcome {
    /// Path of the written preview score.
    pub fn score_path(&self) -> &Path {
        match self {
            PreviewOutcome::Launched(handle) => &handle.score_path,
            PreviewOutcome::ExecutableNotFound { score_path } => score_path,
        }
    }
}

/// A running preview.
#[derive(Debug)]
pub struct PreviewHandle {
    pub executable: PathBuf,
    pub score_path: PathBuf,
    pub pid: u32,
    termination: JoinHandle<()>,
}

impl PreviewHandle {
    /// Wait until the delayed termination has run.
    pub async fn wait(self) {
        if let Err(e) = self.termination.await {
            debug!("Preview termination task failed: {}", e);
        }
    }
}

/// Writes preview scores and hands them to a local MuseScore.
#[derive(Debug, Clone)]
pub struct PreviewLauncher {
    output_dir: PathBuf,
    executable: ExecutableSource,
    delay: Duration,
}

impl PreviewLauncher {
    /// Launcher writing to the platform preview directory.
    pub fn new() -> Result<Self> {
        Ok(Self::with_output_dir(platform::preview_dir()?))
    }

    /// Launcher writing to `output_dir`.
    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            executable: ExecutableSource::Platform,
            delay: PreviewConfig::TERMINATE_DELAY,
        }
    }

    /// Launch this executable instead of looking one up.
    pub fn executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = ExecutableSource::Fixed(path.into());
        self
    }

    /// Only write preview scores.
    pub fn without_executable(mut self) -> Self {
        self.executable = ExecutableSource::Disabled;
        self
    }

    /// How long the application runs before it is terminated.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path the preview score is written to.
    pub fn score_path(&self) -> PathBuf {
        self.output_dir.join(PreviewConfig::SCORE_FILE_NAME)
    }

    /// Write the preview score for `sound`, replacing the previous one.
    pub async fn write_score(&self, sound: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| SoundMapError::io_with_path(e, &self.output_dir))?;

        let path = self.score_path();
        tokio::fs::write(&path, render_preview_score(sound))
            .await
            .map_err(|e| SoundMapError::io_with_path(e, &path))?;
        debug!("Wrote preview score {}", path.display());
        Ok(path)
    }

    /// Write the preview score and open it in the notation application.
    ///
    /// Must be called inside a tokio runtime; termination runs on a spawned
    /// task after the configured delay and never reports failure.
    pub async fn launch(&self, sound: &str) -> Result<PreviewOutcome> {
        let score_path = self.write_score(sound).await?;

        let executable = match &self.executable {
            ExecutableSource::Platform => platform::find_musescore_executable(),
            ExecutableSource::Fixed(path) => Some(path.clone()),
            ExecutableSource::Disabled => None,
        };
        let Some(executable) = executable else {
            warn!("MuseScore not found, preview score left at {}", score_path.display());
            return Ok(PreviewOutcome::ExecutableNotFound { score_path });
        };

        let mut child = Command::new(&executable)
            .arg(&score_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SoundMapError::LaunchFailed {
                app: executable.display().to_string(),
                message: e.to_string(),
            })?;
        let pid = child.id();
        info!("Previewing {} with {} (PID {})", sound, executable.display(), pid);

        let delay = self.delay;
        let termination = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let result = tokio::task::spawn_blocking(move || {
                platform::terminate_child(&mut child, PreviewConfig::TERMINATE_TIMEOUT_MS)
            })
            .await;
            match result {
                Ok(Ok(_)) => debug!("Preview process {} closed", pid),
                Ok(Err(e)) => debug!("Could not close preview process {}: {}", pid, e),
                Err(e) => debug!("Preview termination task for {} failed: {}", pid, e),
            }
        });

        Ok(PreviewOutcome::Launched(PreviewHandle {
            executable,
            score_path,
            pid,
            termination,
        }))
    }
}
