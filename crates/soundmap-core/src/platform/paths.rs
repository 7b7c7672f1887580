//! Platform-specific path utilities.
//!
//! This module provides the directories probed for sound metadata, the
//! lookup of a local MuseScore executable and the folder preview scores are
//! written to.

use crate::config::PreviewConfig;
use crate::error::{Result, SoundMapError};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Installation and user directories that may contain sound metadata, in
/// probe order. Directories are not checked for existence here.
///
/// # Platform Behavior
/// - **Linux**: `/usr/share/mscore-4.0`, `/usr/share/mscore`,
///   `/usr/local/share/mscore`, `~/.local/share/{MuseScore,MuseHub}`
/// - **Windows**: `MuseScore 4` and `MuseScore 3` under both Program Files
///   folders, then `%APPDATA%\MuseScore\MuseScore{4,3}` and `%APPDATA%\MuseHub`
/// - **macOS**: the app bundles' `Contents/Resources`, then the user's
///   Application Support, Preferences, Documents and Music folders
pub fn metadata_search_dirs() -> Vec<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let mut dirs = vec![
            PathBuf::from("/usr/share/mscore-4.0"),
            PathBuf::from("/usr/share/mscore"),
            PathBuf::from("/usr/local/share/mscore"),
        ];
        if let Some(home) = dirs::home_dir() {
            let share = home.join(".local").join("share");
            dirs.push(share.join("MuseScore"));
            dirs.push(share.join("MuseHub"));
        }
        dirs
    }

    #[cfg(target_os = "windows")]
    {
        let program_files = env_or("ProgramFiles", r"C:\Program Files");
        let program_files_x86 = env_or("ProgramFiles(x86)", r"C:\Program Files (x86)");

        let mut dirs = vec![
            program_files.join("MuseScore 4"),
            program_files_x86.join("MuseScore 4"),
            program_files.join("MuseScore 3"),
            program_files_x86.join("MuseScore 3"),
        ];
        if let Some(appdata) = std::env::var_os("APPDATA").filter(|v| !v.is_empty()) {
            let appdata = PathBuf::from(appdata);
            dirs.push(appdata.join("MuseScore").join("MuseScore4"));
            dirs.push(appdata.join("MuseScore").join("MuseScore3"));
            dirs.push(appdata.join("MuseHub"));
        }
        dirs
    }

    #[cfg(target_os = "macos")]
    {
        let mut dirs = vec![
            PathBuf::from("/Applications/MuseScore 4.app/Contents/Resources"),
            PathBuf::from("/Applications/MuseScore 3.app/Contents/Resources"),
        ];
        if let Some(home) = dirs::home_dir() {
            let library = home.join("Library");
            dirs.push(library.join("Application Support").join("MuseScore"));
            dirs.push(library.join("Application Support").join("MuseHub"));
            dirs.push(library.join("Preferences").join("MuseScore"));
            dirs.push(home.join("Documents").join("MuseScore4").join("Plugins"));
            dirs.push(home.join("Music").join("Audio Music Apps").join("MuseScore"));
        }
        dirs
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
    {
        Vec::new()
    }
}

/// Locate an installed MuseScore executable.
///
/// # Platform Behavior
/// - **Linux**: first of `mscore`, `musescore`, `mscore-4.0`, `mscore3` on `PATH`
/// - **Windows**: `MuseScore {4,3}\bin\MuseScore{4,3}.exe` under the Program
///   Files folders that are set
/// - **macOS**: `/Applications/MuseScore {4,3}.app/Contents/MacOS/mscore`
pub fn find_musescore_executable() -> Option<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let path_var = std::env::var_os("PATH")?;
        find_on_path(PreviewConfig::LINUX_BINARIES, &path_var)
    }

    #[cfg(target_os = "windows")]
    {
        ["ProgramFiles", "ProgramFiles(x86)"]
            .iter()
            .filter_map(|var| std::env::var_os(var).filter(|v| !v.is_empty()))
            .flat_map(|base| {
                PreviewConfig::VERSIONS.iter().map(move |version| {
                    Path::new(&base)
                        .join(format!("MuseScore {}", version))
                        .join("bin")
                        .join(format!("MuseScore{}.exe", version))
                })
            })
            .find(|candidate| candidate.is_file())
    }

    #[cfg(target_os = "macos")]
    {
        PreviewConfig::VERSIONS
            .iter()
            .map(|version| {
                PathBuf::from(format!(
                    "/Applications/MuseScore {}.app/Contents/MacOS/mscore",
                    version
                ))
            })
            .find(|candidate| candidate.is_file())
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
    {
        None
    }
}

/// Directory preview scores are written to: `MusicXMLMapper_temp` inside the
/// user's documents folder (or `~/Documents` when the platform reports none).
pub fn preview_dir() -> Result<PathBuf> {
    let documents = dirs::document_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
        .ok_or_else(|| SoundMapError::Config {
            message: "Could not determine documents directory".to_string(),
        })?;
    Ok(documents.join(PreviewConfig::TEMP_DIR_NAME))
}

/// First of `binaries` found as a file in the directories of `path_var`.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
pub(crate) fn find_on_path(binaries: &[&str], path_var: &OsStr) -> Option<PathBuf> {
    let dirs: Vec<PathBuf> = std::env::split_paths(path_var).collect();
    binaries.iter().find_map(|binary| {
        dirs.iter()
            .map(|dir| dir.join(binary))
            .find(|candidate| is_executable(candidate))
    })
}

fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        path.metadata()
            .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    {
        path.is_file()
    }
}

#[cfg(target_os = "windows")]
fn env_or(var: &str, default: &str) -> PathBuf {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}
