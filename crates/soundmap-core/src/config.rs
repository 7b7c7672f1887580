//! Centralized configuration for SoundMap.
//!
//! This module provides the fixed names, keyword tables and timings used by
//! the catalog, the score patcher, the mapping session and sound preview.

use std::time::Duration;

/// Sound library catalog configuration.
pub struct CatalogConfig;

impl CatalogConfig {
    /// Library used for MuseHub entries without a publisher.
    pub const UNKNOWN_LIBRARY: &'static str = "Unknown";
    /// Library used for MuseScore entries matching no known publisher.
    pub const DEFAULT_MUSESCORE_LIBRARY: &'static str = "MuseScore";
    /// Canonical name for Berlin / Orchestral Tools entries.
    pub const ORCHESTRAL_TOOLS_LIBRARY: &'static str = "Orchestral Tools";
    /// Category used for metadata entries matching no known category.
    pub const OTHER_CATEGORY: &'static str = "Other";

    /// Categories recognized in metadata ids and display names, in match order.
    pub const METADATA_CATEGORIES: &'static [&'static str] =
        &["Strings", "Woodwinds", "Brass", "Percussion", "Keys"];

    /// Publishers recognized in MuseScore metadata ids, in match order.
    pub const KNOWN_PUBLISHERS: &'static [&'static str] =
        &["CineSamples", "Berlin", "Orchestral Tools", "Spitfire"];

    /// Metadata files probed inside each search directory, relative to it.
    pub const METADATA_FILES: &'static [&'static [&'static str]] = &[
        &["soundfonts", "muse-sounds-metadata.json"],
        &["sounds", "metadata.json"],
        &["Soundfonts", "metadata.json"],
    ];
}

/// Score document configuration.
pub struct ScoreConfig;

impl ScoreConfig {
    pub const SCORE_PART: &'static str = "score-part";
    pub const PART_NAME: &'static str = "part-name";
    pub const SCORE_INSTRUMENT: &'static str = "score-instrument";
    pub const INSTRUMENT_SOUND: &'static str = "instrument-sound";
    pub const ID_ATTRIBUTE: &'static str = "id";

    /// `score-instrument` children that must follow `instrument-sound`.
    pub const AFTER_INSTRUMENT_SOUND: &'static [&'static str] =
        &["solo", "ensemble", "virtual-instrument"];

    pub const XML_VERSION: &'static str = "1.0";
    pub const ENCODING: &'static str = "UTF-8";
}

/// Mapping session configuration.
pub struct MappingConfig;

impl MappingConfig {
    /// Category choices offered for every part, in display order.
    pub const CATEGORY_CHOICES: &'static [&'static str] = &[
        "Strings",
        "Woodwinds",
        "Brass",
        "Percussion",
        "Keyboard",
        "Choir",
    ];
}

/// Status line texts shown by [`crate::SoundMapper::status`].
pub struct StatusConfig;

impl StatusConfig {
    pub const READY: &'static str = "Ready";
    pub const ANALYZING: &'static str = "Analyzing score...";
    pub const ANALYZE_FAILED: &'static str = "Error while analyzing the score.";
    pub const SAVED: &'static str = "Changes saved.";
    pub const SAVE_FAILED: &'static str = "Error while saving.";
    pub const DEFAULT_LIBRARIES: &'static str =
        "No sound metadata found, using default libraries.";
    pub const PREVIEW_NOT_FOUND: &'static str = "MuseScore not found. Preview not possible.";
}

/// Sound preview configuration.
pub struct PreviewConfig;

impl PreviewConfig {
    /// Directory created under the user's documents folder.
    pub const TEMP_DIR_NAME: &'static str = "MusicXMLMapper_temp";
    pub const SCORE_FILE_NAME: &'static str = "test_sound.xml";
    /// How long the notation application runs before termination.
    pub const TERMINATE_DELAY: Duration = Duration::from_secs(3);
    /// Grace period between SIGTERM and SIGKILL.
    pub const TERMINATE_TIMEOUT_MS: u64 = 500;
    /// Executables searched on `PATH` (Linux), in order.
    pub const LINUX_BINARIES: &'static [&'static str] =
        &["mscore", "musescore", "mscore-4.0", "mscore3"];
    /// MuseScore major versions probed (Windows and macOS), in order.
    pub const VERSIONS: &'static [&'static str] = &["4", "3"];
}
