//! Sound metadata merging.
//!
//! Two metadata layouts are recognized by their structure:
//!
//! - **MuseHub**: an object with a `sounds` array whose items carry
//!   `publisher`, `id` and an optional `displayName`.
//! - **MuseScore**: a bare array of objects carrying an `id`.
//!
//! A file is parsed completely before anything is merged, so a rejected
//! file never leaves a partial merge behind.

use super::SoundCatalog;
use crate::config::CatalogConfig;
use crate::error::{Result, SoundMapError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Metadata layout detected in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MetadataSchema {
    /// `{"sounds": [{"publisher", "id", "displayName"?}, ...]}`
    MuseHub,
    /// `[{"id": ...}, ...]`
    MuseScore,
}

/// Outcome of merging one metadata file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub schema: MetadataSchema,
    /// Entries appended to the catalog.
    pub added: usize,
    /// Items ignored (no usable id, or already listed for MuseScore files).
    pub skipped: usize,
}

#[derive(Debug, Deserialize)]
struct MuseHubMetadata {
    sounds: Vec<MuseHubSound>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MuseHubSound {
    #[serde(default)]
    publisher: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

/// One classified sound, ready to merge.
#[derive(Debug, PartialEq, Eq)]
struct MetadataEntry {
    library: String,
    category: &'static str,
    sound: String,
}

/// Why a metadata file was rejected.
#[derive(Debug)]
struct Rejected {
    message: String,
    source: Option<serde_json::Error>,
}

impl Rejected {
    fn json(context: &str, err: serde_json::Error) -> Self {
        Self {
            message: format!("{}: {}", context, err),
            source: Some(err),
        }
    }

    fn shape(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }
}

#[derive(Debug)]
struct ParsedMetadata {
    schema: MetadataSchema,
    entries: Vec<MetadataEntry>,
    skipped: usize,
}

impl SoundCatalog {
    /// Merge a MuseHub or MuseScore metadata file into the catalog.
    ///
    /// Returns [`SoundMapError::Metadata`] when the file is not valid JSON or
    /// matches neither layout; the catalog is unchanged in that case.
    pub fn merge_from_metadata(&mut self, path: &Path) -> Result<MergeReport> {
        let contents =
            fs::read_to_string(path).map_err(|e| SoundMapError::io_with_path(e, path))?;

        let parsed = parse_metadata(&contents).map_err(|rejected| SoundMapError::Metadata {
            path: path.to_path_buf(),
            message: rejected.message,
            source: rejected.source,
        })?;

        let report = self.merge_parsed(parsed);
        debug!(
            "Merged {:?} metadata from {}: added={}, skipped={}",
            report.schema,
            path.display(),
            report.added,
            report.skipped
        );
        Ok(report)
    }

    fn merge_parsed(&mut self, parsed: ParsedMetadata) -> MergeReport {
        let mut added = 0;
        let mut skipped = parsed.skipped;

        for entry in parsed.entries {
            match parsed.schema {
                // MuseHub files may list a sound twice; both copies are kept.
                MetadataSchema::MuseHub => {
                    self.add_sounds(&entry.library, entry.category, [entry.sound]);
                    added += 1;
                }
                MetadataSchema::MuseScore => {
                    if self.add_unique(&entry.library, entry.category, &entry.sound) {
                        added += 1;
                    } else {
                        skipped += 1;
                    }
                }
            }
        }

        MergeReport {
            schema: parsed.schema,
            added,
            skipped,
        }
    }
}

fn parse_metadata(contents: &str) -> std::result::Result<ParsedMetadata, Rejected> {
    let data: Value =
        serde_json::from_str(contents).map_err(|e| Rejected::json("not valid JSON", e))?;

    if matches!(&data, Value::Object(map) if map.contains_key("sounds")) {
        return parse_musehub(data);
    }

    match data {
        Value::Array(items) => Ok(parse_musescore(items)),
        _ => Err(Rejected::shape(
            "expected an object with a \"sounds\" array or an array of sounds",
        )),
    }
}

fn parse_musehub(data: Value) -> std::result::Result<ParsedMetadata, Rejected> {
    let metadata: MuseHubMetadata = serde_json::from_value(data)
        .map_err(|e| Rejected::json("invalid MuseHub metadata", e))?;

    let mut entries = Vec::with_capacity(metadata.sounds.len());
    let mut skipped = 0;

    for sound in metadata.sounds {
        let id = match sound.id {
            Some(id) if !id.is_empty() => id,
            _ => {
                skipped += 1;
                continue;
            }
        };
        let display_name = sound.display_name.unwrap_or_default();
        let library = sound
            .publisher
            .unwrap_or_else(|| CatalogConfig::UNKNOWN_LIBRARY.to_string());

        entries.push(MetadataEntry {
            library,
            category: infer_category(&[&id, &display_name]),
            sound: id,
        });
    }

    Ok(ParsedMetadata {
        schema: MetadataSchema::MuseHub,
        entries,
        skipped,
    })
}

fn parse_musescore(items: Vec<Value>) -> ParsedMetadata {
    let mut entries = Vec::with_capacity(items.len());
    let mut skipped = 0;

    for item in items {
        let id = item
            .as_object()
            .and_then(|obj| obj.get("id"))
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty());

        let Some(id) = id else {
            skipped += 1;
            continue;
        };

        entries.push(MetadataEntry {
            library: infer_library(id),
            category: infer_category(&[id]),
            sound: id.to_string(),
        });
    }

    ParsedMetadata {
        schema: MetadataSchema::MuseScore,
        entries,
        skipped,
    }
}

/// First metadata category found (case-insensitive) in any of the texts.
fn infer_category(texts: &[&str]) -> &'static str {
    let lowered: Vec<String> = texts.iter().map(|t| t.to_lowercase()).collect();

    CatalogConfig::METADATA_CATEGORIES
        .iter()
        .find(|category| {
            let needle = category.to_lowercase();
            lowered.iter().any(|text| text.contains(&needle))
        })
        .copied()
        .unwrap_or(CatalogConfig::OTHER_CATEGORY)
}

/// Library for a MuseScore sound id, with Berlin folded into Orchestral Tools.
fn infer_library(id: &str) -> String {
    let id_lower = id.to_lowercase();

    let library = CatalogConfig::KNOWN_PUBLISHERS
        .iter()
        .find(|publisher| id_lower.contains(&publisher.to_lowercase()))
        .copied()
        .unwrap_or(CatalogConfig::DEFAULT_MUSESCORE_LIBRARY);

    let library_lower = library.to_lowercase();
    if library_lower.contains("berlin") || library_lower.contains("orchestral tools") {
        CatalogConfig::ORCHESTRAL_TOOLS_LIBRARY.to_string()
    } else {
        library.to_string()
    }
}
