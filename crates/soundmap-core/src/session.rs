//! Per-part sound selection state.
//!
//! A [`MappingSession`] holds one [`MappingEntry`] per part of the analyzed
//! score. Choosing a library or a category re-resolves the entry's sound to
//! the first sound the catalog lists for the new pair, mirroring cascading
//! dropdowns. Entries can only be changed through the `set_*` methods.

use crate::catalog::SoundCatalog;
use crate::config::MappingConfig;
use crate::error::{Result, SoundMapError};
use crate::guesser::CategoryGuesser;
use crate::score::{PartRecord, ScoreDocument};
use serde::Serialize;

/// Selected library, category and sound for one part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingEntry {
    part_id: String,
    chosen_library: String,
    chosen_category: String,
    chosen_sound: String,
    /// Set once any selection was changed after analysis.
    touched: bool,
}

impl MappingEntry {
    /// Create an entry and resolve its sound from the catalog.
    pub fn new(
        part_id: impl Into<String>,
        library: impl Into<String>,
        category: impl Into<String>,
        catalog: &SoundCatalog,
    ) -> Self {
        let mut entry = Self {
            part_id: part_id.into(),
            chosen_library: library.into(),
            chosen_category: category.into(),
            chosen_sound: String::new(),
            touched: false,
        };
        entry.resolve_sound(catalog);
        entry
    }

    pub fn part_id(&self) -> &str {
        &self.part_id
    }

    pub fn chosen_library(&self) -> &str {
        &self.chosen_library
    }

    pub fn chosen_category(&self) -> &str {
        &self.chosen_category
    }

    /// Selected sound identifier; empty when the pair has no sounds.
    pub fn chosen_sound(&self) -> &str {
        &self.chosen_sound
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    /// Select a library and re-resolve the sound.
    pub fn set_library(&mut self, library: &str, catalog: &SoundCatalog) -> &Self {
        self.chosen_library = library.to_string();
        self.touched = true;
        self.resolve_sound(catalog);
        self
    }

    /// Select a category and re-resolve the sound.
    pub fn set_category(&mut self, category: &str, catalog: &SoundCatalog) -> &Self {
        self.chosen_category = category.to_string();
        self.touched = true;
        self.resolve_sound(catalog);
        self
    }

    /// Set the sound verbatim. Identifiers outside the catalog are accepted.
    pub fn set_sound(&mut self, sound: &str) -> &Self {
        self.chosen_sound = sound.to_string();
        self.touched = true;
        self
    }

    fn resolve_sound(&mut self, catalog: &SoundCatalog) {
        self.chosen_sound = catalog
            .first_sound(&self.chosen_library, &self.chosen_category)
            .unwrap_or_default()
            .to_string();
    }
}

/// Mapping entries for every part of one analyzed score.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MappingSession {
    parts: Vec<PartRecord>,
    entries: Vec<MappingEntry>,
}

impl MappingSession {
    /// Build one default entry per part of the document.
    pub fn from_document(
        doc: &ScoreDocument,
        catalog: &SoundCatalog,
        guesser: &CategoryGuesser,
    ) -> Result<Self> {
        Ok(Self::from_parts(doc.list_parts()?, catalog, guesser))
    }

    /// Build one default entry per part record.
    ///
    /// Library: the catalog's first. Category: the guess for the part name,
    /// else the first category choice. Sound: first of that pair, or empty.
    pub fn from_parts(
        parts: Vec<PartRecord>,
        catalog: &SoundCatalog,
        guesser: &CategoryGuesser,
    ) -> Self {
        let library = catalog.first_library().unwrap_or_default();

        let entries = parts
            .iter()
            .map(|part| {
                let category = guesser
                    .guess(&part.display_name)
                    .unwrap_or(MappingConfig::CATEGORY_CHOICES[0]);
                MappingEntry::new(part.part_id.clone(), library, category, catalog)
            })
            .collect();

        Self { parts, entries }
    }

    /// Part records in document order.
    pub fn parts(&self) -> &[PartRecord] {
        &self.parts
    }

    /// Entries in document order.
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn entry(&self, part_id: &str) -> Option<&MappingEntry> {
        self.entries.iter().find(|e| e.part_id == part_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Select a library for a part.
    pub fn set_library(
        &mut self,
        part_id: &str,
        library: &str,
        catalog: &SoundCatalog,
    ) -> Result<&MappingEntry> {
        Ok(self.entry_mut(part_id)?.set_library(library, catalog))
    }

    /// Select a category for a part.
    pub fn set_category(
        &mut self,
        part_id: &str,
        category: &str,
        catalog: &SoundCatalog,
    ) -> Result<&MappingEntry> {
        Ok(self.entry_mut(part_id)?.set_category(category, catalog))
    }

    /// Set a part's sound verbatim.
    pub fn set_sound(&mut self, part_id: &str, sound: &str) -> Result<&MappingEntry> {
        Ok(self.entry_mut(part_id)?.set_sound(sound))
    }

    /// Category choices offered for every part.
    pub fn category_choices() -> &'static [&'static str] {
        MappingConfig::CATEGORY_CHOICES
    }

    /// Sounds offered for an entry's current library and category.
    pub fn sound_choices<'c>(entry: &MappingEntry, catalog: &'c SoundCatalog) -> &'c [String] {
        catalog
            .sounds(&entry.chosen_library, &entry.chosen_category)
            .unwrap_or_default()
    }

    fn entry_mut(&mut self, part_id: &str) -> Result<&mut MappingEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.part_id == part_id)
            .ok_or_else(|| SoundMapError::UnknownPart {
                part_id: part_id.to_string(),
            })
    }
}
