//! Sound library catalog.
//!
//! The catalog maps library name → category name → ordered list of sound
//! identifiers. Insertion order is kept at every level: the first library,
//! the first category and the first sound of a list are the defaults the
//! mapping session selects.
//!
//! This module provides:
//! - The built-in fallback catalog (`defaults`)
//! - Merging of MuseHub / MuseScore sound metadata files (`metadata`)
//! - Discovery of metadata files in installation directories (`discovery`)

mod defaults;
mod discovery;
mod metadata;

pub use discovery::{DiscoveryReport, FailedMetadata};
pub use metadata::{MergeReport, MetadataSchema};

use serde::Serialize;

/// A named, ordered list of sound identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoundCategory {
    pub name: String,
    pub sounds: Vec<String>,
}

/// A sound library and its categories, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoundLibrary {
    pub name: String,
    pub categories: Vec<SoundCategory>,
}

impl SoundLibrary {
    /// Look up a category by exact name.
    pub fn category(&self, name: &str) -> Option<&SoundCategory> {
        self.categories.iter().find(|c| c.name == name)
    }
}

/// Ordered catalog of sound libraries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SoundCatalog {
    libraries: Vec<SoundLibrary>,
}

impl SoundCatalog {
    /// Create a catalog with no libraries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// All libraries in insertion order.
    pub fn libraries(&self) -> &[SoundLibrary] {
        &self.libraries
    }

    /// Library names in insertion order.
    pub fn library_names(&self) -> Vec<&str> {
        self.libraries.iter().map(|l| l.name.as_str()).collect()
    }

    /// Look up a library by exact name.
    pub fn library(&self, name: &str) -> Option<&SoundLibrary> {
        self.libraries.iter().find(|l| l.name == name)
    }

    /// Category names of a library, empty when the library is unknown.
    pub fn categories(&self, library: &str) -> Vec<&str> {
        self.library(library)
            .map(|l| l.categories.iter().map(|c| c.name.as_str()).collect())
            .unwrap_or_default()
    }

    /// Sounds of a `(library, category)` pair, `None` when the pair does not exist.
    pub fn sounds(&self, library: &str, category: &str) -> Option<&[String]> {
        self.library(library)?
            .category(category)
            .map(|c| c.sounds.as_slice())
    }

    /// The first library, which the mapping session selects by default.
    pub fn first_library(&self) -> Option<&str> {
        self.libraries.first().map(|l| l.name.as_str())
    }

    /// The first sound of a `(library, category)` pair.
    pub fn first_sound(&self, library: &str, category: &str) -> Option<&str> {
        self.sounds(library, category)?.first().map(String::as_str)
    }

    /// Check whether a sound is listed under `(library, category)`.
    pub fn contains(&self, library: &str, category: &str, sound: &str) -> bool {
        self.sounds(library, category)
            .map(|sounds| sounds.iter().any(|s| s == sound))
            .unwrap_or(false)
    }

    /// Total number of sound entries, duplicates included.
    pub fn len(&self) -> usize {
        self.libraries
            .iter()
            .flat_map(|l| l.categories.iter())
            .map(|c| c.sounds.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append sounds to `(library, category)`, creating either level as needed.
    ///
    /// Duplicates are kept.
    pub fn add_sounds<I, S>(&mut self, library: &str, category: &str, sounds: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = self.sounds_mut(library, category);
        list.extend(sounds.into_iter().map(Into::into));
    }

    /// Append a sound unless it is already listed under `(library, category)`.
    ///
    /// Returns `true` when the sound was added.
    pub fn add_unique(&mut self, library: &str, category: &str, sound: &str) -> bool {
        let list = self.sounds_mut(library, category);
        if list.iter().any(|s| s == sound) {
            return false;
        }
        list.push(sound.to_string());
        true
    }

    fn sounds_mut(&mut self, library: &str, category: &str) -> &mut Vec<String> {
        let lib_index = match self.libraries.iter().position(|l| l.name == library) {
            Some(index) => index,
            None => {
                self.libraries.push(SoundLibrary {
                    name: library.to_string(),
                    categories: Vec::new(),
                });
                self.libraries.len() - 1
            }
        };
        let categories = &mut self.libraries[lib_index].categories;

        let cat_index = match categories.iter().position(|c| c.name == category) {
            Some(index) => index,
            None => {
                categories.push(SoundCategory {
                    name: category.to_string(),
                    sounds: Vec::new(),
                });
                categories.len() - 1
            }
        };
        &mut categories[cat_index].sounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_sounds_keeps_insertion_order() {
        let mut catalog = SoundCatalog::empty();
        catalog.add_sounds("Zeta", "Brass", ["brass.horn"]);
        catalog.add_sounds("Alpha", "Strings", ["strings.violin", "strings.viola"]);
        catalog.add_sounds("Zeta", "Strings", ["strings.cello"]);

        assert_eq!(catalog.library_names(), vec!["Zeta", "Alpha"]);
        assert_eq!(catalog.categories("Zeta"), vec!["Brass", "Strings"]);
        assert_eq!(catalog.first_sound("Alpha", "Strings"), Some("strings.violin"));
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_add_unique_rejects_duplicates() {
        let mut catalog = SoundCatalog::empty();
        assert!(catalog.add_unique("Lib", "Keys", "piano"));
        assert!(!catalog.add_unique("Lib", "Keys", "piano"));
        assert_eq!(catalog.sounds("Lib", "Keys").unwrap(), ["piano".to_string()]);
    }

    #[test]
    fn test_missing_pairs() {
        let catalog = SoundCatalog::build_default();
        assert!(catalog.sounds("Nope", "Strings").is_none());
        assert!(catalog.sounds("Muse Choir", "Strings").is_none());
        assert!(catalog.categories("Nope").is_empty());
        assert!(!catalog.contains("Muse Choir", "Choir", "strings.violin"));
    }
}
