//! Loading, inspecting, patching and saving a MusicXML score.

use super::part::{ApplyReport, PartRecord};
use super::xml::{XmlNode, XmlTree};
use crate::config::ScoreConfig;
use crate::error::{Result, SoundMapError};
use crate::session::MappingEntry;
use quick_xml::events::{BytesDecl, BytesText, Event};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, info};

/// A parsed score that can be patched and written back.
#[derive(Debug, Clone)]
pub struct ScoreDocument {
    path: Option<PathBuf>,
    tree: XmlTree,
}

impl ScoreDocument {
    /// Read and parse a score file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SoundMapError::FileNotFound(path.to_path_buf()));
        }

        let bytes = fs::read(path).map_err(|e| SoundMapError::io_with_path(e, path))?;
        let text = String::from_utf8(bytes).map_err(|e| {
            SoundMapError::format(format!("{} is not valid UTF-8: {}", path.display(), e))
        })?;

        let mut document = Self::parse(&text)?;
        document.path = Some(path.to_path_buf());
        info!("Loaded score {}", path.display());
        Ok(document)
    }

    /// [`load`](Self::load) on the blocking thread pool.
    pub async fn load_async(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        tokio::task::spawn_blocking(move || Self::load(&path))
            .await
            .map_err(|e| SoundMapError::Other(format!("Score load task failed: {}", e)))?
    }

    /// Parse a score held in memory.
    ///
    /// The XML declaration is normalized to UTF-8 (or added) here, so every
    /// later serialization carries it.
    pub fn parse(text: &str) -> Result<Self> {
        let mut tree = XmlTree::parse(text)?;
        normalize_declaration(&mut tree)?;
        Ok(Self { path: None, tree })
    }

    /// File the document was loaded from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Namespace URI of the root element, if it has one.
    pub fn namespace(&self) -> Option<&str> {
        self.tree.namespace.as_deref()
    }

    /// Every `score-part`, in document order.
    ///
    /// A whitespace-only `part-name` counts as missing and gets the
    /// `Instrument {n}` fallback; a whitespace-only `instrument-sound` is
    /// reported as `None`, not as an empty string.
    pub fn list_parts(&self) -> Result<Vec<PartRecord>> {
        let mut parts = Vec::new();

        for (index, part) in self.tree.elements(ScoreConfig::SCORE_PART).into_iter().enumerate() {
            let part_id = self
                .tree
                .attribute(part, ScoreConfig::ID_ATTRIBUTE)?
                .ok_or(SoundMapError::MissingPartId { index: index + 1 })?;

            let display_name = self
                .descendant_text(part, ScoreConfig::PART_NAME)?
                .unwrap_or_else(|| format!("Instrument {}", index + 1));
            let original_sound = self.descendant_text(part, ScoreConfig::INSTRUMENT_SOUND)?;

            parts.push(PartRecord {
                part_id,
                display_name,
                original_sound,
            });
        }

        debug!("Found {} score parts", parts.len());
        Ok(parts)
    }

    /// Write the chosen sounds into the document.
    ///
    /// Every entry's part id is checked first; if one is missing the
    /// document is left untouched. Entries that were never edited keep an
    /// existing `instrument-sound` as it is, but may still create one.
    pub fn apply(&mut self, entries: &[MappingEntry]) -> Result<ApplyReport> {
        for entry in entries {
            if self.find_part(entry.part_id())?.is_none() {
                return Err(SoundMapError::PartNotFound {
                    part_id: entry.part_id().to_string(),
                });
            }
        }

        let mut report = ApplyReport::default();

        for entry in entries {
            let sound = entry.chosen_sound();
            if sound.is_empty() {
                report.skipped_empty += 1;
                continue;
            }

            let Some(part) = self.find_part(entry.part_id())? else {
                continue;
            };

            if let Some(existing) = self.tree.first_descendant(part, ScoreConfig::INSTRUMENT_SOUND) {
                let current = self.tree.text(existing)?.unwrap_or_default();
                if !entry.is_touched() || current.trim() == sound {
                    report.preserved += 1;
                } else {
                    debug!("Part {}: {} -> {}", entry.part_id(), current.trim(), sound);
                    self.tree.set_text(existing, sound);
                    report.updated += 1;
                }
            } else if let Some(instrument) =
                self.tree.first_descendant(part, ScoreConfig::SCORE_INSTRUMENT)
            {
                debug!("Part {}: adding instrument-sound {}", entry.part_id(), sound);
                self.tree.insert_child(
                    instrument,
                    ScoreConfig::INSTRUMENT_SOUND,
                    sound,
                    ScoreConfig::AFTER_INSTRUMENT_SOUND,
                );
                report.created += 1;
            } else {
                debug!("Part {} has no score-instrument, skipping", entry.part_id());
                report.skipped_no_instrument.push(entry.part_id().to_string());
            }
        }

        info!(
            "Applied mapping: {} updated, {} created, {} preserved",
            report.updated, report.created, report.preserved
        );
        Ok(report)
    }

    /// Serialize the document as UTF-8 text.
    pub fn to_xml_string(&self) -> Result<String> {
        self.tree.write()
    }

    /// Write the document to `path`, replacing any existing file.
    ///
    /// The text goes to a temporary sibling first and is renamed into place.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let serialized = self.to_xml_string()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| SoundMapError::io_with_path(e, parent))?;
            }
        }

        replace_file(path, |file| file.write_all(serialized.as_bytes()))?;

        info!("Saved score to {}", path.display());
        Ok(())
    }

    fn find_part(&self, part_id: &str) -> Result<Option<usize>> {
        for part in self.tree.elements(ScoreConfig::SCORE_PART) {
            if self.tree.attribute(part, ScoreConfig::ID_ATTRIBUTE)?.as_deref() == Some(part_id) {
                return Ok(Some(part));
            }
        }
        Ok(None)
    }

    /// Trimmed text of the first descendant with this name, `None` when
    /// missing or blank.
    fn descendant_text(&self, element: usize, local: &str) -> Result<Option<String>> {
        let Some(child) = self.tree.first_descendant(element, local) else {
            return Ok(None);
        };
        Ok(self
            .tree
            .text(child)?
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty()))
    }
}

/// Write a temporary sibling of `path` with `write`, sync it and rename it
/// over `path`. The temporary file is removed on any failure.
fn replace_file(
    path: &Path,
    write: impl FnOnce(&mut fs::File) -> std::io::Result<()>,
) -> Result<()> {
    let temp_path = path.with_extension(format!("xml.{}.tmp", process::id()));
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| SoundMapError::io_with_path(e, &temp_path))?;

    let written = write(&mut file).and_then(|_| file.sync_all());
    drop(file);
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(SoundMapError::io_with_path(e, &temp_path));
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(SoundMapError::io_with_path(e, path));
    }
    Ok(())
}

/// Make the declaration say UTF-8, adding one when the document has none.
fn normalize_declaration(tree: &mut XmlTree) -> Result<()> {
    let existing = tree.nodes.iter().enumerate().find_map(|(index, node)| match &node.event {
        Event::Decl(decl) => Some((index, decl.clone())),
        _ => None,
    });

    let Some((index, decl)) = existing else {
        let decl = BytesDecl::new(ScoreConfig::XML_VERSION, Some(ScoreConfig::ENCODING), None);
        tree.nodes.splice(
            0..0,
            [
                XmlNode::new(Event::Decl(decl), None),
                XmlNode::new(Event::Text(BytesText::from_escaped("\n")), None),
            ],
        );
        return Ok(());
    };

    let encoding = decl.encoding().transpose()?;
    if encoding
        .as_deref()
        .is_some_and(|e| e.eq_ignore_ascii_case(ScoreConfig::ENCODING.as_bytes()))
    {
        return Ok(());
    }

    let version = String::from_utf8_lossy(&decl.version()?).into_owned();
    let standalone = decl
        .standalone()
        .transpose()?
        .map(|s| String::from_utf8_lossy(&s).into_owned());
    debug!("Rewriting XML declaration encoding to {}", ScoreConfig::ENCODING);
    tree.nodes[index] = XmlNode::new(
        Event::Decl(BytesDecl::new(
            &version,
            Some(ScoreConfig::ENCODING),
            standalone.as_deref(),
        )),
        None,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SoundCatalog;
    use crate::guesser::CategoryGuesser;
    use crate::session::MappingSession;
    use tempfile::TempDir;

    const SCORE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<!DOCTYPE score-partwise PUBLIC "-//Recordare//DTD MusicXML 3.1 Partwise//EN" "http://www.musicxml.org/dtds/partwise.dtd">
<score-partwise version="3.1">
  <part-list>
    <score-part id="P1">
      <part-name>Violin I</part-name>
      <score-instrument id="P1-I1">
        <instrument-name>Violin</instrument-name>
        <instrument-sound>strings.violin</instrument-sound>
      </score-instrument>
    </score-part>
    <score-part id="P2">
      <part-name>Flute</part-name>
      <score-instrument id="P2-I1">
        <instrument-name>Flute</instrument-name>
        <virtual-instrument/>
      </score-instrument>
    </score-part>
    <score-part id="P3">
      <part-name>  </part-name>
    </score-part>
  </part-list>
  <part id="P1"><measure number="1"/></part>
  <part id="P2"><measure number="1"/></part>
  <part id="P3"><measure number="1"/></part>
</score-partwise>
"#;

    fn edited(part_id: &str, sound: &str) -> MappingEntry {
        let mut entry = MappingEntry::new(part_id, "", "", &SoundCatalog::empty());
        entry.set_sound(sound);
        entry
    }

    #[test]
    fn test_list_parts() {
        let doc = ScoreDocument::parse(SCORE).unwrap();
        let parts = doc.list_parts().unwrap();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].part_id, "P1");
        assert_eq!(parts[0].display_name, "Violin I");
        assert_eq!(parts[0].original_sound.as_deref(), Some("strings.violin"));
        assert_eq!(parts[1].original_sound, None);
        assert_eq!(parts[2].display_name, "Instrument 3");
    }

    #[test]
    fn test_blank_instrument_sound_is_none() {
        let doc = ScoreDocument::parse(
            r#"<score-partwise><part-list><score-part id="P1"><part-name> Harp </part-name><score-instrument id="P1-I1"><instrument-sound>  </instrument-sound></score-instrument></score-part></part-list></score-partwise>"#,
        )
        .unwrap();
        let parts = doc.list_parts().unwrap();

        assert_eq!(parts[0].display_name, "Harp");
        assert_eq!(parts[0].original_sound, None);
    }

    #[test]
    fn test_missing_part_id() {
        let doc = ScoreDocument::parse(
            "<score-partwise><part-list><score-part id=\"P1\"/><score-part/></part-list></score-partwise>",
        )
        .unwrap();
        let err = doc.list_parts().unwrap_err();
        assert!(matches!(err, SoundMapError::MissingPartId { index: 2 }));
    }

    #[test]
    fn test_untouched_session_round_trip() {
        let mut doc = ScoreDocument::parse(SCORE).unwrap();
        let catalog = SoundCatalog::build_default();
        let session =
            MappingSession::from_document(&doc, &catalog, &CategoryGuesser::default()).unwrap();

        let report = doc.apply(session.entries()).unwrap();
        let output = doc.to_xml_string().unwrap();

        assert_eq!(report.preserved, 1);
        assert_eq!(report.created, 1);
        assert_eq!(report.skipped_no_instrument, vec!["P3".to_string()]);
        // Only P2 gains an element; the rest of the file is untouched.
        let added = "<instrument-sound>woodwinds.flute.cinesamples</instrument-sound>\n        ";
        let expected = SCORE.replacen("<virtual-instrument/>", &format!("{}<virtual-instrument/>", added), 1);
        assert_eq!(output, expected);
    }

    #[test]
    fn test_apply_replaces_edited_sound() {
        let mut doc = ScoreDocument::parse(SCORE).unwrap();
        let report = doc.apply(&[edited("P1", "strings.violin.berlin")]).unwrap();

        assert_eq!(report.updated, 1);
        let parts = doc.list_parts().unwrap();
        assert_eq!(parts[0].original_sound.as_deref(), Some("strings.violin.berlin"));
    }

    #[test]
    fn test_part_without_instrument_is_unmodified() {
        let mut doc = ScoreDocument::parse(SCORE).unwrap();
        let before = doc.to_xml_string().unwrap();

        let report = doc.apply(&[edited("P3", "piano")]).unwrap();

        assert_eq!(report.skipped_no_instrument, vec!["P3".to_string()]);
        assert_eq!(doc.to_xml_string().unwrap(), before);
    }

    #[test]
    fn test_unknown_part_leaves_document_unchanged() {
        let mut doc = ScoreDocument::parse(SCORE).unwrap();
        let before = doc.to_xml_string().unwrap();

        let err = doc
            .apply(&[edited("P1", "strings.viola"), edited("P9", "piano")])
            .unwrap_err();

        assert!(matches!(err, SoundMapError::PartNotFound { ref part_id } if part_id == "P9"));
        assert_eq!(doc.to_xml_string().unwrap(), before);
    }

    #[test]
    fn test_empty_sound_is_skipped() {
        let mut doc = ScoreDocument::parse(SCORE).unwrap();
        let report = doc.apply(&[edited("P1", "")]).unwrap();
        assert_eq!(report.skipped_empty, 1);
        assert_eq!(report.changed(), 0);
    }

    #[test]
    fn test_default_namespace() {
        let source = r#"<score-partwise xmlns="urn:example:music"><part-list>
<score-part id="P1"><part-name>Oboe</part-name><score-instrument id="I1"><instrument-name>Oboe</instrument-name></score-instrument></score-part>
</part-list></score-partwise>"#;
        let mut doc = ScoreDocument::parse(source).unwrap();
        assert_eq!(doc.namespace(), Some("urn:example:music"));

        doc.apply(&[edited("P1", "woodwinds.oboe")]).unwrap();
        let reparsed = ScoreDocument::parse(&doc.to_xml_string().unwrap()).unwrap();
        let parts = reparsed.list_parts().unwrap();
        assert_eq!(parts[0].original_sound.as_deref(), Some("woodwinds.oboe"));
    }

    #[test]
    fn test_prefixed_namespace_ignores_foreign_elements() {
        let source = r#"<m:score-partwise xmlns:m="urn:m" xmlns:o="urn:other"><m:part-list>
<m:score-part id="P1"><m:part-name>Horn</m:part-name><m:score-instrument id="I1"/></m:score-part>
<o:score-part id="X1"/>
</m:part-list></m:score-partwise>"#;
        let mut doc = ScoreDocument::parse(source).unwrap();
        let parts = doc.list_parts().unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].display_name, "Horn");

        doc.apply(&[edited("P1", "brass.horn")]).unwrap();
        let output = doc.to_xml_string().unwrap();
        assert!(output.contains(
            r#"<m:score-instrument id="I1"><m:instrument-sound>brass.horn</m:instrument-sound></m:score-instrument>"#
        ));
        assert!(matches!(
            doc.apply(&[edited("X1", "x")]),
            Err(SoundMapError::PartNotFound { .. })
        ));
    }

    #[test]
    fn test_declaration_added_when_missing() {
        let doc = ScoreDocument::parse("<score-partwise/>").unwrap();
        assert_eq!(
            doc.to_xml_string().unwrap(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<score-partwise/>"
        );
    }

    #[test]
    fn test_declaration_encoding_rewritten() {
        let doc = ScoreDocument::parse(
            "<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<score-partwise/>",
        )
        .unwrap();
        assert_eq!(
            doc.to_xml_string().unwrap(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<score-partwise/>"
        );
    }

    #[test]
    fn test_malformed_score() {
        let err = ScoreDocument::parse("<score-partwise><part-list></score-partwise>").unwrap_err();
        assert!(matches!(err, SoundMapError::Format { .. }));
    }

    #[test]
    fn test_load_and_save() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("score.musicxml");
        fs::write(&path, SCORE).unwrap();

        let mut doc = ScoreDocument::load(&path).unwrap();
        assert_eq!(doc.path(), Some(path.as_path()));
        doc.apply(&[edited("P1", "strings.viola")]).unwrap();

        let out = temp.path().join("out").join("mapped.musicxml");
        doc.save(&out).unwrap();

        let saved = ScoreDocument::load(&out).unwrap();
        assert_eq!(
            saved.list_parts().unwrap()[0].original_sound.as_deref(),
            Some("strings.viola")
        );
        // Source file is untouched.
        assert_eq!(fs::read_to_string(&path).unwrap(), SCORE);
    }

    #[test]
    fn test_failed_write_removes_temp_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("score.musicxml");
        fs::write(&path, SCORE).unwrap();

        let err = replace_file(&path, |file| {
            file.write_all(b"<score-partwise")?;
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        })
        .unwrap_err();

        assert!(matches!(err, SoundMapError::Io { .. }));
        let names: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, ["score.musicxml"]);
        assert_eq!(fs::read_to_string(&path).unwrap(), SCORE);
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = ScoreDocument::load(temp.path().join("nope.xml")).unwrap_err();
        assert!(matches!(err, SoundMapError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_load_async() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("score.xml");
        fs::write(&path, SCORE).unwrap();

        let doc = ScoreDocument::load_async(path).await.unwrap();
        assert_eq!(doc.list_parts().unwrap().len(), 3);
    }
}
