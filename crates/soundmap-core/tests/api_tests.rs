//! Integration tests for the SoundMapper public interface.
//!
//! These tests drive a full analyze / select / save cycle against score and
//! metadata files in a temporary directory.

use soundmap_core::{PreviewLauncher, PreviewOutcome, ScoreDocument, SoundMapError, SoundMapper};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SCORE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<!DOCTYPE score-partwise PUBLIC "-//Recordare//DTD MusicXML 3.1 Partwise//EN" "http://www.musicxml.org/dtds/partwise.dtd">
<score-partwise version="3.1">
  <part-list>
    <score-part id="P1">
      <part-name>Violin I</part-name>
      <score-instrument id="P1-I1">
        <instrument-name>Violin</instrument-name>
      </score-instrument>
    </score-part>
    <score-part id="P2">
      <part-name>Horn in F</part-name>
      <score-instrument id="P2-I1">
        <instrument-name>Horn</instrument-name>
        <instrument-sound>brass.french-horn</instrument-sound>
      </score-instrument>
    </score-part>
    <score-part id="P3">
      <part-name>Piano</part-name>
    </score-part>
  </part-list>
  <part id="P1"><measure number="1"/></part>
  <part id="P2"><measure number="1"/></part>
  <part id="P3"><measure number="1"/></part>
</score-partwise>
"#;

/// Create a test environment with a score file.
fn create_test_env() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let score = temp_dir.path().join("score.musicxml");
    fs::write(&score, SCORE).unwrap();
    (temp_dir, score)
}

async fn mapper(temp_dir: &Path) -> SoundMapper {
    SoundMapper::builder()
        .with_discovery(false)
        .with_preview_launcher(
            PreviewLauncher::with_output_dir(temp_dir.join("preview")).without_executable(),
        )
        .build()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_analyze_builds_default_selections() {
    let (temp_dir, score) = create_test_env();
    let mapper = mapper(temp_dir.path()).await;

    let parts = mapper.analyze(&score).await.unwrap();

    assert_eq!(parts.len(), 3);
    assert_eq!(mapper.status().await, "3 instruments found.");
    assert_eq!(mapper.document_path().await, Some(score.clone()));

    let violin = mapper.entry("P1").await.unwrap();
    assert_eq!(violin.chosen_library(), "CineSamples");
    assert_eq!(violin.chosen_category(), "Strings");
    assert_eq!(violin.chosen_sound(), "strings.violin.cinesamples");

    let horn = mapper.entry("P2").await.unwrap();
    assert_eq!(horn.chosen_category(), "Brass");
    assert_eq!(parts[1].original_sound.as_deref(), Some("brass.french-horn"));
}

#[tokio::test]
async fn test_untouched_save_keeps_existing_sounds() {
    let (temp_dir, score) = create_test_env();
    let mapper = mapper(temp_dir.path()).await;
    mapper.analyze(&score).await.unwrap();

    let report = mapper.save().await.unwrap();

    assert_eq!(report.preserved, 1);
    assert_eq!(report.created, 1);
    assert_eq!(report.skipped_no_instrument, vec!["P3".to_string()]);
    assert_eq!(mapper.status().await, "Changes saved.");

    let saved = fs::read_to_string(&score).unwrap();
    assert!(saved.contains("<instrument-sound>brass.french-horn</instrument-sound>"));
    assert!(saved.contains("<instrument-sound>strings.violin.cinesamples</instrument-sound>"));
    assert_eq!(saved.matches("<instrument-sound>").count(), 2);

    // Saving again changes nothing.
    mapper.save().await.unwrap();
    assert_eq!(fs::read_to_string(&score).unwrap(), saved);
}

#[tokio::test]
async fn test_selection_cascade_and_save_as() {
    let (temp_dir, score) = create_test_env();
    let mapper = mapper(temp_dir.path()).await;
    mapper.analyze(&score).await.unwrap();

    let entry = mapper.set_library("P2", "Orchestral Tools").await.unwrap();
    assert_eq!(entry.chosen_sound(), "brass.trumpet.berlin");
    let entry = mapper.set_sound("P2", "brass.horn.berlin").await.unwrap();
    assert_eq!(entry.chosen_sound(), "brass.horn.berlin");
    mapper.set_sound("P3", "piano").await.unwrap();

    let output = temp_dir.path().join("mapped.musicxml");
    let report = mapper.save_as(&output).await.unwrap();
    assert_eq!(report.updated, 1);

    let saved = ScoreDocument::load(&output).unwrap();
    let parts = saved.list_parts().unwrap();
    assert_eq!(parts[1].original_sound.as_deref(), Some("brass.horn.berlin"));
    assert_eq!(parts[2].original_sound, None);

    // The analyzed file is untouched and stays the save target.
    assert_eq!(fs::read_to_string(&score).unwrap(), SCORE);
    assert_eq!(mapper.document_path().await, Some(score));
}

#[tokio::test]
async fn test_choices() {
    let (temp_dir, score) = create_test_env();
    let mapper = mapper(temp_dir.path()).await;
    mapper.analyze(&score).await.unwrap();

    assert_eq!(mapper.library_choices()[0], "CineSamples");
    assert_eq!(mapper.category_choices().len(), 6);

    mapper.set_library("P3", "MS Basic").await.unwrap();
    mapper.set_category("P3", "Keyboard").await.unwrap();
    assert_eq!(
        mapper.sound_choices("P3").await.unwrap(),
        vec!["piano", "harpsichord", "organ"]
    );

    assert!(matches!(
        mapper.sound_choices("P9").await,
        Err(SoundMapError::UnknownPart { .. })
    ));
}

#[tokio::test]
async fn test_failed_analysis_keeps_previous_state() {
    let (temp_dir, score) = create_test_env();
    let mapper = mapper(temp_dir.path()).await;
    mapper.analyze(&score).await.unwrap();
    mapper.set_sound("P1", "strings.custom").await.unwrap();

    let broken = temp_dir.path().join("broken.musicxml");
    fs::write(&broken, "<score-partwise><part-list>").unwrap();
    let err = mapper.analyze(&broken).await.unwrap_err();
    assert!(matches!(err, SoundMapError::Format { .. }));

    let err = mapper
        .analyze(temp_dir.path().join("missing.musicxml"))
        .await
        .unwrap_err();
    assert!(matches!(err, SoundMapError::FileNotFound(_)));

    assert_eq!(mapper.parts().await.len(), 3);
    assert_eq!(mapper.entry("P1").await.unwrap().chosen_sound(), "strings.custom");
    assert_eq!(mapper.document_path().await, Some(score));
}

#[tokio::test]
async fn test_discovery_from_search_path() {
    let temp_dir = TempDir::new().unwrap();
    let install = temp_dir.path().join("MuseScore 4");
    fs::create_dir_all(install.join("soundfonts")).unwrap();
    fs::write(
        install.join("soundfonts").join("muse-sounds-metadata.json"),
        r#"{"sounds":[{"publisher":"Acme","id":"strings.cello.acme","displayName":"Cello"}]}"#,
    )
    .unwrap();

    let mapper = SoundMapper::builder()
        .with_discovery(false)
        .with_search_paths([&install])
        .build()
        .await
        .unwrap();

    assert_eq!(mapper.discovery_report().files_found(), 1);
    assert_eq!(
        mapper.catalog().sounds("Acme", "Strings"),
        Some(&["strings.cello.acme".to_string()][..])
    );
    // Defaults are still present.
    assert_eq!(mapper.catalog().first_library(), Some("CineSamples"));
    assert!(mapper.status().await.starts_with("Sound libraries loaded from"));
}

#[tokio::test]
async fn test_preview_without_musescore() {
    let temp_dir = TempDir::new().unwrap();
    let mapper = mapper(temp_dir.path()).await;

    let outcome = mapper.preview("strings.violin").await.unwrap();

    assert!(matches!(outcome, PreviewOutcome::ExecutableNotFound { .. }));
    assert!(outcome.score_path().exists());
    assert_eq!(mapper.status().await, "MuseScore not found. Preview not possible.");

    assert!(matches!(
        mapper.preview("  ").await,
        Err(SoundMapError::Validation { .. })
    ));
}
