//! Subcommand implementations.

use anyhow::{Context, Result};
use soundmap_core::{PreviewOutcome, SoundMapper};
use std::path::PathBuf;
use tracing::info;

/// A `PART=VALUE` command-line argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub part_id: String,
    pub value: String,
}

/// Parse `PART=VALUE`. The part id is trimmed; the value is kept verbatim and
/// may itself contain `=`.
pub fn parse_assignment(arg: &str) -> std::result::Result<Assignment, String> {
    let (part_id, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected PART=VALUE, got '{}'", arg))?;
    let part_id = part_id.trim();
    if part_id.is_empty() {
        return Err(format!("missing part id in '{}'", arg));
    }
    Ok(Assignment {
        part_id: part_id.to_string(),
        value: value.to_string(),
    })
}

/// Selections given to `map`, applied libraries first, then categories,
/// then sounds.
#[derive(Debug, Default)]
pub struct Selections {
    pub libraries: Vec<Assignment>,
    pub categories: Vec<Assignment>,
    pub sounds: Vec<Assignment>,
}

pub async fn catalog(discovery: bool, search_paths: Vec<PathBuf>) -> Result<()> {
    let mapper = SoundMapper::builder()
        .with_discovery(discovery)
        .with_search_paths(search_paths)
        .build()
        .await?;

    let report = mapper.discovery_report();
    for (path, merge) in &report.merged {
        println!("# {} ({} added)", path.display(), merge.added);
    }
    for failed in &report.failed {
        println!("# skipped {}: {}", failed.path.display(), failed.error);
    }

    for library in mapper.catalog().libraries() {
        println!("{}", library.name);
        for category in &library.categories {
            println!("  {} ({})", category.name, category.sounds.len());
            for sound in &category.sounds {
                println!("    {}", sound);
            }
        }
    }
    Ok(())
}

pub async fn parts(file: PathBuf) -> Result<()> {
    let mapper = SoundMapper::new().await?;
    mapper
        .analyze(&file)
        .await
        .with_context(|| format!("Failed to analyze {}", file.display()))?;

    print_parts(&mapper).await;
    println!("{}", mapper.status().await);
    Ok(())
}

pub async fn map(file: PathBuf, selections: Selections, output: Option<PathBuf>) -> Result<()> {
    let mapper = SoundMapper::new().await?;
    mapper
        .analyze(&file)
        .await
        .with_context(|| format!("Failed to analyze {}", file.display()))?;

    for Assignment { part_id, value } in &selections.libraries {
        mapper.set_library(part_id, value).await?;
    }
    for Assignment { part_id, value } in &selections.categories {
        mapper.set_category(part_id, value).await?;
    }
    for Assignment { part_id, value } in &selections.sounds {
        mapper.set_sound(part_id, value).await?;
    }

    print_parts(&mapper).await;

    let target = output.unwrap_or_else(|| file.clone());
    let report = mapper
        .save_as(&target)
        .await
        .with_context(|| format!("Failed to save {}", target.display()))?;
    info!("Wrote {}", target.display());

    println!(
        "{} updated, {} created, {} kept",
        report.updated, report.created, report.preserved
    );
    for part_id in &report.skipped_no_instrument {
        println!("{}: no score-instrument, not changed", part_id);
    }
    println!("{}", mapper.status().await);
    Ok(())
}

pub async fn preview(sound: &str) -> Result<()> {
    let mapper = SoundMapper::new().await?;

    match mapper.preview(sound).await? {
        PreviewOutcome::Launched(handle) => {
            println!("{}", mapper.status().await);
            handle.wait().await;
        }
        PreviewOutcome::ExecutableNotFound { score_path } => {
            println!("{}", mapper.status().await);
            println!(
                "A test score was written to {}. Open it in MuseScore to hear the sound.",
                score_path.display()
            );
        }
    }
    Ok(())
}

async fn print_parts(mapper: &SoundMapper) {
    let entries = mapper.entries().await;
    for (part, entry) in mapper.parts().await.iter().zip(&entries) {
        println!(
            "{}\t{}\t{}\t{} / {} / {}",
            part.part_id,
            part.display_name,
            part.original_sound.as_deref().unwrap_or("-"),
            entry.chosen_library(),
            entry.chosen_category(),
            if entry.chosen_sound().is_empty() {
                "-"
            } else {
                entry.chosen_sound()
            },
        );
    }
}
