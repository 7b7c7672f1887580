//! Sound preview through a locally installed MuseScore.
//!
//! A preview writes a one-note score using the chosen sound to the user's
//! documents folder and opens it in MuseScore, which is closed again after a
//! short delay. Without MuseScore the score is still written so it can be
//! opened by hand.

mod launcher;
mod template;

pub use launcher::{PreviewHandle, PreviewLauncher, PreviewOutcome};
pub use template::render_preview_score;
