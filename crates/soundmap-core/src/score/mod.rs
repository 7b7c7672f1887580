//! MusicXML score handling.
//!
//! A [`ScoreDocument`] reads a score-partwise file, reports its parts as
//! [`PartRecord`]s and writes chosen sound identifiers back into the
//! `instrument-sound` elements. Everything else in the file is carried
//! through unchanged.

mod document;
mod part;
mod xml;

pub use document::ScoreDocument;
pub use part::{ApplyReport, PartRecord};
