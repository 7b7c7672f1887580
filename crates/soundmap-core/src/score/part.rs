use serde::Serialize;

/// One `score-part` as found when the document was analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartRecord {
    /// Value of the `id` attribute.
    pub part_id: String,
    /// Trimmed `part-name`, or `Instrument {n}` when missing or blank.
    pub display_name: String,
    /// Trimmed `instrument-sound` text, if present and non-blank.
    pub original_sound: Option<String>,
}

/// What [`ScoreDocument::apply`](super::ScoreDocument::apply) did with each entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyReport {
    /// Existing `instrument-sound` elements whose text was replaced.
    pub updated: usize,
    /// `instrument-sound` elements created inside a `score-instrument`.
    pub created: usize,
    /// Existing sounds left as they were (entry untouched or unchanged).
    pub preserved: usize,
    /// Entries without a chosen sound.
    pub skipped_empty: usize,
    /// Parts with neither `instrument-sound` nor `score-instrument`.
    pub skipped_no_instrument: Vec<String>,
}

impl ApplyReport {
    /// Number of elements written.
    pub fn changed(&self) -> usize {
        self.updated + self.created
    }
}
