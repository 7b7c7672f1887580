//! Mutable state behind a SoundMapper.

use crate::score::ScoreDocument;
use crate::session::MappingSession;

/// The analyzed document and its selections.
///
/// `document` and `session` are replaced together on each successful
/// analysis and never individually.
pub(crate) struct MapperState {
    pub(crate) document: Option<ScoreDocument>,
    pub(crate) session: MappingSession,
    pub(crate) status: String,
}

impl MapperState {
    pub(crate) fn new(status: impl Into<String>) -> Self {
        Self {
            document: None,
            session: MappingSession::default(),
            status: status.into(),
        }
    }
}
