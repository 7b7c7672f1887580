//! Choice lists offered for each part.

use crate::error::Result;
use crate::session::MappingSession;
use crate::SoundMapper;

impl SoundMapper {
    /// Library names, in catalog order.
    pub fn library_choices(&self) -> Vec<String> {
        self.catalog
            .library_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Fixed category choices, identical for every part.
    pub fn category_choices(&self) -> &'static [&'static str] {
        MappingSession::category_choices()
    }

    /// Sounds available for a part's current library and category.
    pub async fn sound_choices(&self, part_id: &str) -> Result<Vec<String>> {
        let entry = self.entry(part_id).await?;
        Ok(MappingSession::sound_choices(&entry, &self.catalog).to_vec())
    }
}
