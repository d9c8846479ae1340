use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::clipboard::CopyIndicator;
use crate::media::AvatarPreview;
use crate::prompt::{compose_prompt, Field, PromptRecord, RecordError};

/// Shared session state. Cheap to clone; clones see the same record.
/// Locks are never held across an await point.
#[derive(Debug, Clone)]
pub struct StudioState {
    record: Arc<Mutex<PromptRecord>>,
    pub copy_indicator: CopyIndicator,
}

impl StudioState {
    pub fn new(record: PromptRecord, copy_feedback: Duration) -> Self {
        StudioState {
            record: Arc::new(Mutex::new(record)),
            copy_indicator: CopyIndicator::new(copy_feedback),
        }
    }

    pub fn snapshot(&self) -> PromptRecord {
        self.record.lock().clone()
    }

    pub fn set_field(&self, field: Field, value: &str) -> Result<(), RecordError> {
        self.record.lock().set_field(field, value)
    }

    pub fn clear_field(&self, field: Field) {
        self.record.lock().clear_field(field);
    }

    pub fn set_avatar_image(&self, data_uri: String) {
        self.record.lock().set_avatar_image(data_uri);
        self.copy_indicator.clear();
    }

    pub fn prompt(&self) -> String {
        compose_prompt(&self.record.lock())
    }

    // Decoding runs after the lock is released.
    pub fn avatar_preview(&self) -> Option<AvatarPreview> {
        let uri = self.record.lock().avatar_image.clone()?;
        AvatarPreview::from_data_uri(&uri).ok()
    }
}

impl Default for StudioState {
    fn default() -> Self {
        StudioState::new(
            PromptRecord::default(),
            crate::clipboard::DEFAULT_COPY_FEEDBACK,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_follows_the_stored_avatar() {
        let state = StudioState::default();
        assert_eq!(state.avatar_preview(), None);

        state.set_avatar_image("data:image/svg+xml;base64,PHN2Zy8+".to_string());
        let preview = state.avatar_preview().unwrap();
        assert_eq!(preview.mime_type, "image/svg+xml");
        assert_eq!(preview.byte_len, 6);

        state.set_field(Field::AvatarName, "Kai").unwrap();
        assert_eq!(state.snapshot().avatar_name, "Kai");

        state.set_avatar_image("not a data uri".to_string());
        assert_eq!(state.avatar_preview(), None);
    }
}
