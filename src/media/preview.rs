use std::io::Cursor;

use image::ImageReader;
use serde::Serialize;
use tracing::debug;

use super::data_uri::{parse_data_uri, DataUriError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvatarPreview {
    pub mime_type: String,
    pub byte_len: usize,
    pub dimensions: Option<(u32, u32)>,
}

impl AvatarPreview {
    pub fn from_data_uri(value: &str) -> Result<Self, DataUriError> {
        let parsed = parse_data_uri(value)?;
        let dimensions = read_dimensions(&parsed.bytes);
        Ok(Self {
            mime_type: parsed.mime_type,
            byte_len: parsed.bytes.len(),
            dimensions,
        })
    }

    pub fn describe(&self) -> String {
        let size = format_size(self.byte_len);
        match self.dimensions {
            Some((width, height)) => format!("{} {}x{} ({})", self.mime_type, width, height, size),
            None => format!("{} ({})", self.mime_type, size),
        }
    }
}

// Only the header is decoded. Formats without a compiled-in decoder yield None.
fn read_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?;
    match reader.into_dimensions() {
        Ok(dimensions) => Some(dimensions),
        Err(err) => {
            debug!("Could not read avatar dimensions: {err}");
            None
        }
    }
}

fn format_size(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    let value = bytes as f64;
    if value >= MIB {
        format!("{:.1} MiB", value / MIB)
    } else if value >= KIB {
        format!("{:.1} KiB", value / KIB)
    } else {
        format!("{bytes} B")
    }
}
