pub mod data_uri;
pub mod preview;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};

pub use data_uri::{encode_data_uri, parse_data_uri, DataUri, DataUriError};
pub use preview::AvatarPreview;

pub const IMAGE_TYPE_PREFIX: &str = "image/";
pub const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

pub const NOT_AN_IMAGE_NOTICE: &str = "Please upload an image file";
pub const LOAD_FAILED_NOTICE: &str = "Unable to load that image. Please try another file.";

// Enough for every signature infer knows plus the ISO-BMFF brand check below.
const SNIFF_LEN: u64 = 512;

pub fn detect_mime_type(data: &[u8]) -> Option<String> {
    if data.len() > 12 {
        let ftyp = &data[4..12];
        if ftyp.starts_with(b"ftyp") {
            let brand = &ftyp[4..8];
            if brand == b"heic" || brand == b"heif" || brand == b"hevc" {
                return Some("image/heic".to_string());
            }
            if brand == b"avif" {
                return Some("image/avif".to_string());
            }
        }
    }

    infer::get(data).map(|kind| kind.mime_type().to_string())
}

pub fn is_image_type(declared_type: &str) -> bool {
    declared_type.starts_with(IMAGE_TYPE_PREFIX)
}

/// Declares a media type for a file on disk the way a file picker would,
/// from its leading bytes. Unreadable or unrecognised files declare
/// `application/octet-stream`.
pub async fn declare_media_type(path: &Path) -> String {
    let file = match tokio::fs::File::open(path).await {
        Ok(file) => file,
        Err(err) => {
            debug!("Could not open {} for type sniffing: {err}", path.display());
            return UNKNOWN_MEDIA_TYPE.to_string();
        }
    };

    let mut header = Vec::with_capacity(SNIFF_LEN as usize);
    if let Err(err) = file.take(SNIFF_LEN).read_to_end(&mut header).await {
        debug!("Could not sniff {}: {err}", path.display());
        return UNKNOWN_MEDIA_TYPE.to_string();
    }

    detect_mime_type(&header).unwrap_or_else(|| UNKNOWN_MEDIA_TYPE.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarFile {
    pub path: PathBuf,
    pub declared_type: String,
}

impl AvatarFile {
    pub fn new(path: impl Into<PathBuf>, declared_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            declared_type: declared_type.into(),
        }
    }

    /// Uses `declared_type` when given, otherwise sniffs the file header.
    pub async fn select(path: impl Into<PathBuf>, declared_type: Option<String>) -> Self {
        let path = path.into();
        let declared_type = match declared_type {
            Some(value) if !value.trim().is_empty() => value.trim().to_string(),
            _ => declare_media_type(&path).await,
        };
        Self {
            path,
            declared_type,
        }
    }

    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("'{declared_type}' is not an image type")]
    NotAnImage { declared_type: String },
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl IntakeError {
    pub fn user_message(&self) -> &'static str {
        match self {
            IntakeError::NotAnImage { .. } => NOT_AN_IMAGE_NOTICE,
            IntakeError::Read { .. } => LOAD_FAILED_NOTICE,
        }
    }
}

pub async fn read_as_data_uri(file: &AvatarFile) -> Result<String, IntakeError> {
    if !is_image_type(&file.declared_type) {
        warn!(
            "Rejected {} with declared type '{}'",
            file.display_name(),
            file.declared_type
        );
        return Err(IntakeError::NotAnImage {
            declared_type: file.declared_type.clone(),
        });
    }

    let bytes = tokio::fs::read(&file.path)
        .await
        .map_err(|source| IntakeError::Read {
            path: file.path.clone(),
            source,
        })?;

    debug!(
        "Read {} bytes from {} as {}",
        bytes.len(),
        file.display_name(),
        file.declared_type
    );
    Ok(encode_data_uri(&file.declared_type, &bytes))
}
