use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;

const DATA_URI_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataUriError {
    #[error("missing data URI prefix")]
    MissingPrefix,
    #[error("data URI is not base64 encoded")]
    NotBase64,
    #[error("failed to decode base64 payload: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

pub fn encode_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    let encoded = general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", mime_type, encoded)
}

pub fn parse_data_uri(value: &str) -> Result<DataUri, DataUriError> {
    let rest = value
        .strip_prefix(DATA_URI_SCHEME)
        .ok_or(DataUriError::MissingPrefix)?;
    let (header, payload) = rest.split_once(',').ok_or(DataUriError::NotBase64)?;
    let mime_type = header
        .strip_suffix(BASE64_MARKER)
        .ok_or(DataUriError::NotBase64)?;

    let bytes = general_purpose::STANDARD
        .decode(payload)
        .map_err(|err| DataUriError::Decode(err.to_string()))?;

    Ok(DataUri {
        mime_type: mime_type.to_string(),
        bytes,
    })
}

/// Shortens a data URI for log lines; the payload can be megabytes.
pub fn abbreviate_data_uri(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let truncated: String = value.chars().take(limit).collect();
    format!("{truncated}... ({} chars)", value.chars().count())
}
