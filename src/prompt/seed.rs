use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use super::record::PromptRecord;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse seed file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Parses seed YAML. Keys are snake_case field names and all of them are
/// optional; missing keys keep the built-in defaults.
pub fn parse_seed(raw: &str) -> Result<PromptRecord, serde_yaml::Error> {
    if raw.trim().is_empty() {
        return Ok(PromptRecord::default());
    }
    serde_yaml::from_str(raw)
}

pub fn load_seed(path: &Path) -> Result<PromptRecord, SeedError> {
    let raw = fs::read_to_string(path).map_err(|source| SeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let record = parse_seed(&raw).map_err(|source| SeedError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loaded prompt defaults from {}", path.display());
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::record::{CameraMotion, DEFAULT_NARRATIVE};

    #[test]
    fn seed_overrides_only_named_keys() {
        let record = parse_seed(
            "avatar_name: Jordan\ncamera_motion: slow push-in\ncall_to_action: \"\"\n",
        )
        .unwrap();
        assert_eq!(record.avatar_name, "Jordan");
        assert_eq!(record.camera_motion, CameraMotion::SlowPushIn);
        assert!(record.call_to_action.is_empty());
        assert_eq!(record.narrative, DEFAULT_NARRATIVE);
        assert!(record.avatar_image.is_none());
    }

    #[test]
    fn empty_seed_is_the_default_record() {
        assert_eq!(parse_seed("  \n").unwrap(), PromptRecord::default());
    }

    #[test]
    fn seed_cannot_smuggle_an_avatar_image() {
        assert!(parse_seed("avatar_image: \"data:image/png;base64,AAAA\"\n").is_err());
    }

    #[test]
    fn unknown_enum_value_is_rejected() {
        assert!(parse_seed("lighting: candlelight\n").is_err());
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = load_seed(Path::new("does/not/exist.yaml")).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.yaml"));
    }
}
