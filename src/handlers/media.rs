use tracing::{error, info, warn};

use crate::handlers::responses::{Notice, NoticeKind, Notifier};
use crate::media::data_uri::abbreviate_data_uri;
use crate::media::{read_as_data_uri, AvatarFile, AvatarPreview, IntakeError};
use crate::state::StudioState;
use crate::utils::timing::{complete_action_timer, start_action_timer};

const LOGGED_URI_CHARS: usize = 48;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeOutcome {
    NoFile,
    Loaded { preview: Option<AvatarPreview> },
    Rejected,
    Failed,
}

/// Handles a file coming from the selection control or a drop. Never
/// returns an error: failures become notices and leave the state as it was.
pub async fn handle_avatar_file(
    state: &StudioState,
    file: Option<AvatarFile>,
    notifier: &dyn Notifier,
) -> IntakeOutcome {
    let Some(file) = file else {
        return IntakeOutcome::NoFile;
    };

    let mut timer = start_action_timer("avatar_intake", Some(file.display_name()));
    match read_as_data_uri(&file).await {
        Ok(data_uri) => {
            info!(
                "Loaded avatar {} ({})",
                file.display_name(),
                abbreviate_data_uri(&data_uri, LOGGED_URI_CHARS)
            );
            state.set_avatar_image(data_uri);
            complete_action_timer(&mut timer, "success", None);
            IntakeOutcome::Loaded {
                preview: state.avatar_preview(),
            }
        }
        Err(err) => {
            let outcome = match &err {
                IntakeError::NotAnImage { .. } => {
                    warn!("Avatar rejected: {err}");
                    notifier.notify(Notice::new(NoticeKind::InvalidFileType, err.user_message()));
                    IntakeOutcome::Rejected
                }
                IntakeError::Read { .. } => {
                    error!("Avatar load failed: {err}");
                    notifier.notify(Notice::new(NoticeKind::FileReadFailed, err.user_message()));
                    IntakeOutcome::Failed
                }
            };
            complete_action_timer(&mut timer, "error", Some(err.to_string()));
            outcome
        }
    }
}
