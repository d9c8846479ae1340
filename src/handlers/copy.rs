use tracing::{error, info};

use crate::clipboard::{Clipboard, COPY_FAILED_NOTICE};
use crate::handlers::responses::{Notice, NoticeKind, Notifier};
use crate::state::StudioState;
use crate::utils::timing::{complete_action_timer, start_action_timer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    Failed,
}

pub async fn handle_copy(
    state: &StudioState,
    clipboard: &dyn Clipboard,
    notifier: &dyn Notifier,
) -> CopyOutcome {
    let prompt = state.prompt();
    let mut timer = start_action_timer("copy", Some(clipboard.name().to_string()));

    match clipboard.write_text(&prompt).await {
        Ok(()) => {
            state.copy_indicator.mark_copied();
            info!("Copied {} chars via {}", prompt.chars().count(), clipboard.name());
            complete_action_timer(&mut timer, "success", None);
            CopyOutcome::Copied
        }
        Err(err) => {
            error!("Copy via {} failed: {err}", clipboard.name());
            notifier.notify(Notice::new(NoticeKind::CopyFailed, COPY_FAILED_NOTICE));
            complete_action_timer(&mut timer, "error", Some(err.to_string()));
            CopyOutcome::Failed
        }
    }
}
