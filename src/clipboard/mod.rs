pub mod command;
pub mod indicator;
pub mod osc52;

use std::env;
use std::io;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

pub use command::CommandClipboard;
pub use indicator::{CopyIndicator, DEFAULT_COPY_FEEDBACK};
pub use osc52::Osc52Clipboard;

pub const COPY_FAILED_NOTICE: &str = "Unable to copy. Please copy manually from the text area.";

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("failed to start clipboard program '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("clipboard program '{program}' exited with {code:?}: {stderr}")]
    Exit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("clipboard write failed: {0}")]
    Io(#[from] io::Error),
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    fn name(&self) -> &str;

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardBackend {
    Auto,
    Command,
    Osc52,
}

impl ClipboardBackend {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "auto" | "" => Some(Self::Auto),
            "command" | "cmd" => Some(Self::Command),
            "osc52" | "terminal" => Some(Self::Osc52),
            _ => None,
        }
    }
}

fn in_remote_session() -> bool {
    env::var_os("SSH_TTY").is_some() || env::var_os("SSH_CONNECTION").is_some()
}

/// Picks a clipboard implementation. An explicit command line always wins
/// for the command backend; `Auto` prefers OSC 52 inside SSH sessions.
pub fn build_clipboard(backend: ClipboardBackend, command_line: Option<&str>) -> Box<dyn Clipboard> {
    let configured = command_line.and_then(CommandClipboard::from_command_line);
    match backend {
        ClipboardBackend::Osc52 => Box::new(Osc52Clipboard),
        ClipboardBackend::Command => {
            Box::new(configured.unwrap_or_else(CommandClipboard::platform_default))
        }
        ClipboardBackend::Auto => match configured {
            Some(clipboard) => Box::new(clipboard),
            None if in_remote_session() => {
                warn!("Remote session detected; copying through the terminal (OSC 52)");
                Box::new(Osc52Clipboard)
            }
            None => Box::new(CommandClipboard::platform_default()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_names_parse() {
        assert_eq!(ClipboardBackend::parse("OSC52"), Some(ClipboardBackend::Osc52));
        assert_eq!(ClipboardBackend::parse(""), Some(ClipboardBackend::Auto));
        assert_eq!(ClipboardBackend::parse("command"), Some(ClipboardBackend::Command));
        assert_eq!(ClipboardBackend::parse("pasteboard"), None);
    }

    #[test]
    fn explicit_command_is_used() {
        let clipboard = build_clipboard(ClipboardBackend::Command, Some("xsel --clipboard"));
        assert_eq!(clipboard.name(), "xsel");
        let clipboard = build_clipboard(ClipboardBackend::Osc52, Some("xsel --clipboard"));
        assert_eq!(clipboard.name(), "osc52");
    }
}
