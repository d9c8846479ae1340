use std::env;
use std::io;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use super::{Clipboard, ClipboardError};

const STDERR_LIMIT: usize = 400;

/// Pipes text into a platform clipboard program over stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Splits a configured command line such as `xclip -selection clipboard`.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }

    pub fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            Self::new("pbcopy", Vec::new())
        } else if cfg!(target_os = "windows") {
            Self::new("clip", Vec::new())
        } else if env::var_os("WAYLAND_DISPLAY").is_some() {
            Self::new("wl-copy", Vec::new())
        } else {
            Self::new(
                "xclip",
                vec!["-selection".to_string(), "clipboard".to_string()],
            )
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl Clipboard for CommandClipboard {
    fn name(&self) -> &str {
        &self.program
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ClipboardError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            let written = match stdin.write_all(text.as_bytes()).await {
                Ok(()) => stdin.shutdown().await,
                Err(err) => Err(err),
            };
            // A program that exits early closes the pipe; its exit status says why.
            if let Err(err) = written {
                if err.kind() != io::ErrorKind::BrokenPipe {
                    return Err(err.into());
                }
                debug!("{} closed stdin early", self.program);
            }
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr: String = stderr.trim().chars().take(STDERR_LIMIT).collect();
            return Err(ClipboardError::Exit {
                program: self.program.clone(),
                code: output.status.code(),
                stderr,
            });
        }

        debug!("Copied {} bytes via {}", text.len(), self.program);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_is_split_on_whitespace() {
        let clipboard = CommandClipboard::from_command_line("  xsel  --clipboard --input ").unwrap();
        assert_eq!(
            clipboard,
            CommandClipboard::new(
                "xsel",
                vec!["--clipboard".to_string(), "--input".to_string()]
            )
        );
        assert!(CommandClipboard::from_command_line("   ").is_none());
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let clipboard = CommandClipboard::new("definitely-not-a-clipboard-tool", Vec::new());
        let err = clipboard.write_text("hello").await.unwrap_err();
        assert!(matches!(err, ClipboardError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_is_reported() {
        let clipboard = CommandClipboard::new("false", Vec::new());
        let err = clipboard.write_text("hello").await.unwrap_err();
        assert!(matches!(err, ClipboardError::Exit { code: Some(1), .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn successful_program_accepts_the_text() {
        let clipboard = CommandClipboard::new("cat", Vec::new());
        clipboard.write_text("hello").await.unwrap();
    }
}
