use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::clipboard::Clipboard;
use crate::handlers::copy::{handle_copy, CopyOutcome};
use crate::handlers::media::{handle_avatar_file, IntakeOutcome};
use crate::handlers::responses::{Notice, NoticeKind, Notifier};
use crate::media::data_uri::abbreviate_data_uri;
use crate::media::AvatarFile;
use crate::prompt::{Field, PromptRecord, RecordError};
use crate::render::{render_field_reference, render_form};
use crate::state::StudioState;
use crate::utils::logging::{tail_log, STUDIO_LOG};

pub const DEFAULT_LOG_TAIL: usize = 20;
const RECORD_URI_CHARS: usize = 48;

pub const HELP_TEXT: &str = "\
Commands:
  show                          render the whole form
  prompt                        print the generated prompt
  set <field> <value>           change a field (\\n inserts a line break)
  clear <field>                 empty a text field or reset a choice
  avatar <path> [--type <mime>] upload an avatar image
  copy                          copy the generated prompt to the clipboard
  fields                        list fields, defaults and options
  record                        print the current record as YAML
  logs [n]                      show the newest lines of the studio log
  help                          show this help
  quit                          leave the studio";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    Show,
    Prompt,
    Set { field: Field, value: String },
    Clear { field: Field },
    Avatar { path: PathBuf, declared_type: Option<String> },
    Copy,
    Fields,
    Record,
    Logs { lines: usize },
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (type `help` for the list)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error(transparent)]
    Record(#[from] RecordError),
}

/// `\n` becomes a line break and `\\` a literal backslash; any other escape
/// is kept as typed.
pub fn unescape_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Terminals paste dropped files quoted or with escaped spaces.
pub fn clean_dropped_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    for quote in ['\'', '"'] {
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return PathBuf::from(inner);
        }
    }
    PathBuf::from(trimmed.replace("\\ ", " "))
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(index) => (&input[..index], &input[index..]),
        None => (input, ""),
    }
}

const TYPE_FLAG: &str = "--type";

// Last `--type` that stands alone as a word, so paths containing it survive.
fn find_type_flag(rest: &str) -> Option<usize> {
    rest.match_indices(TYPE_FLAG)
        .map(|(index, _)| index)
        .filter(|&index| {
            let before = rest[..index].chars().next_back();
            let after = rest[index + TYPE_FLAG.len()..].chars().next();
            before.map_or(true, char::is_whitespace) && after.map_or(true, char::is_whitespace)
        })
        .last()
}

fn parse_avatar(rest: &str) -> Result<Command, CommandError> {
    const USAGE: &str = "avatar <path> [--type <mime>]";
    let (path_part, declared_type) = match find_type_flag(rest) {
        Some(index) => {
            let declared = rest[index + TYPE_FLAG.len()..].trim();
            if declared.is_empty() {
                return Err(CommandError::Usage(USAGE));
            }
            (&rest[..index], Some(declared.to_string()))
        }
        None => (rest, None),
    };
    if path_part.trim().is_empty() {
        return Err(CommandError::Usage(USAGE));
    }
    Ok(Command::Avatar {
        path: clean_dropped_path(path_part),
        declared_type,
    })
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let (word, rest) = split_word(line);
    match word.to_lowercase().as_str() {
        "" => Ok(Command::Empty),
        "show" => Ok(Command::Show),
        "prompt" => Ok(Command::Prompt),
        "copy" => Ok(Command::Copy),
        "fields" => Ok(Command::Fields),
        "record" => Ok(Command::Record),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        "set" => {
            let (name, value) = split_word(rest);
            if name.is_empty() {
                return Err(CommandError::Usage("set <field> <value>"));
            }
            let field = Field::parse(name)?;
            let value = value.strip_prefix(' ').unwrap_or(value);
            Ok(Command::Set {
                field,
                value: unescape_value(value),
            })
        }
        "clear" => {
            let name = rest.trim();
            if name.is_empty() {
                return Err(CommandError::Usage("clear <field>"));
            }
            Ok(Command::Clear {
                field: Field::parse(name)?,
            })
        }
        "avatar" | "upload" => parse_avatar(rest),
        "logs" => {
            let raw = rest.trim();
            if raw.is_empty() {
                return Ok(Command::Logs {
                    lines: DEFAULT_LOG_TAIL,
                });
            }
            raw.parse::<usize>()
                .map(|lines| Command::Logs { lines })
                .map_err(|_| CommandError::Usage("logs [n]"))
        }
        _ => Err(CommandError::Unknown(word.to_string())),
    }
}

fn displayable(record: &PromptRecord) -> PromptRecord {
    let mut shown = record.clone();
    shown.avatar_image = shown
        .avatar_image
        .as_deref()
        .map(|uri| abbreviate_data_uri(uri, RECORD_URI_CHARS));
    shown
}

pub fn record_yaml(record: &PromptRecord) -> anyhow::Result<String> {
    Ok(serde_yaml::to_string(&displayable(record))?)
}

pub fn record_json(record: &PromptRecord) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&displayable(record))?)
}

#[derive(Debug, Default)]
pub struct Reply {
    pub text: Option<String>,
    pub task: Option<JoinHandle<()>>,
    pub quit: bool,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Reply {
            text: Some(text.into()),
            ..Reply::default()
        }
    }

    fn task(task: JoinHandle<()>) -> Self {
        Reply {
            task: Some(task),
            ..Reply::default()
        }
    }
}

#[derive(Clone)]
pub struct Studio {
    pub state: StudioState,
    pub clipboard: Arc<dyn Clipboard>,
    pub notifier: Arc<dyn Notifier>,
    pub logs_dir: PathBuf,
}

impl Studio {
    pub fn new(
        state: StudioState,
        clipboard: Arc<dyn Clipboard>,
        notifier: Arc<dyn Notifier>,
        logs_dir: impl AsRef<Path>,
    ) -> Self {
        Studio {
            state,
            clipboard,
            notifier,
            logs_dir: logs_dir.as_ref().to_path_buf(),
        }
    }

    pub fn render(&self) -> String {
        render_form(
            &self.state.snapshot(),
            self.state.avatar_preview().as_ref(),
            self.state.copy_indicator.is_active(),
        )
    }

    pub fn handle_line(&self, line: &str) -> Reply {
        match parse_command(line) {
            Ok(command) => self.execute(command),
            Err(err) => {
                warn!("Rejected input {line:?}: {err}");
                self.notifier
                    .notify(Notice::new(NoticeKind::InvalidInput, err.to_string()));
                Reply::default()
            }
        }
    }

    pub fn execute(&self, command: Command) -> Reply {
        match command {
            Command::Empty => Reply::default(),
            Command::Show => Reply::text(self.render()),
            Command::Prompt => Reply::text(self.state.prompt()),
            Command::Set { field, value } => match self.state.set_field(field, &value) {
                Ok(()) => {
                    info!("Set {field}");
                    Reply::text(format!("Updated {field}.\n\n{}", self.state.prompt()))
                }
                Err(err) => {
                    self.notifier
                        .notify(Notice::new(NoticeKind::InvalidInput, err.to_string()));
                    Reply::default()
                }
            },
            Command::Clear { field } => {
                self.state.clear_field(field);
                info!("Cleared {field}");
                Reply::text(format!("Cleared {field}.\n\n{}", self.state.prompt()))
            }
            Command::Avatar {
                path,
                declared_type,
            } => {
                let studio = self.clone();
                Reply::task(tokio::spawn(async move {
                    let file = AvatarFile::select(path, declared_type).await;
                    let name = file.display_name();
                    let outcome =
                        handle_avatar_file(&studio.state, Some(file), studio.notifier.as_ref())
                            .await;
                    if let IntakeOutcome::Loaded { preview } = outcome {
                        let described = preview
                            .map(|preview| preview.describe())
                            .unwrap_or_else(|| "preview unavailable".to_string());
                        println!("Avatar loaded: {name} ({described})");
                    }
                }))
            }
            Command::Copy => {
                let studio = self.clone();
                Reply::task(tokio::spawn(async move {
                    let outcome = handle_copy(
                        &studio.state,
                        studio.clipboard.as_ref(),
                        studio.notifier.as_ref(),
                    )
                    .await;
                    if outcome == CopyOutcome::Copied {
                        println!("Copied!");
                    }
                }))
            }
            Command::Fields => Reply::text(render_field_reference(&PromptRecord::default())),
            Command::Record => match record_yaml(&self.state.snapshot()) {
                Ok(yaml) => Reply::text(yaml.trim_end().to_string()),
                Err(err) => {
                    warn!("Failed to render record: {err}");
                    Reply::default()
                }
            },
            Command::Logs { lines } => {
                match tail_log(&self.logs_dir, STUDIO_LOG, lines) {
                    Ok(Some(excerpt)) => Reply::text(format!(
                        "{}:\n{}",
                        excerpt.file.display(),
                        excerpt.lines.join("\n")
                    )),
                    Ok(None) => Reply::text("No log lines yet."),
                    Err(err) => {
                        warn!("Failed to read logs: {err}");
                        Reply::text(format!("Unable to read logs: {err}"))
                    }
                }
            }
            Command::Help => Reply::text(HELP_TEXT),
            Command::Quit => Reply {
                quit: true,
                ..Reply::default()
            },
        }
    }
}
