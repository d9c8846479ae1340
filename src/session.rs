use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cli::{Assignment, Cli, Commands};
use crate::clipboard::build_clipboard;
use crate::config::Config;
use crate::handlers::commands::{record_json, record_yaml, Studio};
use crate::handlers::copy::{handle_copy, CopyOutcome};
use crate::handlers::media::handle_avatar_file;
use crate::handlers::responses::{ConsoleNotifier, Notifier};
use crate::media::AvatarFile;
use crate::prompt::seed::load_seed;
use crate::prompt::PromptRecord;
use crate::render::{render_field_reference, STUDIO_TITLE};
use crate::state::StudioState;

/// Seed file (if any) first, then each `--set` in order.
pub fn initial_record(seed: Option<&Path>, assignments: &[Assignment]) -> Result<PromptRecord> {
    let mut record = match seed {
        Some(path) => {
            let record = load_seed(path)
                .with_context(|| format!("Failed to load seed {}", path.display()))?;
            info!("Seeded record from {}", path.display());
            record
        }
        None => PromptRecord::default(),
    };
    for assignment in assignments {
        record
            .set_field(assignment.field, &assignment.value)
            .with_context(|| format!("Invalid --set for {}", assignment.field))?;
    }
    Ok(record)
}

pub async fn build_studio(cli: &Cli, config: &Config) -> Result<Studio> {
    let seed = cli.seed.as_deref().or(config.seed_path.as_deref());
    let record = initial_record(seed, &cli.assignments)?;
    let state = StudioState::new(record, config.copy_feedback());
    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);

    if let Some(path) = &cli.avatar {
        let file = AvatarFile::select(path.clone(), cli.avatar_type.clone()).await;
        handle_avatar_file(&state, Some(file), notifier.as_ref()).await;
    }

    let clipboard = build_clipboard(config.clipboard_backend, config.clipboard_command.as_deref());
    info!("Using clipboard backend {}", clipboard.name());
    Ok(Studio::new(
        state,
        Arc::from(clipboard),
        notifier,
        &config.log_dir,
    ))
}

pub async fn run(cli: Cli, config: &Config) -> Result<()> {
    let studio = build_studio(&cli, config).await?;

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            run_interactive(&studio, stdin).await
        }
        Commands::Compose { copy } => {
            println!("{}", studio.state.prompt());
            if copy {
                let outcome = handle_copy(
                    &studio.state,
                    studio.clipboard.as_ref(),
                    studio.notifier.as_ref(),
                )
                .await;
                if outcome == CopyOutcome::Failed {
                    bail!("copy via {} failed", studio.clipboard.name());
                }
                eprintln!("Copied!");
            }
            Ok(())
        }
        Commands::Record { json } => {
            let record = studio.state.snapshot();
            if json {
                println!("{}", record_json(&record)?);
            } else {
                print!("{}", record_yaml(&record)?);
            }
            Ok(())
        }
        Commands::Fields => {
            println!("{}", render_field_reference(&PromptRecord::default()));
            Ok(())
        }
    }
}

fn show_prompt_marker() {
    print!("> ");
    if let Err(err) = std::io::stdout().flush() {
        warn!("Failed to flush stdout: {err}");
    }
}

/// Reads commands until `quit` or end of input. Intake and copy run as
/// spawned tasks; pending ones are awaited before returning so piped
/// sessions finish their work.
pub async fn run_interactive<R>(studio: &Studio, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    info!("Interactive session started");
    println!("{}", studio.render());
    println!();
    println!("{STUDIO_TITLE}: type `help` for commands.");

    let mut pending: Vec<JoinHandle<()>> = Vec::new();
    let mut lines = input.lines();
    loop {
        show_prompt_marker();
        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            println!();
            break;
        };

        let reply = studio.handle_line(&line);
        if let Some(text) = reply.text {
            println!("{text}");
        }
        if let Some(task) = reply.task {
            pending.push(task);
        }
        pending.retain(|task| !task.is_finished());
        if reply.quit {
            break;
        }
    }

    for task in pending {
        if let Err(err) = task.await {
            warn!("Background action did not finish: {err}");
        }
    }
    info!("Interactive session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{Field, Tone};

    #[test]
    fn assignments_apply_over_the_seed() {
        let dir = tempfile::tempdir().unwrap();
        let seed = dir.path().join("seed.yaml");
        std::fs::write(&seed, "avatar_name: Kai\ntone: urgent\n").unwrap();

        let record = initial_record(
            Some(&seed),
            &[Assignment {
                field: Field::AvatarName,
                value: "Mina".to_string(),
            }],
        )
        .unwrap();
        assert_eq!(record.avatar_name, "Mina");
        assert_eq!(record.tone, Tone::Urgent);
    }

    #[test]
    fn invalid_assignment_is_an_error() {
        let result = initial_record(
            None,
            &[Assignment {
                field: Field::Lighting,
                value: "candlelight".to_string(),
            }],
        );
        assert!(result.is_err());
    }
}
