use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::utils::timing::TIMING_TARGET;

pub const STUDIO_LOG: &str = "studio.log";
pub const TIMING_LOG: &str = "timing.log";
const STUDIO_JSON_LOG: &str = "studio.jsonl";
const TIMING_JSON_LOG: &str = "timing.jsonl";

/// Background writers flush until this is dropped.
pub struct LogWriters {
    _guards: Vec<WorkerGuard>,
}

#[derive(Debug, Clone)]
pub struct LogExcerpt {
    pub file: PathBuf,
    pub lines: Vec<String>,
}

pub fn level_filter(value: &str) -> LevelFilter {
    let value = value.trim();
    if value.eq_ignore_ascii_case("warning") {
        return LevelFilter::WARN;
    }
    value.parse().unwrap_or(LevelFilter::INFO)
}

fn daily(log_dir: &Path, file_name: &str, guards: &mut Vec<WorkerGuard>) -> NonBlocking {
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(log_dir, file_name));
    guards.push(guard);
    writer
}

fn studio_targets(level: LevelFilter) -> Targets {
    Targets::new()
        .with_default(level)
        .with_target(TIMING_TARGET, LevelFilter::OFF)
}

fn timing_targets() -> Targets {
    Targets::new()
        .with_default(LevelFilter::OFF)
        .with_target(TIMING_TARGET, LevelFilter::INFO)
}

/// Studio and timing events each go to a plain and a JSON daily file. The
/// console layer writes to stderr; stdout carries prompts only.
pub fn init_logging(log_dir: &Path, level: &str, console_level: &str) -> LogWriters {
    if let Err(err) = fs::create_dir_all(log_dir) {
        eprintln!("Failed to create log directory {}: {err}", log_dir.display());
    }

    let mut guards = Vec::with_capacity(4);
    let studio_text = daily(log_dir, STUDIO_LOG, &mut guards);
    let studio_json = daily(log_dir, STUDIO_JSON_LOG, &mut guards);
    let timing_text = daily(log_dir, TIMING_LOG, &mut guards);
    let timing_json = daily(log_dir, TIMING_JSON_LOG, &mut guards);

    let studio_filter = studio_targets(level_filter(level));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(studio_text)
                .with_ansi(false)
                .with_filter(studio_filter.clone()),
        )
        .with(
            fmt::layer()
                .json()
                .with_writer(studio_json)
                .with_filter(studio_filter),
        )
        .with(
            fmt::layer()
                .with_writer(timing_text)
                .with_ansi(false)
                .with_filter(timing_targets()),
        )
        .with(
            fmt::layer()
                .json()
                .with_writer(timing_json)
                .with_filter(timing_targets()),
        )
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_filter(studio_targets(level_filter(console_level))),
        )
        .init();

    LogWriters { _guards: guards }
}

/// Last `count` lines of the newest file in `log_dir` named `prefix*`
/// (daily rotation adds a date suffix).
pub fn tail_log(log_dir: &Path, prefix: &str, count: usize) -> io::Result<Option<LogExcerpt>> {
    if count == 0 {
        return Ok(None);
    }
    let Some(file) = newest_log(log_dir, prefix)? else {
        return Ok(None);
    };
    let lines = last_lines(&file, count)?;
    Ok(Some(LogExcerpt { file, lines }))
}

// Ties on modification time go to the later name, i.e. the later date.
fn newest_log(log_dir: &Path, prefix: &str) -> io::Result<Option<PathBuf>> {
    if !log_dir.is_dir() {
        return Ok(None);
    }

    let mut candidates = Vec::new();
    for entry in fs::read_dir(log_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() || !entry.file_name().to_string_lossy().starts_with(prefix)
        {
            continue;
        }
        let modified = entry
            .metadata()
            .and_then(|meta| meta.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        candidates.push((modified, entry.path()));
    }

    Ok(candidates.into_iter().max().map(|(_, path)| path))
}

fn last_lines(file: &Path, count: usize) -> io::Result<Vec<String>> {
    let mut window = VecDeque::with_capacity(count);
    for line in BufReader::new(File::open(file)?).lines() {
        if window.len() == count {
            window.pop_front();
        }
        window.push_back(line?);
    }
    Ok(window.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_parse_with_info_fallback() {
        assert_eq!(level_filter("WARNING"), LevelFilter::WARN);
        assert_eq!(level_filter(" debug "), LevelFilter::DEBUG);
        assert_eq!(level_filter("off"), LevelFilter::OFF);
        assert_eq!(level_filter("chatty"), LevelFilter::INFO);
    }

    #[test]
    fn tail_reads_the_newest_matching_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("studio.log.2026-10-18");
        fs::write(&path, "one\ntwo\nthree\n").unwrap();
        fs::write(dir.path().join("timing.log.2026-10-18"), "other\n").unwrap();

        let excerpt = tail_log(dir.path(), STUDIO_LOG, 2).unwrap().unwrap();
        assert_eq!(excerpt.file, path);
        assert_eq!(excerpt.lines, vec!["two", "three"]);

        assert!(tail_log(dir.path(), STUDIO_LOG, 0).unwrap().is_none());
        assert!(tail_log(&dir.path().join("missing"), STUDIO_LOG, 5)
            .unwrap()
            .is_none());
    }
}
