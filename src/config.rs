use std::env;
use std::path::PathBuf;
use std::time::Duration;

use once_cell::sync::Lazy;

use crate::clipboard::ClipboardBackend;

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_CONSOLE_LOG_LEVEL: &str = "warn";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_COPY_FEEDBACK_MS: u64 = 2500;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub console_log_level: String,
    pub log_dir: PathBuf,
    pub copy_feedback_ms: u64,
    pub clipboard_backend: ClipboardBackend,
    pub clipboard_command: Option<String>,
    pub seed_path: Option<PathBuf>,
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);

fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_optional(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Config {
    pub fn from_env() -> Self {
        let clipboard_backend = env_optional("STUDIO_CLIPBOARD")
            .and_then(|value| ClipboardBackend::parse(&value))
            .unwrap_or(ClipboardBackend::Auto);

        Config {
            log_level: env_string("STUDIO_LOG_LEVEL", DEFAULT_LOG_LEVEL),
            console_log_level: env_string("STUDIO_CONSOLE_LOG_LEVEL", DEFAULT_CONSOLE_LOG_LEVEL),
            log_dir: PathBuf::from(env_string("STUDIO_LOG_DIR", DEFAULT_LOG_DIR)),
            copy_feedback_ms: env_u64("STUDIO_COPY_FEEDBACK_MS", DEFAULT_COPY_FEEDBACK_MS),
            clipboard_backend,
            clipboard_command: env_optional("STUDIO_CLIPBOARD_COMMAND"),
            seed_path: env_optional("STUDIO_SEED_PATH").map(PathBuf::from),
        }
    }

    pub fn copy_feedback(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }
}
