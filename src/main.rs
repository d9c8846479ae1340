use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;
use tracing::{error, info};

use avatar_prompt_studio::cli::Cli;
use avatar_prompt_studio::config::CONFIG;
use avatar_prompt_studio::session::run;
use avatar_prompt_studio::utils::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    let _log_writers = init_logging(&CONFIG.log_dir, &CONFIG.log_level, &CONFIG.console_log_level);
    info!("Starting avatar prompt studio");

    if let Err(err) = run(cli, &CONFIG).await {
        error!("Studio exited with error: {err:#}");
        return Err(err);
    }
    Ok(())
}
