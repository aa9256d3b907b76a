mod bot;
mod check_cmd;
mod commands_cmd;
mod terminal_output;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use switchboard_config::{
    config_dir, config_file_path, load_and_prepare, validate_for_run, DEFAULT_MESSAGE_CACHE,
};
use switchboard_discord::parse_intents;
use switchboard_logging::{init_logger, redact_sensitive_data, LogOptions};

#[derive(Parser)]
#[command(name = "switchboard")]
#[command(about = "Switchboard: prefix and interaction command routing for Discord bots")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.switchboard/switchboard.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to Discord and serve commands
    Run,
    /// Validate the config and print it with secrets masked
    Check {
        /// Also require what is needed to connect (bot token)
        #[arg(long)]
        strict: bool,
    },
    /// List the commands the bot registers
    Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = cli
        .config
        .unwrap_or_else(|| config_file_path(&config_dir()));

    match cli.command {
        Commands::Run => run(&path).await,
        Commands::Check { strict } => check_cmd::run(&path, strict).await,
        Commands::Commands => commands_cmd::run(&path).await,
    }
}

async fn run(path: &Path) -> Result<()> {
    let config = load_and_prepare(path).await?;

    init_logger(&LogOptions {
        level: config.logging.level.clone().unwrap_or_else(|| "info".to_string()),
        dir: config.logging.dir.clone(),
        json: config.logging.json,
    });

    let report = validate_for_run(&config);
    for warning in &report.warnings {
        warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    if !report.is_valid() {
        for err in &report.errors {
            error!(path = %err.path, message = %err.message, "Config error");
        }
        anyhow::bail!("Config at {} is invalid", path.display());
    }

    let intents = parse_intents(&config.intents)?;
    let board = bot::build(&config)?;
    info!(
        prefix = %board.prefix(),
        text = board.registry().text_commands().len(),
        interactions = board.registry().interaction_commands().len(),
        "Starting Switchboard"
    );

    let max_messages = config.discord.message_cache.unwrap_or(DEFAULT_MESSAGE_CACHE);
    let result =
        switchboard_discord::run(&config.discord.token, intents, max_messages, board.router()).await;
    if let Err(e) = result {
        let message = redact_sensitive_data(&format!("{e:#}"));
        error!(error = %message, "Discord client stopped");
        anyhow::bail!(message);
    }
    Ok(())
}
