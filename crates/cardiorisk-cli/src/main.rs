use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;

mod commands;

#[derive(Parser)]
#[command(name = "cardiorisk", version, about = "Heart disease risk assessment client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the clinical features the service expects
    Features,
    /// Fill in the assessment form and submit it
    Predict {
        /// Pre-fill a field, e.g. `--value age=55`
        #[arg(long = "value", value_name = "ID=VALUE", value_parser = commands::parse_assignment)]
        values: Vec<(String, String)>,
        /// Do not prompt; missing values fail validation
        #[arg(long)]
        no_prompt: bool,
    },
    /// Show this session's previous predictions
    History,
    /// Save this session's history as a JSON file
    Export {
        /// Directory to write into (defaults to the current directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Print the persisted session identity
    Session,
    /// Check whether the service has its model loaded
    Health,
    /// Inspect or edit the saved configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    Show,
    SetUrl { url: String },
    Reset,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Features => commands::features().await,
        Command::Predict { values, no_prompt } => commands::predict(values, no_prompt).await,
        Command::History => commands::history().await,
        Command::Export { dir } => commands::export(dir).await,
        Command::Session => commands::session(),
        Command::Health => commands::health().await,
        Command::Config { action } => match action {
            ConfigAction::Show => commands::config_show(),
            ConfigAction::SetUrl { url } => commands::config_set_url(url),
            ConfigAction::Reset => commands::config_reset(),
        },
    }
}
