//! deck-outline - Seed-stage pitch deck outlines from founder facts
//!
//! Entry point for the deck-outline CLI and HTTP service.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use deck_outline::cli::{Cli, Commands};
use deck_outline::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Completions { shell } => {
            deck_outline::cli::completions::print(shell);
        }
        command => {
            // Load configuration only for runtime commands.
            let settings = Settings::load()?;

            // Execute command
            match command {
                Commands::Serve { bind } => {
                    deck_outline::cli::commands::serve(settings, bind).await?;
                }
                Commands::Generate { input, pretty } => {
                    deck_outline::cli::commands::generate_outline(&settings, input, pretty)
                        .await?;
                }
                Commands::Health { json } => {
                    deck_outline::cli::commands::show_health(&settings, json)?;
                }
                Commands::Config(config_cmd) => {
                    deck_outline::cli::commands::config_command(&settings, config_cmd)?;
                }
                Commands::Completions { .. } => unreachable!(),
            }
        }
    }

    Ok(())
}
