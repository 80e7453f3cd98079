//! CLI command implementations

use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::cli::args::ConfigCommand;
use crate::config::Settings;
use crate::outline::OutlineService;
use crate::APP_NAME;

/// Run the HTTP service
pub async fn serve(mut settings: Settings, bind: Option<String>) -> Result<()> {
    if let Some(bind) = bind {
        settings.server.bind = bind;
    }
    crate::server::run(settings).await
}

/// Generate an outline once and print it
pub async fn generate_outline(settings: &Settings, input: Option<PathBuf>, pretty: bool) -> Result<()> {
    let body = read_input(input.as_deref())?;
    let service = OutlineService::from_settings(settings.clone())?;

    let outline = service
        .generate(&body)
        .await
        .context("Failed to generate outline")?;

    let rendered = if pretty {
        serde_json::to_string_pretty(&outline)?
    } else {
        outline.to_string()
    };
    println!("{}", rendered);

    Ok(())
}

/// Print the same readiness report the GET probe returns
pub fn show_health(settings: &Settings, json: bool) -> Result<()> {
    let service = OutlineService::from_settings(settings.clone())?;
    let report = service.health();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} {}", APP_NAME, report.version);
    println!("model:   {}", report.model);
    println!(
        "api key: {}",
        if report.has_key { "configured" } else { "missing" }
    );
    if !report.has_key {
        println!();
        println!("hint: set OPENAI_API_KEY or llm.api_key in the config file.");
    }

    Ok(())
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let toml = toml::to_string_pretty(&settings.redacted())?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Settings::config_path()?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

// Helper functions

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read(path)
            .with_context(|| format!("Failed to read founder input: {}", path.display())),
        _ => {
            let mut body = Vec::new();
            std::io::stdin()
                .read_to_end(&mut body)
                .context("Failed to read founder input from stdin")?;
            Ok(body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_input_reads_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("founder.json");
        std::fs::write(&path, br#"{"startup":"Foo"}"#)?;

        assert_eq!(read_input(Some(path.as_path()))?, br#"{"startup":"Foo"}"#.to_vec());
        Ok(())
    }

    #[test]
    fn read_input_reports_missing_file() {
        let err = read_input(Some(Path::new("/definitely/not/here.json")))
            .expect_err("missing file should fail");
        assert!(err.to_string().contains("Failed to read founder input"));
    }
}
