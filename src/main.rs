use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use oceanid::api::{ApiClient, ClassificationService, HistoryService, ImageUpload, ModelId};
use oceanid::config::{Config, ConfigError};
use oceanid::logging::{init_stderr_tracing, init_tracing};
use oceanid::session::Session;

/// Terminal client for the OceanID image classification service.
#[derive(Debug, Parser)]
#[command(name = "oceanid", version, about)]
struct Cli {
    /// Config file to use instead of the default location.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override `[service] base_url`.
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand, PartialEq)]
enum Command {
    /// Interactive terminal UI (default).
    Tui,
    /// Classify one image.
    Classify {
        /// resnet, efficientnet or mobilenet.
        #[arg(long, short, default_value = "")]
        model: String,
        image: PathBuf,
    },
    /// List past classifications.
    History {
        #[arg(long)]
        json: bool,
    },
    /// Delete one history record.
    Delete { image_id: u64 },
}

fn load_config(cli: &Cli) -> Result<Config, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(base_url) = &cli.base_url {
        config.service.base_url = base_url.clone();
        config.validate()?;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.clone().unwrap_or(Command::Tui);

    match command {
        Command::Tui => init_tracing(),
        _ => init_stderr_tracing(),
    }

    let config = load_config(&cli)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    match command {
        Command::Tui => {
            let _enter = runtime.enter();
            oceanid::ui::run(&config)
        }
        Command::Classify { model, image } => runtime.block_on(classify(&config, &model, &image)),
        Command::History { json } => runtime.block_on(history(&config, json)),
        Command::Delete { image_id } => runtime.block_on(delete(&config, image_id)),
    }
}

async fn classify(config: &Config, model: &str, image: &Path) -> anyhow::Result<()> {
    let client = ApiClient::new(&config.service)?;
    let mut session = Session::from_config(&config.ui, None);
    session.uploads_mut().select_model(ModelId::parse_choice(model)?);

    // The model gate runs before the file is touched.
    let ticket = session.uploads_mut().begin_upload()?;
    let upload = ImageUpload::from_path(image)?;
    let result = client.classify(&upload, ticket.model()).await;
    let payload = session.uploads_mut().complete_upload(ticket, result)?;

    println!("image_id:   {}", payload.image_id);
    println!("class:      {}", payload.class_name);
    println!("confidence: {}", payload.confidence);
    println!("model:      {}", payload.model_used);
    if let Some(summary) = &payload.summary {
        println!();
        println!("{}", summary);
    }
    Ok(())
}

async fn history(config: &Config, json: bool) -> anyhow::Result<()> {
    let client = ApiClient::new(&config.service)?;
    let records = client.fetch_history().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No classifications yet");
    }
    for record in &records {
        println!(
            "{:>6}  {:<24} {:<8} {:<14} {}",
            record.image_id,
            record.label(),
            record.confidence.as_deref().unwrap_or("-"),
            record.model_used.as_deref().unwrap_or("-"),
            record.created_at.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

async fn delete(config: &Config, image_id: u64) -> anyhow::Result<()> {
    let client = ApiClient::new(&config.service)?;
    let mut session = Session::from_config(&config.ui, None);
    session.delete_record(&client, image_id).await?;
    println!("Deleted record {}", image_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oceanid::session::UploadError;

    #[test]
    fn no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["oceanid"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn classify_model_defaults_to_empty() {
        let cli = Cli::try_parse_from(["oceanid", "classify", "fish.png"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Classify {
                model: String::new(),
                image: PathBuf::from("fish.png"),
            })
        );
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "oceanid",
            "history",
            "--json",
            "--base-url",
            "http://10.0.0.2:8000",
        ])
        .unwrap();
        assert_eq!(cli.command, Some(Command::History { json: true }));
        assert_eq!(cli.base_url.as_deref(), Some("http://10.0.0.2:8000"));
    }

    #[test]
    fn delete_requires_numeric_id() {
        assert!(Cli::try_parse_from(["oceanid", "delete", "abc"]).is_err());
        let cli = Cli::try_parse_from(["oceanid", "delete", "42"]).unwrap();
        assert_eq!(cli.command, Some(Command::Delete { image_id: 42 }));
    }

    #[tokio::test]
    async fn classify_without_model_fails_before_reading_the_image() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("fish.png");

        let err = classify(&Config::default(), "", &missing).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<UploadError>(),
            Some(UploadError::ModelRequired)
        ));
    }

    #[test]
    fn base_url_override_is_validated() {
        let dir = tempfile::TempDir::new().unwrap();
        let cli = Cli::try_parse_from([
            "oceanid",
            "--config",
            dir.path().join("missing.toml").to_str().unwrap(),
            "--base-url",
            "ftp://nowhere",
        ])
        .unwrap();
        assert!(matches!(
            load_config(&cli),
            Err(ConfigError::ValidationError { .. })
        ));
    }
}
