use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tubescribe::batch::{self, BatchOptions};
use tubescribe::cli::Cli;
use tubescribe::config::Config;
use tubescribe::fetch::YoutubeFetcher;
use tubescribe::transcribe::WhisperTranscriber;
use tubescribe::{model, utils};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "tubescribe=debug"
    } else {
        "tubescribe=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Check for required external tools (non-fatal, they may still appear in PATH later)
    let missing_deps = utils::check_dependencies().await;
    if !missing_deps.is_empty() {
        eprintln!("⚠️  Dependency check warnings:");
        for dep in missing_deps {
            eprintln!("   • {}", dep);
        }
        eprintln!("   (Continuing anyway - tools may be available)");
    }

    // A path to an existing file is a URL list; anything else is one URL
    let input_path = Path::new(&cli.input);
    let urls = if input_path.is_file() {
        utils::read_url_list(input_path)?
    } else {
        vec![utils::validate_and_normalize_url(&cli.input)?]
    };

    let config = Config::load().await?;

    let model_size = cli.model.unwrap_or(config.app.default_model);
    let output_dir = cli
        .output_dir
        .clone()
        .unwrap_or_else(|| config.app.output_dir.clone());
    let concurrency = cli
        .concurrency
        .unwrap_or(config.app.max_concurrent_downloads);

    // Nothing to do: report the empty tally without touching the model
    if urls.is_empty() {
        println!("File is empty or contains no valid URLs.");
        println!("\nBatch process complete. 0 successful, 0 failed.");
        return Ok(());
    }

    // Temp downloads live in the configured directory, or a per-run scratch
    // directory that is removed when the guard drops.
    let mut _scratch: Option<tempfile::TempDir> = None;
    let temp_dir: PathBuf = match &config.app.temp_dir {
        Some(dir) => {
            fs_err::create_dir_all(dir)?;
            dir.clone()
        }
        None => {
            let dir = tempfile::tempdir()?;
            let path = dir.path().to_path_buf();
            _scratch = Some(dir);
            path
        }
    };

    // Load the model once, before any download is dispatched; it is shared
    // read-only by every transcription in the batch.
    let model_path = model::ensure_model(model_size, cli.quiet).await?;
    let transcriber = WhisperTranscriber::load(&model_path)?;
    let fetcher = YoutubeFetcher::new();

    let options = BatchOptions {
        output_dir,
        temp_dir,
        concurrency,
    };
    let report = batch::run(&urls, Arc::new(fetcher), Arc::new(transcriber), &options).await?;

    println!(
        "\nBatch process complete. {} successful, {} failed.",
        console::style(report.succeeded).green(),
        console::style(report.failed).red()
    );

    Ok(())
}
