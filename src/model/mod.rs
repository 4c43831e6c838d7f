use anyhow::{Context, Result};
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::PipelineError;

/// Base URL of the upstream ggml model repository
const MODEL_REPO_URL: &str = "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

/// Whisper model size tiers, smallest/fastest to largest/slowest
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSize {
    Tiny,
    Base,
    Small,
    Medium,
    Large,
}

impl ModelSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelSize::Tiny => "tiny",
            ModelSize::Base => "base",
            ModelSize::Small => "small",
            ModelSize::Medium => "medium",
            ModelSize::Large => "large",
        }
    }

    /// ggml weight file name for this size
    pub fn file_name(&self) -> String {
        match self {
            // "large" upstream is versioned; v3 is the current alias target
            ModelSize::Large => "ggml-large-v3.bin".to_string(),
            other => format!("ggml-{}.bin", other.as_str()),
        }
    }
}

impl std::fmt::Display for ModelSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Directory where downloaded model weights are cached
pub fn models_dir() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir().context("Could not determine cache directory")?;
    Ok(cache_dir.join("tubescribe").join("models"))
}

/// On-disk path for the given model size
pub fn model_path(size: ModelSize) -> Result<PathBuf> {
    Ok(models_dir()?.join(size.file_name()))
}

/// Make sure the ggml weights for `size` exist locally, downloading them on
/// first use. Returns the path to the weight file.
pub async fn ensure_model(size: ModelSize, quiet: bool) -> Result<PathBuf> {
    let path = model_path(size)?;

    if path.exists() {
        tracing::debug!("Model {} already cached at {}", size, path.display());
        return Ok(path);
    }

    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }

    let url = format!("{}/{}", MODEL_REPO_URL, size.file_name());
    tracing::info!("Downloading {} model from {}", size, url);

    let response = reqwest::get(&url).await.map_err(|e| {
        PipelineError::ModelSetupFailed(format!("request for {} failed: {}", url, e))
    })?;

    if !response.status().is_success() {
        return Err(PipelineError::ModelSetupFailed(format!(
            "model download failed: HTTP {}",
            response.status()
        ))
        .into());
    }

    let total_size = response.content_length().unwrap_or(0);
    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(total_size)
    };
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
            .unwrap(),
    );
    progress.set_message(format!("Downloading {} model...", size));

    // Download to a partial file first so an interrupted fetch never leaves a
    // truncated weight file at the final path.
    let partial_path = path.with_extension("bin.part");
    let mut file = fs_err::File::create(&partial_path)?;
    let mut downloaded = 0u64;
    let mut stream = response.bytes_stream();

    use futures_util::StreamExt;
    use std::io::Write;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| {
            PipelineError::ModelSetupFailed(format!("model download interrupted: {}", e))
        })?;
        file.write_all(&chunk)?;
        downloaded += chunk.len() as u64;
        progress.set_position(downloaded);
    }

    drop(file);
    fs_err::rename(&partial_path, &path)?;
    progress.finish_with_message("Model download complete");

    Ok(path)
}
