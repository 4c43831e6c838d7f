//! tubescribe - transcribe YouTube videos to Markdown
//!
//! This library downloads audio from YouTube URLs with yt-dlp, transcribes it
//! with a locally loaded Whisper model, and writes one Markdown document per
//! video. Batches of URLs download concurrently and transcribe sequentially
//! through the single loaded model.

pub mod batch;
pub mod cli;
pub mod config;
pub mod fetch;
pub mod model;
pub mod output;
pub mod transcribe;
pub mod utils;

pub use batch::{BatchOptions, BatchReport};
pub use cli::Cli;
pub use config::Config;
pub use fetch::{DownloadedAudio, MediaFetcher, VideoMetadata};
pub use model::ModelSize;
pub use transcribe::{SpeechToText, Transcript, WhisperTranscriber};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to the transcription pipeline
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Resolver returned unexpected metadata: {0}")]
    UnexpectedMetadata(String),

    #[error("Model setup failed: {0}")]
    ModelSetupFailed(String),

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("Failed to write transcript: {0}")]
    WriteFailed(String),
}
