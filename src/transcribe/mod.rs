use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::{PipelineError, Result};

pub mod audio;

#[cfg(test)]
use mockall::automock;

/// Individual transcript segment with timing
#[derive(Debug, Clone)]
pub struct TranscriptSegment {
    /// Start time in seconds
    pub start_time: f64,

    /// End time in seconds
    pub end_time: f64,

    /// Segment text
    pub text: String,
}

/// Ordered transcription of one audio file
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    /// Concatenated text of all segments in chronological order
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Trait for speech-to-text backends
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe a local audio file into time-ordered segments
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript>;
}

/// Speech-to-text backed by a locally loaded Whisper model.
///
/// Loading the model is the slow one-time setup step; the loaded context is
/// shared read-only across every subsequent transcription call.
pub struct WhisperTranscriber {
    ctx: Arc<WhisperContext>,
}

impl WhisperTranscriber {
    /// Load Whisper weights from a ggml file
    pub fn load(model_path: &Path) -> Result<Self> {
        tracing::info!("Loading Whisper model from {}", model_path.display());

        let ctx = WhisperContext::new_with_params(
            &model_path.to_string_lossy(),
            WhisperContextParameters::default(),
        )
        .map_err(|e| PipelineError::ModelSetupFailed(e.to_string()))?;

        Ok(Self { ctx: Arc::new(ctx) })
    }
}

#[async_trait]
impl SpeechToText for WhisperTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript> {
        let samples = audio::decode_to_pcm(audio_path).await?;

        let ctx = Arc::clone(&self.ctx);
        let started = std::time::Instant::now();

        // Inference is CPU-bound and blocking; keep it off the async runtime.
        // Calls are still strictly sequential, one audio file at a time.
        let transcript = tokio::task::spawn_blocking(move || run_inference(&ctx, &samples))
            .await
            .map_err(|e| {
                PipelineError::TranscriptionFailed(format!("inference task failed: {}", e))
            })??;

        tracing::info!(
            "Transcription completed in {}",
            crate::utils::format_duration(started.elapsed().as_secs_f64())
        );

        Ok(transcript)
    }
}

fn run_inference(ctx: &WhisperContext, samples: &[f32]) -> Result<Transcript> {
    let mut state = ctx
        .create_state()
        .map_err(|e| PipelineError::TranscriptionFailed(e.to_string()))?;

    let mut params = FullParams::new(SamplingStrategy::BeamSearch {
        beam_size: 5,
        patience: -1.0,
    });
    params.set_language(Some("auto"));
    params.set_print_special(false);
    params.set_print_progress(false);
    params.set_print_realtime(false);
    params.set_print_timestamps(false);

    state
        .full(params, samples)
        .map_err(|e| PipelineError::TranscriptionFailed(e.to_string()))?;

    let n_segments = state
        .full_n_segments()
        .map_err(|e| PipelineError::TranscriptionFailed(e.to_string()))?;

    let mut segments = Vec::with_capacity(n_segments as usize);
    for i in 0..n_segments {
        let text = state
            .full_get_segment_text(i)
            .map_err(|e| PipelineError::TranscriptionFailed(e.to_string()))?;
        let t0 = state
            .full_get_segment_t0(i)
            .map_err(|e| PipelineError::TranscriptionFailed(e.to_string()))?;
        let t1 = state
            .full_get_segment_t1(i)
            .map_err(|e| PipelineError::TranscriptionFailed(e.to_string()))?;

        // whisper reports timestamps in centiseconds
        segments.push(TranscriptSegment {
            start_time: t0 as f64 / 100.0,
            end_time: t1 as f64 / 100.0,
            text,
        });
    }

    Ok(Transcript { segments })
}
