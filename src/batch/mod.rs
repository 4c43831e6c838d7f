//! Batch coordination: concurrent downloads, sequential transcription.
//!
//! Downloads are I/O-bound and fan out through a bounded worker pool; every
//! outcome lands in a single-consumer queue. Transcription shares one loaded
//! model and drains that queue sequentially, writing a Markdown document and
//! deleting the temporary audio file per item.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

use crate::fetch::{DownloadedAudio, MediaFetcher};
use crate::output;
use crate::transcribe::SpeechToText;
use crate::Result;

/// Lifecycle of one requested transcription unit.
///
/// Transitions are monotonic: `pending → downloading → {downloaded |
/// download_failed}`, then `downloaded → transcribing → {done |
/// transcribe_failed}`. Failures are terminal for their job only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Downloading,
    Downloaded,
    Transcribing,
    Done,
    DownloadFailed,
    TranscribeFailed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Done | JobStatus::DownloadFailed | JobStatus::TranscribeFailed
        )
    }
}

/// One requested transcription unit
#[derive(Debug, Clone)]
pub struct Job {
    pub url: String,
    pub status: JobStatus,
    pub error: Option<String>,
}

impl Job {
    fn new(url: String) -> Self {
        Self {
            url,
            status: JobStatus::Pending,
            error: None,
        }
    }

    /// Move to the next status. Terminal states never transition again.
    fn advance(&mut self, next: JobStatus) {
        debug_assert!(
            !self.status.is_terminal(),
            "job for {} already terminal ({:?})",
            self.url,
            self.status
        );
        self.status = next;
    }

    fn fail(&mut self, status: JobStatus, message: String) {
        debug_assert!(status.is_terminal());
        self.advance(status);
        self.error = Some(message);
    }
}

/// Queue element produced by a download worker
enum DownloadOutcome {
    Fetched { job: Job, audio: DownloadedAudio },
    Failed { job: Job },
}

/// Settings for one batch run
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Directory for the generated Markdown files
    pub output_dir: PathBuf,

    /// Directory for temporary audio downloads
    pub temp_dir: PathBuf,

    /// Maximum simultaneous downloads
    pub concurrency: usize,
}

/// Tally of a completed batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Jobs transcribed and written successfully
    pub succeeded: usize,

    /// Jobs that failed at any stage (download, transcription, or write)
    pub failed: usize,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Process a list of URLs: download concurrently, then transcribe, write,
/// and clean up sequentially. Per-job failures are counted, never raised.
pub async fn run(
    urls: &[String],
    fetcher: Arc<dyn MediaFetcher>,
    stt: Arc<dyn SpeechToText>,
    options: &BatchOptions,
) -> Result<BatchReport> {
    if urls.is_empty() {
        tracing::warn!("No valid URLs to process");
        return Ok(BatchReport::default());
    }

    let semaphore = Arc::new(Semaphore::new(options.concurrency.max(1)));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut workers = JoinSet::new();

    for url in urls {
        let url = url.clone();
        let fetcher = Arc::clone(&fetcher);
        let semaphore = Arc::clone(&semaphore);
        let temp_dir = options.temp_dir.clone();
        let tx = tx.clone();

        workers.spawn(async move {
            let mut job = Job::new(url);
            tracing::info!("Queueing {}", job.url);

            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    job.fail(
                        JobStatus::DownloadFailed,
                        "worker pool shut down before download started".to_string(),
                    );
                    let _ = tx.send(DownloadOutcome::Failed { job });
                    return;
                }
            };

            job.advance(JobStatus::Downloading);

            match fetcher.download_audio(&job.url, &temp_dir).await {
                Ok(audio) => {
                    job.advance(JobStatus::Downloaded);
                    let _ = tx.send(DownloadOutcome::Fetched { job, audio });
                }
                Err(e) => {
                    let message = format!("FAILED to download {}: {}", job.url, e);
                    job.fail(JobStatus::DownloadFailed, message);
                    let _ = tx.send(DownloadOutcome::Failed { job });
                }
            }
        });
    }

    drop(tx);

    // Account for every worker before draining; a panicked worker never
    // reached the queue and counts as a failed download.
    let mut panicked = 0usize;
    while let Some(joined) = workers.join_next().await {
        if let Err(e) = joined {
            tracing::error!("Download worker crashed: {}", e);
            panicked += 1;
        }
    }

    let mut report = BatchReport {
        succeeded: 0,
        failed: panicked,
    };

    // All senders are gone, so this drains the completed downloads and ends.
    while let Some(outcome) = rx.recv().await {
        match outcome {
            DownloadOutcome::Failed { job } => {
                if let Some(message) = &job.error {
                    tracing::error!("{}", message);
                }
                report.failed += 1;
            }
            DownloadOutcome::Fetched { mut job, audio } => {
                job.advance(JobStatus::Transcribing);
                tracing::info!("Transcribing {}...", audio.title);

                match transcribe_and_write(stt.as_ref(), &audio, &options.output_dir).await {
                    Ok(_path) => {
                        job.advance(JobStatus::Done);
                        report.succeeded += 1;
                    }
                    Err(e) => {
                        tracing::error!("Error during transcription for {}: {}", audio.title, e);
                        job.fail(JobStatus::TranscribeFailed, e.to_string());
                        report.failed += 1;
                    }
                }

                // Temp audio is removed exactly once, on success and failure alike
                remove_temp_audio(&audio.path).await;
            }
        }
    }

    Ok(report)
}

async fn transcribe_and_write(
    stt: &dyn SpeechToText,
    audio: &DownloadedAudio,
    output_dir: &Path,
) -> Result<PathBuf> {
    let transcript = stt.transcribe(&audio.path).await?;
    output::write_markdown(output_dir, &audio.title, &transcript.text())
}

async fn remove_temp_audio(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::debug!("Cleaned up temporary audio file: {}", path.display()),
        Err(e) => tracing::warn!(
            "Could not remove temporary audio {}: {}",
            path.display(),
            e
        ),
    }
}
