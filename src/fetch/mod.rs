use async_trait::async_trait;
use chrono::Duration;
use std::path::{Path, PathBuf};

pub mod youtube;

pub use youtube::YoutubeFetcher;

use crate::Result;

#[cfg(test)]
use mockall::automock;

/// Metadata resolved for a video URL
#[derive(Debug, Clone)]
pub struct VideoMetadata {
    /// Video title, or "Untitled" when the resolver omits one
    pub title: String,

    /// Duration of the media if available
    pub duration: Option<Duration>,

    /// Original URL that was resolved
    pub original_url: String,
}

/// A successfully downloaded audio artifact.
///
/// The path is guaranteed to exist on disk at the moment the value is
/// produced; the batch coordinator owns deleting it after transcription.
#[derive(Debug, Clone)]
pub struct DownloadedAudio {
    /// Local path of the transcoded audio file
    pub path: PathBuf,

    /// Title of the video the audio came from
    pub title: String,
}

/// Trait for resolving and downloading media from a URL
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Resolve title metadata for a URL without downloading anything.
    /// Collection URLs (playlists) resolve to their first entry.
    async fn resolve(&self, url: &str) -> Result<VideoMetadata>;

    /// Download the best available audio for a URL into `dest_dir`,
    /// transcoded to MP3, named from the sanitized video title.
    async fn download_audio(&self, url: &str, dest_dir: &Path) -> Result<DownloadedAudio>;
}
