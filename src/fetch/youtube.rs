use async_trait::async_trait;
use chrono::Duration;
use serde_json::Value;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use super::{DownloadedAudio, MediaFetcher, VideoMetadata};
use crate::utils::sanitize_filename;
use crate::{PipelineError, Result};

/// YouTube audio fetcher using yt-dlp
pub struct YoutubeFetcher {
    yt_dlp_path: String,
}

impl YoutubeFetcher {
    pub fn new() -> Self {
        Self {
            yt_dlp_path: "yt-dlp".to_string(),
        }
    }

    /// Check if yt-dlp is available
    pub async fn check_availability(&self) -> Result<bool> {
        let output = Command::new(&self.yt_dlp_path)
            .arg("--version")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        Ok(output.map(|o| o.status.success()).unwrap_or(false))
    }

    /// Dump video metadata as JSON using yt-dlp, restricted to the first
    /// playlist entry so collection URLs collapse to one video.
    async fn dump_metadata(&self, url: &str) -> Result<String> {
        tracing::debug!("Resolving video metadata for: {}", url);

        let output = Command::new(&self.yt_dlp_path)
            .args(["--dump-json", "--playlist-items", "1", url])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            return Err(PipelineError::DownloadFailed(format!(
                "yt-dlp could not resolve {}: {}",
                url,
                error.trim()
            ))
            .into());
        }

        Ok(String::from_utf8(output.stdout)?)
    }
}

/// Parse yt-dlp --dump-json output into metadata.
///
/// yt-dlp emits one JSON record per line; anything past the first line is a
/// remaining collection entry and is ignored.
fn parse_metadata(dump: &str, url: &str) -> Result<VideoMetadata> {
    let mut lines = dump.lines().filter(|l| !l.trim().is_empty());

    let first = lines.next().ok_or_else(|| {
        PipelineError::UnexpectedMetadata(format!("empty resolver response for {}", url))
    })?;

    let extra_entries = lines.count();
    if extra_entries > 0 {
        tracing::warn!(
            "{} resolved to a collection; ignoring {} remaining entries",
            url,
            extra_entries
        );
    }

    let info: Value = serde_json::from_str(first).map_err(|e| {
        PipelineError::UnexpectedMetadata(format!("resolver returned non-JSON data: {}", e))
    })?;

    if !info.is_object() {
        return Err(PipelineError::UnexpectedMetadata(format!(
            "resolver returned a non-record shape for {}",
            url
        ))
        .into());
    }

    let title = info["title"]
        .as_str()
        .unwrap_or("Untitled")
        .to_string();
    let duration = info["duration"]
        .as_f64()
        .map(|d| Duration::seconds(d as i64));

    Ok(VideoMetadata {
        title,
        duration,
        original_url: url.to_string(),
    })
}

#[async_trait]
impl MediaFetcher for YoutubeFetcher {
    async fn resolve(&self, url: &str) -> Result<VideoMetadata> {
        let dump = self.dump_metadata(url).await?;
        parse_metadata(&dump, url)
    }

    async fn download_audio(&self, url: &str, dest_dir: &Path) -> Result<DownloadedAudio> {
        let metadata = self.resolve(url).await?;

        // Title-derived stem plus a short uniquifier so duplicate URLs in one
        // batch cannot clobber each other's temp files.
        let stem = format!(
            "{}_{}",
            sanitize_filename(&metadata.title),
            &uuid::Uuid::new_v4().to_string()[..8]
        );
        let template = dest_dir.join(format!("{}.%(ext)s", stem));
        let audio_path = dest_dir.join(format!("{}.mp3", stem));

        tracing::info!("Downloading audio for: {}", metadata.title);

        let output = Command::new(&self.yt_dlp_path)
            .args([
                "--output",
                &template.to_string_lossy(),
                "--extract-audio",
                "--audio-format",
                "mp3",
                "--audio-quality",
                "192K",
                "--format",
                "bestaudio/best",
                "--playlist-items",
                "1",
                "--no-progress",
                url,
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            return Err(PipelineError::DownloadFailed(format!(
                "yt-dlp failed for {}: {}",
                url,
                error.trim()
            ))
            .into());
        }

        // A success result must point at a file that actually exists.
        if tokio::fs::metadata(&audio_path).await.is_err() {
            return Err(PipelineError::DownloadFailed(format!(
                "yt-dlp reported success but {} is missing",
                audio_path.display()
            ))
            .into());
        }

        tracing::info!("Audio download complete: {}", audio_path.display());

        Ok(DownloadedAudio {
            path: audio_path,
            title: metadata.title,
        })
    }
}

impl Default for YoutubeFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metadata_basic() {
        let dump = r#"{"title": "My Video", "duration": 123.4}"#;
        let meta = parse_metadata(dump, "https://youtu.be/x").unwrap();
        assert_eq!(meta.title, "My Video");
        assert_eq!(meta.duration, Some(Duration::seconds(123)));
        assert_eq!(meta.original_url, "https://youtu.be/x");
    }

    #[test]
    fn test_parse_metadata_missing_title() {
        let dump = r#"{"duration": 5}"#;
        let meta = parse_metadata(dump, "https://youtu.be/x").unwrap();
        assert_eq!(meta.title, "Untitled");
    }

    #[test]
    fn test_parse_metadata_collection_takes_first_entry() {
        let dump = "{\"title\": \"First\"}\n{\"title\": \"Second\"}\n";
        let meta = parse_metadata(dump, "https://youtube.com/playlist?list=x").unwrap();
        assert_eq!(meta.title, "First");
    }

    #[test]
    fn test_parse_metadata_rejects_non_record() {
        let err = parse_metadata("[1, 2, 3]", "https://youtu.be/x").unwrap_err();
        assert!(err.to_string().contains("non-record"));
    }

    #[test]
    fn test_parse_metadata_rejects_empty() {
        assert!(parse_metadata("", "https://youtu.be/x").is_err());
        assert!(parse_metadata("not json", "https://youtu.be/x").is_err());
    }
}
