use std::path::{Path, PathBuf};

use crate::utils::sanitize_filename;
use crate::{PipelineError, Result};

/// Render a transcript document: H1 title, blank line, body
pub fn render_markdown(title: &str, body: &str) -> String {
    format!("# {}\n\n{}", title, body)
}

/// Write a transcript document into `dir` under a filesystem-safe name
/// derived from the title, creating the directory if absent. An existing
/// file of the same name is silently overwritten.
pub fn write_markdown(dir: &Path, title: &str, body: &str) -> Result<PathBuf> {
    fs_err::create_dir_all(dir)
        .map_err(|e| PipelineError::WriteFailed(e.to_string()))?;

    let filename = format!("{}.md", sanitize_filename(title));
    let path = dir.join(filename);

    fs_err::write(&path, render_markdown(title, body))
        .map_err(|e| PipelineError::WriteFailed(e.to_string()))?;

    tracing::info!("Transcript written to {}", path.display());

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_starts_with_heading() {
        let doc = render_markdown("My Title", "body text");
        assert!(doc.starts_with("# My Title\n\n"));
        assert_eq!(&doc["# My Title\n\n".len()..], "body text");
    }

    #[test]
    fn test_write_creates_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("transcriptions");

        let path = write_markdown(&out, "Some Talk", "words").unwrap();

        assert!(path.exists());
        assert_eq!(path.file_name().unwrap(), "Some Talk.md");
        let content = fs_err::read_to_string(&path).unwrap();
        assert_eq!(content, "# Some Talk\n\nwords");
    }

    #[test]
    fn test_write_sanitizes_filename_but_not_title() {
        let dir = tempfile::tempdir().unwrap();

        let path = write_markdown(dir.path(), "What? A/B Test!", "body").unwrap();

        assert_eq!(path.file_name().unwrap(), "What_ A_B Test_.md");
        let content = fs_err::read_to_string(&path).unwrap();
        // The heading keeps the original title untouched
        assert!(content.starts_with("# What? A/B Test!\n\n"));
    }

    #[test]
    fn test_write_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();

        let first = write_markdown(dir.path(), "Repeat", "same body").unwrap();
        let first_bytes = fs_err::read(&first).unwrap();

        let second = write_markdown(dir.path(), "Repeat", "same body").unwrap();
        let second_bytes = fs_err::read(&second).unwrap();

        assert_eq!(first, second);
        assert_eq!(first_bytes, second_bytes);
    }

    #[test]
    fn test_write_overwrites_existing() {
        let dir = tempfile::tempdir().unwrap();

        write_markdown(dir.path(), "Clash", "old body").unwrap();
        let path = write_markdown(dir.path(), "Clash", "new body").unwrap();

        let content = fs_err::read_to_string(&path).unwrap();
        assert_eq!(content, "# Clash\n\nnew body");
    }
}
