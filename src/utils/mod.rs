use anyhow::Result;
use std::path::Path;
use url::Url;

/// Validate a URL and return normalized version
pub fn validate_and_normalize_url(url: &str) -> Result<String> {
    let parsed = Url::parse(url)
        .map_err(|_| anyhow::anyhow!("Invalid URL format: {}", url))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("URL must use HTTP or HTTPS protocol");
    }

    Ok(parsed.to_string())
}

/// Format duration in human-readable format
pub fn format_duration(seconds: f64) -> String {
    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Sanitize filename for safe filesystem usage
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            match c {
                // Keep alphanumeric characters, spaces, hyphens, underscores, and dots
                c if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' || c == '.' => c,
                // Replace everything else with underscore
                _ => '_',
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Parse a newline-delimited URL list file into its non-empty lines
pub fn parse_url_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}

/// Read a URL list file from disk
pub fn read_url_list(path: &Path) -> Result<Vec<String>> {
    let content = fs_err::read_to_string(path)?;
    Ok(parse_url_list(&content))
}

/// Check if the current environment has required tools
pub async fn check_dependencies() -> Vec<String> {
    let mut missing = Vec::new();

    // Check for yt-dlp
    if !check_command_available("yt-dlp", "--version").await {
        missing.push("yt-dlp - required for YouTube audio extraction".to_string());
    }

    // Check for ffmpeg (single-dash flag, ffmpeg does not take --version)
    if !check_command_available("ffmpeg", "-version").await {
        missing.push("ffmpeg - required for audio decoding before transcription".to_string());
    }

    missing
}

/// Check if a command is available in PATH
async fn check_command_available(command: &str, version_flag: &str) -> bool {
    use tokio::process::Command;

    Command::new(command)
        .arg(version_flag)
        .output()
        .await
        .map(|output| output.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(30.0), "30s");
        assert_eq!(format_duration(90.0), "1m 30s");
        assert_eq!(format_duration(3661.0), "1h 1m 1s");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Hello World!"), "Hello World_");
        assert_eq!(sanitize_filename("test/file?name"), "test_file_name");
        assert_eq!(sanitize_filename("  spaced  "), "spaced");
    }

    #[test]
    fn test_validate_and_normalize_url() {
        assert!(validate_and_normalize_url("https://example.com").is_ok());
        assert!(validate_and_normalize_url("http://example.com").is_ok());
        assert!(validate_and_normalize_url("ftp://example.com").is_err());
        assert!(validate_and_normalize_url("not-a-url").is_err());
    }

    #[test]
    fn test_parse_url_list() {
        let content = "https://youtu.be/a\n\n  https://youtu.be/b  \n";
        assert_eq!(
            parse_url_list(content),
            vec!["https://youtu.be/a", "https://youtu.be/b"]
        );
    }

    #[test]
    fn test_parse_url_list_empty() {
        assert!(parse_url_list("").is_empty());
        assert!(parse_url_list("\n  \n\n").is_empty());
    }

    #[test]
    fn test_check_dependencies_does_not_panic() {
        // The tools may or may not be installed where tests run; the check
        // itself must always come back with at most one entry per tool.
        let missing = tokio_test::block_on(check_dependencies());
        assert!(missing.len() <= 2);
    }
}
