use clap::Parser;
use std::path::PathBuf;

use crate::model::ModelSize;

#[derive(Parser, Debug)]
#[command(
    name = "tubescribe",
    about = "Transcribe YouTube videos to Markdown using a local Whisper model",
    version,
    long_about = "Downloads the audio track of one YouTube video (or every video in a \
newline-delimited URL list file), transcribes it with a locally loaded Whisper model, \
and writes one Markdown document per video into the output directory."
)]
pub struct Cli {
    /// YouTube URL, or path to a newline-delimited file of URLs
    #[arg(value_name = "URL_OR_FILE")]
    pub input: String,

    /// Whisper model size to load
    #[arg(short, long, value_enum, value_name = "SIZE")]
    pub model: Option<ModelSize>,

    /// Directory for the generated Markdown files
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Maximum number of simultaneous downloads
    #[arg(short = 'j', long, value_name = "COUNT")]
    pub concurrency: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses_single_url() {
        let cli = Cli::parse_from(["tubescribe", "https://youtu.be/abc"]);
        assert_eq!(cli.input, "https://youtu.be/abc");
        assert!(cli.model.is_none());
        assert!(cli.output_dir.is_none());
    }

    #[test]
    fn test_cli_parses_model_flag() {
        let cli = Cli::parse_from(["tubescribe", "-m", "small", "urls.txt"]);
        assert_eq!(cli.model, Some(ModelSize::Small));
        assert_eq!(cli.input, "urls.txt");
    }

    #[test]
    fn test_cli_requires_input() {
        let result = Cli::try_parse_from(["tubescribe"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_verifies() {
        Cli::command().debug_assert();
    }
}
