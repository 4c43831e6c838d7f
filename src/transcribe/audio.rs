//! Audio decoding for the Whisper front end.
//!
//! Whisper expects 16 kHz mono f32 PCM. Downloaded audio is MP3, so it is
//! resampled through ffmpeg into a temporary WAV and read back with hound.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::{PipelineError, Result};

/// Sample rate Whisper models are trained on
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// Decode an audio file into 16 kHz mono f32 PCM samples
pub async fn decode_to_pcm(path: &Path) -> Result<Vec<f32>> {
    let wav_dir = tempfile::tempdir()?;
    let wav_path = wav_dir.path().join("decoded.wav");

    tracing::debug!("Decoding {} to PCM", path.display());

    let output = Command::new("ffmpeg")
        .args([
            "-y",
            "-i",
            &path.to_string_lossy(),
            "-ar",
            &WHISPER_SAMPLE_RATE.to_string(),
            "-ac",
            "1",
            "-f",
            "wav",
            &wav_path.to_string_lossy(),
        ])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        let error = String::from_utf8_lossy(&output.stderr);
        return Err(PipelineError::TranscriptionFailed(format!(
            "ffmpeg failed to decode {}: {}",
            path.display(),
            error.trim()
        ))
        .into());
    }

    read_wav_samples(&wav_path)
}

/// Read a WAV file into f32 samples, downmixing to mono if needed
pub(crate) fn read_wav_samples(path: &Path) -> Result<Vec<f32>> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()?,
        hound::SampleFormat::Int => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / 32768.0))
            .collect::<std::result::Result<_, _>>()?,
    };

    Ok(downmix_to_mono(samples, spec.channels))
}

/// Average interleaved channels down to mono
pub(crate) fn downmix_to_mono(samples: Vec<f32>, channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return samples;
    }

    samples
        .chunks(channels as usize)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downmix_mono_passthrough() {
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(downmix_to_mono(samples.clone(), 1), samples);
    }

    #[test]
    fn test_downmix_stereo_averages() {
        let samples = vec![0.0, 1.0, 0.5, 0.5];
        assert_eq!(downmix_to_mono(samples, 2), vec![0.5, 0.5]);
    }

    #[test]
    fn test_read_wav_samples_int16_stereo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.wav");

        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: WHISPER_SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for frame in [(0i16, 0i16), (16384, -16384), (32767, 32767)] {
            writer.write_sample(frame.0).unwrap();
            writer.write_sample(frame.1).unwrap();
        }
        writer.finalize().unwrap();

        let samples = read_wav_samples(&path).unwrap();
        assert_eq!(samples.len(), 3);
        assert!(samples[0].abs() < f32::EPSILON);
        assert!(samples[1].abs() < f32::EPSILON);
        assert!((samples[2] - 32767.0 / 32768.0).abs() < 1e-4);
    }
}
