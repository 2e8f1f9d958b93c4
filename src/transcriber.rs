use std::path::Path;

use anyhow::{anyhow, Result};
use log::{debug, warn};
use serde::Deserialize;
use tempfile::TempDir;
use tokio::process::Command;

use crate::app_config::WhisperConfig;
use crate::timeline::TranscriptSegment;

// @module: Speech recognition for subtitle alignment

#[derive(Debug, Deserialize)]
struct WhisperOutput {
    #[serde(default)]
    segments: Vec<WhisperSegment>,
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    text: String,
    start: f64,
    end: f64,
}

/// Transcriber backed by the whisper command line tool.
///
/// Transcription only improves subtitle timing, it is never required for a
/// run to succeed. Every failure mode collapses to `None` with a warning
/// and the caller falls back to proportional cue timing.
pub struct Transcriber {
    config: WhisperConfig,
}

impl Transcriber {
    /// Create a transcriber from configuration
    pub fn new(config: &WhisperConfig) -> Self {
        Self { config: config.clone() }
    }

    /// Transcribe a narration file into timed segments.
    ///
    /// Returns `None` when transcription is disabled, the binary is missing,
    /// recognition fails, times out or recognizes nothing.
    pub async fn transcribe(&self, audio_path: &Path, language: &str) -> Option<Vec<TranscriptSegment>> {
        if !self.config.enabled {
            debug!("Transcription disabled, subtitles will use proportional timing");
            return None;
        }

        match self.run_whisper(audio_path, language).await {
            Ok(segments) if segments.is_empty() => {
                warn!("Whisper recognized no speech in {}, falling back to proportional timing", audio_path.display());
                None
            }
            Ok(segments) => {
                debug!("Whisper produced {} transcript segments", segments.len());
                Some(segments)
            }
            Err(e) => {
                warn!("Transcription failed ({}), falling back to proportional timing", e);
                None
            }
        }
    }

    async fn run_whisper(&self, audio_path: &Path, language: &str) -> Result<Vec<TranscriptSegment>> {
        let output_dir = TempDir::new()?;

        // Whisper takes the bare language code, not a BCP 47 tag
        let short_language = language.split('-').next().unwrap_or(language);

        let whisper_future = Command::new(&self.config.binary)
            .args([
                audio_path.to_str().unwrap_or_default(),
                "--model", &self.config.model,
                "--language", short_language,
                "--output_format", "json",
                "--output_dir", output_dir.path().to_str().unwrap_or_default(),
            ])
            .output();

        let timeout_duration = std::time::Duration::from_secs(self.config.timeout_secs);
        let output = tokio::select! {
            result = whisper_future => {
                result.map_err(|e| anyhow!("Failed to execute {} (is it installed?): {}", self.config.binary, e))?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(anyhow!("{} timed out after {} seconds", self.config.binary, self.config.timeout_secs));
            }
        };

        if !output.status.success() {
            return Err(anyhow!(
                "{} exited with an error: {}",
                self.config.binary,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        let stem = audio_path
            .file_stem()
            .ok_or_else(|| anyhow!("Audio path has no file stem: {}", audio_path.display()))?;
        let json_path = output_dir.path().join(stem).with_extension("json");

        let content = std::fs::read_to_string(&json_path)
            .map_err(|e| anyhow!("Whisper produced no JSON output at {}: {}", json_path.display(), e))?;

        let parsed: WhisperOutput = serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse whisper JSON output: {}", e))?;

        let segments = parsed
            .segments
            .into_iter()
            .filter(|s| s.end > s.start && !s.text.trim().is_empty())
            .map(|s| TranscriptSegment {
                text: s.text.trim().to_string(),
                start: s.start,
                end: s.end,
            })
            .collect();

        Ok(segments)
    }
}
