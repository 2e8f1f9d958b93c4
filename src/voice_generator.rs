use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use log::{debug, info};
use sha2::{Digest, Sha256};
use tokio::process::Command;

use crate::app_config::{Config, VoiceConfig};
use crate::file_utils::FileManager;

// @module: Narration synthesis through the edge-tts binary

/// A synthesized narration file with its measured duration
#[derive(Debug, Clone)]
pub struct NarrationAudio {
    /// Path of the generated MP3
    pub path: PathBuf,

    /// Duration in seconds as reported by ffprobe
    pub duration: f64,
}

/// Text-to-speech generator backed by the edge-tts command line tool
pub struct VoiceGenerator {
    /// Voice, rate and pitch settings
    voice_config: VoiceConfig,
    /// Directory where synthesized audio is cached
    audio_dir: PathBuf,
}

impl VoiceGenerator {
    /// Create a generator from application configuration
    pub fn new(config: &Config) -> Self {
        Self {
            voice_config: config.voice.clone(),
            audio_dir: config.directories.audio_dir(),
        }
    }

    /// Synthesize narration for a script, reusing a cached file when the
    /// same text was already synthesized with the same voice settings.
    pub async fn synthesize(&self, text: &str, voice: Option<&str>) -> Result<NarrationAudio> {
        if text.trim().is_empty() {
            return Err(anyhow!("Cannot synthesize empty narration text"));
        }

        let voice = voice.unwrap_or(&self.voice_config.default_voice);
        let output_path = self.cache_path(text, voice);

        if FileManager::file_exists(&output_path) {
            debug!("Reusing cached narration: {}", output_path.display());
            let duration = FileManager::probe_duration(&output_path).await?;
            return Ok(NarrationAudio { path: output_path, duration });
        }

        FileManager::ensure_dir(&self.audio_dir)?;
        self.run_edge_tts(text, voice, &output_path).await?;

        let duration = FileManager::probe_duration(&output_path).await?;
        info!("Synthesized {:.1}s of narration with {}", duration, voice);

        Ok(NarrationAudio { path: output_path, duration })
    }

    /// Cache filename derived from the synthesis inputs, so a change to the
    /// text, voice, rate or pitch produces a fresh file.
    fn cache_path(&self, text: &str, voice: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        hasher.update(voice.as_bytes());
        hasher.update(self.voice_config.rate.as_bytes());
        hasher.update(self.voice_config.pitch.as_bytes());
        let digest = hasher.finalize();

        let hex: String = digest.iter().take(12).map(|b| format!("{:02x}", b)).collect();
        self.audio_dir.join(format!("narration_{}.mp3", hex))
    }

    async fn run_edge_tts(&self, text: &str, voice: &str, output_path: &Path) -> Result<()> {
        let edge_tts_future = Command::new("edge-tts")
            .args([
                "--voice", voice,
                "--rate", &self.voice_config.rate,
                "--pitch", &self.voice_config.pitch,
                "--text", text,
                "--write-media", output_path.to_str().unwrap_or_default(),
            ])
            .output();

        let timeout_duration = std::time::Duration::from_secs(120);
        let output = tokio::select! {
            result = edge_tts_future => {
                result.map_err(|e| anyhow!("Failed to execute edge-tts (is it installed?): {}", e))?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(anyhow!("edge-tts timed out after 120 seconds"));
            }
        };

        if !output.status.success() {
            return Err(anyhow!(
                "edge-tts failed with voice {}: {}",
                voice,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        if !FileManager::file_exists(output_path) {
            return Err(anyhow!("edge-tts reported success but produced no file at {}", output_path.display()));
        }

        Ok(())
    }
}
