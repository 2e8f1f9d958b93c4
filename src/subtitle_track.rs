use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use anyhow::{Result, Context, anyhow};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::timeline::SubtitleCue;

// @module: SRT subtitle track formatting and parsing

// @const: SRT timestamp regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2}),(\d{3}) --> (\d{2}):(\d{2}):(\d{2}),(\d{3})").unwrap()
});

/// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
pub fn format_timestamp_ms(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Format a timestamp in fractional seconds to SRT format
pub fn format_timestamp_secs(secs: f64) -> String {
    format_timestamp_ms((secs.max(0.0) * 1000.0).round() as u64)
}

/// Parse an SRT timestamp (HH:MM:SS,mmm) to milliseconds
pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
    let parts: Vec<&str> = timestamp.split(&[':', ',', '.'][..]).collect();

    if parts.len() != 4 {
        return Err(anyhow!("Invalid timestamp format: {}", timestamp));
    }

    let hours: u64 = parts[0].trim().parse().context("Failed to parse hours")?;
    let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
    let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
    let millis: u64 = parts[3].trim().parse().context("Failed to parse milliseconds")?;

    if minutes >= 60 || seconds >= 60 || millis >= 1000 {
        return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
    }

    Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
}

/// An ordered collection of subtitle cues that can be written as an SRT file
#[derive(Debug, Clone, Default)]
pub struct SubtitleTrack {
    /// The cues, sorted by start time
    pub cues: Vec<SubtitleCue>,
}

impl SubtitleTrack {
    /// Create a track from already-ordered cues
    pub fn from_cues(cues: Vec<SubtitleCue>) -> Self {
        SubtitleTrack { cues }
    }

    /// Whether the track holds no cues
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Render the whole track as SRT text
    pub fn to_srt_string(&self) -> String {
        let mut out = String::new();
        for (i, cue) in self.cues.iter().enumerate() {
            out.push_str(&format!(
                "{}\n{} --> {}\n{}\n\n",
                i + 1,
                format_timestamp_secs(cue.start),
                format_timestamp_secs(cue.end),
                cue.text
            ));
        }
        out
    }

    /// Write the track to an SRT file, creating parent directories as needed
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;
        file.write_all(self.to_srt_string().as_bytes())
            .with_context(|| format!("Failed to write subtitle file: {}", path.display()))?;

        Ok(path.to_path_buf())
    }

    /// Parse SRT format text into an ordered cue list.
    ///
    /// Malformed entries are skipped with a warning; the surviving cues are
    /// sorted by start time and returned. An input with no valid entry at
    /// all is an error.
    pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleCue>> {
        let mut cues: Vec<SubtitleCue> = Vec::new();

        let mut current_times: Option<(u64, u64)> = None;
        let mut current_text = String::new();

        let mut flush = |times: &mut Option<(u64, u64)>, text: &mut String, cues: &mut Vec<SubtitleCue>| {
            if let Some((start_ms, end_ms)) = times.take() {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    warn!("Skipping subtitle entry with empty text at {}ms", start_ms);
                } else if end_ms <= start_ms {
                    warn!("Skipping subtitle entry with invalid time range: {} -> {}", start_ms, end_ms);
                } else {
                    cues.push(SubtitleCue {
                        text: trimmed.to_string(),
                        start: start_ms as f64 / 1000.0,
                        end: end_ms as f64 / 1000.0,
                    });
                }
            }
            text.clear();
        };

        for line in content.lines() {
            let trimmed = line.trim();

            if trimmed.is_empty() {
                flush(&mut current_times, &mut current_text, &mut cues);
                continue;
            }

            // A bare number between entries is the sequence counter
            if current_times.is_none() && current_text.is_empty() && trimmed.parse::<usize>().is_ok() {
                continue;
            }

            if current_times.is_none() {
                if let Some(caps) = TIMESTAMP_REGEX.captures(trimmed) {
                    let start_ms = capture_to_ms(&caps, 1);
                    let end_ms = capture_to_ms(&caps, 5);
                    current_times = Some((start_ms, end_ms));
                    continue;
                }
            }

            if current_times.is_some() {
                if !current_text.is_empty() {
                    current_text.push('\n');
                }
                current_text.push_str(trimmed);
            } else {
                warn!("Unexpected text before timestamp in SRT input: {}", trimmed);
            }
        }
        flush(&mut current_times, &mut current_text, &mut cues);

        if cues.is_empty() {
            return Err(anyhow!("No valid subtitle entries were found in the SRT content"));
        }

        cues.sort_by(|a, b| a.start.partial_cmp(&b.start).unwrap_or(std::cmp::Ordering::Equal));
        Ok(cues)
    }
}

fn capture_to_ms(caps: &regex::Captures, start_idx: usize) -> u64 {
    let hours: u64 = caps.get(start_idx).map_or(0, |m| m.as_str().parse().unwrap_or(0));
    let minutes: u64 = caps.get(start_idx + 1).map_or(0, |m| m.as_str().parse().unwrap_or(0));
    let seconds: u64 = caps.get(start_idx + 2).map_or(0, |m| m.as_str().parse().unwrap_or(0));
    let millis: u64 = caps.get(start_idx + 3).map_or(0, |m| m.as_str().parse().unwrap_or(0));

    (hours * 3600 + minutes * 60 + seconds) * 1000 + millis
}

impl fmt::Display for SubtitleTrack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Track")?;
        writeln!(f, "Cues: {}", self.cues.len())?;
        Ok(())
    }
}
