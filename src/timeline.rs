use std::path::PathBuf;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TimelineError;

// @module: Display timeline and subtitle cue construction

// @const: Sentence-terminal punctuation splitter, keeps the terminator attached
static SENTENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^.!?]*[.!?]+|[^.!?]+$").unwrap()
});

/// Kind of visual asset in the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// Still image, can be displayed for any duration
    Image,
    /// Video clip with an intrinsic duration of its own
    Clip,
}

/// Reference to a downloaded visual asset
#[derive(Debug, Clone)]
pub struct AssetRef {
    /// Local file path of the asset
    pub path: PathBuf,

    /// Whether this is a still image or a video clip
    pub kind: AssetKind,

    /// Intrinsic duration in seconds, present for clips only
    pub intrinsic_duration: Option<f64>,
}

impl AssetRef {
    /// Create an image asset reference
    pub fn image(path: impl Into<PathBuf>) -> Self {
        AssetRef {
            path: path.into(),
            kind: AssetKind::Image,
            intrinsic_duration: None,
        }
    }

    /// Create a clip asset reference with its intrinsic duration
    pub fn clip(path: impl Into<PathBuf>, duration_secs: f64) -> Self {
        AssetRef {
            path: path.into(),
            kind: AssetKind::Clip,
            intrinsic_duration: Some(duration_secs),
        }
    }
}

/// A timestamped span of recognized speech produced by transcription
#[derive(Debug, Clone)]
pub struct TranscriptSegment {
    /// Recognized text of the segment
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// End time in seconds
    pub end: f64,
}

/// One scheduled asset display window
#[derive(Debug, Clone)]
pub struct TimelineEntry {
    /// The asset shown during this window
    pub asset: AssetRef,

    /// Start time in seconds
    pub start: f64,

    /// End time in seconds
    pub end: f64,
}

impl TimelineEntry {
    /// Display duration of this entry in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// A subtitle text span with start and end times
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleCue {
    /// Text displayed during the cue
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// End time in seconds
    pub end: f64,
}

/// Ordered sequence of narration sentences
#[derive(Debug, Clone)]
pub struct Script {
    /// The sentences, in narration order
    pub sentences: Vec<String>,
}

impl Script {
    /// Split narration text into sentences on terminal punctuation.
    ///
    /// Text without any terminal punctuation but with commas is split on
    /// commas instead, so short comma-phrased scripts still get one cue
    /// per phrase.
    pub fn from_text(text: &str) -> Self {
        let mut sentences: Vec<String> = SENTENCE_REGEX
            .find_iter(text)
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if sentences.len() <= 1 && !text.contains(['.', '!', '?']) && text.contains(',') {
            sentences = text
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        Script { sentences }
    }

    /// Number of sentences in the script
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    /// Whether the script contains no sentences
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

/// Build the asset display schedule and subtitle cues for one narration.
///
/// The returned entries are contiguous, non-overlapping, in input order and
/// cover [0, total_duration] exactly; the cue list is sorted and
/// non-overlapping, bounded within the same span. Cue timing uses
/// transcript alignment when a non-empty transcript is supplied and falls
/// back to length-proportional allocation otherwise.
pub fn build_timeline(
    total_duration: f64,
    sentences: &[String],
    assets: &[AssetRef],
    transcript: Option<&[TranscriptSegment]>,
) -> Result<(Vec<TimelineEntry>, Vec<SubtitleCue>), TimelineError> {
    if total_duration <= 0.0 {
        return Err(TimelineError::InvalidDuration(total_duration));
    }
    if assets.is_empty() {
        return Err(TimelineError::NoAssetsAvailable);
    }

    let entries = schedule_assets(total_duration, assets);

    // Blank sentences produce division artifacts in the proportional pass
    // and consume transcript segments for nothing, so drop them up front.
    // An empty result suppresses the subtitle track entirely.
    let usable: Vec<&str> = sentences
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    let cues = if usable.is_empty() {
        Vec::new()
    } else {
        match transcript {
            Some(segments) if !segments.is_empty() => {
                aligned_cues(&usable, segments, total_duration)
            }
            _ => proportional_cues(&usable, 0.0, total_duration),
        }
    };

    Ok((entries, cues))
}

/// Partition the narration duration across the assets in input order.
///
/// Each entry starts from an even share of the total; clips shorter than
/// their share are capped at their intrinsic duration and the freed time is
/// redistributed over the remaining uncapped entries. The capping passes
/// repeat until nothing needs capping or a single uncapped entry remains,
/// which absorbs all remaining time.
fn schedule_assets(total_duration: f64, assets: &[AssetRef]) -> Vec<TimelineEntry> {
    let count = assets.len();
    let mut capped: Vec<Option<f64>> = vec![None; count];

    loop {
        let fixed: f64 = capped.iter().flatten().sum();
        let uncapped: Vec<usize> = (0..count).filter(|&i| capped[i].is_none()).collect();
        if uncapped.len() <= 1 {
            break;
        }

        let share = (total_duration - fixed) / uncapped.len() as f64;
        let mut changed = false;
        for &i in &uncapped {
            if assets[i].kind == AssetKind::Clip {
                if let Some(intrinsic) = assets[i].intrinsic_duration {
                    if intrinsic < share {
                        capped[i] = Some(intrinsic);
                        changed = true;
                    }
                }
            }
        }

        if !changed {
            break;
        }
    }

    let fixed: f64 = capped.iter().flatten().sum();
    let uncapped_count = capped.iter().filter(|c| c.is_none()).count();
    let share = if uncapped_count > 0 {
        (total_duration - fixed) / uncapped_count as f64
    } else {
        0.0
    };

    let mut entries = Vec::with_capacity(count);
    let mut cursor = 0.0_f64;
    for (i, asset) in assets.iter().enumerate() {
        let duration = capped[i].unwrap_or(share);
        let start = cursor;
        cursor += duration;
        entries.push(TimelineEntry {
            asset: asset.clone(),
            start,
            end: cursor,
        });
    }

    // Pin the last boundary to the narration length to eliminate float drift
    if let Some(last) = entries.last_mut() {
        last.end = total_duration;
    }

    entries
}

/// Strategy A: cue durations proportional to sentence character length,
/// laid end-to-end across [window_start, window_end].
fn proportional_cues(sentences: &[&str], window_start: f64, window_end: f64) -> Vec<SubtitleCue> {
    let span = window_end - window_start;
    if sentences.is_empty() || span <= 0.0 {
        return Vec::new();
    }

    let total_chars: usize = sentences.iter().map(|s| s.chars().count()).sum();
    let mut cues = Vec::with_capacity(sentences.len());
    let mut cursor = window_start;
    for sentence in sentences {
        let weight = sentence.chars().count() as f64 / total_chars as f64;
        let start = cursor;
        cursor += span * weight;
        cues.push(SubtitleCue {
            text: sentence.to_string(),
            start,
            end: cursor,
        });
    }

    if let Some(last) = cues.last_mut() {
        last.end = window_end;
    }

    cues
}

/// Strategy B: align each sentence to the contiguous run of transcript
/// segments that covers it, consuming segments greedily in order.
///
/// A sentence keeps consuming segments until the accumulated recognized
/// text reaches its own length, so a segment boundary that falls
/// mid-sentence overshoots into the next segment rather than cutting the
/// cue short. When recognition produced less text than the script, the
/// leftover sentences fall back to proportional allocation over whatever
/// time remains.
fn aligned_cues(
    sentences: &[&str],
    segments: &[TranscriptSegment],
    total_duration: f64,
) -> Vec<SubtitleCue> {
    let mut cues: Vec<SubtitleCue> = Vec::with_capacity(sentences.len());
    let mut seg_idx = 0;

    for (sentence_idx, sentence) in sentences.iter().enumerate() {
        if seg_idx >= segments.len() {
            // Transcript ran out: proportional fallback over the remaining window
            let allocated_end = cues.last().map_or(0.0, |c| c.end);
            let rest = proportional_cues(&sentences[sentence_idx..], allocated_end, total_duration);
            cues.extend(rest);
            return cues;
        }

        let target = sentence.chars().count();
        let start = segments[seg_idx].start.max(0.0);
        let mut end = segments[seg_idx].end;
        let mut accumulated = 0usize;
        while seg_idx < segments.len() && accumulated < target {
            accumulated += segments[seg_idx].text.trim().chars().count();
            end = segments[seg_idx].end;
            seg_idx += 1;
        }

        let start = start.min(total_duration);
        let end = end.min(total_duration);
        // A segment entirely past the narration end clamps to nothing
        if end > start {
            cues.push(SubtitleCue {
                text: sentence.to_string(),
                start,
                end,
            });
        }
    }

    cues
}
