use std::path::{Path, PathBuf};

use log::{debug, info};
use tokio::process::Command;

use crate::app_config::{RenderConfig, SubtitleConfig};
use crate::errors::RenderError;
use crate::timeline::{AssetKind, TimelineEntry};

// @module: Final video rendering through ffmpeg

/// Renders a scheduled timeline, narration and optional subtitles into one
/// MP4 with a single ffmpeg invocation
pub struct VideoAssembler {
    render: RenderConfig,
    subtitles: SubtitleConfig,
}

impl VideoAssembler {
    /// Create an assembler from render and subtitle configuration
    pub fn new(render: RenderConfig, subtitles: SubtitleConfig) -> Self {
        Self { render, subtitles }
    }

    /// Render the timeline to `output_path`.
    ///
    /// Every visual is normalized to the output resolution with
    /// aspect-preserving scale and letterbox padding, clips are trimmed to
    /// their scheduled window, the normalized streams are concatenated,
    /// subtitles are burned in when an SRT path is given, and the narration
    /// audio is muxed in.
    pub async fn assemble(
        &self,
        entries: &[TimelineEntry],
        narration_path: &Path,
        subtitle_path: Option<&Path>,
        output_path: &Path,
    ) -> Result<PathBuf, RenderError> {
        let args = self.build_args(entries, narration_path, subtitle_path, output_path);
        debug!("ffmpeg args: {}", args.join(" "));

        let ffmpeg_future = Command::new("ffmpeg").args(&args).output();

        let timeout_duration = std::time::Duration::from_secs(self.render.timeout_secs);
        let output = tokio::select! {
            result = ffmpeg_future => {
                result.map_err(|e| RenderError::LaunchFailed(e.to_string()))?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(RenderError::Timeout(self.render.timeout_secs));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RenderError::EncodingFailed(filter_ffmpeg_stderr(&stderr)));
        }

        info!("Rendered {} entries to {}", entries.len(), output_path.display());
        Ok(output_path.to_path_buf())
    }

    /// Build the complete ffmpeg argument list for a render
    pub fn build_args(
        &self,
        entries: &[TimelineEntry],
        narration_path: &Path,
        subtitle_path: Option<&Path>,
        output_path: &Path,
    ) -> Vec<String> {
        let mut args: Vec<String> = vec!["-y".into()];

        // One input per timeline entry; images loop for their scheduled window
        for entry in entries {
            match entry.asset.kind {
                AssetKind::Image => {
                    args.push("-loop".into());
                    args.push("1".into());
                    args.push("-t".into());
                    args.push(format!("{:.3}", entry.duration()));
                }
                AssetKind::Clip => {}
            }
            args.push("-i".into());
            args.push(entry.asset.path.to_string_lossy().into_owned());
        }

        // Narration audio is the last input
        args.push("-i".into());
        args.push(narration_path.to_string_lossy().into_owned());

        args.push("-filter_complex".into());
        args.push(self.build_filter_graph(entries, subtitle_path));

        args.push("-map".into());
        args.push("[vout]".into());
        args.push("-map".into());
        args.push(format!("{}:a", entries.len()));

        args.extend(
            [
                "-c:v", "libx264",
                "-preset", "medium",
                "-pix_fmt", "yuv420p",
                "-c:a", "aac",
                "-b:a", "192k",
                "-shortest",
            ]
            .iter()
            .map(|s| s.to_string()),
        );
        args.push("-r".into());
        args.push(self.render.fps.to_string());

        args.push(output_path.to_string_lossy().into_owned());
        args
    }

    fn build_filter_graph(&self, entries: &[TimelineEntry], subtitle_path: Option<&Path>) -> String {
        let (w, h, fps) = (self.render.width, self.render.height, self.render.fps);
        let mut parts: Vec<String> = Vec::with_capacity(entries.len() + 2);

        for (i, entry) in entries.iter().enumerate() {
            let trim = match entry.asset.kind {
                AssetKind::Clip => {
                    let window = entry.duration();
                    let intrinsic = entry.asset.intrinsic_duration.unwrap_or(window);
                    let mut f = format!("trim=duration={:.3},setpts=PTS-STARTPTS,", window);
                    // A clip absorbing more time than it has holds its last frame
                    if intrinsic + 0.001 < window {
                        f.push_str(&format!(
                            "tpad=stop_mode=clone:stop_duration={:.3},",
                            window - intrinsic
                        ));
                    }
                    f
                }
                AssetKind::Image => String::new(),
            };
            parts.push(format!(
                "[{i}:v]{trim}scale={w}:{h}:force_original_aspect_ratio=decrease,\
                 pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,setsar=1,fps={fps}[v{i}]"
            ));
        }

        let concat_inputs: String = (0..entries.len()).map(|i| format!("[v{}]", i)).collect();
        match subtitle_path {
            Some(srt) => {
                parts.push(format!("{}concat=n={}:v=1:a=0[vcat]", concat_inputs, entries.len()));
                parts.push(format!(
                    "[vcat]subtitles={}:force_style='{},MarginV={}'[vout]",
                    escape_filter_path(srt),
                    self.subtitles.style.force_style(),
                    self.subtitles.margin,
                ));
            }
            None => {
                parts.push(format!("{}concat=n={}:v=1:a=0[vout]", concat_inputs, entries.len()));
            }
        }

        parts.join(";")
    }
}

/// Escape a path for use inside an ffmpeg filter expression
fn escape_filter_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "\\\\")
        .replace(':', "\\:")
        .replace('\'', "\\'")
}

/// Keep only the informative tail of ffmpeg's stderr.
///
/// ffmpeg prints its banner, build configuration and per-stream metadata
/// before any actual error, so error reporting keeps the last few
/// non-indented lines instead of the whole dump.
pub fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let meaningful: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            let l = line.trim_start();
            !l.is_empty()
                && !l.starts_with("ffmpeg version")
                && !l.starts_with("built with")
                && !l.starts_with("configuration:")
                && !l.starts_with("lib")
                && !line.starts_with("  ")
        })
        .collect();

    let tail: Vec<&str> = meaningful.iter().rev().take(5).rev().copied().collect();
    if tail.is_empty() {
        stderr.trim().chars().take(500).collect()
    } else {
        tail.join("\n")
    }
}
