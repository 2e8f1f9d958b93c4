/*!
 * Tests for ffmpeg argument construction
 */

use std::path::Path;

use clipfab::app_config::{RenderConfig, SubtitleConfig};
use clipfab::timeline::TimelineEntry;
use clipfab::video_assembler::{filter_ffmpeg_stderr, VideoAssembler};

use crate::common::{clip_asset, image_assets};

fn assembler() -> VideoAssembler {
    VideoAssembler::new(RenderConfig::default(), SubtitleConfig::default())
}

fn entry(asset: clipfab::timeline::AssetRef, start: f64, end: f64) -> TimelineEntry {
    TimelineEntry { asset, start, end }
}

fn sample_entries() -> Vec<TimelineEntry> {
    vec![
        entry(clip_asset("intro", 4.0), 0.0, 4.0),
        entry(image_assets(1).remove(0), 4.0, 10.0),
    ]
}

#[test]
fn test_build_args_should_loop_images_but_not_clips() {
    let args = assembler().build_args(
        &sample_entries(),
        Path::new("/audio/narration.mp3"),
        None,
        Path::new("/out/video.mp4"),
    );

    // Exactly one image input, so exactly one -loop flag
    assert_eq!(args.iter().filter(|a| *a == "-loop").count(), 1);
    assert!(args.contains(&"/assets/clips/intro.mp4".to_string()));
}

#[test]
fn test_build_args_should_map_narration_as_last_input() {
    let entries = sample_entries();
    let args = assembler().build_args(
        &entries,
        Path::new("/audio/narration.mp3"),
        None,
        Path::new("/out/video.mp4"),
    );

    // Audio input index equals the number of visual inputs
    assert!(args.contains(&format!("{}:a", entries.len())));
    assert!(args.contains(&"/audio/narration.mp3".to_string()));
}

#[test]
fn test_build_args_filter_graph_should_concat_all_entries() {
    let args = assembler().build_args(
        &sample_entries(),
        Path::new("/audio/narration.mp3"),
        None,
        Path::new("/out/video.mp4"),
    );

    let filter_idx = args.iter().position(|a| a == "-filter_complex").unwrap();
    let graph = &args[filter_idx + 1];

    assert!(graph.contains("concat=n=2:v=1:a=0"));
    assert!(graph.contains("scale=1920:1080"));
    // The clip is trimmed to its scheduled window
    assert!(graph.contains("trim=duration=4.000"));
    assert!(graph.ends_with("[vout]"));
}

#[test]
fn test_build_args_with_overrun_clip_should_hold_last_frame() {
    // A single short clip absorbs the whole narration window
    let entries = vec![entry(clip_asset("only", 3.0), 0.0, 10.0)];
    let args = assembler().build_args(
        &entries,
        Path::new("/audio/narration.mp3"),
        None,
        Path::new("/out/video.mp4"),
    );

    let filter_idx = args.iter().position(|a| a == "-filter_complex").unwrap();
    let graph = &args[filter_idx + 1];

    assert!(graph.contains("tpad=stop_mode=clone:stop_duration=7.000"));
}

#[test]
fn test_build_args_with_subtitles_should_burn_them_in() {
    let args = assembler().build_args(
        &sample_entries(),
        Path::new("/audio/narration.mp3"),
        Some(Path::new("/job/subtitles.srt")),
        Path::new("/out/video.mp4"),
    );

    let filter_idx = args.iter().position(|a| a == "-filter_complex").unwrap();
    let graph = &args[filter_idx + 1];

    assert!(graph.contains("subtitles="));
    assert!(graph.contains("force_style="));
    assert!(graph.contains("MarginV=80"));
}

#[test]
fn test_build_args_without_subtitles_should_skip_the_filter() {
    let args = assembler().build_args(
        &sample_entries(),
        Path::new("/audio/narration.mp3"),
        None,
        Path::new("/out/video.mp4"),
    );

    let filter_idx = args.iter().position(|a| a == "-filter_complex").unwrap();
    assert!(!args[filter_idx + 1].contains("subtitles="));
}

#[test]
fn test_build_args_should_end_with_output_path() {
    let args = assembler().build_args(
        &sample_entries(),
        Path::new("/audio/narration.mp3"),
        None,
        Path::new("/out/video.mp4"),
    );

    assert_eq!(args.last().unwrap(), "/out/video.mp4");
    assert_eq!(args.first().unwrap(), "-y");
}

#[test]
fn test_filter_ffmpeg_stderr_should_drop_the_banner() {
    let stderr = "ffmpeg version 6.0 Copyright\n\
                  built with gcc 12\n\
                  configuration: --enable-libx264\n\
                  libavutil 58. 2.100\n\
                  Input #0, mp3, from 'narration.mp3':\n\
                  [aac @ 0x5555] Error while encoding\n\
                  Conversion failed!";

    let filtered = filter_ffmpeg_stderr(stderr);

    assert!(!filtered.contains("ffmpeg version"));
    assert!(!filtered.contains("configuration:"));
    assert!(filtered.contains("Conversion failed!"));
    assert!(filtered.contains("Error while encoding"));
}

#[test]
fn test_filter_ffmpeg_stderr_with_only_banner_should_keep_something() {
    let stderr = "ffmpeg version 6.0 Copyright\nbuilt with gcc 12\n";
    assert!(!filter_ffmpeg_stderr(stderr).is_empty());
}
