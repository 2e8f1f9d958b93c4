/*!
 * Tests for SRT formatting and parsing
 */

use clipfab::subtitle_track::{format_timestamp_ms, format_timestamp_secs, parse_timestamp, SubtitleTrack};
use clipfab::timeline::SubtitleCue;

use crate::common::{create_temp_dir, create_test_srt};

fn cue(text: &str, start: f64, end: f64) -> SubtitleCue {
    SubtitleCue {
        text: text.to_string(),
        start,
        end,
    }
}

#[test]
fn test_format_timestamp_ms_with_zero_should_format_correctly() {
    assert_eq!(format_timestamp_ms(0), "00:00:00,000");
}

#[test]
fn test_format_timestamp_ms_with_hours_should_format_correctly() {
    assert_eq!(format_timestamp_ms(3_661_042), "01:01:01,042");
}

#[test]
fn test_format_timestamp_secs_should_round_to_milliseconds() {
    assert_eq!(format_timestamp_secs(1.2345), "00:00:01,235");
    assert_eq!(format_timestamp_secs(90.5), "00:01:30,500");
}

#[test]
fn test_format_timestamp_secs_with_negative_should_clamp_to_zero() {
    assert_eq!(format_timestamp_secs(-0.5), "00:00:00,000");
}

#[test]
fn test_parse_timestamp_with_valid_input_should_return_millis() {
    assert_eq!(parse_timestamp("01:02:03,456").unwrap(), 3_723_456);
}

#[test]
fn test_parse_timestamp_with_invalid_format_should_fail() {
    assert!(parse_timestamp("1:2:3").is_err());
    assert!(parse_timestamp("01:75:00,000").is_err());
    assert!(parse_timestamp("not a timestamp").is_err());
}

#[test]
fn test_to_srt_string_should_number_entries_from_one() {
    let track = SubtitleTrack::from_cues(vec![
        cue("First line", 0.0, 2.5),
        cue("Second line", 2.5, 5.0),
    ]);

    let srt = track.to_srt_string();
    let expected = "1\n00:00:00,000 --> 00:00:02,500\nFirst line\n\n\
                    2\n00:00:02,500 --> 00:00:05,000\nSecond line\n\n";
    assert_eq!(srt, expected);
}

#[test]
fn test_write_to_srt_should_create_parent_directories() {
    let temp_dir = create_temp_dir().unwrap();
    let path = temp_dir.path().join("nested").join("out.srt");

    let track = SubtitleTrack::from_cues(vec![cue("Hello", 0.0, 1.0)]);
    let written = track.write_to_srt(&path).unwrap();

    assert_eq!(written, path);
    assert!(path.exists());
}

#[test]
fn test_parse_srt_string_should_read_all_entries() {
    let temp_dir = create_temp_dir().unwrap();
    let path = create_test_srt(&temp_dir.path().to_path_buf(), "sample.srt").unwrap();
    let content = std::fs::read_to_string(path).unwrap();

    let cues = SubtitleTrack::parse_srt_string(&content).unwrap();

    assert_eq!(cues.len(), 3);
    assert_eq!(cues[0].text, "This is a test subtitle.");
    assert!((cues[0].start - 1.0).abs() < 1e-9);
    assert!((cues[2].end - 14.0).abs() < 1e-9);
}

#[test]
fn test_parse_srt_string_should_skip_entries_with_invalid_range() {
    let content = "1\n00:00:05,000 --> 00:00:02,000\nBackwards\n\n\
                   2\n00:00:06,000 --> 00:00:08,000\nValid\n";

    let cues = SubtitleTrack::parse_srt_string(content).unwrap();

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text, "Valid");
}

#[test]
fn test_parse_srt_string_should_join_multiline_text() {
    let content = "1\n00:00:01,000 --> 00:00:03,000\nLine one\nLine two\n";

    let cues = SubtitleTrack::parse_srt_string(content).unwrap();

    assert_eq!(cues[0].text, "Line one\nLine two");
}

#[test]
fn test_parse_srt_string_should_sort_by_start_time() {
    let content = "1\n00:00:10,000 --> 00:00:12,000\nLater\n\n\
                   2\n00:00:01,000 --> 00:00:03,000\nEarlier\n";

    let cues = SubtitleTrack::parse_srt_string(content).unwrap();

    assert_eq!(cues[0].text, "Earlier");
    assert_eq!(cues[1].text, "Later");
}

#[test]
fn test_parse_srt_string_with_no_valid_entries_should_fail() {
    assert!(SubtitleTrack::parse_srt_string("just some text\nwith no timestamps").is_err());
}

#[test]
fn test_roundtrip_through_srt_should_preserve_cues() {
    let original = vec![cue("Alpha", 0.0, 1.5), cue("Beta", 1.5, 4.0)];
    let track = SubtitleTrack::from_cues(original.clone());

    let parsed = SubtitleTrack::parse_srt_string(&track.to_srt_string()).unwrap();

    assert_eq!(parsed, original);
}
