/*!
 * Tests for timeline scheduling and subtitle cue timing
 */

use clipfab::errors::TimelineError;
use clipfab::timeline::{build_timeline, Script};

use crate::common::{assert_close, clip_asset, image_assets, segment};

fn sentences(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_build_timeline_with_single_image_should_span_whole_narration() {
    let assets = image_assets(1);
    let (entries, _) = build_timeline(10.0, &sentences(&["Hello."]), &assets, None).unwrap();

    assert_eq!(entries.len(), 1);
    assert_close(entries[0].start, 0.0);
    assert_close(entries[0].end, 10.0);
}

#[test]
fn test_build_timeline_with_three_images_should_split_evenly() {
    let assets = image_assets(3);
    let (entries, _) = build_timeline(9.0, &sentences(&["Hello."]), &assets, None).unwrap();

    assert_eq!(entries.len(), 3);
    for (i, entry) in entries.iter().enumerate() {
        assert_close(entry.start, i as f64 * 3.0);
        assert_close(entry.end, (i + 1) as f64 * 3.0);
    }
}

#[test]
fn test_build_timeline_with_short_clip_should_cap_at_intrinsic_duration() {
    let assets = vec![clip_asset("short", 2.0), image_assets(1).remove(0)];
    let (entries, _) = build_timeline(10.0, &sentences(&["Hello."]), &assets, None).unwrap();

    assert_eq!(entries.len(), 2);
    assert_close(entries[0].end, 2.0);
    assert_close(entries[1].start, 2.0);
    assert_close(entries[1].end, 10.0);
}

#[test]
fn test_build_timeline_with_two_short_clips_should_redistribute_iteratively() {
    let assets = vec![
        clip_asset("one", 1.0),
        clip_asset("two", 2.0),
        image_assets(1).remove(0),
    ];
    let (entries, _) = build_timeline(12.0, &sentences(&["Hello."]), &assets, None).unwrap();

    assert_close(entries[0].duration(), 1.0);
    assert_close(entries[1].duration(), 2.0);
    assert_close(entries[2].duration(), 9.0);
}

#[test]
fn test_build_timeline_with_long_clip_should_not_extend_past_share() {
    // A clip longer than its even share gets trimmed at render time, not here
    let assets = vec![clip_asset("long", 30.0), image_assets(1).remove(0)];
    let (entries, _) = build_timeline(10.0, &sentences(&["Hello."]), &assets, None).unwrap();

    assert_close(entries[0].duration(), 5.0);
    assert_close(entries[1].duration(), 5.0);
}

#[test]
fn test_build_timeline_entries_should_be_contiguous_and_cover_duration() {
    let assets = vec![
        clip_asset("a", 1.5),
        image_assets(2).remove(0),
        clip_asset("b", 4.0),
        image_assets(1).remove(0),
    ];
    let (entries, _) = build_timeline(13.7, &sentences(&["Hello."]), &assets, None).unwrap();

    assert_close(entries[0].start, 0.0);
    for pair in entries.windows(2) {
        assert_close(pair[1].start, pair[0].end);
    }
    // The last boundary lands exactly on the narration length
    assert_eq!(entries.last().unwrap().end, 13.7);
}

#[test]
fn test_build_timeline_with_zero_duration_should_fail() {
    let assets = image_assets(1);
    let err = build_timeline(0.0, &sentences(&["Hello."]), &assets, None).unwrap_err();
    assert_eq!(err, TimelineError::InvalidDuration(0.0));
}

#[test]
fn test_build_timeline_with_negative_duration_should_fail() {
    let assets = image_assets(1);
    let err = build_timeline(-3.0, &sentences(&["Hello."]), &assets, None).unwrap_err();
    assert_eq!(err, TimelineError::InvalidDuration(-3.0));
}

#[test]
fn test_build_timeline_with_no_assets_should_fail() {
    let err = build_timeline(10.0, &sentences(&["Hello."]), &[], None).unwrap_err();
    assert_eq!(err, TimelineError::NoAssetsAvailable);
}

#[test]
fn test_build_timeline_with_blank_sentences_should_produce_no_cues() {
    let assets = image_assets(2);
    let (entries, cues) = build_timeline(10.0, &sentences(&["", "   "]), &assets, None).unwrap();

    assert_eq!(entries.len(), 2);
    assert!(cues.is_empty());
}

#[test]
fn test_proportional_cues_should_weight_by_character_length() {
    let assets = image_assets(1);
    // 5 chars vs 15 chars splits 10 seconds as 2.5 / 7.5
    let (_, cues) =
        build_timeline(10.0, &sentences(&["abcde", "abcdefghijklmno"]), &assets, None).unwrap();

    assert_eq!(cues.len(), 2);
    assert_close(cues[0].start, 0.0);
    assert_close(cues[0].end, 2.5);
    assert_close(cues[1].start, 2.5);
    assert_eq!(cues[1].end, 10.0);
}

#[test]
fn test_proportional_cues_should_force_final_end_to_duration() {
    let assets = image_assets(1);
    let (_, cues) = build_timeline(
        7.0,
        &sentences(&["abc", "defg", "hijkl"]),
        &assets,
        None,
    )
    .unwrap();

    assert_eq!(cues.last().unwrap().end, 7.0);
}

#[test]
fn test_aligned_cues_should_follow_transcript_times() {
    let assets = image_assets(1);
    let transcript = vec![
        segment("Hello world.", 0.3, 2.0),
        segment("Good.", 2.4, 3.0),
    ];
    let (_, cues) = build_timeline(
        5.0,
        &sentences(&["Hello world.", "Good."]),
        &assets,
        Some(&transcript),
    )
    .unwrap();

    assert_eq!(cues.len(), 2);
    assert_close(cues[0].start, 0.3);
    assert_close(cues[0].end, 2.0);
    assert_close(cues[1].start, 2.4);
    assert_close(cues[1].end, 3.0);
}

#[test]
fn test_aligned_cues_with_split_sentence_should_consume_until_length_reached() {
    let assets = image_assets(1);
    // The sentence is recognized across two segments, so the cue runs to the
    // end of the second one
    let transcript = vec![segment("One", 0.0, 1.0), segment("two three.", 1.0, 2.5)];
    let (_, cues) = build_timeline(
        6.0,
        &sentences(&["One two three."]),
        &assets,
        Some(&transcript),
    )
    .unwrap();

    assert_eq!(cues.len(), 1);
    assert_close(cues[0].start, 0.0);
    assert_close(cues[0].end, 2.5);
}

#[test]
fn test_aligned_cues_with_exhausted_transcript_should_fall_back_proportionally() {
    let assets = image_assets(1);
    let transcript = vec![segment("Hello world.", 0.5, 2.0)];
    let (_, cues) = build_timeline(
        10.0,
        &sentences(&["Hello world.", "More text here.", "End."]),
        &assets,
        Some(&transcript),
    )
    .unwrap();

    assert_eq!(cues.len(), 3);
    assert_close(cues[0].end, 2.0);
    // The fallback window starts where the aligned cues stopped
    assert_close(cues[1].start, 2.0);
    assert_eq!(cues.last().unwrap().end, 10.0);
}

#[test]
fn test_aligned_cues_should_be_clamped_to_narration_duration() {
    let assets = image_assets(1);
    // Whisper occasionally reports times past the audio length
    let transcript = vec![segment("Hi there.", 0.0, 15.0)];
    let (_, cues) = build_timeline(10.0, &sentences(&["Hi there."]), &assets, Some(&transcript)).unwrap();

    assert_close(cues[0].end, 10.0);
}

#[test]
fn test_aligned_cues_with_segment_past_narration_end_should_drop_the_cue() {
    let assets = image_assets(1);
    // The second segment lies entirely beyond the audio, clamping it would
    // leave a cue with no span at all
    let transcript = vec![
        segment("Hello there.", 0.0, 3.0),
        segment("Trailing noise.", 12.0, 15.0),
    ];
    let (_, cues) = build_timeline(
        10.0,
        &sentences(&["Hello there.", "Trailing noise."]),
        &assets,
        Some(&transcript),
    )
    .unwrap();

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text, "Hello there.");
    assert_close(cues[0].end, 3.0);
}

#[test]
fn test_empty_transcript_should_use_proportional_timing() {
    let assets = image_assets(1);
    let (_, cues) = build_timeline(8.0, &sentences(&["abcd", "efgh"]), &assets, Some(&[])).unwrap();

    assert_eq!(cues.len(), 2);
    assert_close(cues[0].end, 4.0);
}

#[test]
fn test_script_from_text_should_split_on_terminal_punctuation() {
    let script = Script::from_text("First. Second! Third?");
    assert_eq!(script.sentences, vec!["First.", "Second!", "Third?"]);
}

#[test]
fn test_script_from_text_should_keep_trailing_fragment() {
    let script = Script::from_text("One is done. And then");
    assert_eq!(script.sentences, vec!["One is done.", "And then"]);
}

#[test]
fn test_script_from_text_without_punctuation_should_split_on_commas() {
    let script = Script::from_text("alpha, beta, gamma");
    assert_eq!(script.sentences, vec!["alpha", "beta", "gamma"]);
}

#[test]
fn test_script_from_text_with_punctuation_should_ignore_commas() {
    let script = Script::from_text("Hello, world.");
    assert_eq!(script.sentences, vec!["Hello, world."]);
}

#[test]
fn test_script_from_text_with_empty_input_should_be_empty() {
    let script = Script::from_text("   ");
    assert!(script.is_empty());
}
