/*!
 * Common test utilities for the clipfab test suite
 */

use std::fs;
use std::path::PathBuf;
use anyhow::Result;
use tempfile::TempDir;

use clipfab::timeline::{AssetRef, TranscriptSegment};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample SRT file for testing
pub fn create_test_srt(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    let content = r#"1
00:00:01,000 --> 00:00:04,000
This is a test subtitle.

2
00:00:05,000 --> 00:00:09,000
It contains multiple entries.

3
00:00:10,000 --> 00:00:14,000
For testing purposes.
"#;
    create_test_file(dir, filename, content)
}

/// Builds a list of image asset references with synthetic paths
pub fn image_assets(count: usize) -> Vec<AssetRef> {
    (0..count)
        .map(|i| AssetRef::image(format!("/assets/images/img_{}.jpg", i)))
        .collect()
}

/// Builds a clip asset reference with a synthetic path
pub fn clip_asset(name: &str, duration: f64) -> AssetRef {
    AssetRef::clip(format!("/assets/clips/{}.mp4", name), duration)
}

/// Builds a transcript segment
pub fn segment(text: &str, start: f64, end: f64) -> TranscriptSegment {
    TranscriptSegment {
        text: text.to_string(),
        start,
        end,
    }
}

/// Asserts two floats are equal within a millisecond of tolerance
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {} to be close to {}",
        actual,
        expected
    );
}
