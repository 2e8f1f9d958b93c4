/*!
 * Tests for the transcription fallback behavior
 */

use std::path::Path;

use clipfab::app_config::WhisperConfig;
use clipfab::transcriber::Transcriber;
use clipfab::voice_generator::VoiceGenerator;
use clipfab::Config;

#[tokio::test]
async fn test_transcribe_when_disabled_should_return_none() {
    let config = WhisperConfig {
        enabled: false,
        ..WhisperConfig::default()
    };
    let transcriber = Transcriber::new(&config);

    let result = transcriber.transcribe(Path::new("/audio/narration.mp3"), "en-US").await;

    assert!(result.is_none());
}

#[tokio::test]
async fn test_transcribe_with_missing_binary_should_return_none() {
    let config = WhisperConfig {
        enabled: true,
        binary: "definitely-not-a-real-whisper-binary".to_string(),
        ..WhisperConfig::default()
    };
    let transcriber = Transcriber::new(&config);

    let result = transcriber.transcribe(Path::new("/audio/narration.mp3"), "en-US").await;

    assert!(result.is_none());
}

#[test]
fn test_synthesize_with_empty_text_should_fail() {
    let generator = VoiceGenerator::new(&Config::default());

    let result = tokio_test::block_on(generator.synthesize("   ", None));

    assert!(result.is_err());
}
