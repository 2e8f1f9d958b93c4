/*!
 * Tests for app configuration and the voice table
 */

use std::str::FromStr;

use clipfab::app_config::{
    self, Config, SubtitleStyle, VoiceGender,
};

fn valid_config() -> Config {
    let mut config = Config::default();
    config.providers.pexels.api_key = "test_key".to_string();
    config
}

#[test]
fn test_default_config_should_use_english_defaults() {
    let config = Config::default();
    assert_eq!(config.language, "en-US");
    assert_eq!(config.voice.default_voice, "en-US-BrianNeural");
    assert_eq!(config.render.width, 1920);
    assert_eq!(config.render.height, 1080);
    assert_eq!(config.render.fps, 24);
}

#[test]
fn test_validate_with_api_key_should_succeed() {
    assert!(valid_config().validate().is_ok());
}

#[test]
fn test_validate_with_unsupported_language_should_fail() {
    let mut config = valid_config();
    config.language = "xx-XX".to_string();

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("Unsupported language"));
}

#[test]
fn test_validate_with_zero_fps_should_fail() {
    let mut config = valid_config();
    config.render.fps = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_with_upload_enabled_but_no_token_should_fail() {
    let mut config = valid_config();
    config.providers.youtube.enabled = true;

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("access token"));
}

#[test]
fn test_partial_config_json_should_fill_in_defaults() {
    let config: Config = serde_json::from_str(r#"{"language": "fr-FR"}"#).unwrap();

    assert_eq!(config.language, "fr-FR");
    assert_eq!(config.render.fps, 24);
    assert_eq!(config.providers.ollama.model, "llama3.1");
}

#[test]
fn test_voices_for_language_should_return_language_voices() {
    let voices = app_config::voices_for_language("de-DE");
    assert!(voices.contains(&"de-DE-ConradNeural"));
}

#[test]
fn test_voices_for_unknown_language_should_fall_back_to_english() {
    let voices = app_config::voices_for_language("xx-XX");
    assert!(voices.contains(&"en-US-BrianNeural"));
}

#[test]
fn test_language_lookup_should_ignore_case() {
    assert!(app_config::is_language_supported("EN-us"));
    assert!(!app_config::is_language_supported("tlh-QO"));
}

#[test]
fn test_voice_by_gender_with_male_should_return_default_male_voice() {
    let voice = app_config::voice_by_gender(VoiceGender::Male, "ja-JP");
    assert_eq!(voice, "ja-JP-KeitaNeural");
}

#[test]
fn test_voice_by_gender_with_female_should_avoid_male_default() {
    let voice = app_config::voice_by_gender(VoiceGender::Female, "en-US");
    assert_ne!(voice, "en-US-BrianNeural");
    assert!(app_config::voices_for_language("en-US").contains(&voice.as_str()));
}

#[test]
fn test_voice_by_gender_with_single_voice_language_should_return_that_voice() {
    let voice = app_config::voice_by_gender(VoiceGender::Female, "ru-RU");
    assert_eq!(voice, "ru-RU-DmitryNeural");
}

#[test]
fn test_random_voice_should_come_from_the_language_table() {
    for _ in 0..20 {
        let voice = app_config::random_voice("zh-CN");
        assert!(app_config::voices_for_language("zh-CN").contains(&voice.as_str()));
    }
}

#[test]
fn test_is_known_voice_should_find_voices_across_languages() {
    assert!(app_config::is_known_voice("fr-FR-HenriNeural"));
    assert!(!app_config::is_known_voice("en-US-NotARealNeural"));
}

#[test]
fn test_subtitle_style_should_parse_case_insensitively() {
    assert_eq!(SubtitleStyle::from_str("Modern").unwrap(), SubtitleStyle::Modern);
    assert_eq!(SubtitleStyle::from_str("CINEMATIC").unwrap(), SubtitleStyle::Cinematic);
    assert!(SubtitleStyle::from_str("comic-sans").is_err());
}

#[test]
fn test_subtitle_styles_should_produce_distinct_force_styles() {
    let professional = SubtitleStyle::Professional.force_style();
    let modern = SubtitleStyle::Modern.force_style();
    let cinematic = SubtitleStyle::Cinematic.force_style();

    assert!(professional.contains("FontName="));
    assert_ne!(professional, modern);
    assert_ne!(modern, cinematic);
}

#[test]
fn test_directory_config_should_derive_subdirectories() {
    let config = Config::default();
    let dirs = config.directories;

    assert_eq!(dirs.images_dir(), dirs.assets_dir.join("images"));
    assert_eq!(dirs.clips_dir(), dirs.assets_dir.join("clips"));
    assert_eq!(dirs.audio_dir(), dirs.assets_dir.join("audio"));
    assert_eq!(dirs.all().len(), 5);
}
