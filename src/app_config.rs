use std::path::{Path, PathBuf};
use anyhow::{anyhow, Result};
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings. All state is carried in
/// an explicit immutable Config passed to each component at construction.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Narration language code (BCP 47, e.g. "en-US")
    #[serde(default = "default_language")]
    pub language: String,

    /// Voice synthesis settings
    #[serde(default)]
    pub voice: VoiceConfig,

    /// Asset and output directory layout
    #[serde(default)]
    pub directories: DirectoryConfig,

    /// Video rendering settings
    #[serde(default)]
    pub render: RenderConfig,

    /// Subtitle styling settings
    #[serde(default)]
    pub subtitles: SubtitleConfig,

    /// External provider settings
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Voice synthesis configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VoiceConfig {
    /// Voice name (e.g. "en-US-BrianNeural")
    #[serde(default = "default_voice")]
    pub default_voice: String,

    /// Speech rate adjustment (e.g. "+0%", "-10%")
    #[serde(default = "default_voice_rate")]
    pub rate: String,

    /// Speech pitch adjustment (e.g. "+0Hz", "-10Hz")
    #[serde(default = "default_voice_pitch")]
    pub pitch: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            default_voice: default_voice(),
            rate: default_voice_rate(),
            pitch: default_voice_pitch(),
        }
    }
}

/// Directory layout for downloaded assets and rendered output
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DirectoryConfig {
    /// Root directory for downloaded assets
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    /// Directory for rendered videos and job folders
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            assets_dir: default_assets_dir(),
            output_dir: default_output_dir(),
        }
    }
}

impl DirectoryConfig {
    /// Directory for downloaded still images
    pub fn images_dir(&self) -> PathBuf {
        self.assets_dir.join("images")
    }

    /// Directory for downloaded video clips
    pub fn clips_dir(&self) -> PathBuf {
        self.assets_dir.join("clips")
    }

    /// Directory for synthesized narration audio
    pub fn audio_dir(&self) -> PathBuf {
        self.assets_dir.join("audio")
    }

    /// All directories that must exist before a pipeline run
    pub fn all(&self) -> Vec<PathBuf> {
        vec![
            self.assets_dir.clone(),
            self.images_dir(),
            self.clips_dir(),
            self.audio_dir(),
            self.output_dir.clone(),
        ]
    }
}

/// Video rendering configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RenderConfig {
    /// Frames per second of the output video
    #[serde(default = "default_fps")]
    pub fps: u32,

    /// Output width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Output height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// ffmpeg render timeout in seconds
    #[serde(default = "default_render_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            width: default_width(),
            height: default_height(),
            timeout_secs: default_render_timeout_secs(),
        }
    }
}

/// Subtitle burn-in styling
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubtitleConfig {
    /// Named style preset
    #[serde(default)]
    pub style: SubtitleStyle,

    /// Bottom margin in pixels
    #[serde(default = "default_subtitle_margin")]
    pub margin: u32,
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            style: SubtitleStyle::default(),
            margin: default_subtitle_margin(),
        }
    }
}

/// Named subtitle style preset, mapped to an ASS force_style string at render time
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleStyle {
    #[default]
    Professional,
    Modern,
    Cinematic,
}

impl SubtitleStyle {
    /// ASS style override string for the ffmpeg subtitles filter
    pub fn force_style(&self) -> &'static str {
        match self {
            Self::Professional => {
                "FontName=Arial,FontSize=28,PrimaryColour=&H00FFFFFF,OutlineColour=&H00000000,Outline=3,Bold=1"
            }
            Self::Modern => {
                "FontName=Helvetica,FontSize=30,PrimaryColour=&H00FFFFFF,OutlineColour=&H00800000,Outline=2,Bold=1"
            }
            Self::Cinematic => {
                "FontName=Georgia,FontSize=26,PrimaryColour=&H0000D7FF,OutlineColour=&H00000000,Outline=4,Bold=1"
            }
        }
    }
}

impl std::fmt::Display for SubtitleStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Professional => "professional",
            Self::Modern => "modern",
            Self::Cinematic => "cinematic",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for SubtitleStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "professional" => Ok(Self::Professional),
            "modern" => Ok(Self::Modern),
            "cinematic" => Ok(Self::Cinematic),
            _ => Err(anyhow!("Invalid subtitle style: {}", s)),
        }
    }
}

/// External provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProvidersConfig {
    /// Pexels stock media settings
    #[serde(default)]
    pub pexels: PexelsConfig,

    /// Ollama content generation settings
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Whisper transcription settings
    #[serde(default)]
    pub whisper: WhisperConfig,

    /// YouTube upload settings
    #[serde(default)]
    pub youtube: YouTubeConfig,
}

/// Pexels stock media configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PexelsConfig {
    // @field: API key, may also come from PEXELS_API_KEY
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Photo search endpoint
    #[serde(default = "default_pexels_endpoint")]
    pub endpoint: String,

    // @field: Video search endpoint
    #[serde(default = "default_pexels_videos_endpoint")]
    pub videos_endpoint: String,

    // @field: Results requested per search page
    #[serde(default = "default_per_page")]
    pub per_page: usize,

    // @field: Request timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    // @field: Base backoff in milliseconds, doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for PexelsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_pexels_endpoint(),
            videos_endpoint: default_pexels_videos_endpoint(),
            per_page: default_per_page(),
            timeout_secs: default_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl PexelsConfig {
    /// Resolve the API key, preferring the environment over the config file
    pub fn resolve_api_key(&self) -> String {
        std::env::var("PEXELS_API_KEY").unwrap_or_else(|_| self.api_key.clone())
    }
}

/// Ollama content generation configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OllamaConfig {
    /// Model name (e.g. "llama3.1", "mistral")
    #[serde(default = "default_ollama_model")]
    pub model: String,

    /// Service endpoint URL
    #[serde(default = "default_ollama_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_ollama_timeout_secs")]
    pub timeout_secs: u64,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            model: default_ollama_model(),
            endpoint: default_ollama_endpoint(),
            timeout_secs: default_ollama_timeout_secs(),
            temperature: default_temperature(),
        }
    }
}

/// Whisper transcription configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WhisperConfig {
    /// Whether to attempt transcription-aligned subtitle timing
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Whisper binary name or path
    #[serde(default = "default_whisper_binary")]
    pub binary: String,

    /// Whisper model size ("tiny", "base", "small", ...)
    #[serde(default = "default_whisper_model")]
    pub model: String,

    /// Transcription timeout in seconds
    #[serde(default = "default_whisper_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            binary: default_whisper_binary(),
            model: default_whisper_model(),
            timeout_secs: default_whisper_timeout_secs(),
        }
    }
}

/// YouTube upload configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct YouTubeConfig {
    /// Whether uploads are enabled at all
    #[serde(default)]
    pub enabled: bool,

    /// OAuth access token with youtube.upload scope
    #[serde(default = "String::new")]
    pub access_token: String,

    /// Upload endpoint URL
    #[serde(default = "default_youtube_endpoint")]
    pub endpoint: String,

    /// Privacy status for uploaded videos ("public", "unlisted", "private")
    #[serde(default = "default_privacy_status")]
    pub privacy_status: String,

    /// Request timeout in seconds
    #[serde(default = "default_upload_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            access_token: String::new(),
            endpoint: default_youtube_endpoint(),
            privacy_status: default_privacy_status(),
            timeout_secs: default_upload_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

/// Preferred narrator gender when picking a voice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceGender {
    Male,
    Female,
}

impl std::str::FromStr for VoiceGender {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            _ => Err(anyhow!("Invalid voice gender: {}", s)),
        }
    }
}

/// Voices available for one narration language
pub struct LanguageVoices {
    /// BCP 47 language code
    pub code: &'static str,
    /// Human-readable language name
    pub name: &'static str,
    /// Default male voice for the language
    pub male_voice: &'static str,
    /// All voices for the language, male voices first
    pub voices: &'static [&'static str],
}

/// Supported narration languages and their edge-tts voices
pub static SUPPORTED_LANGUAGES: &[LanguageVoices] = &[
    LanguageVoices {
        code: "en-US",
        name: "English (US)",
        male_voice: "en-US-BrianNeural",
        voices: &[
            "en-US-BrianNeural", "en-US-AndrewNeural", "en-US-GuyNeural",
            "en-US-DavisNeural", "en-US-JasonNeural", "en-US-RogerNeural",
            "en-US-SteffanNeural", "en-US-TonyNeural", "en-US-RyanNeural",
            "en-US-AriaNeural", "en-US-JennyNeural", "en-US-AvaNeural",
            "en-US-EmmaNeural", "en-US-MichelleNeural", "en-US-NancyNeural",
            "en-US-AmberNeural", "en-US-AshleyNeural",
        ],
    },
    LanguageVoices {
        code: "ru-RU",
        name: "Russian",
        male_voice: "ru-RU-DmitryNeural",
        voices: &["ru-RU-DmitryNeural"],
    },
    LanguageVoices {
        code: "es-ES",
        name: "Spanish (Spain)",
        male_voice: "es-ES-AlvaroNeural",
        voices: &["es-ES-AlvaroNeural"],
    },
    LanguageVoices {
        code: "fr-FR",
        name: "French",
        male_voice: "fr-FR-HenriNeural",
        voices: &["fr-FR-HenriNeural", "fr-FR-RemyMultilingualNeural"],
    },
    LanguageVoices {
        code: "de-DE",
        name: "German",
        male_voice: "de-DE-ConradNeural",
        voices: &["de-DE-ConradNeural", "de-DE-KillianNeural", "de-DE-FlorianMultilingualNeural"],
    },
    LanguageVoices {
        code: "it-IT",
        name: "Italian",
        male_voice: "it-IT-DiegoNeural",
        voices: &["it-IT-DiegoNeural", "it-IT-GiuseppeMultilingualNeural"],
    },
    LanguageVoices {
        code: "pt-BR",
        name: "Portuguese (Brazil)",
        male_voice: "pt-BR-AntonioNeural",
        voices: &["pt-BR-AntonioNeural"],
    },
    LanguageVoices {
        code: "zh-CN",
        name: "Chinese (Mandarin)",
        male_voice: "zh-CN-YunjianNeural",
        voices: &["zh-CN-YunjianNeural", "zh-CN-YunxiNeural", "zh-CN-YunxiaNeural", "zh-CN-YunyangNeural"],
    },
    LanguageVoices {
        code: "ja-JP",
        name: "Japanese",
        male_voice: "ja-JP-KeitaNeural",
        voices: &["ja-JP-KeitaNeural"],
    },
    LanguageVoices {
        code: "ko-KR",
        name: "Korean",
        male_voice: "ko-KR-InJoonNeural",
        voices: &["ko-KR-InJoonNeural", "ko-KR-HyunsuMultilingualNeural"],
    },
    LanguageVoices {
        code: "pl-PL",
        name: "Polish",
        male_voice: "pl-PL-MarekNeural",
        voices: &["pl-PL-MarekNeural"],
    },
    LanguageVoices {
        code: "tr-TR",
        name: "Turkish",
        male_voice: "tr-TR-AhmetNeural",
        voices: &["tr-TR-AhmetNeural"],
    },
    LanguageVoices {
        code: "nl-NL",
        name: "Dutch",
        male_voice: "nl-NL-MaartenNeural",
        voices: &["nl-NL-MaartenNeural"],
    },
];

/// Look up the voice table entry for a language code
pub fn language_entry(language: &str) -> Option<&'static LanguageVoices> {
    SUPPORTED_LANGUAGES.iter().find(|l| l.code.eq_ignore_ascii_case(language))
}

/// Whether a language code is supported
pub fn is_language_supported(language: &str) -> bool {
    language_entry(language).is_some()
}

/// All voices for a language, falling back to English when unknown
pub fn voices_for_language(language: &str) -> &'static [&'static str] {
    language_entry(language)
        .map(|l| l.voices)
        .unwrap_or(SUPPORTED_LANGUAGES[0].voices)
}

/// Default male voice for a language, falling back to the global default
pub fn default_voice_for_language(language: &str) -> &'static str {
    language_entry(language)
        .map(|l| l.male_voice)
        .unwrap_or(SUPPORTED_LANGUAGES[0].male_voice)
}

/// Pick a random voice for a language
pub fn random_voice(language: &str) -> String {
    let voices = voices_for_language(language);
    let mut rng = rand::rng();
    voices.choose(&mut rng).unwrap_or(&voices[0]).to_string()
}

/// Pick a voice matching a gender preference for a language.
///
/// Male picks the language's default male voice; female picks randomly
/// among the remaining voices, or the first voice when the language has
/// only one.
pub fn voice_by_gender(gender: VoiceGender, language: &str) -> String {
    let entry = language_entry(language).unwrap_or(&SUPPORTED_LANGUAGES[0]);
    match gender {
        VoiceGender::Male => entry.male_voice.to_string(),
        VoiceGender::Female => {
            let candidates: Vec<&&str> = entry
                .voices
                .iter()
                .filter(|v| **v != entry.male_voice)
                .collect();
            let mut rng = rand::rng();
            candidates
                .choose(&mut rng)
                .map(|v| v.to_string())
                .unwrap_or_else(|| entry.voices[0].to_string())
        }
    }
}

/// Whether a voice name appears in the table for any language
pub fn is_known_voice(voice: &str) -> bool {
    SUPPORTED_LANGUAGES.iter().any(|l| l.voices.contains(&voice))
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_voice() -> String {
    "en-US-BrianNeural".to_string()
}

fn default_voice_rate() -> String {
    "+0%".to_string()
}

fn default_voice_pitch() -> String {
    "+0Hz".to_string()
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("assets")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_fps() -> u32 {
    24
}

fn default_width() -> u32 {
    1920
}

fn default_height() -> u32 {
    1080
}

fn default_render_timeout_secs() -> u64 {
    600
}

fn default_subtitle_margin() -> u32 {
    80
}

fn default_pexels_endpoint() -> String {
    "https://api.pexels.com/v1".to_string()
}

fn default_pexels_videos_endpoint() -> String {
    "https://api.pexels.com/videos".to_string()
}

fn default_per_page() -> usize {
    5
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_ollama_model() -> String {
    "llama3.1".to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_timeout_secs() -> u64 {
    120
}

fn default_temperature() -> f32 {
    0.7
}

fn default_true() -> bool {
    true
}

fn default_whisper_binary() -> String {
    "whisper".to_string()
}

fn default_whisper_model() -> String {
    "base".to_string()
}

fn default_whisper_timeout_secs() -> u64 {
    300
}

fn default_youtube_endpoint() -> String {
    "https://www.googleapis.com/upload/youtube/v3/videos".to_string()
}

fn default_privacy_status() -> String {
    "unlisted".to_string()
}

fn default_upload_timeout_secs() -> u64 {
    600
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if !is_language_supported(&self.language) {
            return Err(anyhow!(
                "Unsupported language: {} (supported: {})",
                self.language,
                SUPPORTED_LANGUAGES.iter().map(|l| l.code).collect::<Vec<_>>().join(", ")
            ));
        }

        let api_key = self.providers.pexels.resolve_api_key();
        if api_key.is_empty() || api_key == "your_pexels_api_key_here" {
            return Err(anyhow!(
                "A Pexels API key is required. Set providers.pexels.api_key or the PEXELS_API_KEY environment variable."
            ));
        }

        if self.render.fps == 0 || self.render.width == 0 || self.render.height == 0 {
            return Err(anyhow!("Render settings must be non-zero (fps/width/height)"));
        }

        if self.providers.youtube.enabled && self.providers.youtube.access_token.is_empty() {
            return Err(anyhow!("YouTube upload is enabled but no access token is configured"));
        }

        Ok(())
    }

    /// Create all configured directories if they don't exist
    pub fn ensure_directories(&self) -> Result<()> {
        for dir in self.directories.all() {
            if !dir.exists() {
                std::fs::create_dir_all(&dir)
                    .map_err(|e| anyhow!("Failed to create directory {}: {}", dir.display(), e))?;
            }
        }
        Ok(())
    }

    /// Load a config from a JSON file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path.as_ref().display(), e))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path.as_ref().display(), e))?;
        Ok(config)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            language: default_language(),
            voice: VoiceConfig::default(),
            directories: DirectoryConfig::default(),
            render: RenderConfig::default(),
            subtitles: SubtitleConfig::default(),
            providers: ProvidersConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
