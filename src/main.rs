// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::app_config::{Config, SubtitleStyle, VoiceGender};
use crate::app_controller::Controller;
use crate::pipeline::{PipelineSpec, Preset};

mod app_config;
mod pipeline;
mod timeline;
mod subtitle_track;
mod voice_generator;
mod transcriber;
mod asset_fetcher;
mod content_generator;
mod video_assembler;
mod app_controller;
mod file_utils;
mod providers;
mod errors;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for SubtitleStyle to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliSubtitleStyle {
    Professional,
    Modern,
    Cinematic,
}

impl From<CliSubtitleStyle> for SubtitleStyle {
    fn from(style: CliSubtitleStyle) -> Self {
        match style {
            CliSubtitleStyle::Professional => SubtitleStyle::Professional,
            CliSubtitleStyle::Modern => SubtitleStyle::Modern,
            CliSubtitleStyle::Cinematic => SubtitleStyle::Cinematic,
        }
    }
}

/// CLI Wrapper for VoiceGender to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliVoiceGender {
    Male,
    Female,
}

impl From<CliVoiceGender> for VoiceGender {
    fn from(gender: CliVoiceGender) -> Self {
        match gender {
            CliVoiceGender::Male => VoiceGender::Male,
            CliVoiceGender::Female => VoiceGender::Female,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Produce a video from a built-in preset
    Run(RunArgs),

    /// Produce a video from your own script file
    Custom(CustomArgs),

    /// Let AI pick a topic and produce a video about it
    Generate(GenerateArgs),

    /// List the built-in presets
    Presets,

    /// List available narration voices
    Voices {
        /// Limit the listing to one language code (e.g. 'en-US')
        #[arg(long)]
        language: Option<String>,
    },

    /// Check external tools and services
    Status,

    /// Generate shell completions for clipfab
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Preset name (see `clipfab presets`)
    #[arg(value_name = "PRESET")]
    preset: String,

    /// How many videos to produce from this preset
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,

    /// Upload the finished video to YouTube
    #[arg(short, long)]
    upload: bool,

    #[command(flatten)]
    overrides: OverrideArgs,
}

#[derive(Parser, Debug)]
struct CustomArgs {
    /// Path of a plain text narration script
    #[arg(value_name = "SCRIPT_FILE")]
    script: PathBuf,

    /// Stock footage search query
    #[arg(short, long)]
    query: String,

    /// Topic used for upload metadata (defaults to the search query)
    #[arg(long)]
    topic: Option<String>,

    /// How many still images to fetch
    #[arg(long, default_value_t = 3)]
    images: usize,

    /// How many video clips to fetch
    #[arg(long, default_value_t = 2)]
    clips: usize,

    /// Upload the finished video to YouTube
    #[arg(short, long)]
    upload: bool,

    #[command(flatten)]
    overrides: OverrideArgs,
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Topic category to draw from (the model picks one otherwise)
    #[arg(long)]
    category: Option<String>,

    /// How many still images to fetch
    #[arg(long, default_value_t = 3)]
    images: usize,

    /// How many video clips to fetch
    #[arg(long, default_value_t = 2)]
    clips: usize,

    /// Upload the finished video to YouTube
    #[arg(short, long)]
    upload: bool,

    #[command(flatten)]
    overrides: OverrideArgs,
}

#[derive(Parser, Debug)]
struct OverrideArgs {
    /// Narration language code (e.g. 'en-US', 'de-DE')
    #[arg(long)]
    language: Option<String>,

    /// Exact narration voice name (e.g. 'en-US-AriaNeural')
    #[arg(long)]
    voice: Option<String>,

    /// Pick a voice of this gender for the narration language
    #[arg(long, value_enum, conflicts_with = "voice")]
    gender: Option<CliVoiceGender>,

    /// Subtitle style for the burn-in pass
    #[arg(long, value_enum)]
    style: Option<CliSubtitleStyle>,
}

/// clipfab - stock footage video generator
///
/// Turns a narration script into a finished MP4 with synthesized speech,
/// matching stock visuals and burned-in subtitles.
#[derive(Parser, Debug)]
#[command(name = "clipfab")]
#[command(version = "1.0.0")]
#[command(about = "Script-to-video generation pipeline")]
#[command(long_about = "clipfab narrates a script with edge-tts, fetches matching stock footage from
Pexels, times subtitles against a whisper transcript and renders everything
to MP4 with ffmpeg.

EXAMPLES:
    clipfab presets                                  # See what's built in
    clipfab run nature-documentary                   # Produce one video
    clipfab run quick-demo -n 3                      # Produce three videos
    clipfab run ai-future --gender female            # Pick a female voice
    clipfab custom story.txt -q \"mountain sunrise\"   # Narrate your own script
    clipfab generate --category space                # Let AI invent the video
    clipfab status                                   # Check tools and services
    clipfab completions bash > clipfab.bash          # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different config file with --config. If the config file doesn't exist,
    a default one will be created automatically. The Pexels API key can
    also be supplied through the PEXELS_API_KEY environment variable.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and emoji for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "❌ "),
            Level::Warn => ("\x1B[1;33m", "🚧 "),
            Level::Info => ("\x1B[1;32m", " "),
            Level::Debug => ("\x1B[1;36m", "🔍 "),
            Level::Trace => ("\x1B[1;35m", "📋 "),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, emoji) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(cmd_log_level) = &cli.log_level {
        log::set_max_level(to_level_filter(&cmd_log_level.clone().into()));
    }

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "clipfab", &mut std::io::stdout());
            Ok(())
        }
        Commands::Presets => {
            print_presets();
            Ok(())
        }
        Commands::Voices { ref language } => {
            print_voices(language.as_deref());
            Ok(())
        }
        Commands::Status => {
            let config = load_config(&cli.config_path, &cli.log_level)?;
            run_status(config).await
        }
        Commands::Run(ref args) => {
            let config = load_config(&cli.config_path, &cli.log_level)?;
            run_preset(config, args).await
        }
        Commands::Custom(ref args) => {
            let config = load_config(&cli.config_path, &cli.log_level)?;
            run_custom(config, args).await
        }
        Commands::Generate(ref args) => {
            let config = load_config(&cli.config_path, &cli.log_level)?;
            run_generate(config, args).await
        }
    }
}

async fn run_preset(mut config: Config, args: &RunArgs) -> Result<()> {
    let preset = Preset::from_str(&args.preset)?;
    let mut spec = preset.spec();
    apply_overrides(&mut config, &mut spec, &args.overrides)?;

    if args.count == 0 {
        return Err(anyhow!("--count must be at least 1"));
    }

    let controller = Controller::new(config)?;

    if args.count == 1 {
        let outcome = controller.run(&spec, None, args.upload).await?;
        report_outcome(&outcome);
        return Ok(());
    }

    let outcomes = controller.run_batch(&spec, args.count, args.upload).await;
    let succeeded = outcomes.iter().filter(|o| o.is_ok()).count();
    for outcome in outcomes.iter().flatten() {
        report_outcome(outcome);
    }
    if succeeded < outcomes.len() {
        warn!("{}/{} batch runs failed", outcomes.len() - succeeded, outcomes.len());
    }
    Ok(())
}

async fn run_custom(mut config: Config, args: &CustomArgs) -> Result<()> {
    if !args.script.is_file() {
        return Err(anyhow!("Script file does not exist: {:?}", args.script));
    }
    let script_text = std::fs::read_to_string(&args.script)
        .with_context(|| format!("Failed to read script file: {:?}", args.script))?;

    let topic = args.topic.clone().unwrap_or_else(|| args.query.clone());
    let stem = args
        .script
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "custom".to_string());

    let mut spec = PipelineSpec {
        name: stem,
        description: "User-supplied script".to_string(),
        topic,
        search_query: args.query.clone(),
        script: None,
        voice: None,
        image_count: args.images,
        clip_count: args.clips,
        style: config.subtitles.style,
        generate_script: false,
    };
    apply_overrides(&mut config, &mut spec, &args.overrides)?;

    let controller = Controller::new(config)?;
    let outcome = controller.run(&spec, Some(script_text), args.upload).await?;
    report_outcome(&outcome);
    Ok(())
}

async fn run_generate(mut config: Config, args: &GenerateArgs) -> Result<()> {
    // The spec does not exist until the model picks a topic, so only the
    // config-level overrides apply here
    apply_voice_overrides(&mut config, &args.overrides)?;
    let style = args
        .overrides
        .style
        .clone()
        .map(SubtitleStyle::from)
        .unwrap_or(config.subtitles.style);
    config.subtitles.style = style;

    let controller = Controller::new(config)?;
    let outcome = controller
        .run_generated(args.category.as_deref(), args.images, args.clips, style, args.upload)
        .await?;
    report_outcome(&outcome);
    Ok(())
}

async fn run_status(config: Config) -> Result<()> {
    let controller = Controller::new(config)?;
    let report = controller.status().await;

    let mut all_ok = true;
    for (name, result) in &report {
        match result {
            Ok(detail) => info!("{:12} ok: {}", name, detail),
            Err(e) => {
                all_ok = false;
                warn!("{:12} unavailable: {}", name, e);
            }
        }
    }

    if all_ok {
        Ok(())
    } else {
        Err(anyhow!("One or more external collaborators are unavailable"))
    }
}

/// Apply CLI overrides to the loaded config and the pipeline spec
fn apply_overrides(config: &mut Config, spec: &mut PipelineSpec, overrides: &OverrideArgs) -> Result<()> {
    if overrides.language.is_some() {
        // A preset voice from another language must not survive a language
        // switch, the configured default for the new language takes over
        spec.voice = None;
    }

    apply_voice_overrides(config, overrides)?;

    if overrides.voice.is_some() || overrides.gender.is_some() {
        spec.voice = Some(config.voice.default_voice.clone());
    }

    if let Some(style) = &overrides.style {
        spec.style = style.clone().into();
    }
    config.subtitles.style = spec.style;

    Ok(())
}

/// Apply the config-level voice and language overrides
fn apply_voice_overrides(config: &mut Config, overrides: &OverrideArgs) -> Result<()> {
    if let Some(language) = &overrides.language {
        if !app_config::is_language_supported(language) {
            return Err(anyhow!("Unsupported language: {}", language));
        }
        config.language = language.clone();
        config.voice.default_voice = app_config::default_voice_for_language(language).to_string();
    }

    if let Some(voice) = &overrides.voice {
        if !app_config::is_known_voice(voice) {
            warn!("Voice '{}' is not in the built-in table, passing it to edge-tts anyway", voice);
        }
        config.voice.default_voice = voice.clone();
    } else if let Some(gender) = &overrides.gender {
        config.voice.default_voice =
            app_config::voice_by_gender(gender.clone().into(), &config.language);
    }

    Ok(())
}

fn print_presets() {
    println!("Available presets:");
    for preset in Preset::all() {
        let spec = preset.spec();
        println!(
            "  {:20} {} ({} images, {} clips, {} subtitles, {})",
            preset.id(),
            spec.description,
            spec.image_count,
            spec.clip_count,
            spec.style,
            spec.voice.as_deref().unwrap_or("default voice")
        );
    }
}

fn print_voices(language: Option<&str>) {
    match language {
        Some(code) => match app_config::language_entry(code) {
            Some(entry) => {
                println!("{} ({}):", entry.name, entry.code);
                for voice in entry.voices {
                    let marker = if *voice == entry.male_voice { " (default)" } else { "" };
                    println!("  {}{}", voice, marker);
                }
            }
            None => println!("Unsupported language: {}", code),
        },
        None => {
            for entry in app_config::SUPPORTED_LANGUAGES {
                println!("{:8} {} ({} voices)", entry.code, entry.name, entry.voices.len());
            }
        }
    }
}

fn report_outcome(outcome: &app_controller::RunOutcome) {
    info!(
        "Done in {:.1}s: {} ({:.1}s of narration, {} scenes, {} cues)",
        outcome.elapsed_secs,
        outcome.video_path.display(),
        outcome.duration,
        outcome.entry_count,
        outcome.cue_count
    );
    if let Some(id) = &outcome.uploaded_id {
        info!("Published at https://youtu.be/{}", id);
    }
}

fn to_level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

fn load_config(config_path: &str, cli_log_level: &Option<CliLogLevel>) -> Result<Config> {
    let config = if Path::new(config_path).exists() {
        let mut config = Config::from_file(config_path)?;
        if let Some(log_level) = cli_log_level {
            config.log_level = log_level.clone().into();
        }
        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let mut config = Config::default();
        if let Some(log_level) = cli_log_level {
            config.log_level = log_level.clone().into();
        }

        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // If log level was not set via command line, update it from config now
    if cli_log_level.is_none() {
        log::set_max_level(to_level_filter(&config.log_level));
    }

    Ok(config)
}
