use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{info, warn};

use crate::app_config::{Config, SubtitleStyle};
use crate::asset_fetcher::AssetFetcher;
use crate::content_generator::ContentGenerator;
use crate::file_utils::FileManager;
use crate::pipeline::PipelineSpec;
use crate::providers::youtube::YouTube;
use crate::providers::Provider;
use crate::subtitle_track::SubtitleTrack;
use crate::timeline::{build_timeline, Script};
use crate::transcriber::Transcriber;
use crate::video_assembler::VideoAssembler;
use crate::voice_generator::VoiceGenerator;

// @module: Pipeline orchestration

/// What one finished pipeline run produced
#[derive(Debug)]
pub struct RunOutcome {
    /// Job folder holding the video and its provenance files
    pub job_dir: PathBuf,

    /// Rendered MP4 path
    pub video_path: PathBuf,

    /// Narration duration in seconds
    pub duration: f64,

    /// Number of scheduled timeline entries
    pub entry_count: usize,

    /// Number of subtitle cues
    pub cue_count: usize,

    /// YouTube video id when the run uploaded
    pub uploaded_id: Option<String>,

    /// Wall clock seconds the run took
    pub elapsed_secs: f64,
}

/// Main controller driving a full script-to-video run
pub struct Controller {
    config: Config,
    content: ContentGenerator,
    fetcher: AssetFetcher,
    voice: VoiceGenerator,
    transcriber: Transcriber,
    assembler: VideoAssembler,
}

impl Controller {
    /// Create a controller with validated configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        config.ensure_directories()?;

        let content = ContentGenerator::new(&config.providers.ollama);
        let fetcher = AssetFetcher::new(&config);
        let voice = VoiceGenerator::new(&config);
        let transcriber = Transcriber::new(&config.providers.whisper);
        let assembler = VideoAssembler::new(config.render.clone(), config.subtitles.clone());

        Ok(Self {
            config,
            content,
            fetcher,
            voice,
            transcriber,
            assembler,
        })
    }

    /// Run one pipeline spec end to end.
    ///
    /// The narration text comes from `script_override` first, then the
    /// spec's own fixed script, and only then from AI generation when the
    /// spec allows it.
    pub async fn run(
        &self,
        spec: &PipelineSpec,
        script_override: Option<String>,
        upload: bool,
    ) -> Result<RunOutcome> {
        let started = Instant::now();
        let multi = MultiProgress::new();

        let script_text = match script_override.or_else(|| spec.script.clone()) {
            Some(text) => text,
            None if spec.generate_script => {
                let pb = stage_bar(&multi, "Writing script");
                let text = self
                    .content
                    .generate_script(&spec.topic, 8)
                    .await
                    .context("Script generation failed")?;
                pb.finish_with_message("Script written");
                text
            }
            None => return Err(anyhow!("Preset '{}' requires a script to be supplied", spec.name)),
        };

        let script = Script::from_text(&script_text);
        if script.is_empty() {
            return Err(anyhow!("The script contains no narration sentences"));
        }

        let job_dir = self.create_job_dir(&spec.name)?;
        FileManager::write_to_file(job_dir.join("script.txt"), &script_text)?;

        // Narration first, its duration drives everything downstream
        let pb = stage_bar(&multi, "Synthesizing narration");
        let narration = self.voice.synthesize(&script_text, spec.voice.as_deref()).await?;
        pb.finish_with_message(format!("Narration ready ({:.1}s)", narration.duration));

        let pb = stage_bar(&multi, "Fetching assets");
        let assets = self
            .fetcher
            .fetch(&spec.search_query, spec.image_count, spec.clip_count)
            .await?;
        pb.finish_with_message(format!("{} assets fetched", assets.len()));

        let pb = stage_bar(&multi, "Transcribing narration");
        let transcript = self
            .transcriber
            .transcribe(&narration.path, &self.config.language)
            .await;
        pb.finish_with_message(match &transcript {
            Some(segments) => format!("Transcript aligned ({} segments)", segments.len()),
            None => "Proportional subtitle timing".to_string(),
        });

        let (entries, cues) =
            build_timeline(narration.duration, &script.sentences, &assets, transcript.as_deref())?;

        let cue_count = cues.len();
        let subtitle_path = if cues.is_empty() {
            None
        } else {
            let track = SubtitleTrack::from_cues(cues);
            Some(track.write_to_srt(job_dir.join("subtitles.srt"))?)
        };

        let pb = stage_bar(&multi, "Rendering video");
        let video_path = self
            .assembler
            .assemble(
                &entries,
                &narration.path,
                subtitle_path.as_deref(),
                &job_dir.join("video.mp4"),
            )
            .await?;
        pb.finish_with_message("Video rendered");

        let uploaded_id = if upload {
            let pb = stage_bar(&multi, "Uploading to YouTube");
            let id = self.upload(&video_path, &spec.topic, &script_text).await?;
            pb.finish_with_message(format!("Uploaded as {}", id));
            Some(id)
        } else {
            None
        };

        let elapsed_secs = started.elapsed().as_secs_f64();
        info!(
            "Run '{}' finished in {:.1}s: {} entries, {} cues, {}",
            spec.name,
            elapsed_secs,
            entries.len(),
            cue_count,
            video_path.display()
        );

        Ok(RunOutcome {
            job_dir,
            video_path,
            duration: narration.duration,
            entry_count: entries.len(),
            cue_count,
            uploaded_id,
            elapsed_secs,
        })
    }

    /// Run a spec several times, continuing past individual failures.
    ///
    /// Each run draws its own stage spinners; an aggregate bar tracks
    /// progress over the whole batch.
    pub async fn run_batch(&self, spec: &PipelineSpec, count: usize, upload: bool) -> Vec<Result<RunOutcome>> {
        let batch_bar = ProgressBar::new(count as u64);
        batch_bar.set_style(
            ProgressStyle::default_bar()
                .template("{bar:40.green/white} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        batch_bar.set_message(format!("Producing '{}'", spec.name));

        let mut outcomes = Vec::with_capacity(count);
        for i in 0..count {
            info!("Batch run {}/{} for '{}'", i + 1, count, spec.name);
            let outcome = self.run(spec, None, upload).await;
            if let Err(e) = &outcome {
                warn!("Batch run {}/{} failed: {}", i + 1, count, e);
            }
            outcomes.push(outcome);
            batch_bar.inc(1);
        }

        let succeeded = outcomes.iter().filter(|o| o.is_ok()).count();
        batch_bar.finish_with_message(format!("{}/{} runs succeeded", succeeded, count));
        outcomes
    }

    /// Let the model pick a topic and search query, then run the pipeline
    /// on what it came up with
    pub async fn run_generated(
        &self,
        category: Option<&str>,
        image_count: usize,
        clip_count: usize,
        style: SubtitleStyle,
        upload: bool,
    ) -> Result<RunOutcome> {
        let topic = self
            .content
            .generate_topic(category)
            .await
            .context("Topic generation failed")?;
        info!("Generated topic: {}", topic);

        let query = self
            .content
            .generate_search_query(&topic)
            .await
            .context("Search query generation failed")?;
        info!("Generated search query: {}", query);

        let spec = PipelineSpec::generated(&topic, &query, image_count, clip_count, style);
        self.run(&spec, None, upload).await
    }

    /// Probe every external collaborator and report per-service status
    pub async fn status(&self) -> Vec<(String, Result<String>)> {
        let mut report = Vec::new();

        for binary in ["ffmpeg", "ffprobe", "edge-tts"] {
            report.push((binary.to_string(), probe_binary(binary).await));
        }
        if self.config.providers.whisper.enabled {
            let binary = self.config.providers.whisper.binary.clone();
            let result = probe_binary(&binary).await;
            report.push((binary, result));
        }

        let pexels = crate::providers::pexels::Pexels::new(&self.config.providers.pexels);
        report.push((
            pexels.name().to_string(),
            pexels
                .test_connection()
                .await
                .map(|_| "reachable".to_string())
                .map_err(|e| anyhow!(e)),
        ));

        let ollama = crate::providers::ollama::Ollama::new(&self.config.providers.ollama);
        report.push((
            ollama.name().to_string(),
            ollama
                .version()
                .await
                .map(|v| format!("reachable (version {})", v)),
        ));

        if self.config.providers.youtube.enabled {
            let youtube = YouTube::new(&self.config.providers.youtube);
            report.push((
                youtube.name().to_string(),
                youtube
                    .test_connection()
                    .await
                    .map(|_| "authorized".to_string())
                    .map_err(|e| anyhow!(e)),
            ));
        }

        report
    }

    async fn upload(&self, video_path: &std::path::Path, topic: &str, script: &str) -> Result<String> {
        if !self.config.providers.youtube.enabled {
            return Err(anyhow!("YouTube upload requested but providers.youtube.enabled is false"));
        }

        let metadata = self.content.generate_metadata(topic, script).await?;
        let client = YouTube::new(&self.config.providers.youtube);
        let id = client.upload(video_path, &metadata).await?;
        Ok(id)
    }

    /// Job folders are named `<name>_<timestamp>` under the output directory
    fn create_job_dir(&self, name: &str) -> Result<PathBuf> {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let dir = self
            .config
            .directories
            .output_dir
            .join(format!("{}_{}", FileManager::sanitize_filename(name), stamp));
        FileManager::ensure_dir(&dir)?;
        Ok(dir)
    }
}

fn stage_bar(multi: &MultiProgress, message: &str) -> ProgressBar {
    let pb = multi.add(ProgressBar::new_spinner());
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    pb
}

async fn probe_binary(binary: &str) -> Result<String> {
    let output = tokio::process::Command::new(binary)
        .arg("--version")
        .output()
        .await
        .map_err(|e| anyhow!("not found ({})", e))?;

    if output.status.success() {
        let first_line = String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or("installed")
            .to_string();
        Ok(first_line)
    } else {
        Err(anyhow!("exited with {}", output.status))
    }
}
