use anyhow::{anyhow, Result};

use crate::app_config::SubtitleStyle;
use crate::file_utils::FileManager;

// @module: Named pipeline presets

/// Everything a single pipeline run needs to know about what to produce
#[derive(Debug, Clone)]
pub struct PipelineSpec {
    /// Short identifier, also used for job folder names
    pub name: String,

    /// Human-readable description shown in listings
    pub description: String,

    /// Topic the script is written about
    pub topic: String,

    /// Search query used against the stock media provider
    pub search_query: String,

    /// Fixed narration text, used before any AI generation
    pub script: Option<String>,

    /// Narration voice, falls back to the configured default when absent
    pub voice: Option<String>,

    /// How many still images to fetch
    pub image_count: usize,

    /// How many video clips to fetch
    pub clip_count: usize,

    /// Subtitle style for the burn-in pass
    pub style: SubtitleStyle,

    /// Whether a missing script is AI-generated or an error
    pub generate_script: bool,
}

impl PipelineSpec {
    /// Spec for a run whose topic and query came out of the model
    pub fn generated(
        topic: &str,
        search_query: &str,
        image_count: usize,
        clip_count: usize,
        style: SubtitleStyle,
    ) -> Self {
        PipelineSpec {
            name: FileManager::sanitize_filename(topic),
            description: format!("AI-generated video about {}", topic),
            topic: topic.to_string(),
            search_query: search_query.to_string(),
            script: None,
            voice: None,
            image_count,
            clip_count,
            style,
            generate_script: true,
        }
    }
}

/// Built-in pipeline presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    NatureDocumentary,
    OceanExploration,
    TechInnovation,
    AiFuture,
    BusinessSuccess,
    TravelAdventure,
    QuickDemo,
}

impl Preset {
    /// All presets in listing order
    pub fn all() -> &'static [Preset] {
        &[
            Preset::NatureDocumentary,
            Preset::OceanExploration,
            Preset::TechInnovation,
            Preset::AiFuture,
            Preset::BusinessSuccess,
            Preset::TravelAdventure,
            Preset::QuickDemo,
        ]
    }

    /// Canonical preset identifier
    pub fn id(&self) -> &'static str {
        match self {
            Preset::NatureDocumentary => "nature-documentary",
            Preset::OceanExploration => "ocean-exploration",
            Preset::TechInnovation => "tech-innovation",
            Preset::AiFuture => "ai-future",
            Preset::BusinessSuccess => "business-success",
            Preset::TravelAdventure => "travel-adventure",
            Preset::QuickDemo => "quick-demo",
        }
    }

    /// Expand the preset into a full pipeline spec.
    ///
    /// Presets carry a fixed narration text and voice so a preset run works
    /// without any AI service configured.
    pub fn spec(&self) -> PipelineSpec {
        match self {
            Preset::NatureDocumentary => PipelineSpec {
                name: self.id().to_string(),
                description: "Calm nature documentary with forest and wildlife footage".to_string(),
                topic: "the hidden life of forests".to_string(),
                search_query: "forest wildlife nature".to_string(),
                script: Some(
                    "Welcome to our journey through the natural world, where beauty \
                     and wonder await at every turn."
                        .to_string(),
                ),
                voice: Some("en-US-AriaNeural".to_string()),
                image_count: 3,
                clip_count: 3,
                style: SubtitleStyle::Cinematic,
                generate_script: false,
            },
            Preset::OceanExploration => PipelineSpec {
                name: self.id().to_string(),
                description: "Deep sea exploration with underwater footage".to_string(),
                topic: "mysteries of the deep ocean".to_string(),
                search_query: "ocean underwater sea life".to_string(),
                script: Some(
                    "Dive into the depths of our oceans and discover the incredible \
                     marine life that calls these waters home."
                        .to_string(),
                ),
                voice: Some("en-US-BrianNeural".to_string()),
                image_count: 3,
                clip_count: 3,
                style: SubtitleStyle::Cinematic,
                generate_script: false,
            },
            Preset::TechInnovation => PipelineSpec {
                name: self.id().to_string(),
                description: "Technology showcase with modern device footage".to_string(),
                topic: "how technology reshapes daily life".to_string(),
                search_query: "technology innovation computer".to_string(),
                script: Some(
                    "Technology is revolutionizing our world, bringing innovation \
                     and progress to every aspect of our lives."
                        .to_string(),
                ),
                voice: Some("en-US-JennyNeural".to_string()),
                image_count: 4,
                clip_count: 2,
                style: SubtitleStyle::Modern,
                generate_script: false,
            },
            Preset::AiFuture => PipelineSpec {
                name: self.id().to_string(),
                description: "Artificial intelligence and its future impact".to_string(),
                topic: "the future of artificial intelligence".to_string(),
                search_query: "artificial intelligence robot futuristic".to_string(),
                script: Some(
                    "Artificial intelligence is shaping our future, creating \
                     possibilities we never imagined before."
                        .to_string(),
                ),
                voice: Some("en-US-GuyNeural".to_string()),
                image_count: 4,
                clip_count: 2,
                style: SubtitleStyle::Modern,
                generate_script: false,
            },
            Preset::BusinessSuccess => PipelineSpec {
                name: self.id().to_string(),
                description: "Motivational business content with office footage".to_string(),
                topic: "habits of successful entrepreneurs".to_string(),
                search_query: "business office success meeting".to_string(),
                script: Some(
                    "Success in business comes from dedication, innovation, and the \
                     courage to pursue your dreams."
                        .to_string(),
                ),
                voice: Some("en-US-AvaNeural".to_string()),
                image_count: 4,
                clip_count: 2,
                style: SubtitleStyle::Professional,
                generate_script: false,
            },
            Preset::TravelAdventure => PipelineSpec {
                name: self.id().to_string(),
                description: "Travel inspiration with landscape footage".to_string(),
                topic: "breathtaking places to visit before you die".to_string(),
                search_query: "travel landscape adventure mountains".to_string(),
                script: Some(
                    "Adventure awaits around every corner, from bustling cities to \
                     serene natural landscapes."
                        .to_string(),
                ),
                voice: Some("en-US-EmmaNeural".to_string()),
                image_count: 3,
                clip_count: 3,
                style: SubtitleStyle::Cinematic,
                generate_script: false,
            },
            Preset::QuickDemo => PipelineSpec {
                name: self.id().to_string(),
                description: "Small fast run for trying out the pipeline".to_string(),
                topic: "a quick look at video generation".to_string(),
                search_query: "technology demo".to_string(),
                script: Some(
                    "This is a quick demonstration of our AI-powered video \
                     generation system."
                        .to_string(),
                ),
                voice: Some("en-US-AriaNeural".to_string()),
                image_count: 2,
                clip_count: 1,
                style: SubtitleStyle::Professional,
                generate_script: false,
            },
        }
    }
}

impl std::str::FromStr for Preset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Preset::all()
            .iter()
            .find(|p| p.id() == s.to_lowercase())
            .copied()
            .ok_or_else(|| {
                anyhow!(
                    "Unknown preset: {} (available: {})",
                    s,
                    Preset::all().iter().map(|p| p.id()).collect::<Vec<_>>().join(", ")
                )
            })
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}
