use anyhow::{anyhow, Result};
use log::{debug, warn};
use rand::seq::IndexedRandom;
use serde::Deserialize;

use crate::app_config::OllamaConfig;
use crate::providers::ollama::{GenerationRequest, Ollama};
use crate::providers::youtube::VideoMetadata;

// @module: AI script and metadata generation

const SCRIPT_SYSTEM_PROMPT: &str = "You are a narration writer for short videos. \
Write flowing spoken prose with no stage directions, no headings, no lists and \
no quotation marks. Every sentence ends with terminal punctuation.";

/// Categories the model draws from when no topic category is given
const TOPIC_CATEGORIES: &[&str] = &[
    "technology",
    "nature",
    "science",
    "history",
    "space",
    "health",
    "travel",
    "food",
];

/// Generates scripts, search queries and upload metadata through Ollama
pub struct ContentGenerator {
    client: Ollama,
    model: String,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct MetadataResponse {
    title: String,
    description: String,
    #[serde(default)]
    tags: Vec<String>,
}

impl ContentGenerator {
    /// Create a generator from Ollama configuration
    pub fn new(config: &OllamaConfig) -> Self {
        Self {
            client: Ollama::new(config),
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }

    /// Write a narration script about a topic, roughly `sentence_count`
    /// sentences long
    pub async fn generate_script(&self, topic: &str, sentence_count: usize) -> Result<String> {
        let prompt = format!(
            "Write a narration script about {} in about {} sentences. \
             Respond with the script text only.",
            topic, sentence_count
        );

        let request = GenerationRequest::new(&self.model, prompt)
            .system(SCRIPT_SYSTEM_PROMPT)
            .temperature(self.temperature);

        let response = self.client.generate(request).await?;
        let script = Self::strip_wrapping(&response.response);
        debug!("Generated {} chars of script for topic '{}'", script.len(), topic);
        Ok(script)
    }

    /// Come up with a video topic in the given category, or a random
    /// built-in category when none is given
    pub async fn generate_topic(&self, category: Option<&str>) -> Result<String> {
        let category = category
            .map(|c| c.to_string())
            .unwrap_or_else(|| {
                let mut rng = rand::rng();
                TOPIC_CATEGORIES
                    .choose(&mut rng)
                    .copied()
                    .unwrap_or("technology")
                    .to_string()
            });

        let prompt = format!(
            "Suggest an engaging, educational video topic about {} that fits a \
             one to three minute video. Respond with the topic title only.",
            category
        );

        let request = GenerationRequest::new(&self.model, prompt).temperature(self.temperature);
        let response = self.client.generate(request).await?;

        Self::clean_topic(&response.response)
            .ok_or_else(|| anyhow!("Model returned an unusable topic: '{}'", response.response.trim()))
    }

    /// Condense a topic into a 2-4 word stock footage search query
    pub async fn generate_search_query(&self, topic: &str) -> Result<String> {
        let prompt = format!(
            "Give a 2 to 4 word stock footage search query for a video about {}. \
             Respond with the query only, no punctuation.",
            topic
        );

        let request = GenerationRequest::new(&self.model, prompt).temperature(0.3);
        let response = self.client.generate(request).await?;

        let query: String = Self::strip_wrapping(&response.response)
            .split_whitespace()
            .take(4)
            .collect::<Vec<_>>()
            .join(" ");
        Ok(query)
    }

    /// Produce upload metadata for a finished video.
    ///
    /// Asks the model for JSON; when the model returns something that does
    /// not parse, falls back to metadata derived from the topic so an upload
    /// never fails over a malformed model reply.
    pub async fn generate_metadata(&self, topic: &str, script: &str) -> Result<VideoMetadata> {
        let prompt = format!(
            "Write YouTube metadata for a video about {}. The narration is:\n{}\n\
             Respond as JSON with keys title, description and tags (an array of up to 10 strings).",
            topic, script
        );

        let request = GenerationRequest::new(&self.model, prompt)
            .temperature(self.temperature)
            .format_json();

        let response = self.client.generate(request).await?;

        match serde_json::from_str::<MetadataResponse>(response.response.trim()) {
            Ok(parsed) => Ok(VideoMetadata {
                title: parsed.title,
                description: parsed.description,
                tags: parsed.tags,
            }),
            Err(e) => {
                warn!("Model returned unparseable metadata ({}), using topic-derived defaults", e);
                Ok(Self::fallback_metadata(topic, script))
            }
        }
    }

    fn fallback_metadata(topic: &str, script: &str) -> VideoMetadata {
        let description: String = script.chars().take(400).collect();
        VideoMetadata {
            title: topic.to_string(),
            description,
            tags: topic
                .split_whitespace()
                .filter(|w| w.len() > 3)
                .take(10)
                .map(|w| w.to_lowercase())
                .collect(),
        }
    }

    /// Unwrap a model-suggested topic and reject replies too short to be a
    /// usable title
    pub fn clean_topic(raw: &str) -> Option<String> {
        let topic = Self::strip_wrapping(raw);
        let topic = topic.lines().next().unwrap_or("").trim().to_string();
        if topic.chars().count() < 10 {
            None
        } else {
            Some(topic)
        }
    }

    /// Strip the quotes and markdown fences models like to wrap output in
    fn strip_wrapping(text: &str) -> String {
        let trimmed = text.trim();
        let trimmed = trimmed
            .strip_prefix("```")
            .and_then(|s| s.strip_suffix("```"))
            .unwrap_or(trimmed);
        trimmed.trim().trim_matches('"').trim().to_string()
    }
}
