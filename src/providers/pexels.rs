use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use log::{debug, error, warn};
use reqwest::Client;
use serde::Deserialize;
use tokio::io::AsyncWriteExt;

use crate::app_config::PexelsConfig;
use crate::errors::ProviderError;
use crate::providers::Provider;

/// Pexels client for stock photo and video search
#[derive(Debug)]
pub struct Pexels {
    /// API key sent in the Authorization header
    api_key: String,
    /// Photo search base URL
    endpoint: String,
    /// Video search base URL
    videos_endpoint: String,
    /// HTTP client for making requests
    client: Client,
    /// Upper bound on results requested per search
    per_page: usize,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// One photo result from the search API
#[derive(Debug, Clone, Deserialize)]
pub struct Photo {
    /// Pexels photo id
    pub id: u64,
    /// Download URLs at various sizes
    pub src: PhotoSrc,
    /// Photographer credit
    #[serde(default)]
    pub photographer: String,
}

/// Download URLs for one photo
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoSrc {
    /// Large variant, sized for full-frame display
    pub large: String,
    /// Original upload
    pub original: String,
}

#[derive(Debug, Deserialize)]
struct PhotoSearchResponse {
    #[serde(default)]
    photos: Vec<Photo>,
}

/// One video result from the search API
#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    /// Pexels video id
    pub id: u64,
    /// Intrinsic duration in whole seconds as reported by the API
    pub duration: f64,
    /// Available encodings of the clip
    pub video_files: Vec<VideoFile>,
}

/// One encoding of a video result
#[derive(Debug, Clone, Deserialize)]
pub struct VideoFile {
    /// Direct download URL
    pub link: String,
    /// Frame width in pixels
    #[serde(default)]
    pub width: u32,
    /// Frame height in pixels
    #[serde(default)]
    pub height: u32,
    /// Quality label ("hd", "sd", ...)
    #[serde(default)]
    pub quality: String,
}

#[derive(Debug, Deserialize)]
struct VideoSearchResponse {
    #[serde(default)]
    videos: Vec<Video>,
}

impl Video {
    /// Pick the best encoding for a target width: HD files no wider than the
    /// target first, then the widest available file as a fallback.
    pub fn best_file(&self, target_width: u32) -> Option<&VideoFile> {
        self.video_files
            .iter()
            .filter(|f| f.quality == "hd" && f.width <= target_width)
            .max_by_key(|f| f.width)
            .or_else(|| self.video_files.iter().max_by_key(|f| f.width))
    }
}

impl Pexels {
    /// Create a new Pexels client from configuration
    pub fn new(config: &PexelsConfig) -> Self {
        Self {
            api_key: config.resolve_api_key(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            videos_endpoint: config.videos_endpoint.trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            per_page: config.per_page,
            max_retries: config.retry_count,
            backoff_base_ms: config.retry_backoff_ms,
        }
    }

    /// Clamp a requested result count to the configured page size
    pub fn page_size(&self, requested: usize) -> usize {
        requested.clamp(1, self.per_page)
    }

    /// Search for photos matching a query
    pub async fn search_photos(&self, query: &str, count: usize) -> Result<Vec<Photo>, ProviderError> {
        let url = format!("{}/search", self.endpoint);
        let body = self
            .get_with_retry(
                &url,
                &[
                    ("query", query),
                    ("per_page", &self.page_size(count).to_string()),
                    ("orientation", "landscape"),
                ],
            )
            .await?;

        let parsed: PhotoSearchResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::ParseError(format!("Invalid photo search response: {}", e)))?;

        debug!("Pexels photo search '{}' returned {} results", query, parsed.photos.len());
        Ok(parsed.photos)
    }

    /// Search for video clips matching a query
    pub async fn search_videos(&self, query: &str, count: usize) -> Result<Vec<Video>, ProviderError> {
        let url = format!("{}/search", self.videos_endpoint);
        let body = self
            .get_with_retry(&url, &[("query", query), ("per_page", &self.page_size(count).to_string())])
            .await?;

        let parsed: VideoSearchResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::ParseError(format!("Invalid video search response: {}", e)))?;

        debug!("Pexels video search '{}' returned {} results", query, parsed.videos.len());
        Ok(parsed.videos)
    }

    /// Download a media URL to a local file, streaming the body to disk
    pub async fn download(&self, url: &str, dest: &Path) -> Result<(), ProviderError> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ProviderError::RequestFailed(format!("Failed to create {}: {}", parent.display(), e)))?;
        }

        let response = self
            .client
            .get(url)
            .header("Authorization", &self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Download request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: format!("Download of {} failed", url),
            });
        }

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to create {}: {}", dest.display(), e)))?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| ProviderError::ConnectionError(format!("Download stream interrupted: {}", e)))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| ProviderError::RequestFailed(format!("Failed to write {}: {}", dest.display(), e)))?;
        }

        file.flush()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to flush {}: {}", dest.display(), e)))?;

        Ok(())
    }

    /// GET with auth header and exponential backoff on server errors
    async fn get_with_retry(&self, url: &str, query: &[(&str, &str)]) -> Result<String, ProviderError> {
        let mut attempt = 0;
        let mut last_error: Option<ProviderError> = None;

        while attempt <= self.max_retries {
            let response_result = self
                .client
                .get(url)
                .header("Authorization", &self.api_key)
                .query(query)
                .send()
                .await;

            match response_result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response
                            .text()
                            .await
                            .map_err(|e| ProviderError::ParseError(format!("Failed to read response body: {}", e)));
                    }

                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to get error response text".to_string());

                    match status.as_u16() {
                        401 | 403 => {
                            return Err(ProviderError::AuthenticationError(format!(
                                "Pexels rejected the API key: {}",
                                error_text
                            )));
                        }
                        429 => {
                            warn!("Pexels rate limit hit, attempt {}/{}", attempt + 1, self.max_retries + 1);
                            last_error = Some(ProviderError::RateLimitExceeded(error_text));
                        }
                        s if status.is_server_error() => {
                            error!("Pexels API error ({}): {} - attempt {}/{}", s, error_text, attempt + 1, self.max_retries + 1);
                            last_error = Some(ProviderError::ApiError {
                                status_code: s,
                                message: error_text,
                            });
                        }
                        s => {
                            return Err(ProviderError::ApiError {
                                status_code: s,
                                message: error_text,
                            });
                        }
                    }
                }
                Err(e) => {
                    error!("Pexels network error: {} - attempt {}/{}", e, attempt + 1, self.max_retries + 1);
                    last_error = Some(ProviderError::ConnectionError(e.to_string()));
                }
            }

            attempt += 1;
            if attempt <= self.max_retries {
                let backoff_ms = self.backoff_base_ms * (1u64 << (attempt - 1));
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::RequestFailed(format!("Pexels request failed after {} attempts", self.max_retries + 1))
        }))
    }
}

#[async_trait]
impl Provider for Pexels {
    fn name(&self) -> &'static str {
        "Pexels"
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let url = format!("{}/search", self.endpoint);
        self.get_with_retry(&url, &[("query", "nature"), ("per_page", "1")])
            .await
            .map(|_| ())
    }
}
