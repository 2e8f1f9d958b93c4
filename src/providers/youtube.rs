use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::Serialize;

use crate::app_config::YouTubeConfig;
use crate::errors::ProviderError;
use crate::providers::Provider;

const CHANNELS_URL: &str = "https://www.googleapis.com/youtube/v3/channels";

/// YouTube client for resumable video uploads
#[derive(Debug)]
pub struct YouTube {
    /// OAuth bearer token with the youtube.upload scope
    access_token: String,
    /// Resumable upload endpoint
    endpoint: String,
    /// Privacy status applied to uploads
    privacy_status: String,
    /// HTTP client for making requests
    client: Client,
}

/// Metadata attached to an uploaded video
#[derive(Debug, Clone)]
pub struct VideoMetadata {
    /// Video title
    pub title: String,
    /// Video description
    pub description: String,
    /// Search tags
    pub tags: Vec<String>,
}

#[derive(Serialize)]
struct UploadBody<'a> {
    snippet: Snippet<'a>,
    status: Status<'a>,
}

#[derive(Serialize)]
struct Snippet<'a> {
    title: &'a str,
    description: &'a str,
    tags: &'a [String],
    #[serde(rename = "categoryId")]
    category_id: &'a str,
}

#[derive(Serialize)]
struct Status<'a> {
    #[serde(rename = "privacyStatus")]
    privacy_status: &'a str,
}

impl YouTube {
    /// Create a new YouTube client from configuration
    pub fn new(config: &YouTubeConfig) -> Self {
        Self {
            access_token: config.access_token.clone(),
            endpoint: config.endpoint.clone(),
            privacy_status: config.privacy_status.clone(),
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Upload a video file and return the new video id.
    ///
    /// Uses the two-step resumable protocol: an initiation request carrying
    /// the metadata returns a session URL in the Location header, then the
    /// file bytes are sent to that URL in a single PUT.
    pub async fn upload(&self, video_path: &Path, metadata: &VideoMetadata) -> Result<String, ProviderError> {
        let session_url = self.initiate_session(metadata).await?;
        debug!("YouTube resumable session opened for {}", video_path.display());

        let bytes = tokio::fs::read(video_path).await.map_err(|e| {
            ProviderError::RequestFailed(format!("Failed to read {}: {}", video_path.display(), e))
        })?;

        let response = self
            .client
            .put(&session_url)
            .bearer_auth(&self.access_token)
            .header("Content-Type", "video/mp4")
            .body(bytes)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Upload transfer failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to read upload response: {}", e)))?;

        if !status.is_success() {
            return Err(Self::api_error(status.as_u16(), body));
        }

        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| ProviderError::ParseError(format!("Invalid upload response JSON: {}", e)))?;
        let video_id = value
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ProviderError::ParseError("Upload response carried no video id".to_string()))?
            .to_string();

        info!("Uploaded video {} as YouTube id {}", video_path.display(), video_id);
        Ok(video_id)
    }

    /// Open a resumable upload session and return its session URL
    async fn initiate_session(&self, metadata: &VideoMetadata) -> Result<String, ProviderError> {
        let body = UploadBody {
            snippet: Snippet {
                title: &metadata.title,
                description: &metadata.description,
                tags: &metadata.tags,
                // "People & Blogs"
                category_id: "22",
            },
            status: Status {
                privacy_status: &self.privacy_status,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .query(&[("uploadType", "resumable"), ("part", "snippet,status")])
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Upload initiation failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(Self::api_error(status.as_u16(), text));
        }

        response
            .headers()
            .get("Location")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                ProviderError::ParseError("Upload initiation response carried no Location header".to_string())
            })
    }

    fn api_error(status_code: u16, message: String) -> ProviderError {
        match status_code {
            401 | 403 => ProviderError::AuthenticationError(message),
            429 => ProviderError::RateLimitExceeded(message),
            _ => ProviderError::ApiError { status_code, message },
        }
    }
}

#[async_trait]
impl Provider for YouTube {
    fn name(&self) -> &'static str {
        "YouTube"
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        if self.access_token.is_empty() {
            return Err(ProviderError::AuthenticationError(
                "No YouTube access token is configured".to_string(),
            ));
        }

        let response = self
            .client
            .get(CHANNELS_URL)
            .bearer_auth(&self.access_token)
            .query(&[("part", "id"), ("mine", "true")])
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            Err(Self::api_error(status.as_u16(), text))
        }
    }
}
