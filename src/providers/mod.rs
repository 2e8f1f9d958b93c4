/*!
 * Provider implementations for external services.
 *
 * This module contains client implementations for the services the pipeline
 * talks to over HTTP:
 * - Pexels: stock image and video clip search and download
 * - Ollama: local LLM server used for script and metadata generation
 * - YouTube: resumable video upload
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for remote service clients
///
/// All provider clients expose a connectivity probe so a pipeline run can
/// fail fast before any assets are fetched or rendered.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Human-readable provider name for logs and status output
    fn name(&self) -> &'static str;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the service is reachable and credentials work
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

pub mod pexels;
pub mod ollama;
pub mod youtube;
