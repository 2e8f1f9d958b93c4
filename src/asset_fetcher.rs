use std::path::PathBuf;

use anyhow::{anyhow, Result};
use log::{info, warn};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::providers::pexels::Pexels;
use crate::timeline::AssetRef;

// @module: Stock asset search and download

/// Fetches and caches the visual assets for one pipeline run
pub struct AssetFetcher {
    client: Pexels,
    images_dir: PathBuf,
    clips_dir: PathBuf,
    target_width: u32,
}

impl AssetFetcher {
    /// Create a fetcher from application configuration
    pub fn new(config: &Config) -> Self {
        Self {
            client: Pexels::new(&config.providers.pexels),
            images_dir: config.directories.images_dir(),
            clips_dir: config.directories.clips_dir(),
            target_width: config.render.width,
        }
    }

    /// Fetch images and clips for a search query and return them in display
    /// order.
    ///
    /// Clips and images are interleaved, starting with a clip when one is
    /// available, so long stretches of still images are broken up. Already
    /// downloaded files are reused by id. A search that returns fewer
    /// results than requested is fine as long as at least one asset comes
    /// back; a run with zero assets is an error here so the caller never
    /// reaches timeline construction empty-handed.
    pub async fn fetch(&self, query: &str, image_count: usize, clip_count: usize) -> Result<Vec<AssetRef>> {
        let mut images = Vec::new();
        if image_count > 0 {
            images = self.fetch_images(query, image_count).await?;
        }

        let mut clips = Vec::new();
        if clip_count > 0 {
            clips = self.fetch_clips(query, clip_count).await?;
        }

        if images.is_empty() && clips.is_empty() {
            return Err(anyhow!("No assets could be fetched for query '{}'", query));
        }

        let assets = Self::interleave(clips, images);
        info!("Fetched {} assets for '{}'", assets.len(), query);
        Ok(assets)
    }

    async fn fetch_images(&self, query: &str, count: usize) -> Result<Vec<AssetRef>> {
        let photos = self.client.search_photos(query, count).await?;
        if photos.len() < count {
            warn!("Requested {} images for '{}' but Pexels returned {}", count, query, photos.len());
        }

        let mut assets = Vec::with_capacity(photos.len());
        for photo in photos {
            let dest = self.images_dir.join(format!("pexels_{}.jpg", photo.id));
            if !FileManager::file_exists(&dest) {
                self.client.download(&photo.src.large, &dest).await?;
            }
            assets.push(AssetRef::image(dest));
        }

        Ok(assets)
    }

    async fn fetch_clips(&self, query: &str, count: usize) -> Result<Vec<AssetRef>> {
        let videos = self.client.search_videos(query, count).await?;
        if videos.len() < count {
            warn!("Requested {} clips for '{}' but Pexels returned {}", count, query, videos.len());
        }

        let mut assets = Vec::with_capacity(videos.len());
        for video in videos {
            let Some(file) = video.best_file(self.target_width) else {
                warn!("Pexels video {} carried no downloadable encodings, skipping", video.id);
                continue;
            };

            let dest = self.clips_dir.join(format!("pexels_{}.mp4", video.id));
            if !FileManager::file_exists(&dest) {
                self.client.download(&file.link, &dest).await?;
            }
            assets.push(AssetRef::clip(dest, video.duration));
        }

        Ok(assets)
    }

    /// Alternate clips and images, appending whichever list runs longer
    fn interleave(clips: Vec<AssetRef>, images: Vec<AssetRef>) -> Vec<AssetRef> {
        let mut out = Vec::with_capacity(clips.len() + images.len());
        let mut clips = clips.into_iter();
        let mut images = images.into_iter();

        loop {
            match (clips.next(), images.next()) {
                (Some(c), Some(i)) => {
                    out.push(c);
                    out.push(i);
                }
                (Some(c), None) => {
                    out.push(c);
                    out.extend(clips.by_ref());
                    break;
                }
                (None, Some(i)) => {
                    out.push(i);
                    out.extend(images.by_ref());
                    break;
                }
                (None, None) => break,
            }
        }

        out
    }
}
