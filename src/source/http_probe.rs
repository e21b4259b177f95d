use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::BytesMut;
use reqwest::{Client, Url};
use tracing::{debug, warn};

use super::traits::{AssetProbe, ProbeOutcome};
use crate::detect::asset::{AssetDescriptor, AssetKind};
use crate::detect::container::{
    detect_container, detect_image, find_moov_box, ContainerFormat, ImageFormat,
};

/// Warms assets over HTTP: images are fetched in full, videos only up to
/// their container header.
pub struct HttpProbe {
    client: Client,
    base_url: Url,
    video_probe_bytes: u64,
}

impl HttpProbe {
    pub fn new(base_url: &str, video_probe_bytes: u64) -> Result<Self> {
        Self::with_client(Client::new(), base_url, video_probe_bytes)
    }

    pub fn with_client(client: Client, base_url: &str, video_probe_bytes: u64) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| anyhow!("invalid asset base url: {}", e))?;
        Ok(Self {
            client,
            base_url,
            video_probe_bytes: video_probe_bytes.max(1),
        })
    }

    /// Resolve an absolute or site-relative asset URL against the base.
    pub fn resolve(&self, url: &str) -> Result<Url> {
        self.base_url
            .join(url)
            .map_err(|e| anyhow!("invalid asset url {}: {}", url, e))
    }

    async fn load_image(&self, url: Url) -> Result<ImageFormat> {
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("image load failed: HTTP {}", status.as_u16()));
        }

        let body = resp.bytes().await?;
        if body.is_empty() {
            return Err(anyhow!("image load failed: empty body"));
        }
        Ok(detect_image(&body))
    }

    async fn load_video_metadata(&self, url: Url) -> Result<ContainerFormat> {
        let range = format!("bytes=0-{}", self.video_probe_bytes - 1);
        let mut resp = self.client.get(url).header("Range", &range).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("video metadata load failed: HTTP {}", status.as_u16()));
        }

        // Servers that ignore Range send the whole file; stop at the limit.
        let limit = self.video_probe_bytes as usize;
        let mut head = BytesMut::with_capacity(limit.min(64 * 1024));
        while head.len() < limit {
            match resp.chunk().await? {
                Some(chunk) => {
                    let take = (limit - head.len()).min(chunk.len());
                    head.extend_from_slice(&chunk[..take]);
                }
                None => break,
            }
        }

        let format = detect_container(&head);
        match format {
            ContainerFormat::Unknown => Err(anyhow!("unrecognized video container")),
            ContainerFormat::Mp4 => {
                debug!(
                    "mp4 head probed bytes={} moov_in_head={}",
                    head.len(),
                    find_moov_box(&head).is_some()
                );
                Ok(format)
            }
            _ => Ok(format),
        }
    }
}

#[async_trait]
impl AssetProbe for HttpProbe {
    async fn probe(&self, asset: &AssetDescriptor) -> ProbeOutcome {
        let url = match self.resolve(&asset.url) {
            Ok(url) => url,
            Err(e) => {
                warn!("asset {} skipped: {}", asset.url, e);
                return ProbeOutcome::Failed(e.to_string());
            }
        };

        let result = match asset.kind {
            AssetKind::Image => self
                .load_image(url)
                .await
                .map(|format| debug!("image {} ready format={:?}", asset.url, format)),
            AssetKind::Video => self
                .load_video_metadata(url)
                .await
                .map(|format| debug!("video {} metadata ready format={:?}", asset.url, format)),
        };

        match result {
            Ok(()) => ProbeOutcome::Ready,
            Err(e) => {
                warn!("asset {} load failed: {}", asset.url, e);
                ProbeOutcome::Failed(e.to_string())
            }
        }
    }
}
