use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::format::relative::DateLocale;

/// Pause after the last asset settles before progress is forced to 100.
pub const SETTLE_DELAY_MS: u64 = 300;

/// Pause between the forced 100% report and the completion signal.
pub const FINISH_DELAY_MS: u64 = 200;

/// Bytes requested from a video asset for a metadata-level load (256 KB).
pub const VIDEO_PROBE_BYTES: u64 = 256 * 1024;

/// File extensions loaded as video (metadata only). Everything else is an image.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg"];

/// Media warmed before the invitation reveals its first section.
pub const DEFAULT_ASSETS: &[&str] = &[
    "/media/vid1.mp4",
    "/media/vid2.mp4",
    "/media/vid1.png",
    "/media/pemeran2.png",
    "/media/prewed.png",
];

/// Host serving the comments and reservations endpoints.
pub const DEFAULT_API_BASE_URL: &str = "https://api.mohaproject.dev";

/// Start of the ceremony the countdown runs to.
pub const DEFAULT_EVENT_START: &str = "2026-03-30T07:00:00+07:00";

/// Preload sequencer tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PreloaderConfig {
    pub settle_delay_ms: u64,
    pub finish_delay_ms: u64,
    /// Upper bound for a single asset load. `None` waits indefinitely.
    pub asset_timeout_ms: Option<u64>,
    /// Loads in flight at once; 1 probes assets strictly in list order.
    pub max_concurrency: u32,
    pub video_probe_bytes: u64,
}

impl PreloaderConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn finish_delay(&self) -> Duration {
        Duration::from_millis(self.finish_delay_ms)
    }

    pub fn asset_timeout(&self) -> Option<Duration> {
        self.asset_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for PreloaderConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: SETTLE_DELAY_MS,
            finish_delay_ms: FINISH_DELAY_MS,
            asset_timeout_ms: None,
            max_concurrency: 1,
            video_probe_bytes: VIDEO_PROBE_BYTES,
        }
    }
}

/// Where the comments/RSVP API lives.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// Top-level configuration for the invitation engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InviteConfig {
    pub preloader: PreloaderConfig,
    pub api: ApiConfig,
    /// Origin that site-relative asset paths are resolved against.
    pub asset_base_url: String,
    pub assets: Vec<String>,
    pub event_start: String,
    pub date_locale: DateLocale,
}

impl InviteConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("invalid invite config")
    }
}

impl Default for InviteConfig {
    fn default() -> Self {
        Self {
            preloader: PreloaderConfig::default(),
            api: ApiConfig::default(),
            asset_base_url: "http://127.0.0.1:3000".to_string(),
            assets: DEFAULT_ASSETS.iter().map(|s| s.to_string()).collect(),
            event_start: DEFAULT_EVENT_START.to_string(),
            date_locale: DateLocale::default(),
        }
    }
}
