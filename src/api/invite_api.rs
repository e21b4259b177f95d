use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::config::InviteConfig;
use crate::detect::asset::descriptors;
use crate::engine::preloader::{PreloadHandle, Preloader};
use crate::engine::sink::ProgressSink;
use crate::format::countdown::Countdown;
use crate::format::guest::guest_display_name;
use crate::format::relative::{format_relative_str_in, parse_timestamp};
use crate::remote::client::InvitationClient;
use crate::remote::error::ApiError;
use crate::remote::types::{Comment, CommentForm, CommentReceipt, RsvpForm, RsvpReceipt};
use crate::source::http_probe::HttpProbe;
use crate::source::traits::AssetProbe;

/// Everything the invitation page needs from the engine, behind one handle.
pub struct InviteEngine {
    config: InviteConfig,
    preloader: Preloader,
    client: InvitationClient,
}

impl InviteEngine {
    /// Build an engine that warms assets over HTTP.
    pub fn new(config: InviteConfig) -> Result<Self> {
        let probe = HttpProbe::new(&config.asset_base_url, config.preloader.video_probe_bytes)?;
        Self::with_probe(config, Arc::new(probe))
    }

    pub fn with_probe(config: InviteConfig, probe: Arc<dyn AssetProbe>) -> Result<Self> {
        let preloader = Preloader::new(probe, config.preloader.clone());
        let client = InvitationClient::new(&config.api)?;
        Ok(Self {
            config,
            preloader,
            client,
        })
    }

    pub fn config(&self) -> &InviteConfig {
        &self.config
    }

    pub fn preloader(&self) -> &Preloader {
        &self.preloader
    }

    /// Start warming the configured asset list.
    pub fn start_preload(&self, sink: Arc<dyn ProgressSink>) -> Result<PreloadHandle> {
        self.preloader
            .start(descriptors(self.config.assets.iter().cloned()), sink)
    }

    pub async fn comments(&self) -> Vec<Comment> {
        self.client.list_comments().await
    }

    pub async fn submit_comment(&self, form: &CommentForm) -> Result<CommentReceipt, ApiError> {
        self.client.submit_comment(form).await
    }

    pub async fn submit_rsvp(&self, form: &RsvpForm) -> Result<RsvpReceipt, ApiError> {
        self.client.submit_rsvp(form).await
    }

    pub fn comment_time_label(&self, comment: &Comment, now: DateTime<Utc>) -> String {
        format_relative_str_in(&comment.created_at, now, self.config.date_locale)
    }

    pub fn countdown(&self, now: DateTime<Utc>) -> Result<Countdown> {
        let target = parse_timestamp(&self.config.event_start)?;
        Ok(Countdown::until(target, now))
    }
}

/// Display name for the guest segment of an invitation link.
pub fn guest_name(segment: &str) -> String {
    guest_display_name(segment)
}
