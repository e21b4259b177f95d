use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use reqwest::header::CACHE_CONTROL;
use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::envelope::flatten_error;
use super::error::ApiError;
use super::types::{
    Comment, CommentAck, CommentForm, CommentList, CommentReceipt, RsvpAck, RsvpForm, RsvpReceipt,
};
use crate::config::ApiConfig;

const COMMENTS_PATH: &str = "/api/comments";
const RESERVATIONS_PATH: &str = "/api/reservations";

/// Consumer of the invitation's comments and reservations endpoints.
pub struct InvitationClient {
    client: Client,
    comments_url: Url,
    reservations_url: Url,
}

impl InvitationClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Self::with_client(client, &config.base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|e| anyhow!("invalid api base url: {}", e))?;
        Ok(Self {
            client,
            comments_url: base.join(COMMENTS_PATH)?,
            reservations_url: base.join(RESERVATIONS_PATH)?,
        })
    }

    /// Fetch all guest comments. Any failure yields an empty list.
    pub async fn list_comments(&self) -> Vec<Comment> {
        match self.fetch_comments().await {
            Ok(comments) => {
                debug!("fetched {} comments", comments.len());
                comments
            }
            Err(e) => {
                warn!("failed to fetch comments: {}", e);
                Vec::new()
            }
        }
    }

    async fn fetch_comments(&self) -> Result<Vec<Comment>> {
        let resp = self
            .client
            .get(self.comments_url.clone())
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            bail!("list comments failed: HTTP {}", status.as_u16());
        }

        let list: CommentList = resp.json().await?;
        Ok(list.data.unwrap_or_default())
    }

    pub async fn submit_comment(&self, form: &CommentForm) -> Result<CommentReceipt, ApiError> {
        if form.name.trim().is_empty() || form.message.trim().is_empty() {
            return Err(ApiError::Validation(
                "Name and message must not be empty".to_string(),
            ));
        }

        let body = self
            .post_json(&self.comments_url, form, "Failed to submit comment")
            .await?;
        let ack: CommentAck = serde_json::from_value(body).unwrap_or_default();

        info!("comment submitted by {}", form.name.trim());
        Ok(CommentReceipt {
            message: ack
                .message
                .unwrap_or_else(|| "Comment submitted successfully".to_string()),
            comment: ack.comment,
        })
    }

    pub async fn submit_rsvp(&self, form: &RsvpForm) -> Result<RsvpReceipt, ApiError> {
        if form.name.trim().is_empty() || form.email.trim().is_empty() {
            return Err(ApiError::Validation(
                "Name and email must not be empty".to_string(),
            ));
        }

        let body = self
            .post_json(&self.reservations_url, form, "Failed to submit rsvp")
            .await?;
        let ack: RsvpAck = serde_json::from_value(body).unwrap_or_default();
        let code = ack.data.and_then(|d| d.code);

        info!(
            "rsvp submitted present={} guests={} code={:?}",
            form.is_present, form.total_guests, code
        );
        Ok(RsvpReceipt {
            message: ack
                .message
                .unwrap_or_else(|| "RSVP sent. Thank you!".to_string()),
            code,
        })
    }

    /// POST `body` as JSON. Non-2xx responses become `ApiError::Rejected`
    /// carrying the flattened server message, or `fallback` if there is none.
    async fn post_json<B: Serialize>(
        &self,
        url: &Url,
        body: &B,
        fallback: &str,
    ) -> Result<Value, ApiError> {
        let resp = self.client.post(url.clone()).json(body).send().await?;

        let status = resp.status();
        let text = resp.text().await?;
        let parsed = match serde_json::from_str::<Value>(&text) {
            Ok(value) => value,
            Err(e) => {
                debug!("response from {} is not json: {}", url.path(), e);
                Value::Null
            }
        };

        if !status.is_success() {
            let message = flatten_error(&parsed).unwrap_or_else(|| fallback.to_string());
            warn!(
                "{} rejected status={} message={}",
                url.path(),
                status.as_u16(),
                message
            );
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(parsed)
    }
}
