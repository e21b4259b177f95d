use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::format::guest::initials;
use crate::format::relative::{format_relative_str, parse_timestamp};

/// A guest wish as returned by `GET /api/comments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    pub message: String,
    #[serde(default)]
    pub created_at: String,
}

impl Comment {
    pub fn created_at_time(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at).ok()
    }

    /// Relative posting time, e.g. "2 hours ago".
    pub fn time_label(&self, now: DateTime<Utc>) -> String {
        format_relative_str(&self.created_at, now)
    }

    pub fn initials(&self) -> String {
        initials(&self.name)
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CommentList {
    #[serde(default)]
    pub data: Option<Vec<Comment>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentForm {
    pub name: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RsvpForm {
    pub name: String,
    pub email: String,
    pub is_present: bool,
    pub total_guests: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentReceipt {
    pub message: String,
    pub comment: Option<Comment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsvpReceipt {
    pub message: String,
    /// Reservation confirmation code, when the API issues one.
    pub code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CommentAck {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub comment: Option<Comment>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RsvpAck {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<RsvpData>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RsvpData {
    #[serde(default)]
    pub code: Option<String>,
}
