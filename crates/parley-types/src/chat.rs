//! Chat record types for Parley.
//!
//! A [`Chat`] is the persisted record of one session: its id, last-modified
//! time, ordered message history and a short summary. [`ChatHistory`] is the
//! on-disk document holding every stored chat.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Re-export the turn types (used in both chat records and gateway requests).
pub use crate::llm::{Message, Role};

/// Current time truncated to microseconds, the precision chats are stored at.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Format a timestamp as ISO-8601 UTC with microseconds and a `Z` suffix.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw)
            .map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{raw}': {e}")))
    }
}

/// Parse an ISO-8601 timestamp. Values without a zone are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(rfc_err) => raw
            .parse::<NaiveDateTime>()
            .map(|naive| naive.and_utc())
            .map_err(|_| rfc_err),
    }
}

/// The persisted record of one conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub session_id: String,
    /// Last time a message was appended.
    #[serde(with = "timestamp", default)]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub history: Vec<Message>,
    #[serde(default)]
    pub summary: String,
}

impl Chat {
    /// A fresh, empty chat under a newly generated session id.
    pub fn new() -> Self {
        Self::with_id(Uuid::now_v7().to_string())
    }

    /// A fresh, empty chat under the given session id.
    pub fn with_id(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            timestamp: now(),
            history: Vec::new(),
            summary: String::new(),
        }
    }

    /// Append a message and bump the timestamp.
    ///
    /// The timestamp never moves backwards, even if the wall clock does.
    pub fn push(&mut self, message: Message) {
        self.history.push(message);
        self.timestamp = self.timestamp.max(now());
    }

    /// Whether no message has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// The listing view of this chat (history omitted).
    pub fn summary_view(&self) -> ChatSummary {
        ChatSummary {
            session_id: self.session_id.clone(),
            summary: self.summary.clone(),
            timestamp: self.timestamp,
        }
    }
}

impl Default for Chat {
    fn default() -> Self {
        Self::new()
    }
}

/// A chat without its history, as returned by summary listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummary {
    pub session_id: String,
    pub summary: String,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// The persisted document: every stored chat keyed by session id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatHistory {
    #[serde(default)]
    pub chats: BTreeMap<String, Chat>,
}
