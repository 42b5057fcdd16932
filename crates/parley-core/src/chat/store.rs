//! In-memory chat store with whole-document persistence.
//!
//! Every saved chat is held in a map keyed by session id. The map is loaded
//! once from a [`SnapshotStore`] and written back wholesale; there are no
//! partial updates.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use parley_types::chat::{Chat, ChatHistory, ChatSummary};
use parley_types::error::StoreError;

use crate::chat::snapshot::SnapshotStore;

/// Serialization view borrowing the map, so saving never clones chats.
#[derive(Serialize)]
struct HistoryRef<'a> {
    chats: &'a BTreeMap<String, Chat>,
}

/// Every saved chat, keyed by session id.
///
/// Invariant: each key equals the `session_id` of its chat.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatStore {
    chats: BTreeMap<String, Chat>,
}

impl ChatStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the store from a snapshot.
    ///
    /// A missing snapshot or one that does not parse yields an empty store;
    /// only a failure to read the snapshot at all is returned as an error.
    pub async fn load<S: SnapshotStore>(source: &S) -> Result<Self, StoreError> {
        let Some(document) = source.read().await? else {
            debug!(location = %source.location(), "No chat history found, starting empty");
            return Ok(Self::new());
        };

        match Self::from_json(&document) {
            Ok(store) => {
                info!(location = %source.location(), chats = store.len(), "Chat history loaded");
                Ok(store)
            }
            Err(err) => {
                warn!(
                    location = %source.location(),
                    "Chat history is malformed ({err}), starting empty"
                );
                Ok(Self::new())
            }
        }
    }

    /// Parse a history document.
    ///
    /// Entries stored under a key that disagrees with their own session id
    /// are re-keyed by the session id.
    pub fn from_json(document: &str) -> Result<Self, StoreError> {
        let history: ChatHistory = serde_json::from_str(document)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let mut chats = BTreeMap::new();
        for (key, chat) in history.chats {
            if key != chat.session_id {
                warn!(key = %key, session_id = %chat.session_id, "Re-keying chat stored under a mismatched key");
            }
            chats.insert(chat.session_id.clone(), chat);
        }
        Ok(Self { chats })
    }

    /// Serialize the store with 4-space indentation. Non-ASCII text is written as-is.
    pub fn to_json(&self) -> Result<String, StoreError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        HistoryRef { chats: &self.chats }
            .serialize(&mut serializer)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        String::from_utf8(buf).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Write the whole store to `destination`.
    pub async fn save_all<S: SnapshotStore>(&self, destination: &S) -> Result<(), StoreError> {
        let document = self.to_json()?;
        destination.write(&document).await?;
        debug!(location = %destination.location(), chats = self.len(), "Chat history saved");
        Ok(())
    }

    pub fn get(&self, session_id: &str) -> Option<&Chat> {
        self.chats.get(session_id)
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.chats.contains_key(session_id)
    }

    /// Insert a chat, replacing any chat with the same session id.
    pub fn add(&mut self, chat: Chat) -> Option<Chat> {
        self.chats.insert(chat.session_id.clone(), chat)
    }

    /// Remove the given chats, returning the ids that were actually present.
    ///
    /// Unknown ids are skipped. An id repeated in `session_ids` is reported once.
    pub fn delete_many(&mut self, session_ids: &[String]) -> Vec<String> {
        session_ids
            .iter()
            .filter(|id| self.chats.remove(id.as_str()).is_some())
            .cloned()
            .collect()
    }

    /// Listing of every chat without history, most recently modified first.
    pub fn summaries(&self) -> Vec<ChatSummary> {
        let mut summaries: Vec<ChatSummary> = self.chats.values().map(Chat::summary_view).collect();
        summaries.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| a.session_id.cmp(&b.session_id))
        });
        summaries
    }

    pub fn len(&self) -> usize {
        self.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }
}
