//! Session controller: the active chat and everything that happens to it.
//!
//! Exactly one chat is "current" at a time. Messages are appended to it,
//! rotating starts a new one (after summarizing and saving the old one),
//! and any stored chat can be made current again by loading it.

use std::collections::BTreeSet;
use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, warn};

use parley_types::chat::{Chat, ChatSummary, Message};
use parley_types::error::ChatError;
use parley_types::llm::GatewayError;

use crate::chat::snapshot::SnapshotStore;
use crate::chat::store::ChatStore;
use crate::chat::summary::summarize_conversation;
use crate::llm::box_gateway::BoxModelGateway;
use crate::llm::context::ConversationContext;

/// Result of making a chat current.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The chat was found and is now current.
    Loaded(Chat),
    /// No chat had this id; an empty chat under it is now current.
    Created(String),
}

/// Result of a batch delete.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteOutcome {
    /// Ids that were removed, in request order.
    pub deleted: Vec<String>,
    /// Whether every requested id was removed.
    pub complete: bool,
}

/// Owns the current chat, its conversational context and the chat store.
///
/// Not internally synchronized: callers serving concurrent requests must put
/// the controller behind a single lock.
pub struct SessionController<S: SnapshotStore> {
    gateway: BoxModelGateway,
    snapshot: S,
    store: ChatStore,
    current: Chat,
    context: ConversationContext,
    timeout: Duration,
}

impl<S: SnapshotStore> SessionController<S> {
    /// Create a controller over an already loaded store, with a fresh empty chat.
    pub fn new(gateway: BoxModelGateway, snapshot: S, store: ChatStore, timeout: Duration) -> Self {
        Self {
            gateway,
            snapshot,
            store,
            current: Chat::new(),
            context: ConversationContext::default(),
            timeout,
        }
    }

    /// Load the store from `snapshot` and create a controller over it.
    pub async fn open(gateway: BoxModelGateway, snapshot: S, timeout: Duration) -> Result<Self, ChatError> {
        let store = ChatStore::load(&snapshot).await?;
        Ok(Self::new(gateway, snapshot, store, timeout))
    }

    pub fn current_session_id(&self) -> &str {
        &self.current.session_id
    }

    pub fn current_chat(&self) -> &Chat {
        &self.current
    }

    pub fn store(&self) -> &ChatStore {
        &self.store
    }

    pub fn gateway(&self) -> &BoxModelGateway {
        &self.gateway
    }

    /// Every stored chat without its history.
    pub fn all_chat_summaries(&self) -> Vec<ChatSummary> {
        self.store.summaries()
    }

    /// Finish the current chat and start a new one.
    ///
    /// An empty current chat is kept as is and its id returned. Otherwise the
    /// chat is summarized, stored and saved, and a fresh chat becomes current.
    /// If any step fails the store and the current chat are left as they were.
    #[tracing::instrument(skip_all, fields(session_id = %self.current.session_id))]
    pub async fn start_new_chat(&mut self) -> Result<String, ChatError> {
        if self.current.is_empty() {
            debug!("Current chat is empty, keeping it");
            return Ok(self.current.session_id.clone());
        }

        let summary = bounded(self.timeout, summarize_conversation(&self.gateway, &self.context)).await?;

        let mut finished = self.current.clone();
        finished.summary = summary;

        let previous = self.store.clone();
        self.store.add(finished);
        if let Err(err) = self.store.save_all(&self.snapshot).await {
            warn!("Failed to save chat history, keeping current chat: {err}");
            self.store = previous;
            return Err(err.into());
        }

        self.current = Chat::new();
        self.context.reset();
        info!(new_session_id = %self.current.session_id, "Started new chat");
        Ok(self.current.session_id.clone())
    }

    /// Make the chat with `session_id` current.
    ///
    /// An unknown id still activates a usable (empty) chat under that id.
    #[tracing::instrument(skip(self))]
    pub fn load_chat(&mut self, session_id: &str) -> Result<LoadOutcome, ChatError> {
        if session_id.is_empty() {
            return Err(ChatError::MissingSessionId);
        }

        match self.store.get(session_id) {
            Some(chat) => {
                self.context = ConversationContext::new(&chat.history);
                self.current = chat.clone();
                info!(turns = self.current.history.len(), "Loaded chat");
                Ok(LoadOutcome::Loaded(self.current.clone()))
            }
            None => {
                self.context.reset();
                self.current = Chat::with_id(session_id);
                info!("Chat not found, created an empty one under the requested id");
                Ok(LoadOutcome::Created(session_id.to_string()))
            }
        }
    }

    /// Delete stored chats and save the result.
    ///
    /// If saving fails the deleted chats are put back.
    #[tracing::instrument(skip_all, fields(requested = session_ids.len()))]
    pub async fn delete_chats(&mut self, session_ids: &[String]) -> Result<DeleteOutcome, ChatError> {
        if session_ids.is_empty() {
            return Err(ChatError::MissingSessionIds);
        }

        let previous = self.store.clone();
        let deleted = self.store.delete_many(session_ids);
        if let Err(err) = self.store.save_all(&self.snapshot).await {
            warn!("Failed to save chat history, restoring deleted chats: {err}");
            self.store = previous;
            return Err(err.into());
        }

        let requested: BTreeSet<&str> = session_ids.iter().map(String::as_str).collect();
        let complete = deleted.len() == requested.len();
        info!(deleted = deleted.len(), complete, "Deleted chats");
        Ok(DeleteOutcome { deleted, complete })
    }

    /// Send a user message in the current chat and return the model's reply.
    ///
    /// The user turn is recorded before the model is contacted and stays
    /// recorded if the call fails.
    #[tracing::instrument(skip_all, fields(session_id = %self.current.session_id))]
    pub async fn send_message(&mut self, text: &str) -> Result<String, ChatError> {
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        self.current.push(Message::user(text));
        self.store.add(self.current.clone());

        // The context strips trailing whitespace, so the stored turn matches
        // what a reload replays.
        let reply = bounded(self.timeout, self.context.send(&self.gateway, text)).await?;

        self.current.push(Message::model(reply.clone()));
        self.store.add(self.current.clone());
        debug!(turns = self.current.history.len(), "Recorded model reply");
        Ok(reply)
    }

    /// Save the whole store.
    pub async fn flush(&self) -> Result<(), ChatError> {
        self.store.save_all(&self.snapshot).await?;
        info!(chats = self.store.len(), location = %self.snapshot.location(), "Chat history flushed");
        Ok(())
    }
}

/// Run a gateway call, giving up after `timeout`.
async fn bounded<T>(
    timeout: Duration,
    call: impl Future<Output = Result<T, GatewayError>>,
) -> Result<T, ChatError> {
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result.map_err(ChatError::from),
        Err(_) => {
            warn!(?timeout, "Model call timed out");
            Err(ChatError::Timeout(timeout))
        }
    }
}
