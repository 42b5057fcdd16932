//! In-memory test doubles shared by the chat module tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use parley_types::error::StoreError;
use parley_types::llm::{GatewayError, Message};

use crate::chat::snapshot::SnapshotStore;
use crate::llm::gateway::ModelGateway;

/// A snapshot held in memory; writes can be made to fail.
#[derive(Default)]
pub struct MemorySnapshot {
    pub document: Mutex<Option<String>>,
    pub fail_writes: AtomicBool,
    pub writes: AtomicUsize,
}

impl MemorySnapshot {
    pub fn with_document(document: &str) -> Self {
        let snapshot = Self::default();
        *snapshot.document.lock().unwrap() = Some(document.to_string());
        snapshot
    }

    pub fn document(&self) -> Option<String> {
        self.document.lock().unwrap().clone()
    }
}

impl SnapshotStore for MemorySnapshot {
    fn location(&self) -> String {
        "memory".to_string()
    }

    async fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.document())
    }

    async fn write(&self, document: &str) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Io("disk full".to_string()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        *self.document.lock().unwrap() = Some(document.to_string());
        Ok(())
    }
}

/// One scripted gateway response.
pub enum Scripted {
    Reply(String),
    Fail(GatewayError),
    Stall,
}

/// A gateway that answers from a script and records every request.
#[derive(Clone, Default)]
pub struct ScriptedGateway {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    pub requests: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl ScriptedGateway {
    pub fn reply(&self, text: &str) -> &Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Reply(text.to_string()));
        self
    }

    pub fn fail(&self, error: GatewayError) -> &Self {
        self.script.lock().unwrap().push_back(Scripted::Fail(error));
        self
    }

    pub fn stall(&self) -> &Self {
        self.script.lock().unwrap().push_back(Scripted::Stall);
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl ModelGateway for ScriptedGateway {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn generate(&self, contents: &[Message]) -> Result<String, GatewayError> {
        self.requests.lock().unwrap().push(contents.to_vec());
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Reply(text)) => Ok(text),
            Some(Scripted::Fail(error)) => Err(error),
            Some(Scripted::Stall) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(GatewayError::EmptyResponse)
            }
            None => Err(GatewayError::EmptyResponse),
        }
    }
}
