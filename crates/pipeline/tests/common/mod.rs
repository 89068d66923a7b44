#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use schemasmith_core::prompt::ProjectContext;
use schemasmith_llm::{Completion, CompletionClient, CompletionError, CompletionRequest};

pub const SCRIPTED_MODEL: &str = "scripted-model";

/// Completion double answering from a queue; once the queue is empty every
/// call answers `"ok"`.
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, CompletionError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    pub fn new(replies: impl IntoIterator<Item = Result<String, CompletionError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer every call with `"ok"`.
    pub fn ok() -> Self {
        Self::new([])
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    fn model(&self) -> &str {
        SCRIPTED_MODEL
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, CompletionError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("ok".to_string()));
        reply.map(|text| Completion {
            text,
            model: SCRIPTED_MODEL.to_string(),
        })
    }
}

pub fn library_context() -> ProjectContext {
    ProjectContext {
        title: "Library System".into(),
        domain: "Education".into(),
        primary_entity: "Book".into(),
        constraints_text: "A member may borrow at most 3 books".into(),
        ..Default::default()
    }
}
