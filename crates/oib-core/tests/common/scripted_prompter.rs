//! Prompter for integration tests: answers from a script, or hangs like an
//! open dialog until the flow is aborted.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use oib_core::engine::{PromptReply, PromptRequest, Prompter};
use tokio::sync::Notify;

#[derive(Default)]
pub struct ScriptedPrompter {
    replies: Mutex<VecDeque<PromptReply>>,
    requests: Mutex<Vec<PromptRequest>>,
    /// When true, `prompt` never returns.
    hang: bool,
    opened: Notify,
}

impl ScriptedPrompter {
    /// Answers with `replies` in order, then dismisses.
    pub fn with_replies(replies: impl IntoIterator<Item = PromptReply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            ..Self::default()
        })
    }

    /// Never answers.
    pub fn hanging() -> Arc<Self> {
        Arc::new(Self {
            hang: true,
            ..Self::default()
        })
    }

    /// Waits until a dialog has been opened.
    pub async fn wait_opened(&self) {
        self.opened.notified().await;
    }

    pub fn requests(&self) -> Vec<PromptRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn prompt(&self, request: PromptRequest) -> anyhow::Result<PromptReply> {
        self.requests.lock().unwrap().push(request);
        self.opened.notify_one();
        if self.hang {
            std::future::pending::<()>().await;
        }
        let reply = self.replies.lock().unwrap().pop_front();
        Ok(reply.unwrap_or(PromptReply::Dismissed))
    }
}
