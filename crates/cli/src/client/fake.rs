// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted in-memory transport for deterministic tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet, VecDeque};

use super::error::ClientError;
use super::transport::AssistantTransport;
use super::types::{
    Assistant, AssistantSpec, ChatChoice, ChatMessage, ChatRequest, ChatResponse, MessageContent,
    Run, RunError, RunStatus, TextValue, ThreadMessage,
};

/// Transport that replays a script instead of calling the network.
///
/// Every run walks `run_statuses` one entry per status fetch and then stays
/// on the last entry. Each completed generation consumes one reply; the
/// last reply repeats once the queue is drained.
pub struct ScriptedTransport {
    state: Mutex<Script>,
}

struct Script {
    run_statuses: Vec<RunStatus>,
    run_error: Option<RunError>,
    replies: VecDeque<String>,
    last_reply: Option<String>,
    failures: HashMap<&'static str, VecDeque<ClientError>>,
    stalls: HashSet<&'static str>,
    calls: Vec<&'static str>,
    prompts: Vec<String>,
    run_seq: u32,
    fetches: usize,
    instructions: Option<String>,
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedTransport {
    /// Runs complete on the first poll and no reply is scripted
    pub fn new() -> Self {
        Self {
            state: Mutex::new(Script {
                run_statuses: vec![RunStatus::Completed],
                run_error: None,
                replies: VecDeque::new(),
                last_reply: None,
                failures: HashMap::new(),
                stalls: HashSet::new(),
                calls: Vec::new(),
                prompts: Vec::new(),
                run_seq: 0,
                fetches: 0,
                instructions: None,
            }),
        }
    }

    /// Always answer with `text`
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new().with_replies([text])
    }

    pub fn with_replies<I, S>(self, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .lock()
            .replies
            .extend(replies.into_iter().map(Into::into));
        self
    }

    /// Status sequence returned by successive fetches of each run
    pub fn with_run_statuses(self, statuses: impl IntoIterator<Item = RunStatus>) -> Self {
        let statuses: Vec<_> = statuses.into_iter().collect();
        if !statuses.is_empty() {
            self.state.lock().run_statuses = statuses;
        }
        self
    }

    /// `last_error` attached to runs in a failure state
    pub fn with_run_error(self, code: &str, message: &str) -> Self {
        self.state.lock().run_error = Some(RunError {
            code: code.to_string(),
            message: message.to_string(),
        });
        self
    }

    /// Fail the next call of `method` with `err`; repeatable
    pub fn failing(self, method: &'static str, err: ClientError) -> Self {
        self.state
            .lock()
            .failures
            .entry(method)
            .or_default()
            .push_back(err);
        self
    }

    /// Never answer calls of `method`, like a remote that accepted the
    /// connection and went silent
    pub fn stalling(self, method: &'static str) -> Self {
        self.state.lock().stalls.insert(method);
        self
    }

    /// Method names in call order
    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().calls.clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.state.lock().calls.iter().filter(|c| **c == method).count()
    }

    /// User prompts received, across both API modes
    pub fn prompts(&self) -> Vec<String> {
        self.state.lock().prompts.clone()
    }

    /// Instructions from the latest assistant create/update
    pub fn instructions(&self) -> Option<String> {
        self.state.lock().instructions.clone()
    }

    async fn enter(&self, method: &'static str) -> Result<(), ClientError> {
        let stalled = {
            let mut state = self.state.lock();
            state.calls.push(method);
            if let Some(err) = state.failures.get_mut(method).and_then(VecDeque::pop_front) {
                return Err(err);
            }
            state.stalls.contains(method)
        };
        if stalled {
            std::future::pending::<()>().await;
        }
        Ok(())
    }

    fn next_reply(&self) -> Option<String> {
        let mut state = self.state.lock();
        if let Some(reply) = state.replies.pop_front() {
            state.last_reply = Some(reply);
        }
        state.last_reply.clone()
    }

    fn run(&self, id: String, status: RunStatus) -> Run {
        let last_error = if status.is_pending() || status.is_success() {
            None
        } else {
            self.state.lock().run_error.clone()
        };
        Run {
            id,
            status,
            last_error,
        }
    }
}

fn assistant_message(text: String) -> ThreadMessage {
    ThreadMessage {
        role: "assistant".to_string(),
        content: vec![MessageContent::Text {
            text: TextValue { value: text },
        }],
    }
}

#[async_trait]
impl AssistantTransport for ScriptedTransport {
    async fn create_thread(&self) -> Result<String, ClientError> {
        self.enter("create_thread").await?;
        Ok("thread_fake".to_string())
    }

    async fn add_message(&self, _thread_id: &str, content: &str) -> Result<(), ClientError> {
        self.enter("add_message").await?;
        self.state.lock().prompts.push(content.to_string());
        Ok(())
    }

    async fn create_run(&self, _thread_id: &str, _assistant_id: &str) -> Result<Run, ClientError> {
        self.enter("create_run").await?;
        let id = {
            let mut state = self.state.lock();
            state.run_seq += 1;
            state.fetches = 0;
            format!("run_{}", state.run_seq)
        };
        Ok(self.run(id, RunStatus::Queued))
    }

    async fn retrieve_run(&self, _thread_id: &str, run_id: &str) -> Result<Run, ClientError> {
        self.enter("retrieve_run").await?;
        let status = {
            let mut state = self.state.lock();
            let idx = state.fetches.min(state.run_statuses.len().saturating_sub(1));
            state.fetches += 1;
            state
                .run_statuses
                .get(idx)
                .copied()
                .unwrap_or(RunStatus::Completed)
        };
        Ok(self.run(run_id.to_string(), status))
    }

    async fn cancel_run(&self, _thread_id: &str, _run_id: &str) -> Result<(), ClientError> {
        self.enter("cancel_run").await
    }

    async fn list_messages(&self, _thread_id: &str) -> Result<Vec<ThreadMessage>, ClientError> {
        self.enter("list_messages").await?;
        let prompt = self.state.lock().prompts.last().cloned().unwrap_or_default();
        let user = ThreadMessage {
            role: "user".to_string(),
            content: vec![MessageContent::Text {
                text: TextValue { value: prompt },
            }],
        };
        Ok(match self.next_reply() {
            Some(reply) => vec![assistant_message(reply), user],
            None => vec![user],
        })
    }

    async fn chat_completion(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        self.enter("chat_completion").await?;
        if let Some(prompt) = request.messages.last().and_then(|m| m.content.clone()) {
            self.state.lock().prompts.push(prompt);
        }
        let choices = self
            .next_reply()
            .map(|reply| {
                vec![ChatChoice {
                    message: ChatMessage {
                        role: "assistant".to_string(),
                        content: Some(reply),
                    },
                }]
            })
            .unwrap_or_default();
        Ok(ChatResponse { choices })
    }

    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<Assistant, ClientError> {
        self.enter("create_assistant").await?;
        self.state.lock().instructions = Some(spec.instructions.clone());
        Ok(Assistant {
            id: "asst_fake".to_string(),
            name: Some(spec.name.clone()),
            model: spec.model.clone(),
        })
    }

    async fn update_assistant(
        &self,
        assistant_id: &str,
        instructions: &str,
    ) -> Result<Assistant, ClientError> {
        self.enter("update_assistant").await?;
        self.state.lock().instructions = Some(instructions.to_string());
        Ok(Assistant {
            id: assistant_id.to_string(),
            name: None,
            model: "fake-model".to_string(),
        })
    }
}
