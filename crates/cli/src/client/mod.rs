// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote assistant client.
//!
//! [`AssistantClient::generate`] sends one prompt and returns the assistant's
//! text. In assistants mode that is a thread, a message, a run and a poll
//! loop; in chat mode a single completion request. Both are bounded by one
//! deadline measured on the injected [`Clock`].

mod error;
pub mod fake;
pub mod poll;
pub mod prompt;
mod retry;
mod transport;
pub mod types;

pub use error::ClientError;
pub use poll::{RunPhase, RunPoller};
pub use retry::RetryPolicy;
pub use transport::{AssistantTransport, HttpTransport};

use std::sync::Arc;
use std::time::Duration;

use crate::config::{ApiMode, ClientConfig};
use crate::time::{CancellationToken, Clock, ClockHandle, Deadline};
use types::{Assistant, AssistantSpec, ChatMessage, ChatRequest, Run};

/// Upper bound on the best-effort cancel of an abandoned run
const CANCEL_GRACE: Duration = Duration::from_secs(2);

/// Client for one configured assistant or model
pub struct AssistantClient {
    config: ClientConfig,
    transport: Arc<dyn AssistantTransport>,
    clock: ClockHandle,
    retry: RetryPolicy,
    cancel: CancellationToken,
}

impl AssistantClient {
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn AssistantTransport>,
        clock: ClockHandle,
    ) -> Self {
        let retry = RetryPolicy::from(&config.retry);
        Self {
            config,
            transport,
            clock,
            retry,
            cancel: CancellationToken::new(),
        }
    }

    /// Build a client speaking HTTP to `config.base_url`.
    ///
    /// Fails with `AuthError` when no API key is configured.
    pub fn from_config(config: ClientConfig) -> Result<Self, ClientError> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            ClientError::AuthError(format!(
                "{} environment variable not set",
                crate::env::OPENAI_API_KEY
            ))
        })?;
        let transport = HttpTransport::new(&config.base_url, &api_key, config.timeout())?;
        Ok(Self::new(config, Arc::new(transport), ClockHandle::system()))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Token that aborts in-flight and future generations when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Send `prompt` and wait up to `timeout` for the reply text.
    ///
    /// No partial text is returned on failure.
    pub async fn generate(&self, prompt: &str, timeout: Duration) -> Result<String, ClientError> {
        if self.cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        let deadline = Deadline::after(&self.clock, timeout);
        tracing::info!(
            mode = ?self.config.api_mode,
            prompt_len = prompt.len(),
            timeout_secs = timeout.as_secs_f64(),
            "generating"
        );

        let text = match self.config.api_mode {
            ApiMode::Assistants => self.generate_with_run(prompt, &deadline).await?,
            ApiMode::Chat => self.generate_with_chat(prompt, &deadline).await?,
        };

        tracing::info!(
            reply_len = text.len(),
            elapsed_ms = deadline.elapsed(&self.clock).as_millis() as u64,
            "generation complete"
        );
        Ok(text)
    }

    async fn generate_with_run(
        &self,
        prompt: &str,
        deadline: &Deadline,
    ) -> Result<String, ClientError> {
        let assistant_id = self.config.assistant_id.as_deref().ok_or_else(|| {
            ClientError::NotConfigured(format!(
                "assistants mode needs an assistant id ({})",
                crate::env::OPENAI_ASSISTANT_ID
            ))
        })?;

        let transport = self.transport.as_ref();
        let thread_id = self
            .with_retry(deadline, "create_thread", || transport.create_thread())
            .await?;
        self.with_retry(deadline, "add_message", || {
            transport.add_message(&thread_id, prompt)
        })
        .await?;
        let run = self
            .with_retry(deadline, "create_run", || {
                transport.create_run(&thread_id, assistant_id)
            })
            .await?;
        tracing::debug!(thread_id = %thread_id, run_id = %run.id, "run created");

        let poller = RunPoller {
            transport,
            clock: &self.clock,
            cancel: &self.cancel,
            retry: &self.retry,
            thread_id: &thread_id,
            interval: self.config.poll_interval(),
            deadline: *deadline,
        };

        match poller.drive(run).await? {
            RunPhase::Succeeded(_) => {
                let messages = self
                    .with_retry(deadline, "list_messages", || {
                        transport.list_messages(&thread_id)
                    })
                    .await?;
                messages
                    .iter()
                    .filter(|m| m.role == "assistant")
                    .find_map(|m| m.first_text())
                    .map(str::to_string)
                    .ok_or_else(|| {
                        ClientError::MalformedResponse(
                            "run completed without an assistant text message".to_string(),
                        )
                    })
            }
            RunPhase::Failed(run) => Err(run_failure(&run)),
            RunPhase::TimedOut { run, elapsed } => {
                self.cancel_remote(&thread_id, &run).await;
                Err(ClientError::Timeout { elapsed })
            }
            RunPhase::Cancelled(run) => {
                self.cancel_remote(&thread_id, &run).await;
                Err(ClientError::Cancelled)
            }
            RunPhase::Pending { .. } => Err(ClientError::MalformedResponse(
                "poller stopped on a pending run".to_string(),
            )),
        }
    }

    async fn generate_with_chat(
        &self,
        prompt: &str,
        deadline: &Deadline,
    ) -> Result<String, ClientError> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            temperature: self.config.temperature,
        };
        let transport = self.transport.as_ref();
        let response = self
            .with_retry(deadline, "chat_completion", || {
                transport.chat_completion(&request)
            })
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                ClientError::MalformedResponse("completion has no message content".to_string())
            })
    }

    async fn with_retry<T, F, Fut>(
        &self,
        deadline: &Deadline,
        label: &str,
        op: F,
    ) -> Result<T, ClientError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, ClientError>>,
    {
        if deadline.is_expired(&self.clock) {
            return Err(ClientError::Timeout {
                elapsed: deadline.elapsed(&self.clock),
            });
        }
        self.retry
            .run(&self.clock, deadline, &self.cancel, label, op)
            .await
    }

    /// Best-effort cancel of an abandoned run; failures are only logged.
    async fn cancel_remote(&self, thread_id: &str, run: &Run) {
        let grace = Deadline::after(&self.clock, CANCEL_GRACE);
        let once = RetryPolicy::none();
        let cancelled = once
            .run(&self.clock, &grace, &self.cancel, "cancel_run", || {
                self.transport.cancel_run(thread_id, &run.id)
            })
            .await;
        match cancelled {
            Ok(()) => tracing::info!(run_id = %run.id, "cancelled remote run"),
            Err(e) => tracing::warn!(run_id = %run.id, error = %e, "failed to cancel remote run"),
        }
    }

    /// Create a new assistant with the given instructions
    pub async fn create_assistant(
        &self,
        name: &str,
        description: &str,
        instructions: &str,
    ) -> Result<Assistant, ClientError> {
        let spec = AssistantSpec {
            name: name.to_string(),
            description: description.to_string(),
            instructions: instructions.to_string(),
            model: self.config.model.clone(),
        };
        let deadline = Deadline::after(&self.clock, self.config.timeout());
        let transport = self.transport.as_ref();
        let assistant = self
            .with_retry(&deadline, "create_assistant", || {
                transport.create_assistant(&spec)
            })
            .await?;
        tracing::info!(assistant_id = %assistant.id, "assistant created");
        Ok(assistant)
    }

    /// Replace the configured assistant's instructions
    pub async fn update_assistant(&self, instructions: &str) -> Result<Assistant, ClientError> {
        let assistant_id = self.config.assistant_id.as_deref().ok_or_else(|| {
            ClientError::NotConfigured(format!(
                "no assistant id to update ({})",
                crate::env::OPENAI_ASSISTANT_ID
            ))
        })?;
        let deadline = Deadline::after(&self.clock, self.config.timeout());
        let transport = self.transport.as_ref();
        self.with_retry(&deadline, "update_assistant", || {
            transport.update_assistant(assistant_id, instructions)
        })
        .await
    }
}

fn run_failure(run: &Run) -> ClientError {
    let detail = match &run.last_error {
        Some(e) => format!("run {} {}: {} ({})", run.id, run.status, e.message, e.code),
        None => format!("run {} ended with status {}", run.id, run.status),
    };
    ClientError::RemoteError {
        status: None,
        detail,
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
