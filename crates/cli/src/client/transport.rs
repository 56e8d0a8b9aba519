// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Request/response seam between the client and the OpenAI REST API.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, RETRY_AFTER};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use super::error::ClientError;
use super::types::{
    Assistant, AssistantSpec, ChatRequest, ChatResponse, Created, MessageList, Run, ThreadMessage,
};

/// One HTTP round trip per method; no retries or polling here.
#[async_trait]
pub trait AssistantTransport: Send + Sync {
    /// `POST /threads`, returns the thread id
    async fn create_thread(&self) -> Result<String, ClientError>;

    /// `POST /threads/{thread}/messages` with a user message
    async fn add_message(&self, thread_id: &str, content: &str) -> Result<(), ClientError>;

    /// `POST /threads/{thread}/runs`
    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run, ClientError>;

    /// `GET /threads/{thread}/runs/{run}`
    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, ClientError>;

    /// `POST /threads/{thread}/runs/{run}/cancel`
    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<(), ClientError>;

    /// `GET /threads/{thread}/messages`, newest first
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, ClientError>;

    /// `POST /chat/completions`
    async fn chat_completion(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError>;

    /// `POST /assistants`
    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<Assistant, ClientError>;

    /// `POST /assistants/{id}` replacing the instructions
    async fn update_assistant(
        &self,
        assistant_id: &str,
        instructions: &str,
    ) -> Result<Assistant, ClientError>;
}

/// [`AssistantTransport`] over HTTPS with reqwest
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl HttpTransport {
    /// Build a transport with bearer auth and the Assistants v2 header.
    ///
    /// `request_timeout` bounds each individual request.
    pub fn new(
        base_url: &str,
        api_key: &str,
        request_timeout: Duration,
    ) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| ClientError::AuthError("API key contains invalid characters".into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            HeaderName::from_static("openai-beta"),
            HeaderValue::from_static("assistants=v2"),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(request_timeout)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        tracing::debug!(path, "GET");
        self.send(self.http.get(self.url(path))).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        tracing::debug!(path, "POST");
        self.send(self.http.post(self.url(path)).json(body)).await
    }

    /// Classify a reqwest failure; an elapsed request timeout is a `Timeout`.
    fn request_error(&self, e: reqwest::Error) -> ClientError {
        if e.is_timeout() {
            ClientError::Timeout {
                elapsed: self.request_timeout,
            }
        } else {
            ClientError::Transport(e.to_string())
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await.map_err(|e| self.request_error(e))?;

        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(|e| {
                if e.is_timeout() {
                    self.request_error(e)
                } else {
                    ClientError::MalformedResponse(e.to_string())
                }
            });
        }

        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::from_status(status.as_u16(), &body, retry_after))
    }
}

#[async_trait]
impl AssistantTransport for HttpTransport {
    async fn create_thread(&self) -> Result<String, ClientError> {
        let created: Created = self.post("/threads", &serde_json::json!({})).await?;
        Ok(created.id)
    }

    async fn add_message(&self, thread_id: &str, content: &str) -> Result<(), ClientError> {
        let body = serde_json::json!({ "role": "user", "content": content });
        let _: Created = self
            .post(&format!("/threads/{thread_id}/messages"), &body)
            .await?;
        Ok(())
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run, ClientError> {
        let body = serde_json::json!({ "assistant_id": assistant_id });
        self.post(&format!("/threads/{thread_id}/runs"), &body).await
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, ClientError> {
        self.get(&format!("/threads/{thread_id}/runs/{run_id}")).await
    }

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<(), ClientError> {
        let _: Run = self
            .post(
                &format!("/threads/{thread_id}/runs/{run_id}/cancel"),
                &serde_json::json!({}),
            )
            .await?;
        Ok(())
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, ClientError> {
        let list: MessageList = self
            .get(&format!("/threads/{thread_id}/messages?order=desc&limit=20"))
            .await?;
        Ok(list.data)
    }

    async fn chat_completion(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        self.post("/chat/completions", request).await
    }

    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<Assistant, ClientError> {
        self.post("/assistants", spec).await
    }

    async fn update_assistant(
        &self,
        assistant_id: &str,
        instructions: &str,
    ) -> Result<Assistant, ClientError> {
        let body = serde_json::json!({ "instructions": instructions });
        self.post(&format!("/assistants/{assistant_id}"), &body)
            .await
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
