use anyhow::Result;
use std::time::Duration;

use crate::config::LlmConfig;
use crate::llm::types::{ChatMessage, ChoiceMessage};

mod network;

/// Minimal client for OpenAI-compatible `chat/completions` endpoints.
#[derive(Debug, Clone)]
pub struct OpenAIClient {
    pub base_url: String,
    pub api_key: String,
    pub(crate) inner: reqwest::Client,
    pub llm_cfg: LlmConfig,
}

impl OpenAIClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let inner = reqwest::Client::builder().build()?;
        Ok(Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            inner,
            llm_cfg: LlmConfig::default(),
        })
    }

    pub fn with_llm_config(mut self, cfg: LlmConfig) -> Self {
        let builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(cfg.connect_timeout_ms))
            .timeout(Duration::from_millis(cfg.request_timeout_ms));
        // keep the default client if the builder rejects the settings
        if let Ok(c) = builder.build() {
            self.inner = c;
        }
        self.llm_cfg = cfg;
        self
    }

    pub(crate) fn endpoint(&self) -> String {
        let mut base = self.base_url.trim_end_matches('/').to_string();
        if let Some(pos) = base.rfind("/v1") {
            base.truncate(pos);
            base = base.trim_end_matches('/').to_string();
        }
        format!("{base}/v1/chat/completions")
    }

    /// Single non-streaming completion. Retries follow `llm_cfg`.
    ///
    /// Dropping the returned future aborts the in-flight request and any pending retry.
    pub async fn chat_once(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
        temperature: Option<f32>,
    ) -> Result<ChoiceMessage> {
        network::chat_once(self, model, messages, temperature).await
    }
}
