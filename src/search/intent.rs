use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::llm::{ChatMessage, OpenAIClient};
use crate::search::types::IntentData;

pub const INTENT_SYSTEM_PROMPT: &str = "You are a helpful assistant that extracts search intent. \
Extract the 'main_keyword' (e.g. laptop, phone) from the query. \
Extract 'max_price' only if explicitly mentioned. \
Return JSON with keys: 'main_keyword' (string), 'max_price' (number or null). \
Do not return markdown.";

/// Lowercase and trim.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Whitespace tokens of the normalized query.
///
/// Tokens without a single alphanumeric character (`"###"`, `"--"`) carry no
/// search intent and are dropped. This is stricter than a plain whitespace
/// split: a punctuation-only query yields no keywords, so `fallback_search`
/// matches every active product (up to the primary cap) instead of serving
/// the default electronics listing.
pub fn tokenize(query: &str) -> Vec<String> {
    normalize_query(query)
        .split_whitespace()
        .filter(|t| t.chars().any(char::is_alphanumeric))
        .map(str::to_string)
        .collect()
}

/// Turns a raw query into an [`IntentData`]. Never fails.
#[async_trait]
pub trait IntentSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn extract_intent(&self, query: &str) -> IntentData;
}

/// Offline extraction: keywords only.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveTokenizer;

#[async_trait]
impl IntentSource for NaiveTokenizer {
    fn name(&self) -> &'static str {
        "naive"
    }

    async fn extract_intent(&self, query: &str) -> IntentData {
        IntentData::from_keywords(tokenize(query))
    }
}

#[derive(Debug, Deserialize)]
struct OracleReply {
    #[serde(default)]
    main_keyword: Option<String>,
    #[serde(default)]
    max_price: Option<f64>,
}

/// Best-effort extraction through a chat-completion model.
///
/// Any failure (transport, status, timeout, unparseable reply) degrades to
/// the [`NaiveTokenizer`] result.
#[derive(Debug, Clone)]
pub struct OracleIntentSource {
    client: OpenAIClient,
    model: String,
    timeout: Duration,
}

impl OracleIntentSource {
    pub fn new(client: OpenAIClient, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            model: model.into(),
            timeout,
        }
    }

    async fn ask(&self, normalized: &str) -> Result<OracleReply> {
        let msg = self
            .client
            .chat_once(
                &self.model,
                vec![
                    ChatMessage::system(INTENT_SYSTEM_PROMPT),
                    ChatMessage::user(normalized),
                ],
                Some(0.0),
            )
            .await?;
        let content = msg.content.context("oracle reply has no content")?;
        parse_oracle_reply(&content)
    }
}

#[async_trait]
impl IntentSource for OracleIntentSource {
    fn name(&self) -> &'static str {
        "oracle"
    }

    async fn extract_intent(&self, query: &str) -> IntentData {
        let normalized = normalize_query(query);
        let tokens = tokenize(&normalized);

        match tokio::time::timeout(self.timeout, self.ask(&normalized)).await {
            Ok(Ok(reply)) => {
                debug!(?reply, "oracle intent reply");
                intent_from_reply(reply, tokens)
            }
            Ok(Err(e)) => {
                warn!(err=%format!("{e:#}"), "oracle intent extraction failed, using tokens");
                IntentData::from_keywords(tokens)
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "oracle intent extraction timed out, using tokens"
                );
                IntentData::from_keywords(tokens)
            }
        }
    }
}

/// The reply must be a bare JSON object; fenced or prose replies are rejected.
fn parse_oracle_reply(content: &str) -> Result<OracleReply> {
    serde_json::from_str(content.trim()).context("parse oracle reply")
}

fn intent_from_reply(reply: OracleReply, tokens: Vec<String>) -> IntentData {
    let keywords = match reply
        .main_keyword
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
    {
        Some(keyword) => vec![keyword],
        None => tokens,
    };
    IntentData {
        // resolved later by the category mapper
        category: None,
        max_price: reply.max_price.filter(|p| p.is_finite() && *p > 0.0),
        keywords,
    }
}

/// Oracle when an API key is configured, naive tokenizer otherwise.
pub fn intent_source_from_config(cfg: &AppConfig) -> Result<Arc<dyn IntentSource>> {
    let source: Arc<dyn IntentSource> = match &cfg.api_key {
        Some(key) => {
            let client = OpenAIClient::new(cfg.base_url.clone(), key.clone())?
                .with_llm_config(cfg.llm.clone());
            Arc::new(OracleIntentSource::new(
                client,
                cfg.model.clone(),
                Duration::from_millis(cfg.llm.oracle_timeout_ms),
            ))
        }
        None => Arc::new(NaiveTokenizer),
    };
    info!(source = source.name(), model = %cfg.model, "intent source selected");
    Ok(source)
}
