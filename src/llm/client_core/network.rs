use anyhow::Result;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, RETRY_AFTER};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::OpenAIClient;
use crate::llm::LlmErrorKind;
use crate::llm::types::{ChatMessage, ChatRequest, ChatResponse, ChoiceMessage};

pub async fn chat_once(
    client: &OpenAIClient,
    model: &str,
    messages: Vec<ChatMessage>,
    temperature: Option<f32>,
) -> Result<ChoiceMessage> {
    let url = client.endpoint();
    let req = ChatRequest {
        model: model.to_string(),
        messages,
        temperature,
    };

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", client.api_key))?,
    );

    debug!(endpoint=%url, model=%req.model, "sending chat.completions request");

    let max_attempts = client.llm_cfg.max_retries.saturating_add(1);
    let mut last_err: Option<anyhow::Error> = None;

    for attempt in 1..=max_attempts {
        let req_builder = client.inner.post(&url).headers(headers.clone()).json(&req);

        let resp = match req_builder.send().await {
            Ok(resp) => resp,
            Err(e) => {
                error!(attempt, err=%e, "llm chat_once send error");
                let e = anyhow::Error::new(e).context("send chat request");
                let kind = crate::llm::classify_error(None, &e);
                last_err = Some(e);
                if should_retry(&kind) && attempt < max_attempts {
                    tokio::time::sleep(backoff_delay(client, attempt, None)).await;
                    continue;
                }
                break;
            }
        };

        let status = resp.status();
        if !status.is_success() {
            let retry_after = resp
                .headers()
                .get(RETRY_AFTER)
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());

            let text = resp.text().await.unwrap_or_default();

            error!(attempt, status=%status.as_u16(), body=%text, "llm chat_once non-success status");
            let e = anyhow::anyhow!("chat error: {} - {}", status, text);
            let kind = crate::llm::classify_error(Some(status), &e);
            if should_retry(&kind) && attempt < max_attempts {
                let wait = backoff_delay(client, attempt, retry_after);
                info!(attempt, kind=?kind, wait_ms=%wait.as_millis(), "retrying chat_once");
                last_err = Some(e);
                tokio::time::sleep(wait).await;
                continue;
            }
            return Err(e);
        }

        let response_text = match resp.text().await {
            Ok(text) => text,
            Err(e) => {
                error!(attempt, err=%e, "llm chat_once read body error");
                let e = anyhow::Error::new(e).context("read chat response body");
                let kind = crate::llm::classify_error(None, &e);
                last_err = Some(e);
                if should_retry(&kind) && attempt < max_attempts {
                    warn!(attempt, kind=?kind, "retrying after body read error");
                    tokio::time::sleep(backoff_delay(client, attempt, None)).await;
                    continue;
                }
                break;
            }
        };

        let body: ChatResponse = serde_json::from_str(&response_text).map_err(|e| {
            error!(attempt, err=%e, kind=?LlmErrorKind::Deserialize, "llm chat_once deserialize error");
            anyhow::Error::new(e).context("parse chat response")
        })?;

        if let Some(usage) = &body.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                total_tokens = usage.total_tokens,
                "llm chat_once usage"
            );
        }

        return body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| anyhow::anyhow!("no choices returned"));
    }

    Err(last_err.unwrap_or_else(|| anyhow::anyhow!(LlmErrorKind::Unknown)))
}

pub(crate) fn should_retry(kind: &LlmErrorKind) -> bool {
    matches!(
        kind,
        LlmErrorKind::RateLimited
            | LlmErrorKind::Server
            | LlmErrorKind::Network
            | LlmErrorKind::Timeout
    )
}

pub(crate) fn backoff_delay(
    client: &OpenAIClient,
    attempt: usize,
    retry_after_secs: Option<u64>,
) -> Duration {
    if client.llm_cfg.respect_retry_after
        && let Some(secs) = retry_after_secs
    {
        return Duration::from_secs(secs);
    }
    let base = client.llm_cfg.retry_base_ms;
    let exp = base.saturating_mul(1u64 << (attempt as u32 - 1).min(16));
    let jitter = client.llm_cfg.retry_jitter_ms as i64;
    let half = jitter / 2;
    let rnd = fastrand::i64(-half..=half).max(0) as u64;
    Duration::from_millis(exp.saturating_add(rnd))
}
