mod client_core;
pub mod types;

use reqwest::StatusCode;
use thiserror::Error;

pub use client_core::*;
pub use types::*;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LlmErrorKind {
    #[error("rate limited")]
    RateLimited,
    #[error("server error")]
    Server,
    #[error("network error")]
    Network,
    #[error("timeout")]
    Timeout,
    #[error("client error")]
    Client,
    #[error("deserialize error")]
    Deserialize,
    #[error("unknown error")]
    Unknown,
}

pub fn classify_error(status: Option<StatusCode>, err: &anyhow::Error) -> LlmErrorKind {
    if let Some(st) = status {
        if st == StatusCode::TOO_MANY_REQUESTS {
            return LlmErrorKind::RateLimited;
        }
        if st.is_server_error() {
            return LlmErrorKind::Server;
        }
        if st.is_client_error() {
            return LlmErrorKind::Client;
        }
    }
    if let Some(e) = err.downcast_ref::<reqwest::Error>() {
        if e.is_timeout() {
            return LlmErrorKind::Timeout;
        }
        if e.is_connect() || e.is_body() || e.is_request() {
            return LlmErrorKind::Network;
        }
    }
    LlmErrorKind::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_by_status() {
        let e = anyhow::anyhow!("boom");
        assert_eq!(
            classify_error(Some(StatusCode::TOO_MANY_REQUESTS), &e),
            LlmErrorKind::RateLimited
        );
        assert_eq!(
            classify_error(Some(StatusCode::BAD_GATEWAY), &e),
            LlmErrorKind::Server
        );
        assert_eq!(
            classify_error(Some(StatusCode::UNAUTHORIZED), &e),
            LlmErrorKind::Client
        );
        assert_eq!(classify_error(None, &e), LlmErrorKind::Unknown);
    }
}
