//! Hosted summarization model over HTTP.
//!
//! Posts each piece to a hosted inference endpoint and reads the
//! `summary_text` field from the JSON response.

use crate::error::{Result, TapescriptError};
use crate::summarize::{Summarizer, SummaryParams};
use async_trait::async_trait;
use serde_json::json;

pub struct RemoteSummarizer {
    client: reqwest::Client,
    endpoint: String,
    api_token: Option<String>,
}

impl RemoteSummarizer {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_token: None,
        }
    }

    /// Attach a bearer token for endpoints that require one.
    pub fn with_api_token(mut self, token: String) -> Self {
        self.api_token = Some(token);
        self
    }
}

#[async_trait]
impl Summarizer for RemoteSummarizer {
    async fn summarize_piece(&self, text: &str, params: SummaryParams) -> Result<String> {
        let body = json!({
            "inputs": text,
            "parameters": {
                "max_length": params.max_length,
                "min_length": params.min_length,
                "do_sample": false,
            },
        });

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| TapescriptError::Summarize {
            message: format!("request to {} failed: {e}", self.endpoint),
        })?;

        if !response.status().is_success() {
            return Err(TapescriptError::Summarize {
                message: format!("{} returned status {}", self.endpoint, response.status()),
            });
        }

        let payload: serde_json::Value =
            response.json().await.map_err(|e| TapescriptError::Summarize {
                message: format!("unreadable response: {e}"),
            })?;

        // Response shape: [{"summary_text": "..."}]
        payload
            .get(0)
            .and_then(|entry| entry.get("summary_text"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| TapescriptError::Summarize {
                message: format!("unexpected response shape: {payload}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_attaches_token() {
        let summarizer =
            RemoteSummarizer::new("https://example.com/model".to_string())
                .with_api_token("secret".to_string());
        assert_eq!(summarizer.api_token.as_deref(), Some("secret"));
    }

    #[test]
    fn response_shape_parses_summary_text() {
        let payload: serde_json::Value =
            serde_json::from_str(r#"[{"summary_text": "short version"}]"#).unwrap();
        let text = payload
            .get(0)
            .and_then(|entry| entry.get("summary_text"))
            .and_then(|v| v.as_str());
        assert_eq!(text, Some("short version"));
    }
}
