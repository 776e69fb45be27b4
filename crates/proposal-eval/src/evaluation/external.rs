//! Remote language-model scoring.
//!
//! Every failure on this path (transport, timeout, response shape, missing or
//! out-of-range number) is reported as "unavailable" so the caller can fall
//! back to the heuristic scorer without aborting the run.

use regex::Regex;
use serde_json::{json, Value};
use std::future::Future;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::warn;

use super::domain::SectionSet;
use crate::config::ScoringConfig;

static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.?\d*").expect("numeric token pattern is valid"));

/// Sends a free-text prompt to a completion service and returns the raw JSON reply.
pub trait CompletionTransport: Send + Sync {
    fn complete(
        &self,
        prompt: &str,
        credential: &str,
    ) -> impl Future<Output = Result<Value, ExternalScoreError>> + Send;
}

#[derive(Debug, thiserror::Error)]
pub enum ExternalScoreError {
    #[error("scoring request failed: {0}")]
    Transport(String),
    #[error("scoring request timed out after {0:?}")]
    Timeout(Duration),
    #[error("unexpected scoring response: {0}")]
    MalformedResponse(&'static str),
    #[error("no numeric score found in response")]
    MissingScore,
    #[error("score {0} is outside the 0-100 range")]
    OutOfRange(f64),
}

impl From<reqwest::Error> for ExternalScoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Gemini-style `generateContent` client.
#[derive(Debug, Clone)]
pub struct HttpCompletionTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpCompletionTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ExternalScoreError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &ScoringConfig) -> Result<Self, ExternalScoreError> {
        Self::new(config.endpoint.clone(), config.timeout)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl CompletionTransport for HttpCompletionTransport {
    async fn complete(&self, prompt: &str, credential: &str) -> Result<Value, ExternalScoreError> {
        let body = json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ]
        });

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-goog-api-key", credential)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<Value>().await?)
    }
}

/// Asks a remote model for 0-100 section ratings and candidate summaries.
pub struct ExternalScorer<T> {
    transport: T,
    timeout: Duration,
}

impl<T: CompletionTransport> ExternalScorer<T> {
    pub fn new(transport: T, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Rating for `text` under `category`, or `None` when the remote scorer is
    /// unavailable for any reason.
    pub async fn score(&self, text: &str, category: &str, credential: &str) -> Option<f64> {
        match self.try_score(text, category, credential).await {
            Ok(score) => Some(score),
            Err(err) => {
                warn!(category, error = %err, "external scorer unavailable");
                None
            }
        }
    }

    pub async fn try_score(
        &self,
        text: &str,
        category: &str,
        credential: &str,
    ) -> Result<f64, ExternalScoreError> {
        let prompt = rating_prompt(category, text);
        let response = self.request(&prompt, credential).await?;
        let content = response_text(&response)?;
        parse_score(&content)
    }

    /// Short bullet-point summary of a candidate's three sections.
    pub async fn insights(
        &self,
        sections: &SectionSet,
        credential: &str,
    ) -> Result<String, ExternalScoreError> {
        let prompt = insights_prompt(sections);
        let response = self.request(&prompt, credential).await?;
        response_text(&response)
    }

    async fn request(&self, prompt: &str, credential: &str) -> Result<Value, ExternalScoreError> {
        tokio::time::timeout(self.timeout, self.transport.complete(prompt, credential))
            .await
            .map_err(|_| ExternalScoreError::Timeout(self.timeout))?
    }
}

pub(crate) fn rating_prompt(category: &str, text: &str) -> String {
    format!(
        "Rate the following {} section (0–100). Respond with only a number.\n\n{}",
        category.to_uppercase(),
        text
    )
}

pub(crate) fn insights_prompt(sections: &SectionSet) -> String {
    format!(
        "Provide a concise, bullet-point summary of key insights about the following proposal \
         sections. Keep it short and to the point.\n\nCost:\n{}\n\nTechnical Approach:\n{}\n\n\
         Past Performance:\n{}",
        sections.cost(),
        sections.technical_merit(),
        sections.past_performance()
    )
}

/// Pulls the reply text out of `candidates[0].content`, which is either a plain
/// string or an object carrying `parts[*].text` or `text`.
pub(crate) fn response_text(response: &Value) -> Result<String, ExternalScoreError> {
    let content = response
        .get("candidates")
        .and_then(|candidates| candidates.get(0))
        .and_then(|candidate| candidate.get("content"))
        .ok_or(ExternalScoreError::MalformedResponse(
            "missing candidates[0].content",
        ))?;

    match content {
        Value::String(text) => Ok(text.trim().to_string()),
        Value::Object(fields) => {
            if let Some(Value::Array(parts)) = fields.get("parts") {
                let texts: Vec<&str> = parts
                    .iter()
                    .filter_map(|part| part.get("text").and_then(Value::as_str))
                    .collect();
                if texts.is_empty() {
                    return Err(ExternalScoreError::MalformedResponse(
                        "content parts carry no text",
                    ));
                }
                return Ok(texts.join("\n").trim().to_string());
            }

            fields
                .get("text")
                .and_then(Value::as_str)
                .map(|text| text.trim().to_string())
                .ok_or(ExternalScoreError::MalformedResponse(
                    "content object has no text",
                ))
        }
        _ => Err(ExternalScoreError::MalformedResponse(
            "content is neither text nor an object",
        )),
    }
}

pub(crate) fn parse_score(content: &str) -> Result<f64, ExternalScoreError> {
    let token = FIRST_NUMBER
        .find(content)
        .ok_or(ExternalScoreError::MissingScore)?;
    let score = token
        .as_str()
        .parse::<f64>()
        .map_err(|_| ExternalScoreError::MissingScore)?;

    if (0.0..=100.0).contains(&score) {
        Ok(score)
    } else {
        Err(ExternalScoreError::OutOfRange(score))
    }
}
