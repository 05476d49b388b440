//! Provider-backed Generator.
//!
//! Wraps any [`AIProvider`] and implements the [`Generator`] port on top
//! of it: structured prompts, JSON extraction from fenced or embedded
//! text, schema checks (required fields plus the typed validator) and a
//! bounded retry policy. Every check runs inside the retry loop.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{AIError, AIProvider, ChatRole, CompletionRequest, Generator, OutputSchema};

/// Temperature used for structured generation.
pub const STRUCTURED_TEMPERATURE: f32 = 0.3;

/// Bounded exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// No waiting between attempts. For tests.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Wait before attempt `attempt + 1`, where `attempt` is 1-based.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// [`Generator`] implementation over an [`AIProvider`].
pub struct ProviderGenerator<P: AIProvider + ?Sized> {
    provider: Arc<P>,
    retry: RetryPolicy,
}

impl<P: AIProvider + ?Sized> ProviderGenerator<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Runs `attempt` until it succeeds, fails permanently, or attempts run out.
    ///
    /// Parse failures are retried too: a second sample often fixes malformed JSON.
    async fn with_retries<T, F, Fut>(&self, operation: &str, mut attempt: F) -> Result<T, AIError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, AIError>>,
    {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut tries = 0;
        loop {
            tries += 1;
            let err = match attempt().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            let retryable = err.is_retryable() || matches!(err, AIError::Parse(_));
            if !retryable {
                return Err(err);
            }
            if tries >= max_attempts {
                return Err(if max_attempts == 1 {
                    err
                } else {
                    AIError::RetriesExhausted {
                        attempts: tries,
                        last: err.to_string(),
                    }
                });
            }

            let delay = self.retry.delay_after(tries);
            tracing::warn!(
                operation,
                attempt = tries,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Generation attempt failed, retrying"
            );
            if !delay.is_zero() {
                sleep(delay).await;
            }
        }
    }

    async fn complete_text(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        temperature: Option<f32>,
    ) -> Result<String, AIError> {
        let mut request = CompletionRequest::new().with_message(ChatRole::User, prompt);
        if let Some(system) = system_prompt {
            request = request.with_system_prompt(system);
        }
        if let Some(t) = temperature {
            request = request.with_temperature(t);
        }
        let response = self.provider.complete(request).await?;
        Ok(response.content)
    }
}

#[async_trait]
impl<P: AIProvider + ?Sized> Generator for ProviderGenerator<P> {
    async fn generate(&self, prompt: &str, system_prompt: Option<&str>) -> Result<String, AIError> {
        self.with_retries("generate", || self.complete_text(prompt, system_prompt, None))
            .await
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &OutputSchema,
        system_prompt: Option<&str>,
    ) -> Result<Value, AIError> {
        let full_prompt = structured_prompt(prompt, schema);
        let full_prompt = full_prompt.as_str();
        self.with_retries(schema.name, move || async move {
            let text = self
                .complete_text(full_prompt, system_prompt, Some(STRUCTURED_TEMPERATURE))
                .await?;
            let value = parse_json_response(&text)?;
            schema.check(&value)?;
            Ok(value)
        })
        .await
    }
}

/// Appends the schema and output instructions to `prompt`.
pub fn structured_prompt(prompt: &str, schema: &OutputSchema) -> String {
    format!(
        "{}\n\nRespond with a JSON object ({}) matching this schema:\n```json\n{}\n```\nReturn only the JSON object, with no text before or after it.",
        prompt,
        schema.name,
        schema.to_prompt_text()
    )
}

/// Parses the JSON object embedded in a model reply.
pub fn parse_json_response(text: &str) -> Result<Value, AIError> {
    let candidate = extract_json(text)
        .ok_or_else(|| AIError::parse("no JSON object found in response"))?;
    serde_json::from_str(candidate).map_err(|e| AIError::parse(format!("invalid JSON: {}", e)))
}

/// Finds the JSON object in `text`.
///
/// Tried in order: a reply that starts with `{` (up to its matching brace),
/// a ```` ```json ```` fence, any ```` ``` ```` fence, and finally the span
/// from the first `{` to the last `}`.
pub fn extract_json(text: &str) -> Option<&str> {
    let trimmed = text.trim();

    if trimmed.starts_with('{') {
        if let Some(end) = matching_brace(trimmed) {
            return Some(&trimmed[..=end]);
        }
    }

    if let Some(body) = fenced_block(trimmed, "```json") {
        return Some(body);
    }
    if let Some(body) = fenced_block(trimmed, "```") {
        return Some(body);
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    (end > start).then(|| &trimmed[start..=end])
}

fn fenced_block<'a>(text: &'a str, opening: &str) -> Option<&'a str> {
    let start = text.find(opening)? + opening.len();
    let rest = &text[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

/// Byte index of the brace closing the object that opens at index 0.
fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
