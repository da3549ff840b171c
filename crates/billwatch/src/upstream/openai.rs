//! Bill summaries from an OpenAI-compatible chat completions endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use billwatch_core::bill::{GeneratedSummary, SummaryRequest};
use billwatch_core::upstream::{summary_failure_from_status, SummaryError, Summarizer};

/// Placeholder for fields the model left out.
pub const NOT_AVAILABLE: &str = "Information not available";

const TEMPERATURE: f64 = 0.3;
const MAX_TOKENS: u32 = 1000;

const SYSTEM_PROMPT: &str = "You are an expert at analyzing California legislative bills and \
writing clear, accessible summaries for the general public. Always respond with valid JSON.";

#[derive(Debug, Clone)]
pub struct OpenAiSummarizer {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiSummarizer {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key,
            model: model.into(),
        })
    }

    fn request_body(&self, request: &SummaryRequest) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_prompt(request) },
            ],
            "response_format": { "type": "json_object" },
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
        })
    }
}

fn user_prompt(request: &SummaryRequest) -> String {
    format!(
        "Analyze the following California legislative bill and respond with a JSON object \
         with the keys \"summary\" (3-4 plain English sentences), \"key_provisions\" \
         (a list of short bullet points) and \"impact\" (who is affected and how). \
         Use \"Not specified\" for anything the text does not say.\n\n\
         Bill ID: {}\nTitle: {}\n\nText:\n{}",
        request.bill_id, request.title, request.text
    )
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn field_or_default(object: &Value, key: &str) -> String {
    object
        .get(key)
        .map(value_text)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Extracts the summary from a chat completion response body.
///
/// Missing fields become [`NOT_AVAILABLE`] and a scalar `key_provisions`
/// is wrapped in a list.
pub fn parse_completion(body: &Value, model: &str) -> Result<GeneratedSummary, SummaryError> {
    let content = body
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .ok_or_else(|| SummaryError::ModelUnavailable("completion has no content".to_string()))?;

    let parsed: Value = serde_json::from_str(content)
        .map_err(|err| SummaryError::ModelUnavailable(format!("unparseable summary: {err}")))?;
    if !parsed.is_object() {
        return Err(SummaryError::ModelUnavailable(
            "summary is not a JSON object".to_string(),
        ));
    }

    let key_provisions = match parsed.get("key_provisions") {
        Some(Value::Array(items)) => items.iter().map(value_text).collect(),
        Some(scalar) => vec![value_text(scalar)],
        None => vec![NOT_AVAILABLE.to_string()],
    };

    Ok(GeneratedSummary {
        text: field_or_default(&parsed, "summary"),
        key_provisions,
        impact: field_or_default(&parsed, "impact"),
        model: model.to_string(),
    })
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, request: &SummaryRequest) -> Result<GeneratedSummary, SummaryError> {
        if request.text.trim().is_empty() {
            return Err(SummaryError::InvalidInput("bill text is empty".to_string()));
        }
        let Some(api_key) = &self.api_key else {
            return Err(SummaryError::NotConfigured(
                "OpenAI API key not configured".to_string(),
            ));
        };

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&self.request_body(request))
            .send()
            .await
            .map_err(|err| SummaryError::ModelUnavailable(format!("request failed: {err}")))?;

        let status = response.status().as_u16();
        if let Some(failure) = summary_failure_from_status(status) {
            tracing::debug!(bill_id = %request.bill_id, status, "Summary request failed");
            return Err(failure);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| SummaryError::ModelUnavailable(format!("invalid response: {err}")))?;
        parse_completion(&body, &self.model)
    }
}
