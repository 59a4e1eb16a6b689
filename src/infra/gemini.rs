//! Gemini REST API による SummaryService 実装。

use std::time::Duration;

use crate::domain::summary::{BookInfo, SummaryError, SummaryService};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const NO_SUMMARY: &str = "No summary available.";
const NO_IMAGE_DESCRIPTION: &str = "No image description available.";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            model: "gemini-1.5-flash".into(),
            api_key: api_key.into(),
            timeout_secs: 30,
        }
    }
}

pub struct GeminiSummaryService {
    config: GeminiConfig,
}

impl GeminiSummaryService {
    pub fn new(config: GeminiConfig) -> Self {
        Self { config }
    }

    fn prompt(title: &str) -> String {
        format!(
            "1. Summarize the book '{title}' in a few sentences.\n\
             2. Generate a book cover image description for '{title}', \
             focusing on a visually appealing and relevant theme.\n\
             Return both summary and image description, separated by a blank line."
        )
    }

    fn generate(&self, prompt: &str) -> Result<String, SummaryError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .build();

        let body = serde_json::json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        });

        let resp = agent
            .post(&url)
            .set("x-goog-api-key", &self.config.api_key)
            .send_json(body)
            .map_err(|e: ureq::Error| SummaryError::Request(e.to_string()))?;

        let json: serde_json::Value = resp
            .into_json()
            .map_err(|e| SummaryError::Parse(e.to_string()))?;

        extract_text(&json)
    }
}

impl SummaryService for GeminiSummaryService {
    fn fetch_info(&self, title: &str) -> Result<BookInfo, SummaryError> {
        tracing::info!(title, model = %self.config.model, "requesting book summary");
        let text = self.generate(&Self::prompt(title))?;
        Ok(split_info(&text))
    }
}

/// APIキー未設定時に使う。常にUnavailableを返す。
pub struct UnconfiguredSummaryService;

impl SummaryService for UnconfiguredSummaryService {
    fn fetch_info(&self, _title: &str) -> Result<BookInfo, SummaryError> {
        Err(SummaryError::Unavailable(
            "GEMINI_API_KEY is not set".to_string(),
        ))
    }
}

/// `candidates[0].content.parts[*].text` を連結して返す。
fn extract_text(json: &serde_json::Value) -> Result<String, SummaryError> {
    let parts = json["candidates"]
        .get(0)
        .and_then(|c| c["content"]["parts"].as_array())
        .ok_or(SummaryError::EmptyResponse)?;

    let text: String = parts
        .iter()
        .filter_map(|p| p["text"].as_str())
        .collect();

    let text = text.trim();
    if text.is_empty() {
        return Err(SummaryError::EmptyResponse);
    }
    Ok(text.to_string())
}

/// 最初の空行で分割: 前半が要約、後半が表紙の説明。
fn split_info(text: &str) -> BookInfo {
    let mut parts = text.trim().splitn(2, "\n\n");
    let summary = parts
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(NO_SUMMARY);
    let image_description = parts
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(NO_IMAGE_DESCRIPTION);

    BookInfo {
        summary: summary.to_string(),
        image_description: image_description.to_string(),
    }
}
