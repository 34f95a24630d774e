use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Config;

/// Sentiment labels the model is instructed to use (Czech).
pub const SENTIMENTS: [&str; 3] = ["pozitivní", "negativní", "neutrální"];

/// Recommendation labels the model is instructed to use (Czech).
pub const RECOMMENDATIONS: [&str; 4] = [
    "Zvaž nákup",
    "Zvaž short",
    "Dlouhodobě sledovat",
    "Vynechat",
];

// ─── OpenAI API types ───

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

// ─── Analysis types ───

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub sentiment: String,
    #[serde(default)]
    pub summary: String,
    pub recommendation: String,
    pub risk: f64,
    #[serde(default)]
    pub keywords: String,
}

impl AnalysisRecord {
    /// Fixed neutral record substituted when the model reply is unusable.
    pub fn fallback() -> Self {
        AnalysisRecord {
            sentiment: "neutrální".to_string(),
            summary: String::new(),
            recommendation: "Dlouhodobě sledovat".to_string(),
            risk: 50.0,
            keywords: String::new(),
        }
    }

    /// Risk as an integer clamped to [0, 100].
    pub fn risk_score(&self) -> u8 {
        self.risk.clamp(0.0, 100.0).round() as u8
    }
}

/// Tagged analysis outcome: a record parsed from the model reply, or the
/// fixed default when the reply was malformed or failed validation. Either
/// way the pipeline gets a complete record.
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis {
    Parsed(AnalysisRecord),
    Fallback(AnalysisRecord),
}

impl Analysis {
    pub fn record(&self) -> &AnalysisRecord {
        match self {
            Analysis::Parsed(r) | Analysis::Fallback(r) => r,
        }
    }

    pub fn into_record(self) -> AnalysisRecord {
        match self {
            Analysis::Parsed(r) | Analysis::Fallback(r) => r,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Analysis::Fallback(_))
    }
}

// ─── The Analyzer ───

pub struct Analyzer {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
    prompt_template: String,
}

impl Analyzer {
    pub fn new(config: &Config) -> Result<Self> {
        let prompt_template = std::fs::read_to_string("prompts/briefing.md")
            .context("Failed to load prompts/briefing.md")?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.analyzer_request_timeout_secs))
            .build()
            .context("Failed to build analyzer HTTP client")?;

        Ok(Analyzer {
            client,
            api_url: config.openai_api_url.clone(),
            api_key: config.openai_api_key.clone(),
            model: config.openai_model.clone(),
            prompt_template,
        })
    }

    #[cfg(test)]
    fn with_client(
        client: Client,
        api_url: String,
        api_key: String,
        prompt_template: String,
    ) -> Self {
        Analyzer {
            client,
            api_url,
            api_key,
            model: "gpt-4-turbo".to_string(),
            prompt_template,
        }
    }

    /// Analyze one ticker's news. Exactly one completion request, no retries.
    /// Transport and API errors propagate; a malformed reply does not — it
    /// degrades to the fallback record.
    pub async fn analyze(&self, ticker: &str, news_text: &str) -> Result<Analysis> {
        let prompt = self.render_prompt(ticker, news_text);
        let reply = self.call_model(&prompt).await?;
        let analysis = Self::parse_reply(&reply);

        if analysis.is_fallback() {
            info!("Model reply for {} unusable — using fallback record", ticker);
        } else {
            let record = analysis.record();
            debug!(
                "Analysis for {}: sentiment={}, risk={}",
                ticker,
                record.sentiment,
                record.risk_score(),
            );
        }
        Ok(analysis)
    }

    // ─── Internal helpers ───

    fn render_prompt(&self, ticker: &str, news_text: &str) -> String {
        self.prompt_template
            .replace("{{ticker}}", ticker)
            .replace("{{news}}", news_text)
    }

    /// Parse the model's textual reply. Valid JSON with recognized labels
    /// becomes a Parsed record; anything else becomes the Fallback record.
    fn parse_reply(text: &str) -> Analysis {
        // Try direct JSON parse first, then with markdown code fences stripped
        let record: AnalysisRecord = match serde_json::from_str(text).or_else(|_| {
            let stripped = text
                .trim()
                .strip_prefix("```json")
                .or_else(|| text.trim().strip_prefix("```"))
                .unwrap_or(text)
                .strip_suffix("```")
                .unwrap_or(text)
                .trim();
            serde_json::from_str(stripped)
        }) {
            Ok(record) => record,
            Err(_) => return Analysis::Fallback(AnalysisRecord::fallback()),
        };

        // Reject labels outside the instructed vocabulary
        if !SENTIMENTS.contains(&record.sentiment.as_str()) {
            return Analysis::Fallback(AnalysisRecord::fallback());
        }
        if !RECOMMENDATIONS.contains(&record.recommendation.as_str()) {
            return Analysis::Fallback(AnalysisRecord::fallback());
        }

        Analysis::Parsed(record)
    }

    async fn call_model(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: 0.2,
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("OpenAI API request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API returned {}: {}", status, body);
        }

        let body: ChatResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI API response")?;

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .context("No content in OpenAI response")
    }
}
