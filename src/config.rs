use anyhow::{Context, Result};
use std::env;

use crate::sectors;

/// Spreadsheet the briefing rows land in when SPREADSHEET_ID is unset.
const DEFAULT_SPREADSHEET_ID: &str = "1ZNtOMTWPbfFBbssYAtuZSyCy5RWyvx69kFcMCsWByH8";

#[derive(Debug, Clone)]
pub struct Config {
    pub tickers: Vec<String>,
    // News API
    pub news_api_key: String,
    pub news_api_url: String,
    pub news_page_size: u32,
    pub news_request_timeout_secs: u64,
    // OpenAI
    pub openai_api_key: String,
    pub openai_api_url: String,
    pub openai_model: String,
    pub analyzer_request_timeout_secs: u64,
    // Google Sheets
    pub service_account_file: String,
    pub sheets_api_url: String,
    pub sheets_request_timeout_secs: u64,
    pub spreadsheet_id: String,
    pub sheet_range: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Don't fail if .env missing

        Ok(Config {
            tickers: env::var("TICKERS")
                .map(|s| {
                    s.split(',')
                        .map(|t| t.trim().to_string())
                        .filter(|t| !t.is_empty())
                        .collect()
                })
                .unwrap_or_else(|_| {
                    sectors::DEFAULT_TICKERS
                        .iter()
                        .map(|t| t.to_string())
                        .collect()
                }),
            news_api_key: env::var("NEWS_API_KEY").unwrap_or_default(),
            news_api_url: env::var("NEWS_API_URL")
                .unwrap_or_else(|_| "https://newsapi.org".to_string()),
            news_page_size: env::var("NEWS_PAGE_SIZE")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("Failed to parse NEWS_PAGE_SIZE")?,
            news_request_timeout_secs: env::var("NEWS_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("Failed to parse NEWS_REQUEST_TIMEOUT_SECS")?,
            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            openai_api_url: env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com".to_string()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4-turbo".to_string()),
            analyzer_request_timeout_secs: env::var("ANALYZER_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .context("Failed to parse ANALYZER_REQUEST_TIMEOUT_SECS")?,
            service_account_file: env::var("GOOGLE_SERVICE_ACCOUNT_FILE")
                .unwrap_or_else(|_| "service_account.json".to_string()),
            sheets_api_url: env::var("SHEETS_API_URL")
                .unwrap_or_else(|_| "https://sheets.googleapis.com".to_string()),
            sheets_request_timeout_secs: env::var("SHEETS_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("Failed to parse SHEETS_REQUEST_TIMEOUT_SECS")?,
            spreadsheet_id: env::var("SPREADSHEET_ID")
                .unwrap_or_else(|_| DEFAULT_SPREADSHEET_ID.to_string()),
            sheet_range: env::var("SHEET_RANGE").unwrap_or_else(|_| "A1".to_string()),
        })
    }
}
