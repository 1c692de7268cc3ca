use serde::{Deserialize, Serialize};
use std::fmt;

/// A trading strategy suggested by the completion service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub name: String,
    pub description: String,
    /// Percentage in `[0, 100]`.
    pub probability: f64,
}

/// Raw provider payload. Only guaranteed to be valid JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionsData(pub serde_json::Value);

impl OptionsData {
    pub fn to_compact_json(&self) -> String {
        self.0.to_string()
    }
}

/// Stock symbol, always uppercase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    pub fn new(raw: &str) -> Self {
        Ticker(raw.to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Ticker {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Ticker::new(&raw))
    }
}

// Request Types
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub symbol: Ticker,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub symbol: String,
}

// Response Types
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub symbol: Ticker,
    pub strategies: Vec<Strategy>,
    pub metadata: ResponseMetadata,
}

#[derive(Debug, Serialize)]
pub struct ResponseMetadata {
    pub timestamp: String,
    pub execution_time_ms: u64,
    pub model_used: Option<String>,
}
