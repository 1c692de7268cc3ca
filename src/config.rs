use crate::{AppError, Result};
use std::net::SocketAddr;
use url::Url;

pub const DEFAULT_OPTIONS_API_URL: &str = "https://api.example.com/options";
pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Runtime configuration, read once at startup and handed to the clients.
#[derive(Clone)]
pub struct Config {
    pub options_api_url: Url,
    pub options_api_key: String,
    pub openai_api_base: Url,
    pub openai_api_key: String,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let options_api_key = get("FINANCIAL_API_KEY")
            .ok_or_else(|| AppError::Config("FINANCIAL_API_KEY not set".to_string()))?;
        let openai_api_key = get("OPENAI_API_KEY")
            .ok_or_else(|| AppError::Config("OPENAI_API_KEY not set".to_string()))?;

        let options_api_url = parse_url(
            "OPTIONS_API_URL",
            &get("OPTIONS_API_URL").unwrap_or_else(|| DEFAULT_OPTIONS_API_URL.to_string()),
        )?;
        let openai_api_base = parse_url(
            "OPENAI_API_BASE",
            &get("OPENAI_API_BASE").unwrap_or_else(|| DEFAULT_OPENAI_API_BASE.to_string()),
        )?;

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("Invalid BIND_ADDR: {}", e)))?;

        Ok(Self {
            options_api_url,
            options_api_key,
            openai_api_base,
            openai_api_key,
            bind_addr,
        })
    }
}

// Keys are deliberately left out so the config can be logged.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("options_api_url", &self.options_api_url.as_str())
            .field("openai_api_base", &self.openai_api_base.as_str())
            .field("bind_addr", &self.bind_addr)
            .finish_non_exhaustive()
    }
}

fn parse_url(name: &str, value: &str) -> Result<Url> {
    Url::parse(value).map_err(|e| AppError::Config(format!("Invalid {}: {}", name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_keys_are_set() {
        let config = Config::from_lookup(lookup(&[
            ("FINANCIAL_API_KEY", "fin"),
            ("OPENAI_API_KEY", "sk-test"),
        ]))
        .unwrap();

        assert_eq!(config.options_api_url.as_str(), DEFAULT_OPTIONS_API_URL);
        assert_eq!(config.openai_api_base.as_str(), DEFAULT_OPENAI_API_BASE);
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.options_api_key, "fin");
    }

    #[test]
    fn missing_market_data_key_is_a_config_error() {
        let err = Config::from_lookup(lookup(&[("OPENAI_API_KEY", "sk-test")])).unwrap_err();
        assert!(matches!(err, AppError::Config(ref m) if m.contains("FINANCIAL_API_KEY")));
    }

    #[test]
    fn blank_llm_key_is_treated_as_missing() {
        let err = Config::from_lookup(lookup(&[
            ("FINANCIAL_API_KEY", "fin"),
            ("OPENAI_API_KEY", "   "),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::Config(ref m) if m.contains("OPENAI_API_KEY")));
    }

    #[test]
    fn invalid_endpoint_url_is_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("FINANCIAL_API_KEY", "fin"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPTIONS_API_URL", "not a url"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::Config(ref m) if m.contains("OPTIONS_API_URL")));
    }

    #[test]
    fn debug_output_hides_keys() {
        let config = Config::from_lookup(lookup(&[
            ("FINANCIAL_API_KEY", "fin-secret"),
            ("OPENAI_API_KEY", "sk-secret"),
        ]))
        .unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret"));
    }
}
