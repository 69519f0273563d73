//! Application configuration loaded from the environment.
//!
//! A `.env` file is loaded first if present. The API key may also come from
//! a TOML secrets file:
//!
//! ```toml
//! [config]
//! openai_api_key = "sk-..."
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AnalyzerError, Result};
use crate::security::SecretString;
use crate::traits::research::Market;

pub const DEFAULT_DISCOVERY_MODEL: &str = "gpt-4.1";
pub const DEFAULT_EXTRACTION_MODEL: &str = "gpt-4o-search-preview";
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;

/// Secrets file read when no path is given, relative to the working directory.
pub const DEFAULT_SECRETS_FILE: &str = "secrets.toml";

const MISSING_KEY_HELP: &str = "OpenAI API key not found. Set it in one of these ways:
  1. export OPENAI_API_KEY=\"your_openai_api_key\"
  2. add OPENAI_API_KEY=your_openai_api_key to a .env file in this directory
  3. create secrets.toml (or pass --secrets <path>) containing:

     [config]
     openai_api_key = \"your_openai_api_key\"
";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: SecretString,
    /// `None` uses the client's default endpoint
    pub base_url: Option<String>,
    pub discovery_model: String,
    pub extraction_model: String,
    pub market: Market,
    pub request_timeout: Duration,
}

#[derive(Debug, Default, Deserialize)]
struct SecretsFile {
    #[serde(default)]
    config: SecretsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SecretsSection {
    openai_api_key: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables and the default
    /// secrets file.
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Load configuration, reading the API key fallback from `secrets_path`.
    ///
    /// An explicit path must exist; the default one is optional.
    pub fn load(secrets_path: Option<&Path>) -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();

        let file_key = match secrets_path {
            Some(path) => read_secrets_file(path)?,
            None => {
                let default = PathBuf::from(DEFAULT_SECRETS_FILE);
                if default.exists() {
                    read_secrets_file(&default)?
                } else {
                    None
                }
            }
        };

        Self::from_lookup(|name| env::var(name).ok(), file_key)
    }

    /// Build configuration from a variable lookup and an optional key read
    /// from a secrets file. The `OPENAI_API_KEY` variable wins over the file.
    pub fn from_lookup<F>(lookup: F, file_key: Option<SecretString>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = var("OPENAI_API_KEY")
            .map(SecretString::from)
            .or(file_key.filter(|k| !k.is_blank()))
            .ok_or_else(|| AnalyzerError::Config(MISSING_KEY_HELP.to_string()))?;

        let request_timeout = match var("MARKET_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().ok().filter(|s| *s > 0).ok_or_else(|| {
                AnalyzerError::Config(format!(
                    "MARKET_REQUEST_TIMEOUT_SECS must be a positive number of seconds, got {:?}",
                    raw
                ))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let defaults = Market::default();

        Ok(Self {
            api_key,
            base_url: var("OPENAI_BASE_URL"),
            discovery_model: var("MARKET_DISCOVERY_MODEL")
                .unwrap_or_else(|| DEFAULT_DISCOVERY_MODEL.to_string()),
            extraction_model: var("MARKET_EXTRACTION_MODEL")
                .unwrap_or_else(|| DEFAULT_EXTRACTION_MODEL.to_string()),
            market: Market {
                country: var("MARKET_COUNTRY")
                    .map(|c| c.to_uppercase())
                    .unwrap_or(defaults.country),
                city: var("MARKET_CITY").unwrap_or(defaults.city),
            },
            request_timeout: Duration::from_secs(request_timeout),
        })
    }
}

/// Read `[config] openai_api_key` from a TOML secrets file.
pub fn read_secrets_file(path: &Path) -> Result<Option<SecretString>> {
    let raw = fs::read_to_string(path).map_err(|e| {
        AnalyzerError::Config(format!("cannot read secrets file {}: {}", path.display(), e))
    })?;
    parse_secrets(&raw)
        .map_err(|e| AnalyzerError::Config(format!("invalid secrets file {}: {}", path.display(), e)))
}

fn parse_secrets(raw: &str) -> std::result::Result<Option<SecretString>, toml::de::Error> {
    let file: SecretsFile = toml::from_str(raw)?;
    Ok(file.config.openai_api_key.map(SecretString::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "sk-test")]), None).unwrap();

        assert_eq!(config.api_key.expose(), "sk-test");
        assert_eq!(config.discovery_model, "gpt-4.1");
        assert_eq!(config.extraction_model, "gpt-4o-search-preview");
        assert_eq!(config.market, Market::default());
        assert_eq!(config.request_timeout, Duration::from_secs(180));
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_missing_key_explains_remedy() {
        let err = AppConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "  ")]), None).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("OPENAI_API_KEY"));
        assert!(message.contains("openai_api_key"));
    }

    #[test]
    fn test_env_wins_over_secrets_file() {
        let config = AppConfig::from_lookup(
            lookup(&[("OPENAI_API_KEY", "sk-env")]),
            Some(SecretString::new("sk-file")),
        )
        .unwrap();
        assert_eq!(config.api_key.expose(), "sk-env");

        let config = AppConfig::from_lookup(lookup(&[]), Some(SecretString::new("sk-file"))).unwrap();
        assert_eq!(config.api_key.expose(), "sk-file");
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(
            lookup(&[
                ("OPENAI_API_KEY", "sk-test"),
                ("OPENAI_BASE_URL", "http://localhost:8080/v1"),
                ("MARKET_COUNTRY", "lv"),
                ("MARKET_CITY", "Riga"),
                ("MARKET_REQUEST_TIMEOUT_SECS", "30"),
            ]),
            None,
        )
        .unwrap();

        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8080/v1"));
        assert_eq!(config.market.country, "LV");
        assert_eq!(config.market.city, "Riga");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_bad_timeout_is_config_error() {
        let result = AppConfig::from_lookup(
            lookup(&[("OPENAI_API_KEY", "sk-test"), ("MARKET_REQUEST_TIMEOUT_SECS", "soon")]),
            None,
        );
        assert!(matches!(result, Err(AnalyzerError::Config(_))));
    }

    #[test]
    fn test_parse_secrets() {
        let key = parse_secrets("[config]\nopenai_api_key = \"sk-from-file\"\n")
            .unwrap()
            .unwrap();
        assert_eq!(key.expose(), "sk-from-file");

        assert!(parse_secrets("[other]\nx = 1\n").unwrap().is_none());
        assert!(parse_secrets("not = = toml").is_err());
    }

    #[test]
    fn test_explicit_missing_secrets_file_fails() {
        let result = read_secrets_file(Path::new("/nonexistent/secrets.toml"));
        assert!(matches!(result, Err(AnalyzerError::Config(_))));
    }
}
