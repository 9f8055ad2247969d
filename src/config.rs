//! Configuration management for the Abovesaid server

use serde::Deserialize;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub analysis: AnalysisConfig,
    pub highlight: HighlightSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Sentence classification (Groq)
    pub classifier: ProviderConfig,
    /// Fact checking (Perplexity)
    pub fact_check: ProviderConfig,
}

/// An OpenAI-compatible chat completion endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub api_url: String,
    /// Requests fail with `NotConfigured` while this is unset
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HighlightSettings {
    /// Run incoming page HTML through the sanitizer before parsing
    pub sanitize: bool,
    /// Source links shown per tooltip
    pub max_sources: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

impl ProviderConfig {
    pub fn groq() -> Self {
        Self {
            api_url: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            api_key: None,
            model: "llama-3.1-8b-instant".to_string(),
            temperature: 0.3,
            max_tokens: 4096,
        }
    }

    pub fn perplexity() -> Self {
        Self {
            api_url: "https://api.perplexity.ai/chat/completions".to_string(),
            api_key: None,
            model: "sonar".to_string(),
            temperature: 0.2,
            max_tokens: 2000,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }

    fn from_env(prefix: &str, defaults: Self) -> Self {
        Self {
            api_url: env::var(format!("{}_API_URL", prefix)).unwrap_or(defaults.api_url),
            api_key: env::var(format!("{}_API_KEY", prefix))
                .ok()
                .filter(|key| !key.trim().is_empty()),
            model: env::var(format!("{}_MODEL", prefix)).unwrap_or(defaults.model),
            ..defaults
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: "sqlite:./abovesaid.db".to_string(),
            },
            analysis: AnalysisConfig {
                classifier: ProviderConfig::groq(),
                fact_check: ProviderConfig::perplexity(),
            },
            highlight: HighlightSettings {
                sanitize: true,
                max_sources: 3,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var("SERVER_PORT", defaults.server.port)?,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or(defaults.database.url),
            },
            analysis: AnalysisConfig {
                classifier: ProviderConfig::from_env("GROQ", defaults.analysis.classifier),
                fact_check: ProviderConfig::from_env("PERPLEXITY", defaults.analysis.fact_check),
            },
            highlight: HighlightSettings {
                sanitize: parse_flag("HIGHLIGHT_SANITIZE", defaults.highlight.sanitize)?,
                max_sources: parse_var("HIGHLIGHT_MAX_SOURCES", defaults.highlight.max_sources)?,
            },
        })
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(default),
    }
}

fn parse_flag(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(name) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue { name, value }),
        },
        Err(_) => Ok(default),
    }
}
