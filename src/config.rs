use std::env;
use std::str::FromStr;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_MODEL_URL: &str = "https://api-inference.huggingface.co/models/distilbert-base-uncased-finetuned-sst-2-english";
pub const DEFAULT_BATCH_SIZE: usize = 16;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },
}

/// Which classifier backs the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierBackend {
    /// Hosted DistilBERT SST-2 text-classification endpoint
    Remote,
    /// Built-in word list scorer for offline use
    Lexicon,
}

impl FromStr for ClassifierBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lexicon" => Ok(ClassifierBackend::Lexicon),
            "remote" => Ok(ClassifierBackend::Remote),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub batch_size: usize,
    pub max_upload_bytes: usize,
    pub backend: ClassifierBackend,
    pub model_url: String,
    pub model_token: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Unset variables fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let batch_size: usize = parse_or(&lookup, "SENTIMENT_BATCH_SIZE", DEFAULT_BATCH_SIZE)?;
        if batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "SENTIMENT_BATCH_SIZE",
                value: "0".to_string(),
            });
        }

        let backend = match lookup("SENTIMENT_BACKEND") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: "SENTIMENT_BACKEND",
                value: raw,
            })?,
            None => ClassifierBackend::Remote,
        };

        Ok(ServerConfig {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 8000)?,
            batch_size,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            backend,
            model_url: lookup("SENTIMENT_MODEL_URL").unwrap_or_else(|| DEFAULT_MODEL_URL.to_string()),
            model_token: lookup("SENTIMENT_MODEL_TOKEN").filter(|t| !t.is_empty()),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Dashboard settings
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("ANALYZER_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        ClientConfig { api_url }
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value: raw }),
        None => Ok(default),
    }
}
