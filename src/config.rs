//! Runtime configuration
//!
//! Both provider secrets are required. A missing key fails at startup
//! instead of surfacing later as an opaque provider error.

use crate::error::AdvisorError;
use crate::Result;
use std::env;
use std::time::Duration;

pub const DEFAULT_GROQ_MODEL: &str = "llama3-70b-8192";
pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_ALPHA_VANTAGE_BASE_URL: &str = "https://www.alphavantage.co";
pub const DEFAULT_MARKET_DATA_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_API_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub groq_api_key: String,
    pub groq_model: String,
    pub groq_base_url: String,
    pub temperature: f32,
    pub alpha_vantage_api_key: String,
    pub alpha_vantage_base_url: String,
    pub market_data_timeout: Duration,
    pub api_port: u16,
}

impl AdvisorConfig {
    /// Load configuration from the process environment.
    ///
    /// Call `dotenv::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let groq_api_key = get("GROQ_API_KEY").ok_or_else(|| missing("GROQ_API_KEY"))?;
        let alpha_vantage_api_key =
            get("ALPHA_VANTAGE_API_KEY").ok_or_else(|| missing("ALPHA_VANTAGE_API_KEY"))?;

        let temperature = match get("LLM_TEMPERATURE") {
            Some(raw) => parse_number::<f32>("LLM_TEMPERATURE", &raw)?,
            None => DEFAULT_TEMPERATURE,
        };

        let timeout_secs = match get("MARKET_DATA_TIMEOUT_SECS") {
            Some(raw) => parse_number::<u64>("MARKET_DATA_TIMEOUT_SECS", &raw)?,
            None => DEFAULT_MARKET_DATA_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(AdvisorError::ConfigError(
                "MARKET_DATA_TIMEOUT_SECS must be at least 1".to_string(),
            ));
        }

        let port_var = ["PORT", "API_PORT"]
            .into_iter()
            .find_map(|name| get(name).map(|raw| (name, raw)));
        let api_port = match port_var {
            Some((name, raw)) => parse_number::<u16>(name, &raw)?,
            None => DEFAULT_API_PORT,
        };

        Ok(Self {
            groq_api_key,
            groq_model: get("GROQ_MODEL").unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string()),
            groq_base_url: get("GROQ_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GROQ_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            temperature,
            alpha_vantage_api_key,
            alpha_vantage_base_url: get("ALPHA_VANTAGE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_ALPHA_VANTAGE_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            market_data_timeout: Duration::from_secs(timeout_secs),
            api_port,
        })
    }
}

fn missing(name: &str) -> AdvisorError {
    AdvisorError::ConfigError(format!(
        "{} is not set. Add it to the environment or to a .env file.",
        name
    ))
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.parse::<T>().map_err(|_| {
        AdvisorError::ConfigError(format!("{} has an invalid value: {:?}", name, raw))
    })
}
