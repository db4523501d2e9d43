use std::env;

use super::error::ConfigError;

/// All valid OpenAI secret keys start with this
pub const API_KEY_PREFIX: &str = "sk-";

pub const DEFAULT_CATALOG_PATH: &str = "backend/data/context.csv";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub catalog_path: String,
    pub openai_model: String,
    pub openai_api_hostname: String,
    pub openai_api_key: String,
    pub token_rate_limit: usize,
    pub chunk_size: usize,
}

impl AppConfig {
    /// Build the config from the process environment. Values from a
    /// `.env` file in the working directory are loaded first if one
    /// exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config using `lookup` to resolve each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let openai_api_key = lookup("OPENAI_API_KEY")
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;
        if !openai_api_key.starts_with(API_KEY_PREFIX) {
            return Err(ConfigError::InvalidApiKey(API_KEY_PREFIX));
        }

        let openai_api_hostname = lookup("CONCIERGE_LLM_HOST")
            .unwrap_or_else(|| "https://api.openai.com".to_string());
        let openai_model =
            lookup("CONCIERGE_LLM_MODEL").unwrap_or_else(|| "gpt-3.5-turbo".to_string());
        let catalog_path = catalog_path_from_lookup(&lookup);
        let token_rate_limit = parse_number(&lookup, "CONCIERGE_TOKEN_RATE_LIMIT", 20_000)?;
        let chunk_size = parse_number(&lookup, "CONCIERGE_CHUNK_SIZE", 20)?;

        Ok(Self {
            catalog_path,
            openai_model,
            openai_api_hostname,
            openai_api_key,
            token_rate_limit,
            chunk_size,
        })
    }
}

/// Where the catalog CSV lives. Only needs the environment, not a
/// valid API key, so offline commands can use it.
pub fn catalog_path_from_env() -> String {
    let _ = dotenvy::dotenv();
    catalog_path_from_lookup(&|name: &str| env::var(name).ok())
}

fn catalog_path_from_lookup<F>(lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup("CONCIERGE_CATALOG_PATH").unwrap_or_else(|| DEFAULT_CATALOG_PATH.to_string())
}

fn parse_number<F>(lookup: &F, name: &'static str, default: usize) -> Result<usize, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
    }
}
