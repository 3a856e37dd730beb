use crate::error::{Error, Result};
use crate::services::normalization::Classification;
use dotenvy::dotenv;
use std::env;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

pub const DEFAULT_LANGUAGE_SLUG_PREFIX: &str = "lang-";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub public_rps: u32,
    pub query_timeout_secs: u64,
    pub language_slug_prefix: String,
    pub classification_path: Option<String>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: get_env("DATABASE_URL")?,
            public_rps: get_env_parse_or("PUBLIC_RPS", 50)?,
            query_timeout_secs: get_env_parse_or("QUERY_TIMEOUT_SECS", 10)?,
            language_slug_prefix: env::var("LANGUAGE_SLUG_PREFIX")
                .unwrap_or_else(|_| DEFAULT_LANGUAGE_SLUG_PREFIX.to_string()),
            classification_path: env::var("CLASSIFICATION_PATH").ok(),
        })
    }
}

/// Everything the search engine needs at runtime. Built from [`Config`] in
/// production and constructed directly in tests.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub classification: Arc<Classification>,
    pub query_timeout: Duration,
    pub language_slug_prefix: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            classification: Arc::new(Classification::default()),
            query_timeout: Duration::from_secs(10),
            language_slug_prefix: DEFAULT_LANGUAGE_SLUG_PREFIX.to_string(),
        }
    }
}

impl EngineSettings {
    pub fn from_config(config: &Config) -> Result<Self> {
        let classification = match &config.classification_path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                let parsed: Classification = serde_json::from_str(&raw)?;
                tracing::info!(path = %path, cities = parsed.cities.len(), "Loaded classification tables");
                parsed
            }
            None => Classification::default(),
        };

        Ok(Self {
            classification: Arc::new(classification),
            query_timeout: Duration::from_secs(config.query_timeout_secs.max(1)),
            language_slug_prefix: config.language_slug_prefix.clone(),
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
