use crate::scoring::{
    ScoringRules, DEFAULT_HIGH_INTENT_SERVICES, DEFAULT_HIGH_VALUE_SOURCES,
    DEFAULT_HOT_THRESHOLD, DEFAULT_TARGET_CITIES, DEFAULT_WARM_THRESHOLD,
};
use std::collections::HashSet;
use std::fmt;

pub const DEFAULT_PORT: u16 = 8001;
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MESSAGE_CACHE_TTL_SECS: u64 = 300;

/// Settings for the OpenAI-compatible text-generation provider.
#[derive(Clone)]
pub struct LlmSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

impl fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// PostgreSQL URL; leads are kept in memory when unset.
    pub database_url: Option<String>,
    /// Allowed CORS origins; `["*"]` allows any origin.
    pub cors_origins: Vec<String>,
    pub llm: LlmSettings,
    /// TTL of cached generated messages; 0 disables the cache.
    pub message_cache_ttl_secs: u64,
    pub scoring: ScoringRules,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| std::env::var(key).ok())?;

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        match config.database_url {
            Some(ref url) => tracing::debug!(
                "Database URL: {}...",
                url.chars().take(20).collect::<String>()
            ),
            None => tracing::info!("No DATABASE_URL set, leads will be kept in memory"),
        }
        tracing::debug!("LLM Base URL: {}", config.llm.base_url);
        tracing::debug!("LLM Model: {}", config.llm.model);
        if config.llm.api_key.is_none() {
            tracing::warn!("LLM_API_KEY not set, follow-up messages will likely use templates");
        }
        tracing::debug!("CORS origins: {:?}", config.cors_origins);
        tracing::debug!(
            "Scoring thresholds: hot >= {}, warm >= {}",
            config.scoring.hot_threshold,
            config.scoring.warm_threshold
        );
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = var("PORT")
            .map(|p| {
                p.trim()
                    .parse::<u16>()
                    .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))
            })
            .transpose()?
            .unwrap_or(DEFAULT_PORT);

        let database_url = var("DATABASE_URL")
            .or_else(|| var("DB_URL"))
            .map(|url| {
                if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
                    anyhow::bail!("DATABASE_URL must start with postgresql:// or postgres://");
                }
                Ok(url)
            })
            .transpose()?;

        let cors_origins = var("CORS_ORIGINS")
            .map(|raw| split_list(&raw))
            .filter(|origins| !origins.is_empty())
            .unwrap_or_else(|| vec!["*".to_string()]);

        let llm = LlmSettings {
            base_url: var("LLM_BASE_URL")
                .map(|url| {
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        anyhow::bail!("LLM_BASE_URL must start with http:// or https://");
                    }
                    Ok(url.trim_end_matches('/').to_string())
                })
                .transpose()?
                .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
            api_key: var("LLM_API_KEY"),
            model: var("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            timeout_secs: parse_number(var("LLM_TIMEOUT_SECS"), "LLM_TIMEOUT_SECS")?
                .unwrap_or(DEFAULT_LLM_TIMEOUT_SECS),
        };
        if llm.timeout_secs == 0 {
            anyhow::bail!("LLM_TIMEOUT_SECS must be greater than zero");
        }

        let message_cache_ttl_secs =
            parse_number(var("MESSAGE_CACHE_TTL_SECS"), "MESSAGE_CACHE_TTL_SECS")?
                .unwrap_or(DEFAULT_MESSAGE_CACHE_TTL_SECS);

        let hot_threshold = parse_number(var("SCORING_HOT_THRESHOLD"), "SCORING_HOT_THRESHOLD")?
            .unwrap_or(DEFAULT_HOT_THRESHOLD);
        let warm_threshold = parse_number(var("SCORING_WARM_THRESHOLD"), "SCORING_WARM_THRESHOLD")?
            .unwrap_or(DEFAULT_WARM_THRESHOLD);
        if hot_threshold > 100 {
            anyhow::bail!("SCORING_HOT_THRESHOLD cannot exceed 100");
        }
        if warm_threshold >= hot_threshold {
            anyhow::bail!(
                "SCORING_WARM_THRESHOLD ({}) must be lower than SCORING_HOT_THRESHOLD ({})",
                warm_threshold,
                hot_threshold
            );
        }

        let scoring = ScoringRules {
            high_intent_services: list_or_default(
                var("SCORING_HIGH_INTENT_SERVICES"),
                DEFAULT_HIGH_INTENT_SERVICES,
            ),
            target_cities: list_or_default(var("SCORING_TARGET_CITIES"), DEFAULT_TARGET_CITIES),
            high_value_sources: list_or_default(
                var("SCORING_HIGH_VALUE_SOURCES"),
                DEFAULT_HIGH_VALUE_SOURCES,
            ),
            hot_threshold,
            warm_threshold,
            ..ScoringRules::default()
        };

        Ok(Self {
            port,
            database_url,
            cors_origins,
            llm,
            message_cache_ttl_secs,
            scoring,
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn list_or_default(raw: Option<String>, defaults: &[&str]) -> HashSet<String> {
    match raw {
        Some(raw) => split_list(&raw).into_iter().collect(),
        None => defaults.iter().map(|s| s.to_string()).collect(),
    }
}

fn parse_number<T: std::str::FromStr>(raw: Option<String>, name: &str) -> anyhow::Result<Option<T>> {
    raw.map(|v| {
        v.trim()
            .parse::<T>()
            .map_err(|_| anyhow::anyhow!("{} must be a non-negative integer, got '{}'", name, v))
    })
    .transpose()
}
