use anyhow::{Context, Result};

const DEFAULT_NEWS_FEED: &str = "https://feeds.yle.fi/uutiset/v1/recent.rss?publisherIds=YLE_UUTISET";

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Without a key the classifier runs on keyword rules only and the agent
    /// answers with a fixed "unavailable" reply.
    pub anthropic_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub news_feed_urls: Vec<String>,
    pub max_tool_rounds: u32,
    pub news_days_back: i64,
    pub score_days_back: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            news_feed_urls: std::env::var("NEWS_FEED_URLS")
                .map(|raw| parse_feed_list(&raw))
                .unwrap_or_else(|_| vec![DEFAULT_NEWS_FEED.to_string()]),
            max_tool_rounds: parse_env("MAX_TOOL_ROUNDS", 8)?,
            news_days_back: parse_env("NEWS_DAYS_BACK", 14)?,
            score_days_back: parse_env("SCORE_DAYS_BACK", 30)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .ok()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn parse_feed_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}
