use anyhow::{bail, Result};
use startgg_client::config::DEFAULT_ENDPOINT;
use startgg_client::{ClientConfig, RetryPolicy};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Everything a run needs, read once from the environment (`.env` included).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub client:      ClientConfig,
    pub event_slug:  Option<String>,
    pub players_csv: PathBuf,
    pub output_dir:  PathBuf,
    pub log_dir:     PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = get("STARTGG_API_TOKEN").unwrap_or_default();
        if token.trim().is_empty() {
            bail!("STARTGG_API_TOKEN is not set (put it in .env)");
        }

        let number = |key: &str, default: u64| {
            get(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };
        let retry = RetryPolicy::new(
            number("STARTGG_RETRY_ATTEMPTS", 5) as u32,
            Duration::from_secs(number("STARTGG_RETRY_BACKOFF_SECS", 2)),
        );

        let client = ClientConfig::new(token.trim())
            .with_endpoint(get("STARTGG_API_URL").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()))
            .with_timeout(Duration::from_secs(number("STARTGG_TIMEOUT_SECS", 15)))
            .with_retry(retry);

        let path = |key: &str, default: &str| PathBuf::from(get(key).unwrap_or_else(|| default.to_string()));

        Ok(Self {
            client,
            event_slug:  get("EVENT_SLUG").filter(|s| !s.trim().is_empty()),
            players_csv: path("PLAYERS_CSV", "data/players.csv"),
            output_dir:  path("OUTPUT_DIR", "data"),
            log_dir:     path("LOG_DIR", "logs"),
        })
    }

    /// CLI argument first, then `EVENT_SLUG`.
    pub fn resolve_event_slug(&self, cli_arg: Option<String>) -> Result<String> {
        match cli_arg.filter(|s| !s.trim().is_empty()).or_else(|| self.event_slug.clone()) {
            Some(slug) => Ok(slug.trim().trim_matches('/').to_string()),
            None => bail!("no event slug: pass e.g. tournament/evo-2025/event/tekken-8 or set EVENT_SLUG"),
        }
    }
}

/// `tournament/evo-2025/event/tekken-8` -> `evo-2025`. Falls back to the whole slug
/// with `/` replaced, so the result is always usable as a file stem.
pub fn tournament_slug(event_slug: &str) -> String {
    let parts: Vec<&str> = event_slug.split('/').filter(|p| !p.is_empty()).collect();
    match parts.as_slice() {
        ["tournament", name, ..] => name.to_string(),
        _ => parts.join("_"),
    }
}
