use crate::retry::RetryPolicy;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.start.gg/gql/alpha";
pub const DEFAULT_USER_AGENT: &str = "bracket-watch/0.1";

/// Immutable client settings, handed to the `Fetcher` at construction.
#[derive(Clone)]
pub struct ClientConfig {
    pub endpoint:   String,
    pub token:      String,
    pub user_agent: String,
    pub timeout:    Duration,
    pub retry:      RetryPolicy,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            endpoint:   DEFAULT_ENDPOINT.to_string(),
            token:      token.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout:    Duration::from_secs(15),
            retry:      RetryPolicy::default(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

// PAT never ends up in logs
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_token() {
        let config = ClientConfig::new("secret-pat-value");
        let printed = format!("{config:?}");
        assert!(!printed.contains("secret-pat-value"));
        assert!(printed.contains(DEFAULT_ENDPOINT));
    }

    #[test]
    fn defaults_match_start_gg_retry_contract() {
        let config = ClientConfig::new("t");
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.backoff, Duration::from_secs(2));
    }
}
