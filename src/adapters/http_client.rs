//! Blocking HTTP client shared by the web gateway adapters.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::domain::config_validation::DEFAULT_TIMEOUT_SECS;
use crate::domain::error::DashboardError;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

#[derive(Debug, Clone, PartialEq)]
pub struct GatewaySettings {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS as u64),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl GatewaySettings {
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let secs = config.get_int("gateway", "timeout_secs", DEFAULT_TIMEOUT_SECS);
        Self {
            timeout: Duration::from_secs(u64::try_from(secs).unwrap_or(DEFAULT_TIMEOUT_SECS as u64)),
            user_agent: config
                .get_string("gateway", "user_agent")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        }
    }

    pub fn build_client(&self) -> Result<Client, DashboardError> {
        Client::builder()
            .user_agent(self.user_agent.clone())
            .timeout(self.timeout)
            .build()
            .map_err(|e| DashboardError::Io(std::io::Error::other(e)))
    }
}

/// GET `url` and return the body; non-2xx statuses are errors.
pub fn fetch_text(client: &Client, url: &str) -> Result<String, reqwest::Error> {
    client.get(url).send()?.error_for_status()?.text()
}
