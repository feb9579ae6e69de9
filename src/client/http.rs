//! Blocking HTTP transport construction

use crate::config::ClientConfig;
use crate::error::ConfigError;
use reqwest::blocking::Client;

/// Create the blocking HTTP client used for every CSE request
///
/// Timeouts come from the configuration; the client holds no other policy
/// (no retries, no redirects to other hosts).
///
/// # Errors
///
/// Returns an error if the client cannot be built (e.g., TLS backend failure).
pub fn create_client(config: &ClientConfig) -> Result<Client, ConfigError> {
    Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .timeout(config.timeout())
        .connect_timeout(config.connect_timeout())
        .tcp_nodelay(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .map_err(|e| ConfigError::Transport(e.to_string()))
}
