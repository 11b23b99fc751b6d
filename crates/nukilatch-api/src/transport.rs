// Transport configuration for building the bridge's reqwest::Client.
//
// The bridge speaks plain HTTP on the local network, so there is no TLS
// or cookie handling here. No request timeout is applied unless one is
// configured explicitly.

use std::time::Duration;

use crate::error::Error;

const USER_AGENT: &str = concat!("nukilatch/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    /// Whole-request timeout. `None` waits for the bridge indefinitely.
    pub timeout: Option<Duration>,
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder
            .build()
            .map_err(|e| Error::Client(format!("failed to build HTTP client: {e}")))
    }

    /// Set a whole-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_timeout() {
        assert!(TransportConfig::default().timeout.is_none());
    }

    #[test]
    fn builds_client_with_timeout() {
        let config = TransportConfig::default().with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert!(config.build_client().is_ok());
    }
}
