// Bridge HTTP client
//
// Wraps `reqwest::Client` with bridge URL construction, token injection and
// JSON decoding. Endpoint groups (devices, callbacks, actions) are
// implemented as inherent methods in separate files to keep this module
// focused on transport mechanics.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw HTTP client for the Nuki Bridge HTTP API.
///
/// Every endpoint is a `GET` with query parameters; the bridge token is
/// appended to each request as `token=...`.
pub struct BridgeClient {
    http: reqwest::Client,
    base_url: Url,
    token: SecretString,
}

impl BridgeClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the bridge root, e.g. `http://192.168.1.50:8080/`.
    pub fn new(
        base_url: Url,
        token: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, token))
    }

    /// Create a client for `http://{host}:{port}/`.
    pub fn from_host(
        host: &str,
        port: u16,
        token: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let base_url = Url::parse(&format!("http://{host}:{port}/"))?;
        Self::new(base_url, token, transport)
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, token: SecretString) -> Self {
        Self {
            http,
            base_url: with_trailing_slash(base_url),
            token,
        }
    }

    /// The bridge base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Resolve an endpoint path (without leading slash) against the base URL.
    pub(crate) fn endpoint_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    /// Send an authenticated GET and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.endpoint_url(path)?;
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .query(&[("token", self.token.expose_secret())])
            .query(params)
            .send()
            .await
            .map_err(redacted)?;

        let status = resp.status();
        let body = resp.text().await.map_err(redacted)?;

        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}

/// Wrap a transport error with the token query stripped from its URL.
fn redacted(mut err: reqwest::Error) -> Error {
    if let Some(url) = err.url_mut() {
        url.set_query(None);
    }
    Error::Transport(err)
}

/// `Url::join` drops the last path segment unless it ends in `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn client(base: &str) -> BridgeClient {
        BridgeClient::with_client(
            reqwest::Client::new(),
            Url::parse(base).unwrap(),
            SecretString::from("secret".to_string()),
        )
    }

    #[test]
    fn endpoint_url_at_root() {
        let c = client("http://192.168.1.50:8080");
        assert_eq!(
            c.endpoint_url("callback/list").unwrap().as_str(),
            "http://192.168.1.50:8080/callback/list"
        );
    }

    #[test]
    fn endpoint_url_keeps_base_path() {
        let c = client("http://proxy.local/nuki");
        assert_eq!(
            c.endpoint_url("list").unwrap().as_str(),
            "http://proxy.local/nuki/list"
        );
    }

    #[test]
    fn from_host_builds_http_url() {
        let c = BridgeClient::from_host(
            "10.0.0.2",
            8080,
            SecretString::from("t".to_string()),
            &TransportConfig::default(),
        )
        .unwrap();
        assert_eq!(c.base_url().as_str(), "http://10.0.0.2:8080/");
    }
}
