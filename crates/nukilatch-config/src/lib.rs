//! Configuration for the nukilatch binary.
//!
//! TOML file + `NUKILATCH_` environment layering, bridge token resolution
//! (env + plaintext), and translation to `nukilatch_core::BridgeConfig`.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use nukilatch_core::BridgeConfig;

/// Environment variable consulted for the token when `token_env` is unset.
pub const TOKEN_ENV: &str = "NUKILATCH_TOKEN";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("missing {field}")]
    Missing { field: String },

    #[error("no bridge token configured (set bridge.token, bridge.token_env or {TOKEN_ENV})")]
    NoToken,

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub bridge: BridgeSection,

    #[serde(default)]
    pub accessory: AccessorySection,

    #[serde(default)]
    pub webhook: WebhookSection,
}

/// `[bridge]`: where the Nuki bridge lives and which lock to drive.
#[derive(Debug, Deserialize, Serialize)]
pub struct BridgeSection {
    /// Bridge hostname or IP.
    pub host: Option<String>,

    #[serde(default = "default_port")]
    pub port: u16,

    /// API token (plaintext, prefer `token_env`).
    pub token: Option<String>,

    /// Environment variable name containing the token.
    pub token_env: Option<String>,

    /// `nukiId` of the lock.
    pub nuki_id: Option<u64>,

    /// Per-request timeout in seconds. Unset waits indefinitely.
    pub timeout: Option<u64>,
}

impl Default for BridgeSection {
    fn default() -> Self {
        Self {
            host: None,
            port: default_port(),
            token: None,
            token_env: None,
            nuki_id: None,
            timeout: None,
        }
    }
}

fn default_port() -> u16 {
    8080
}

/// `[accessory]`: how the lock is presented to the host.
#[derive(Debug, Deserialize, Serialize)]
pub struct AccessorySection {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_relatch_delay_ms")]
    pub relatch_delay_ms: u64,
}

impl Default for AccessorySection {
    fn default() -> Self {
        Self {
            name: default_name(),
            relatch_delay_ms: default_relatch_delay_ms(),
        }
    }
}

fn default_name() -> String {
    "Nuki".into()
}
fn default_relatch_delay_ms() -> u64 {
    3000
}

/// `[webhook]`: the receiver the bridge pushes state changes to.
#[derive(Debug, Deserialize, Serialize)]
pub struct WebhookSection {
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,

    /// Host the bridge can reach us on. Combined with the listen port to
    /// form the callback URL.
    pub advertise_host: Option<String>,

    /// Full callback URL, overriding the derived one.
    pub callback_url: Option<String>,
}

impl Default for WebhookSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            advertise_host: None,
            callback_url: None,
        }
    }
}

fn default_listen() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8899))
}

impl WebhookSection {
    /// The URL to register with the bridge, if one can be formed.
    pub fn resolved_callback_url(&self) -> Option<String> {
        if let Some(ref url) = self.callback_url {
            return Some(url.clone());
        }
        self.advertise_host
            .as_ref()
            .map(|host| format!("http://{host}:{}/", self.listen.port()))
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "nukilatch", "nukilatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("nukilatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
///
/// `path` overrides the platform config path. A missing file is not an
/// error; defaults and environment still apply.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("NUKILATCH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Token resolution ────────────────────────────────────────────────

/// Resolve the bridge token from the credential chain.
pub fn resolve_token(bridge: &BridgeSection) -> Result<SecretString, ConfigError> {
    resolve_token_with(bridge, |name| std::env::var(name).ok())
}

fn resolve_token_with(
    bridge: &BridgeSection,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Section's token_env → env var lookup
    if let Some(ref env_name) = bridge.token_env {
        if let Some(val) = lookup(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Well-known env var
    if let Some(val) = lookup(TOKEN_ENV) {
        return Ok(SecretString::from(val));
    }

    // 3. Plaintext in config
    if let Some(ref token) = bridge.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoToken)
}

// ── Translation ─────────────────────────────────────────────────────

impl Config {
    /// Build the bridge base URL from `[bridge]`.
    pub fn bridge_url(&self) -> Result<url::Url, ConfigError> {
        let host = self.bridge.host.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "bridge.host".into(),
        })?;
        let raw = format!("http://{host}:{}/", self.bridge.port);
        raw.parse().map_err(|_| ConfigError::Validation {
            field: "bridge.host".into(),
            reason: format!("invalid URL: {raw}"),
        })
    }

    /// The configured `nukiId`.
    pub fn nuki_id(&self) -> Result<u64, ConfigError> {
        self.bridge.nuki_id.ok_or_else(|| ConfigError::Missing {
            field: "bridge.nuki_id".into(),
        })
    }

    /// Build a `BridgeConfig`, resolving the token from the environment.
    pub fn to_bridge_config(&self) -> Result<BridgeConfig, ConfigError> {
        let token = resolve_token(&self.bridge)?;
        self.to_bridge_config_with_token(token)
    }

    fn to_bridge_config_with_token(&self, token: SecretString) -> Result<BridgeConfig, ConfigError> {
        let bridge_url = self.bridge_url()?;
        let nuki_id = self.nuki_id()?;

        if self.accessory.name.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "accessory.name".into(),
                reason: "must not be empty".into(),
            });
        }

        let mut config = BridgeConfig::new(bridge_url, token, nuki_id);
        config.name.clone_from(&self.accessory.name);
        config.callback_url = self.webhook.resolved_callback_url();
        config.listen = self.webhook.listen;
        config.relatch_delay = Duration::from_millis(self.accessory.relatch_delay_ms);
        config.timeout = self.bridge.timeout.map(Duration::from_secs);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::HashMap;
    use std::io::Write as _;

    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("missing.toml"))).unwrap();

        assert_eq!(config.bridge.port, 8080);
        assert_eq!(config.accessory.name, "Nuki");
        assert_eq!(config.accessory.relatch_delay_ms, 3000);
        assert_eq!(config.webhook.listen, "0.0.0.0:8899".parse().unwrap());
        assert!(config.webhook.resolved_callback_url().is_none());
    }

    #[test]
    fn full_file() {
        let file = write_config(
            r#"
            [bridge]
            host = "192.168.1.20"
            nuki_id = 123456789
            token = "abc123"
            timeout = 10

            [accessory]
            name = "Front Door"
            relatch_delay_ms = 5000

            [webhook]
            listen = "0.0.0.0:9000"
            advertise_host = "192.168.1.10"
            "#,
        );

        let config = load_config(Some(file.path())).unwrap();
        let bridge = config
            .to_bridge_config_with_token(resolve_token_with(&config.bridge, no_env).unwrap())
            .unwrap();

        assert_eq!(bridge.bridge_url.as_str(), "http://192.168.1.20:8080/");
        assert_eq!(bridge.token.expose_secret(), "abc123");
        assert_eq!(bridge.nuki_id, 123_456_789);
        assert_eq!(bridge.name, "Front Door");
        assert_eq!(bridge.callback_url.as_deref(), Some("http://192.168.1.10:9000/"));
        assert_eq!(bridge.listen.port(), 9000);
        assert_eq!(bridge.relatch_delay, Duration::from_millis(5000));
        assert_eq!(bridge.timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn explicit_callback_url_wins() {
        let webhook = WebhookSection {
            advertise_host: Some("10.0.0.5".into()),
            callback_url: Some("http://proxy.local/nuki".into()),
            ..WebhookSection::default()
        };
        assert_eq!(
            webhook.resolved_callback_url().as_deref(),
            Some("http://proxy.local/nuki")
        );
    }

    #[test]
    fn missing_host_names_the_field() {
        let config = Config {
            bridge: BridgeSection {
                nuki_id: Some(1),
                ..BridgeSection::default()
            },
            ..Config::default()
        };

        let err = config
            .to_bridge_config_with_token(SecretString::from("t".to_string()))
            .unwrap_err();
        assert_eq!(err.to_string(), "missing bridge.host");
    }

    #[test]
    fn missing_nuki_id_names_the_field() {
        let config = Config {
            bridge: BridgeSection {
                host: Some("10.0.0.2".into()),
                ..BridgeSection::default()
            },
            ..Config::default()
        };

        let err = config
            .to_bridge_config_with_token(SecretString::from("t".to_string()))
            .unwrap_err();
        assert_eq!(err.to_string(), "missing bridge.nuki_id");
    }

    #[test]
    fn token_chain_order() {
        let env: HashMap<&str, &str> =
            HashMap::from([("MY_NUKI_TOKEN", "from-custom"), (TOKEN_ENV, "from-default")]);
        let lookup = |name: &str| env.get(name).map(|v| (*v).to_owned());

        let mut bridge = BridgeSection {
            token: Some("from-file".into()),
            token_env: Some("MY_NUKI_TOKEN".into()),
            ..BridgeSection::default()
        };
        assert_eq!(
            resolve_token_with(&bridge, lookup).unwrap().expose_secret(),
            "from-custom"
        );

        bridge.token_env = Some("UNSET_VAR".into());
        assert_eq!(
            resolve_token_with(&bridge, lookup).unwrap().expose_secret(),
            "from-default"
        );

        assert_eq!(
            resolve_token_with(&bridge, no_env).unwrap().expose_secret(),
            "from-file"
        );

        bridge.token = None;
        assert!(matches!(
            resolve_token_with(&bridge, no_env),
            Err(ConfigError::NoToken)
        ));
    }

    #[test]
    fn malformed_file_is_figment_error() {
        let file = write_config("[bridge]\nport = \"not a number\"\n");
        assert!(matches!(
            load_config(Some(file.path())),
            Err(ConfigError::Figment(_))
        ));
    }
}
