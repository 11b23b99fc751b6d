//! CLI configuration: a thin wrapper around `nukilatch_config`.
//!
//! Loads the layered config and applies `GlobalOpts` flag overrides
//! (--host, --port, --nuki-id) on top.

use std::path::PathBuf;
use std::time::Duration;

use nukilatch_config::{Config, config_path, load_config, resolve_token};
use nukilatch_core::{BridgeClient, BridgeConfig, TransportConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Config as loaded for one invocation, with flag overrides applied.
pub struct Loaded {
    pub config: Config,
    pub path: PathBuf,
}

/// Load config from `--config` (or the platform path) + env + flags.
pub fn load(global: &GlobalOpts) -> Result<Loaded, CliError> {
    let path = global.config.clone().unwrap_or_else(config_path);
    let mut config = load_config(Some(&path)).map_err(|e| CliError::config(&path, e))?;

    // Flag overrides take priority over file and env.
    if let Some(ref host) = global.host {
        config.bridge.host = Some(host.clone());
    }
    if let Some(port) = global.port {
        config.bridge.port = port;
    }
    if let Some(nuki_id) = global.nuki_id {
        config.bridge.nuki_id = Some(nuki_id);
    }

    Ok(Loaded { config, path })
}

impl Loaded {
    /// A bare bridge client, for commands that don't need a lock id.
    pub fn client(&self) -> Result<BridgeClient, CliError> {
        let url = self.config.bridge_url().map_err(|e| CliError::config(&self.path, e))?;
        let token = resolve_token(&self.config.bridge).map_err(|e| CliError::config(&self.path, e))?;
        let transport = TransportConfig {
            timeout: self.config.bridge.timeout.map(Duration::from_secs),
        };
        Ok(BridgeClient::new(url, token, &transport)?)
    }

    pub fn nuki_id(&self) -> Result<u64, CliError> {
        self.config.nuki_id().map_err(|e| CliError::config(&self.path, e))
    }

    pub fn bridge_config(&self) -> Result<BridgeConfig, CliError> {
        self.config
            .to_bridge_config()
            .map_err(|e| CliError::config(&self.path, e))
    }
}
