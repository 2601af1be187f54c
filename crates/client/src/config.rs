//! Client configuration loading.

use figment::Figment;
use figment::providers::{Format, Serialized, Toml};
use std::path::Path;
use ucat_core::{ClientConfig, Error};

/// Load client configuration from an optional TOML file.
///
/// Values missing from the file (or a missing file) fall back to
/// [`ClientConfig::default`]. The result is validated before it is returned.
pub fn load_client_config(path: Option<&Path>) -> Result<ClientConfig, Error> {
    let mut figment = Figment::from(Serialized::defaults(ClientConfig::default()));

    if let Some(path) = path {
        if path.exists() {
            figment = figment.merge(Toml::file(path));
        } else {
            tracing::debug!(path = %path.display(), "client config not found, using defaults");
        }
    }

    let config: ClientConfig = figment
        .extract()
        .map_err(|e| Error::Config(format!("failed to load client configuration: {e}")))?;
    config.validate().map_err(Error::Config)?;
    Ok(config)
}
