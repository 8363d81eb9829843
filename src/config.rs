//! File based configuration.
//!
//! A [`ServerConfig`] covers the plain-data part of the server options. The
//! pluggable policies (filters, message store, authenticator) are code and
//! are registered on the builder directly.
//!
//! ```toml
//! server_name = "mx.example.com"
//! max_message_size = 4096
//! allow_unsecure_authentication = false
//! endpoints = ["0.0.0.0:25", "0.0.0.0:587"]
//!
//! [tls]
//! certificate = "/etc/courier/cert.pem"
//! key = "/etc/courier/key.pem"
//! ```

use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Deserialize;

use crate::{
    error::{ConfigError, ConfigResult},
    internal,
    options::ServerOptionsBuilder,
    tls::{ServerCertificate, TlsContext},
};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "COURIER_CONFIG";

/// Locations searched, in order, when [`CONFIG_ENV`] is not set.
pub const DEFAULT_PATHS: [&str; 2] = ["./courier.toml", "/etc/courier/courier.toml"];

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default)]
    pub server_name: String,

    /// Maximum message size in bytes, 0 for no limit.
    #[serde(default)]
    pub max_message_size: usize,

    #[serde(default)]
    pub allow_unsecure_authentication: bool,

    #[serde(default)]
    pub endpoints: Vec<SocketAddr>,

    #[serde(default)]
    pub tls: Option<TlsContext>,
}

impl ServerConfig {
    /// Parse a configuration document.
    ///
    /// # Errors
    /// If the document is not valid TOML or does not match the schema.
    pub fn from_toml(document: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(document)?)
    }

    /// Read and parse a configuration file.
    ///
    /// # Errors
    /// If the file cannot be read or does not parse.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        internal!(level = DEBUG, "Loading configuration from {}", path.display());

        let document = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&document)
    }

    /// Find the configuration file using the following precedence:
    /// 1. `COURIER_CONFIG` environment variable
    /// 2. ./courier.toml (current working directory)
    /// 3. /etc/courier/courier.toml (system-wide config)
    ///
    /// # Errors
    /// If `COURIER_CONFIG` names a missing file, or none of the defaults exist.
    pub fn discover() -> ConfigResult<PathBuf> {
        let defaults = DEFAULT_PATHS.map(PathBuf::from);
        Self::discover_in(std::env::var_os(CONFIG_ENV).map(PathBuf::from), &defaults)
    }

    fn discover_in(overridden: Option<PathBuf>, defaults: &[PathBuf]) -> ConfigResult<PathBuf> {
        if let Some(path) = overridden {
            return if path.exists() {
                Ok(path)
            } else {
                Err(ConfigError::MissingOverride(path))
            };
        }

        defaults
            .iter()
            .find(|path| path.exists())
            .cloned()
            .ok_or_else(|| ConfigError::NotFound {
                tried: defaults.to_vec(),
            })
    }

    /// Copy this configuration onto `builder`, loading the TLS certificate
    /// when one is configured.
    ///
    /// Endpoints are appended after any the builder already holds.
    ///
    /// # Errors
    /// If the TLS certificate or key cannot be loaded.
    pub fn apply(self, mut builder: ServerOptionsBuilder) -> ConfigResult<ServerOptionsBuilder> {
        if let Some(tls) = self.tls.as_ref() {
            let certificate = ServerCertificate::load(tls)?;
            internal!(
                level = DEBUG,
                "Loaded {} certificate(s) from {}",
                certificate.chain().len(),
                tls.certificate.display()
            );
            builder.set_server_certificate(Arc::new(certificate));
        }

        builder
            .set_server_name(self.server_name)
            .set_max_message_size(self.max_message_size)
            .set_allow_unsecure_authentication(self.allow_unsecure_authentication);

        for endpoint in self.endpoints {
            builder.add_endpoint(endpoint);
        }

        Ok(builder)
    }
}
