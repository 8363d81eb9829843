//! Error types for loading server options.
//!
//! Building and reading options never fails. Only the configuration layer,
//! which touches the filesystem, produces these.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that can occur while loading a configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration document is not valid TOML for this schema.
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The TLS section referenced material that could not be loaded.
    #[error("TLS configuration error: {0}")]
    Tls(#[from] TlsError),

    /// `COURIER_CONFIG` is set but names a file that does not exist.
    #[error("COURIER_CONFIG points to non-existent file: {}", .0.display())]
    MissingOverride(PathBuf),

    /// No configuration file was found in any of the default locations.
    #[error("No configuration file found. Tried COURIER_CONFIG and {}", join_paths(.tried))]
    NotFound { tried: Vec<PathBuf> },
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors that can occur while loading TLS certificate material.
#[derive(Debug, Error)]
pub enum TlsError {
    /// Failed to load TLS certificate.
    #[error("Failed to load TLS certificate from {path}: {source}")]
    CertificateLoad {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The certificate file parsed but contained no certificates.
    #[error("No certificates found in {0}")]
    NoCertificates(String),

    /// Failed to load TLS private key.
    #[error("Failed to load TLS private key from {path}: {reason}")]
    KeyLoad { path: String, reason: String },

    /// Rustls library error.
    #[error("TLS error: {0}")]
    Rustls(String),
}

impl From<tokio_rustls::rustls::Error> for TlsError {
    fn from(err: tokio_rustls::rustls::Error) -> Self {
        Self::Rustls(err.to_string())
    }
}

/// Specialized `Result` type for configuration loading.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized `Result` type for TLS material loading.
pub type TlsResult<T> = std::result::Result<T, TlsError>;
