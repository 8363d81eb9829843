use std::{fs::File, io::BufReader, path::Path, sync::Arc};

use serde::Deserialize;
use tokio_rustls::rustls::{
    ServerConfig,
    pki_types::{CertificateDer, PrivateKeyDer},
};

use crate::error::{TlsError, TlsResult};

/// Where to find the PEM encoded certificate chain and private key.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TlsContext {
    pub certificate: std::path::PathBuf,
    pub key: std::path::PathBuf,
}

/// The certificate a listener presents when a session upgrades via STARTTLS.
///
/// Holding one in the server options is what makes a server TLS capable.
#[derive(Debug)]
pub struct ServerCertificate {
    chain: Vec<CertificateDer<'static>>,
    key: PrivateKeyDer<'static>,
}

impl ServerCertificate {
    pub const fn new(chain: Vec<CertificateDer<'static>>, key: PrivateKeyDer<'static>) -> Self {
        Self { chain, key }
    }

    /// Load the certificate chain and key named by `context`.
    ///
    /// # Errors
    /// If either file cannot be read, or contains no usable PEM entries.
    pub fn load(context: &TlsContext) -> TlsResult<Self> {
        let chain = Self::load_certs(&context.certificate)?;
        let key = Self::load_key(&context.key)?;

        Ok(Self { chain, key })
    }

    fn load_certs(path: &Path) -> TlsResult<Vec<CertificateDer<'static>>> {
        let certificate_error = |source| TlsError::CertificateLoad {
            path: path.display().to_string(),
            source,
        };

        let file = File::open(path).map_err(certificate_error)?;
        let chain = rustls_pemfile::certs(&mut BufReader::new(file))
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(certificate_error)?;

        if chain.is_empty() {
            return Err(TlsError::NoCertificates(path.display().to_string()));
        }

        Ok(chain)
    }

    fn load_key(path: &Path) -> TlsResult<PrivateKeyDer<'static>> {
        let key_error = |reason: String| TlsError::KeyLoad {
            path: path.display().to_string(),
            reason,
        };

        let file = File::open(path).map_err(|err| key_error(err.to_string()))?;

        rustls_pemfile::private_key(&mut BufReader::new(file))
            .map_err(|err| key_error(err.to_string()))?
            .ok_or_else(|| key_error("no private key found".to_string()))
    }

    pub fn chain(&self) -> &[CertificateDer<'static>] {
        &self.chain
    }

    pub const fn key(&self) -> &PrivateKeyDer<'static> {
        &self.key
    }

    /// Build the rustls configuration a TLS acceptor needs.
    ///
    /// # Errors
    /// If rustls rejects the certificate or key.
    pub fn server_config(&self) -> TlsResult<Arc<ServerConfig>> {
        let config = ServerConfig::builder()
            .with_no_client_auth()
            .with_single_cert(self.chain.clone(), self.key.clone_key())?;

        Ok(Arc::new(config))
    }
}
