//! TLS acceptor construction
//!
//! Reads the PEM certificate chain and private key named in the config
//! and builds the rustls acceptor every session handshakes through.

use anyhow::{anyhow, Context};
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use tokio_rustls::rustls::pki_types::{CertificateDer, PrivateKeyDer};
use tokio_rustls::rustls::ServerConfig;
use tokio_rustls::TlsAcceptor;

use crate::config::TlsConfig;

pub fn build_acceptor(config: &TlsConfig) -> anyhow::Result<TlsAcceptor> {
    let mut cert_reader = BufReader::new(
        File::open(&config.cert_path)
            .with_context(|| format!("opening TLS certificate {}", config.cert_path.display()))?,
    );
    let certs: Vec<CertificateDer<'static>> = rustls_pemfile::certs(&mut cert_reader)
        .collect::<Result<_, _>>()
        .context("reading TLS certificate chain")?;
    if certs.is_empty() {
        return Err(anyhow!(
            "no certificates found in {}",
            config.cert_path.display()
        ));
    }

    let mut key_reader = BufReader::new(
        File::open(&config.key_path)
            .with_context(|| format!("opening TLS private key {}", config.key_path.display()))?,
    );
    let key: PrivateKeyDer<'static> = rustls_pemfile::private_key(&mut key_reader)
        .context("reading TLS private key")?
        .ok_or_else(|| anyhow!("no private key found in {}", config.key_path.display()))?;

    let server_config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .context("building TLS server config")?;

    Ok(TlsAcceptor::from(Arc::new(server_config)))
}
