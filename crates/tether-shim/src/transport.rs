//! Production TCP transport, plaintext or TLS.

use std::{io, path::Path};

use async_trait::async_trait;
use rustls::pki_types::ServerName;
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::TcpStream,
};
use tokio_rustls::TlsConnector;

use tether_core::{Config, Transport};

use crate::tls::{self, ChannelSetupError};

struct TlsParams {
    connector: TlsConnector,
    server_name: ServerName<'static>,
}

/// TCP transport for the engine: plain TCP, or TLS rooted at the fixed
/// trust anchor when security is enabled.
pub struct TcpTransport {
    tls: Option<TlsParams>,
}

impl TcpTransport {
    /// Builds the transport for the given configuration.
    ///
    /// With TLS enabled this loads the trust anchor and resolves the name
    /// presented for certificate validation — the authority override when
    /// one is configured, the literal host otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelSetupError`] (fatal) if the trust anchor is
    /// unusable or the validation name is not a valid server name.
    pub fn from_config(config: &Config) -> Result<Self, ChannelSetupError> {
        if !config.tls_enabled {
            return Ok(Self { tls: None });
        }

        let authority = config
            .authority_override
            .clone()
            .unwrap_or_else(|| config.host.clone());
        tracing::debug!(authority = %authority, "validating peer certificate against");
        let server_name = ServerName::try_from(authority.clone())
            .map_err(|_| ChannelSetupError::InvalidAuthority { authority })?;

        let client_config = tls::build_client_config(Path::new(tls::TRUST_ANCHOR_PATH))?;

        Ok(Self {
            tls: Some(TlsParams { connector: TlsConnector::from(client_config), server_name }),
        })
    }
}

#[async_trait]
impl Transport for TcpTransport {
    type SendStream = Box<dyn AsyncWrite + Unpin + Send>;
    type RecvStream = Box<dyn AsyncRead + Unpin + Send>;

    async fn connect(&self, address: &str) -> io::Result<(Self::SendStream, Self::RecvStream)> {
        let stream = TcpStream::connect(address).await?;

        match &self.tls {
            Some(params) => {
                let stream = params.connector.connect(params.server_name.clone(), stream).await?;
                let (recv, send) = tokio::io::split(stream);
                Ok((Box::new(send), Box::new(recv)))
            }
            None => {
                let (recv, send) = tokio::io::split(stream);
                Ok((Box::new(send), Box::new(recv)))
            }
        }
    }
}
