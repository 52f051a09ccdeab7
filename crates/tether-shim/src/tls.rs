//! Trust-anchor TLS configuration.
//!
//! The trust anchor is read from a fixed, well-known path at channel-build
//! time. Load failure is fatal: a missing or unreadable trust anchor with
//! TLS requested means the operator asked for a secured channel the shim
//! cannot deliver, and silently degrading to plaintext would mask the
//! misconfiguration.

use std::{fs::File, io, path::Path, sync::Arc};

use rustls::RootCertStore;

/// Fixed filesystem path of the peer trust anchor.
pub const TRUST_ANCHOR_PATH: &str = "/root/certs/rootcert.pem";

/// A TLS channel could not be configured. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum ChannelSetupError {
    /// The trust-anchor file could not be read.
    #[error("failed to read trust anchor {path}: {source}")]
    TrustAnchorRead {
        /// Path that was attempted.
        path: String,
        /// The read failure.
        #[source]
        source: io::Error,
    },

    /// The trust-anchor file held no usable certificate.
    #[error("trust anchor {path} contains no usable certificate")]
    TrustAnchorEmpty {
        /// Path that was read.
        path: String,
    },

    /// The authority (or host) is not a valid server name for certificate
    /// validation.
    #[error("`{authority}` is not a valid server name")]
    InvalidAuthority {
        /// The offending name.
        authority: String,
    },
}

/// Builds a client TLS configuration rooted at the given trust anchor.
///
/// # Errors
///
/// Returns [`ChannelSetupError`] if the file cannot be read or yields no
/// usable certificate.
pub fn build_client_config(trust_anchor: &Path) -> Result<Arc<rustls::ClientConfig>, ChannelSetupError> {
    let certs = read_trust_anchor(trust_anchor)?;

    let mut roots = RootCertStore::empty();
    let (added, _ignored) = roots.add_parsable_certificates(certs);
    if added == 0 {
        return Err(ChannelSetupError::TrustAnchorEmpty {
            path: trust_anchor.display().to_string(),
        });
    }

    let config = rustls::ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();
    Ok(Arc::new(config))
}

fn read_trust_anchor(
    path: &Path,
) -> Result<Vec<rustls::pki_types::CertificateDer<'static>>, ChannelSetupError> {
    let read_err = |source| ChannelSetupError::TrustAnchorRead {
        path: path.display().to_string(),
        source,
    };

    let file = File::open(path).map_err(read_err)?;
    let mut reader = io::BufReader::new(file);
    rustls_pemfile::certs(&mut reader).collect::<Result<Vec<_>, _>>().map_err(read_err)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_trust_anchor_is_fatal() {
        let result = build_client_config(Path::new("/nonexistent/rootcert.pem"));
        assert!(matches!(result, Err(ChannelSetupError::TrustAnchorRead { .. })));
    }

    #[test]
    fn empty_trust_anchor_is_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is not a certificate").unwrap();

        let result = build_client_config(file.path());
        assert!(matches!(result, Err(ChannelSetupError::TrustAnchorEmpty { .. })));
    }

    #[test]
    fn self_signed_trust_anchor_loads() {
        let cert = rcgen::generate_simple_self_signed(vec!["peer0.example.com".to_string()])
            .unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(cert.cert.pem().as_bytes()).unwrap();

        build_client_config(file.path()).unwrap();
    }
}
