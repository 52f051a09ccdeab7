//! Connection parameters and peer-address parsing.
//!
//! Configuration failures are the one place the engine is forgiving: a
//! malformed peer address is reported to the caller, who logs it and keeps
//! the defaults. Everything after configuration is fail-fast.

/// Default peer host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default peer port.
pub const DEFAULT_PORT: u16 = 7051;

/// Connection parameters for one engine run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Peer host name or address.
    pub host: String,
    /// Peer port.
    pub port: u16,
    /// Negotiate TLS on the channel.
    pub tls_enabled: bool,
    /// Authority presented for certificate validation instead of the
    /// literal host. Only meaningful with TLS.
    pub authority_override: Option<String>,
    /// Identity carried in the REGISTER frame. Fixed at process start.
    pub identity: String,
}

impl Config {
    /// Default parameters for the given contract identity.
    #[must_use]
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            tls_enabled: false,
            authority_override: None,
            identity: identity.into(),
        }
    }

    /// `host:port` form of the configured peer endpoint.
    #[must_use]
    pub fn peer_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Replaces host and port from a `host:port` string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] and leaves the current values untouched if
    /// the address does not parse.
    pub fn set_peer_address(&mut self, address: &str) -> Result<(), ConfigError> {
        let (host, port) = parse_peer_address(address)?;
        self.host = host;
        self.port = port;
        Ok(())
    }
}

/// Splits `host:port` on the first colon.
///
/// # Errors
///
/// Returns [`ConfigError::MissingPort`] when the input has no colon and
/// [`ConfigError::InvalidPort`] when the remainder is not a valid port
/// number.
pub fn parse_peer_address(address: &str) -> Result<(String, u16), ConfigError> {
    let Some((host, port)) = address.split_once(':') else {
        return Err(ConfigError::MissingPort { address: address.to_string() });
    };
    let port = port
        .parse()
        .map_err(|source| ConfigError::InvalidPort { address: address.to_string(), source })?;
    Ok((host.to_string(), port))
}

/// A configuration input that failed to parse. Non-fatal by policy: the
/// caller logs it and retains defaults.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The peer address had no `:` separator.
    #[error("peer address `{address}` has no port (expected host:port)")]
    MissingPort {
        /// The offending input.
        address: String,
    },

    /// The port part was not a number in range.
    #[error("peer address `{address}` has an invalid port")]
    InvalidPort {
        /// The offending input.
        address: String,
        /// The port parse failure.
        #[source]
        source: std::num::ParseIntError,
    },
}
