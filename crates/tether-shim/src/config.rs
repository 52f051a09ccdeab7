//! CLI flag resolution.
//!
//! The one forgiving corner of the shim: any parse failure — an unknown
//! flag, a malformed peer address — is logged at WARN and the defaults are
//! retained. A contract that is started with broken flags still comes up
//! against `127.0.0.1:7051`; whether that peer answers is the fail-fast
//! part's problem.

use std::ffi::OsString;

use clap::Parser;

use tether_core::Config;

#[derive(Debug, Parser)]
#[command(name = "tether")]
struct ShimArgs {
    /// Address of peer to connect to
    #[arg(short = 'a', long = "peerAddress")]
    peer_address: Option<String>,

    /// Present if security is enabled
    #[arg(short = 's', long = "securityEnabled")]
    security_enabled: bool,

    /// Identity of chaincode
    #[arg(short = 'i', long = "id")]
    id: Option<String>,

    /// Hostname override for server certificate validation
    #[arg(short = 'o', long = "hostNameOverride")]
    host_name_override: Option<String>,
}

/// Resolves CLI arguments into connection parameters.
///
/// `args` must include the program name as its first element. The identity
/// defaults to `default_identity` (the value the contract provides) when
/// `-i` is absent. The authority override is only honored together with
/// `-s`.
pub fn resolve<I, S>(args: I, default_identity: &str) -> Config
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let mut config = Config::new(default_identity);

    let parsed = match ShimArgs::try_parse_from(args) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!(error = %err, "cli parsing failed, retaining defaults");
            return config;
        }
    };

    if let Some(address) = parsed.peer_address {
        if let Err(err) = config.set_peer_address(&address) {
            tracing::warn!(error = %err, "malformed peer address, retaining default");
        }
    }

    if parsed.security_enabled {
        config.tls_enabled = true;
        tracing::debug!("TLS enabled");
        if let Some(authority) = parsed.host_name_override {
            tracing::debug!(authority = %authority, "server host override given");
            config.authority_override = Some(authority);
        }
    }

    if let Some(id) = parsed.id {
        config.identity = id;
    }

    config
}
