//! Startup configuration loaded from environment variables via `envy`.
//!
//! Two records come out of the same environment:
//!   - [`HomelabConfig`] from `DOKKU_DOMAIN`, `TAILSCALE_IP`, `DOKKU_SSH_PORT`,
//!     `GITHUB_REPO`, `HOMELAB_USER` (never fails; bad values pass through)
//!   - [`ServerConfig`] from `HOMELAB_API_LISTEN_ADDR` (default `0.0.0.0:8000`)
//!     and `HOMELAB_API_RESOLVE_TIMEOUT_SECS` (default `5`)

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use homelab_common::{HomelabConfig, HomelabEnv};
use serde::Deserialize;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_RESOLVE_TIMEOUT_SECS: u64 = 5;

/// Settings for the HTTP server itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Socket address to bind the HTTP server to.
    pub listen_addr: SocketAddr,
    /// Upper bound on one `tailscale ip -4` invocation.
    pub resolve_timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct ServerEnv {
    homelab_api_listen_addr: Option<String>,
    homelab_api_resolve_timeout_secs: Option<String>,
}

impl TryFrom<ServerEnv> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(env: ServerEnv) -> Result<Self> {
        let listen_addr = env
            .homelab_api_listen_addr
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = listen_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid HOMELAB_API_LISTEN_ADDR {listen_addr:?}"))?;

        let resolve_timeout = match env.homelab_api_resolve_timeout_secs.filter(|v| !v.is_empty()) {
            Some(secs) => secs
                .parse::<u64>()
                .with_context(|| format!("invalid HOMELAB_API_RESOLVE_TIMEOUT_SECS {secs:?}"))?,
            None => DEFAULT_RESOLVE_TIMEOUT_SECS,
        };

        Ok(Self {
            listen_addr,
            resolve_timeout: Duration::from_secs(resolve_timeout),
        })
    }
}

/// Load both records from the process environment.
///
/// # Errors
///
/// Returns an error if the listen address or resolve timeout is malformed.
pub fn load_from_env() -> Result<(HomelabConfig, ServerConfig)> {
    from_vars(std::env::vars())
}

/// Load both records from explicit `(NAME, value)` pairs.
///
/// # Errors
///
/// Returns an error if the listen address or resolve timeout is malformed.
pub fn from_vars<I>(vars: I) -> Result<(HomelabConfig, ServerConfig)>
where
    I: IntoIterator<Item = (String, String)>,
{
    let vars: Vec<(String, String)> = vars.into_iter().collect();

    let homelab: HomelabEnv =
        envy::from_iter(vars.clone()).context("failed to read homelab settings")?;
    let server: ServerEnv = envy::from_iter(vars).context("failed to read server settings")?;

    Ok((homelab.into(), server.try_into()?))
}
