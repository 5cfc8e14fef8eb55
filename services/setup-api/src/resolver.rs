//! Tailscale address resolution.
//!
//! A configured `TAILSCALE_IP` always wins. Otherwise every call asks the
//! local `tailscale` CLI, so an address change shows up on the next request
//! without a restart. Failures never reach callers: they get
//! [`ADDRESS_PLACEHOLDER`] instead.

use std::process::ExitStatus;
use std::time::Duration;

use homelab_common::ADDRESS_PLACEHOLDER;
use thiserror::Error;

use crate::command_runner::CommandRunner;

/// Program queried for the overlay address.
pub const TAILSCALE_PROGRAM: &str = "tailscale";

/// Arguments that make `tailscale` print this machine's IPv4 tailnet address.
pub const TAILSCALE_ARGS: &[&str] = &["ip", "-4"];

/// Why a lookup fell back to the placeholder.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("could not run tailscale: {0:#}")]
    Command(anyhow::Error),

    #[error("tailscale exited with {status}: {stderr}")]
    ExitStatus { status: ExitStatus, stderr: String },

    #[error("tailscale printed no address")]
    EmptyOutput,
}

/// Resolves the homelab server's address on its Tailscale network.
#[derive(Debug, Clone)]
pub struct AddressResolver<R> {
    configured: Option<String>,
    runner: R,
    timeout: Duration,
}

impl<R: CommandRunner + Sync> AddressResolver<R> {
    /// `configured` short-circuits every lookup when set.
    pub fn new(configured: Option<String>, runner: R, timeout: Duration) -> Self {
        Self {
            configured,
            runner,
            timeout,
        }
    }

    /// The address to render into responses. Never fails.
    pub async fn resolve(&self) -> String {
        if let Some(ip) = &self.configured {
            return ip.clone();
        }
        match self.lookup().await {
            Ok(ip) => {
                tracing::debug!(%ip, "resolved tailscale address");
                ip
            }
            Err(e) => {
                tracing::warn!(error = %e, "tailscale lookup failed, serving placeholder");
                ADDRESS_PLACEHOLDER.to_string()
            }
        }
    }

    /// Query `tailscale ip -4`, ignoring any configured address.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] when the command cannot run, exits non-zero,
    /// or prints nothing.
    pub async fn lookup(&self) -> Result<String, ResolveError> {
        let output = self
            .runner
            .run_with_timeout(TAILSCALE_PROGRAM, TAILSCALE_ARGS, self.timeout)
            .await
            .map_err(ResolveError::Command)?;

        if !output.status.success() {
            return Err(ResolveError::ExitStatus {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // A node with several tailnet addresses prints one per line.
        String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .ok_or(ResolveError::EmptyOutput)
    }
}
