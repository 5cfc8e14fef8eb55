//! Canned [`CommandRunner`] implementations.
//!
//! Stand in for the `tailscale` CLI so route tests control what the
//! resolver sees.

use std::os::unix::process::ExitStatusExt;
use std::process::{ExitStatus, Output};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use homelab_setup_api::command_runner::CommandRunner;

// ── Output helpers ────────────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: ExitStatus::from_raw(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(stderr: &[u8]) -> Output {
    Output {
        status: ExitStatus::from_raw(1 << 8),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Mock: tailscale up ────────────────────────────────────────────────────────

/// `tailscale ip -4` prints `ip` and exits 0. Counts invocations.
#[derive(Debug, Clone)]
pub struct TailscaleUp {
    pub ip: &'static str,
    pub calls: Arc<AtomicUsize>,
}

impl TailscaleUp {
    pub fn new(ip: &'static str) -> Self {
        Self {
            ip,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CommandRunner for TailscaleUp {
    async fn run_with_timeout(&self, _: &str, _: &[&str], _: Duration) -> Result<Output> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ok_output(format!("{}\n", self.ip).as_bytes()))
    }
}

// ── Mock: tailscale logged out ────────────────────────────────────────────────

/// `tailscale ip -4` exits non-zero.
#[derive(Debug, Clone, Copy)]
pub struct TailscaleLoggedOut;

impl CommandRunner for TailscaleLoggedOut {
    async fn run_with_timeout(&self, _: &str, _: &[&str], _: Duration) -> Result<Output> {
        Ok(err_output(b"NoState: not logged in\n"))
    }
}

// ── Mock: tailscale not installed ─────────────────────────────────────────────

/// Spawning `tailscale` fails, as when the binary is missing.
#[derive(Debug, Clone, Copy)]
pub struct TailscaleMissing;

impl CommandRunner for TailscaleMissing {
    async fn run_with_timeout(&self, program: &str, _: &[&str], _: Duration) -> Result<Output> {
        anyhow::bail!("failed to spawn {program}: No such file or directory (os error 2)")
    }
}
