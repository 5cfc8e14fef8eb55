//! Process execution port and its tokio implementation.
//!
//! The address resolver depends only on [`CommandRunner`], so tests can hand
//! it canned output instead of spawning `tailscale`.

use std::future::Future;
use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};

/// Abstracts process execution so infrastructure can be swapped or mocked.
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> impl Future<Output = Result<Output>> + Send;
}

/// Production `CommandRunner` backed by `tokio::process`.
///
/// The child is spawned with `kill_on_drop`, so when the deadline elapses and
/// the `wait_with_output` future is dropped, the process is killed with it.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioCommandRunner;

impl CommandRunner for TokioCommandRunner {
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        let child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| anyhow::anyhow!("{program} timed out after {timeout:?}"))?
            .with_context(|| format!("waiting for {program}"))
    }
}
