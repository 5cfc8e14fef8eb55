//! Homelab setup API entry point.
//!
//! Initialises tracing, loads configuration from environment variables
//! (`DOKKU_DOMAIN`, `TAILSCALE_IP`, `DOKKU_SSH_PORT`, `GITHUB_REPO`,
//! `HOMELAB_USER`, `HOMELAB_API_*`), and serves the setup routes over plain
//! HTTP until SIGINT or SIGTERM.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use homelab_setup_api::command_runner::TokioCommandRunner;
use homelab_setup_api::config;
use homelab_setup_api::resolver::AddressResolver;
use homelab_setup_api::{AppState, router};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialise tracing with RUST_LOG env filter.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("homelab-setup-api starting");

    // 2. Load configuration once; it is read-only from here on.
    let (homelab, server) =
        config::load_from_env().context("failed to load configuration from environment")?;

    tracing::info!(
        listen_addr = %server.listen_addr,
        domain = %homelab.domain,
        tailscale_ip = homelab.tailscale_ip.as_deref().unwrap_or("<tailscale ip -4>"),
        ssh_port = %homelab.ssh_port,
        github_repo = %homelab.github_repo,
        remote_user = homelab.remote_user.as_deref().unwrap_or("<unset>"),
        resolve_timeout_secs = server.resolve_timeout.as_secs(),
        "configuration loaded",
    );

    // 3. Build shared state and the router.
    let resolver = AddressResolver::new(
        homelab.tailscale_ip.clone(),
        TokioCommandRunner,
        server.resolve_timeout,
    );
    let state = Arc::new(AppState::new(homelab, resolver));
    let app = router(state);

    // 4. Bind and serve.
    let listener = tokio::net::TcpListener::bind(server.listen_addr)
        .await
        .with_context(|| format!("failed to bind TCP listener on {}", server.listen_addr))?;

    tracing::info!("setup API ready at http://{}/setup", server.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("homelab-setup-api shut down");
    Ok(())
}

/// Wait for SIGINT (Ctrl-C) or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("received shutdown signal");
}
