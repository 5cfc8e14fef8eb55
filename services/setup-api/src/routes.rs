//! HTTP surface of the setup API.
//!
//! Every route is a read-only `GET` with no auth:
//!   - `/`              overview and route index
//!   - `/config`        server configuration details
//!   - `/ssh-config`    SSH config snippet (text)
//!   - `/deploy-script` deploy helper script (text)
//!   - `/status`        how to list deployed apps
//!   - `/setup`         human runbook (text)
//!   - `/setup/agent`   machine-readable [`SetupPlan`]
//!   - `/health`        liveness check
//!
//! Handlers never mutate state; anything they describe is carried out by the
//! caller against the remote machine and the homelab.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use homelab_common::{APPS_LIST_COMMAND, HomelabConfig, SSH_USER, SetupPlan};
use serde::{Deserialize, Serialize, Serializer};
use tower_http::trace::TraceLayer;

use crate::command_runner::CommandRunner;
use crate::plan::build_setup_plan;
use crate::render::{DEPLOY_SCRIPT, setup_guide, ssh_config_block};
use crate::resolver::AddressResolver;

pub const API_NAME: &str = "Homelab Setup API";
pub const API_DESCRIPTION: &str =
    "Self-documenting API for configuring remote machines to deploy to this homelab";

/// Route path and its one-line description, in index order.
pub const ENDPOINTS: &[(&str, &str)] = &[
    ("/", "This overview"),
    ("/setup", "Complete setup instructions (start here)"),
    ("/setup/agent", "Machine-readable setup for AI assistants"),
    ("/ssh-config", "SSH config snippet to append to ~/.ssh/config"),
    ("/deploy-script", "The deploy script content"),
    ("/status", "How to list deployed Dokku apps"),
    ("/config", "Server configuration details"),
    ("/health", "Liveness check for container runtimes"),
];

/// State shared by every handler: immutable config plus the resolver.
#[derive(Debug)]
pub struct AppState<R> {
    pub config: HomelabConfig,
    pub resolver: AddressResolver<R>,
}

impl<R> AppState<R> {
    pub fn new(config: HomelabConfig, resolver: AddressResolver<R>) -> Self {
        Self { config, resolver }
    }
}

// ===================================================================
// Output structs
// ===================================================================

/// Body of `/`.
#[derive(Debug, Clone, Serialize)]
pub struct IndexOutput {
    pub name: String,
    pub description: String,
    pub domain: String,
    pub tailscale_ip: String,
    /// Serialized as a JSON object keyed by path, in [`ENDPOINTS`] order.
    #[serde(serialize_with = "serialize_endpoints")]
    pub endpoints: &'static [(&'static str, &'static str)],
    pub quick_start: String,
}

/// Body of `/config`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigOutput {
    pub domain: String,
    pub tailscale_ip: String,
    pub ssh_port: String,
    /// Always `"dokku"`.
    pub ssh_user: String,
    pub github_repo: String,
    pub deploy_script_url: String,
}

/// Body of `/status`. Does not query Dokku itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusOutput {
    pub note: String,
    pub domain: String,
    pub check_command: String,
}

fn serialize_endpoints<S: Serializer>(
    endpoints: &&'static [(&'static str, &'static str)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(endpoints.iter().copied())
}

// ===================================================================
// Router
// ===================================================================

/// Compose the axum router over `state`.
pub fn router<R>(state: Arc<AppState<R>>) -> Router
where
    R: CommandRunner + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(index::<R>))
        .route("/config", get(config::<R>))
        .route("/ssh-config", get(ssh_config::<R>))
        .route("/deploy-script", get(deploy_script))
        .route("/status", get(status::<R>))
        .route("/setup", get(setup::<R>))
        .route("/setup/agent", get(setup_agent::<R>))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// -------------------------------------------------------------------
// Handlers
// -------------------------------------------------------------------

async fn index<R>(State(state): State<Arc<AppState<R>>>) -> Json<IndexOutput>
where
    R: CommandRunner + Send + Sync + 'static,
{
    let tailscale_ip = state.resolver.resolve().await;
    Json(IndexOutput {
        name: API_NAME.to_string(),
        description: API_DESCRIPTION.to_string(),
        domain: state.config.domain.clone(),
        tailscale_ip,
        endpoints: ENDPOINTS,
        quick_start: "Fetch /setup/agent for automated setup instructions".to_string(),
    })
}

async fn config<R>(State(state): State<Arc<AppState<R>>>) -> Json<ConfigOutput>
where
    R: CommandRunner + Send + Sync + 'static,
{
    let tailscale_ip = state.resolver.resolve().await;
    let config = &state.config;
    Json(ConfigOutput {
        domain: config.domain.clone(),
        tailscale_ip,
        ssh_port: config.ssh_port.clone(),
        ssh_user: SSH_USER.to_string(),
        github_repo: config.github_repo.clone(),
        deploy_script_url: config.deploy_script_url(),
    })
}

async fn ssh_config<R>(State(state): State<Arc<AppState<R>>>) -> String
where
    R: CommandRunner + Send + Sync + 'static,
{
    let address = state.resolver.resolve().await;
    ssh_config_block(&address, &state.config.ssh_port)
}

async fn deploy_script() -> &'static str {
    DEPLOY_SCRIPT
}

async fn status<R>(State(state): State<Arc<AppState<R>>>) -> Json<StatusOutput>
where
    R: CommandRunner + Send + Sync + 'static,
{
    Json(StatusOutput {
        note: format!("Run \"{APPS_LIST_COMMAND}\" to see deployed apps"),
        domain: state.config.domain.clone(),
        check_command: APPS_LIST_COMMAND.to_string(),
    })
}

async fn setup<R>(State(state): State<Arc<AppState<R>>>) -> String
where
    R: CommandRunner + Send + Sync + 'static,
{
    let address = state.resolver.resolve().await;
    setup_guide(&state.config, &address)
}

async fn setup_agent<R>(State(state): State<Arc<AppState<R>>>) -> Json<SetupPlan>
where
    R: CommandRunner + Send + Sync + 'static,
{
    let address = state.resolver.resolve().await;
    Json(build_setup_plan(&state.config, &address))
}

/// Minimal health-check handler for Docker and load balancers.
async fn health() -> StatusCode {
    StatusCode::OK
}
