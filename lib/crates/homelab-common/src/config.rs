use serde::Deserialize;

/// Domain used when `DOKKU_DOMAIN` is absent or empty.
pub const DEFAULT_DOMAIN: &str = "example.com";

/// Dokku SSH port used when `DOKKU_SSH_PORT` is absent or empty.
pub const DEFAULT_SSH_PORT: &str = "3022";

/// Repository hosting the deploy script, used when `GITHUB_REPO` is absent or empty.
pub const DEFAULT_GITHUB_REPO: &str = "https://github.com/mrilikecoding/homelab";

/// Returned in place of the Tailscale address when it cannot be discovered.
pub const ADDRESS_PLACEHOLDER: &str = "YOUR_TAILSCALE_IP";

/// Fixed SSH user that Dokku accepts pushes and commands as.
pub const SSH_USER: &str = "dokku";

/// `Host` alias written into the remote machine's `~/.ssh/config`.
pub const SSH_HOST_ALIAS: &str = "dokku";

/// Command a remote machine runs to list deployed apps.
pub const APPS_LIST_COMMAND: &str = "ssh dokku apps:list";

/// Homelab settings exactly as `envy` reads them from the environment.
///
/// Each field maps to the upper-cased variable name:
///   - `DOKKU_DOMAIN`
///   - `TAILSCALE_IP`
///   - `DOKKU_SSH_PORT`
///   - `GITHUB_REPO`
///   - `HOMELAB_USER`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HomelabEnv {
    pub dokku_domain: Option<String>,
    pub tailscale_ip: Option<String>,
    pub dokku_ssh_port: Option<String>,
    pub github_repo: Option<String>,
    pub homelab_user: Option<String>,
}

/// Process-wide homelab configuration. Built once at startup, never mutated.
///
/// Values are not validated: a non-numeric port is served as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomelabConfig {
    /// Base domain apps are served under.
    pub domain: String,
    /// Explicit Tailscale address. `None` means "ask `tailscale` per request".
    pub tailscale_ip: Option<String>,
    /// Port of Dokku's SSH endpoint on the homelab server.
    pub ssh_port: String,
    /// Repository URL hosting the deploy script.
    pub github_repo: String,
    /// Login on the homelab server used for the one interactive step.
    pub remote_user: Option<String>,
}

impl Default for HomelabConfig {
    fn default() -> Self {
        HomelabEnv::default().into()
    }
}

impl From<HomelabEnv> for HomelabConfig {
    fn from(env: HomelabEnv) -> Self {
        Self {
            domain: non_empty(env.dokku_domain).unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
            tailscale_ip: non_empty(env.tailscale_ip),
            ssh_port: non_empty(env.dokku_ssh_port).unwrap_or_else(|| DEFAULT_SSH_PORT.to_string()),
            github_repo: non_empty(env.github_repo)
                .unwrap_or_else(|| DEFAULT_GITHUB_REPO.to_string()),
            remote_user: non_empty(env.homelab_user),
        }
    }
}

impl HomelabConfig {
    /// Raw URL of the deploy script inside [`Self::github_repo`].
    #[must_use]
    pub fn deploy_script_url(&self) -> String {
        format!("{}/raw/main/deploy", self.github_repo)
    }

    /// Public URL an app named `app` is served at.
    #[must_use]
    pub fn app_url(&self, app: &str) -> String {
        format!("http://{app}.{}", self.domain)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
