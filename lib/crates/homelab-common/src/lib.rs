pub mod config;
pub mod plan;

pub use config::{
    ADDRESS_PLACEHOLDER, APPS_LIST_COMMAND, DEFAULT_DOMAIN, DEFAULT_GITHUB_REPO, DEFAULT_SSH_PORT,
    HomelabConfig, HomelabEnv, SSH_HOST_ALIAS, SSH_USER,
};
pub use plan::{
    OutputPattern, PlanConfig, Preflight, RunAs, SetupPlan, SetupStep, Usage, Verification,
};
