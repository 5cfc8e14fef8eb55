//! Builds the machine-readable [`SetupPlan`] served at `/setup/agent`.
//!
//! Every step is `run_as: agent` except key registration, which needs a
//! password typed on the homelab server. The step after it carries pattern
//! tables so a caller can tell whether the human finished that step.

use homelab_common::{
    APPS_LIST_COMMAND, HomelabConfig, OutputPattern, PlanConfig, Preflight, RunAs, SetupPlan,
    SetupStep, Usage, Verification,
};

use crate::render::{
    USER_PLACEHOLDER, install_script_commands, register_key_command, ssh_config_block,
};

/// End-to-end check that the remote machine can talk to Dokku.
pub const VERIFY_COMMAND: &str = "ssh dokku version";

/// Build the plan for `config` with `address` substituted.
#[must_use]
pub fn build_setup_plan(config: &HomelabConfig, address: &str) -> SetupPlan {
    SetupPlan {
        instructions: "Follow these steps to configure this machine for homelab deployments. \
            Run only steps with run_as \"agent\"; hand steps with run_as \"human\" to the user."
            .to_string(),
        config: PlanConfig {
            domain: config.domain.clone(),
            tailscale_ip: address.to_string(),
            ssh_port: config.ssh_port.clone(),
            github_repo: config.github_repo.clone(),
            remote_user: config.remote_user.clone(),
        },
        preflight: Preflight {
            description: "Confirm this machine can reach Dokku's SSH port over Tailscale".to_string(),
            command: format!("nc -z -w 5 {address} {}", config.ssh_port),
            expected: "Exit status 0".to_string(),
            on_failure: "Join this machine to the homelab's Tailnet (tailscale up) and retry. \
                Do not continue with the steps until this passes."
                .to_string(),
        },
        steps: vec![
            ensure_key_step(),
            ssh_config_step(config, address),
            register_key_step(config, address),
            verify_access_step(config),
            domain_env_step(config),
            install_script_step(config),
        ],
        verification: Verification {
            command: VERIFY_COMMAND.to_string(),
            expected: "Should output dokku version number".to_string(),
        },
        usage: Usage {
            first_deploy: "deploy appname --create".to_string(),
            subsequent: "deploy appname".to_string(),
            app_url_pattern: config.app_url("APPNAME"),
        },
    }
}

fn ensure_key_step() -> SetupStep {
    let mut step = SetupStep::new(
        1,
        "Check SSH key exists",
        "Verify ~/.ssh/id_ed25519 exists, or generate one",
        RunAs::Agent,
        "test -f ~/.ssh/id_ed25519 || ssh-keygen -t ed25519 -f ~/.ssh/id_ed25519 -N \"\"",
    );
    step.check = Some("test -f ~/.ssh/id_ed25519".to_string());
    step.skip_if_check_passes = true;
    step
}

fn ssh_config_step(config: &HomelabConfig, address: &str) -> SetupStep {
    let block = ssh_config_block(address, &config.ssh_port);
    let mut step = SetupStep::new(
        2,
        "Add SSH config",
        "Add dokku host to SSH config if not present",
        RunAs::Agent,
        format!("mkdir -p ~/.ssh && cat >> ~/.ssh/config << 'EOF'\n\n{block}\nEOF"),
    );
    step.check = Some("grep -q \"Host dokku\" ~/.ssh/config 2>/dev/null".to_string());
    step.skip_if_check_passes = true;
    step
}

fn register_key_step(config: &HomelabConfig, address: &str) -> SetupStep {
    let note = match &config.remote_user {
        Some(user) => format!("User will be prompted for the password of {user} on the homelab server."),
        None => format!(
            "Replace {USER_PLACEHOLDER} with the username on the homelab server. \
             User will be prompted for password."
        ),
    };
    let mut step = SetupStep::new(
        3,
        "Add SSH key to Dokku",
        "Register the SSH public key with Dokku. User must authenticate to the server.",
        RunAs::Human,
        register_key_command(config, address),
    );
    step.note = Some(note);
    step.verify = Some(VERIFY_COMMAND.to_string());
    step.success_patterns = vec![
        OutputPattern::new("SHA256:", "Key registered; Dokku printed its fingerprint"),
        OutputPattern::new(
            "Duplicate ssh public key specified",
            "Key was already registered; nothing left to do",
        ),
    ];
    step.failure_patterns = vec![
        OutputPattern::new(
            "Permission denied",
            "Wrong username or password for the homelab server",
        ),
        OutputPattern::new(
            "Duplicate ssh key name",
            "A different key is already registered under this name; remove it with dokku ssh-keys:remove",
        ),
        OutputPattern::new(
            "No such container",
            "The dokku container is not running on the homelab server",
        ),
        OutputPattern::new(
            "No such file or directory",
            "~/.ssh/id_ed25519.pub is missing; rerun step 1",
        ),
        OutputPattern::new(
            "Connection timed out",
            "Homelab unreachable; check tailscale status on both machines",
        ),
        OutputPattern::new(
            "Connection refused",
            "The homelab server is not accepting SSH logins on port 22",
        ),
    ];
    step
}

fn verify_access_step(config: &HomelabConfig) -> SetupStep {
    let mut step = SetupStep::new(
        4,
        "Verify Dokku access",
        "Confirm the key from step 3 was accepted. Run after the user reports step 3 done.",
        RunAs::Agent,
        "ssh -o BatchMode=yes -o StrictHostKeyChecking=accept-new dokku version",
    );
    step.success_patterns = vec![OutputPattern::new(
        "dokku version",
        "Access works; continue with the next step",
    )];
    step.failure_patterns = vec![
        OutputPattern::new(
            "Permission denied (publickey)",
            "Key is not registered; ask the user to redo step 3",
        ),
        OutputPattern::new(
            "Host key verification failed",
            "Known host entry is stale; confirm the fingerprint with the user before editing ~/.ssh/known_hosts",
        ),
        OutputPattern::new(
            "Connection refused",
            format!("Nothing listens on port {}; check the dokku container's port mapping", config.ssh_port),
        ),
        OutputPattern::new(
            "Connection timed out",
            "Homelab unreachable; rerun the preflight check",
        ),
        OutputPattern::new(
            "Could not resolve hostname dokku",
            "The SSH config from step 2 is missing",
        ),
    ];
    step
}

fn domain_env_step(config: &HomelabConfig) -> SetupStep {
    let export = format!("export DOKKU_DOMAIN=\"{}\"", config.domain);
    let mut step = SetupStep::new(
        5,
        "Set DOKKU_DOMAIN environment variable",
        "Add domain to shell profile",
        RunAs::Agent,
        format!(
            "case \"$SHELL\" in */zsh) rc=\"$HOME/.zshrc\" ;; */bash) rc=\"$HOME/.bashrc\" ;; \
             *) rc=\"$HOME/.profile\" ;; esac; echo '{export}' >> \"$rc\""
        ),
    );
    step.check = Some(
        "grep -qs \"DOKKU_DOMAIN=\" ~/.zshrc ~/.bashrc ~/.profile".to_string(),
    );
    step.skip_if_check_passes = true;
    step.command_zsh = Some(format!("echo '{export}' >> ~/.zshrc && source ~/.zshrc"));
    step.command_bash = Some(format!("echo '{export}' >> ~/.bashrc && source ~/.bashrc"));
    step
}

fn install_script_step(config: &HomelabConfig) -> SetupStep {
    let [download, chmod] = install_script_commands(config);
    let mut step = SetupStep::new(
        6,
        "Install deploy script",
        "Download and install the deploy helper script",
        RunAs::Agent,
        format!("{download} && {chmod}"),
    );
    step.check = Some("test -x /usr/local/bin/deploy".to_string());
    step.skip_if_check_passes = true;
    step.note = Some(format!("List deployed apps afterwards with: {APPS_LIST_COMMAND}"));
    step
}
