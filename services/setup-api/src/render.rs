//! Plain-text bodies: SSH config snippet, deploy script, human runbook.
//!
//! Pure functions of the configuration and the resolved address.

use homelab_common::{HomelabConfig, SSH_HOST_ALIAS, SSH_USER};

/// Deploy helper served at `/deploy-script`, byte-for-byte.
///
/// `deploy <app-name> [--create]`; needs `DOKKU_DOMAIN` and a git checkout.
pub const DEPLOY_SCRIPT: &str = include_str!("../assets/deploy.sh");

/// Placeholder login used in commands when `HOMELAB_USER` is unset.
pub const USER_PLACEHOLDER: &str = "YOUR_USER";

/// `~/.ssh/config` block pointing the `dokku` alias at the homelab.
#[must_use]
pub fn ssh_config_block(address: &str, ssh_port: &str) -> String {
    format!(
        "Host {SSH_HOST_ALIAS}
  HostName {address}
  Port {ssh_port}
  User {SSH_USER}
  IdentityFile ~/.ssh/id_ed25519
  IdentitiesOnly yes"
    )
}

/// Login on the homelab server, or [`USER_PLACEHOLDER`].
#[must_use]
pub fn remote_login(config: &HomelabConfig) -> &str {
    config.remote_user.as_deref().unwrap_or(USER_PLACEHOLDER)
}

/// Pipes the local public key into Dokku over an ordinary SSH login.
///
/// This is the one step that needs a password typed on the homelab server.
#[must_use]
pub fn register_key_command(config: &HomelabConfig, address: &str) -> String {
    let login = remote_login(config);
    format!(
        "cat ~/.ssh/id_ed25519.pub | ssh {login}@{address} \"docker exec -i dokku dokku ssh-keys:add $(whoami)\""
    )
}

/// Downloads the deploy script into `/usr/local/bin`.
#[must_use]
pub fn install_script_commands(config: &HomelabConfig) -> [String; 2] {
    [
        format!(
            "sudo curl -fsSL -o /usr/local/bin/deploy {}",
            config.deploy_script_url()
        ),
        "sudo chmod +x /usr/local/bin/deploy".to_string(),
    ]
}

/// Markdown runbook served at `/setup`.
#[must_use]
pub fn setup_guide(config: &HomelabConfig, address: &str) -> String {
    let ssh_block = ssh_config_block(address, &config.ssh_port);
    let register = register_key_command(config, address);
    let replace_note = if config.remote_user.is_some() {
        String::new()
    } else {
        format!("\nReplace {USER_PLACEHOLDER} with your username on the homelab server.\n")
    };
    let [download, chmod] = install_script_commands(config);
    let domain = &config.domain;
    let app_url = config.app_url("myapp");

    format!(
        "# Homelab Remote Machine Setup

## Prerequisites
- Connected to the same Tailnet as the homelab server
- SSH key at ~/.ssh/id_ed25519

## Step 1: Add SSH Config

Append to ~/.ssh/config:

```
{ssh_block}
```

## Step 2: Add Your SSH Key to Dokku

Run this command (you'll need to authenticate to the server):

```bash
{register}
```
{replace_note}
Check it worked with: ssh dokku version

## Step 3: Set Environment Variable

Add to your shell profile (~/.zshrc or ~/.bashrc):

```bash
export DOKKU_DOMAIN=\"{domain}\"
```

Then run: source ~/.zshrc

## Step 4: Install Deploy Script

```bash
{download}
{chmod}
```

## Step 5: Deploy an App

```bash
cd your-app
deploy myapp --create   # First time
deploy myapp            # Updates
```

Your app will be at: {app_url}"
    )
}
