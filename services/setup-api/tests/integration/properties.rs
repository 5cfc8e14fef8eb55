//! Property-based tests for the renderers and the routes built on them.
//!
//! Uses `proptest` to check invariants across arbitrary configuration values.
//! The route-level properties drive the router on a current-thread runtime.

#![allow(clippy::expect_used)]

use homelab_common::{HomelabConfig, HomelabEnv, RunAs};
use homelab_setup_api::plan::build_setup_plan;
use homelab_setup_api::render::{setup_guide, ssh_config_block};
use proptest::prelude::*;

use crate::helpers::{app, get};
use crate::mocks::TailscaleMissing;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("test runtime builds")
}

fn config(domain: &str, user: Option<String>) -> HomelabConfig {
    HomelabEnv {
        dokku_domain: Some(domain.to_string()),
        homelab_user: user,
        ..HomelabEnv::default()
    }
    .into()
}

proptest! {
    /// The configured domain appears verbatim in the runbook.
    #[test]
    fn prop_setup_guide_contains_domain(
        domain in "[\\PC]{1,30}",
        address in "100\\.[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}",
    ) {
        let guide = setup_guide(&config(&domain, None), &address);
        let expected = format!("export DOKKU_DOMAIN=\"{domain}\"");
        prop_assert!(guide.contains(&expected), "missing {expected}");
    }

    /// Whatever the inputs, exactly one step is reserved for a human.
    #[test]
    fn prop_plan_has_exactly_one_human_step(
        domain in "[\\PC]{0,30}",
        user in proptest::option::of("[a-z_][a-z0-9_-]{0,15}"),
        address in "[\\PC]{0,20}",
    ) {
        let plan = build_setup_plan(&config(&domain, user), &address);
        prop_assert!(!plan.steps.is_empty());
        let humans = plan.steps.iter().filter(|s| s.run_as == RunAs::Human).count();
        prop_assert_eq!(humans, 1);
    }

    /// `HostName` is exactly the address handed in.
    #[test]
    fn prop_ssh_block_hostname_is_address(
        address in "[0-9a-zA-Z.:_-]{1,40}",
        port in "[0-9]{1,5}",
    ) {
        let block = ssh_config_block(&address, &port);
        let hostname = block
            .lines()
            .find_map(|l| l.strip_prefix("  HostName "));
        prop_assert_eq!(hostname, Some(address.as_str()));
    }

    /// The replace-placeholder note appears iff no remote user is configured.
    #[test]
    fn prop_replace_note_iff_user_unset(
        user in proptest::option::of("[a-z][a-z0-9]{0,10}"),
    ) {
        let has_user = user.is_some();
        let guide = setup_guide(&config("lab.dev", user), "100.64.0.5");
        prop_assert_eq!(guide.contains("Replace YOUR_USER"), !has_user);
    }

    /// `/config` reports `DOKKU_DOMAIN` exactly as set, and `/setup` embeds it.
    #[test]
    fn prop_config_route_echoes_domain(domain in "[\\PC]{1,30}") {
        let app = app(
            &[("DOKKU_DOMAIN", domain.as_str()), ("TAILSCALE_IP", "100.64.0.5")],
            TailscaleMissing,
        );
        let (config, guide) = runtime().block_on(async {
            (get(&app, "/config").await.json(), get(&app, "/setup").await.body)
        });
        prop_assert_eq!(config["domain"].as_str(), Some(domain.as_str()));
        let expected = format!("export DOKKU_DOMAIN=\"{domain}\"");
        prop_assert!(guide.contains(&expected), "missing {}", expected);
    }
}
