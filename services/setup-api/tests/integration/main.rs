//! Integration tests for the homelab setup API.
//!
//! Each test drives the real router in-process with `tower::ServiceExt::oneshot`
//! and a canned `CommandRunner`, so no `tailscale` binary is needed.

mod mocks;
mod properties;
