//! Homelab setup API library, exposing modules for integration testing.

#![cfg_attr(test, allow(clippy::expect_used))]

pub mod command_runner;
pub mod config;
pub mod plan;
pub mod render;
pub mod resolver;
pub mod routes;

pub use routes::{AppState, router};
