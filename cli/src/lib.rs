//! Habitat provisioning: package identifiers, artifact lookup, Supervisor
//! options and the phase scripts run on the target.

#![cfg_attr(test, allow(clippy::expect_used))]

pub mod app;
pub mod application;
pub mod cli;
pub mod commands;
pub mod domain;
pub mod infra;
pub mod output;
