//! Unit tests for the habprov CLI
//!
//! These tests use mocked transports and temporary directories and run fast
//! without touching a target machine.

mod architecture;
mod helpers;
mod orchestrator;
mod property_tests;
