//! Phase spinners

#![allow(clippy::expect_used)] // templates below are literals

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const RUNNING: &str = "  {spinner:.cyan} {msg} {elapsed:.dim}";
const SETTLED: &str = "  {prefix} {msg}";

/// Spinner shown while a phase script runs on the target.
#[must_use]
pub fn phase_spinner(msg: &str) -> ProgressBar {
    let style = ProgressStyle::default_spinner()
        .tick_chars("◐◓◑◒ ")
        .template(RUNNING)
        .expect("literal template");
    let pb = ProgressBar::new_spinner().with_style(style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Stop the spinner and leave `mark msg` on its line.
pub fn settle(pb: &ProgressBar, mark: &str, msg: &str) {
    let style = ProgressStyle::default_spinner()
        .template(SETTLED)
        .expect("literal template");
    pb.set_style(style);
    pb.set_prefix(mark.to_string());
    pb.finish_with_message(msg.to_string());
}
