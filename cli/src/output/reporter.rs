//! Terminal rendering of phase progress.
//!
//! Services talk to `application::ports::ProgressReporter`; this is the
//! adapter that turns those calls into spinners and marked lines.

use std::cell::RefCell;

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, progress};

/// Renders phase progress on the terminal.
///
/// With spinners enabled a `step()` starts a spinner that the following
/// `success()` settles. Otherwise each step is a plain `  → message` line.
/// Nothing is printed in quiet mode.
pub struct TerminalReporter<'a> {
    out: &'a OutputContext,
    spinner: RefCell<Option<ProgressBar>>,
}

impl<'a> TerminalReporter<'a> {
    #[must_use]
    pub fn new(out: &'a OutputContext) -> Self {
        Self {
            out,
            spinner: RefCell::new(None),
        }
    }

    fn line(&self, text: &str) {
        match self.spinner.borrow().as_ref() {
            Some(pb) => pb.suspend(|| println!("{text}")),
            None => println!("{text}"),
        }
    }
}

fn mark(symbol: &str, style: owo_colors::Style) -> String {
    symbol.style(style).to_string()
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if self.out.quiet {
            return;
        }
        if !self.out.spinners() {
            println!("  {} {message}", mark("→", self.out.palette.step));
            return;
        }
        let mut slot = self.spinner.borrow_mut();
        if let Some(stale) = slot.take() {
            stale.finish_and_clear();
        }
        *slot = Some(progress::phase_spinner(message));
    }

    fn success(&self, message: &str) {
        if self.out.quiet {
            return;
        }
        let done = mark("✓", self.out.palette.ok);
        match self.spinner.borrow_mut().take() {
            Some(pb) => progress::settle(&pb, &done, message),
            None => println!("  {done} {message}"),
        }
    }

    fn warn(&self, message: &str) {
        if !self.out.quiet {
            self.line(&format!("  {} {message}", mark("!", self.out.palette.warning)));
        }
    }

    fn output(&self, text: &str) {
        if self.out.quiet {
            return;
        }
        for remote in text.lines() {
            self.line(&format!("    {}", remote.style(self.out.palette.relayed)));
        }
    }
}

impl Drop for TerminalReporter<'_> {
    /// A spinner still running here belongs to a phase that failed.
    fn drop(&mut self) {
        if let Some(pb) = self.spinner.get_mut().take() {
            let failed = mark("✗", self.out.palette.failed);
            progress::settle(&pb, &failed, &pb.message());
        }
    }
}
