//! Terminal presentation: colors, spinners and JSON

pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::OwoColorize as _;
pub use reporter::TerminalReporter;
pub use styles::Palette;

/// Where and how human-readable output is written.
pub struct OutputContext {
    pub palette: Palette,
    /// Stdout is an interactive terminal.
    pub interactive: bool,
    /// Only errors reach the terminal.
    pub quiet: bool,
}

impl OutputContext {
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let interactive = Term::stdout().is_term();
        let mut palette = Palette::default();
        if interactive && !no_color && std::env::var_os("NO_COLOR").is_none() {
            palette.enable();
        }
        Self {
            palette,
            interactive,
            quiet,
        }
    }

    /// Phases get a live spinner only on an interactive, non-quiet terminal.
    #[must_use]
    pub fn spinners(&self) -> bool {
        self.interactive && !self.quiet
    }

    /// Section title, e.g. `Provisioning core/web`.
    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!("  {}", title.style(self.palette.title));
        }
    }

    /// One `key  value` row; callers pad keys to align the column.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.palette.key));
        }
    }
}
