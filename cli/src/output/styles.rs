//! Color palette for provisioning output

use owo_colors::Style;

/// Styles for each kind of line habprov prints. All plain until
/// [`Palette::enable`] is called.
#[derive(Default, Clone)]
pub struct Palette {
    /// Arrow in front of a phase that is starting
    pub step: Style,
    /// Mark in front of a completed phase
    pub ok: Style,
    /// Mark in front of a phase that failed
    pub failed: Style,
    pub warning: Style,
    /// Output relayed from the target machine
    pub relayed: Style,
    pub title: Style,
    /// Left column of `key  value` listings
    pub key: Style,
}

impl Palette {
    pub fn enable(&mut self) {
        *self = Self {
            step: Style::new().cyan(),
            ok: Style::new().green(),
            failed: Style::new().red().bold(),
            warning: Style::new().yellow(),
            relayed: Style::new().dimmed(),
            title: Style::new().bold().magenta(),
            key: Style::new().dimmed(),
        };
    }
}
