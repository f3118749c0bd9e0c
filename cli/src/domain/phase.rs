//! The four provisioning phases, in execution order.

use std::fmt;

/// One step of a provisioning run. Phases always run in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Phase {
    /// Ensure the `hab` CLI is present.
    Install,
    /// Create the hab user, the workspace, and the Supervisor service.
    Init,
    /// Stage configuration overrides.
    Prepare,
    /// Install the package and load it under the Supervisor.
    Run,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Install, Phase::Init, Phase::Prepare, Phase::Run];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Install => "install",
            Phase::Init => "init",
            Phase::Prepare => "prepare",
            Phase::Run => "run",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
