//! Runtime execution modes.
//!
//! - `plain`: Non-interactive transcript on stdout
//! - `tui`: Full-screen interactive player (optional feature)

pub mod plain;

#[cfg(feature = "tui")]
pub use chatsim_tui::{TuiOptions, run_presentation};

#[cfg(not(feature = "tui"))]
#[derive(Debug, Clone, Default)]
pub struct TuiOptions {
    pub announce_file: Option<std::path::PathBuf>,
}

#[cfg(not(feature = "tui"))]
pub fn run_presentation(
    _presentation: chatsim_core::content::Presentation,
    _options: TuiOptions,
) -> anyhow::Result<()> {
    anyhow::bail!(
        "TUI support is disabled in this build (feature \"tui\"). Use `chatsim run --plain`."
    );
}
