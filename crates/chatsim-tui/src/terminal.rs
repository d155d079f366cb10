//! Terminal setup for the player.
//!
//! The player draws on the alternate screen in raw mode. Focus reporting
//! tells the sequencer whether the chat is visible; mouse capture feeds
//! wheel scrolling. Every exit path (drop, forced second Ctrl+C, panic)
//! runs `restore_terminal()`.

use std::io::{self, Stdout};
use std::panic;

use anyhow::{Context, Result};
use crossterm::event::{
    DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

pub type PlayerTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Switches to raw mode on the alternate screen.
///
/// # Errors
/// Fails when stdout is not a usable terminal.
pub fn setup_terminal() -> Result<PlayerTerminal> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")
}

/// Turns on focus events (chat visibility) and mouse wheel events.
///
/// # Errors
/// Fails when the escape sequences cannot be written.
pub fn enable_input_features() -> Result<()> {
    execute!(io::stdout(), EnableMouseCapture, EnableFocusChange)
        .context("Failed to enable focus and mouse reporting")
}

/// # Errors
/// Fails when the escape sequences cannot be written.
pub fn disable_input_features() -> Result<()> {
    execute!(io::stdout(), DisableFocusChange, DisableMouseCapture)
        .context("Failed to disable focus and mouse reporting")
}

/// Leaves the alternate screen and raw mode. Safe to call more than once.
///
/// # Errors
/// Fails when the terminal refuses to leave the alternate screen or raw mode.
pub fn restore_terminal() -> Result<()> {
    // Reporting must stop while still in raw mode.
    let _ = disable_input_features();
    execute!(io::stdout(), LeaveAlternateScreen).context("Failed to leave alternate screen")?;
    disable_raw_mode().context("Failed to disable raw mode")
}

/// Restores the terminal before the default panic message is printed, so
/// the message is readable.
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        previous(info);
    }));
}
