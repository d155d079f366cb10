//! Full-screen terminal player for chat presentations.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stdout};

use anyhow::Result;
use chatsim_core::content::Presentation;
pub use features::{chat, navigation, statusline};
pub use runtime::{TuiOptions, TuiRuntime};

/// Plays a presentation in the terminal until the user quits.
pub fn run_presentation(presentation: Presentation, options: TuiOptions) -> Result<()> {
    if !stdout().is_terminal() {
        anyhow::bail!(
            "The interactive player requires a terminal.\n\
             Use `chatsim run --plain <FILE>` for non-interactive playback."
        );
    }

    tracing::info!(
        content = %presentation.content_id,
        messages = presentation.messages.len(),
        "starting interactive player"
    );

    let mut runtime = TuiRuntime::new(presentation, options)?;
    runtime.run()
}
